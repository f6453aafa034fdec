use schema::{DefinitionId, ScalarType, TypeRecord};
use serde_json::Value;

use super::ValueCompletion;
use crate::response::{ResultParent, ResultPoolSession};

impl ValueCompletion<'_> {
    pub(super) fn complete_leaf(
        &mut self,
        pool: &mut ResultPoolSession,
        ty: TypeRecord,
        value: &Value,
        slot: ResultParent,
    ) -> bool {
        let coerced = match ty.definition_id {
            DefinitionId::Scalar(id) => coerce_scalar(self.schema[id].ty, value),
            DefinitionId::Enum(id) => value
                .as_str()
                .filter(|value| {
                    self.schema[id]
                        .values
                        .binary_search_by(|candidate| candidate.as_str().cmp(value))
                        .is_ok()
                })
                .map(|_| value.clone()),
            _ => None,
        };

        match coerced {
            Some(value) => {
                pool.set_slot_leaf(slot, value);
                true
            }
            None => {
                let name = self.schema.definition_name(ty.definition_id);
                self.field_error(format!("Invalid value for type {name}: {value}"));
                false
            }
        }
    }
}

fn coerce_scalar(ty: ScalarType, value: &Value) -> Option<Value> {
    match ty {
        ScalarType::String => value.is_string().then(|| value.clone()),
        ScalarType::ID => match value {
            Value::String(_) => Some(value.clone()),
            Value::Number(number) if number.is_i64() || number.is_u64() => Some(Value::String(number.to_string())),
            _ => None,
        },
        ScalarType::Int => value
            .as_i64()
            .filter(|number| i32::try_from(*number).is_ok())
            .map(|_| value.clone()),
        ScalarType::Float => value.is_number().then(|| value.clone()),
        ScalarType::Boolean => value.is_boolean().then(|| value.clone()),
        ScalarType::JSON => Some(value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn scalar_coercion() {
        assert_eq!(coerce_scalar(ScalarType::String, &json!("a")), Some(json!("a")));
        assert_eq!(coerce_scalar(ScalarType::String, &json!(1)), None);
        assert_eq!(coerce_scalar(ScalarType::ID, &json!(7)), Some(json!("7")));
        assert_eq!(coerce_scalar(ScalarType::ID, &json!(1.5)), None);
        assert_eq!(coerce_scalar(ScalarType::Int, &json!(42)), Some(json!(42)));
        assert_eq!(coerce_scalar(ScalarType::Int, &json!(1_i64 << 40)), None);
        assert_eq!(coerce_scalar(ScalarType::Int, &json!(1.5)), None);
        assert_eq!(coerce_scalar(ScalarType::Float, &json!(3)), Some(json!(3)));
        assert_eq!(coerce_scalar(ScalarType::Boolean, &json!("true")), None);
        assert_eq!(
            coerce_scalar(ScalarType::JSON, &json!({"any": [1, "thing"]})),
            Some(json!({"any": [1, "thing"]}))
        );
    }
}
