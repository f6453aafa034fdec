use std::collections::HashMap;

use async_graphql_parser::{types::Directive, Positioned};
use async_graphql_value::Value;

use super::{CompileError, CompileResult, Variables};

/// Include flags are a `u64`, one bit per distinct condition.
pub const MAX_INCLUDE_CONDITIONS: usize = u64::BITS as usize;

/// The `@skip(if: $var)` and `@include(if: $var)` variables present on a single node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct IncludeCondition {
    skip: Option<String>,
    include: Option<String>,
}

/// What the `@skip`/`@include` directives of a node amount to once literal arguments are folded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveOutcome {
    Always,
    Never,
    Conditional(IncludeCondition),
}

impl IncludeCondition {
    pub fn new(skip: Option<String>, include: Option<String>) -> Self {
        Self { skip, include }
    }

    pub fn skip(&self) -> Option<&str> {
        self.skip.as_deref()
    }

    pub fn include(&self) -> Option<&str> {
        self.include.as_deref()
    }

    /// Extracts the condition of a node. Literal `if` arguments are resolved right away: a node that
    /// can never be included yields `Never`, and a literal that always holds adds no condition.
    pub fn try_create(directives: &[Positioned<Directive>]) -> CompileResult<DirectiveOutcome> {
        let mut condition = IncludeCondition::default();
        let mut never = false;

        for directive in directives {
            let name = directive.node.name.node.as_str();
            let skip = match name {
                "skip" => true,
                "include" => false,
                _ => continue,
            };
            let Some(argument) = directive.node.get_argument("if") else {
                return Err(CompileError::InvalidDirectiveArgument {
                    directive: name.to_string(),
                    location: directive.pos.into(),
                });
            };
            match &argument.node {
                Value::Variable(variable) if skip => condition.skip = Some(variable.to_string()),
                Value::Variable(variable) => condition.include = Some(variable.to_string()),
                Value::Boolean(value) => never |= *value == skip,
                _ => {
                    return Err(CompileError::InvalidDirectiveArgument {
                        directive: name.to_string(),
                        location: argument.pos.into(),
                    })
                }
            }
        }

        Ok(if never {
            DirectiveOutcome::Never
        } else if condition.skip.is_none() && condition.include.is_none() {
            DirectiveOutcome::Always
        } else {
            DirectiveOutcome::Conditional(condition)
        })
    }

    /// Missing variables fall back to `defaults`. A skip variable must be `false` and an include variable
    /// must be `true` for the node to be included.
    pub fn is_included(&self, variables: &Variables, defaults: &HashMap<String, bool>) -> bool {
        let lookup = |name: &str| {
            variables
                .get(name)
                .and_then(serde_json::Value::as_bool)
                .or_else(|| defaults.get(name).copied())
        };

        if let Some(skip) = self.skip.as_deref() {
            if lookup(skip).unwrap_or_default() {
                return false;
            }
        }

        if let Some(include) = self.include.as_deref() {
            if !lookup(include).unwrap_or_default() {
                return false;
            }
        }

        true
    }
}

/// Distinct include conditions of an operation, in order of first occurrence. The position of a
/// condition is its bit in the include flags.
#[derive(Debug, Clone, Default)]
pub struct IncludeConditionCollection {
    conditions: Vec<IncludeCondition>,
}

impl IncludeConditionCollection {
    /// Returns whether the condition was newly inserted and its index.
    pub fn add(&mut self, condition: IncludeCondition) -> CompileResult<(bool, usize)> {
        if let Some(index) = self.index_of(&condition) {
            return Ok((false, index));
        }
        if self.conditions.len() >= MAX_INCLUDE_CONDITIONS {
            return Err(CompileError::TooManyIncludeConditions {
                max: MAX_INCLUDE_CONDITIONS,
            });
        }
        self.conditions.push(condition);
        Ok((true, self.conditions.len() - 1))
    }

    pub fn index_of(&self, condition: &IncludeCondition) -> Option<usize> {
        self.conditions.iter().position(|candidate| candidate == condition)
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &IncludeCondition> + '_ {
        self.conditions.iter()
    }

    /// Bit `i` is set if condition `i` holds.
    pub fn create_include_flags(&self, variables: &Variables, defaults: &HashMap<String, bool>) -> u64 {
        self.conditions
            .iter()
            .enumerate()
            .filter(|(_, condition)| condition.is_included(variables, defaults))
            .fold(0, |flags, (index, _)| flags | (1 << index))
    }
}

/// Reduces the include masks of all paths leading to a selection to a minimal disjunction: duplicates
/// are removed and so is every mask that is a strict superset of another one, as it's implied by
/// the smaller mask. The result is sorted.
pub fn collapse_include_flags(flags: &mut Vec<u64>) {
    // Subsets have fewer bits, so they are always retained before their supersets are seen.
    flags.sort_unstable_by_key(|mask| (mask.count_ones(), *mask));
    flags.dedup();

    let mut retained: Vec<u64> = Vec::with_capacity(flags.len());
    for &mask in flags.iter() {
        if !retained.iter().any(|&kept| kept & mask == kept) {
            retained.push(mask);
        }
    }
    retained.sort_unstable();
    *flags = retained;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collapsed(mut flags: Vec<u64>) -> Vec<u64> {
        collapse_include_flags(&mut flags);
        flags
    }

    #[test]
    fn collapse() {
        assert_eq!(collapsed(vec![0b011, 0b001]), vec![0b001]);
        assert_eq!(collapsed(vec![0b101, 0b100]), vec![0b100]);
        assert_eq!(collapsed(vec![0b01, 0b10]), vec![0b01, 0b10]);
        assert_eq!(collapsed(vec![0b110, 0b0, 0b1]), vec![0]);
        assert_eq!(collapsed(vec![0b1, 0b1, 0b1]), vec![0b1]);
        assert_eq!(collapsed(vec![]), Vec::<u64>::new());
    }

    #[test]
    fn collapse_never_keeps_a_strict_superset() {
        let input = vec![0b1110, 0b0110, 0b1000, 0b0111, 0b1100, 0b0010, 0b1011];
        let output = collapsed(input.clone());

        assert!(output.len() <= input.len());
        for a in &output {
            assert!(input.contains(a));
            for b in &output {
                assert!(a == b || a & b != *b, "{a:#b} is a superset of {b:#b}");
            }
        }
        // every input mask is implied by a retained one
        for mask in &input {
            assert!(output.iter().any(|kept| kept & mask == *kept));
        }
    }

    fn directives(query: &str) -> Vec<Positioned<Directive>> {
        let document = async_graphql_parser::parse_query(query).unwrap();
        let async_graphql_parser::types::DocumentOperations::Single(operation) = document.operations else {
            unreachable!()
        };
        let async_graphql_parser::types::Selection::Field(field) =
            operation.node.selection_set.node.items.into_iter().next().unwrap().node
        else {
            unreachable!()
        };
        field.node.directives
    }

    #[test]
    fn literal_arguments_are_folded() {
        assert_eq!(
            IncludeCondition::try_create(&directives("{ a @skip(if: true) }")).unwrap(),
            DirectiveOutcome::Never
        );
        assert_eq!(
            IncludeCondition::try_create(&directives("{ a @include(if: false) }")).unwrap(),
            DirectiveOutcome::Never
        );
        assert_eq!(
            IncludeCondition::try_create(&directives("{ a @skip(if: false) @include(if: true) }")).unwrap(),
            DirectiveOutcome::Always
        );
        assert_eq!(
            IncludeCondition::try_create(&directives("{ a @include(if: $b) @skip(if: true) }")).unwrap(),
            DirectiveOutcome::Never
        );
        assert_eq!(
            IncludeCondition::try_create(&directives("{ a @include(if: $b) @skip(if: $c) }")).unwrap(),
            DirectiveOutcome::Conditional(IncludeCondition::new(Some("c".into()), Some("b".into())))
        );
        assert!(matches!(
            IncludeCondition::try_create(&directives("{ a @skip(if: \"yes\") }")),
            Err(CompileError::InvalidDirectiveArgument { .. })
        ));
    }

    #[test]
    fn collection() {
        let mut collection = IncludeConditionCollection::default();
        let a = IncludeCondition::new(Some("a".into()), None);
        let b = IncludeCondition::new(None, Some("a".into()));

        assert_eq!(collection.add(a.clone()).unwrap(), (true, 0));
        assert_eq!(collection.add(b.clone()).unwrap(), (true, 1));
        assert_eq!(collection.add(a.clone()).unwrap(), (false, 0));
        assert_eq!(collection.index_of(&b), Some(1));

        let variables: Variables = [("a".to_string(), serde_json::Value::Bool(true))].into_iter().collect();
        assert_eq!(collection.create_include_flags(&variables, &HashMap::new()), 0b10);

        // missing variables use the defaults and otherwise count as false
        let defaults = HashMap::from([("a".to_string(), false)]);
        assert_eq!(collection.create_include_flags(&Variables::default(), &defaults), 0b01);
        assert_eq!(collection.create_include_flags(&Variables::default(), &HashMap::new()), 0b01);
    }

    #[test]
    fn sixty_four_conditions_at_most() {
        let mut collection = IncludeConditionCollection::default();
        for i in 0..MAX_INCLUDE_CONDITIONS {
            collection.add(IncludeCondition::new(Some(format!("v{i}")), None)).unwrap();
        }
        assert!(matches!(
            collection.add(IncludeCondition::new(Some("overflow".into()), None)),
            Err(CompileError::TooManyIncludeConditions { max: 64 })
        ));
    }
}
