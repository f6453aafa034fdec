/// How non-null violations are handled during completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorHandling {
    /// Null the nearest nullable ancestor, up to the whole data.
    #[default]
    Propagate,
    /// Null only the failing position and keep going.
    Null,
    /// The first violation nulls the whole data.
    Halt,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutionConfig {
    /// Maximum nesting of objects and lists a fetch result may have.
    pub max_depth: usize,
    pub error_handling: ErrorHandling,
    /// Number of compiled operations kept in the operation cache.
    pub operation_cache_capacity: u64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_depth: 64,
            error_handling: ErrorHandling::Propagate,
            operation_cache_capacity: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config: ExecutionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ExecutionConfig::default());
        assert_eq!(config.max_depth, 64);
        assert_eq!(config.error_handling, ErrorHandling::Propagate);
    }

    #[test]
    fn partial() {
        let config: ExecutionConfig = serde_json::from_value(serde_json::json!({
            "error_handling": "null",
            "max_depth": 8
        }))
        .unwrap();
        assert_eq!(config.error_handling, ErrorHandling::Null);
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.operation_cache_capacity, 1000);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_value::<ExecutionConfig>(serde_json::json!({ "max_dept": 8 }));
        assert!(result.is_err());
    }
}
