use serde::{Deserialize, Serialize};

/// The four wrapper strings the scanner writes around template regions.
///
/// `output_start`/`output_end` open and close an "emit literal text" statement;
/// `expr_start`/`expr_end` open and close an "emit expression value" statement.
/// The text is opaque to the scanner: empty strings are legal and simply
/// produce unwrapped output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelimiterConfig {
    pub output_start: String,
    pub output_end: String,
    pub expr_start: String,
    pub expr_end: String,
}

impl DelimiterConfig {
    pub fn new(
        output_start: impl Into<String>,
        output_end: impl Into<String>,
        expr_start: impl Into<String>,
        expr_end: impl Into<String>,
    ) -> Self {
        Self {
            output_start: output_start.into(),
            output_end: output_end.into(),
            expr_start: expr_start.into(),
            expr_end: expr_end.into(),
        }
    }

    /// Replace individual wrappers, keeping the rest.
    pub fn with_overrides(
        mut self,
        output_start: Option<String>,
        output_end: Option<String>,
        expr_start: Option<String>,
        expr_end: Option<String>,
    ) -> Self {
        if let Some(s) = output_start {
            self.output_start = s;
        }
        if let Some(s) = output_end {
            self.output_end = s;
        }
        if let Some(s) = expr_start {
            self.expr_start = s;
        }
        if let Some(s) = expr_end {
            self.expr_end = s;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_only_given_fields() {
        let base = DelimiterConfig::new("a", "b", "c", "d");
        let merged = base.with_overrides(None, Some("B".into()), None, Some(String::new()));
        assert_eq!(merged, DelimiterConfig::new("a", "B", "c", ""));
    }

    #[test]
    fn test_null_field_rejected() {
        let json = r#"{"output_start":"a","output_end":null,"expr_start":"c","expr_end":"d"}"#;
        assert!(serde_json::from_str::<DelimiterConfig>(json).is_err());
    }

    #[test]
    fn test_missing_field_rejected() {
        let json = r#"{"output_start":"a","expr_start":"c","expr_end":"d"}"#;
        assert!(serde_json::from_str::<DelimiterConfig>(json).is_err());
    }
}
