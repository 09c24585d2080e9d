//! Tests for rule-string parsing

use fieldrules_core::{parse_tags, RuleRegistry, TagError, Validator};

fn parsed(raw: &str) -> Result<Vec<(String, String)>, TagError> {
    let registry = RuleRegistry::with_builtins();
    parse_tags(raw, &registry).map(|tags| {
        tags.iter()
            .map(|t| (t.name().to_string(), t.param().to_string()))
            .collect()
    })
}

fn pair(name: &str, param: &str) -> (String, String) {
    (name.to_string(), param.to_string())
}

#[cfg(test)]
mod clauses {
    use super::*;

    #[test]
    fn test_single_rule() {
        assert_eq!(parsed("required").unwrap(), vec![pair("required", "")]);
    }

    #[test]
    fn test_rules_keep_their_order() {
        assert_eq!(
            parsed("len=5,min=3").unwrap(),
            vec![pair("len", "5"), pair("min", "3")]
        );
    }

    #[test]
    fn test_escaped_comma_is_literal() {
        assert_eq!(parsed(r"regexp=a\,b").unwrap(), vec![pair("regexp", "a,b")]);
    }

    #[test]
    fn test_escaped_comma_between_rules() {
        assert_eq!(
            parsed(r"regexp=^[a\,b]+$,required").unwrap(),
            vec![pair("regexp", "^[a,b]+$"), pair("required", "")]
        );
    }

    #[test]
    fn test_empty_string_yields_no_tags() {
        assert_eq!(parsed("").unwrap(), Vec::new());
    }

    #[test]
    fn test_deterministic() {
        let raw = "required, len = 8 ,inList=Unknown";
        assert_eq!(parsed(raw).unwrap(), parsed(raw).unwrap());
    }
}

#[cfg(test)]
mod failures {
    use super::*;

    #[test]
    fn test_unknown_rule() {
        assert_eq!(
            parsed("bogus=1"),
            Err(TagError::UnknownRule {
                name: "bogus".into()
            })
        );
    }

    #[test]
    fn test_one_unknown_rule_fails_the_whole_string() {
        assert!(parsed("required,bogus,min=1").is_err());
    }

    #[test]
    fn test_leading_and_trailing_commas() {
        assert!(parsed(",required").is_err());
        assert!(parsed("required,").is_err());
        assert!(parsed("required,,min=1").is_err());
    }

    #[test]
    fn test_whitespace_only_name() {
        assert!(parsed("  =3").is_err());
        assert!(parsed(" ").is_err());
    }

    #[test]
    fn test_rules_are_resolved_against_the_validator_registry() {
        let mut validator = Validator::new("Module");
        assert!(validator.parse_tags("min=1").is_ok());

        validator.remove_rule("min").unwrap();
        assert_eq!(
            validator.parse_tags("min=1").unwrap_err().to_string(),
            "unknown rule \"min\""
        );
    }
}
