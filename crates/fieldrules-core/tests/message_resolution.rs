//! Message resolution through a validator with and without translation

use std::collections::HashMap;

use fieldrules_core::{AsValue, Catalog, Describe, Field, Messages, Validator, Value};

struct Address {
    city: String,
}

impl Describe for Address {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![Field::new("City", &self.city).rules("required")]
    }
}

impl AsValue for Address {
    fn as_value(&self) -> Value<'_> {
        Value::record(self)
    }
}

struct User {
    name: String,
    age: i64,
    address: Address,
}

impl Describe for User {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::new("Name", &self.name).rules("required"),
            Field::new("Age", self.age).rules("min=18"),
            Field::new("Address", self.address.as_value()),
        ]
    }
}

fn invalid_user() -> User {
    User {
        name: String::new(),
        age: 16,
        address: Address {
            city: String::new(),
        },
    }
}

fn catalog() -> Catalog {
    Catalog::new().with_language(
        "en",
        Messages::new()
            .with("User.Name.error.required", "Tell us your name")
            .with("User.Age.error.min", "You are ${0}, the minimum age is ${1}")
            .with("default.error.required", "${0} ${1} is mandatory")
            .with("Address.label", "Home address")
            .with("Address.City.label", "town"),
    )
}

fn errors_for(mut validator: Validator) -> HashMap<String, String> {
    validator
        .validate(&invalid_user())
        .unwrap_err()
        .to_map()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod without_translation {
    use super::*;

    #[test]
    fn test_builtin_templates_only() {
        let validator = Validator::new("User").with_provider(catalog());
        let errors = errors_for(validator);

        assert_eq!(errors["Name"], "User Name cannot be blank");
        assert_eq!(errors["Age"], "User 16 is less than minimum value 18");
        assert_eq!(errors["Address.City"], "Address City cannot be blank");
    }
}

#[cfg(test)]
mod with_translation {
    use super::*;

    fn translated() -> HashMap<String, String> {
        let mut validator = Validator::new("User").with_provider(catalog());
        validator.enable_translation("en").unwrap();
        errors_for(validator)
    }

    #[test]
    fn test_field_specific_message_beats_builtin() {
        assert_eq!(translated()["Name"], "Tell us your name");
    }

    #[test]
    fn test_field_specific_message_receives_value_and_param() {
        assert_eq!(translated()["Age"], "You are 16, the minimum age is 18");
    }

    #[test]
    fn test_child_module_uses_labels() {
        assert_eq!(translated()["Address.City"], "Home address town is mandatory");
    }

    #[test]
    fn test_unknown_language_falls_back_to_builtin() {
        let mut validator = Validator::new("User").with_provider(catalog());
        validator.enable_translation("pt").unwrap();
        let errors = errors_for(validator);

        assert_eq!(errors["Name"], "User Name cannot be blank");
    }

    #[test]
    fn test_child_validators_fetch_their_own_module() {
        use std::sync::{Arc, Mutex};

        let requested = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requested);
        let mut validator = Validator::new("User").with_provider(move |lang: &str, module: &str| {
            log.lock().unwrap().push(format!("{lang}:{module}"));
            Messages::new()
        });
        validator.enable_translation("de").unwrap();
        let _ = validator.validate(&invalid_user());

        assert_eq!(*requested.lock().unwrap(), vec!["de:User", "de:Address"]);
    }
}
