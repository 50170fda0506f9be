//! Opciones de la regla: lista de nombres permitidos para la señal de `takeUntil`.

use serde_json::Value;

pub const OPTION_KEY: &str = "allowedDestroySubjectNames";

pub const DEFAULT_ALLOWED_DESTROY_SUBJECT_NAMES: [&str; 2] = ["destroy$", "_destroy$"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOptions {
    allowed_destroy_subject_names: Vec<String>,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            allowed_destroy_subject_names: DEFAULT_ALLOWED_DESTROY_SUBJECT_NAMES
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

impl RuleOptions {
    pub fn with_allowed<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_destroy_subject_names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Resuelve las opciones a partir de los argumentos de la regla.
    ///
    /// El primer argumento objeto que tenga la propiedad `allowedDestroySubjectNames`
    /// decide: si es un array reemplaza por completo la lista por defecto (sólo se
    /// conservan los elementos string); cualquier otro valor se ignora.
    pub fn from_rule_arguments(arguments: &[Value]) -> Self {
        let option = arguments
            .iter()
            .find_map(|argument| argument.as_object()?.get(OPTION_KEY));

        match option {
            Some(Value::Array(items)) => Self::with_allowed(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string),
            ),
            _ => Self::default(),
        }
    }

    pub fn allowed_destroy_subject_names(&self) -> &[String] {
        &self.allowed_destroy_subject_names
    }

    pub fn is_allowed(&self, name: &str) -> bool {
        self.allowed_destroy_subject_names
            .iter()
            .any(|allowed| allowed == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_allow_list() {
        let options = RuleOptions::default();
        assert_eq!(options.allowed_destroy_subject_names(), ["destroy$", "_destroy$"]);
        assert!(options.is_allowed("_destroy$"));
        assert!(!options.is_allowed("destroyed$"));
    }

    #[test]
    fn test_array_replaces_default_without_merging() {
        let options = RuleOptions::from_rule_arguments(&[json!({
            "allowedDestroySubjectNames": ["unsubscribe$"]
        })]);
        assert_eq!(options.allowed_destroy_subject_names(), ["unsubscribe$"]);
        assert!(!options.is_allowed("destroy$"));
    }

    #[test]
    fn test_first_argument_with_property_wins() {
        let options = RuleOptions::from_rule_arguments(&[
            json!(true),
            json!({ "other": 1 }),
            json!({ "allowedDestroySubjectNames": ["a$", "b$"] }),
            json!({ "allowedDestroySubjectNames": ["c$"] }),
        ]);
        assert_eq!(options.allowed_destroy_subject_names(), ["a$", "b$"]);
    }

    #[test]
    fn test_malformed_value_falls_back_to_default() {
        let options = RuleOptions::from_rule_arguments(&[
            json!({ "allowedDestroySubjectNames": "destroy$" }),
            json!({ "allowedDestroySubjectNames": ["ignored$"] }),
        ]);
        assert_eq!(options, RuleOptions::default());
        assert_eq!(RuleOptions::from_rule_arguments(&[]), RuleOptions::default());
    }

    #[test]
    fn test_non_string_elements_are_dropped() {
        let options = RuleOptions::from_rule_arguments(&[json!({
            "allowedDestroySubjectNames": ["kill$", 3, null]
        })]);
        assert_eq!(options.allowed_destroy_subject_names(), ["kill$"]);
    }

    #[test]
    fn test_empty_array_allows_nothing() {
        let options = RuleOptions::from_rule_arguments(&[json!({
            "allowedDestroySubjectNames": []
        })]);
        assert!(options.allowed_destroy_subject_names().is_empty());
        assert!(!options.is_allowed("destroy$"));
    }
}
