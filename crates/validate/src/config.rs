//! Validator configuration

use serde::{Deserialize, Serialize};

/// What a scene declared with zero fields validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyScenePolicy {
    /// No field rules run; only the post-validation hook does.
    #[default]
    ValidateNothing,
    /// Fall back to the full rule set, as if no scene was given.
    ValidateAll,
}

/// Settings applied when a record type is bound to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Prefix for configuration errors. Defaults to `"validator <type>: "`.
    pub system_prefix: Option<String>,
    /// Behaviour for scenes with an empty field list.
    pub empty_scene: EmptyScenePolicy,
}

impl ValidatorConfig {
    /// Create configuration from environment variables
    ///
    /// Reads `NEBULA_VALIDATE_PREFIX` and `NEBULA_VALIDATE_EMPTY_SCENE`
    /// (`nothing` or `all`). Unknown values keep the default.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading variables through `var`.
    #[must_use]
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(prefix) = var("NEBULA_VALIDATE_PREFIX") {
            config.system_prefix = Some(prefix);
        }

        if let Some(policy) = var("NEBULA_VALIDATE_EMPTY_SCENE") {
            config.empty_scene = match policy.to_lowercase().as_str() {
                "all" => EmptyScenePolicy::ValidateAll,
                _ => EmptyScenePolicy::ValidateNothing,
            };
        }

        config
    }

    /// Sets the configuration error prefix.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_system_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.system_prefix = Some(prefix.into());
        self
    }

    /// Sets the empty scene policy.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_empty_scene(mut self, policy: EmptyScenePolicy) -> Self {
        self.empty_scene = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults() {
        let config = ValidatorConfig::default();
        assert_eq!(config.system_prefix, None);
        assert_eq!(config.empty_scene, EmptyScenePolicy::ValidateNothing);
    }

    #[test]
    fn deserializes_partial_documents() {
        let config: ValidatorConfig =
            serde_json::from_str(r#"{"empty_scene": "validate_all"}"#).unwrap();
        assert_eq!(config.empty_scene, EmptyScenePolicy::ValidateAll);
        assert_eq!(config.system_prefix, None);
    }

    #[test]
    fn builder() {
        let config = ValidatorConfig::default()
            .with_system_prefix("users: ")
            .with_empty_scene(EmptyScenePolicy::ValidateAll);
        assert_eq!(config.system_prefix.as_deref(), Some("users: "));
        assert_eq!(config.empty_scene, EmptyScenePolicy::ValidateAll);
    }

    #[rstest]
    #[case("all", EmptyScenePolicy::ValidateAll)]
    #[case("ALL", EmptyScenePolicy::ValidateAll)]
    #[case("nothing", EmptyScenePolicy::ValidateNothing)]
    #[case("everything", EmptyScenePolicy::ValidateNothing)]
    fn empty_scene_from_vars(#[case] raw: &str, #[case] expected: EmptyScenePolicy) {
        let config = ValidatorConfig::from_vars(|name| {
            (name == "NEBULA_VALIDATE_EMPTY_SCENE").then(|| raw.to_string())
        });
        assert_eq!(config.empty_scene, expected);
        assert_eq!(config.system_prefix, None);
    }

    #[test]
    fn prefix_from_vars() {
        let config = ValidatorConfig::from_vars(|name| match name {
            "NEBULA_VALIDATE_PREFIX" => Some("orders: ".to_string()),
            _ => None,
        });
        assert_eq!(config.system_prefix.as_deref(), Some("orders: "));
        assert_eq!(config.empty_scene, EmptyScenePolicy::ValidateNothing);
    }

    #[test]
    fn from_vars_without_variables_is_default() {
        assert_eq!(ValidatorConfig::from_vars(|_| None), ValidatorConfig::default());
    }
}
