//! Scene resolution
//!
//! A scene is a named, ordered subset of a record's rule set, e.g. `"login"`
//! validating only `user` and `pass`. Scenes never introduce rules of their
//! own; every listed field must have a specification in the rule set.
//!
//! [`resolve`] turns a scene name into a [`CheckPlan`]: the fields to check,
//! in the order they will be checked.

use crate::config::EmptyScenePolicy;
use crate::error::ConfigError;
use crate::record::{RuleSet, RuleSpec};
use indexmap::IndexMap;

/// Named scenes, in declaration order.
///
/// # Examples
///
/// ```
/// use nebula_validate::scene::Scenes;
///
/// let scenes = Scenes::new()
///     .scene("login", ["user", "pass"])
///     .scene("profile", ["nickname", "email"]);
///
/// assert_eq!(scenes.get("login"), Some(&["user".to_string(), "pass".to_string()][..]));
/// assert!(!scenes.contains("signup"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scenes {
    scenes: IndexMap<String, Vec<String>>,
}

impl Scenes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a scene, replacing any scene with the same name.
    #[must_use = "builder methods must be chained or built"]
    pub fn scene<I, S>(mut self, name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Vec::new();
        push_unique(&mut list, fields);
        self.scenes.insert(name.into(), list);
        self
    }

    /// Appends fields to a scene, creating it if needed.
    ///
    /// Fields already listed keep their position.
    pub fn append<I, S>(&mut self, name: impl Into<String>, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = self.scenes.entry(name.into()).or_default();
        push_unique(list, fields);
    }

    /// Fields listed for `name`.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.scenes.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    /// Scene names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

fn push_unique<I, S>(list: &mut Vec<String>, fields: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    for field in fields {
        let field = field.into();
        if !list.contains(&field) {
            list.push(field);
        }
    }
}

/// The fields a single pass checks, in order.
pub struct CheckPlan<'a, R> {
    scene: &'a str,
    fields: Vec<(&'a str, &'a RuleSpec<R>)>,
}

impl<'a, R> CheckPlan<'a, R> {
    /// Scene the plan was resolved for; `""` means the full rule set.
    pub fn scene(&self) -> &'a str {
        self.scene
    }

    /// Field keys and their specifications, in check order.
    pub fn fields(&self) -> &[(&'a str, &'a RuleSpec<R>)] {
        &self.fields
    }

    /// Field keys in check order.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.fields.iter().map(|(key, _)| *key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<R> std::fmt::Debug for CheckPlan<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckPlan")
            .field("scene", &self.scene)
            .field("fields", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Resolves `scene` against a rule set.
///
/// - `""` selects every field in declaration order.
/// - A named scene selects its listed fields in listing order; an unknown
///   scene or a listed field without rules is a configuration error.
/// - A scene declared with no fields follows `policy`.
pub fn resolve<'a, R>(
    scene: &'a str,
    rules: &'a RuleSet<R>,
    scenes: &'a Scenes,
    policy: EmptyScenePolicy,
) -> Result<CheckPlan<'a, R>, ConfigError> {
    if scene.is_empty() {
        return Ok(full_plan(scene, rules));
    }

    let listed = scenes
        .get(scene)
        .ok_or_else(|| ConfigError::undefined_scene(scene))?;

    if listed.is_empty() {
        return Ok(match policy {
            EmptyScenePolicy::ValidateNothing => CheckPlan {
                scene,
                fields: Vec::new(),
            },
            EmptyScenePolicy::ValidateAll => full_plan(scene, rules),
        });
    }

    let fields = listed
        .iter()
        .map(|field| {
            rules
                .get(field)
                .map(|spec| (field.as_str(), spec))
                .ok_or_else(|| ConfigError::scene_field_missing(scene, field.as_str()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CheckPlan { scene, fields })
}

fn full_plan<'a, R>(scene: &'a str, rules: &'a RuleSet<R>) -> CheckPlan<'a, R> {
    CheckPlan {
        scene,
        fields: rules.iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Form;

    fn rules() -> RuleSet<Form> {
        RuleSet::new()
            .chain("user", "required")
            .chain("pass", "required")
            .chain("extra", "number")
    }

    fn scenes() -> Scenes {
        Scenes::new()
            .scene("login", ["pass", "user"])
            .scene("broken", ["user", "nickname"])
            .scene("idle", Vec::<String>::new())
    }

    fn keys(plan: &CheckPlan<'_, Form>) -> Vec<String> {
        plan.keys().map(str::to_string).collect()
    }

    #[test]
    fn test_empty_scene_name_selects_everything() {
        let (rules, scenes) = (rules(), scenes());
        let plan = resolve("", &rules, &scenes, EmptyScenePolicy::default()).unwrap();
        assert_eq!(keys(&plan), ["user", "pass", "extra"]);
    }

    #[test]
    fn test_scene_uses_listing_order() {
        let (rules, scenes) = (rules(), scenes());
        let plan = resolve("login", &rules, &scenes, EmptyScenePolicy::default()).unwrap();
        assert_eq!(plan.scene(), "login");
        assert_eq!(keys(&plan), ["pass", "user"]);
    }

    #[test]
    fn test_unknown_scene_is_config_error() {
        let (rules, scenes) = (rules(), scenes());
        let err = resolve("signup", &rules, &scenes, EmptyScenePolicy::default()).unwrap_err();
        assert_eq!(err, ConfigError::undefined_scene("signup"));
    }

    #[test]
    fn test_listed_field_without_rules_is_config_error() {
        let (rules, scenes) = (rules(), scenes());
        let err = resolve("broken", &rules, &scenes, EmptyScenePolicy::default()).unwrap_err();
        assert_eq!(err, ConfigError::scene_field_missing("broken", "nickname"));
    }

    #[test]
    fn test_empty_scene_follows_policy() {
        let (rules, scenes) = (rules(), scenes());

        let nothing = resolve("idle", &rules, &scenes, EmptyScenePolicy::ValidateNothing).unwrap();
        assert!(nothing.is_empty());

        let all = resolve("idle", &rules, &scenes, EmptyScenePolicy::ValidateAll).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_append_skips_duplicates() {
        let mut scenes = Scenes::new().scene("login", ["user"]);
        scenes.append("login", ["pass", "user"]);
        scenes.append("reset", ["email"]);

        assert_eq!(scenes.get("login").unwrap(), ["user", "pass"]);
        assert_eq!(scenes.names().collect::<Vec<_>>(), ["login", "reset"]);
    }
}
