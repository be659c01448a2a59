//! Validator definitions, bound instances and validation sessions
//!
//! - [`Validator`] is the immutable, per-type definition: rule set, titles,
//!   message overrides, scenes, record methods, field bindings and the shared
//!   [`RuleRegistry`]. Build it once and share it; it holds no per-call state.
//! - [`Instance`] pairs one record value with its data map. It is the
//!   per-request object.
//! - [`Session`] is the outcome of one pass: the scene, the fields that were
//!   checked, and at most one latched error.
//!
//! # Examples
//!
//! ```
//! use nebula_validate::prelude::*;
//! use serde_json::json;
//!
//! struct Member;
//!
//! impl Record for Member {
//!     fn rules() -> RuleSet<Self> {
//!         RuleSet::new().chain("age", "required|between:18,65")
//!     }
//! }
//!
//! let validator = Validator::<Member>::new(RuleRegistry::with_builtins().into());
//! let mut data = json!({"age": 70}).as_object().cloned().unwrap();
//!
//! let session = validator.evaluate(&mut Member, &mut data, "");
//! assert_eq!(session.error().and_then(CheckError::as_violation).unwrap().code, "between");
//! ```

use crate::binder::FieldTable;
use crate::config::ValidatorConfig;
use crate::error::{CheckError, ConfigError, ErrorLatch, ValidationError};
use crate::record::{MethodTable, Record, RuleSet, RuleSpec, TextTable};
use crate::registry::RuleRegistry;
use crate::scene::{self, Scenes};
use crate::value::{DataMap, is_missing};
use serde_json::Value;
use std::any::type_name;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, debug_span, trace, warn};

static NULL: Value = Value::Null;

// ============================================================================
// SESSION
// ============================================================================

/// State and outcome of one validation pass.
#[derive(Debug, Clone)]
pub struct Session {
    scene: String,
    checked: Vec<String>,
    latch: ErrorLatch,
}

impl Session {
    /// Starts an empty session for `scene`.
    pub fn new(scene: impl Into<String>) -> Self {
        Self {
            scene: scene.into(),
            checked: Vec::new(),
            latch: ErrorLatch::new(),
        }
    }

    /// Scene of the pass; `""` for the full rule set.
    pub fn scene(&self) -> &str {
        &self.scene
    }

    /// Fields whose rules were run, in order.
    pub fn checked_fields(&self) -> &[String] {
        &self.checked
    }

    /// Latches `error` unless one is pending; returns the pending error.
    pub fn set_error(&mut self, error: impl Into<CheckError>) -> &CheckError {
        self.latch.set(error.into())
    }

    /// The latched error.
    pub fn error(&self) -> Option<&CheckError> {
        self.latch.get()
    }

    /// Returns true if nothing was latched.
    pub fn is_valid(&self) -> bool {
        !self.latch.is_set()
    }

    pub fn into_result(self) -> Result<(), CheckError> {
        self.latch.into_result()
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

/// Immutable validation definition for record type `R`.
///
/// `Validator<R>` is `Send + Sync`; share it behind an `Arc` or a `static`
/// and bind one [`Instance`] per request.
pub struct Validator<R: Record> {
    registry: Arc<RuleRegistry>,
    rules: RuleSet<R>,
    titles: TextTable,
    messages: TextTable,
    scenes: Scenes,
    methods: MethodTable<R>,
    fields: FieldTable<R>,
    config: ValidatorConfig,
    prefix: Arc<str>,
}

impl<R: Record> Validator<R> {
    /// Builds the definition of `R` with default configuration.
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self::with_config(registry, ValidatorConfig::default())
    }

    /// Builds the definition of `R`.
    pub fn with_config(registry: Arc<RuleRegistry>, config: ValidatorConfig) -> Self {
        let prefix: Arc<str> = match &config.system_prefix {
            Some(prefix) => prefix.as_str().into(),
            None => format!("validator {}: ", type_name::<R>()).into(),
        };

        let validator = Self {
            registry,
            rules: R::rules(),
            titles: R::titles(),
            messages: R::messages(),
            scenes: R::scenes(),
            methods: R::methods(),
            fields: R::fields(),
            config,
            prefix,
        };

        debug!(
            record = type_name::<R>(),
            rules = validator.rules.len(),
            scenes = validator.scenes.len(),
            fields = validator.fields.len(),
            "Validator defined"
        );

        validator
    }

    // ------------------------------------------------------------------------
    // Append operations
    // ------------------------------------------------------------------------

    /// Merges extra rules; they win over existing ones for the same key.
    pub fn extend_rules(&mut self, rules: RuleSet<R>) {
        self.rules.merge(rules);
    }

    /// Adds or replaces field titles.
    pub fn extend_titles<K, V>(&mut self, titles: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.titles.extend(titles);
    }

    /// Adds or replaces message overrides keyed `"field.rule"`.
    pub fn extend_messages<K, V>(&mut self, messages: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.messages.extend(messages);
    }

    /// Appends fields to a scene, creating it if needed.
    pub fn append_scene<I, S>(&mut self, scene: impl Into<String>, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scenes.append(scene, fields);
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn rules(&self) -> &RuleSet<R> {
        &self.rules
    }

    pub fn titles(&self) -> &TextTable {
        &self.titles
    }

    pub fn messages(&self) -> &TextTable {
        &self.messages
    }

    pub fn scenes(&self) -> &Scenes {
        &self.scenes
    }

    pub fn methods(&self) -> &MethodTable<R> {
        &self.methods
    }

    pub fn fields(&self) -> &FieldTable<R> {
        &self.fields
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Prefix carried by this validator's configuration errors.
    pub fn system_prefix(&self) -> &str {
        &self.prefix
    }

    /// Display title of `key`: its configured title, or the key itself.
    pub fn title<'a>(&'a self, key: &'a str) -> &'a str {
        match self.titles.get(key) {
            Some(title) if !title.is_empty() => title,
            _ => key,
        }
    }

    // ------------------------------------------------------------------------
    // Binding
    // ------------------------------------------------------------------------

    /// Binds a record, snapshotting its bound fields into a data map.
    pub fn bind(&self, record: R) -> Result<Instance<'_, R>, CheckError> {
        let data = self
            .fields
            .to_map(&record)
            .map_err(|err| self.config_error(err))?;

        Ok(Instance {
            validator: self,
            record,
            data,
        })
    }

    /// Binds a record and replaces its data with `data`.
    ///
    /// Bound keys present in `data` are written onto the record.
    pub fn bind_with(&self, mut record: R, data: DataMap) -> Result<Instance<'_, R>, CheckError> {
        self.fields
            .from_map(&mut record, &data)
            .map_err(|err| self.config_error(err))?;

        Ok(Instance {
            validator: self,
            record,
            data,
        })
    }

    // ------------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------------

    /// Runs one validation pass over `data` for `scene`.
    ///
    /// Fields are checked in plan order and the pass stops at the first
    /// error. When every field passes, the data map is written onto the
    /// record and [`Record::handle_data`] runs. Changes the hook makes on
    /// either side are then carried over to the other.
    pub fn evaluate(&self, record: &mut R, data: &mut DataMap, scene: &str) -> Session {
        let span = debug_span!("check", record = type_name::<R>(), scene);
        let _guard = span.enter();

        let mut session = Session::new(scene);

        let plan = match scene::resolve(scene, &self.rules, &self.scenes, self.config.empty_scene) {
            Ok(plan) => plan,
            Err(err) => {
                session.set_error(self.config_error(err));
                return session;
            }
        };

        trace!(fields = plan.len(), "Resolved check plan");

        for &(key, spec) in plan.fields() {
            session.checked.push(key.to_string());
            if let Err(err) = self.check_field(record, data, key, spec) {
                session.set_error(err);
                return session;
            }
        }

        if let Err(err) = self.fields.from_map(record, data) {
            session.set_error(self.config_error(err));
            return session;
        }

        let before = data.clone();
        if let Err(violation) = record.handle_data(data, scene) {
            debug!(code = %violation.code, "Post-validation hook failed");
            session.set_error(violation);
            return session;
        }

        if let Err(err) = self.sync_hook_changes(record, data, &before) {
            session.set_error(self.config_error(err));
        }

        session
    }

    /// Reconciles the record and the map after the hook.
    ///
    /// Map entries the hook changed are assigned onto the record first, then
    /// every bound field is written back into the map. A key changed on both
    /// sides keeps the map's value.
    fn sync_hook_changes(
        &self,
        record: &mut R,
        data: &mut DataMap,
        before: &DataMap,
    ) -> Result<(), ConfigError> {
        let changed: DataMap = data
            .iter()
            .filter(|&(key, value)| before.get(key) != Some(value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        trace!(changed = changed.len(), "Syncing hook changes");
        self.fields.from_map(record, &changed)?;
        self.fields.write_into(record, data)
    }

    fn check_field(
        &self,
        record: &R,
        data: &DataMap,
        key: &str,
        spec: &RuleSpec<R>,
    ) -> Result<(), CheckError> {
        let title = self.title(key);
        let value = data.get(key);
        trace!(field = key, kind = spec.kind(), "Checking field");

        match spec {
            RuleSpec::Chain(chain) => {
                if !chain.is_required() && is_missing(value) {
                    trace!(field = key, "Skipping empty optional field");
                    return Ok(());
                }

                let value = value.unwrap_or(&NULL);
                for item in chain.items() {
                    trace!(field = key, rule = %item.name, "Applying rule");

                    let result = if let Some(rule) = self.registry.lookup(&item.name) {
                        rule.check(value, &item.param, data, title)
                    } else if let Some(method) = self.methods.get(&item.name) {
                        method(record, value, &item.param, data, title)
                    } else {
                        return Err(self.config_error(ConfigError::undefined_rule(key, &item.name)));
                    };

                    result.map_err(|violation| self.violation(key, Some(item.name.as_str()), violation))?;
                }
                Ok(())
            }
            RuleSpec::Closure(closure) => {
                closure
                    .call(value.unwrap_or(&NULL), data, title)
                    .map_err(|violation| self.violation(key, None, violation))
            }
            RuleSpec::Method(method) => {
                method(record, value.unwrap_or(&NULL), "", data, title)
                    .map_err(|violation| self.violation(key, None, violation))
            }
        }
    }

    fn violation(&self, key: &str, rule: Option<&str>, violation: ValidationError) -> CheckError {
        let mut violation = violation.with_field(key.to_string());

        if let Some(rule) = rule
            && let Some(message) = self.messages.get(&format!("{key}.{rule}"))
        {
            violation = violation.with_message(message.to_string());
        }

        debug!(field = key, code = %violation.code, "Validation failed");
        CheckError::Violation(violation)
    }

    fn config_error(&self, err: ConfigError) -> CheckError {
        warn!(record = type_name::<R>(), error = %err, "Validator misconfigured");
        CheckError::config(Arc::clone(&self.prefix), err)
    }
}

impl<R: Record> fmt::Debug for Validator<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("record", &type_name::<R>())
            .field("rules", &self.rules)
            .field("scenes", &self.scenes)
            .field("fields", &self.fields)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// INSTANCE
// ============================================================================

/// A record bound to its validator, together with its data map.
///
/// Each call to [`check`](Self::check) or [`check_scene`](Self::check_scene)
/// starts a fresh session; nothing carries over from earlier passes except
/// the data and record themselves.
pub struct Instance<'v, R: Record> {
    validator: &'v Validator<R>,
    record: R,
    data: DataMap,
}

impl<'v, R: Record> Instance<'v, R> {
    /// Validates the full rule set.
    pub fn check(&mut self) -> Result<(), CheckError> {
        self.run("").into_result()
    }

    /// Validates the fields of one scene.
    pub fn check_scene(&mut self, scene: &str) -> Result<(), CheckError> {
        self.run(scene).into_result()
    }

    /// Validates and returns the whole session.
    pub fn run(&mut self, scene: &str) -> Session {
        self.validator
            .evaluate(&mut self.record, &mut self.data, scene)
    }

    /// Sets one data entry, writing it onto the bound field if any.
    ///
    /// On a type mismatch neither the map nor the record changes.
    pub fn set_data(&mut self, key: impl Into<String>, value: Value) -> Result<(), CheckError> {
        let key = key.into();
        self.validator
            .fields
            .set(&mut self.record, &key, &value)
            .map_err(|err| self.validator.config_error(err))?;
        self.data.insert(key, value);
        Ok(())
    }

    /// Replaces the data map and writes every bound key present onto the
    /// record.
    ///
    /// The map is only replaced when every bound key was assigned.
    pub fn set_datas(&mut self, data: DataMap) -> Result<(), CheckError> {
        self.validator
            .fields
            .from_map(&mut self.record, &data)
            .map_err(|err| self.validator.config_error(err))?;
        self.data = data;
        Ok(())
    }

    /// Re-reads the bound fields after the record was changed directly.
    pub fn refresh(&mut self) -> Result<(), CheckError> {
        self.validator
            .fields
            .write_into(&self.record, &mut self.data)
            .map_err(|err| self.validator.config_error(err))
    }

    pub fn data(&self) -> &DataMap {
        &self.data
    }

    pub fn record(&self) -> &R {
        &self.record
    }

    /// Mutable record access; call [`refresh`](Self::refresh) afterwards to
    /// update the data map.
    pub fn record_mut(&mut self) -> &mut R {
        &mut self.record
    }

    pub fn validator(&self) -> &'v Validator<R> {
        self.validator
    }

    pub fn into_record(self) -> R {
        self.record
    }

    pub fn into_parts(self) -> (R, DataMap) {
        (self.record, self.data)
    }
}

impl<R: Record + fmt::Debug> fmt::Debug for Instance<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("record", &self.record)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmptyScenePolicy;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Debug, Default)]
    struct Member {
        name: String,
        age: u32,
    }

    impl Record for Member {
        fn rules() -> RuleSet<Self> {
            RuleSet::new()
                .chain("name", "required|alphaDash")
                .chain("age", "required|between:18,65")
                .chain("nickname", "length:2,8")
        }

        fn titles() -> TextTable {
            TextTable::from([("age", "Age"), ("name", "")])
        }

        fn messages() -> TextTable {
            TextTable::from([("age.between", "Members must be adults")])
        }

        fn scenes() -> Scenes {
            Scenes::new()
                .scene("rename", ["name"])
                .scene("touch", Vec::<String>::new())
        }

        fn fields() -> FieldTable<Self> {
            crate::bind_fields!(Self; "name" => name, "age" => age)
        }
    }

    fn validator() -> Validator<Member> {
        Validator::new(Arc::new(RuleRegistry::with_builtins()))
    }

    fn member(name: &str, age: u32) -> Member {
        Member {
            name: name.into(),
            age,
        }
    }

    #[test]
    fn test_validator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Validator<Member>>();
    }

    #[test]
    fn test_default_prefix_names_record_type() {
        let validator = validator();
        assert!(validator.system_prefix().starts_with("validator "));
        assert!(validator.system_prefix().ends_with("Member: "));
    }

    #[test]
    fn test_configured_prefix() {
        let config = ValidatorConfig::default().with_system_prefix("members: ");
        let validator = Validator::<Member>::with_config(RuleRegistry::with_builtins().into(), config);

        let mut instance = validator.bind(member("ann", 30)).unwrap();
        let err = instance.check_scene("missing").unwrap_err();
        assert_eq!(err.to_string(), "members: scene `missing` is not defined");
    }

    #[test]
    fn test_check_passes_and_skips_empty_optional() {
        let validator = validator();
        let mut instance = validator.bind(member("ann", 30)).unwrap();

        let session = instance.run("");
        assert!(session.is_valid());
        assert_eq!(session.checked_fields(), ["name", "age", "nickname"]);
    }

    #[test]
    fn test_title_falls_back_to_key() {
        let validator = validator();
        assert_eq!(validator.title("age"), "Age");
        assert_eq!(validator.title("name"), "name");
        assert_eq!(validator.title("nickname"), "nickname");
    }

    #[test]
    fn test_violation_carries_field_and_override() {
        let validator = validator();
        let mut instance = validator.bind(member("ann", 70)).unwrap();

        let err = instance.check().unwrap_err();
        let violation = err.as_violation().unwrap();
        assert_eq!(violation.code, "between");
        assert_eq!(violation.field(), Some("age"));
        assert_eq!(violation.message, "Members must be adults");
    }

    #[test]
    fn test_first_failing_field_stops_pass() {
        let validator = validator();
        let mut instance = validator.bind(member("", 70)).unwrap();

        let session = instance.run("");
        assert_eq!(session.checked_fields(), ["name"]);
        assert_eq!(
            session.error().and_then(CheckError::as_violation).map(|v| v.code.as_ref()),
            Some("required")
        );
    }

    #[test]
    fn test_scene_limits_fields() {
        let validator = validator();
        let mut instance = validator.bind(member("ann", 70)).unwrap();

        assert!(instance.check_scene("rename").is_ok());
        assert!(instance.check().is_err());
    }

    #[test]
    fn test_empty_scene_policy() {
        let validator = validator();
        let mut instance = validator.bind(member("ann", 70)).unwrap();
        assert!(instance.check_scene("touch").is_ok());

        let config = ValidatorConfig::default().with_empty_scene(EmptyScenePolicy::ValidateAll);
        let strict = Validator::<Member>::with_config(RuleRegistry::with_builtins().into(), config);
        let mut instance = strict.bind(member("ann", 70)).unwrap();
        assert!(instance.check_scene("touch").is_err());
    }

    #[test]
    fn test_undefined_rule_is_config_error() {
        let mut validator = validator();
        validator.extend_rules(RuleSet::new().chain("name", "required|shouting"));

        let mut instance = validator.bind(member("ann", 30)).unwrap();
        let err = instance.check().unwrap_err();
        assert!(err.is_config());
        assert_eq!(
            err.as_config(),
            Some(&ConfigError::undefined_rule("name", "shouting"))
        );
    }

    #[test]
    fn test_set_data_rejects_mismatch_without_changes() {
        let validator = validator();
        let mut instance = validator.bind(member("ann", 30)).unwrap();

        let err = instance.set_data("age", json!("old")).unwrap_err();
        assert!(err.is_config());
        assert_eq!(instance.record().age, 30);
        assert_eq!(instance.data().get("age"), Some(&json!(30)));
    }

    #[test]
    fn test_refresh_after_direct_change() {
        let validator = validator();
        let mut instance = validator.bind(member("ann", 30)).unwrap();

        instance.record_mut().age = 40;
        instance.refresh().unwrap();
        assert_eq!(instance.data().get("age"), Some(&json!(40)));
    }

    #[test]
    fn test_append_scene_and_titles() {
        let mut validator = validator();
        validator.append_scene("rename", ["age"]);
        validator.extend_titles([("name", "Name")]);

        assert_eq!(validator.scenes().get("rename").unwrap(), ["name", "age"]);
        assert_eq!(validator.title("name"), "Name");
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_field_trace_names_rule_kind() {
        let buffer = LogBuffer::default();
        let sink = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(move || sink.clone())
            .finish();

        let mut validator = validator();
        validator.extend_rules(RuleSet::new().closure("nickname", |_, _, _| Ok(())));

        tracing::subscriber::with_default(subscriber, || {
            let mut instance = validator.bind(member("ann", 30)).unwrap();
            instance.check().unwrap();
        });

        let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let kinds: Vec<&str> = logs
            .lines()
            .filter(|line| line.contains("Checking field"))
            .collect();
        assert_eq!(kinds.len(), 3);
        assert!(kinds[0].contains("chain"));
        assert!(kinds[2].contains("closure"));
    }

    #[test]
    fn test_session_latch() {
        let mut session = Session::new("login");
        session.set_error(ValidationError::new("first", "first"));
        let pending = session.set_error(ValidationError::new("second", "second"));

        assert_eq!(pending.to_string(), "first");
        assert!(!session.is_valid());
        assert_eq!(session.scene(), "login");
    }
}
