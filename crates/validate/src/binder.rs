//! Field binding
//!
//! Keeps a typed record and its string-keyed data map in sync without
//! runtime introspection. Each record declares a [`FieldTable`] of
//! descriptors, one per external key, holding a getter that encodes the
//! field into a [`Value`] and a setter that decodes a `Value` back into it.
//!
//! The [`bind_fields!`](crate::bind_fields) macro generates the table from
//! `"key" => field` pairs using serde for both directions:
//!
//! ```
//! use nebula_validate::bind_fields;
//! use nebula_validate::binder::FieldTable;
//! use serde_json::json;
//!
//! struct Account {
//!     id: u64,
//!     name: String,
//!     // not bound, never synchronized
//!     cache: Vec<u8>,
//! }
//!
//! let table: FieldTable<Account> = bind_fields!(Account; "id" => id, "name" => name);
//! let account = Account { id: 7, name: "ann".into(), cache: vec![] };
//!
//! let data = table.to_map(&account).unwrap();
//! assert_eq!(data.get("id"), Some(&json!(7)));
//! assert!(!data.contains_key("cache"));
//! ```

use crate::error::ConfigError;
use crate::value::{DataMap, value_type_name};
use serde::Serialize;
use serde::de::{Deserialize, DeserializeOwned};
use serde_json::Value;
use std::fmt;

/// Reads a bound field as a data value.
pub type FieldGetter<R> = fn(&R) -> Result<Value, ConfigError>;

/// Assigns a data value to a bound field.
pub type FieldSetter<R> = fn(&mut R, &Value) -> Result<(), ConfigError>;

/// Accessor pair for one bound field.
pub struct FieldDescriptor<R> {
    /// External key in the data map.
    pub key: &'static str,
    pub get: FieldGetter<R>,
    pub set: FieldSetter<R>,
}

impl<R> Clone for FieldDescriptor<R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            get: self.get,
            set: self.set,
        }
    }
}

impl<R> fmt::Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Descriptor table of a record type, in declaration order.
pub struct FieldTable<R> {
    fields: Vec<FieldDescriptor<R>>,
}

impl<R> FieldTable<R> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Binds `key`; a later binding for the same key replaces the earlier one.
    #[must_use = "builder methods must be chained or built"]
    pub fn field(mut self, key: &'static str, get: FieldGetter<R>, set: FieldSetter<R>) -> Self {
        let descriptor = FieldDescriptor { key, get, set };
        match self.fields.iter_mut().find(|field| field.key == key) {
            Some(slot) => *slot = descriptor,
            None => self.fields.push(descriptor),
        }
        self
    }

    /// Snapshots every bound field into a fresh map.
    pub fn to_map(&self, record: &R) -> Result<DataMap, ConfigError> {
        let mut data = DataMap::new();
        self.write_into(record, &mut data)?;
        Ok(data)
    }

    /// Overwrites the bound keys of `data` with the record's current values.
    ///
    /// Unbound keys in `data` are left alone.
    pub fn write_into(&self, record: &R, data: &mut DataMap) -> Result<(), ConfigError> {
        for field in &self.fields {
            data.insert(field.key.to_string(), (field.get)(record)?);
        }
        Ok(())
    }

    /// Assigns every bound key present in `data` onto the record.
    ///
    /// Stops at the first mismatch; fields assigned before it keep their
    /// new values.
    pub fn from_map(&self, record: &mut R, data: &DataMap) -> Result<(), ConfigError> {
        for field in &self.fields {
            if let Some(value) = data.get(field.key) {
                (field.set)(record, value)?;
            }
        }
        Ok(())
    }

    /// Assigns one value. Returns `false` if `key` is not bound.
    pub fn set(&self, record: &mut R, key: &str, value: &Value) -> Result<bool, ConfigError> {
        match self.descriptor(key) {
            Some(field) => (field.set)(record, value).map(|()| true),
            None => Ok(false),
        }
    }

    /// Descriptor for `key`.
    pub fn descriptor(&self, key: &str) -> Option<&FieldDescriptor<R>> {
        self.fields.iter().find(|field| field.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.descriptor(key).is_some()
    }

    /// Bound keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<R> Default for FieldTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for FieldTable<R> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
        }
    }
}

impl<R> fmt::Debug for FieldTable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}

/// Encodes a field value for the data map.
pub fn encode_field<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<Value, ConfigError> {
    serde_json::to_value(value).map_err(|err| ConfigError::Encode {
        field: key.to_string(),
        message: err.to_string(),
    })
}

/// Decodes a data value into a field type.
///
/// A value of the wrong shape is a [`ConfigError::TypeMismatch`] naming the
/// field type and the JSON kind that was offered.
pub fn decode_field<T: DeserializeOwned>(key: &str, value: &Value) -> Result<T, ConfigError> {
    <T as Deserialize>::deserialize(value).map_err(|_| ConfigError::TypeMismatch {
        field: key.to_string(),
        expected: std::any::type_name::<T>(),
        actual: value_type_name(value),
    })
}

/// Builds a [`FieldTable`](crate::binder::FieldTable) from `"key" => field`
/// pairs.
///
/// Every field must implement `Serialize` and `DeserializeOwned`.
///
/// ```
/// use nebula_validate::bind_fields;
/// use nebula_validate::binder::FieldTable;
///
/// struct Point { x: i32, y: i32 }
///
/// let table: FieldTable<Point> = bind_fields!(Point; "x" => x, "y" => y);
/// assert_eq!(table.keys().collect::<Vec<_>>(), ["x", "y"]);
/// ```
#[macro_export]
macro_rules! bind_fields {
    ($record:ty; $($key:literal => $field:ident),* $(,)?) => {
        $crate::binder::FieldTable::<$record>::new()
            $(
                .field(
                    $key,
                    |record: &$record| $crate::binder::encode_field($key, &record.$field),
                    |record: &mut $record, value: &$crate::Value| {
                        record.$field = $crate::binder::decode_field($key, value)?;
                        Ok(())
                    },
                )
            )*
    };
}
