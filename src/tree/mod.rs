//! Owned hierarchical key/value settings tree.
//!
//! Every workflow descriptor and node settings file is loaded into a
//! [`ConfigTree`]. The tree owns its children and carries no parent link, so
//! handing a sub-tree to a caller is a plain clone.

pub mod xml;

use serde::ser::{Serialize, SerializeMap, Serializer};
use sha2::{Digest, Sha256};
use thiserror::Error;

pub use xml::{load_tree, parse_tree};

/// Key of the entry that declares the length of an array config.
pub const ARRAY_SIZE_KEY: &str = "array-size";

/// Failure of a typed read against a [`ConfigTree`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("key '{key}' not found in config '{config}'")]
    MissingKey { config: String, key: String },

    #[error("key '{key}' in config '{config}' is a {found}, expected {expected}")]
    TypeMismatch {
        config: String,
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("key '{key}' in config '{config}' is null")]
    NullValue { config: String, key: String },

    #[error("key '{key}' in config '{config}' has an invalid value: {message}")]
    InvalidValue {
        config: String,
        key: String,
        message: String,
    },
}

/// A typed leaf or nested sub-tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    /// `None` for entries stored with `isnull="true"`.
    String(Option<String>),
    Config(ConfigTree),
}

impl ConfigValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Byte(_) => "byte",
            ConfigValue::Short(_) => "short",
            ConfigValue::Int(_) => "int",
            ConfigValue::Long(_) => "long",
            ConfigValue::Float(_) => "float",
            ConfigValue::Double(_) => "double",
            ConfigValue::Char(_) => "char",
            ConfigValue::String(_) => "string",
            ConfigValue::Config(_) => "config",
        }
    }
}

/// An ordered, keyed collection of [`ConfigValue`]s.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigTree {
    key: String,
    entries: Vec<(String, ConfigValue)>,
}

impl ConfigTree {
    pub fn new(key: impl Into<String>) -> Self {
        ConfigTree {
            key: key.into(),
            entries: Vec::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Appends an entry, replacing an existing entry with the same key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: ConfigValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style variant of [`ConfigTree::insert`].
    pub fn with(mut self, key: impl Into<String>, value: ConfigValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Nested configs in declaration order; leaf entries are skipped.
    pub fn children(&self) -> impl Iterator<Item = &ConfigTree> {
        self.entries.iter().filter_map(|(_, v)| match v {
            ConfigValue::Config(c) => Some(c),
            _ => None,
        })
    }

    fn lookup(&self, key: &str) -> Result<&ConfigValue, SettingsError> {
        self.get(key).ok_or_else(|| SettingsError::MissingKey {
            config: self.key.clone(),
            key: key.to_string(),
        })
    }

    fn mismatch(&self, key: &str, expected: &'static str, found: &ConfigValue) -> SettingsError {
        SettingsError::TypeMismatch {
            config: self.key.clone(),
            key: key.to_string(),
            expected,
            found: found.type_name(),
        }
    }

    pub fn get_bool(&self, key: &str) -> Result<bool, SettingsError> {
        match self.lookup(key)? {
            ConfigValue::Bool(b) => Ok(*b),
            other => Err(self.mismatch(key, "boolean", other)),
        }
    }

    pub fn get_int(&self, key: &str) -> Result<i32, SettingsError> {
        match self.lookup(key)? {
            ConfigValue::Byte(v) => Ok(i32::from(*v)),
            ConfigValue::Short(v) => Ok(i32::from(*v)),
            ConfigValue::Int(v) => Ok(*v),
            other => Err(self.mismatch(key, "int", other)),
        }
    }

    pub fn get_long(&self, key: &str) -> Result<i64, SettingsError> {
        match self.lookup(key)? {
            ConfigValue::Long(v) => Ok(*v),
            _ => self.get_int(key).map(i64::from),
        }
    }

    pub fn get_double(&self, key: &str) -> Result<f64, SettingsError> {
        match self.lookup(key)? {
            ConfigValue::Float(v) => Ok(f64::from(*v)),
            ConfigValue::Double(v) => Ok(*v),
            other => Err(self.mismatch(key, "double", other)),
        }
    }

    pub fn get_char(&self, key: &str) -> Result<char, SettingsError> {
        match self.lookup(key)? {
            ConfigValue::Char(c) => Ok(*c),
            other => Err(self.mismatch(key, "char", other)),
        }
    }

    /// Reads a string that may legitimately be null.
    pub fn get_nullable_string(&self, key: &str) -> Result<Option<&str>, SettingsError> {
        match self.lookup(key)? {
            ConfigValue::String(s) => Ok(s.as_deref()),
            other => Err(self.mismatch(key, "string", other)),
        }
    }

    /// Reads a string that must be present and non-null.
    pub fn get_string(&self, key: &str) -> Result<&str, SettingsError> {
        self.get_nullable_string(key)?
            .ok_or_else(|| SettingsError::NullValue {
                config: self.key.clone(),
                key: key.to_string(),
            })
    }

    /// Best-effort string read: absent keys and nulls are `None`, a value of
    /// another type is still an error.
    pub fn get_optional_string(&self, key: &str) -> Result<Option<&str>, SettingsError> {
        if !self.contains_key(key) {
            return Ok(None);
        }
        self.get_nullable_string(key)
    }

    pub fn get_config(&self, key: &str) -> Result<&ConfigTree, SettingsError> {
        match self.lookup(key)? {
            ConfigValue::Config(c) => Ok(c),
            other => Err(self.mismatch(key, "config", other)),
        }
    }

    pub fn get_optional_config(&self, key: &str) -> Result<Option<&ConfigTree>, SettingsError> {
        if !self.contains_key(key) {
            return Ok(None);
        }
        self.get_config(key).map(Some)
    }

    /// Reads an array config (`array-size` plus positional children) of strings.
    /// Null elements are kept as `None`.
    pub fn get_string_array(&self, key: &str) -> Result<Vec<Option<String>>, SettingsError> {
        let array = self.get_config(key)?;
        let size = array.get_int(ARRAY_SIZE_KEY)?;
        let size = usize::try_from(size).map_err(|_| SettingsError::InvalidValue {
            config: array.key.clone(),
            key: ARRAY_SIZE_KEY.to_string(),
            message: format!("negative array size {size}"),
        })?;
        (0..size)
            .map(|i| {
                array
                    .get_nullable_string(&i.to_string())
                    .map(|s| s.map(str::to_string))
            })
            .collect()
    }

    /// Canonical serialized form, used for content hashing.
    pub fn canonical_json(&self) -> String {
        // Serializing a tree of plain values into a String cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Lowercase hex SHA-256 over [`ConfigTree::canonical_json`].
    pub fn content_hash(&self) -> String {
        let digest = Sha256::digest(self.canonical_json().as_bytes());
        format!("{digest:x}")
    }
}

impl Serialize for ConfigTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConfigValue::Bool(v) => serializer.serialize_bool(*v),
            ConfigValue::Byte(v) => serializer.serialize_i8(*v),
            ConfigValue::Short(v) => serializer.serialize_i16(*v),
            ConfigValue::Int(v) => serializer.serialize_i32(*v),
            ConfigValue::Long(v) => serializer.serialize_i64(*v),
            ConfigValue::Float(v) => serializer.serialize_f32(*v),
            ConfigValue::Double(v) => serializer.serialize_f64(*v),
            ConfigValue::Char(v) => serializer.serialize_char(*v),
            ConfigValue::String(Some(v)) => serializer.serialize_str(v),
            ConfigValue::String(None) => serializer.serialize_none(),
            ConfigValue::Config(c) => c.serialize(serializer),
        }
    }
}
