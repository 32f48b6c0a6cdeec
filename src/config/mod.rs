//! Schema for service configuration files.
//!
//! A configuration file is a JSON document with four recognized top-level
//! fields: `namespace`, `imports`, `parameters`, and `services`. Collections
//! that are missing from a file default to empty at parse time; the defaults
//! apply per file and are never inherited from an importing file. Unknown
//! fields are ignored.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value as JsonValue;

/// One parsed configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Dotted namespace scoping every name defined by this file and its
    /// imports. Composes with the namespace inherited from the importer.
    pub namespace: Option<String>,

    /// Configuration files to merge before this file's own entries, in
    /// declared order. Entries starting with `.` resolve relative to this
    /// file's directory; everything else is a module identifier.
    pub imports: Vec<String>,

    /// Literal values registered under `prefix + key`.
    pub parameters: BTreeMap<String, JsonValue>,

    /// Service entries registered as definitions under `prefix + key`.
    pub services: BTreeMap<String, ServiceEntry>,
}

/// The declarative recipe for one service, as it appears in a file.
///
/// Argument specifications stay raw JSON here; the builder classifies them
/// into [`Argument`](crate::di::Argument)s when it turns the entry into a
/// [`Definition`](crate::di::Definition).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEntry {
    /// Reference to the loadable class or factory.
    pub class: String,

    /// Alternate factory entry point. The default constructor is used when
    /// absent.
    #[serde(default)]
    pub constructor_method: Option<String>,

    /// Constructor arguments, in order.
    #[serde(default)]
    pub arguments: Vec<JsonValue>,

    /// Methods invoked on the instance after construction, in order.
    #[serde(default)]
    pub calls: Vec<CallEntry>,

    /// Properties assigned after the calls have run.
    #[serde(default)]
    pub properties: BTreeMap<String, JsonValue>,

    /// Use the loaded value as-is instead of constructing it.
    #[serde(default)]
    pub is_object: bool,

    /// Cache the first resolved instance and reuse it.
    #[serde(default)]
    pub is_singleton: bool,
}

/// One `calls` entry: a method name and its argument specifications.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallEntry {
    pub method: String,
    #[serde(default)]
    pub arguments: Vec<JsonValue>,
}
