use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::di::argument::Argument;

/// The declarative recipe for one service: where to load its class from, how
/// to construct it, and what to wire after construction.
///
/// A definition is pure data. It performs no validation; a malformed recipe
/// surfaces as a resolution-time error from the container. Definitions are
/// written once during the build phase and treated as read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Definition {
    /// Reference to the loadable class or factory.
    pub class_ref: String,

    /// Directory of the configuration file that declared this service.
    /// Relative class references resolve against it.
    pub root_directory: PathBuf,

    /// Alternate factory entry point; the default constructor when absent.
    pub constructor_method: Option<String>,

    /// Constructor arguments, in declared order.
    pub arguments: Vec<Argument>,

    /// Methods invoked on the instance after construction, in declared order.
    pub calls: Vec<MethodCall>,

    /// Properties assigned after the calls have run, in name order.
    pub properties: BTreeMap<String, Argument>,

    /// Use the loaded value as-is; skip the construction step.
    pub is_object: bool,

    /// Cache the first resolved instance and reuse it for later requests.
    pub is_singleton: bool,

    /// The namespace this definition was registered under. Kept for
    /// diagnostics; registration already folded it into the service name.
    pub namespace: String,
}

/// One post-construction method invocation.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub arguments: Vec<Argument>,
}
