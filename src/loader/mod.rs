//! The module loader seam.
//!
//! The container never loads code itself; it asks a [`ModuleLoader`] for the
//! value behind a class reference and for the path behind a module
//! identifier. The loader is injected so hosts can swap it out, and so tests
//! can run against in-memory configuration documents. [`RegistryLoader`] is
//! the provided implementation: an explicit registry of host-supplied
//! factories and objects.

mod registry;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::ConfigFile;
use crate::di::{Instance, ServiceFactory};
use crate::error::Result;

pub use registry::RegistryLoader;

/// What a class reference loads to.
#[derive(Clone)]
pub enum LoadedModule {
    /// A constructible factory, for ordinary service definitions.
    Factory(Arc<dyn ServiceFactory>),
    /// A plain value used as the instance itself, for `isObject` services.
    Object(Instance),
}

impl fmt::Debug for LoadedModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadedModule::Factory(_) => f.debug_tuple("Factory").field(&"<factory>").finish(),
            LoadedModule::Object(_) => f.debug_tuple("Object").field(&"<instance>").finish(),
        }
    }
}

/// Loads configuration documents and the values class references point at.
///
/// All three operations are synchronous and fail if the target does not
/// exist or is malformed.
pub trait ModuleLoader: Send + Sync {
    /// Load and parse the configuration document at `path`.
    fn load_config(&self, path: &Path) -> Result<ConfigFile>;

    /// Load the value registered for `class_ref`. References starting with
    /// `.` resolve against `root_directory`, the directory of the
    /// configuration file that declared them.
    fn load(&self, class_ref: &str, root_directory: &Path) -> Result<LoadedModule>;

    /// Resolve a non-relative module identifier to an absolute path.
    fn resolve(&self, identifier: &str) -> Result<PathBuf>;
}
