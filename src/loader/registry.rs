use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::config::ConfigFile;
use crate::di::{Instance, ServiceFactory};
use crate::error::{Result, WirestraError};
use crate::loader::{LoadedModule, ModuleLoader};

/// A [`ModuleLoader`] backed by an explicit registry.
///
/// Hosts register the factories and objects their configuration files refer
/// to before building the container. Relative class references (`./x`,
/// `../x`) are keyed by their normalized join with the declaring file's
/// directory, so one registration under the target path serves every
/// configuration file that points at it.
///
/// Configuration documents are read from disk as JSON; a document registered
/// with [`register_config`](RegistryLoader::register_config) shadows the
/// filesystem, which keeps tests and embedded configurations off the disk
/// entirely.
#[derive(Default)]
pub struct RegistryLoader {
    modules: HashMap<String, LoadedModule>,
    module_paths: HashMap<String, PathBuf>,
    configs: HashMap<PathBuf, JsonValue>,
}

impl RegistryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under a class reference.
    ///
    /// The reference is either a bare identifier, exactly as configuration
    /// files spell it, or the absolute path relative references resolve to.
    pub fn register_factory(
        &mut self,
        class_ref: impl Into<String>,
        factory: impl ServiceFactory + 'static,
    ) -> &mut Self {
        let class_ref = class_ref.into();
        tracing::debug!(class_ref = %class_ref, "Registered factory");
        self.modules
            .insert(class_ref, LoadedModule::Factory(Arc::new(factory)));
        self
    }

    /// Register a plain value under a class reference, for `isObject`
    /// services.
    pub fn register_object(
        &mut self,
        class_ref: impl Into<String>,
        instance: Instance,
    ) -> &mut Self {
        let class_ref = class_ref.into();
        tracing::debug!(class_ref = %class_ref, "Registered object");
        self.modules
            .insert(class_ref, LoadedModule::Object(instance));
        self
    }

    /// Map a module identifier to the absolute path [`resolve`] returns
    /// for it.
    ///
    /// [`resolve`]: ModuleLoader::resolve
    pub fn register_module_path(
        &mut self,
        identifier: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> &mut Self {
        self.module_paths.insert(identifier.into(), path.into());
        self
    }

    /// Register an in-memory configuration document for a path.
    pub fn register_config(&mut self, path: impl Into<PathBuf>, document: JsonValue) -> &mut Self {
        self.configs.insert(normalize(&path.into()), document);
        self
    }
}

impl ModuleLoader for RegistryLoader {
    fn load_config(&self, path: &Path) -> Result<ConfigFile> {
        let document = match self.configs.get(&normalize(path)) {
            Some(registered) => registered.clone(),
            None => {
                let text =
                    fs::read_to_string(path).map_err(|e| WirestraError::ConfigurationLoad {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                serde_json::from_str(&text).map_err(|e| WirestraError::ConfigurationLoad {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?
            }
        };
        serde_json::from_value(document).map_err(|e| WirestraError::ConfigurationLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn load(&self, class_ref: &str, root_directory: &Path) -> Result<LoadedModule> {
        let key = if class_ref.starts_with('.') {
            normalize(&root_directory.join(class_ref))
                .to_string_lossy()
                .into_owned()
        } else {
            class_ref.to_string()
        };
        self.modules
            .get(&key)
            .cloned()
            .ok_or_else(|| WirestraError::ModuleLoad {
                class_ref: key,
                message: "no factory or object registered under this reference".to_string(),
            })
    }

    fn resolve(&self, identifier: &str) -> Result<PathBuf> {
        self.module_paths
            .get(identifier)
            .cloned()
            .ok_or_else(|| WirestraError::ModuleLoad {
                class_ref: identifier.to_string(),
                message: "unresolved module identifier".to_string(),
            })
    }
}

/// Lexically remove `.` and `..` components so equivalent spellings of one
/// path share a registry key.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}
