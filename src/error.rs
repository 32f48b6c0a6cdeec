use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WirestraError>;

#[derive(Debug, Error)]
pub enum WirestraError {
    /// A configuration file or import target could not be loaded.
    ///
    /// Raised during the build phase only. The build aborts on the first
    /// offending file and no partially populated container is returned.
    #[error("Failed to load configuration '{}': {message}", .path.display())]
    ConfigurationLoad { path: PathBuf, message: String },

    /// A service was requested under a name no definition is registered for.
    #[error("Unknown service: {name}")]
    UnknownService { name: String },

    /// A parameter was requested under a name nothing has been set for.
    #[error("Unknown parameter: {name}")]
    UnknownParameter { name: String },

    /// A service's class reference could not be loaded at resolution time.
    #[error("Failed to load module '{class_ref}': {message}")]
    ModuleLoad { class_ref: String, message: String },

    /// The factory, a wired method call, or a property assignment failed
    /// while building a service instance.
    #[error("Failed to construct service '{service}': {source}")]
    Construction {
        service: String,
        #[source]
        source: anyhow::Error,
    },

    /// A service depends on itself, directly or through its arguments.
    #[error("Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },
}
