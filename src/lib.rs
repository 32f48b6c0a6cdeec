//! # Wirestra
//!
//! A configuration-driven dependency injection container for Rust.
//!
//! Wirestra builds an object graph from declarative configuration files:
//! each file names services, their constructor arguments, post-construction
//! method calls and property assignments, and named parameters. A builder
//! merges the whole import tree into one container, and the container
//! resolves services lazily on first request, caching singletons.
//!
//! ## Features
//!
//! - **Declarative wiring**: services and parameters live in JSON
//!   configuration files, not in code
//! - **Recursive imports**: files import other files, with dotted namespaces
//!   composing depth-first across the import tree
//! - **Override semantics**: imports act as defaults that the importing file
//!   can override
//! - **Lazy resolution**: nothing is constructed until a service is first
//!   requested; singletons are cached, everything else is built per request
//! - **Explicit loading seam**: class references resolve through a
//!   host-supplied registry of factories, injected behind the
//!   [`ModuleLoader`] trait
//!
//! ## Quick Start
//!
//! ```rust
//! use std::any::Any;
//! use std::sync::{Arc, Mutex};
//! use serde_json::json;
//! use wirestra::{ContainerBuilder, Instance, RegistryLoader, Service, Value};
//!
//! // 1. A service type the container will manage
//! struct Messenger {
//!     message: Mutex<String>,
//! }
//!
//! impl Service for Messenger {
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//! }
//!
//! // 2. Register the factories your configuration refers to
//! let mut loader = RegistryLoader::new();
//! loader.register_factory("Messenger", |_method: Option<&str>, args: &[Value]| {
//!     let message = args.first().and_then(Value::as_str).unwrap_or_default();
//!     Ok(Arc::new(Messenger {
//!         message: Mutex::new(message.to_string()),
//!     }) as Instance)
//! });
//!
//! // 3. Declare services and parameters in configuration
//! loader.register_config("/app/services.json", json!({
//!     "parameters": { "greeting": "hi" },
//!     "services": {
//!         "msg": { "class": "Messenger", "arguments": ["%greeting%"], "isSingleton": true }
//!     }
//! }));
//!
//! // 4. Build the container and resolve lazily
//! let container = ContainerBuilder::new(Arc::new(loader))
//!     .build_container("/app/services.json")
//!     .unwrap();
//!
//! let msg = container.get("msg").unwrap();
//! let messenger = msg.as_any().downcast_ref::<Messenger>().unwrap();
//! assert_eq!(*messenger.message.lock().unwrap(), "hi");
//! ```

pub mod config;
pub mod di;
pub mod error;
pub mod loader;

// Re-export core types
pub use config::{CallEntry, ConfigFile, ServiceEntry};
pub use di::{
    Argument, Container, ContainerBuilder, Definition, Instance, MethodCall, Service,
    ServiceFactory, Value,
};
pub use error::{Result, WirestraError};
pub use loader::{LoadedModule, ModuleLoader, RegistryLoader};

/// Prelude module for convenient imports
///
/// ```
/// use wirestra::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{CallEntry, ConfigFile, ServiceEntry};
    pub use crate::di::{
        Argument, Container, ContainerBuilder, Definition, Instance, MethodCall, Service,
        ServiceFactory, Value,
    };
    pub use crate::error::{Result, WirestraError};
    pub use crate::loader::{LoadedModule, ModuleLoader, RegistryLoader};
    pub use std::sync::Arc;
}
