mod argument;
mod builder;
mod container;
mod definition;
mod service;

pub use argument::Argument;
pub use builder::ContainerBuilder;
pub use container::Container;
pub use definition::{Definition, MethodCall};
pub use service::{Instance, Service, ServiceFactory, Value};
