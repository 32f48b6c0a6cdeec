use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value as JsonValue;

use crate::di::argument::Argument;
use crate::di::definition::Definition;
use crate::di::service::{Instance, Value};
use crate::error::{Result, WirestraError};
use crate::loader::{LoadedModule, ModuleLoader};

/// The runtime registry of parameters and service definitions.
///
/// A container is created empty by the builder, populated entirely during
/// the build phase, and read-mostly afterwards: the only later mutation is
/// the singleton cache growing on first resolution of each singleton.
/// Resolution is synchronous end to end and runs the whole dependency graph
/// to completion before returning.
///
/// A failed resolution leaves the container usable. Nothing is cached for
/// the failing name and already-cached singletons are untouched, so a later
/// [`get`](Container::get) for the same name retries from scratch.
pub struct Container {
    loader: Arc<dyn ModuleLoader>,
    parameters: DashMap<String, JsonValue>,
    definitions: DashMap<String, Arc<Definition>>,
    instances: DashMap<String, Instance>,
}

impl Container {
    pub fn new(loader: Arc<dyn ModuleLoader>) -> Self {
        Self {
            loader,
            parameters: DashMap::new(),
            definitions: DashMap::new(),
            instances: DashMap::new(),
        }
    }

    /// Set a named parameter. Later writes for the same name win.
    pub fn set_parameter(&self, name: impl Into<String>, value: JsonValue) {
        self.parameters.insert(name.into(), value);
    }

    /// Register a service definition. Later writes for the same name win.
    ///
    /// A non-empty `alias` registers the same definition under a second
    /// name, so two names resolve to one recipe. Instances are still cached
    /// per requested name.
    pub fn set_definition(&self, name: impl Into<String>, definition: Definition, alias: Option<&str>) {
        let name = name.into();
        let definition = Arc::new(definition);
        tracing::debug!(service = %name, "Registered service definition");
        if let Some(alias) = alias.filter(|alias| !alias.is_empty()) {
            self.definitions
                .insert(alias.to_string(), Arc::clone(&definition));
        }
        self.definitions.insert(name, definition);
    }

    /// Look up a parameter value.
    ///
    /// # Errors
    /// [`WirestraError::UnknownParameter`] if nothing is registered under
    /// `name`.
    pub fn get_parameter(&self, name: &str) -> Result<JsonValue> {
        self.parameters
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| WirestraError::UnknownParameter {
                name: name.to_string(),
            })
    }

    /// Resolve a named service into a concrete instance.
    ///
    /// Singletons are constructed on first request and cached; every other
    /// request constructs a fresh instance. Arguments, wired calls, and
    /// properties are resolved recursively, so one `get` can pull in an
    /// arbitrary slice of the dependency graph.
    ///
    /// # Errors
    /// [`WirestraError::UnknownService`] for an unregistered name;
    /// [`WirestraError::UnknownParameter`], [`WirestraError::ModuleLoad`],
    /// [`WirestraError::Construction`], or
    /// [`WirestraError::CircularDependency`] surfaced from resolution.
    pub fn get(&self, name: &str) -> Result<Instance> {
        self.resolve(name, &mut Vec::new())
    }

    /// Whether a definition is registered under `name`.
    pub fn has(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Whether a parameter is registered under `name`.
    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    /// Number of registered service definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    fn resolve(&self, name: &str, stack: &mut Vec<String>) -> Result<Instance> {
        let definition = self
            .definitions
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| WirestraError::UnknownService {
                name: name.to_string(),
            })?;

        if definition.is_singleton {
            if let Some(cached) = self.instances.get(name) {
                return Ok(Arc::clone(cached.value()));
            }
        }

        if stack.iter().any(|pending| pending == name) {
            let mut cycle = stack.join(" -> ");
            cycle.push_str(" -> ");
            cycle.push_str(name);
            return Err(WirestraError::CircularDependency { cycle });
        }

        stack.push(name.to_string());
        let constructed = self.construct(name, &definition, stack);
        stack.pop();
        let instance = constructed?;

        if definition.is_singleton {
            self.instances
                .insert(name.to_string(), Arc::clone(&instance));
        }
        Ok(instance)
    }

    fn construct(
        &self,
        name: &str,
        definition: &Definition,
        stack: &mut Vec<String>,
    ) -> Result<Instance> {
        let arguments = self.resolve_arguments(&definition.arguments, stack)?;

        let module = self
            .loader
            .load(&definition.class_ref, &definition.root_directory)?;

        let instance = if definition.is_object {
            match module {
                LoadedModule::Object(value) => value,
                LoadedModule::Factory(_) => {
                    return Err(WirestraError::ModuleLoad {
                        class_ref: definition.class_ref.clone(),
                        message: "reference is a factory but the definition expects a plain object"
                            .to_string(),
                    });
                }
            }
        } else {
            let factory = match module {
                LoadedModule::Factory(factory) => factory,
                LoadedModule::Object(_) => {
                    return Err(WirestraError::ModuleLoad {
                        class_ref: definition.class_ref.clone(),
                        message: "reference is a plain object and cannot be constructed"
                            .to_string(),
                    });
                }
            };
            factory
                .construct(definition.constructor_method.as_deref(), &arguments)
                .map_err(|source| WirestraError::Construction {
                    service: name.to_string(),
                    source,
                })?
        };

        for call in &definition.calls {
            let args = self.resolve_arguments(&call.arguments, stack)?;
            instance
                .call(&call.method, &args)
                .map_err(|source| WirestraError::Construction {
                    service: name.to_string(),
                    source,
                })?;
        }

        for (property, spec) in &definition.properties {
            let value = self.resolve_argument(spec, stack)?;
            instance
                .set_property(property, value)
                .map_err(|source| WirestraError::Construction {
                    service: name.to_string(),
                    source,
                })?;
        }

        tracing::debug!(service = %name, "Constructed service instance");
        Ok(instance)
    }

    fn resolve_arguments(&self, arguments: &[Argument], stack: &mut Vec<String>) -> Result<Vec<Value>> {
        arguments
            .iter()
            .map(|argument| self.resolve_argument(argument, stack))
            .collect()
    }

    /// Turn one argument specification into a concrete value. Service and
    /// parameter references resolve recursively; the in-progress stack rides
    /// along so cycles through arguments are caught.
    fn resolve_argument(&self, argument: &Argument, stack: &mut Vec<String>) -> Result<Value> {
        match argument {
            Argument::Literal(value) => Ok(Value::Data(value.clone())),
            Argument::Parameter(name) => self.get_parameter(name).map(Value::Data),
            Argument::Service(name) => self.resolve(name, stack).map(Value::Service),
            Argument::List(items) => items
                .iter()
                .map(|item| self.resolve_argument(item, stack))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            Argument::Map(entries) => entries
                .iter()
                .map(|(key, item)| Ok((key.clone(), self.resolve_argument(item, stack)?)))
                .collect::<Result<BTreeMap<_, _>>>()
                .map(Value::Map),
        }
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_struct("Container");
        for entry in self.definitions.iter() {
            let state = if self.instances.contains_key(entry.key()) {
                "resolved"
            } else {
                "registered"
            };
            map.field(entry.key(), &state);
        }
        map.finish()
    }
}
