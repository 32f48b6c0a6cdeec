use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value as JsonValue;

/// A shared, container-managed service instance.
pub type Instance = Arc<dyn Service>;

/// A live object managed by the container.
///
/// Rust has no runtime method dispatch by name, so the wiring surface a
/// configuration file can reach (`calls` and `properties`) is made explicit
/// here. Types that are only constructed and passed around can rely on the
/// default implementations, which reject any method or property by name.
///
/// # Example
/// ```
/// use std::any::Any;
/// use std::sync::Mutex;
/// use wirestra::{Service, Value};
///
/// struct Messenger {
///     message: Mutex<String>,
/// }
///
/// impl Service for Messenger {
///     fn call(&self, method: &str, args: &[Value]) -> anyhow::Result<Option<Value>> {
///         match method {
///             "set_message" => {
///                 let msg = args.first().and_then(Value::as_str).unwrap_or_default();
///                 *self.message.lock().unwrap() = msg.to_string();
///                 Ok(None)
///             }
///             other => anyhow::bail!("unknown method '{other}'"),
///         }
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
/// ```
pub trait Service: Send + Sync + 'static {
    /// Invoke a wired method on this instance.
    ///
    /// Return values are discarded by the container; calls exist for
    /// side-effecting wiring.
    fn call(&self, method: &str, _args: &[Value]) -> anyhow::Result<Option<Value>> {
        anyhow::bail!("unknown method '{method}'")
    }

    /// Assign a wired property on this instance.
    fn set_property(&self, name: &str, _value: Value) -> anyhow::Result<()> {
        anyhow::bail!("unknown property '{name}'")
    }

    /// Access the concrete type, for host code that needs to downcast.
    fn as_any(&self) -> &dyn Any;
}

impl fmt::Debug for dyn Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<service instance>")
    }
}

/// Constructs service instances from resolved arguments.
///
/// This is the "class" half of the module loader contract. Plain closures of
/// the shape `Fn(Option<&str>, &[Value]) -> anyhow::Result<Instance>` are
/// factories too, via the blanket impl; `method` carries the definition's
/// `constructorMethod` when one is declared.
pub trait ServiceFactory: Send + Sync {
    fn construct(&self, method: Option<&str>, args: &[Value]) -> anyhow::Result<Instance>;
}

impl<F> ServiceFactory for F
where
    F: Fn(Option<&str>, &[Value]) -> anyhow::Result<Instance> + Send + Sync,
{
    fn construct(&self, method: Option<&str>, args: &[Value]) -> anyhow::Result<Instance> {
        self(method, args)
    }
}

/// A fully resolved argument value.
///
/// Literals and parameter lookups stay plain configuration data; service
/// references resolve to live instances. Collections appear only when the
/// original specification had references embedded in an array or object, in
/// which case resolution happened element-wise.
#[derive(Clone)]
pub enum Value {
    Data(JsonValue),
    Service(Instance),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn as_data(&self) -> Option<&JsonValue> {
        match self {
            Value::Data(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_data().and_then(JsonValue::as_str)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_data().and_then(JsonValue::as_i64)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_data().and_then(JsonValue::as_bool)
    }

    pub fn as_service(&self) -> Option<&Instance> {
        match self {
            Value::Service(instance) => Some(instance),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Data(data) => f.debug_tuple("Data").field(data).finish(),
            Value::Service(_) => f.debug_tuple("Service").field(&"<instance>").finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
        }
    }
}
