use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

/// A classified argument specification.
///
/// Configuration files spell references inside ordinary strings: `"@name"`
/// refers to another service and `"%name%"` to a parameter. The builder
/// classifies every specification exactly once, at parse time, so resolution
/// never re-sniffs raw strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// A plain value passed through unchanged.
    Literal(JsonValue),
    /// A reference to a container parameter.
    Parameter(String),
    /// A reference to another service, resolved recursively.
    Service(String),
    /// An array that had references embedded in it; resolves element-wise.
    List(Vec<Argument>),
    /// An object that had references embedded in it; resolves entry-wise.
    Map(BTreeMap<String, Argument>),
}

impl Argument {
    /// Classify one raw specification.
    ///
    /// Arrays and objects with no embedded references anywhere stay a single
    /// [`Argument::Literal`] and pass through verbatim.
    pub fn from_spec(spec: &JsonValue) -> Argument {
        match spec {
            JsonValue::String(text) => Argument::from_string(text, spec),
            JsonValue::Array(items) => {
                let classified: Vec<Argument> = items.iter().map(Argument::from_spec).collect();
                if classified.iter().all(Argument::is_literal) {
                    Argument::Literal(spec.clone())
                } else {
                    Argument::List(classified)
                }
            }
            JsonValue::Object(entries) => {
                let classified: BTreeMap<String, Argument> = entries
                    .iter()
                    .map(|(key, value)| (key.clone(), Argument::from_spec(value)))
                    .collect();
                if classified.values().all(Argument::is_literal) {
                    Argument::Literal(spec.clone())
                } else {
                    Argument::Map(classified)
                }
            }
            _ => Argument::Literal(spec.clone()),
        }
    }

    fn from_string(text: &str, original: &JsonValue) -> Argument {
        if let Some(name) = text.strip_prefix('@') {
            if !name.is_empty() {
                return Argument::Service(name.to_string());
            }
        }
        if text.len() > 2 && text.starts_with('%') && text.ends_with('%') {
            return Argument::Parameter(text[1..text.len() - 1].to_string());
        }
        Argument::Literal(original.clone())
    }

    fn is_literal(&self) -> bool {
        matches!(self, Argument::Literal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_service_marker() {
        assert_eq!(
            Argument::from_spec(&json!("@logger")),
            Argument::Service("logger".to_string())
        );
    }

    #[test]
    fn test_parameter_marker() {
        assert_eq!(
            Argument::from_spec(&json!("%greeting%")),
            Argument::Parameter("greeting".to_string())
        );
    }

    #[test]
    fn test_plain_values_are_literals() {
        for spec in [json!("hello"), json!(42), json!(true), json!(null)] {
            assert_eq!(Argument::from_spec(&spec), Argument::Literal(spec.clone()));
        }
    }

    #[test]
    fn test_bare_markers_are_literals() {
        // "@" names nothing and "%%" has no name between the delimiters.
        assert_eq!(Argument::from_spec(&json!("@")), Argument::Literal(json!("@")));
        assert_eq!(Argument::from_spec(&json!("%%")), Argument::Literal(json!("%%")));
        assert_eq!(Argument::from_spec(&json!("%x")), Argument::Literal(json!("%x")));
    }

    #[test]
    fn test_marker_free_collections_pass_through_verbatim() {
        let array = json!(["a", 1, ["nested"]]);
        assert_eq!(Argument::from_spec(&array), Argument::Literal(array.clone()));

        let object = json!({"host": "localhost", "port": 8080});
        assert_eq!(Argument::from_spec(&object), Argument::Literal(object.clone()));
    }

    #[test]
    fn test_embedded_references_split_collections() {
        let spec = json!(["@logger", "plain", "%level%"]);
        assert_eq!(
            Argument::from_spec(&spec),
            Argument::List(vec![
                Argument::Service("logger".to_string()),
                Argument::Literal(json!("plain")),
                Argument::Parameter("level".to_string()),
            ])
        );
    }

    #[test]
    fn test_deeply_nested_reference_is_found() {
        let spec = json!({"outer": {"inner": ["@svc"]}});
        let Argument::Map(entries) = Argument::from_spec(&spec) else {
            panic!("expected a map");
        };
        let Argument::Map(inner) = &entries["outer"] else {
            panic!("expected a nested map");
        };
        assert_eq!(
            inner["inner"],
            Argument::List(vec![Argument::Service("svc".to_string())])
        );
    }
}
