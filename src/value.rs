//! The data-access collaborator: the interface the interpreter uses to reflect into
//! caller-supplied data, plus a `serde_json`-backed default implementation.

/// The semantic shape a data handle is classified into before the interpreter decides how
/// to resolve a name or iterate a section against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Map,
    Struct,
    List,
    Value,
    Nil,
}

/// The external data-access collaborator. The interpreter is generic over this trait so it
/// never depends on one specific reflection mechanism; `JsonValue` below is the default,
/// testable instance backed by `serde_json::Value`.
pub trait DataAccess: Sized {
    fn type_of(&self) -> DataType;
    fn length_of(&self) -> usize;
    fn get_field(&self, name: &str) -> Option<Self>;
    fn get_key(&self, name: &str) -> Option<Self>;
    fn has_key(&self, name: &str) -> bool;
    fn index_at(&self, index: usize) -> Option<Self>;
    fn to_render_string(&self) -> String;

    /// Construct a synthetic scalar boolean value. Used by the interpreter for inverted
    /// sections and for sections whose name did not resolve at all.
    fn bool_value(value: bool) -> Self;
    fn is_nil(&self) -> bool {
        matches!(self.type_of(), DataType::Nil)
    }

    /// Whether this value is truthy for section-emission purposes: non-empty
    /// maps/structs/lists, or a scalar whose rendered string form is not in the falsey set
    /// `{"", "false", "null"}`. Nil is always falsey.
    fn is_truthy(&self) -> bool {
        match self.type_of() {
            DataType::Nil => false,
            DataType::Map | DataType::Struct | DataType::List => self.length_of() > 0,
            DataType::Value => !matches!(self.to_render_string().as_str(), "" | "false" | "null"),
        }
    }
}

/// The default data-access implementation, wrapping `serde_json::Value`. JSON has no
/// separate struct/map distinction, so every JSON object classifies as `Map`; the
/// `DataType::Struct` variant exists for other `DataAccess` implementers backed by a real
/// reflection mechanism over typed Rust values.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonValue(pub serde_json::Value);

impl From<serde_json::Value> for JsonValue {
    fn from(value: serde_json::Value) -> Self {
        JsonValue(value)
    }
}

impl DataAccess for JsonValue {
    fn type_of(&self) -> DataType {
        match &self.0 {
            serde_json::Value::Null => DataType::Nil,
            serde_json::Value::Object(_) => DataType::Map,
            serde_json::Value::Array(_) => DataType::List,
            _ => DataType::Value,
        }
    }

    fn length_of(&self) -> usize {
        match &self.0 {
            serde_json::Value::Object(map) => map.len(),
            serde_json::Value::Array(list) => list.len(),
            serde_json::Value::Null => 0,
            serde_json::Value::String(s) => s.chars().count(),
            _ => 0,
        }
    }

    fn get_field(&self, _name: &str) -> Option<Self> {
        // JSON carries no struct type distinct from `Map`; field access degrades to key access.
        None
    }

    fn get_key(&self, name: &str) -> Option<Self> {
        match &self.0 {
            serde_json::Value::Object(map) => map.get(name).cloned().map(JsonValue),
            _ => None,
        }
    }

    fn has_key(&self, name: &str) -> bool {
        matches!(&self.0, serde_json::Value::Object(map) if map.contains_key(name))
    }

    fn index_at(&self, index: usize) -> Option<Self> {
        match &self.0 {
            serde_json::Value::Array(list) => list.get(index).cloned().map(JsonValue),
            _ => None,
        }
    }

    fn to_render_string(&self) -> String {
        match &self.0 {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Bool(b) => b.to_string(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => String::new(),
        }
    }

    fn bool_value(value: bool) -> Self {
        JsonValue(serde_json::Value::Bool(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_json_variants() {
        assert_eq!(JsonValue(json!(null)).type_of(), DataType::Nil);
        assert_eq!(JsonValue(json!({})).type_of(), DataType::Map);
        assert_eq!(JsonValue(json!([])).type_of(), DataType::List);
        assert_eq!(JsonValue(json!("x")).type_of(), DataType::Value);
    }

    #[test]
    fn falsey_set_matches_spec() {
        assert!(!JsonValue(json!("")).is_truthy());
        assert!(!JsonValue(json!(false)).is_truthy());
        assert!(!JsonValue(json!(null)).is_truthy());
        assert!(JsonValue(json!("false positive")).is_truthy());
        assert!(JsonValue(json!(0)).is_truthy());
    }

    #[test]
    fn empty_containers_are_falsey() {
        assert!(!JsonValue(json!([])).is_truthy());
        assert!(!JsonValue(json!({})).is_truthy());
        assert!(JsonValue(json!([1])).is_truthy());
    }
}
