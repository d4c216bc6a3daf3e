use crate::value::DataAccess;

/// One level of the resolution stack. Index 0 of the owning [`ContextStack`] is innermost.
pub struct ContextFrame<V> {
    pub data: V,
    pub label: String,
}

impl<V> ContextFrame<V> {
    pub fn new(data: V, label: impl Into<String>) -> Self {
        Self {
            data,
            label: label.into(),
        }
    }
}

/// The interpreter's stack of data contexts, innermost-first. Pushed on section open,
/// popped on section close; name resolution walks outward from the top.
pub struct ContextStack<V> {
    frames: Vec<ContextFrame<V>>,
}

impl<V: DataAccess + Clone> ContextStack<V> {
    pub fn new(root: V) -> Self {
        Self {
            frames: vec![ContextFrame::new(root, "ROOT")],
        }
    }

    pub fn push(&mut self, frame: ContextFrame<V>) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<ContextFrame<V>> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    pub fn top(&self) -> &ContextFrame<V> {
        self.frames.last().expect("root frame is never popped")
    }

    /// Whether the current top-of-stack frame should emit content: the root frame always
    /// does, any other frame does when its data is truthy (§4.4).
    pub fn top_is_truthy(&self) -> bool {
        let top = self.top();
        top.label == "ROOT" || top.data.is_truthy()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Resolve a dotted name against the stack. `"."` refers to the innermost frame's data
    /// directly. The first frame (innermost to outermost) that binds the head of the path
    /// fixes the value; remaining dotted segments are resolved strictly against that
    /// intermediate value without re-walking the stack.
    pub fn resolve(&self, name: &str) -> Option<V> {
        if name == "." {
            return Some(self.top().data.clone());
        }

        let mut parts = name.split('.');
        let head = parts.next()?;

        // A frame that binds `head` to an explicit nil does not fix the binding: the walk
        // continues outward looking for a frame with a non-nil value (§4.3).
        let mut bound = self
            .frames
            .iter()
            .rev()
            .find_map(|frame| resolve_one(&frame.data, head).filter(|v| !v.is_nil()))?;

        for part in parts {
            bound = resolve_one(&bound, part)?;
        }
        Some(bound)
    }
}

fn resolve_one<V: DataAccess + Clone>(data: &V, name: &str) -> Option<V> {
    use crate::value::DataType;
    match data.type_of() {
        DataType::Struct => data.get_field(name),
        DataType::Map => data.get_key(name),
        DataType::List | DataType::Value | DataType::Nil => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::JsonValue;
    use serde_json::json;

    #[test]
    fn resolves_dotted_name_from_root() {
        let stack = ContextStack::new(JsonValue(json!({"a": {"b": "x"}})));
        let resolved = stack.resolve("a.b").unwrap();
        assert_eq!(resolved.to_render_string(), "x");
    }

    #[test]
    fn inner_frame_shadows_outer() {
        let mut stack = ContextStack::new(JsonValue(json!({"name": "outer"})));
        stack.push(ContextFrame::new(JsonValue(json!({"name": "inner"})), "section"));
        assert_eq!(stack.resolve("name").unwrap().to_render_string(), "inner");
    }

    #[test]
    fn falls_through_to_outer_frame_when_inner_lacks_key() {
        let mut stack = ContextStack::new(JsonValue(json!({"name": "outer"})));
        stack.push(ContextFrame::new(JsonValue(json!({"other": "x"})), "section"));
        assert_eq!(stack.resolve("name").unwrap().to_render_string(), "outer");
    }

    #[test]
    fn dot_resolves_innermost_value_directly() {
        let mut stack = ContextStack::new(JsonValue(json!({})));
        stack.push(ContextFrame::new(JsonValue(json!("leaf")), "xs[0]"));
        assert_eq!(stack.resolve(".").unwrap().to_render_string(), "leaf");
    }

    #[test]
    fn unresolved_name_is_none() {
        let stack = ContextStack::new(JsonValue(json!({})));
        assert!(stack.resolve("missing").is_none());
    }

    #[test]
    fn explicit_nil_in_inner_frame_falls_through_to_outer_binding() {
        let mut stack = ContextStack::new(JsonValue(json!({"name": "outer"})));
        stack.push(ContextFrame::new(JsonValue(json!({"name": null})), "section"));
        assert_eq!(stack.resolve("name").unwrap().to_render_string(), "outer");
    }
}
