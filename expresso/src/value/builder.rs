use super::{Value, ValueMap};

enum Frame {
    Map { key: Option<String>, entries: ValueMap },
    List { key: String, items: Vec<Value> },
}

/// Fluent builder for nested map values
///
/// ```
/// use expresso::{MapBuilder, Value};
///
/// let user = MapBuilder::new()
///     .set("name", "Ada")
///     .object("address")
///     .set("city", "London")
///     .end()
///     .list("tags")
///     .add("admin")
///     .end()
///     .build();
///
/// let city = user.property("address").and_then(|a| a.property("city"));
/// assert_eq!(city, Some(Value::from("London")));
/// ```
pub struct MapBuilder {
    stack: Vec<Frame>,
}

impl std::fmt::Debug for MapBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapBuilder")
            .field("depth", &self.stack.len())
            .finish()
    }
}

impl Default for MapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MapBuilder {
    pub fn new() -> Self {
        Self {
            stack: vec![Frame::Map {
                key: None,
                entries: ValueMap::new(),
            }],
        }
    }

    /// Set a key on the current map, or append to the current list
    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        match self.stack.last_mut() {
            Some(Frame::Map { entries, .. }) => {
                entries.insert(key.to_string(), value);
            }
            Some(Frame::List { items, .. }) => items.push(value),
            None => {}
        }
        self
    }

    /// Start a nested map under `key`
    pub fn object(mut self, key: &str) -> Self {
        self.stack.push(Frame::Map {
            key: Some(key.to_string()),
            entries: ValueMap::new(),
        });
        self
    }

    /// Start a nested list under `key`
    pub fn list(mut self, key: &str) -> Self {
        self.stack.push(Frame::List {
            key: key.to_string(),
            items: Vec::new(),
        });
        self
    }

    /// Append a value to the current list
    pub fn add(mut self, value: impl Into<Value>) -> Self {
        if let Some(Frame::List { items, .. }) = self.stack.last_mut() {
            items.push(value.into());
        }
        self
    }

    /// Start a map that becomes the next element of the current list
    pub fn add_object(mut self) -> Self {
        self.stack.push(Frame::Map {
            key: None,
            entries: ValueMap::new(),
        });
        self
    }

    /// Close the innermost nested map or list
    pub fn end(mut self) -> Self {
        if self.stack.len() > 1 {
            if let Some(frame) = self.stack.pop() {
                self.attach(frame);
            }
        }
        self
    }

    fn attach(&mut self, frame: Frame) {
        let (key, value) = match frame {
            Frame::Map { key, entries } => (key, Value::from(entries)),
            Frame::List { key, items } => (Some(key), Value::from(items)),
        };
        match (self.stack.last_mut(), key) {
            (Some(Frame::Map { entries, .. }), Some(key)) => {
                entries.insert(key, value);
            }
            (Some(Frame::List { items, .. }), _) => items.push(value),
            _ => {}
        }
    }

    /// Close any open frames and return the root map
    pub fn build(mut self) -> Value {
        while self.stack.len() > 1 {
            if let Some(frame) = self.stack.pop() {
                self.attach(frame);
            }
        }
        match self.stack.pop() {
            Some(Frame::Map { entries, .. }) => Value::from(entries),
            _ => Value::from(ValueMap::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_of_objects() {
        let value = MapBuilder::new()
            .list("orders")
            .add_object()
            .set("id", 1)
            .end()
            .add_object()
            .set("id", 2)
            .end()
            .end()
            .build();
        let orders = value.property("orders").unwrap();
        let orders = orders.as_list().unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[1].property("id"), Some(Value::from(2)));
    }

    #[test]
    fn test_build_closes_open_frames() {
        let value = MapBuilder::new().object("a").object("b").set("c", true).build();
        let c = value
            .property("a")
            .and_then(|a| a.property("b"))
            .and_then(|b| b.property("c"));
        assert_eq!(c, Some(Value::Bool(true)));
    }

    #[test]
    fn test_end_at_root_is_ignored() {
        let value = MapBuilder::new().end().set("x", 1).build();
        assert_eq!(value.property("x"), Some(Value::from(1)));
    }
}
