//! Conversion between [`Value`] and `serde_json::Value`

use serde_json::{Map as JsonMap, Number, Value as Json};

use super::{Value, ValueMap};

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            Json::String(s) => Value::from(s),
            Json::Array(items) => Value::list(items.into_iter().map(Value::from)),
            Json::Object(entries) => Value::from(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<ValueMap>(),
            ),
        }
    }
}

impl Value {
    /// Convert to JSON
    ///
    /// Dates become `YYYY-MM-DD` strings, host objects become JSON objects of
    /// their properties and non-finite floats become `null`.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Integer(i) => Json::Number(Number::from(*i)),
            Value::Float(x) => Number::from_f64(*x).map(Json::Number).unwrap_or(Json::Null),
            Value::String(s) => Json::String(s.to_string()),
            Value::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<JsonMap<_, _>>(),
            ),
            Value::Date(d) => Json::String(d.format("%Y-%m-%d").to_string()),
            Value::Object(object) => {
                let mut entries = JsonMap::new();
                for name in object.property_names() {
                    let value = object.property(&name).unwrap_or_default();
                    entries.insert(name, value.to_json());
                }
                Json::Object(entries)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_nested() {
        let value = Value::from(json!({
            "user": { "name": "Ada", "age": 36, "tags": ["a", "b"], "score": 9.5 },
            "missing": null
        }));
        let user = value.property("user").unwrap();
        assert_eq!(user.property("age"), Some(Value::Integer(36)));
        assert_eq!(user.property("score"), Some(Value::Float(9.5)));
        assert_eq!(
            user.property("tags").unwrap().as_list().map(|l| l.len()),
            Some(2)
        );
        assert_eq!(value.property("missing"), Some(Value::Null));
    }

    #[test]
    fn test_to_json() {
        let value = Value::map([
            ("n", Value::from(1)),
            ("f", Value::Float(f64::NAN)),
            ("l", Value::list(vec![Value::from("x")])),
        ]);
        assert_eq!(value.to_json(), json!({ "n": 1, "f": null, "l": ["x"] }));
    }
}
