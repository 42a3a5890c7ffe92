use std::fmt::Debug;

use super::Value;

/// Host objects readable through member access
///
/// Implement this for embedder structs so expressions can read their
/// fields with `.` and `?.`:
///
/// ```
/// use expresso::{PropertyAccess, Value};
///
/// #[derive(Debug)]
/// struct User {
///     name: String,
///     age: i64,
/// }
///
/// impl PropertyAccess for User {
///     fn type_name(&self) -> &str {
///         "User"
///     }
///
///     fn property(&self, name: &str) -> Option<Value> {
///         match name {
///             "name" => Some(Value::from(self.name.as_str())),
///             "age" => Some(Value::from(self.age)),
///             _ => None,
///         }
///     }
///
///     fn property_names(&self) -> Vec<String> {
///         vec!["name".to_string(), "age".to_string()]
///     }
/// }
///
/// let user = Value::object(User { name: "Ada".into(), age: 36 });
/// assert_eq!(user.property("age"), Some(Value::from(36)));
/// ```
pub trait PropertyAccess: Debug + Send + Sync {
    /// Type name shown in messages and by `typeof`
    fn type_name(&self) -> &str;

    /// Read a property; `None` when the object has no such property
    fn property(&self, name: &str) -> Option<Value>;

    /// Names of all readable properties
    fn property_names(&self) -> Vec<String>;
}
