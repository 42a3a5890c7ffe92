//! Shared helpers for integration tests
// Each test target uses a different subset of these helpers.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use expresso::*;

/// Evaluate with the built-in registry, panicking on failure
pub fn eval_ok(source: &str, context: &Context) -> Value {
    let registry = FunctionRegistry::with_builtins();
    evaluate(source, context, &registry)
        .unwrap_or_else(|e| panic!("Failed to evaluate: {}\nError: {}", source, e))
}

/// Evaluate expecting an evaluation error and return its kind
pub fn eval_err(source: &str, context: &Context) -> EvalErrorKind {
    let registry = FunctionRegistry::with_builtins();
    match evaluate(source, context, &registry) {
        Ok(value) => panic!("Expected an error from {}, got {:?}", source, value),
        Err(err) => err
            .eval_kind()
            .unwrap_or_else(|| panic!("Expected an evaluation error from {}, got {}", source, err)),
    }
}

/// A user with a nested address, the shape most scenarios navigate
pub fn user_context() -> Context {
    let user = MapBuilder::new()
        .set("name", "Ada")
        .set("age", 36)
        .object("address")
        .set("city", "London")
        .set("zip", Value::Null)
        .end()
        .list("tags")
        .add("admin")
        .add("editor")
        .end()
        .build();
    Context::new()
        .with("user", user)
        .with("values", Value::list((1..=5i64).map(Value::from)))
}

/// Registry with the built-ins plus a `track(...)` function that counts calls
pub struct CallCounter {
    pub registry: FunctionRegistry,
    calls: Arc<AtomicUsize>,
}

impl CallCounter {
    pub fn new() -> Self {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut registry = FunctionRegistry::with_builtins();
        registry.register_fn("track", Arity::AtLeast(0), move |args| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(args.first().cloned().unwrap_or(Value::Integer(1)))
        });
        Self { registry, calls }
    }

    pub fn eval(&self, source: &str, context: &Context) -> Result<Value> {
        evaluate(source, context, &self.registry)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}
