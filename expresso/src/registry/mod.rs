//! Function registry
//!
//! Maps function names to one or more [`FunctionDescriptor`]s. The registry
//! is filled before evaluation and only read afterwards, so it can be shared
//! across threads without locking.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{CallError, RegistryError};
use crate::value::{Value, ValueKind};

/// Callable backing a registered function
pub type NativeFunction = Arc<dyn Fn(&[Value]) -> Result<Value, CallError> + Send + Sync>;

/// Accepted argument counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    Exact(usize),
    /// Inclusive on both ends
    Range { min: usize, max: usize },
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::Range { min, max } => (min..=max).contains(&count),
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::Range { min, max } => write!(f, "{} to {}", min, max),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

/// One overload of a named function
#[derive(Clone)]
pub struct FunctionDescriptor {
    pub name: String,
    pub arity: Arity,
    /// Declared parameter kinds; `None` accepts any arguments
    pub param_kinds: Option<Vec<ValueKind>>,
    pub implementation: NativeFunction,
}

impl fmt::Debug for FunctionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDescriptor")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("param_kinds", &self.param_kinds)
            .finish_non_exhaustive()
    }
}

impl FunctionDescriptor {
    pub fn new<F>(name: impl Into<String>, arity: Arity, implementation: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            param_kinds: None,
            implementation: Arc::new(implementation),
        }
    }

    /// Declare parameter kinds, builder style
    ///
    /// Arguments beyond the declared list are matched against the last kind.
    pub fn with_params(mut self, kinds: impl Into<Vec<ValueKind>>) -> Self {
        self.param_kinds = Some(kinds.into());
        self
    }

    /// Check whether the argument kinds satisfy the declared parameters
    pub fn accepts_args(&self, args: &[Value]) -> bool {
        let Some(kinds) = &self.param_kinds else {
            return true;
        };
        args.iter().enumerate().all(|(i, arg)| {
            kinds
                .get(i)
                .or_else(|| kinds.last())
                .map_or(true, |kind| kind.accepts(arg))
        })
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, CallError> {
        (self.implementation)(args)
    }
}

/// Groups of functions that register together
pub trait FunctionProvider {
    fn register_functions(&self, registry: &mut FunctionRegistry);
}

/// Name to overloads map
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: IndexMap<String, Vec<FunctionDescriptor>>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in function library
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::builtins::register_all(&mut registry);
        registry
    }

    /// Add an overload
    pub fn register(&mut self, descriptor: FunctionDescriptor) {
        tracing::trace!(name = %descriptor.name, arity = %descriptor.arity, "register function");
        self.functions
            .entry(descriptor.name.clone())
            .or_default()
            .push(descriptor);
    }

    /// Add an overload from a closure
    pub fn register_fn<F>(&mut self, name: impl Into<String>, arity: Arity, f: F)
    where
        F: Fn(&[Value]) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        self.register(FunctionDescriptor::new(name, arity, f));
    }

    /// Let a provider register its functions
    pub fn register_provider(&mut self, provider: &dyn FunctionProvider) {
        provider.register_functions(self);
    }

    /// Drop every overload of `name`
    pub fn unregister(&mut self, name: &str) -> bool {
        self.functions.shift_remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    /// Every overload registered under `name`
    pub fn overloads(&self, name: &str) -> &[FunctionDescriptor] {
        self.functions.get(name).map_or(&[], Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Overloads of `name` that accept `argc` arguments
    ///
    /// Fails with `UnknownFunction` when the name is not registered and with
    /// `ArityMismatch` when no overload takes that many arguments.
    pub fn resolve(
        &self,
        name: &str,
        argc: usize,
    ) -> Result<Vec<&FunctionDescriptor>, RegistryError> {
        let overloads = self
            .functions
            .get(name)
            .ok_or_else(|| RegistryError::UnknownFunction {
                name: name.to_string(),
            })?;

        let matching: Vec<&FunctionDescriptor> = overloads
            .iter()
            .filter(|d| d.arity.accepts(argc))
            .collect();

        if matching.is_empty() {
            let expected = overloads
                .iter()
                .map(|d| d.arity.to_string())
                .collect::<Vec<_>>()
                .join(" or ");
            return Err(RegistryError::ArityMismatch {
                name: name.to_string(),
                expected,
                found: argc,
            });
        }

        Ok(matching)
    }

    /// Pick the overload to call for already evaluated arguments
    ///
    /// The first arity-matching overload whose declared kinds accept the
    /// arguments wins.
    pub fn select(
        &self,
        name: &str,
        args: &[Value],
    ) -> Result<&FunctionDescriptor, RegistryError> {
        let candidates = self.resolve(name, args.len())?;
        select_overload(name, &candidates, args)
    }
}

/// Choose among arity-matching candidates by argument kinds
pub(crate) fn select_overload<'d>(
    name: &str,
    candidates: &[&'d FunctionDescriptor],
    args: &[Value],
) -> Result<&'d FunctionDescriptor, RegistryError> {
    candidates
        .iter()
        .copied()
        .find(|d| d.accepts_args(args))
        .ok_or_else(|| RegistryError::TypeMismatch {
            name: name.to_string(),
            found: args.iter().map(Value::kind).collect(),
        })
}
