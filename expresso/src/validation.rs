//! Static checks that run without evaluating anything
//!
//! [`validate_syntax`] only parses. [`validate_with_context`] also walks the
//! tree and reports unbound variables, unknown functions and wrong argument
//! counts. Variables that are the direct target of a null-safe access are
//! allowed to be unbound, since evaluation treats them as null.

use std::collections::HashSet;
use std::fmt;

use expresso_parser::{Expr, ExprKind, ParseError, Span};

use crate::context::Context;
use crate::error::RegistryError;
use crate::registry::FunctionRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueCategory {
    Syntax,
    UndefinedVariable,
    UnknownFunction,
    ArityMismatch,
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IssueCategory::Syntax => "syntax error",
            IssueCategory::UndefinedVariable => "undefined variable",
            IssueCategory::UnknownFunction => "unknown function",
            IssueCategory::ArityMismatch => "arity mismatch",
        };
        f.write_str(name)
    }
}

/// A single problem found by validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub category: IssueCategory,
    pub message: String,
    pub span: Option<Span>,
}

impl ValidationIssue {
    pub fn new(category: IssueCategory, message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            category,
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.span {
            Some(span) => write!(
                f,
                "{}: {} at {}:{}",
                self.category, self.message, span.start_line, span.start_column
            ),
            None => write!(f, "{}: {}", self.category, self.message),
        }
    }
}

/// Outcome of validation; valid when no issue was found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Issues of one category
    pub fn of_category(&self, category: IssueCategory) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.category == category)
    }

    fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return write!(f, "valid");
        }
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}

fn syntax_issue(err: &ParseError) -> ValidationIssue {
    ValidationIssue::new(IssueCategory::Syntax, err.to_string(), Some(*err.span()))
}

/// Check that `source` parses
pub fn validate_syntax(source: &str) -> ValidationResult {
    let mut result = ValidationResult::default();
    if let Err(err) = expresso_parser::parse(source) {
        result.push(syntax_issue(&err));
    }
    result
}

/// Check that `source` parses and that its variables and calls resolve
pub fn validate_with_context(
    source: &str,
    context: &Context,
    registry: &FunctionRegistry,
) -> ValidationResult {
    match expresso_parser::parse(source) {
        Ok(expr) => validate_expr(&expr, context, registry),
        Err(err) => ValidationResult {
            issues: vec![syntax_issue(&err)],
        },
    }
}

/// Check an already parsed tree against a context and registry
pub fn validate_expr(expr: &Expr, context: &Context, registry: &FunctionRegistry) -> ValidationResult {
    let optional_roots = null_safe_roots(expr);
    let mut result = ValidationResult::default();

    for node in expr.walk() {
        match &node.kind {
            ExprKind::Variable(name)
                if !context.contains(name) && !optional_roots.contains(&node.span) =>
            {
                result.push(ValidationIssue::new(
                    IssueCategory::UndefinedVariable,
                    format!("variable '{}' is not defined", name),
                    Some(node.span),
                ));
            }
            ExprKind::Call { name, args } => {
                check_call(registry, name, args.len(), node.span, &mut result);
            }
            ExprKind::MethodCall { name, args, .. } => {
                check_call(registry, name, args.len() + 1, node.span, &mut result);
            }
            _ => {}
        }
    }

    tracing::debug!(issues = result.issues.len(), "validated expression");
    result
}

fn check_call(
    registry: &FunctionRegistry,
    name: &str,
    argc: usize,
    span: Span,
    result: &mut ValidationResult,
) {
    let Err(err) = registry.resolve(name, argc) else {
        return;
    };
    let category = match &err {
        RegistryError::UnknownFunction { .. } => IssueCategory::UnknownFunction,
        RegistryError::ArityMismatch { .. } => IssueCategory::ArityMismatch,
        // argument kinds are only known at run time
        RegistryError::TypeMismatch { .. } => return,
    };
    result.push(ValidationIssue::new(category, err.to_string(), Some(span)));
}

/// Spans of variables that are the direct target of a null-safe segment
fn null_safe_roots(expr: &Expr) -> HashSet<Span> {
    expr.walk()
        .filter_map(|node| match &node.kind {
            ExprKind::NullSafeMember { target, .. } | ExprKind::NullSafeIndex { target, .. } => {
                Some(target)
            }
            ExprKind::MethodCall {
                receiver,
                null_safe: true,
                ..
            } => Some(receiver),
            _ => None,
        })
        .filter(|target| matches!(target.kind, ExprKind::Variable(_)))
        .map(|target| target.span)
        .collect()
}
