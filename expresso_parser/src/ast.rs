//! Expression tree produced by the parser
//!
//! Every node owns its children and carries the span of the source text it
//! was parsed from. A child's span always lies inside its parent's span.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::span::Span;

/// Literal value embedded in the source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// Prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// `-x`
    Negate,
    /// `!x`
    Not,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Not => "!",
        }
    }
}

/// Infix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    /// `a ?? b`: `b` is evaluated only when `a` is null
    Coalesce,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Coalesce => "??",
        }
    }

    /// Operators whose right operand may be skipped
    pub fn is_short_circuit(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or | BinaryOp::Coalesce)
    }
}

/// Node payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    Literal(Literal),
    /// Context variable, written `name` or `$name`
    Variable(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `condition ? then_branch : else_branch`
    Conditional {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    /// `target.name`
    Member { target: Box<Expr>, name: String },
    /// `target?.name`
    NullSafeMember { target: Box<Expr>, name: String },
    /// `target[index]`
    Index { target: Box<Expr>, index: Box<Expr> },
    /// `target?[index]`
    NullSafeIndex { target: Box<Expr>, index: Box<Expr> },
    /// `name(args...)`
    Call { name: String, args: Vec<Expr> },
    /// `receiver.name(args...)` or `receiver?.name(args...)`
    ///
    /// Dispatched to the function `name` with the receiver as first argument.
    MethodCall {
        receiver: Box<Expr>,
        name: String,
        args: Vec<Expr>,
        null_safe: bool,
    },
}

impl ExprKind {
    /// Variant name, used in debug dumps
    pub fn name(&self) -> &'static str {
        match self {
            ExprKind::Literal(_) => "Literal",
            ExprKind::Variable(_) => "Variable",
            ExprKind::Unary { .. } => "Unary",
            ExprKind::Binary { .. } => "Binary",
            ExprKind::Conditional { .. } => "Conditional",
            ExprKind::Member { .. } => "Member",
            ExprKind::NullSafeMember { .. } => "NullSafeMember",
            ExprKind::Index { .. } => "Index",
            ExprKind::NullSafeIndex { .. } => "NullSafeIndex",
            ExprKind::Call { .. } => "Call",
            ExprKind::MethodCall { .. } => "MethodCall",
        }
    }
}

/// A node in the expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Direct children, left to right
    pub fn children(&self) -> Vec<&Expr> {
        match &self.kind {
            ExprKind::Literal(_) | ExprKind::Variable(_) => Vec::new(),
            ExprKind::Unary { operand, .. } => vec![&**operand],
            ExprKind::Binary { left, right, .. } => vec![&**left, &**right],
            ExprKind::Conditional {
                condition,
                then_branch,
                else_branch,
            } => vec![&**condition, &**then_branch, &**else_branch],
            ExprKind::Member { target, .. } | ExprKind::NullSafeMember { target, .. } => {
                vec![&**target]
            }
            ExprKind::Index { target, index } | ExprKind::NullSafeIndex { target, index } => {
                vec![&**target, &**index]
            }
            ExprKind::Call { args, .. } => args.iter().collect(),
            ExprKind::MethodCall { receiver, args, .. } => {
                let mut children = Vec::with_capacity(args.len() + 1);
                children.push(receiver.as_ref());
                children.extend(args.iter());
                children
            }
        }
    }

    /// Walk the tree in pre-order
    pub fn walk(&self) -> ExprWalker<'_> {
        ExprWalker { stack: vec![self] }
    }

    /// Compare two trees ignoring spans
    pub fn same_shape(&self, other: &Expr) -> bool {
        let payload_eq = match (&self.kind, &other.kind) {
            (ExprKind::Literal(a), ExprKind::Literal(b)) => a == b,
            (ExprKind::Variable(a), ExprKind::Variable(b)) => a == b,
            (ExprKind::Unary { op: a, .. }, ExprKind::Unary { op: b, .. }) => a == b,
            (ExprKind::Binary { op: a, .. }, ExprKind::Binary { op: b, .. }) => a == b,
            (ExprKind::Conditional { .. }, ExprKind::Conditional { .. }) => true,
            (ExprKind::Member { name: a, .. }, ExprKind::Member { name: b, .. })
            | (ExprKind::NullSafeMember { name: a, .. }, ExprKind::NullSafeMember { name: b, .. })
            | (ExprKind::Call { name: a, .. }, ExprKind::Call { name: b, .. }) => a == b,
            (ExprKind::Index { .. }, ExprKind::Index { .. })
            | (ExprKind::NullSafeIndex { .. }, ExprKind::NullSafeIndex { .. }) => true,
            (
                ExprKind::MethodCall {
                    name: a,
                    null_safe: sa,
                    ..
                },
                ExprKind::MethodCall {
                    name: b,
                    null_safe: sb,
                    ..
                },
            ) => a == b && sa == sb,
            _ => false,
        };
        if !payload_eq {
            return false;
        }
        let (mine, theirs) = (self.children(), other.children());
        mine.len() == theirs.len() && mine.iter().zip(theirs).all(|(a, b)| a.same_shape(b))
    }

    /// Get the source text covered by this node
    pub fn text_from_source<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.span.start..self.span.end).unwrap_or("")
    }

    /// Indented one-node-per-line dump, for debugging parser output
    ///
    /// ```text
    /// Binary +
    ///   Literal 1
    ///   Variable x
    /// ```
    pub fn debug_ast_string(&self) -> String {
        let mut out = String::new();
        self.write_debug(&mut out, 0);
        out
    }

    fn write_debug(&self, out: &mut String, indent: usize) {
        out.push_str(&"  ".repeat(indent));
        out.push_str(self.kind.name());
        match &self.kind {
            ExprKind::Literal(lit) => {
                out.push(' ');
                out.push_str(&lit.to_string());
            }
            ExprKind::Variable(name)
            | ExprKind::Member { name, .. }
            | ExprKind::NullSafeMember { name, .. }
            | ExprKind::Call { name, .. }
            | ExprKind::MethodCall { name, .. } => {
                out.push(' ');
                out.push_str(name);
            }
            ExprKind::Unary { op, .. } => {
                out.push(' ');
                out.push_str(op.symbol());
            }
            ExprKind::Binary { op, .. } => {
                out.push(' ');
                out.push_str(op.symbol());
            }
            _ => {}
        }
        out.push('\n');
        for child in self.children() {
            child.write_debug(out, indent + 1);
        }
    }

    /// Serialize the tree to JSON
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Tree walker for pre-order traversal
#[derive(Debug)]
pub struct ExprWalker<'a> {
    stack: Vec<&'a Expr>,
}

impl<'a> Iterator for ExprWalker<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children in reverse order so we visit them left-to-right
        self.stack.extend(node.children().into_iter().rev());
        Some(node)
    }
}

// ==================== Rendering ====================

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Integer(i) => write!(f, "{i}"),
            // Debug keeps a fractional part or exponent, so the text lexes as a float
            Literal::Float(x) => write!(f, "{x:?}"),
            Literal::String(s) => write_quoted(f, s),
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            '\0' => f.write_str("\\0")?,
            c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Expr]) -> fmt::Result {
    f.write_str("(")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{arg}")?;
    }
    f.write_str(")")
}

/// Canonical, fully parenthesised rendering that parses back to the same tree
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Literal(lit) => write!(f, "{lit}"),
            ExprKind::Variable(name) => f.write_str(name),
            ExprKind::Unary { op, operand } => write!(f, "({}{operand})", op.symbol()),
            ExprKind::Binary { op, left, right } => {
                write!(f, "({left} {} {right})", op.symbol())
            }
            ExprKind::Conditional {
                condition,
                then_branch,
                else_branch,
            } => write!(f, "({condition} ? {then_branch} : {else_branch})"),
            ExprKind::Member { target, name } => write!(f, "{target}.{name}"),
            ExprKind::NullSafeMember { target, name } => write!(f, "{target}?.{name}"),
            ExprKind::Index { target, index } => write!(f, "{target}[{index}]"),
            ExprKind::NullSafeIndex { target, index } => write!(f, "{target}?[{index}]"),
            ExprKind::Call { name, args } => {
                f.write_str(name)?;
                write_args(f, args)
            }
            ExprKind::MethodCall {
                receiver,
                name,
                args,
                null_safe,
            } => {
                write!(f, "{receiver}{}{name}", if *null_safe { "?." } else { "." })?;
                write_args(f, args)
            }
        }
    }
}

/// Test utilities for building and inspecting trees
#[cfg(any(test, feature = "testing"))]
pub mod testing {
    use super::*;

    /// Literal node with an empty span
    pub fn lit(literal: Literal) -> Expr {
        Expr::new(ExprKind::Literal(literal), Span::default())
    }

    pub fn int(value: i64) -> Expr {
        lit(Literal::Integer(value))
    }

    pub fn var(name: &str) -> Expr {
        Expr::new(ExprKind::Variable(name.to_string()), Span::default())
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            Span::default(),
        )
    }

    pub fn member(target: Expr, name: &str) -> Expr {
        Expr::new(
            ExprKind::Member {
                target: Box::new(target),
                name: name.to_string(),
            },
            Span::default(),
        )
    }

    pub fn call(name: &str, args: Vec<Expr>) -> Expr {
        Expr::new(
            ExprKind::Call {
                name: name.to_string(),
                args,
            },
            Span::default(),
        )
    }

    pub fn not(operand: Expr) -> Expr {
        Expr::new(
            ExprKind::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            },
            Span::default(),
        )
    }

    /// Assert two trees match ignoring spans, showing both on failure.
    pub fn assert_same_shape(actual: &Expr, expected: &Expr) {
        if !actual.same_shape(expected) {
            panic!(
                "trees differ\n=== actual ===\n{}\n=== expected ===\n{}",
                actual.debug_ast_string(),
                expected.debug_ast_string()
            );
        }
    }

    /// Assert that a node has the expected variant, showing the tree on failure.
    pub fn assert_expr_kind(expr: &Expr, expected: &str) {
        if expr.kind.name() != expected {
            panic!(
                "Expected node kind {}, but got {}\n{}",
                expected,
                expr.kind.name(),
                expr.debug_ast_string()
            );
        }
    }
}
