//! Debug tree dump
//!
//! One node per line, two spaces per level. The condition of an `if` or
//! `while` is printed under a `Condition:` line before the body.
//!
//! ```text
//! PROGRAM
//!   WHILE
//!     Condition:
//!       IDENTIFIER x
//!     LET y
//!       INTEGER 1
//! ```

use crate::ast::Node;
use std::fmt;

/// Renders a tree as indented text
pub fn dump(node: &Node) -> String {
    node.to_string()
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &Node, indent: usize) -> fmt::Result {
    writeln!(f, "{}{}", "  ".repeat(indent), label(node))?;

    if let Some(condition) = node.condition() {
        writeln!(f, "{}Condition:", "  ".repeat(indent + 1))?;
        write_node(f, condition, indent + 2)?;
    }

    for child in node.children() {
        write_node(f, child, indent + 1)?;
    }

    Ok(())
}

fn label(node: &Node) -> String {
    match node {
        Node::Program { .. } => "PROGRAM".to_string(),
        Node::Function { name, .. } => format!("FUNC name={}", name),
        Node::Let { name, .. } => format!("LET {}", name),
        Node::If { .. } => "IF".to_string(),
        Node::While { .. } => "WHILE".to_string(),
        Node::Return { .. } => "RETURN".to_string(),
        Node::Identifier { name } => format!("IDENTIFIER {}", name),
        Node::IntegerLiteral { value } => format!("INTEGER {}", value),
        Node::BinaryOp { op, .. } => format!("BINOP {}", op),
        Node::UnaryOp { op, .. } => format!("UNARY {}", op),
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self, 0)
    }
}
