//! AST - Abstract Syntax Tree for the Serrate language
//!
//! Every node owns its children outright (`Box` / `Vec`), so a tree is
//! dropped recursively by whoever holds the root. Nodes are built through
//! the constructor functions below and never mutated afterwards.

use serde::Serialize;
use std::fmt;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
}

impl BinOp {
    pub fn as_char(&self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    /// `-x`
    #[serde(rename = "-")]
    Neg,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Neg => write!(f, "-"),
        }
    }
}

/// Syntactic category of a node, independent of its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    Function,
    Let,
    If,
    While,
    Return,
    Identifier,
    IntegerLiteral,
    BinaryOp,
    UnaryOp,
}

/// A node of the syntax tree
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "node")]
pub enum Node {
    /// Root of a parsed source buffer
    Program { statements: Vec<Node> },

    /// `func name ... end`
    Function { name: String, body: Vec<Node> },

    /// `let name = value`
    Let { name: String, value: Box<Node> },

    /// `if condition ... end`
    If { condition: Box<Node>, body: Vec<Node> },

    /// `while condition ... end`
    While { condition: Box<Node>, body: Vec<Node> },

    /// `return value`
    Return { value: Box<Node> },

    Identifier { name: String },

    IntegerLiteral { value: i64 },

    BinaryOp {
        op: BinOp,
        left: Box<Node>,
        right: Box<Node>,
    },

    UnaryOp { op: UnaryOp, operand: Box<Node> },
}

impl Node {
    // =========================================
    // Builders
    // =========================================

    pub fn integer(value: i64) -> Node {
        Node::IntegerLiteral { value }
    }

    /// Identifier node holding its own copy of `name`
    pub fn identifier(name: &str) -> Node {
        Node::Identifier {
            name: name.to_owned(),
        }
    }

    pub fn binary(op: BinOp, left: Node, right: Node) -> Node {
        Node::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, operand: Node) -> Node {
        Node::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn program(statements: Vec<Node>) -> Node {
        Node::Program { statements }
    }

    pub fn function(name: impl Into<String>, body: Vec<Node>) -> Node {
        Node::Function {
            name: name.into(),
            body,
        }
    }

    pub fn let_binding(name: impl Into<String>, value: Node) -> Node {
        Node::Let {
            name: name.into(),
            value: Box::new(value),
        }
    }

    pub fn if_block(condition: Node, body: Vec<Node>) -> Node {
        Node::If {
            condition: Box::new(condition),
            body,
        }
    }

    pub fn while_loop(condition: Node, body: Vec<Node>) -> Node {
        Node::While {
            condition: Box::new(condition),
            body,
        }
    }

    pub fn return_value(value: Node) -> Node {
        Node::Return {
            value: Box::new(value),
        }
    }

    // =========================================
    // Accessors
    // =========================================

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Program { .. } => NodeKind::Program,
            Node::Function { .. } => NodeKind::Function,
            Node::Let { .. } => NodeKind::Let,
            Node::If { .. } => NodeKind::If,
            Node::While { .. } => NodeKind::While,
            Node::Return { .. } => NodeKind::Return,
            Node::Identifier { .. } => NodeKind::Identifier,
            Node::IntegerLiteral { .. } => NodeKind::IntegerLiteral,
            Node::BinaryOp { .. } => NodeKind::BinaryOp,
            Node::UnaryOp { .. } => NodeKind::UnaryOp,
        }
    }

    /// Name carried by functions, bindings and identifiers
    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Function { name, .. } | Node::Let { name, .. } | Node::Identifier { name } => {
                Some(name.as_str())
            }
            _ => None,
        }
    }

    /// The condition of an `if` or `while`
    pub fn condition(&self) -> Option<&Node> {
        match self {
            Node::If { condition, .. } | Node::While { condition, .. } => Some(&**condition),
            _ => None,
        }
    }

    /// Statement sequence of the program or of a block
    pub fn body(&self) -> Option<&[Node]> {
        match self {
            Node::Program { statements: body }
            | Node::Function { body, .. }
            | Node::If { body, .. }
            | Node::While { body, .. } => Some(body.as_slice()),
            _ => None,
        }
    }

    /// Ordinary children in source order. The condition is not included.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Let { value, .. } | Node::Return { value } => vec![&**value],
            Node::BinaryOp { left, right, .. } => vec![&**left, &**right],
            Node::UnaryOp { operand, .. } => vec![&**operand],
            Node::Identifier { .. } | Node::IntegerLiteral { .. } => Vec::new(),
            Node::Program { statements: body }
            | Node::Function { body, .. }
            | Node::If { body, .. }
            | Node::While { body, .. } => body.iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_move_children() {
        let node = Node::binary(BinOp::Sub, Node::identifier("a"), Node::integer(1));
        match &node {
            Node::BinaryOp { op, left, right } => {
                assert_eq!(*op, BinOp::Sub);
                assert_eq!(**left, Node::identifier("a"));
                assert_eq!(**right, Node::integer(1));
            }
            other => panic!("Expected BinaryOp, got {:?}", other),
        }
        assert_eq!(node.children().len(), 2);
    }

    #[test]
    fn test_kinds_and_accessors() {
        let node = Node::while_loop(
            Node::identifier("x"),
            vec![Node::let_binding("y", Node::integer(1))],
        );
        assert_eq!(node.kind(), NodeKind::While);
        assert_eq!(node.condition(), Some(&Node::identifier("x")));
        assert_eq!(node.body().map(<[Node]>::len), Some(1));
        assert_eq!(node.children()[0].name(), Some("y"));
        assert_eq!(node.children()[0].kind(), NodeKind::Let);
        assert_eq!(Node::integer(3).body(), None);
    }

    #[test]
    fn test_serialize_shape() {
        let node = Node::unary(UnaryOp::Neg, Node::integer(5));
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "node": "UnaryOp",
                "op": "-",
                "operand": { "node": "IntegerLiteral", "value": 5 }
            })
        );
    }
}
