//! AST node types produced by the parser

use std::rc::Rc;

use crate::value::Value;

/// What a single node holds.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// A bracketed sequence of children. At statement level the first child
    /// is the action position and the rest are its arguments.
    Expr(Vec<Node>),
    /// A literal number or string produced directly by the parser.
    Value(Value),
    /// A `$name` reference, stored without the leading `$`.
    Word(String),
}

/// One node of a parsed script.
///
/// Cloning a node duplicates its expression structure while sharing the
/// literal payloads and the script-name container. That is the copy a
/// `function` definition takes of its body, so literals mutated in place
/// through one copy stay mutated in every copy.
#[derive(Debug, Clone)]
pub struct Node {
    /// The node payload.
    pub kind: NodeKind,
    /// 1-based source line.
    pub line: u32,
    /// Name of the originating script, shared across the whole tree.
    pub script: Rc<str>,
}

impl Node {
    /// True when this node is a bracketed expression.
    pub fn is_expr(&self) -> bool {
        matches!(self.kind, NodeKind::Expr(_))
    }

    /// The node's children, or `None` for leaves.
    pub fn children(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::Expr(kids) => Some(kids),
            _ => None,
        }
    }
}
