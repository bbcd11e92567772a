//! Node identifiers, kinds, and the node record itself.

use std::fmt;

use slc_types::TypeInfo;

use crate::location::LocationInfo;
use crate::scope::ScopeId;

/// Index into the node arena.
///
/// 4 bytes; equality is an integer compare. `INVALID` is the sentinel for
/// "no node".
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Invalid node ID (sentinel value).
    pub const INVALID: NodeId = NodeId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "NodeId({})", self.0)
        } else {
            write!(f, "NodeId::INVALID")
        }
    }
}

/// Traversal state used for cycle and recursion detection.
///
/// The marks are private to a single traversal: the analyzer's recursive
/// type resolution depends on distinguishing a node that is mid-visit from
/// one whose visit has completed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum VisitState {
    #[default]
    NotVisited,
    Visiting,
    Visited,
}

/// Operator tags shared by binary, unary, and list operations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OpKind {
    Plus,
    Minus,
    Times,
    Divide,
    Greater,
    GreaterEq,
    Less,
    LessEq,
    Equal,
    Not,
    Or,
    And,
    Xor,
    Car,
    Cdr,
    Cons,
    Print,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            OpKind::Plus => "+",
            OpKind::Minus => "-",
            OpKind::Times => "*",
            OpKind::Divide => "/",
            OpKind::Greater => ">",
            OpKind::GreaterEq => ">=",
            OpKind::Less => "<",
            OpKind::LessEq => "<=",
            OpKind::Equal => "=",
            OpKind::Not => "not",
            OpKind::Or => "or",
            OpKind::And => "and",
            OpKind::Xor => "xor",
            OpKind::Car => "car",
            OpKind::Cdr => "cdr",
            OpKind::Cons => "cons",
            OpKind::Print => "print",
        };
        write!(f, "{text}")
    }
}

/// A literal's payload.
#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Float(f64),
    Str(String),
    Nil,
}

/// The tagged variant of a node, with per-variant payloads.
///
/// Resolution pointers (`resolution`, `list`) are non-owning back
/// references filled in by the semantic analyzer.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// The unique tree root; owns the global scope.
    Root,
    /// Leaf literal; its type matches the payload.
    Literal(LiteralValue),
    /// A variable use site; resolves to a variable definition.
    VariableRef { resolution: Option<NodeId> },
    /// Two expression children; comparison or cons.
    BinaryOp(OpKind),
    /// One expression child; not, car, or cdr.
    UnaryOp(OpKind),
    /// One literal-list child; arithmetic fold, logical fold, or print.
    ListOp(OpKind),
    /// Three expression children: condition, affirmative, else.
    IfExpr,
    /// A cons-list literal: head expression and optional tail list.
    List {
        head: Option<NodeId>,
        tail: Option<NodeId>,
    },
    /// A parameter declaration with a declared type.
    Formal,
    /// A binding with one initializer child; typed from the initializer.
    VariableDefinition,
    /// A named callable living in a scope.
    FunctionDefinition,
    /// A callable whose body is provided externally.
    ExternFunction,
    /// An anonymous callable; named synthetically, not inserted by name.
    Lambda,
    /// A call site; resolves to a callable.
    FunctionCall { resolution: Option<NodeId> },
    /// Child expressions, one designated as the return expression.
    FunctionBody { return_expression: Option<NodeId> },
    /// Assignment to an existing binding; resolves to its definition.
    SetExpression { resolution: Option<NodeId> },
    /// Binds a name to successive elements of a list expression.
    IteratorDefinition { list: Option<NodeId> },
    /// Runs its body per element; yields the last body value.
    DoLoop,
    /// Runs its body per element; yields the list of body values.
    CollectLoop,
    /// Conditional loop; analyzed but not lowered.
    WhenLoop,
    /// Unconditional loop; analyzed but not lowered.
    InfiniteLoop,
}

/// A single AST node.
///
/// Shared fields are uniform across variants; per-variant data lives in
/// [`NodeKind`]. Children are owned by the parent's index list and
/// destroyed with the arena.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub name: String,
    pub location: Option<LocationInfo>,
    pub ty: Option<TypeInfo>,
    pub scope: Option<ScopeId>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub visit: VisitState,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, name: String) -> Self {
        Node {
            kind,
            name,
            location: None,
            ty: None,
            scope: None,
            children: Vec::new(),
            parent: None,
            visit: VisitState::NotVisited,
        }
    }

    /// Whether this node is an expression (produces a value).
    pub fn is_expression(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Literal(_)
                | NodeKind::VariableRef { .. }
                | NodeKind::BinaryOp(_)
                | NodeKind::UnaryOp(_)
                | NodeKind::ListOp(_)
                | NodeKind::IfExpr
                | NodeKind::List { .. }
                | NodeKind::Lambda
                | NodeKind::FunctionCall { .. }
                | NodeKind::SetExpression { .. }
                | NodeKind::DoLoop
                | NodeKind::CollectLoop
                | NodeKind::WhenLoop
                | NodeKind::InfiniteLoop
        )
    }

    /// Whether this node is a definition (insertable into a scope).
    pub fn is_definition(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::VariableDefinition
                | NodeKind::Formal
                | NodeKind::FunctionDefinition
                | NodeKind::ExternFunction
                | NodeKind::IteratorDefinition { .. }
        )
    }

    /// Whether a function call can resolve to this node.
    pub fn is_callable(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::FunctionDefinition | NodeKind::ExternFunction | NodeKind::Lambda
        )
    }

    pub fn is_root(&self) -> bool {
        matches!(self.kind, NodeKind::Root)
    }

    pub fn visited(&self) -> bool {
        self.visit == VisitState::Visited
    }

    pub fn visiting(&self) -> bool {
        self.visit == VisitState::Visiting
    }
}
