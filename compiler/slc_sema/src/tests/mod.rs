//! Test support for the analyzer: programmatic AST construction.

mod analyzer_tests;

use slc_ir::{NodeArena, NodeId, NodeKind, OpKind, ScopeArena};
use slc_types::TypeInfo;

use crate::{analyze, SemaProblem};

/// Run the analyzer over an arena, returning the populated scopes.
pub(crate) fn run(nodes: &mut NodeArena) -> Result<ScopeArena, SemaProblem> {
    let mut scopes = ScopeArena::new();
    analyze(nodes, &mut scopes)?;
    Ok(scopes)
}

pub(crate) fn var(nodes: &mut NodeArena, name: &str) -> NodeId {
    nodes.alloc(NodeKind::VariableRef { resolution: None }, name)
}

pub(crate) fn call(nodes: &mut NodeArena, name: &str, args: &[NodeId]) -> NodeId {
    let id = nodes.alloc(NodeKind::FunctionCall { resolution: None }, name);
    for &arg in args {
        nodes.add_child(id, arg);
    }
    id
}

pub(crate) fn binary(nodes: &mut NodeArena, op: OpKind, lhs: NodeId, rhs: NodeId) -> NodeId {
    let id = nodes.alloc(NodeKind::BinaryOp(op), "");
    nodes.add_child(id, lhs);
    nodes.add_child(id, rhs);
    id
}

pub(crate) fn unary(nodes: &mut NodeArena, op: OpKind, operand: NodeId) -> NodeId {
    let id = nodes.alloc(NodeKind::UnaryOp(op), "");
    nodes.add_child(id, operand);
    id
}

/// A literal cons list from already-built element expressions.
pub(crate) fn list_of(nodes: &mut NodeArena, elements: &[NodeId]) -> NodeId {
    let mut tail: Option<NodeId> = None;
    for &head in elements.iter().rev() {
        let link = nodes.alloc(NodeKind::List { head: Some(head), tail }, "");
        nodes.add_child(link, head);
        if let Some(t) = tail {
            nodes.add_child(link, t);
        }
        tail = Some(link);
    }
    tail.expect("list literal needs at least one element")
}

pub(crate) fn list_op(nodes: &mut NodeArena, op: OpKind, list: NodeId) -> NodeId {
    let id = nodes.alloc(NodeKind::ListOp(op), "");
    nodes.add_child(id, list);
    id
}

pub(crate) fn if_expr(
    nodes: &mut NodeArena,
    cond: NodeId,
    affirmative: NodeId,
    alternative: NodeId,
) -> NodeId {
    let id = nodes.alloc(NodeKind::IfExpr, "");
    nodes.add_child(id, cond);
    nodes.add_child(id, affirmative);
    nodes.add_child(id, alternative);
    id
}

pub(crate) fn body(nodes: &mut NodeArena, side_effects: &[NodeId], ret: NodeId) -> NodeId {
    let id = nodes.alloc(
        NodeKind::FunctionBody {
            return_expression: Some(ret),
        },
        "",
    );
    for &child in side_effects {
        nodes.add_child(id, child);
    }
    nodes.add_child(id, ret);
    id
}

/// A named function attached to the root: `(define (name params...) ret)`.
pub(crate) fn define_function(
    nodes: &mut NodeArena,
    name: &str,
    params: &[(&str, TypeInfo)],
    ret: NodeId,
) -> NodeId {
    let func = nodes.alloc(NodeKind::FunctionDefinition, name);
    for (param, ty) in params {
        let formal = nodes.alloc(NodeKind::Formal, *param);
        nodes.set_type(formal, ty.clone());
        nodes.add_child(func, formal);
    }
    let b = body(nodes, &[], ret);
    nodes.add_child(func, b);
    nodes.add_child(NodeArena::ROOT, func);
    func
}

/// A variable definition attached to a parent node.
pub(crate) fn define_variable(
    nodes: &mut NodeArena,
    parent: NodeId,
    name: &str,
    init: NodeId,
) -> NodeId {
    let def = nodes.alloc(NodeKind::VariableDefinition, name);
    nodes.add_child(def, init);
    nodes.add_child(parent, def);
    def
}

/// Attach an expression to the root wrapped in a `main` function, the way
/// the front end wraps top-level expressions.
pub(crate) fn wrap_main(nodes: &mut NodeArena, exprs: &[NodeId], ret: NodeId) -> NodeId {
    let func = nodes.alloc(NodeKind::FunctionDefinition, "main");
    let b = body(nodes, exprs, ret);
    nodes.add_child(func, b);
    nodes.add_child(NodeArena::ROOT, func);
    func
}
