//! Lowering tests: build a program, analyze it, lower it, verify the
//! module, and assert on the printed IR.


use inkwell::context::Context;

use slc_ir::{NodeArena, NodeId, NodeKind, OpKind, ScopeArena};
use slc_types::TypeInfo;

use crate::context::CodegenCx;
use crate::gen::IrGen;

/// Analyze and lower an arena; panic if the LLVM verifier objects.
///
/// Returns the module's textual IR for assertions.
pub(crate) fn lower_to_ir(nodes: &mut NodeArena) -> String {
    let mut scopes = ScopeArena::new();
    slc_sema::analyze(nodes, &mut scopes).expect("analysis succeeds");

    let context = Context::create();
    let cx = CodegenCx::new(&context, "test");
    let mut gen = IrGen::new(&cx, nodes, &scopes);
    gen.lower_module().expect("lowering succeeds");

    if let Err(message) = cx.llmod().verify() {
        panic!("module failed verification:\n{}", message.to_string());
    }
    cx.llmod().print_to_string().to_string()
}

/// Analyze and lower, expecting the generator to reject the program.
pub(crate) fn lowering_fails(nodes: &mut NodeArena) {
    let mut scopes = ScopeArena::new();
    slc_sema::analyze(nodes, &mut scopes).expect("analysis succeeds");

    let context = Context::create();
    let cx = CodegenCx::new(&context, "test");
    let mut gen = IrGen::new(&cx, nodes, &scopes);
    assert!(gen.lower_module().is_none(), "lowering should fail");
}

// -- Program builders (the parser's job, done by hand) --

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

pub(crate) fn wrap_main(nodes: &mut NodeArena, exprs: &[NodeId], ret: NodeId) -> NodeId {
    let func = nodes.alloc(NodeKind::FunctionDefinition, "main");
    let b = body(nodes, exprs, ret);
    nodes.add_child(func, b);
    nodes.add_child(NodeArena::ROOT, func);
    func
}

pub(crate) fn do_loop(
    nodes: &mut NodeArena,
    iter_name: &str,
    list: NodeId,
    loop_ret: NodeId,
) -> NodeId {
    let iter = nodes.alloc(NodeKind::IteratorDefinition { list: None }, iter_name);
    nodes.add_child(iter, list);
    let b = body(nodes, &[], loop_ret);
    let id = nodes.alloc(NodeKind::DoLoop, "");
    nodes.add_child(id, iter);
    nodes.add_child(id, b);
    id
}
