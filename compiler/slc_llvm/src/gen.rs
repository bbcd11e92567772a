//! The IR generator: a second walker over the analyzed arena.
//!
//! Lowering assumes semantic analysis has completed: every expression has
//! a resolved type, every use site a resolution, every node a scope.
//! Failure propagation matches the analyzer's policy in spirit: each
//! lowering returns a value or `None`, with the diagnostic emitted at the
//! failure site, and `None` short-circuits to the driver.

use inkwell::types::BasicTypeEnum;
use inkwell::values::{BasicValueEnum, FunctionValue, PointerValue};
use rustc_hash::FxHashMap;
use tracing::instrument;

use slc_diagnostic::{Diagnostic, TerminalEmitter};
use slc_ir::{NodeArena, NodeId, NodeKind, ScopeArena, ScopeId};
use slc_types::TypeInfo;

use crate::builder::Builder;
use crate::context::CodegenCx;
use crate::runtime_decl::{declare_runtime, ListWidth};

/// A stack slot for a local binding: the alloca, its value type, and the
/// function the slot belongs to (a slot is only loadable from inside its
/// own function).
#[derive(Copy, Clone)]
pub(crate) struct AllocaSlot<'ll> {
    pub ptr: PointerValue<'ll>,
    pub ty: BasicTypeEnum<'ll>,
    pub owner: FunctionValue<'ll>,
}

/// Lowers a typed arena into an LLVM module.
pub struct IrGen<'ll, 'a> {
    pub(crate) cx: &'a CodegenCx<'ll>,
    pub(crate) bx: Builder<'ll>,
    pub(crate) nodes: &'a NodeArena,
    pub(crate) scopes: &'a ScopeArena,
    /// SSA values: function parameters and loop iteration variables.
    pub(crate) named_values: FxHashMap<String, BasicValueEnum<'ll>>,
    /// Stack slots for local definitions, keyed by defining scope and name.
    pub(crate) allocas: FxHashMap<(ScopeId, String), AllocaSlot<'ll>>,
}

impl<'ll, 'a> IrGen<'ll, 'a> {
    pub fn new(cx: &'a CodegenCx<'ll>, nodes: &'a NodeArena, scopes: &'a ScopeArena) -> Self {
        IrGen {
            cx,
            bx: Builder::new(cx),
            nodes,
            scopes,
            named_values: FxHashMap::default(),
            allocas: FxHashMap::default(),
        }
    }

    /// Lower the whole module: runtime declarations first, then every
    /// top-level definition.
    #[instrument(skip(self), name = "codegen")]
    pub fn lower_module(&mut self) -> Option<()> {
        declare_runtime(&self.cx.scx);
        for &child in self.nodes.children(NodeArena::ROOT) {
            self.lower_node(child)?;
        }
        Some(())
    }

    pub(crate) fn lower_node(&mut self, id: NodeId) -> Option<BasicValueEnum<'ll>> {
        match self.nodes.get(id).kind.clone() {
            NodeKind::Root => self.internal_error("visited the root as an expression"),
            NodeKind::Literal(value) => self.lower_literal(id, &value),
            NodeKind::VariableRef { resolution } => self.lower_variable_ref(id, resolution),
            NodeKind::BinaryOp(op) => self.lower_binary_op(id, op),
            NodeKind::UnaryOp(op) => self.lower_unary_op(id, op),
            NodeKind::ListOp(op) => self.lower_list_op(id, op),
            NodeKind::IfExpr => self.lower_if_expr(id),
            NodeKind::List { head, tail } => self.lower_list_literal(id, head, tail),
            NodeKind::Formal => self.internal_error("attempted to lower a formal parameter"),
            NodeKind::VariableDefinition => self.lower_variable_definition(id),
            NodeKind::FunctionDefinition | NodeKind::Lambda => self.lower_callable(id),
            NodeKind::ExternFunction => self.lower_extern_function(id),
            NodeKind::FunctionCall { resolution } => self.lower_call(id, resolution),
            NodeKind::FunctionBody { .. } => self.lower_function_body(id),
            NodeKind::SetExpression { resolution } => self.lower_set_expression(id, resolution),
            NodeKind::IteratorDefinition { .. } => {
                self.internal_error("attempted to lower an iterator definition directly")
            }
            NodeKind::DoLoop => self.lower_do_loop(id),
            NodeKind::CollectLoop => self.lower_collect_loop(id),
            NodeKind::WhenLoop => {
                self.error(id, "when loops are not supported in native code generation")
            }
            NodeKind::InfiniteLoop => self.error(
                id,
                "infinite loops are not supported in native code generation",
            ),
        }
    }

    // -- Failure reporting --

    /// Report a user-facing lowering error at a node and fail.
    pub(crate) fn error(&self, id: NodeId, message: impl Into<String>) -> Option<BasicValueEnum<'ll>> {
        let diag = Diagnostic::error(message, self.nodes.location(id).cloned());
        TerminalEmitter::stderr().emit(&diag);
        None
    }

    /// Report an invariant violation and fail.
    pub(crate) fn internal_error(&self, message: impl Into<String>) -> Option<BasicValueEnum<'ll>> {
        let diag = Diagnostic::internal(message);
        TerminalEmitter::stderr().emit(&diag);
        None
    }

    // -- Shared lookups --

    /// A node's resolved type; absence means analysis never ran.
    pub(crate) fn ty(&self, id: NodeId) -> Option<&TypeInfo> {
        let ty = self.nodes.ty(id);
        if ty.is_none() {
            self.internal_error(format!(
                "untyped node '{}' reached code generation",
                self.nodes.get(id).name
            ));
        }
        ty
    }

    /// The mapped LLVM type of a node's resolved type.
    pub(crate) fn llvm_type_of(&self, id: NodeId) -> Option<BasicTypeEnum<'ll>> {
        let ty = self.ty(id)?.clone();
        match self.cx.llvm_type(&ty) {
            Some(mapped) => Some(mapped),
            None => {
                self.internal_error(format!("type '{ty}' has no native representation"));
                None
            }
        }
    }

    /// Which runtime family a list element type dispatches to.
    pub(crate) fn width_of(&self, elem: &TypeInfo) -> Option<ListWidth> {
        match elem {
            TypeInfo::Int => Some(ListWidth::Int),
            TypeInfo::Float => Some(ListWidth::Double),
            _ => None,
        }
    }

    /// Fetch a declared runtime function by family and operation.
    pub(crate) fn runtime_fn(
        &self,
        width: ListWidth,
        operation: &str,
    ) -> Option<inkwell::values::FunctionValue<'ll>> {
        let name = width.symbol(operation);
        let func = self.cx.llmod().get_function(&name);
        if func.is_none() {
            self.internal_error(format!("runtime function '{name}' is not declared"));
        }
        func
    }
}
