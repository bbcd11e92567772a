//! Cons-list literal and list operation lowering.

use inkwell::values::BasicValueEnum;

use slc_ir::{NodeId, NodeKind, OpKind};
use slc_types::TypeInfo;

use crate::gen::IrGen;
use crate::runtime_decl::ListWidth;

impl<'ll> IrGen<'ll, '_> {
    /// Lower a list literal.
    ///
    /// A singleton is `create` + `set_head`; anything longer is
    /// `cons(head, tail)`. Every link lowers against the outermost
    /// element type so mixed-but-convertible literals stay one width.
    pub(crate) fn lower_list_literal(
        &mut self,
        id: NodeId,
        head: Option<NodeId>,
        tail: Option<NodeId>,
    ) -> Option<BasicValueEnum<'ll>> {
        let list_ty = self.ty(id)?.clone();
        let Some(elem_ty) = list_ty.subtype().cloned() else {
            return self.internal_error(format!(
                "unresolved subtype for list '{}'",
                self.nodes.get(id).name
            ));
        };
        let Some(width) = self.width_of(&elem_ty) else {
            return self.error(id, format!("unimplemented list type '{list_ty}'"));
        };
        self.lower_list_link(head, tail, &elem_ty, width)
    }

    fn lower_list_link(
        &mut self,
        head: Option<NodeId>,
        tail: Option<NodeId>,
        elem_ty: &TypeInfo,
        width: ListWidth,
    ) -> Option<BasicValueEnum<'ll>> {
        let Some(head) = head else {
            return self.internal_error("list link without a head");
        };
        let head_value = self.maybe_convert(head, elem_ty)?;

        match tail {
            None => {
                let create = self.runtime_fn(width, "create")?;
                let list = self.bx.call(create, &[], "calltmp")?;
                let set_head = self.runtime_fn(width, "set_head")?;
                self.bx.call(set_head, &[list, head_value], "calltmp")?;
                Some(list)
            }
            Some(tail_id) => {
                let NodeKind::List {
                    head: tail_head,
                    tail: tail_tail,
                } = self.nodes.get(tail_id).kind
                else {
                    return self.internal_error("list tail is not a list node");
                };
                let tail_value =
                    self.lower_list_link(tail_head, tail_tail, elem_ty, width)?;
                let cons = self.runtime_fn(width, "cons")?;
                self.bx.call(cons, &[head_value, tail_value], "constmp")
            }
        }
    }

    pub(crate) fn lower_list_op(
        &mut self,
        id: NodeId,
        op: OpKind,
    ) -> Option<BasicValueEnum<'ll>> {
        let Some(&list_expr) = self.nodes.children(id).first() else {
            return self.internal_error("list operation without an operand");
        };
        let list_ty = self.ty(list_expr)?.clone();
        let Some(elem_ty) = list_ty.subtype().cloned() else {
            return self.internal_error("list operation over a non-list");
        };

        match op {
            OpKind::Plus | OpKind::Minus | OpKind::Times | OpKind::Divide => {
                let Some(width) = self.width_of(&elem_ty) else {
                    return self.error(id, format!("unimplemented list type '{list_ty}'"));
                };
                let operation = match op {
                    OpKind::Plus => "add",
                    OpKind::Minus => "subtract",
                    OpKind::Times => "multiply",
                    _ => "divide",
                };
                let list = self.lower_node(list_expr)?;
                let fold = self.runtime_fn(width, operation)?;
                self.bx.call(fold, &[list], "calltmp")
            }
            OpKind::Print => self.lower_print_list(id, list_expr, &elem_ty),
            OpKind::Or | OpKind::And | OpKind::Xor | OpKind::Not => self.error(
                id,
                format!("logical list operator '{op}' is not supported in native code generation"),
            ),
            _ => self.internal_error("operator is not a list operator"),
        }
    }
}
