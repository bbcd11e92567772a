//! Conditional and loop lowering.

use inkwell::values::BasicValueEnum;
use inkwell::IntPredicate;

use slc_ir::{NodeId, NodeKind};
use slc_types::TypeInfo;

use crate::gen::IrGen;
use crate::runtime_decl::ListWidth;

/// What an iteration loop does with each body value.
#[derive(Copy, Clone, PartialEq, Eq)]
enum IterationKind {
    /// Keep the last body value.
    Do,
    /// Append every body value to a fresh result list.
    Collect,
}

impl<'ll> IrGen<'ll, '_> {
    /// Lower an if expression as a diamond with a PHI merge.
    ///
    /// Both branches convert to the if expression's own type before
    /// feeding the PHI; branch lowering can grow new blocks, so the
    /// incoming edges are re-read after each branch.
    pub(crate) fn lower_if_expr(&mut self, id: NodeId) -> Option<BasicValueEnum<'ll>> {
        let children = self.nodes.children(id).to_vec();
        if children.len() != 3 {
            return self.internal_error("if expression without three operands");
        }
        let Some(func) = self.bx.current_function() else {
            return self.internal_error("if expression outside a function");
        };

        let cond = self
            .maybe_convert(children[0], &TypeInfo::Bool)?
            .into_int_value();

        let then_bb = self.cx.llcx().append_basic_block(func, "then");
        let else_bb = self.cx.llcx().append_basic_block(func, "else");
        let cont_bb = self.cx.llcx().append_basic_block(func, "cont");
        self.bx.cond_br(cond, then_bb, else_bb);

        let if_ty = self.ty(id)?.clone();

        self.bx.position_at_end(then_bb);
        let then_value = self.maybe_convert(children[1], &if_ty)?;
        self.bx.br(cont_bb);
        let then_end = self.bx.current_block()?;

        self.bx.position_at_end(else_bb);
        let else_value = self.maybe_convert(children[2], &if_ty)?;
        self.bx.br(cont_bb);
        let else_end = self.bx.current_block()?;

        self.bx.position_at_end(cont_bb);
        let phi = self.bx.phi(self.llvm_type_of(id)?, "iftmp");
        self.bx
            .add_incoming(phi, &[(then_value, then_end), (else_value, else_end)]);
        Some(phi.as_basic_value())
    }

    pub(crate) fn lower_do_loop(&mut self, id: NodeId) -> Option<BasicValueEnum<'ll>> {
        self.lower_iteration(id, IterationKind::Do)
    }

    pub(crate) fn lower_collect_loop(&mut self, id: NodeId) -> Option<BasicValueEnum<'ll>> {
        self.lower_iteration(id, IterationKind::Collect)
    }

    /// The iteration block machine shared by do and collect loops.
    ///
    /// A cursor alloca starts at the list head; `check` compares it to
    /// null, `loopbody` binds the iteration variable from `car(cursor)`,
    /// lowers the body, steps the cursor through `cdr`, and `loopend`
    /// loads the accumulated result. The iteration variable shadows any
    /// outer binding of the same name and the shadow is undone on exit.
    fn lower_iteration(
        &mut self,
        id: NodeId,
        kind: IterationKind,
    ) -> Option<BasicValueEnum<'ll>> {
        let Some(func) = self.bx.current_function() else {
            return self.internal_error("loop outside a function");
        };
        let children = self.nodes.children(id).to_vec();
        let Some(&iterator) = children
            .iter()
            .find(|&&c| matches!(self.nodes.get(c).kind, NodeKind::IteratorDefinition { .. }))
        else {
            return self.internal_error("loop without an iterator definition");
        };
        let Some(body) = self.nodes.body_of(id) else {
            return self.internal_error("loop without a body");
        };
        let NodeKind::IteratorDefinition {
            list: Some(list_expr),
        } = self.nodes.get(iterator).kind
        else {
            return self.internal_error("iterator definition without a list expression");
        };

        let elem_ty = self.ty(iterator)?.clone();
        let Some(width) = self.width_of(&elem_ty) else {
            return self.error(id, format!("unimplemented list type 'list<{elem_ty}>'"));
        };
        let elem_ll = self.llvm_type_of(iterator)?;
        let iter_name = self.nodes.get(iterator).name.clone();

        let list_value = self.lower_node(list_expr)?;

        // iteration state lives in stack slots
        let iter_slot = self.bx.alloca(elem_ll, &iter_name);
        let cursor = self.bx.alloca(self.cx.scx.type_ptr().into(), "listtail");
        self.bx.store(list_value, cursor);

        let result_slot = match kind {
            IterationKind::Do => {
                let result_ll = self.llvm_type_of(id)?;
                let slot = self.bx.alloca(result_ll, "loopret");
                self.bx.store(self.cx.zero_value(result_ll), slot);
                slot
            }
            IterationKind::Collect => {
                let slot = self.bx.alloca(self.cx.scx.type_ptr().into(), "collectret");
                self.bx
                    .store(self.cx.scx.type_ptr().const_null().into(), slot);
                slot
            }
        };
        // collect loops append body values at the body's own width
        let collect_width = match kind {
            IterationKind::Collect => {
                let body_ty = self
                    .ty(id)?
                    .subtype()
                    .cloned()
                    .or_else(|| {
                        self.internal_error("collect loop without a list type");
                        None
                    })?;
                let Some(w) = self.width_of(&body_ty) else {
                    return self.error(id, format!("unimplemented list type 'list<{body_ty}>'"));
                };
                Some(w)
            }
            IterationKind::Do => None,
        };

        let check_bb = self.cx.llcx().append_basic_block(func, "check");
        let body_bb = self.cx.llcx().append_basic_block(func, "loopbody");
        let end_bb = self.cx.llcx().append_basic_block(func, "loopend");
        self.bx.br(check_bb);

        // check: done when the cursor runs off the list
        self.bx.position_at_end(check_bb);
        let cur = self
            .bx
            .load(self.cx.scx.type_ptr().into(), cursor, "curlist")
            .into_pointer_value();
        let is_null = self.bx.icmp_ptr(
            IntPredicate::EQ,
            cur,
            self.cx.scx.type_ptr().const_null(),
            "isnull",
        );
        self.bx.cond_br(is_null, end_bb, body_bb);

        // loopbody: bind the element, run the body, accumulate, step
        self.bx.position_at_end(body_bb);
        let car = self.runtime_fn(width, "car")?;
        let head_ptr = self.bx.call(car, &[cur.into()], "calltmp")?;
        let head = self
            .bx
            .load(elem_ll, head_ptr.into_pointer_value(), "cartmp");
        self.bx.store(head, iter_slot);
        let iter_value = self.bx.load(elem_ll, iter_slot, &iter_name);
        let shadowed = self.named_values.insert(iter_name.clone(), iter_value);

        let body_value = self.lower_function_body(body)?;
        match kind {
            IterationKind::Do => self.bx.store(body_value, result_slot),
            IterationKind::Collect => {
                let so_far = self
                    .bx
                    .load(self.cx.scx.type_ptr().into(), result_slot, "collected");
                let append = self.runtime_fn(collect_width?, "append")?;
                let grown = self
                    .bx
                    .call(append, &[so_far, body_value], "calltmp")?;
                self.bx.store(grown, result_slot);
            }
        }

        let cdr = self.runtime_fn(width, "cdr")?;
        let next = self.bx.call(cdr, &[cur.into()], "calltmp")?;
        self.bx.store(next, cursor);
        self.bx.br(check_bb);

        // iteration variable shadowing is undone on exit
        match shadowed {
            Some(previous) => {
                self.named_values.insert(iter_name, previous);
            }
            None => {
                self.named_values.remove(&iter_name);
            }
        }

        self.bx.position_at_end(end_bb);
        let result_ll = match kind {
            IterationKind::Do => self.llvm_type_of(id)?,
            IterationKind::Collect => self.cx.scx.type_ptr().into(),
        };
        Some(self.bx.load(result_ll, result_slot, "loopret"))
    }

    /// Lower `(print ls)` as a walk over the list calling the runtime
    /// print primitive per element; the value is the last print result
    /// widened to the SLC int width, zero for an empty list.
    pub(crate) fn lower_print_list(
        &mut self,
        id: NodeId,
        list_expr: NodeId,
        elem_ty: &TypeInfo,
    ) -> Option<BasicValueEnum<'ll>> {
        let Some(func) = self.bx.current_function() else {
            return self.internal_error("print outside a function");
        };
        let Some(width) = self.width_of(elem_ty) else {
            return self.error(id, format!("unimplemented list type 'list<{elem_ty}>'"));
        };
        let print_name = match width {
            ListWidth::Int => "print_int",
            ListWidth::Double => "print_double",
        };
        let Some(print) = self.cx.llmod().get_function(print_name) else {
            return self.internal_error(format!("runtime function '{print_name}' is not declared"));
        };
        let elem_ll = self.cx.llvm_type(elem_ty)?;

        let list_value = self.lower_node(list_expr)?;
        let i64_ty = self.cx.scx.type_i64();
        let result_slot = self.bx.alloca(i64_ty.into(), "printret");
        self.bx.store(i64_ty.const_int(0, false).into(), result_slot);
        let cursor = self.bx.alloca(self.cx.scx.type_ptr().into(), "listtail");
        self.bx.store(list_value, cursor);

        let check_bb = self.cx.llcx().append_basic_block(func, "print_check");
        let body_bb = self.cx.llcx().append_basic_block(func, "print_body");
        let end_bb = self.cx.llcx().append_basic_block(func, "print_end");
        self.bx.br(check_bb);

        self.bx.position_at_end(check_bb);
        let cur = self
            .bx
            .load(self.cx.scx.type_ptr().into(), cursor, "curlist")
            .into_pointer_value();
        let is_null = self.bx.icmp_ptr(
            IntPredicate::EQ,
            cur,
            self.cx.scx.type_ptr().const_null(),
            "isnull",
        );
        self.bx.cond_br(is_null, end_bb, body_bb);

        self.bx.position_at_end(body_bb);
        let car = self.runtime_fn(width, "car")?;
        let head_ptr = self.bx.call(car, &[cur.into()], "calltmp")?;
        let head = self
            .bx
            .load(elem_ll, head_ptr.into_pointer_value(), "cartmp");
        let printed = self.bx.call(print, &[head], "calltmp")?;
        let widened = match printed {
            BasicValueEnum::IntValue(v) if v.get_type().get_bit_width() < 64 => {
                self.bx.sext(v, i64_ty, "printwide").into()
            }
            other => other,
        };
        self.bx.store(widened, result_slot);
        let cdr = self.runtime_fn(width, "cdr")?;
        let next = self.bx.call(cdr, &[cur.into()], "calltmp")?;
        self.bx.store(next, cursor);
        self.bx.br(check_bb);

        self.bx.position_at_end(end_bb);
        Some(self.bx.load(i64_ty.into(), result_slot, "printret"))
    }
}
