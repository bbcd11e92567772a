//! Literals, variable definitions, references, and assignment.

use inkwell::module::Linkage;
use inkwell::values::BasicValueEnum;

use slc_ir::{LiteralValue, NodeId, NodeKind};
use slc_types::TypeInfo;

use crate::gen::{AllocaSlot, IrGen};

impl<'ll> IrGen<'ll, '_> {
    pub(crate) fn lower_literal(
        &mut self,
        id: NodeId,
        value: &LiteralValue,
    ) -> Option<BasicValueEnum<'ll>> {
        match value {
            LiteralValue::Int(v) => {
                Some(self.cx.scx.type_i64().const_int(*v as u64, false).into())
            }
            LiteralValue::Float(v) => Some(self.cx.scx.type_f64().const_float(*v).into()),
            LiteralValue::Str(v) => {
                let name = self.nodes.fqn(id, ".");
                Some(self.bx.global_string_ptr(v, &name).into())
            }
            LiteralValue::Nil => Some(self.cx.scx.type_ptr().const_null().into()),
        }
    }

    pub(crate) fn lower_variable_ref(
        &mut self,
        id: NodeId,
        resolution: Option<NodeId>,
    ) -> Option<BasicValueEnum<'ll>> {
        let name = self.nodes.get(id).name.clone();
        // parameters and iteration variables are plain SSA values
        if let Some(&value) = self.named_values.get(&name) {
            return Some(value);
        }
        let Some(definition) = resolution else {
            return self.internal_error(format!(
                "unresolved variable '{name}' reached code generation"
            ));
        };
        // locals load through their stack slot, keyed by defining scope
        let def_scope = self.nodes.scope(definition)?;
        if let Some(&slot) = self.allocas.get(&(def_scope, name.clone())) {
            if self.bx.current_function() != Some(slot.owner) {
                return self.error(
                    id,
                    format!("lambda captures of local variable '{name}' are not supported"),
                );
            }
            return Some(self.bx.load(slot.ty, slot.ptr, &name));
        }
        // globals load through the module symbol
        if let Some(global) = self.cx.llmod().get_global(&name) {
            let ty = self.llvm_type_of(definition)?;
            return Some(self.bx.load(ty, global.as_pointer_value(), &name));
        }
        self.error(id, format!("unknown variable '{name}'"))
    }

    pub(crate) fn lower_variable_definition(
        &mut self,
        id: NodeId,
    ) -> Option<BasicValueEnum<'ll>> {
        let name = self.nodes.get(id).name.clone();
        let Some(&init) = self.nodes.children(id).first() else {
            return self.internal_error(format!(
                "variable definition '{name}' has no initializer"
            ));
        };
        // A lambda binding just lifts its function; calls reach it through
        // the call resolution, so no storage is needed.
        if matches!(self.nodes.get(init).kind, NodeKind::Lambda) {
            return self.lower_node(init);
        }

        let scope = self.nodes.scope(id)?;
        let ty = self.ty(id)?.clone();
        if self.scopes.is_global(scope) {
            return match ty {
                TypeInfo::List(_) => self.error(id, "global lists are not supported"),
                TypeInfo::Int | TypeInfo::Float => {
                    let ll_ty = self.llvm_type_of(id)?;
                    let global = self.cx.llmod().add_global(ll_ty, None, &name);
                    global.set_linkage(Linkage::Common);
                    global.set_initializer(&self.cx.zero_value(ll_ty));
                    Some(global.as_pointer_value().into())
                }
                _ => self.error(id, format!("unimplemented global type '{ty}'")),
            };
        }

        // local: stack slot recorded under (scope, name)
        let value = self.lower_node(init)?;
        let ll_ty = self.llvm_type_of(id)?;
        let Some(owner) = self.bx.current_function() else {
            return self.internal_error(format!(
                "local variable '{name}' defined outside a function"
            ));
        };
        let ptr = self.bx.alloca(ll_ty, &name);
        self.bx.store(value, ptr);
        self.allocas.insert(
            (scope, name),
            AllocaSlot {
                ptr,
                ty: ll_ty,
                owner,
            },
        );
        Some(value)
    }

    pub(crate) fn lower_set_expression(
        &mut self,
        id: NodeId,
        resolution: Option<NodeId>,
    ) -> Option<BasicValueEnum<'ll>> {
        let name = self.nodes.get(id).name.clone();
        let Some(definition) = resolution else {
            return self.internal_error(format!(
                "unresolved assignment to '{name}' reached code generation"
            ));
        };
        let Some(&target) = self.nodes.children(id).first() else {
            return self.internal_error(format!("assignment to '{name}' has no value"));
        };
        let def_scope = self.nodes.scope(definition)?;
        let Some(&slot) = self.allocas.get(&(def_scope, name.clone())) else {
            return self.error(id, format!("cannot assign to global variable '{name}'"));
        };
        if self.bx.current_function() != Some(slot.owner) {
            return self.error(
                id,
                format!("lambda captures of local variable '{name}' are not supported"),
            );
        }
        let def_ty = self.ty(definition)?.clone();
        let value = self.maybe_convert(target, &def_ty)?;
        self.bx.store(value, slot.ptr);
        Some(value)
    }
}
