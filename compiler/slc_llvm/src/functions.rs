//! Function, lambda, extern, call, and body lowering.

use inkwell::attributes::{Attribute, AttributeLoc};
use inkwell::module::Linkage;
use inkwell::types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum};
use inkwell::values::{BasicValueEnum, FunctionValue};

use slc_ir::{NodeId, NodeKind};

use crate::gen::IrGen;

impl<'ll> IrGen<'ll, '_> {
    /// Lower a function definition or lambda.
    ///
    /// Both produce an LLVM function with external linkage and the
    /// `noinline`/`optnone` attributes; the only difference is that a
    /// lambda is reached mid-expression, so the builder's insert point is
    /// restored afterwards and lowering continues in the enclosing
    /// function.
    pub(crate) fn lower_callable(&mut self, id: NodeId) -> Option<BasicValueEnum<'ll>> {
        let name = self.nodes.get(id).name.clone();
        let formals = self.nodes.formals_of(id);

        let mut param_types: Vec<BasicMetadataTypeEnum> = Vec::with_capacity(formals.len());
        for &formal in &formals {
            param_types.push(self.llvm_type_of(formal)?.into());
        }
        let ret_ty = self.llvm_type_of(id)?;
        let fn_ty = ret_ty.fn_type(&param_types, false);
        let func = self
            .cx
            .llmod()
            .add_function(&name, fn_ty, Some(Linkage::External));
        self.add_codegen_attributes(func);

        // Formals become SSA named values, shadowing the caller's map.
        let saved_values = std::mem::take(&mut self.named_values);
        for (index, &formal) in formals.iter().enumerate() {
            let param = func.get_nth_param(index as u32)?;
            let formal_name = self.nodes.get(formal).name.clone();
            param.set_name(&formal_name);
            self.named_values.insert(formal_name, param);
        }

        let saved_block = self.bx.current_block();
        let entry = self
            .cx
            .llcx()
            .append_basic_block(func, &format!("{name}_impl"));
        self.bx.position_at_end(entry);

        let body = self.nodes.body_of(id).or_else(|| {
            self.internal_error(format!("missing body for function '{name}'"));
            None
        })?;
        let ret_val = self.lower_function_body(body)?;
        self.bx.ret(ret_val);

        // continue with the enclosing function
        if let Some(block) = saved_block {
            self.bx.position_at_end(block);
        }
        self.named_values = saved_values;

        Some(func.as_global_value().as_pointer_value().into())
    }

    /// Declaration only; the body is resolved by the linker.
    pub(crate) fn lower_extern_function(&mut self, id: NodeId) -> Option<BasicValueEnum<'ll>> {
        let name = self.nodes.get(id).name.clone();
        if let Some(existing) = self.cx.llmod().get_function(&name) {
            return Some(existing.as_global_value().as_pointer_value().into());
        }
        let formals = self.nodes.formals_of(id);
        let mut param_types: Vec<BasicMetadataTypeEnum> = Vec::with_capacity(formals.len());
        for &formal in &formals {
            param_types.push(self.llvm_type_of(formal)?.into());
        }
        let ret_ty = self.llvm_type_of(id)?;
        let fn_ty = ret_ty.fn_type(&param_types, false);
        let func = self
            .cx
            .llmod()
            .add_function(&name, fn_ty, Some(Linkage::External));
        Some(func.as_global_value().as_pointer_value().into())
    }

    /// Lower every non-return child for its side effects; the body's value
    /// is the return expression's value.
    pub(crate) fn lower_function_body(&mut self, body: NodeId) -> Option<BasicValueEnum<'ll>> {
        let ret = self.nodes.return_expression_of(body).or_else(|| {
            self.internal_error("function body has no return expression");
            None
        })?;
        for &child in self.nodes.children(body).to_vec().iter() {
            if child != ret {
                self.lower_node(child)?;
            }
        }
        self.lower_node(ret)
    }

    pub(crate) fn lower_call(
        &mut self,
        id: NodeId,
        resolution: Option<NodeId>,
    ) -> Option<BasicValueEnum<'ll>> {
        let Some(callable) = resolution else {
            return self.internal_error(format!(
                "unresolved call to '{}' reached code generation",
                self.nodes.get(id).name
            ));
        };
        // Lambdas are looked up by their synthesized name; everything else
        // by the call's own name.
        let fn_name = if matches!(self.nodes.get(callable).kind, NodeKind::Lambda) {
            self.nodes.get(callable).name.clone()
        } else {
            self.nodes.get(id).name.clone()
        };
        let Some(func) = self.cx.llmod().get_function(&fn_name) else {
            return self.error(id, format!("unknown function '{fn_name}' called"));
        };

        let formals = self.nodes.formals_of(callable);
        let args = self.nodes.children(id).to_vec();
        let mut lowered: Vec<BasicValueEnum<'ll>> = Vec::with_capacity(args.len());
        for (&arg, &formal) in args.iter().zip(&formals) {
            let formal_ty = self.ty(formal)?.clone();
            lowered.push(self.maybe_convert(arg, &formal_ty)?);
        }

        let value = self.bx.call(func, &lowered, "calltmp")?;
        self.coerce_call_width(id, value)
    }

    /// Align a call result's integer width with the call expression's
    /// language type (the print primitives return i32 while SLC ints are
    /// i64).
    fn coerce_call_width(
        &mut self,
        id: NodeId,
        value: BasicValueEnum<'ll>,
    ) -> Option<BasicValueEnum<'ll>> {
        let expected = self.llvm_type_of(id)?;
        let (BasicValueEnum::IntValue(int_val), BasicTypeEnum::IntType(int_ty)) =
            (value, expected)
        else {
            return Some(value);
        };
        let got_width = int_val.get_type().get_bit_width();
        let want_width = int_ty.get_bit_width();
        if got_width == want_width {
            Some(value)
        } else if got_width < want_width {
            Some(self.bx.sext(int_val, int_ty, "retwide").into())
        } else {
            Some(self.bx.trunc(int_val, int_ty, "retnarrow").into())
        }
    }

    fn add_codegen_attributes(&self, func: FunctionValue<'ll>) {
        for attr_name in ["noinline", "optnone"] {
            let kind = Attribute::get_named_enum_kind_id(attr_name);
            let attr = self.cx.llcx().create_enum_attribute(kind, 0);
            func.add_attribute(AttributeLoc::Function, attr);
        }
    }
}
