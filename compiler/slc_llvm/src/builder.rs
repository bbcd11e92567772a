//! Thin wrapper over the LLVM instruction builder.
//!
//! Instruction generation methods insert at the builder's current
//! position. Builder results are unwrapped with `expect`: a failed build
//! call means a malformed module, which is an invariant violation rather
//! than a recoverable error.

use inkwell::basic_block::BasicBlock;
use inkwell::builder::Builder as LLVMBuilder;
use inkwell::types::BasicTypeEnum;
use inkwell::values::{
    BasicValue, BasicValueEnum, FloatValue, FunctionValue, IntValue, PhiValue, PointerValue,
};
use inkwell::{FloatPredicate, IntPredicate};

use crate::context::CodegenCx;

/// LLVM instruction builder scoped to one compilation.
pub struct Builder<'ll> {
    llbuilder: LLVMBuilder<'ll>,
}

impl<'ll> Builder<'ll> {
    /// Create an unpositioned builder; position it before emitting.
    pub fn new(cx: &CodegenCx<'ll>) -> Self {
        Builder {
            llbuilder: cx.llcx().create_builder(),
        }
    }

    pub fn position_at_end(&self, bb: BasicBlock<'ll>) {
        self.llbuilder.position_at_end(bb);
    }

    pub fn current_block(&self) -> Option<BasicBlock<'ll>> {
        self.llbuilder.get_insert_block()
    }

    /// The function containing the current insertion point.
    pub fn current_function(&self) -> Option<FunctionValue<'ll>> {
        self.current_block().and_then(|bb| bb.get_parent())
    }

    // -- Terminators --

    pub fn ret(&self, val: BasicValueEnum<'ll>) {
        self.llbuilder
            .build_return(Some(&val))
            .expect("build_return");
    }

    pub fn br(&self, dest: BasicBlock<'ll>) {
        self.llbuilder
            .build_unconditional_branch(dest)
            .expect("build_br");
    }

    pub fn cond_br(&self, cond: IntValue<'ll>, then_bb: BasicBlock<'ll>, else_bb: BasicBlock<'ll>) {
        self.llbuilder
            .build_conditional_branch(cond, then_bb, else_bb)
            .expect("build_cond_br");
    }

    // -- Memory --

    pub fn alloca(&self, ty: BasicTypeEnum<'ll>, name: &str) -> PointerValue<'ll> {
        self.llbuilder.build_alloca(ty, name).expect("alloca")
    }

    pub fn load(
        &self,
        ty: BasicTypeEnum<'ll>,
        ptr: PointerValue<'ll>,
        name: &str,
    ) -> BasicValueEnum<'ll> {
        self.llbuilder.build_load(ty, ptr, name).expect("load")
    }

    pub fn store(&self, val: BasicValueEnum<'ll>, ptr: PointerValue<'ll>) {
        self.llbuilder.build_store(ptr, val).expect("store");
    }

    /// C-style global string constant; returns the data pointer.
    pub fn global_string_ptr(&self, value: &str, name: &str) -> PointerValue<'ll> {
        self.llbuilder
            .build_global_string_ptr(value, name)
            .expect("build_global_string_ptr")
            .as_pointer_value()
    }

    // -- Comparisons --

    pub fn icmp(
        &self,
        pred: IntPredicate,
        lhs: IntValue<'ll>,
        rhs: IntValue<'ll>,
        name: &str,
    ) -> IntValue<'ll> {
        self.llbuilder
            .build_int_compare(pred, lhs, rhs, name)
            .expect("icmp")
    }

    /// Integer comparison over pointer operands (nil checks, list
    /// identity).
    pub fn icmp_ptr(
        &self,
        pred: IntPredicate,
        lhs: PointerValue<'ll>,
        rhs: PointerValue<'ll>,
        name: &str,
    ) -> IntValue<'ll> {
        self.llbuilder
            .build_int_compare(pred, lhs, rhs, name)
            .expect("icmp_ptr")
    }

    pub fn fcmp(
        &self,
        pred: FloatPredicate,
        lhs: FloatValue<'ll>,
        rhs: FloatValue<'ll>,
        name: &str,
    ) -> IntValue<'ll> {
        self.llbuilder
            .build_float_compare(pred, lhs, rhs, name)
            .expect("fcmp")
    }

    // -- Casts --

    pub fn sitofp(&self, val: IntValue<'ll>, ty: inkwell::types::FloatType<'ll>, name: &str) -> FloatValue<'ll> {
        self.llbuilder
            .build_signed_int_to_float(val, ty, name)
            .expect("sitofp")
    }

    pub fn uitofp(&self, val: IntValue<'ll>, ty: inkwell::types::FloatType<'ll>, name: &str) -> FloatValue<'ll> {
        self.llbuilder
            .build_unsigned_int_to_float(val, ty, name)
            .expect("uitofp")
    }

    pub fn fptosi(&self, val: FloatValue<'ll>, ty: inkwell::types::IntType<'ll>, name: &str) -> IntValue<'ll> {
        self.llbuilder
            .build_float_to_signed_int(val, ty, name)
            .expect("fptosi")
    }

    pub fn fptoui(&self, val: FloatValue<'ll>, ty: inkwell::types::IntType<'ll>, name: &str) -> IntValue<'ll> {
        self.llbuilder
            .build_float_to_unsigned_int(val, ty, name)
            .expect("fptoui")
    }

    pub fn zext(&self, val: IntValue<'ll>, ty: inkwell::types::IntType<'ll>, name: &str) -> IntValue<'ll> {
        self.llbuilder
            .build_int_z_extend(val, ty, name)
            .expect("zext")
    }

    pub fn sext(&self, val: IntValue<'ll>, ty: inkwell::types::IntType<'ll>, name: &str) -> IntValue<'ll> {
        self.llbuilder
            .build_int_s_extend(val, ty, name)
            .expect("sext")
    }

    pub fn trunc(&self, val: IntValue<'ll>, ty: inkwell::types::IntType<'ll>, name: &str) -> IntValue<'ll> {
        self.llbuilder
            .build_int_truncate(val, ty, name)
            .expect("trunc")
    }

    pub fn not(&self, val: IntValue<'ll>, name: &str) -> IntValue<'ll> {
        self.llbuilder.build_not(val, name).expect("not")
    }

    // -- Calls --

    pub fn call(
        &self,
        callee: FunctionValue<'ll>,
        args: &[BasicValueEnum<'ll>],
        name: &str,
    ) -> Option<BasicValueEnum<'ll>> {
        let args_meta: Vec<inkwell::values::BasicMetadataValueEnum> =
            args.iter().map(|v| (*v).into()).collect();
        let call_val = self
            .llbuilder
            .build_call(callee, &args_meta, name)
            .expect("call");
        call_val.try_as_basic_value().left()
    }

    // -- Phi --

    pub fn phi(&self, ty: BasicTypeEnum<'ll>, name: &str) -> PhiValue<'ll> {
        self.llbuilder.build_phi(ty, name).expect("phi")
    }

    pub fn add_incoming(
        &self,
        phi: PhiValue<'ll>,
        incoming: &[(BasicValueEnum<'ll>, BasicBlock<'ll>)],
    ) {
        for (val, bb) in incoming {
            phi.add_incoming(&[(val as &dyn BasicValue<'ll>, *bb)]);
        }
    }
}
