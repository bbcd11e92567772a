//! LLVM codegen context.
//!
//! Two tiers: [`SimpleCx`] holds the raw LLVM context, module, and the
//! handful of types every lowering touches; [`CodegenCx`] adds the
//! SLC-specific type mapping and default values. The context, module, and
//! builder are one process-wide set owned for the lifetime of a
//! compilation and are not thread-safe.

use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::types::{BasicTypeEnum, FloatType, IntType, PointerType};
use inkwell::values::BasicValueEnum;
use inkwell::AddressSpace;

use slc_types::TypeInfo;

/// Minimal LLVM context: module plus commonly used types.
pub struct SimpleCx<'ll> {
    /// The LLVM context (owns all LLVM types and values).
    pub llcx: &'ll Context,
    /// The LLVM module being compiled.
    pub llmod: Module<'ll>,
    /// Opaque pointer type; strings and cons lists both lower to this.
    pub ptr_type: PointerType<'ll>,
}

impl<'ll> SimpleCx<'ll> {
    pub fn new(context: &'ll Context, module_name: &str) -> Self {
        let llmod = context.create_module(module_name);
        let ptr_type = context.ptr_type(AddressSpace::default());
        SimpleCx {
            llcx: context,
            llmod,
            ptr_type,
        }
    }

    #[inline]
    pub fn type_i1(&self) -> IntType<'ll> {
        self.llcx.bool_type()
    }

    #[inline]
    pub fn type_i8(&self) -> IntType<'ll> {
        self.llcx.i8_type()
    }

    #[inline]
    pub fn type_i32(&self) -> IntType<'ll> {
        self.llcx.i32_type()
    }

    #[inline]
    pub fn type_i64(&self) -> IntType<'ll> {
        self.llcx.i64_type()
    }

    #[inline]
    pub fn type_f64(&self) -> FloatType<'ll> {
        self.llcx.f64_type()
    }

    #[inline]
    pub fn type_ptr(&self) -> PointerType<'ll> {
        self.ptr_type
    }
}

/// Full codegen context with the SLC type mapping.
pub struct CodegenCx<'ll> {
    pub scx: SimpleCx<'ll>,
}

impl<'ll> CodegenCx<'ll> {
    pub fn new(context: &'ll Context, module_name: &str) -> Self {
        CodegenCx {
            scx: SimpleCx::new(context, module_name),
        }
    }

    #[inline]
    pub fn llcx(&self) -> &'ll Context {
        self.scx.llcx
    }

    #[inline]
    pub fn llmod(&self) -> &Module<'ll> {
        &self.scx.llmod
    }

    /// Map an SLC type to its LLVM representation.
    ///
    /// INT is i64, FLOAT is double, BOOL is i1; strings, lists, nil, and
    /// lambdas are all opaque pointers. `Variable` and `Invalid` have no
    /// representation and signal an analyzer bug upstream.
    pub fn llvm_type(&self, ty: &TypeInfo) -> Option<BasicTypeEnum<'ll>> {
        match ty {
            TypeInfo::Int => Some(self.scx.type_i64().into()),
            TypeInfo::Float => Some(self.scx.type_f64().into()),
            TypeInfo::Bool => Some(self.scx.type_i1().into()),
            TypeInfo::Str | TypeInfo::List(_) | TypeInfo::Nil | TypeInfo::Lambda => {
                Some(self.scx.type_ptr().into())
            }
            TypeInfo::Variable | TypeInfo::Invalid => None,
        }
    }

    /// The zero value of a mapped type, used to seed loop result slots.
    pub fn zero_value(&self, ty: BasicTypeEnum<'ll>) -> BasicValueEnum<'ll> {
        match ty {
            BasicTypeEnum::IntType(t) => t.const_int(0, false).into(),
            BasicTypeEnum::FloatType(t) => t.const_float(0.0).into(),
            BasicTypeEnum::PointerType(t) => t.const_null().into(),
            BasicTypeEnum::StructType(t) => t.get_undef().into(),
            BasicTypeEnum::ArrayType(t) => t.get_undef().into(),
            BasicTypeEnum::VectorType(t) => t.get_undef().into(),
        }
    }
}
