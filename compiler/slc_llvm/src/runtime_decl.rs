//! Runtime ABI declarations for the cons-list library.
//!
//! Declares every runtime primitive with external linkage, monomorphised
//! over the two element widths (`slc_int_list` over i64, `slc_double_list`
//! over f64). The linker resolves them against the separately provided
//! `slc_runtime` library. Call once per module before lowering anything.

use inkwell::module::Linkage;
use inkwell::types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum};

use crate::context::SimpleCx;

/// The two monomorphised list families.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ListWidth {
    Int,
    Double,
}

impl ListWidth {
    /// The runtime symbol prefix for this width.
    pub fn prefix(self) -> &'static str {
        match self {
            ListWidth::Int => "slc_int_list",
            ListWidth::Double => "slc_double_list",
        }
    }

    /// The runtime symbol for one of this family's operations.
    pub fn symbol(self, operation: &str) -> String {
        format!("{}_{operation}", self.prefix())
    }
}

/// Declare the full runtime ABI in the module.
pub fn declare_runtime<'ctx>(scx: &SimpleCx<'ctx>) {
    let i8_ty = scx.type_i8();
    let i32_ty = scx.type_i32();
    let i64_ty = scx.type_i64();
    let f64_ty = scx.type_f64();
    let ptr = scx.type_ptr();

    for width in [ListWidth::Int, ListWidth::Double] {
        let elem: BasicTypeEnum = match width {
            ListWidth::Int => i64_ty.into(),
            ListWidth::Double => f64_ty.into(),
        };
        let list: BasicTypeEnum = ptr.into();

        let declare = |operation: &str, params: &[BasicTypeEnum<'ctx>], ret: BasicTypeEnum<'ctx>| {
            let name = width.symbol(operation);
            if scx.llmod.get_function(&name).is_some() {
                return;
            }
            let params: Vec<BasicMetadataTypeEnum<'ctx>> =
                params.iter().map(|&t| t.into()).collect();
            let fn_ty = ret.fn_type(&params, false);
            scx.llmod
                .add_function(&name, fn_ty, Some(Linkage::External));
        };

        // utility
        declare("create", &[], list);
        declare("destroy", &[list], i8_ty.into());
        declare("init", &[list], i8_ty.into());
        declare("fini", &[list], i8_ty.into());
        declare("set_head", &[list, elem], i8_ty.into());
        declare("set_tail", &[list, list], i8_ty.into());
        // unary ops
        declare("car", &[list], ptr.into());
        declare("cdr", &[list], list);
        // binary ops
        declare("cons", &[elem, list], list);
        declare("append", &[list, elem], list);
        // list ops
        declare("add", &[list], elem);
        declare("subtract", &[list], elem);
        declare("multiply", &[list], elem);
        declare("divide", &[list], elem);
    }

    // print primitives
    if scx.llmod.get_function("print_int").is_none() {
        let fn_ty = i32_ty.fn_type(&[i64_ty.into()], false);
        scx.llmod
            .add_function("print_int", fn_ty, Some(Linkage::External));
    }
    if scx.llmod.get_function("print_double").is_none() {
        let fn_ty = i64_ty.fn_type(&[f64_ty.into()], false);
        scx.llmod
            .add_function("print_double", fn_ty, Some(Linkage::External));
    }
}
