//! Implicit conversion lowering.
//!
//! Conversions mirror the analyzer's convertibility relation on values:
//! numeric widening/narrowing between i64 and double, and truthiness for
//! everything that converts to bool. Truthiness is by value: a nonzero
//! integer or a non-null pointer is true.

use inkwell::values::BasicValueEnum;
use inkwell::IntPredicate;

use slc_ir::NodeId;
use slc_types::TypeInfo;

use crate::gen::IrGen;

impl<'ll> IrGen<'ll, '_> {
    /// Lower `id`, converting the result to `target` when its type tag
    /// differs.
    pub(crate) fn maybe_convert(
        &mut self,
        id: NodeId,
        target: &TypeInfo,
    ) -> Option<BasicValueEnum<'ll>> {
        let source = self.ty(id)?.clone();
        let value = self.lower_node(id)?;
        if source.same_tag(target) {
            return Some(value);
        }
        match target {
            TypeInfo::Int => self.convert_to_int(value, &source, id),
            TypeInfo::Float => self.convert_to_float(value, &source, id),
            TypeInfo::Bool => self.convert_to_bool(value, &source, id),
            _ => self.error(id, "cannot convert to requested type"),
        }
    }

    pub(crate) fn convert_to_int(
        &mut self,
        value: BasicValueEnum<'ll>,
        from: &TypeInfo,
        at: NodeId,
    ) -> Option<BasicValueEnum<'ll>> {
        match from {
            TypeInfo::Int => Some(value),
            TypeInfo::Bool => Some(
                self.bx
                    .zext(value.into_int_value(), self.cx.scx.type_i64(), "inttmp")
                    .into(),
            ),
            TypeInfo::Float => Some(
                self.bx
                    .fptosi(value.into_float_value(), self.cx.scx.type_i64(), "inttmp")
                    .into(),
            ),
            _ => self.error(at, "conversion from invalid type"),
        }
    }

    pub(crate) fn convert_to_float(
        &mut self,
        value: BasicValueEnum<'ll>,
        from: &TypeInfo,
        at: NodeId,
    ) -> Option<BasicValueEnum<'ll>> {
        match from {
            TypeInfo::Float => Some(value),
            TypeInfo::Int => Some(
                self.bx
                    .sitofp(value.into_int_value(), self.cx.scx.type_f64(), "doubletmp")
                    .into(),
            ),
            TypeInfo::Bool => Some(
                self.bx
                    .uitofp(value.into_int_value(), self.cx.scx.type_f64(), "booltmp")
                    .into(),
            ),
            TypeInfo::Str => self.error(at, "strings are not implemented"),
            _ => self.error(at, "conversion from invalid type"),
        }
    }

    pub(crate) fn convert_to_bool(
        &mut self,
        value: BasicValueEnum<'ll>,
        from: &TypeInfo,
        at: NodeId,
    ) -> Option<BasicValueEnum<'ll>> {
        match from {
            TypeInfo::Bool => Some(value),
            TypeInfo::Int => {
                let zero = self.cx.scx.type_i64().const_int(0, false);
                Some(
                    self.bx
                        .icmp(IntPredicate::NE, value.into_int_value(), zero, "booltmp")
                        .into(),
                )
            }
            TypeInfo::Float => Some(
                self.bx
                    .fptoui(value.into_float_value(), self.cx.scx.type_i1(), "booltmp")
                    .into(),
            ),
            TypeInfo::Str | TypeInfo::List(_) | TypeInfo::Nil | TypeInfo::Lambda => {
                let null = self.cx.scx.type_ptr().const_null();
                Some(
                    self.bx
                        .icmp_ptr(
                            IntPredicate::NE,
                            value.into_pointer_value(),
                            null,
                            "booltmp",
                        )
                        .into(),
                )
            }
            _ => self.error(at, "conversion from invalid type"),
        }
    }
}
