//! Comparison, cons, and unary operator lowering.

use inkwell::values::BasicValueEnum;
use inkwell::{FloatPredicate, IntPredicate};

use slc_ir::{NodeId, OpKind};
use slc_types::TypeInfo;

use crate::gen::IrGen;

/// Comparison predicates in operator order: eq, gt, lt, ge, le.
struct Predicates {
    int: Option<[IntPredicate; 5]>,
    float: Option<[FloatPredicate; 5]>,
}

const SIGNED: Predicates = Predicates {
    int: Some([
        IntPredicate::EQ,
        IntPredicate::SGT,
        IntPredicate::SLT,
        IntPredicate::SGE,
        IntPredicate::SLE,
    ]),
    float: None,
};

const UNSIGNED: Predicates = Predicates {
    int: Some([
        IntPredicate::EQ,
        IntPredicate::UGT,
        IntPredicate::ULT,
        IntPredicate::UGE,
        IntPredicate::ULE,
    ]),
    float: None,
};

const FLOAT_ORDERED: Predicates = Predicates {
    int: None,
    float: Some([
        FloatPredicate::UEQ,
        FloatPredicate::UGT,
        FloatPredicate::ULT,
        FloatPredicate::UGE,
        FloatPredicate::ULE,
    ]),
};

fn predicate_index(op: OpKind) -> Option<usize> {
    match op {
        OpKind::Equal => Some(0),
        OpKind::Greater => Some(1),
        OpKind::Less => Some(2),
        OpKind::GreaterEq => Some(3),
        OpKind::LessEq => Some(4),
        _ => None,
    }
}

impl<'ll> IrGen<'ll, '_> {
    pub(crate) fn lower_binary_op(
        &mut self,
        id: NodeId,
        op: OpKind,
    ) -> Option<BasicValueEnum<'ll>> {
        let children = self.nodes.children(id).to_vec();
        if children.len() != 2 {
            return self.internal_error("binary operator without two operands");
        }
        let (lhs, rhs) = (children[0], children[1]);
        if op == OpKind::Cons {
            return self.lower_cons(id, lhs, rhs);
        }
        let Some(index) = predicate_index(op) else {
            return self.internal_error(format!("invalid binary operation '{op}'"));
        };

        let lhs_ty = self.ty(lhs)?.clone();
        let rhs_ty = self.ty(rhs)?.clone();
        let left = self.lower_node(lhs)?;
        let right = self.lower_node(rhs)?;

        // The left-hand type selects the predicate family; the right-hand
        // value is converted to match it first.
        let (right, predicates) = match lhs_ty {
            TypeInfo::Int => (self.convert_to_int(right, &rhs_ty, rhs)?, SIGNED),
            TypeInfo::Bool => (self.convert_to_bool(right, &rhs_ty, rhs)?, UNSIGNED),
            TypeInfo::Float => (self.convert_to_float(right, &rhs_ty, rhs)?, FLOAT_ORDERED),
            // pointer-shaped operands compare directly (nil against lists,
            // strings by identity)
            TypeInfo::Nil | TypeInfo::List(_) | TypeInfo::Str | TypeInfo::Lambda => {
                (right, UNSIGNED)
            }
            _ => return self.internal_error("comparison over an unresolved type"),
        };

        if let Some(float_preds) = predicates.float {
            return Some(
                self.bx
                    .fcmp(
                        float_preds[index],
                        left.into_float_value(),
                        right.into_float_value(),
                        "cmptmp",
                    )
                    .into(),
            );
        }
        let int_preds = predicates.int?;
        if left.is_pointer_value() {
            return Some(
                self.bx
                    .icmp_ptr(
                        int_preds[index],
                        left.into_pointer_value(),
                        right.into_pointer_value(),
                        "cmptmp",
                    )
                    .into(),
            );
        }
        Some(
            self.bx
                .icmp(
                    int_preds[index],
                    left.into_int_value(),
                    right.into_int_value(),
                    "cmptmp",
                )
                .into(),
        )
    }

    /// `(cons e l)`: call the width-matched runtime cons with the element
    /// converted to the list's element type.
    fn lower_cons(
        &mut self,
        id: NodeId,
        elem_expr: NodeId,
        list_expr: NodeId,
    ) -> Option<BasicValueEnum<'ll>> {
        let list_ty = self.ty(list_expr)?.clone();
        let Some(elem_ty) = list_ty.subtype().cloned() else {
            return self.internal_error("cons onto a non-list reached code generation");
        };
        let Some(width) = self.width_of(&elem_ty) else {
            return self.error(id, format!("unimplemented list type '{list_ty}'"));
        };
        let elem = self.maybe_convert(elem_expr, &elem_ty)?;
        let list = self.lower_node(list_expr)?;
        let cons = self.runtime_fn(width, "cons")?;
        self.bx.call(cons, &[elem, list], "binop_cons")
    }

    pub(crate) fn lower_unary_op(
        &mut self,
        id: NodeId,
        op: OpKind,
    ) -> Option<BasicValueEnum<'ll>> {
        let Some(&operand) = self.nodes.children(id).first() else {
            return self.internal_error("unary operator without an operand");
        };
        let operand_ty = self.ty(operand)?.clone();

        if op == OpKind::Not {
            let value = self.lower_node(operand)?;
            let as_bool = self.convert_to_bool(value, &operand_ty, operand)?;
            return Some(self.bx.not(as_bool.into_int_value(), "nottmp").into());
        }

        // car and cdr delegate to the runtime for the list's width
        let Some(elem_ty) = operand_ty.subtype().cloned() else {
            return self.internal_error("car or cdr on a non-list reached code generation");
        };
        let Some(width) = self.width_of(&elem_ty) else {
            return self.error(id, format!("unimplemented list type '{operand_ty}'"));
        };
        let list = self.lower_node(operand)?;
        match op {
            OpKind::Car => {
                let car = self.runtime_fn(width, "car")?;
                let head_ptr = self.bx.call(car, &[list], "calltmp")?;
                let elem_ll = self.cx.llvm_type(&elem_ty)?;
                Some(
                    self.bx
                        .load(elem_ll, head_ptr.into_pointer_value(), "cartmp"),
                )
            }
            OpKind::Cdr => {
                let cdr = self.runtime_fn(width, "cdr")?;
                self.bx.call(cdr, &[list], "calltmp")
            }
            _ => self.error(id, "unimplemented unary op"),
        }
    }
}
