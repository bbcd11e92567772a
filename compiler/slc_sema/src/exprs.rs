//! Operator, list, and conditional expression analysis.

use slc_ir::{NodeId, NodeKind, OpKind};
use slc_types::TypeInfo;

use crate::analyzer::{SemaResult, SemanticAnalyzer};
use crate::problem::SemaProblem;

impl SemanticAnalyzer<'_> {
    pub(crate) fn visit_binary_op(&mut self, id: NodeId, op: OpKind) -> SemaResult {
        self.visit_children(id)?;
        let children = self.nodes.children(id).to_vec();
        if children.len() != 2 {
            return Err(SemaProblem::internal(
                "operator is not a binary operator",
            ));
        }
        self.expect_expression(children[0])?;
        self.expect_expression(children[1])?;
        let lhs = self.expr_type(children[0])?;
        let rhs = self.expr_type(children[1])?;

        match op {
            OpKind::Greater
            | OpKind::GreaterEq
            | OpKind::Less
            | OpKind::LessEq
            | OpKind::Equal => {
                let numeric_mix = lhs.is_numeric() && rhs.is_numeric();
                let nil_list_mix = (lhs == TypeInfo::Nil && rhs.is_list())
                    || (rhs == TypeInfo::Nil && lhs.is_list());
                if numeric_mix || nil_list_mix || lhs.same_tag(&rhs) {
                    self.nodes.set_type(id, TypeInfo::Bool);
                    Ok(())
                } else {
                    Err(SemaProblem::InvalidBinaryOperands {
                        op,
                        location: self.loc(id),
                    })
                }
            }
            OpKind::Cons => {
                let Some(elem) = rhs.subtype() else {
                    return Err(SemaProblem::InvalidBinaryOperands {
                        op,
                        location: self.loc(id),
                    });
                };
                if !lhs.converts_to(elem) {
                    return Err(SemaProblem::ConsMismatch {
                        got: lhs,
                        expected: elem.clone(),
                        location: self.loc(children[0]),
                    });
                }
                self.nodes.set_type(id, rhs);
                Ok(())
            }
            _ => Err(SemaProblem::internal("operator is not a binary operator")),
        }
    }

    pub(crate) fn visit_unary_op(&mut self, id: NodeId, op: OpKind) -> SemaResult {
        self.visit_children(id)?;
        let children = self.nodes.children(id).to_vec();
        if children.len() > 1 {
            return Err(SemaProblem::TooManyUnaryOperands {
                location: self.loc(id),
            });
        }
        let Some(&operand) = children.first() else {
            return Err(SemaProblem::internal("missing operand for unary operator"));
        };
        let child_ty = self.expr_type(operand)?;

        match op {
            OpKind::Not => {
                if matches!(child_ty, TypeInfo::Invalid | TypeInfo::Variable) {
                    return Err(SemaProblem::internal("unresolved type for not operator"));
                }
                self.nodes.set_type(id, TypeInfo::Bool);
                Ok(())
            }
            OpKind::Car => match child_ty.subtype().cloned() {
                Some(elem) => {
                    self.nodes.set_type(id, elem);
                    Ok(())
                }
                None => Err(SemaProblem::CarOnNonList {
                    got: child_ty,
                    location: self.loc(id),
                }),
            },
            OpKind::Cdr => {
                if child_ty.is_list() {
                    self.nodes.set_type(id, child_ty);
                    Ok(())
                } else {
                    Err(SemaProblem::CdrOnNonList {
                        got: child_ty,
                        location: self.loc(id),
                    })
                }
            }
            _ => Err(SemaProblem::internal(format!(
                "invalid unary operator '{op}'"
            ))),
        }
    }

    pub(crate) fn visit_list_op(&mut self, id: NodeId, op: OpKind) -> SemaResult {
        let children = self.nodes.children(id).to_vec();
        if children.len() > 1 {
            return Err(SemaProblem::internal(format!(
                "too many children ({}) for list operation",
                children.len()
            )));
        }
        let Some(&list) = children.first() else {
            return Err(SemaProblem::internal("missing operand for list operation"));
        };
        if !matches!(self.nodes.get(list).kind, NodeKind::List { .. }) {
            return Err(SemaProblem::InvalidListArguments {
                location: self.loc(id),
            });
        }
        self.visit_children(id)?;

        let list_ty = self.expr_type(list)?;
        let Some(elem) = list_ty.subtype() else {
            return Err(SemaProblem::internal(format!(
                "unresolved subtype for list '{}'",
                self.nodes.get(list).name
            )));
        };

        match op {
            OpKind::Plus => {
                if matches!(
                    elem,
                    TypeInfo::Int
                        | TypeInfo::Float
                        | TypeInfo::Bool
                        | TypeInfo::Str
                        | TypeInfo::List(_)
                ) {
                    self.nodes.set_type(id, elem.clone());
                    Ok(())
                } else {
                    Err(SemaProblem::InvalidListOperands {
                        op,
                        list_ty: list_ty.clone(),
                        location: self.loc(id),
                    })
                }
            }
            OpKind::Minus | OpKind::Times | OpKind::Divide => {
                if elem.is_numeric() {
                    self.nodes.set_type(id, elem.clone());
                    Ok(())
                } else {
                    Err(SemaProblem::InvalidListOperands {
                        op,
                        list_ty: list_ty.clone(),
                        location: self.loc(id),
                    })
                }
            }
            OpKind::Or | OpKind::And | OpKind::Xor | OpKind::Not => {
                self.nodes.set_type(id, TypeInfo::Bool);
                Ok(())
            }
            OpKind::Print => {
                // int because the runtime print returns the printf result
                self.nodes.set_type(id, TypeInfo::Int);
                Ok(())
            }
            _ => Err(SemaProblem::internal("operator is not a list operator")),
        }
    }

    pub(crate) fn visit_list(
        &mut self,
        id: NodeId,
        head: Option<NodeId>,
        tail: Option<NodeId>,
    ) -> SemaResult {
        self.visit_children(id)?;

        let annotated = match self.nodes.ty(id) {
            Some(TypeInfo::List(elem)) => Some((**elem).clone()),
            _ => None,
        };
        let elem = match annotated {
            // explicitly annotated
            Some(elem) => elem,
            // derived from the first element
            None => {
                let Some(head) = head else {
                    return Err(SemaProblem::internal(format!(
                        "unresolved subtype for list '{}'",
                        self.nodes.get(id).name
                    )));
                };
                let derived = self.expr_type(head)?;
                self.nodes
                    .set_type(id, TypeInfo::list_of(derived.clone()));
                derived
            }
        };

        // every element must convert to the subtype
        let list_ty = TypeInfo::list_of(elem.clone());
        let mut link = Some((head, tail));
        while let Some((link_head, link_tail)) = link {
            if let Some(h) = link_head {
                let got = self.expr_type(h)?;
                if !got.converts_to(&elem) {
                    return Err(SemaProblem::IncompatibleListElement {
                        got,
                        list_ty,
                        location: self.loc(h),
                    });
                }
            }
            link = match link_tail {
                Some(t) => match self.nodes.get(t).kind {
                    NodeKind::List { head, tail } => Some((head, tail)),
                    _ => {
                        return Err(SemaProblem::internal(
                            "list tail is not a list node",
                        ))
                    }
                },
                None => None,
            };
        }
        Ok(())
    }

    pub(crate) fn visit_if_expr(&mut self, id: NodeId) -> SemaResult {
        let inherited = self.defining_scope(id)?;
        let fresh = self.scopes.alloc(Some(inherited));
        self.nodes.set_scope(id, fresh);

        let children = self.nodes.children(id).to_vec();
        if children.len() != 3 {
            return Err(SemaProblem::internal(format!(
                "too many children ({}) processing if statement",
                children.len()
            )));
        }
        for &child in &children {
            self.expect_expression(child)?;
        }
        self.visit_children(id)?;

        let cond_ty = self.expr_type(children[0])?;
        if !cond_ty.converts_to(&TypeInfo::Bool) {
            return Err(SemaProblem::ConditionNotBoolean {
                location: self.loc(children[0]),
            });
        }
        let then_ty = self.expr_type(children[1])?;
        let else_ty = self.expr_type(children[2])?;
        if !else_ty.converts_to(&then_ty) {
            return Err(SemaProblem::IfBranchMismatch {
                else_ty,
                then_ty,
                location: self.loc(children[2]),
            });
        }
        self.nodes.set_type(id, then_ty);
        Ok(())
    }
}
