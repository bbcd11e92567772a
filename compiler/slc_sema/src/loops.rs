//! The loop family and assignment analysis.

use slc_ir::{NodeId, NodeKind};
use slc_types::TypeInfo;

use crate::analyzer::{SemaResult, SemanticAnalyzer};
use crate::problem::{DefinitionKind, SemaProblem};

impl SemanticAnalyzer<'_> {
    pub(crate) fn visit_set_expression(&mut self, id: NodeId) -> SemaResult {
        self.visit_children(id)?;
        let name = self.nodes.get(id).name.clone();
        let scope = self.nodes.scope(id).ok_or_else(|| {
            SemaProblem::internal(format!(
                "traversed to root node before finding a scope to lookup variable '{name}'"
            ))
        })?;
        let resolved = self
            .scopes
            .lookup_variable(scope, &name, self.nodes)
            .ok_or_else(|| SemaProblem::UndefinedVariable {
                name,
                location: self.loc(id),
            })?;
        let ty = self.expr_type(resolved)?;
        self.nodes.set_type(id, ty);
        if let NodeKind::SetExpression { resolution } = &mut self.nodes.get_mut(id).kind {
            *resolution = Some(resolved);
        }
        Ok(())
    }

    pub(crate) fn visit_iterator_definition(&mut self, id: NodeId) -> SemaResult {
        self.visit_children(id)?;
        let Some(&list) = self.nodes.children(id).first() else {
            return Err(SemaProblem::internal(
                "missing list expression for iterator definition",
            ));
        };
        self.expect_expression(list)?;
        let list_ty = self.expr_type(list)?;
        let Some(elem) = list_ty.subtype() else {
            return Err(SemaProblem::CannotIterate {
                got: list_ty,
                location: self.loc(list),
            });
        };
        self.nodes.set_type(id, elem.clone());
        if let NodeKind::IteratorDefinition { list: slot } = &mut self.nodes.get_mut(id).kind {
            *slot = Some(list);
        }

        let scope = self.defining_scope(id)?;
        self.conflict_check(scope, id, DefinitionKind::Variable)?;
        self.scopes.get_mut(scope).variables.push(id);
        Ok(())
    }

    pub(crate) fn visit_do_loop(&mut self, id: NodeId) -> SemaResult {
        let inherited = self.defining_scope(id)?;
        let fresh = self.scopes.alloc(Some(inherited));
        self.nodes.set_scope(id, fresh);
        self.visit_children(id)?;
        let ty = self.loop_body_type(id)?;
        self.nodes.set_type(id, ty);
        Ok(())
    }

    pub(crate) fn visit_collect_loop(&mut self, id: NodeId) -> SemaResult {
        let inherited = self.defining_scope(id)?;
        let fresh = self.scopes.alloc(Some(inherited));
        self.nodes.set_scope(id, fresh);
        self.visit_children(id)?;
        let ty = self.loop_body_type(id)?;
        self.nodes.set_type(id, TypeInfo::list_of(ty));
        Ok(())
    }

    /// `when` and `infinite` loops are analyzed but have no lowering; they
    /// type like a do loop when they carry a body.
    pub(crate) fn visit_unlowered_loop(&mut self, id: NodeId) -> SemaResult {
        let inherited = self.defining_scope(id)?;
        let fresh = self.scopes.alloc(Some(inherited));
        self.nodes.set_scope(id, fresh);
        self.visit_children(id)?;
        if let Ok(ty) = self.loop_body_type(id) {
            self.nodes.set_type(id, ty);
        }
        Ok(())
    }

    fn loop_body_type(&self, id: NodeId) -> Result<TypeInfo, SemaProblem> {
        let ret = self
            .nodes
            .body_of(id)
            .and_then(|body| self.nodes.return_expression_of(body))
            .ok_or_else(|| {
                SemaProblem::internal("missing return expression for loop body")
            })?;
        self.expr_type(ret)
    }
}
