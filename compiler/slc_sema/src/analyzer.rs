//! The semantic analyzer: a single-pass depth-first walker.
//!
//! The walker assigns scopes, resolves names, and infers types over the
//! node arena, using the three-state visit marks for recursion detection.
//! Every visit either succeeds or short-circuits with the first
//! [`SemaProblem`] encountered; no partial recovery is attempted.

use tracing::{debug, instrument};

use slc_ir::{LocationInfo, NodeArena, NodeId, NodeKind, ScopeArena, ScopeId};
use slc_types::TypeInfo;

use crate::problem::{DefinitionKind, SemaProblem};

pub(crate) type SemaResult = Result<(), SemaProblem>;

/// Walks a parsed arena, annotating it with scopes and types.
///
/// The analyzer is an ordinary value owned by the driver for the duration
/// of one compilation; analysis must complete before IR generation starts.
pub struct SemanticAnalyzer<'a> {
    pub(crate) nodes: &'a mut NodeArena,
    pub(crate) scopes: &'a mut ScopeArena,
    lambda_counter: u32,
}

/// Analyze `nodes`, populating `scopes`.
///
/// Running a second time over an already-analyzed arena is a no-op that
/// reports no new problems.
pub fn analyze(nodes: &mut NodeArena, scopes: &mut ScopeArena) -> SemaResult {
    SemanticAnalyzer::new(nodes, scopes).run()
}

impl<'a> SemanticAnalyzer<'a> {
    pub fn new(nodes: &'a mut NodeArena, scopes: &'a mut ScopeArena) -> Self {
        SemanticAnalyzer {
            nodes,
            scopes,
            lambda_counter: 0,
        }
    }

    /// Run the analysis from the root.
    #[instrument(skip(self), name = "sema")]
    pub fn run(&mut self) -> SemaResult {
        if self.nodes.visited(NodeArena::ROOT) {
            return Ok(());
        }
        self.seed_intrinsics();
        self.visit(NodeArena::ROOT)
    }

    /// Declare the runtime print primitives in the global scope so calls
    /// to them resolve like ordinary extern functions.
    fn seed_intrinsics(&mut self) {
        for (name, param_ty) in [
            ("print_double", TypeInfo::Float),
            ("print_int", TypeInfo::Int),
        ] {
            let func = self.nodes.alloc(NodeKind::ExternFunction, name);
            self.nodes.set_type(func, TypeInfo::Int);
            let param = self.nodes.alloc(NodeKind::Formal, "x");
            self.nodes.set_type(param, param_ty);
            self.nodes.add_child(func, param);
            self.nodes.prepend_child(NodeArena::ROOT, func);
        }
    }

    // -- Traversal --

    pub(crate) fn visit(&mut self, id: NodeId) -> SemaResult {
        if self.nodes.visited(id) {
            return Ok(());
        }
        self.nodes.mark_visiting(id);
        self.inherit_scope(id);
        self.dispatch(id)?;
        self.nodes.mark_visited(id);
        Ok(())
    }

    pub(crate) fn visit_children(&mut self, id: NodeId) -> SemaResult {
        for child in self.nodes.children(id).to_vec() {
            self.visit(child)?;
        }
        Ok(())
    }

    /// Give every non-root node its lexical scope before its visitor runs.
    ///
    /// Climbs the parent chain, never the scope chain: ancestors may not
    /// have had their scope slots filled yet. Visitors that introduce a
    /// fresh scope overwrite this default.
    fn inherit_scope(&mut self, id: NodeId) {
        if id == NodeArena::ROOT || self.nodes.scope(id).is_some() {
            return;
        }
        if let Some(scope) = self.nodes.nearest_scope(id) {
            self.nodes.set_scope(id, scope);
        }
    }

    fn dispatch(&mut self, id: NodeId) -> SemaResult {
        let kind = self.nodes.get(id).kind.clone();
        match kind {
            NodeKind::Root => self.visit_root(id),
            NodeKind::Literal(_) => self.visit_literal(id),
            NodeKind::VariableRef { .. } => self.visit_variable_ref(id),
            NodeKind::BinaryOp(op) => self.visit_binary_op(id, op),
            NodeKind::UnaryOp(op) => self.visit_unary_op(id, op),
            NodeKind::ListOp(op) => self.visit_list_op(id, op),
            NodeKind::IfExpr => self.visit_if_expr(id),
            NodeKind::List { head, tail } => self.visit_list(id, head, tail),
            NodeKind::Formal => self.visit_formal(id),
            NodeKind::VariableDefinition => self.visit_variable_definition(id),
            NodeKind::FunctionDefinition => self.visit_function_definition(id),
            NodeKind::ExternFunction => self.visit_extern_function(id),
            NodeKind::Lambda => self.visit_lambda(id),
            NodeKind::FunctionCall { .. } => self.visit_function_call(id),
            NodeKind::FunctionBody { .. } => self.visit_children(id),
            NodeKind::SetExpression { .. } => self.visit_set_expression(id),
            NodeKind::IteratorDefinition { .. } => self.visit_iterator_definition(id),
            NodeKind::DoLoop => self.visit_do_loop(id),
            NodeKind::CollectLoop => self.visit_collect_loop(id),
            NodeKind::WhenLoop | NodeKind::InfiniteLoop => self.visit_unlowered_loop(id),
        }
    }

    // -- Root and definitions --

    fn visit_root(&mut self, id: NodeId) -> SemaResult {
        if !self.nodes.get(id).is_root() {
            return Err(SemaProblem::internal(format!(
                "visit_node called for non-root node: '{}'",
                self.nodes.get(id).name
            )));
        }
        let global = self.scopes.alloc(None);
        self.nodes.set_scope(id, global);
        self.visit_children(id)
    }

    fn visit_function_definition(&mut self, id: NodeId) -> SemaResult {
        let defining_scope = self.defining_scope(id)?;
        self.conflict_check(defining_scope, id, DefinitionKind::Function)?;
        self.scopes.get_mut(defining_scope).functions.push(id);

        let fresh = self.scopes.alloc(Some(defining_scope));
        self.nodes.set_scope(id, fresh);
        self.visit_children(id)?;
        self.adopt_return_type(id, "function")
    }

    fn visit_extern_function(&mut self, id: NodeId) -> SemaResult {
        let defining_scope = self.defining_scope(id)?;
        self.conflict_check(defining_scope, id, DefinitionKind::Function)?;
        self.scopes.get_mut(defining_scope).functions.push(id);
        if self.nodes.ty(id).is_none() {
            return Err(SemaProblem::internal(format!(
                "missing return type for extern function '{}'",
                self.nodes.get(id).name
            )));
        }
        // The body is external; formals are declarations only and never
        // enter a scope, but they still receive one for uniformity.
        for formal in self.nodes.formals_of(id) {
            self.nodes.set_scope(formal, defining_scope);
            self.nodes.mark_visited(formal);
        }
        Ok(())
    }

    fn visit_lambda(&mut self, id: NodeId) -> SemaResult {
        if self.nodes.get(id).name.is_empty() {
            let name = format!("__lambda_{}", self.lambda_counter);
            self.lambda_counter += 1;
            self.nodes.get_mut(id).name = name;
        }
        let defining_scope = self.defining_scope(id)?;
        let fresh = self.scopes.alloc(Some(defining_scope));
        self.nodes.set_scope(id, fresh);
        self.visit_children(id)?;
        self.adopt_return_type(id, "lambda")
    }

    fn visit_formal(&mut self, id: NodeId) -> SemaResult {
        let parent = self
            .nodes
            .parent(id)
            .ok_or_else(|| SemaProblem::internal("parent is null visiting formal"))?;
        if !self.nodes.get(parent).is_callable() {
            return Err(SemaProblem::internal(
                "parent is not a function definition or lambda visiting formal",
            ));
        }
        let scope = self.nodes.scope(parent).ok_or_else(|| {
            SemaProblem::internal("callable scope unset while visiting formal")
        })?;
        if self.nodes.ty(id).is_none() {
            return Err(SemaProblem::internal(format!(
                "missing declared type for parameter '{}'",
                self.nodes.get(id).name
            )));
        }
        self.conflict_check(scope, id, DefinitionKind::Parameter)?;
        self.scopes.get_mut(scope).variables.push(id);
        Ok(())
    }

    fn visit_variable_definition(&mut self, id: NodeId) -> SemaResult {
        let scope = self.defining_scope(id)?;
        self.nodes.set_scope(id, scope);
        self.conflict_check(scope, id, DefinitionKind::Variable)?;
        self.scopes.get_mut(scope).variables.push(id);

        if self.nodes.children(id).len() > 1 {
            return Err(SemaProblem::TooManyInitializers {
                location: self.loc(id),
            });
        }
        self.visit_children(id)?;
        if let Some(&init) = self.nodes.children(id).first() {
            let ty = self.expr_type(init)?;
            self.nodes.set_type(id, ty);
        }
        Ok(())
    }

    fn visit_literal(&mut self, id: NodeId) -> SemaResult {
        let ty = self.expr_type(id)?;
        self.nodes.get_mut(id).name = ty.to_string();
        Ok(())
    }

    fn visit_variable_ref(&mut self, id: NodeId) -> SemaResult {
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
                name: name.clone(),
                location: self.loc(id),
            })?;
        let ty = self.expr_type(resolved)?;
        self.nodes.set_type(id, ty);
        if let NodeKind::VariableRef { resolution } = &mut self.nodes.get_mut(id).kind {
            *resolution = Some(resolved);
        }
        debug!(?id, ?resolved, "resolved variable '{name}'");
        Ok(())
    }

    // -- Shared helpers --

    /// The scope a definition at `id` inserts itself into: the nearest
    /// scope on the parent chain, already inherited onto the node.
    pub(crate) fn defining_scope(&self, id: NodeId) -> Result<ScopeId, SemaProblem> {
        self.nodes.scope(id).ok_or_else(|| {
            SemaProblem::internal(format!(
                "traversed to root node before finding a scope for '{}'",
                self.nodes.get(id).name
            ))
        })
    }

    /// Reject a definition whose name already exists in `scope`, in either
    /// namespace.
    pub(crate) fn conflict_check(
        &self,
        scope: ScopeId,
        id: NodeId,
        kind: DefinitionKind,
    ) -> SemaResult {
        let name = &self.nodes.get(id).name;
        let prior_function = self.scopes.find_function_in(scope, name, self.nodes);
        let prior_variable = self.scopes.find_variable_in(scope, name, self.nodes);
        let (prior, prior_is_variable) = match (prior_function, prior_variable) {
            (Some(f), _) => (f, false),
            (None, Some(v)) => (v, true),
            (None, None) => return Ok(()),
        };
        Err(SemaProblem::ConflictingDefinition {
            kind,
            name: name.clone(),
            location: self.loc(id),
            original: self.loc(prior),
            prior_is_variable,
        })
    }

    /// Set a callable's type from its body's return expression.
    fn adopt_return_type(&mut self, id: NodeId, what: &str) -> SemaResult {
        let ret = self
            .nodes
            .body_of(id)
            .and_then(|body| self.nodes.return_expression_of(body))
            .ok_or_else(|| {
                SemaProblem::internal(format!("missing return expression for {what}"))
            })?;
        let ty = self.expr_type(ret)?;
        self.nodes.set_type(id, ty);
        Ok(())
    }

    /// A visited expression's type; absence is an analyzer invariant
    /// violation, not a user error.
    pub(crate) fn expr_type(&self, id: NodeId) -> Result<TypeInfo, SemaProblem> {
        self.nodes.ty(id).cloned().ok_or_else(|| {
            SemaProblem::internal(format!(
                "unresolved type for node '{}'",
                self.nodes.get(id).name
            ))
        })
    }

    pub(crate) fn loc(&self, id: NodeId) -> Option<LocationInfo> {
        self.nodes.location(id).cloned()
    }

    /// Require that `id` is an expression node.
    pub(crate) fn expect_expression(&self, id: NodeId) -> SemaResult {
        if self.nodes.get(id).is_expression() {
            Ok(())
        } else {
            Err(SemaProblem::ExpectedExpression {
                location: self.loc(id),
            })
        }
    }
}
