//! Function call resolution, including recursive calls.

use tracing::debug;

use slc_ir::{NodeId, NodeKind};

use crate::analyzer::{SemaResult, SemanticAnalyzer};
use crate::problem::SemaProblem;

impl SemanticAnalyzer<'_> {
    pub(crate) fn visit_function_call(&mut self, id: NodeId) -> SemaResult {
        let name = self.nodes.get(id).name.clone();
        let scope = self.nodes.scope(id).ok_or_else(|| {
            SemaProblem::internal(format!(
                "traversed to root node before finding a scope for function '{name}'"
            ))
        })?;

        let definition = self
            .scopes
            .lookup_definition(scope, &name, self.nodes)
            .ok_or_else(|| SemaProblem::UndefinedFunction {
                name: name.clone(),
                location: self.loc(id),
            })?;

        // A variable bound to a lambda counts as a callable.
        let callable = match self.nodes.get(definition).kind {
            NodeKind::FunctionDefinition | NodeKind::ExternFunction => definition,
            NodeKind::VariableDefinition | NodeKind::Formal | NodeKind::IteratorDefinition { .. } => {
                match self.nodes.children(definition).first().copied() {
                    Some(init) if matches!(self.nodes.get(init).kind, NodeKind::Lambda) => init,
                    _ => {
                        return Err(SemaProblem::CallToNonCallable {
                            location: self.loc(id),
                        })
                    }
                }
            }
            _ => {
                return Err(SemaProblem::CallToNonCallable {
                    location: self.loc(id),
                })
            }
        };
        if let NodeKind::FunctionCall { resolution } = &mut self.nodes.get_mut(id).kind {
            *resolution = Some(callable);
        }

        // Arity, then per-argument convertibility.
        let formals = self.nodes.formals_of(callable);
        let args = self.nodes.children(id).to_vec();
        if args.len() < formals.len() {
            return Err(SemaProblem::TooFewArguments {
                name,
                got: args.len(),
                expected: formals.len(),
                location: self.loc(id),
            });
        }
        if args.len() > formals.len() {
            return Err(SemaProblem::TooManyArguments {
                name,
                got: args.len(),
                expected: formals.len(),
                location: self.loc(id),
            });
        }
        for (&arg, &formal) in args.iter().zip(&formals) {
            self.visit(arg)?;
            let arg_ty = self.expr_type(arg)?;
            let formal_ty = self.expr_type(formal)?;
            if !arg_ty.converts_to(&formal_ty) {
                return Err(SemaProblem::InvalidArgument {
                    name,
                    got: arg_ty,
                    expected: formal_ty,
                    location: self.loc(arg),
                });
            }
        }

        if !self.nodes.visiting(definition) {
            let ty = self.expr_type(definition)?;
            self.nodes.set_type(id, ty);
            return Ok(());
        }
        self.resolve_recursive_call(id, definition)
    }

    /// Type a call whose callee is currently being analyzed.
    ///
    /// The call site's type comes from a witness: the branch of the
    /// innermost enclosing if that does *not* contain the call. If that
    /// branch has a settled type it is adopted; if it is also mid-visit
    /// there is nothing to anchor the recursion and analysis fails.
    fn resolve_recursive_call(&mut self, call: NodeId, definition: NodeId) -> SemaResult {
        if !self.nodes.is_ancestor(definition, call) {
            return Err(SemaProblem::internal(
                "visiting function in a non-recursive context",
            ));
        }

        // Climb toward the enclosing function body; the first if wins.
        let mut witness_if = None;
        let mut cursor = Some(call);
        while let Some(n) = cursor {
            match self.nodes.get(n).kind {
                NodeKind::FunctionBody { .. } => break,
                NodeKind::IfExpr => {
                    witness_if = Some(n);
                    break;
                }
                _ => cursor = self.nodes.parent(n),
            }
        }
        let Some(witness_if) = witness_if else {
            return Err(SemaProblem::RecursionWithoutIf {
                location: self.loc(call),
            });
        };

        let children = self.nodes.children(witness_if).to_vec();
        if children.len() != 3 {
            return Err(SemaProblem::internal(
                "malformed if expression in recursive call resolution",
            ));
        }
        let (affirmative, alternative) = (children[1], children[2]);
        let witness = if self.nodes.is_ancestor(affirmative, call) {
            alternative
        } else if self.nodes.is_ancestor(alternative, call) {
            affirmative
        } else {
            return Err(SemaProblem::internal(
                "recursion reached a non-recursive ancestor",
            ));
        };
        debug!(?call, ?witness, "resolving recursive call through witness branch");

        if self.nodes.visiting(witness) {
            return Err(SemaProblem::RecursionUnresolved {
                location: self.loc(witness_if),
            });
        }
        if !self.nodes.visited(witness) {
            self.visit(witness)?;
        }
        let ty = self.expr_type(witness)?;
        self.nodes.set_type(call, ty);
        Ok(())
    }
}
