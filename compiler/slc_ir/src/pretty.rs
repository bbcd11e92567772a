//! YAML-ish pretty printer for the AST dump artifact.

use std::fmt::Write;

use crate::arena::NodeArena;
use crate::node::{LiteralValue, NodeId, NodeKind};

impl NodeArena {
    /// Render the whole tree, one node per line, for the `.yml` artifact.
    pub fn pretty(&self) -> String {
        let mut out = String::from("Root:\n");
        for &child in self.children(NodeArena::ROOT) {
            self.pretty_node(child, 1, &mut out);
        }
        out
    }

    fn indent(level: usize, out: &mut String) {
        for _ in 0..level {
            out.push_str("  ");
        }
        if level >= 1 {
            out.push_str("- ");
        }
    }

    fn pretty_node(&self, id: NodeId, level: usize, out: &mut String) {
        Self::indent(level, out);
        let node = self.get(id);
        match &node.kind {
            NodeKind::Root => out.push_str("Root:\n"),
            NodeKind::Literal(value) => {
                match value {
                    LiteralValue::Int(v) => {
                        let _ = writeln!(out, "{v}");
                    }
                    LiteralValue::Float(v) => {
                        let _ = writeln!(out, "{v}");
                    }
                    LiteralValue::Str(v) => {
                        let _ = writeln!(out, "{v}");
                    }
                    LiteralValue::Nil => out.push_str("nil\n"),
                }
                // terminal node, no children
                return;
            }
            NodeKind::VariableRef { .. } => {
                let _ = writeln!(out, "{}", node.name);
                return;
            }
            NodeKind::BinaryOp(op) | NodeKind::UnaryOp(op) | NodeKind::ListOp(op) => {
                let _ = writeln!(out, "{op}:");
            }
            NodeKind::IfExpr => out.push_str("if:\n"),
            NodeKind::List { head, tail } => {
                out.push_str("list:\n");
                if let Some(head) = head {
                    self.pretty_node(*head, level + 1, out);
                }
                if let Some(tail) = tail {
                    self.pretty_node(*tail, level + 1, out);
                } else {
                    Self::indent(level + 1, out);
                    out.push_str("~\n");
                }
                return;
            }
            NodeKind::Formal | NodeKind::VariableDefinition => {
                let _ = writeln!(out, "variable_definition({}):", self.fqn(id, "::"));
            }
            NodeKind::FunctionDefinition => {
                let _ = writeln!(out, "function_definition({}):", self.fqn(id, "::"));
            }
            NodeKind::ExternFunction => {
                let _ = writeln!(out, "extern_function({}):", self.fqn(id, "::"));
            }
            NodeKind::Lambda => {
                let _ = writeln!(out, "lambda({}):", self.fqn(id, "::"));
            }
            NodeKind::FunctionCall { .. } => {
                let _ = writeln!(out, "{}:", node.name);
            }
            NodeKind::FunctionBody { .. } => {
                let _ = writeln!(out, "function_body({}):", self.fqn(id, "::"));
            }
            NodeKind::SetExpression { .. } => {
                let _ = writeln!(out, "set({}):", node.name);
            }
            NodeKind::IteratorDefinition { .. } => {
                let _ = writeln!(out, "iterator({}):", node.name);
            }
            NodeKind::DoLoop => out.push_str("do:\n"),
            NodeKind::CollectLoop => out.push_str("collect:\n"),
            NodeKind::WhenLoop => out.push_str("when:\n"),
            NodeKind::InfiniteLoop => out.push_str("loop:\n"),
        }
        for &child in self.children(id) {
            self.pretty_node(child, level + 1, out);
        }
    }
}
