//! Typed problems produced by semantic analysis.

use slc_diagnostic::Diagnostic;
use slc_ir::{LocationInfo, OpKind};
use slc_types::TypeInfo;

/// What kind of definition a conflict diagnostic is talking about.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DefinitionKind {
    Function,
    Variable,
    Parameter,
}

impl DefinitionKind {
    fn as_str(self) -> &'static str {
        match self {
            DefinitionKind::Function => "function",
            DefinitionKind::Variable => "variable",
            DefinitionKind::Parameter => "parameter",
        }
    }
}

/// Problems that occur during semantic analysis.
///
/// Each variant carries the offending node's location so diagnostics can
/// cite "line L column C"; a missing location renders as
/// "location unavailable".
#[derive(Clone, Debug, PartialEq)]
pub enum SemaProblem {
    /// A definition clashes with an existing one in the same scope.
    ConflictingDefinition {
        kind: DefinitionKind,
        name: String,
        location: Option<LocationInfo>,
        /// Location of the definition already in the scope.
        original: Option<LocationInfo>,
        /// The prior definition was a variable while this one is a function.
        prior_is_variable: bool,
    },

    /// Call target not found in any enclosing scope.
    UndefinedFunction {
        name: String,
        location: Option<LocationInfo>,
    },

    /// Variable reference not found in any enclosing scope.
    UndefinedVariable {
        name: String,
        location: Option<LocationInfo>,
    },

    /// Call target resolved to a variable that is not bound to a lambda.
    CallToNonCallable { location: Option<LocationInfo> },

    /// Argument count below the callee's arity.
    TooFewArguments {
        name: String,
        got: usize,
        expected: usize,
        location: Option<LocationInfo>,
    },

    /// Argument count above the callee's arity.
    TooManyArguments {
        name: String,
        got: usize,
        expected: usize,
        location: Option<LocationInfo>,
    },

    /// Argument type does not convert to the formal's type.
    InvalidArgument {
        name: String,
        got: TypeInfo,
        expected: TypeInfo,
        location: Option<LocationInfo>,
    },

    /// Operand types unacceptable for a binary operator.
    InvalidBinaryOperands {
        op: OpKind,
        location: Option<LocationInfo>,
    },

    /// The consed element does not convert to the list's element type.
    ConsMismatch {
        got: TypeInfo,
        expected: TypeInfo,
        location: Option<LocationInfo>,
    },

    /// An if condition that does not convert to bool.
    ConditionNotBoolean { location: Option<LocationInfo> },

    /// The else branch does not convert to the affirmative branch's type.
    IfBranchMismatch {
        else_ty: TypeInfo,
        then_ty: TypeInfo,
        location: Option<LocationInfo>,
    },

    /// Recursive call with no enclosing if to supply a type witness.
    RecursionWithoutIf { location: Option<LocationInfo> },

    /// Both branches of the witness if are mid-visit.
    RecursionUnresolved { location: Option<LocationInfo> },

    /// `car` applied to a non-list.
    CarOnNonList {
        got: TypeInfo,
        location: Option<LocationInfo>,
    },

    /// `cdr` applied to a non-list.
    CdrOnNonList {
        got: TypeInfo,
        location: Option<LocationInfo>,
    },

    /// More than one operand for a unary operator.
    TooManyUnaryOperands { location: Option<LocationInfo> },

    /// A list operation applied to something that is not a list literal.
    InvalidListArguments { location: Option<LocationInfo> },

    /// Element subtype unacceptable for a list operator.
    InvalidListOperands {
        op: OpKind,
        list_ty: TypeInfo,
        location: Option<LocationInfo>,
    },

    /// A list element whose type does not convert to the list subtype.
    IncompatibleListElement {
        got: TypeInfo,
        list_ty: TypeInfo,
        location: Option<LocationInfo>,
    },

    /// Iterating over a non-list expression.
    CannotIterate {
        got: TypeInfo,
        location: Option<LocationInfo>,
    },

    /// A variable definition with more than one initializer.
    TooManyInitializers { location: Option<LocationInfo> },

    /// A non-expression where an expression is required.
    ExpectedExpression { location: Option<LocationInfo> },

    /// An invariant violation inside the analyzer.
    Internal { message: String },
}

impl SemaProblem {
    /// Convert into a displayable diagnostic.
    pub fn into_diagnostic(self) -> Diagnostic {
        match self {
            SemaProblem::ConflictingDefinition {
                kind,
                name,
                location,
                original,
                prior_is_variable,
            } => {
                let cite = match (&original, prior_is_variable && kind == DefinitionKind::Function)
                {
                    (Some(loc), true) => {
                        format!("(defined as variable on {loc})")
                    }
                    (Some(loc), false) => format!("(original on {loc}): {}", loc.text),
                    (None, _) => "(original location unavailable)".to_string(),
                };
                Diagnostic::error(
                    format!(
                        "conflicting definition for {} '{name}' {cite}",
                        kind.as_str()
                    ),
                    location,
                )
            }
            SemaProblem::UndefinedFunction { name, location } => Diagnostic::error(
                format!("undefined reference to function '{name}'"),
                location,
            ),
            SemaProblem::UndefinedVariable { name, location } => Diagnostic::error(
                format!("undefined reference to variable '{name}'"),
                location,
            ),
            SemaProblem::CallToNonCallable { location } => {
                Diagnostic::error("attempted to call a variable as a function", location)
            }
            SemaProblem::TooFewArguments {
                name,
                got,
                expected,
                location,
            } => Diagnostic::error(
                format!(
                    "too few arguments for function '{name}': got '{got}' expected '{expected}'"
                ),
                location,
            ),
            SemaProblem::TooManyArguments {
                name,
                got,
                expected,
                location,
            } => Diagnostic::error(
                format!(
                    "too many arguments for function '{name}': got '{got}' expected '{expected}'"
                ),
                location,
            ),
            SemaProblem::InvalidArgument {
                name,
                got,
                expected,
                location,
            } => Diagnostic::error(
                format!(
                    "invalid argument passed to function '{name}': got '{got}' expected '{expected}'"
                ),
                location,
            ),
            SemaProblem::InvalidBinaryOperands { op, location } => Diagnostic::error(
                format!("invalid operands for binary operator '{op}'"),
                location,
            ),
            SemaProblem::ConsMismatch {
                got,
                expected,
                location,
            } => Diagnostic::error(
                format!("cannot convert type '{got}' to '{expected}' in 'cons'"),
                location,
            ),
            SemaProblem::ConditionNotBoolean { location } => {
                Diagnostic::error("expression does not evaluate to a boolean", location)
            }
            SemaProblem::IfBranchMismatch {
                else_ty,
                then_ty,
                location,
            } => Diagnostic::error(
                format!(
                    "type of else expression ('{else_ty}') does not convert to expected type '{then_ty}'"
                ),
                location,
            ),
            SemaProblem::RecursionWithoutIf { location } => Diagnostic::error(
                "detected recursive call without any if statements",
                location,
            ),
            SemaProblem::RecursionUnresolved { location } => Diagnostic::error(
                "no type resolution for either branch in recursive call",
                location,
            ),
            SemaProblem::CarOnNonList { got, location } => Diagnostic::error(
                format!("attempted car operation on non-list type '{got}'"),
                location,
            ),
            SemaProblem::CdrOnNonList { got, location } => Diagnostic::error(
                format!("attempted cdr operation on non-list type '{got}'"),
                location,
            ),
            SemaProblem::TooManyUnaryOperands { location } => {
                Diagnostic::error("too many operands for unary operator", location)
            }
            SemaProblem::InvalidListArguments { location } => {
                Diagnostic::error("invalid arguments for list operation", location)
            }
            SemaProblem::InvalidListOperands {
                op,
                list_ty,
                location,
            } => Diagnostic::error(
                format!(
                    "invalid operands for list operator '{op}': expected list, but got '{list_ty}'"
                ),
                location,
            ),
            SemaProblem::IncompatibleListElement {
                got,
                list_ty,
                location,
            } => Diagnostic::error(
                format!("child type '{got}' is incompatible with list of type '{list_ty}'"),
                location,
            ),
            SemaProblem::CannotIterate { got, location } => {
                Diagnostic::error(format!("cannot iterate over type '{got}'"), location)
            }
            SemaProblem::TooManyInitializers { location } => Diagnostic::error(
                "too many expressions provided for variable definition",
                location,
            ),
            SemaProblem::ExpectedExpression { location } => {
                Diagnostic::error("expected expression", location)
            }
            SemaProblem::Internal { message } => Diagnostic::internal(message),
        }
    }

    /// Shorthand for internal invariant violations.
    pub fn internal(message: impl Into<String>) -> Self {
        SemaProblem::Internal {
            message: message.into(),
        }
    }
}
