use crate::common::span::Span;
use crate::common::types::ScopeId;

/// Name and type resolution errors. Any of these aborts the compilation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("type `{name}` not found (lookup started in scope {scope})")]
    TypeNotFound {
        name: String,
        scope: ScopeId,
        span: Span,
    },

    #[error("variable `{name}` not found (lookup started in scope {scope})")]
    VariableNotFound {
        name: String,
        scope: ScopeId,
        span: Span,
    },

    #[error("function `{name}` not found (lookup started in scope {scope})")]
    FunctionNotFound {
        name: String,
        scope: ScopeId,
        span: Span,
    },

    #[error("function `{function}` takes {expected} arguments but {found} were supplied")]
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    // Variables and parameters need storage
    #[error("variable `{name}` is declared with type `void`")]
    VoidVariable { name: String, span: Span },
}

impl ResolveError {
    pub fn span(&self) -> Span {
        match self {
            ResolveError::TypeNotFound { span, .. }
            | ResolveError::VariableNotFound { span, .. }
            | ResolveError::FunctionNotFound { span, .. }
            | ResolveError::ArgumentCountMismatch { span, .. }
            | ResolveError::VoidVariable { span, .. } => *span,
        }
    }

    /// Stable code shown in diagnostics.
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::TypeNotFound { .. } => "E101",
            ResolveError::VariableNotFound { .. } => "E102",
            ResolveError::FunctionNotFound { .. } => "E103",
            ResolveError::ArgumentCountMismatch { .. } => "E104",
            ResolveError::VoidVariable { .. } => "E105",
        }
    }
}
