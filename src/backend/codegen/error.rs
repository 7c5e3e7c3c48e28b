//! Errors raised while lowering a decorated tree to assembly.

/// Result type alias for code generation
pub type Result<T> = std::result::Result<T, CodegenError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodegenError {
    /// Every allocatable register is held by a live lease
    #[error("ran out of registers while {context}")]
    RegistersExhausted { context: &'static str },

    /// The construct is accepted by the front end but has no lowering
    #[error("not implemented: {feature}")]
    Unimplemented { feature: String },

    /// A node reached code generation without its decoration slot filled
    #[error("{node} `{name}` reached code generation undecorated")]
    Undecorated { node: &'static str, name: String },
}

impl CodegenError {
    pub fn unimplemented(feature: impl Into<String>) -> Self {
        CodegenError::Unimplemented {
            feature: feature.into(),
        }
    }

    pub fn undecorated(node: &'static str, name: impl Into<String>) -> Self {
        CodegenError::Undecorated {
            node,
            name: name.into(),
        }
    }
}
