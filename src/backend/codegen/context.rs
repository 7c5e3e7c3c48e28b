//! Code generation context
//!
//! Pairs the emitter being written with the read-only scope stack that
//! decoration produced.

use super::error::{CodegenError, Result};
use crate::backend::emit::NasmEmitter;
use crate::common::ast::Variable;
use crate::common::types::LocationDescription;
use crate::frontend::decorator::ScopeStack;

pub struct CodegenContext<'a> {
    pub emitter: NasmEmitter,
    scopes: &'a ScopeStack,
}

impl<'a> CodegenContext<'a> {
    pub fn new(scopes: &'a ScopeStack, entry_point: &str) -> Self {
        Self {
            emitter: NasmEmitter::new(entry_point),
            scopes,
        }
    }

    pub fn scopes(&self) -> &'a ScopeStack {
        self.scopes
    }

    /// Storage of a decorated variable reference.
    pub fn location_of(&self, variable: &Variable<'_>) -> Result<LocationDescription> {
        let id = variable
            .description
            .ok_or_else(|| CodegenError::undecorated("variable", variable.name))?;
        Ok(self.scopes.variable(id).location)
    }

    /// Render the accumulated assembly, consuming the context.
    pub fn finish(self) -> String {
        self.emitter.generate_asm_code()
    }
}
