//! Lexical scopes and the symbol tables they index into.
//!
//! Scopes live in an arena owned by [`ScopeStack`] and are never removed.
//! A scope maps names to handles; the descriptions themselves sit in the
//! stack's tables, indexed by those handles.

use super::error::ResolveError;
use crate::common::span::Span;
use crate::common::types::{
    ByteSize, FuncId, FunctionDescription, LocationDescription, ScopeId, TypeDescription,
    TypeId, VarId, VariableDescription, ADDRESS_SIZE, PRIMITIVE_TYPES,
};
use im::OrdMap;
use std::fmt::Write;

#[derive(Clone, Debug)]
pub struct Scope {
    pub id: ScopeId,
    pub parent: Option<ScopeId>,
    /// Frame offset in effect when the scope was opened
    pub base_offset: ByteSize,
    /// Running frame offset, grown by every local declared here
    pub stack_offset: ByteSize,
    types: OrdMap<String, TypeId>,
    variables: OrdMap<String, VarId>,
    functions: OrdMap<String, FuncId>,
}

impl Scope {
    fn new(id: ScopeId, parent: Option<ScopeId>, base_offset: ByteSize) -> Self {
        Self {
            id,
            parent,
            base_offset,
            stack_offset: base_offset,
            types: OrdMap::new(),
            variables: OrdMap::new(),
            functions: OrdMap::new(),
        }
    }

    /// Bytes of stack claimed by declarations made directly in this scope.
    pub fn local_bytes(&self) -> ByteSize {
        self.stack_offset - self.base_offset
    }
}

#[derive(Clone, Debug)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
    types: Vec<TypeDescription>,
    variables: Vec<VariableDescription>,
    functions: Vec<FunctionDescription>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// A stack holding only the root scope, seeded with the primitive types.
    pub fn new() -> Self {
        let mut stack = Self {
            scopes: vec![Scope::new(ScopeId::ROOT, None, 0)],
            types: Vec::new(),
            variables: Vec::new(),
            functions: Vec::new(),
        };
        for (name, byte_size) in PRIMITIVE_TYPES {
            stack.add_type(ScopeId::ROOT, name, *byte_size);
        }
        stack
    }

    pub fn create_child_scope(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        let base_offset = self.scope(parent).stack_offset;
        self.scopes.push(Scope::new(id, Some(parent), base_offset));
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    // ========================================================================
    // Registration
    // ========================================================================

    pub fn add_type(&mut self, scope: ScopeId, name: &str, byte_size: ByteSize) -> TypeId {
        let id = TypeId(self.types.len());
        self.types.push(TypeDescription {
            id,
            byte_size,
            name: name.to_string(),
        });
        self.scopes[scope.0].types.insert(name.to_string(), id);
        id
    }

    /// Declare a stack-resident local below the scope's current offset.
    pub fn add_local_variable(&mut self, scope: ScopeId, name: &str, type_id: TypeId) -> VarId {
        let byte_size = self.type_description(type_id).byte_size;
        let target = &mut self.scopes[scope.0];
        target.stack_offset += byte_size;
        let location = LocationDescription::LocalStackOffset {
            byte_size,
            byte_offset: target.stack_offset,
        };
        let id = VarId(self.variables.len());
        target.variables.insert(name.to_string(), id);
        self.variables.push(VariableDescription {
            variable_id: id,
            name: name.to_string(),
            location,
            type_id,
        });
        id
    }

    pub fn add_function(
        &mut self,
        scope: ScopeId,
        name: &str,
        parameters: Vec<TypeId>,
        return_type: TypeId,
    ) -> FuncId {
        let id = FuncId(self.functions.len());
        self.functions.push(FunctionDescription {
            function_id: id,
            name: name.to_string(),
            parameters,
            return_type,
        });
        self.scopes[scope.0].functions.insert(name.to_string(), id);
        id
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    fn lookup<T: Copy>(
        &self,
        scope: ScopeId,
        table: impl Fn(&Scope) -> &OrdMap<String, T>,
        name: &str,
    ) -> Option<T> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scope(id);
            if let Some(found) = table(scope).get(name) {
                return Some(*found);
            }
            current = scope.parent;
        }
        None
    }

    pub fn find_type(&self, scope: ScopeId, name: &str, span: Span) -> Result<TypeId, ResolveError> {
        self.lookup(scope, |s| &s.types, name)
            .ok_or_else(|| ResolveError::TypeNotFound {
                name: name.to_string(),
                scope,
                span,
            })
    }

    pub fn find_variable(
        &self,
        scope: ScopeId,
        name: &str,
        span: Span,
    ) -> Result<VarId, ResolveError> {
        self.lookup(scope, |s| &s.variables, name)
            .ok_or_else(|| ResolveError::VariableNotFound {
                name: name.to_string(),
                scope,
                span,
            })
    }

    pub fn find_function(
        &self,
        scope: ScopeId,
        name: &str,
        span: Span,
    ) -> Result<FuncId, ResolveError> {
        self.lookup(scope, |s| &s.functions, name)
            .ok_or_else(|| ResolveError::FunctionNotFound {
                name: name.to_string(),
                scope,
                span,
            })
    }

    /// Resolve `name` followed by `pointer_depth` stars. Pointer types are
    /// address sized and created in the root scope on first use.
    pub fn resolve_type(
        &mut self,
        scope: ScopeId,
        name: &str,
        pointer_depth: usize,
        span: Span,
    ) -> Result<TypeId, ResolveError> {
        let mut resolved = self.find_type(scope, name, span)?;
        let mut full_name = name.to_string();
        for _ in 0..pointer_depth {
            full_name.push('*');
            resolved = match self.lookup(ScopeId::ROOT, |s| &s.types, &full_name) {
                Some(existing) => existing,
                None => self.add_type(ScopeId::ROOT, &full_name, ADDRESS_SIZE),
            };
        }
        Ok(resolved)
    }

    // ========================================================================
    // Descriptions
    // ========================================================================

    pub fn type_description(&self, id: TypeId) -> &TypeDescription {
        &self.types[id.0]
    }

    pub fn variable(&self, id: VarId) -> &VariableDescription {
        &self.variables[id.0]
    }

    pub fn function(&self, id: FuncId) -> &FunctionDescription {
        &self.functions[id.0]
    }

    pub fn variables(&self) -> &[VariableDescription] {
        &self.variables
    }

    /// Render every scope with its declarations, for debugging.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for scope in &self.scopes {
            let parent = scope
                .parent
                .map_or_else(|| "none".to_string(), |p| p.to_string());
            let _ = writeln!(
                out,
                "scope {} (parent {}, offsets {}..{})",
                scope.id, parent, scope.base_offset, scope.stack_offset
            );
            for (name, id) in &scope.types {
                let ty = self.type_description(*id);
                let _ = writeln!(out, "  type {} {} ({} bytes)", id, name, ty.byte_size);
            }
            for (name, id) in &scope.variables {
                let var = self.variable(*id);
                let ty = self.type_description(var.type_id);
                let _ = writeln!(out, "  var {} {}: {} @ {}", id, name, ty.name, var.location);
            }
            for (name, id) in &scope.functions {
                let func = self.function(*id);
                let params: Vec<&str> = func
                    .parameters
                    .iter()
                    .map(|p| self.type_description(*p).name.as_str())
                    .collect();
                let _ = writeln!(
                    out,
                    "  fn {} {}({}) -> {}",
                    id,
                    name,
                    params.join(", "),
                    self.type_description(func.return_type).name
                );
            }
        }
        out
    }
}
