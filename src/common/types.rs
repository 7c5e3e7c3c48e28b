//! Symbol descriptions produced by decoration.
//!
//! Descriptions are owned by the [`ScopeStack`](crate::frontend::decorator::ScopeStack)
//! tables; AST nodes only keep the small copyable handles defined here.

use crate::backend::x86_64::GpRegister;
use std::fmt;

pub type ByteSize = u32;

/// Width of an address on the target.
pub const ADDRESS_SIZE: ByteSize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FuncId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(pub usize);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.0)
    }
}

impl fmt::Display for FuncId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Built-in types seeded into the root scope, in id order.
pub const PRIMITIVE_TYPES: &[(&str, ByteSize)] = &[("void", 0), ("char", 1), ("int", 4)];

pub const VOID_TYPE: TypeId = TypeId(0);
pub const CHAR_TYPE: TypeId = TypeId(1);
pub const INT_TYPE: TypeId = TypeId(2);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDescription {
    pub id: TypeId,
    pub byte_size: ByteSize,
    pub name: String,
}

/// Where a variable's value lives at run time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocationDescription {
    Register(GpRegister),
    /// `[rbp - byte_offset]`
    LocalStackOffset {
        byte_size: ByteSize,
        byte_offset: ByteSize,
    },
    GlobalStackOffset {
        byte_size: ByteSize,
        byte_offset: ByteSize,
    },
}

impl LocationDescription {
    pub fn byte_size(&self) -> ByteSize {
        match self {
            LocationDescription::Register(_) => ADDRESS_SIZE,
            LocationDescription::LocalStackOffset { byte_size, .. }
            | LocationDescription::GlobalStackOffset { byte_size, .. } => *byte_size,
        }
    }
}

impl fmt::Display for LocationDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationDescription::Register(reg) => write!(f, "register {}", reg),
            LocationDescription::LocalStackOffset {
                byte_size,
                byte_offset,
            } => write!(f, "local [rbp-{}] ({} bytes)", byte_offset, byte_size),
            LocationDescription::GlobalStackOffset {
                byte_size,
                byte_offset,
            } => write!(f, "global +{} ({} bytes)", byte_offset, byte_size),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableDescription {
    pub variable_id: VarId,
    pub name: String,
    pub location: LocationDescription,
    pub type_id: TypeId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDescription {
    pub function_id: FuncId,
    pub name: String,
    pub parameters: Vec<TypeId>,
    pub return_type: TypeId,
}
