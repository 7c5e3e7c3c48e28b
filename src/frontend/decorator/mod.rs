//! Scope construction and name resolution ("decoration").
//!
//! Decoration walks an undecorated [`TranslationUnit`](crate::common::ast::TranslationUnit)
//! once, building the [`ScopeStack`] and writing the resolved handles back
//! into the tree.

pub mod decorate;
pub mod error;
pub mod scope;

#[cfg(test)]
mod tests;

pub use decorate::decorate_translation_unit;
pub use error::ResolveError;
pub use scope::{Scope, ScopeStack};
