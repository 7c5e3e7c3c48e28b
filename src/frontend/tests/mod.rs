// Common test utilities
mod common;

mod type_parser;
