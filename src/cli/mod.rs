pub mod config;
pub mod toolchain;

pub use config::{Cli, OutputKind};
pub use toolchain::Toolchain;
