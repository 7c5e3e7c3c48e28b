//! Command line configuration for `zppc`

use clap::Parser;
use std::path::{Path, PathBuf};
use zpp::pipeline::{CompileOptions, DEFAULT_ENTRY_POINT};

#[derive(Parser, Debug)]
#[command(name = "zppc", about = "zpp to x86-64 NASM compiler", version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Source file to compile
    pub input: PathBuf,

    /// Output path (defaults to the input stem with a suitable extension)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Stop after writing the assembly listing
    #[arg(short = 'S', conflicts_with = "object_only")]
    pub assembly_only: bool,

    /// Stop after assembling an object file, do not link
    #[arg(short = 'c')]
    pub object_only: bool,

    /// Link a shared library instead of an executable
    #[arg(long = "shared", conflicts_with_all = ["assembly_only", "object_only"])]
    pub shared: bool,

    /// Print the decorated syntax tree
    #[arg(long = "dump-ast")]
    pub dump_ast: bool,

    /// Print every scope with its declarations
    #[arg(long = "dump-scopes")]
    pub dump_scopes: bool,

    /// Function called by the generated `_start`
    #[arg(long = "entry", value_name = "NAME", default_value = DEFAULT_ENTRY_POINT)]
    pub entry: String,

    /// Assembler executable
    #[arg(long = "nasm", env = "ZPP_NASM", default_value = "nasm")]
    pub nasm: String,

    /// Linker executable
    #[arg(long = "ld", env = "ZPP_LD", default_value = "ld")]
    pub ld: String,

    /// Keep the `.asm` and `.o` files produced on the way to an executable
    #[arg(long = "keep-intermediates")]
    pub keep_intermediates: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// How far the driver goes after code generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Assembly,
    Object,
    Executable,
    SharedLibrary,
}

impl OutputKind {
    fn extension(self) -> &'static str {
        match self {
            OutputKind::Assembly => "asm",
            OutputKind::Object => "o",
            OutputKind::Executable => "",
            OutputKind::SharedLibrary => "so",
        }
    }
}

impl Cli {
    pub fn output_kind(&self) -> OutputKind {
        if self.assembly_only {
            OutputKind::Assembly
        } else if self.object_only {
            OutputKind::Object
        } else if self.shared {
            OutputKind::SharedLibrary
        } else {
            OutputKind::Executable
        }
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            entry_point: self.entry.clone(),
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    /// Final artifact path: `-o` when given, otherwise derived from the input.
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => sibling_with_extension(&self.input, self.output_kind().extension()),
        }
    }

    /// Path of an intermediate file placed next to the final artifact.
    pub fn intermediate_path(&self, kind: OutputKind) -> PathBuf {
        sibling_with_extension(&self.output_path(), kind.extension())
    }
}

fn sibling_with_extension(path: &Path, extension: &str) -> PathBuf {
    let mut result = path.to_path_buf();
    result.set_extension(extension);
    result
}
