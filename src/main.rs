//! Command line driver for the zpp compiler.
//!
//! ```bash
//! # Assembly listing only
//! zppc -S prog.zpp
//!
//! # Object file, then link it yourself
//! zppc -c prog.zpp
//!
//! # Full build through nasm and ld
//! zppc prog.zpp -o prog
//!
//! # Shared library
//! zppc --shared util.zpp
//! ```

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, OutputKind, Toolchain};
use log::info;
use std::fs;
use zpp::pipeline::compile_and_report;

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let filename = cli.input.display().to_string();
    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("Error reading file '{}'", filename))?;

    let output = match compile_and_report(&filename, &source, &cli.compile_options()) {
        Ok(output) => output,
        Err(()) => bail!("could not compile `{}`", filename),
    };

    if cli.dump_ast {
        println!("{}", output.ast_dump);
    }
    if cli.dump_scopes {
        println!("{}", output.scope_dump);
    }

    let kind = cli.output_kind();
    let final_path = cli.output_path();
    let asm_path = match kind {
        OutputKind::Assembly => final_path.clone(),
        _ => cli.intermediate_path(OutputKind::Assembly),
    };
    fs::write(&asm_path, &output.assembly)
        .with_context(|| format!("Error writing '{}'", asm_path.display()))?;
    info!("wrote {}", asm_path.display());
    if kind == OutputKind::Assembly {
        return Ok(());
    }

    let toolchain = Toolchain::new(&cli.nasm, &cli.ld);
    let object_path = match kind {
        OutputKind::Object => final_path.clone(),
        _ => cli.intermediate_path(OutputKind::Object),
    };
    toolchain.assemble(&asm_path, &object_path)?;
    if !cli.keep_intermediates {
        remove_intermediate(&asm_path);
    }
    if kind == OutputKind::Object {
        return Ok(());
    }

    toolchain.link(&object_path, &final_path, kind == OutputKind::SharedLibrary)?;
    if !cli.keep_intermediates {
        remove_intermediate(&object_path);
    }
    info!("wrote {}", final_path.display());
    Ok(())
}

fn remove_intermediate(path: &std::path::Path) {
    if let Err(error) = fs::remove_file(path) {
        log::warn!("could not remove {}: {}", path.display(), error);
    }
}
