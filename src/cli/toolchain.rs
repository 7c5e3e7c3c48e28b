//! External assembler and linker invocation

use anyhow::{bail, Context, Result};
use log::{debug, info};
use std::path::Path;
use std::process::Command;

pub struct Toolchain {
    nasm: String,
    ld: String,
}

impl Toolchain {
    pub fn new(nasm: impl Into<String>, ld: impl Into<String>) -> Self {
        Self {
            nasm: nasm.into(),
            ld: ld.into(),
        }
    }

    /// `nasm -f elf64 -o OBJ ASM`
    pub fn assemble(&self, asm: &Path, object: &Path) -> Result<()> {
        let mut command = Command::new(&self.nasm);
        command.arg("-f").arg("elf64").arg("-o").arg(object).arg(asm);
        run(command, &self.nasm)
    }

    /// `ld [-shared] -o OUT OBJ`
    pub fn link(&self, object: &Path, output: &Path, shared: bool) -> Result<()> {
        run(self.link_command(object, output, shared), &self.ld)
    }

    fn link_command(&self, object: &Path, output: &Path, shared: bool) -> Command {
        let mut command = Command::new(&self.ld);
        if shared {
            command.arg("-shared");
        }
        command.arg("-o").arg(output).arg(object);
        command
    }
}

fn run(mut command: Command, tool: &str) -> Result<()> {
    debug!("running {:?}", command);
    let output = command
        .output()
        .with_context(|| format!("failed to start `{}`", tool))?;
    if !output.status.success() {
        bail!(
            "`{}` failed ({}):\n{}",
            tool,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim_end()
        );
    }
    info!("`{}` finished", tool);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool_reports_its_name() {
        let toolchain = Toolchain::new("zppc-no-such-assembler", "ld");
        let error = toolchain
            .assemble(Path::new("in.asm"), Path::new("out.o"))
            .unwrap_err();
        assert!(error.to_string().contains("zppc-no-such-assembler"));
    }

    #[test]
    fn test_shared_link_passes_flag_to_ld() {
        let toolchain = Toolchain::new("nasm", "ld");
        let args = |shared| {
            toolchain
                .link_command(Path::new("util.o"), Path::new("util.so"), shared)
                .get_args()
                .map(|arg| arg.to_string_lossy().into_owned())
                .collect::<Vec<_>>()
        };
        assert_eq!(args(true), ["-shared", "-o", "util.so", "util.o"]);
        assert_eq!(args(false), ["-o", "util.so", "util.o"]);
    }
}
