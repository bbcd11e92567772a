//! Native toolchain invocation: `llc` to assemble, `gcc` to link.

use std::io;
use std::path::Path;
use std::process::Command;

/// Where the runtime library was installed, fixed at build time.
const RUNTIME_PREFIX: &str = match option_env!("SLC_RUNTIME_PREFIX") {
    Some(prefix) => prefix,
    None => "/usr/local/lib",
};

/// The `llc` invocation for an emitted `.ll` file.
pub fn llc_command(ll_path: &Path) -> Command {
    let mut cmd = Command::new("llc");
    cmd.arg(ll_path);
    cmd
}

/// The `gcc` link step: assembly plus the runtime library, then any
/// pass-through options.
pub fn gcc_command(asm_path: &Path, output: &Path, gcc_opts: &[String]) -> Command {
    let mut cmd = Command::new("gcc");
    cmd.arg(asm_path);
    cmd.arg(format!("-L{RUNTIME_PREFIX}/"));
    cmd.arg("-lslc_runtime");
    cmd.arg("-o").arg(output);
    cmd.args(gcc_opts);
    cmd
}

/// Assemble the module next to the input and link the executable.
pub fn assemble_and_link(input: &Path, output: &Path, gcc_opts: &[String]) -> io::Result<()> {
    let ll_path = suffixed(input, "ll");
    let asm_path = suffixed(input, "s");

    let status = llc_command(Path::new(&ll_path)).status()?;
    if !status.success() {
        return Err(io::Error::other(format!("llc exited with {status}")));
    }
    let status = gcc_command(Path::new(&asm_path), output, gcc_opts).status()?;
    if !status.success() {
        return Err(io::Error::other(format!("gcc exited with {status}")));
    }
    Ok(())
}

/// `P` → `P.<suffix>`, keeping the original extension.
pub fn suffixed(path: &Path, suffix: &str) -> String {
    format!("{}.{suffix}", path.display())
}
