//! The compilation pipeline.

use std::fs;
use std::path::Path;

use inkwell::context::Context;
use tracing::{info, warn};

use slc_diagnostic::{Diagnostic, TerminalEmitter};
use slc_ir::{NodeArena, ScopeArena};
use slc_llvm::{CodegenCx, IrGen};

use crate::cli::CliArgs;
use crate::toolchain;

/// Run one compilation over an already-parsed arena.
///
/// Returns the process exit code: `0` success, `1` semantic or IR
/// failure, `2` I/O or child-process failure. The AST dump is written
/// before analysis, so it survives failed compilations; the `.ll` file is
/// only written for a verified module.
pub fn run_compilation(mut nodes: NodeArena, args: &CliArgs) -> i32 {
    let input = args.input.as_path();

    write_ast_dump(&nodes, input);

    let mut scopes = ScopeArena::new();
    if let Err(problem) = slc_sema::analyze(&mut nodes, &mut scopes) {
        TerminalEmitter::stderr().emit(&problem.into_diagnostic());
        return 1;
    }
    info!("semantic analysis complete");

    let context = Context::create();
    let cx = CodegenCx::new(&context, "slc");
    let mut gen = IrGen::new(&cx, &nodes, &scopes);
    if gen.lower_module().is_none() {
        return 1;
    }
    if let Err(message) = cx.llmod().verify() {
        TerminalEmitter::stderr().emit(&Diagnostic::internal(format!(
            "emitted module failed verification: {}",
            message.to_string()
        )));
        return 1;
    }

    let ll_path = toolchain::suffixed(input, "ll");
    if let Err(message) = cx.llmod().print_to_file(Path::new(&ll_path)) {
        eprintln!("cannot write '{ll_path}': {message}");
        return 2;
    }
    info!(path = %ll_path, "wrote LLVM IR");

    let Some(output) = &args.output else {
        return 0;
    };
    match toolchain::assemble_and_link(input, output, &args.gcc_opts) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("native toolchain failed: {error}");
            2
        }
    }
}

/// Write the `.yml` AST dump; failure to write the dump never fails the
/// compilation.
fn write_ast_dump(nodes: &NodeArena, input: &Path) {
    let yml_path = toolchain::suffixed(input, "yml");
    if let Err(error) = fs::write(&yml_path, nodes.pretty()) {
        warn!(path = %yml_path, "cannot write AST dump: {error}");
    }
}
