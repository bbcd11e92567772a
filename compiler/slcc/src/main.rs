//! SLC compiler CLI.

use std::process::exit;

use slcc::{cli, compile, frontend, tracing_setup};

fn main() {
    tracing_setup::init();

    let args: Vec<String> = std::env::args().collect();
    let Some(parsed) = cli::CliArgs::parse(&args[1..]) else {
        cli::print_usage(args.first().map_or("slcc", String::as_str));
        exit(1);
    };

    let nodes = match frontend::parse_file(&parsed.input) {
        Ok(nodes) => nodes,
        Err(error) => {
            eprintln!("cannot read input from '{}': {error}", parsed.input.display());
            exit(2);
        }
    };

    exit(compile::run_compilation(nodes, &parsed));
}
