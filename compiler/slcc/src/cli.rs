//! Command-line argument handling.
//!
//! Three accepted forms:
//!
//! ```text
//! slcc <input>                                  emit LLVM IR only
//! slcc <input> -o <output>                      compile to an executable
//! slcc <input> -o <output> --gcc-opts <opts>…   pass extra options to gcc
//! ```

use std::path::PathBuf;

/// Parsed command-line arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub gcc_opts: Vec<String>,
}

impl CliArgs {
    /// Parse the arguments after the program name; `None` means usage
    /// error.
    pub fn parse(args: &[String]) -> Option<CliArgs> {
        match args {
            [input] => Some(CliArgs {
                input: PathBuf::from(input),
                output: None,
                gcc_opts: Vec::new(),
            }),
            [input, flag, output] if flag == "-o" => Some(CliArgs {
                input: PathBuf::from(input),
                output: Some(PathBuf::from(output)),
                gcc_opts: Vec::new(),
            }),
            [input, flag, output, gcc_flag, rest @ ..]
                if flag == "-o" && gcc_flag == "--gcc-opts" && !rest.is_empty() =>
            {
                Some(CliArgs {
                    input: PathBuf::from(input),
                    output: Some(PathBuf::from(output)),
                    gcc_opts: rest.to_vec(),
                })
            }
            _ => None,
        }
    }
}

/// Print usage to stderr.
pub fn print_usage(program: &str) {
    eprintln!("Invalid args.");
    eprintln!("Usage:");
    eprintln!("{program} [file]:\t\t create llvm intermediate");
    eprintln!("{program} [file] -o [output]:\t\t compile to executable");
    eprintln!(
        "{program} [file] -o [output] --gcc-opts [opts]*:\t compile to executable, pass anything after gcc opts to gcc"
    );
}
