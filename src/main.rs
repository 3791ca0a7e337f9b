#![forbid(unsafe_code)]

use std::process::ExitCode;

fn main() -> ExitCode {
    ttrack::cli::main()
}
