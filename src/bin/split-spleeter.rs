use std::process::ExitCode;

use stem_harness::{run_driver, BackendKind};

fn main() -> ExitCode {
    run_driver(BackendKind::Spleeter)
}
