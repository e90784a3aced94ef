use std::{env, process::ExitCode};

use tally::{cli::run_cli, init};

fn main() -> ExitCode {
    init();
    run_cli(env::args().skip(1))
}
