use clap::Parser;
use marketcharts::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
