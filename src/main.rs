use clap::Parser;
use momcheck::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
