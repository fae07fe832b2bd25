use clap::Parser;
use skillsync_cli::{Cli, report_error};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli.run() {
        report_error(&e);
        std::process::exit(1);
    }
}
