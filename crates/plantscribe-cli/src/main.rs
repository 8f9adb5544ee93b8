//! Plantscribe CLI - Browse a codebase manifest and render PlantUML class diagrams

mod cli;
mod clipboard;

use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();

    let app = cli::PlantscribeApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
