//! sysml-bridge CLI - Import Papyrus parametric diagrams and export SysML model graphs

mod cli;

use clap::Parser;

fn main() {
    // Logging is set up by run() once flags and environment are known
    let cli_args = cli::Cli::parse();
    let app = cli::BridgeApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
