mod cli;
mod commands;

use clap::Parser;

use cli::{Cli, Command};

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let code = match cli.command {
        Command::Compile {
            app_path,
            target_path,
            scan_module,
        } => commands::compile::run(&app_path, &target_path, scan_module.as_deref()),
        Command::Inspect {
            app_path,
            scan_module,
        } => commands::inspect::run(&app_path, scan_module.as_deref()),
    };
    std::process::exit(code);
}
