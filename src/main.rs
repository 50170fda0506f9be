use clap::Parser;
use std::path::PathBuf;

use takeuntil_lint::commands::{self, Cli, Commands};
use takeuntil_lint::config::LintConfig;
use takeuntil_lint::ui;

fn project_root() -> PathBuf {
    LintConfig::find_project_root()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn main() {
    let cli = Cli::parse();
    let output_mode = commands::get_output_mode(cli.quiet, cli.verbose);
    let project_root = project_root();

    let code = match cli.command {
        Some(Commands::Check { target, format, strict, allow }) => {
            commands::check::handle_check(&project_root, target, format, strict, allow, output_mode)
        }
        Some(Commands::Watch { target }) => {
            match commands::watch::handle_watch(&project_root, target, output_mode) {
                Ok(()) => commands::check::EXIT_OK,
                Err(e) => {
                    ui::error(&format!("{:#}", e));
                    commands::check::EXIT_FATAL
                }
            }
        }
        Some(Commands::Rules) => {
            commands::rules::handle_rules_command(&project_root);
            commands::check::EXIT_OK
        }
        Some(Commands::Init { force }) => {
            let root = std::env::current_dir().unwrap_or(project_root);
            commands::init::handle_init_command(&root, force)
        }
        None => {
            // Sin subcomando: revisión completa del proyecto
            commands::check::handle_check(&project_root, None, "text".to_string(), false, Vec::new(), output_mode)
        }
    };

    std::process::exit(code);
}
