pub mod check;
pub mod init;
pub mod render;
pub mod rules;
pub mod watch;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "takeuntil-lint")]
#[command(version)]
#[command(
    about = "Exige takeUntil antes de subscribe y un ngOnDestroy completo en componentes Angular",
    long_about = None
)]
pub struct Cli {
    /// Sólo imprime el reporte (sin mensajes de estado)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
    /// Lista cada archivo revisado y sus tiempos
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Revisa un archivo o directorio (por defecto, la raíz del proyecto)
    Check {
        /// Archivo o carpeta a revisar
        target: Option<String>,
        /// Formato de salida: text, json o sarif
        #[arg(long, default_value = "text")]
        format: String,
        /// Sale con código 1 ante cualquier hallazgo, no sólo errores
        #[arg(long)]
        strict: bool,
        /// Reemplaza la lista de nombres permitidos para takeUntil
        #[arg(long = "allow", value_name = "NAME", num_args = 1..)]
        allow: Vec<String>,
    },
    /// Vigila el proyecto y revisa cada archivo al guardarlo
    Watch {
        /// Carpeta a vigilar
        target: Option<String>,
    },
    /// Muestra la regla y su configuración efectiva
    Rules,
    /// Crea un .takeuntilrc.toml con los valores por defecto
    Init {
        /// Sobrescribe la configuración existente
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Quiet,
    Normal,
    Verbose,
}

pub fn get_output_mode(quiet: bool, verbose: bool) -> OutputMode {
    if quiet {
        OutputMode::Quiet
    } else if verbose {
        OutputMode::Verbose
    } else {
        OutputMode::Normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Sarif,
}

/// Convierte `--format` en [`OutputFormat`]. Case-insensitive.
pub fn format_to_mode(format: &str) -> anyhow::Result<OutputFormat> {
    match format.to_lowercase().as_str() {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        "sarif" => Ok(OutputFormat::Sarif),
        other => anyhow::bail!("Formato desconocido '{}'. Usa text, json o sarif.", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_with_allow_list() {
        let cli = Cli::try_parse_from([
            "takeuntil-lint", "check", "src", "--format", "json", "--allow", "a$", "b$", "-q",
        ])
        .unwrap();
        assert!(cli.quiet);
        match cli.command {
            Some(Commands::Check { target, format, strict, allow }) => {
                assert_eq!(target.as_deref(), Some("src"));
                assert_eq!(format, "json");
                assert!(!strict);
                assert_eq!(allow, vec!["a$", "b$"]);
            }
            _ => panic!("se esperaba check"),
        }
    }

    #[test]
    fn test_quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["takeuntil-lint", "-q", "-v", "rules"]).is_err());
    }

    #[test]
    fn test_output_mode_and_format() {
        assert_eq!(get_output_mode(true, false), OutputMode::Quiet);
        assert_eq!(get_output_mode(false, true), OutputMode::Verbose);
        assert_eq!(get_output_mode(false, false), OutputMode::Normal);
        assert_eq!(format_to_mode("SARIF").unwrap(), OutputFormat::Sarif);
        assert_eq!(format_to_mode("json").unwrap(), OutputFormat::Json);
        assert!(format_to_mode("xml").is_err());
    }
}
