//! Módulo de interfaz de usuario
//!
//! Líneas de estado en la terminal. Todo lo que no es el reporte en sí pasa
//! por aquí para que `--quiet` lo silencie en un solo sitio.

use colored::*;

use crate::commands::OutputMode;
use crate::config::VERSION;

pub fn mostrar_encabezado(titulo: &str, output_mode: OutputMode) {
    if output_mode == OutputMode::Quiet {
        return;
    }
    println!("\n{} {}", format!("🛡️ takeuntil-lint v{}", VERSION).green().bold(), titulo);
    println!("{}", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_cyan());
}

pub fn info(mensaje: &str, output_mode: OutputMode) {
    if output_mode != OutputMode::Quiet {
        println!("   {} {}", "ℹ️".cyan(), mensaje);
    }
}

pub fn detalle(mensaje: &str, output_mode: OutputMode) {
    if output_mode == OutputMode::Verbose {
        println!("   {}", mensaje.dimmed());
    }
}

/// Avisos no fatales: siempre a stderr, incluso en modo silencioso.
pub fn advertencia(mensaje: &str) {
    eprintln!("   {} {}", "⚠️".yellow(), mensaje.yellow());
}

pub fn error(mensaje: &str) {
    eprintln!("{} {}", "❌".red(), mensaje.red());
}

/// Helper para mostrar una barra de progreso genérica
pub fn crear_progreso(mensaje: &str, visible: bool) -> indicatif::ProgressBar {
    if !visible {
        return indicatif::ProgressBar::hidden();
    }
    let pb = indicatif::ProgressBar::new_spinner();
    if let Ok(style) = indicatif::ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(mensaje.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_progress_when_not_visible() {
        let pb = crear_progreso("Analizando...", false);
        assert!(pb.is_hidden());
        pb.finish_and_clear();
    }
}
