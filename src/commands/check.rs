use colored::*;
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::render::{self, Issue, Summary};
use super::{OutputFormat, OutputMode};
use crate::config::{LintConfig, ResolvedRule};
use crate::files;
use crate::rules::RuleEngine;
use crate::ui;

pub const EXIT_OK: i32 = 0;
pub const EXIT_FINDINGS: i32 = 1;
pub const EXIT_FATAL: i32 = 2;

#[derive(Debug, Default)]
pub struct CheckReport {
    pub checked: usize,
    pub skipped: usize,
    pub issues: Vec<Issue>,
}

impl CheckReport {
    pub fn summary(&self) -> Summary {
        Summary::new(self.checked, &self.issues)
    }
}

/// Revisa `files` en orden. Un archivo ilegible o no parseable se avisa y
/// se salta; el resto de la revisión continúa.
pub fn run_check(
    engine: &RuleEngine,
    files: &[PathBuf],
    project_root: &Path,
    output_mode: OutputMode,
    progress: &ProgressBar,
) -> CheckReport {
    let mut report = CheckReport::default();

    for file_path in files {
        let rel = files::display_path(file_path, project_root);
        progress.set_message(format!("Analizando {}...", rel));
        let started = Instant::now();

        let result = files::read_source(file_path)
            .and_then(|content| engine.validate_file(file_path, &content));

        match result {
            Ok(diagnostics) => {
                report.checked += 1;
                report
                    .issues
                    .extend(diagnostics.iter().map(|d| Issue::from_diagnostic(d, project_root)));
                progress.suspend(|| {
                    ui::detalle(
                        &format!(
                            "{} ({} hallazgo(s), {} ms)",
                            rel,
                            diagnostics.len(),
                            started.elapsed().as_millis()
                        ),
                        output_mode,
                    )
                });
            }
            Err(e) => {
                report.skipped += 1;
                progress.suspend(|| ui::advertencia(&format!("{:#}. Se omite el archivo.", e)));
            }
        }
    }

    report
}

pub fn exit_code(summary: &Summary, strict: bool) -> i32 {
    if summary.errors > 0 || (strict && summary.total() > 0) {
        EXIT_FINDINGS
    } else {
        EXIT_OK
    }
}

/// `TARGET` relativo al directorio actual; sin `TARGET`, la raíz del proyecto.
pub(crate) fn resolve_target(project_root: &Path, target: Option<&str>) -> PathBuf {
    match target {
        Some(t) => std::env::current_dir()
            .map(|cwd| cwd.join(t))
            .unwrap_or_else(|_| project_root.join(t)),
        None => project_root.to_path_buf(),
    }
}

pub fn handle_check(
    project_root: &Path,
    target: Option<String>,
    format: String,
    strict: bool,
    allow: Vec<String>,
    output_mode: OutputMode,
) -> i32 {
    let format = match super::format_to_mode(&format) {
        Ok(f) => f,
        Err(e) => {
            ui::error(&e.to_string());
            return EXIT_FATAL;
        }
    };

    let path = resolve_target(project_root, target.as_deref());
    if !path.exists() {
        match format {
            OutputFormat::Json => println!(
                "{}",
                serde_json::json!({ "error": format!("El destino '{}' no existe", path.display()) })
            ),
            OutputFormat::Sarif => println!("{}", render::render_sarif(&[])),
            OutputFormat::Text => ui::error(&format!("El destino '{}' no existe.", path.display())),
        }
        return EXIT_FATAL;
    }

    let loaded = LintConfig::load(project_root);
    let mut resolved = ResolvedRule::resolve(project_root, loaded.as_ref());
    resolved.override_allowed(&allow);
    let config = loaded.unwrap_or_default();

    let text_mode = format == OutputFormat::Text;
    let status_mode = if text_mode { output_mode } else { OutputMode::Quiet };

    let engine = if resolved.enabled {
        RuleEngine::with_rule(resolved.options.clone(), resolved.level.clone())
    } else {
        ui::info("La regla está desactivada en la configuración.", status_mode);
        RuleEngine::empty()
    };

    let files_to_check = files::collect_files(&path, &config);

    ui::mostrar_encabezado("check", status_mode);
    ui::info(
        &format!(
            "Revisando {} archivo(s) en {}",
            files_to_check.len().to_string().cyan(),
            files::display_path(&path, project_root)
        ),
        status_mode,
    );
    ui::detalle(
        &format!("Nombres permitidos ({}): {}", resolved.source, resolved.options.allowed_destroy_subject_names().join(", ")),
        status_mode,
    );

    let is_tty = std::io::IsTerminal::is_terminal(&std::io::stderr());
    let progress = ui::crear_progreso("Analizando...", status_mode != OutputMode::Quiet && is_tty);
    let report = run_check(&engine, &files_to_check, project_root, status_mode, &progress);
    progress.finish_and_clear();

    let summary = report.summary();
    match format {
        OutputFormat::Json => println!("{}", render::render_json(summary, &report.issues)),
        OutputFormat::Sarif => println!("{}", render::render_sarif(&report.issues)),
        OutputFormat::Text => {
            print!("{}", render::render_text(&report.issues));
            if output_mode != OutputMode::Quiet {
                println!("{}", render::render_summary(summary));
                if report.skipped > 0 {
                    println!("   {} {} archivo(s) omitido(s).", "⚠️".yellow(), report.skipped);
                }
            }
        }
    }

    exit_code(&summary, strict)
}
