use anyhow::Context;
use colored::*;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use super::OutputMode;
use super::check::resolve_target;
use super::render::{self, Issue};
use crate::config::{LintConfig, ResolvedRule};
use crate::files;
use crate::rules::RuleEngine;
use crate::ui;

/// Espera tras el primer evento para agrupar guardados en ráfaga.
const DEBOUNCE: Duration = Duration::from_millis(300);

/// Sólo las escrituras y creaciones disparan una nueva revisión.
pub fn should_relint(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Modify(_) | EventKind::Create(_))
}

/// Rutas a revisar tras una ráfaga: cada archivo una sola vez, en orden estable.
/// No hay estado entre ráfagas, así que un guardado posterior siempre se revisa.
pub fn batch_changes(first: PathBuf, rest: impl IntoIterator<Item = PathBuf>) -> Vec<PathBuf> {
    let mut changed = vec![first];
    changed.extend(rest);
    changed.sort();
    changed.dedup();
    changed
}

/// Revisa un archivo y devuelve sus hallazgos con rutas relativas a `project_root`.
pub fn lint_file(engine: &RuleEngine, path: &Path, project_root: &Path) -> anyhow::Result<Vec<Issue>> {
    let content = files::read_source(path)?;
    let diagnostics = engine.validate_file(path, &content)?;
    Ok(diagnostics
        .iter()
        .map(|d| Issue::from_diagnostic(d, project_root))
        .collect())
}

pub fn handle_watch(project_root: &Path, target: Option<String>, output_mode: OutputMode) -> anyhow::Result<()> {
    let watch_path = resolve_target(project_root, target.as_deref());
    if !watch_path.exists() {
        anyhow::bail!("El destino '{}' no existe.", watch_path.display());
    }

    let config = LintConfig::load(project_root).unwrap_or_default();
    let resolved = ResolvedRule::resolve(project_root, Some(&config));
    if !resolved.enabled {
        ui::info("La regla está desactivada en la configuración; nada que vigilar.", output_mode);
        return Ok(());
    }
    let engine = RuleEngine::with_rule(resolved.options, resolved.level);

    let (tx, rx) = mpsc::channel::<PathBuf>();
    let watch_root = watch_path.clone();
    let config_watcher = config.clone();
    let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
        if let Ok(event) = res {
            if should_relint(&event.kind) {
                for path in event.paths {
                    let relative = path.strip_prefix(&watch_root).unwrap_or(&path);
                    if !config_watcher.debe_ignorar(relative) {
                        let _ = tx.send(path);
                    }
                }
            }
        }
    })
    .context("No se pudo iniciar el vigilante de archivos")?;
    watcher
        .watch(&watch_path, RecursiveMode::Recursive)
        .with_context(|| format!("No se pudo vigilar {}", watch_path.display()))?;

    ui::mostrar_encabezado("watch", output_mode);
    ui::info(
        &format!("Vigilando {} (Ctrl+C para salir)", watch_path.display().to_string().cyan()),
        output_mode,
    );

    while let Ok(first) = rx.recv() {
        std::thread::sleep(DEBOUNCE);
        for path in batch_changes(first, rx.try_iter()) {
            if !path.is_file() {
                continue;
            }
            match lint_file(&engine, &path, project_root) {
                Ok(issues) if issues.is_empty() => {
                    if output_mode != OutputMode::Quiet {
                        println!(
                            "   {} {}",
                            "✅".green(),
                            files::display_path(&path, project_root)
                        );
                    }
                }
                Ok(issues) => print!("{}", render::render_text(&issues)),
                Err(e) => ui::advertencia(&format!("{:#}", e)),
            }
        }
    }

    Ok(())
}
