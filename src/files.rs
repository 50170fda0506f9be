//! # Recolección de archivos a revisar
//!
//! Recorre el destino respetando `.gitignore` y los filtros de
//! `.takeuntilrc.toml`, y devuelve las rutas en orden estable.

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::LintConfig;

/// Archivos TypeScript bajo `target`.
///
/// Un archivo pasado directamente se revisa aunque sea un test o esté en un
/// directorio ignorado; sólo se exige que su extensión sea parseable.
pub fn collect_files(target: &Path, config: &LintConfig) -> Vec<PathBuf> {
    if target.is_file() {
        let parseable = crate::rules::languages::language_for_path(target).is_some();
        return if parseable { vec![target.to_path_buf()] } else { Vec::new() };
    }

    let walker = ignore::WalkBuilder::new(target)
        .hidden(false)
        .git_ignore(true)
        .build();

    let mut files: Vec<PathBuf> = walker
        .flatten()
        .map(|entry| entry.into_path())
        .filter(|p| p.is_file())
        .filter(|p| {
            let relative = p.strip_prefix(target).unwrap_or(p);
            !config.debe_ignorar(relative)
        })
        .collect();

    files.sort();
    files
}

pub fn read_source(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("No se pudo leer {}", path.display()))
}

/// Ruta de `path` relativa a `root`, con `/` como separador.
pub fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
