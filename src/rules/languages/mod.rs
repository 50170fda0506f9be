pub mod typescript;

use std::path::Path;
use tree_sitter::Language;

/// Extensiones que el analizador sabe parsear.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts"];

/// Returns the tree-sitter Language for the given file extension.
/// Returns None for unsupported extensions.
pub fn get_language(ext: &str) -> Option<Language> {
    match ext {
        "ts" | "mts" | "cts" => Some(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
        "tsx" => Some(tree_sitter_typescript::LANGUAGE_TSX.into()),
        _ => None,
    }
}

/// Igual que [`get_language`] pero a partir de la ruta completa del archivo.
pub fn language_for_path(path: &Path) -> Option<Language> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    get_language(&ext.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_returns_language_for_ts_and_tsx() {
        assert!(get_language("ts").is_some());
        assert!(get_language("tsx").is_some());
        assert!(get_language("mts").is_some());
    }

    #[test]
    fn test_registry_returns_none_for_unknown() {
        assert!(get_language("go").is_none());
        assert!(get_language("js").is_none());
        assert!(language_for_path(Path::new("README.md")).is_none());
    }

    #[test]
    fn test_language_for_path_is_case_insensitive() {
        assert!(language_for_path(Path::new("src/app/App.Component.TS")).is_some());
    }
}
