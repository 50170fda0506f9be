//! Archivo fuente parseado con tree-sitter.
//!
//! Un `SourceFile` es inmutable: se construye una vez por pasada de análisis
//! y todas las reglas lo leen sin modificarlo.

use anyhow::{Context, anyhow};
use std::path::{Path, PathBuf};
use tree_sitter::{Language, Node, Parser, Tree};

use crate::rules::languages;

pub struct SourceFile {
    path: PathBuf,
    text: String,
    language: Language,
    tree: Tree,
}

impl SourceFile {
    /// Parsea `text` eligiendo la gramática según la extensión de `path`.
    pub fn parse(path: impl Into<PathBuf>, text: impl Into<String>) -> anyhow::Result<Self> {
        let path = path.into();
        let text = text.into();

        let language = languages::language_for_path(&path)
            .ok_or_else(|| anyhow!("Extensión no soportada: {}", path.display()))?;

        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .context("Error al cargar la gramática de TypeScript")?;

        let tree = parser
            .parse(&text, None)
            .ok_or_else(|| anyhow!("No se pudo parsear {}", path.display()))?;

        Ok(Self {
            path,
            text,
            language,
            tree,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Texto exacto cubierto por `node`. Vacío si el rango no es UTF-8 válido.
    pub fn node_text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.text.as_bytes()).unwrap_or("")
    }
}

impl std::fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFile")
            .field("path", &self.path)
            .field("len", &self.text.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_typescript_component() {
        let file = SourceFile::parse(
            "app.component.ts",
            "@Component({}) export class AppComponent {}",
        )
        .unwrap();
        assert_eq!(file.root().kind(), "program");
        assert!(!file.root().has_error());
        assert_eq!(file.path(), Path::new("app.component.ts"));
    }

    #[test]
    fn test_parse_rejects_unknown_extension() {
        let err = SourceFile::parse("main.go", "package main").unwrap_err();
        assert!(err.to_string().contains("main.go"));
    }

    #[test]
    fn test_node_text_reads_source_slice() {
        let file = SourceFile::parse("a.ts", "const answer = 42;").unwrap();
        let decl = file.root().named_child(0).unwrap();
        assert_eq!(file.node_text(decl), "const answer = 42;");
    }

    #[test]
    fn test_tsx_files_use_tsx_grammar() {
        let file = SourceFile::parse("view.tsx", "const el = <div>{value}</div>;").unwrap();
        assert!(!file.root().has_error());
    }
}
