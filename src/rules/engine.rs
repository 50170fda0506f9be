use anyhow::Context;
use std::path::Path;

use crate::rules::diagnostics::Diagnostic;
use crate::rules::languages;
use crate::rules::source::SourceFile;
use crate::rules::static_analysis::StaticAnalyzer;
use crate::rules::takeuntil::RuleOptions;
use crate::rules::RuleLevel;

pub struct RuleEngine {
    analyzers: Vec<Box<dyn StaticAnalyzer + Send + Sync>>,
}

impl RuleEngine {
    /// Motor con la regla en su configuración por defecto.
    pub fn new() -> Self {
        Self::with_rule(RuleOptions::default(), RuleLevel::Error)
    }

    pub fn with_rule(options: RuleOptions, level: RuleLevel) -> Self {
        Self {
            analyzers: languages::typescript::analyzers(options, level),
        }
    }

    /// Motor sin analizadores (regla desactivada en la configuración).
    pub fn empty() -> Self {
        Self {
            analyzers: Vec::new(),
        }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.analyzers.iter().map(|a| a.rule_name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }

    /// Parsea `content` y ejecuta todos los analizadores, en orden de registro.
    pub fn validate_file(&self, file_path: &Path, content: &str) -> anyhow::Result<Vec<Diagnostic>> {
        if self.analyzers.is_empty() {
            return Ok(Vec::new());
        }

        let file = SourceFile::parse(file_path, content)
            .with_context(|| format!("No se pudo analizar {}", file_path.display()))?;

        let mut diagnostics = Vec::new();
        for analyzer in &self.analyzers {
            let found = analyzer
                .analyze(&file)
                .with_context(|| format!("La regla {} falló en {}", analyzer.rule_name(), file_path.display()))?;
            diagnostics.extend(found);
        }
        Ok(diagnostics)
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::DiagnosticCode;

    const UNGATED: &str = "@Component({})\nexport class A {\n  s: Observable<number>;\n  f() { this.s.subscribe(); }\n}\n";

    #[test]
    fn test_validate_file_reports_rule_findings() {
        let engine = RuleEngine::new();
        let diagnostics = engine.validate_file(Path::new("a.component.ts"), UNGATED).unwrap();
        let codes: Vec<DiagnosticCode> = diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            vec![DiagnosticCode::MissingGate, DiagnosticCode::MissingTeardownMethod]
        );
        assert!(diagnostics.iter().all(|d| d.file == Path::new("a.component.ts")));
    }

    #[test]
    fn test_empty_engine_skips_parsing() {
        let engine = RuleEngine::empty();
        assert!(engine.is_empty());
        let diagnostics = engine.validate_file(Path::new("notes.txt"), "anything").unwrap();
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unsupported_extension_is_an_error() {
        let err = RuleEngine::new()
            .validate_file(Path::new("main.go"), "package main")
            .unwrap_err();
        assert!(format!("{:#}", err).contains("main.go"));
    }

    #[test]
    fn test_tsx_component_is_analyzed() {
        let engine = RuleEngine::with_rule(RuleOptions::default(), RuleLevel::Info);
        let diagnostics = engine.validate_file(Path::new("a.component.tsx"), UNGATED).unwrap();
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.level == RuleLevel::Info));
    }
}
