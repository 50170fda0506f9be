pub mod diagnostics;
pub mod engine;
pub mod languages;
pub mod query;
pub mod source;
pub mod static_analysis;
pub mod takeuntil;
pub mod types;

pub use diagnostics::{Diagnostic, DiagnosticCode};
pub use engine::RuleEngine;
pub use source::SourceFile;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    Error,
    Warning,
    Info,
}

impl RuleLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleLevel::Error => "error",
            RuleLevel::Warning => "warning",
            RuleLevel::Info => "info",
        }
    }

    /// Nivel SARIF equivalente (`note` para info).
    pub fn sarif_level(&self) -> &'static str {
        match self {
            RuleLevel::Error => "error",
            RuleLevel::Warning => "warning",
            RuleLevel::Info => "note",
        }
    }
}

impl std::fmt::Display for RuleLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
