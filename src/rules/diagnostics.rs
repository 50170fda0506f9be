//! Hallazgos localizados y plantillas de mensajes.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tree_sitter::Node;

use crate::rules::RuleLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticCode {
    MissingGate,
    DisallowedSignalName,
    MissingTeardownMethod,
    MissingSignalInvocation,
}

impl DiagnosticCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingGate => "missing-gate",
            Self::DisallowedSignalName => "disallowed-signal-name",
            Self::MissingTeardownMethod => "missing-teardown-method",
            Self::MissingSignalInvocation => "missing-signal-invocation",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const FAILURE_STRING: &str = "subscribe within a component must be preceded by takeUntil";

pub const FAILURE_STRING_SUBJECT_NAME: &str =
    "takeUntil argument must be one of {allowedDestroySubjectNames}";

pub const FAILURE_STRING_NG_ON_DESTROY: &str =
    "component containing subscribe must implement the ngOnDestroy() method";

pub const FAILURE_STRING_NG_ON_DESTROY_SUBJECT_METHOD_NOT_CALLED: &str =
    "there must be an invocation of {destroySubjectName}.{methodName}() in ngOnDestroy()";

/// Mensaje de fallo con sus parámetros con nombre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureMessage<'a> {
    MissingGate,
    DisallowedSignalName { allowed: &'a [String] },
    MissingTeardownMethod,
    MissingSignalInvocation { signal: &'a str, call: &'a str },
}

impl FailureMessage<'_> {
    pub fn code(&self) -> DiagnosticCode {
        match self {
            Self::MissingGate => DiagnosticCode::MissingGate,
            Self::DisallowedSignalName { .. } => DiagnosticCode::DisallowedSignalName,
            Self::MissingTeardownMethod => DiagnosticCode::MissingTeardownMethod,
            Self::MissingSignalInvocation { .. } => DiagnosticCode::MissingSignalInvocation,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Self::MissingGate => FAILURE_STRING.to_string(),
            Self::DisallowedSignalName { allowed } => {
                let names = allowed
                    .iter()
                    .map(|name| format!("this.{}", name))
                    .collect::<Vec<_>>()
                    .join(", ");
                fill(
                    FAILURE_STRING_SUBJECT_NAME,
                    &[("allowedDestroySubjectNames", &format!("[{}]", names))],
                )
            }
            Self::MissingTeardownMethod => FAILURE_STRING_NG_ON_DESTROY.to_string(),
            Self::MissingSignalInvocation { signal, call } => fill(
                FAILURE_STRING_NG_ON_DESTROY_SUBJECT_METHOD_NOT_CALLED,
                &[
                    ("destroySubjectName", &format!("this.{}", signal)),
                    ("methodName", call),
                ],
            ),
        }
    }
}

/// Sustituye cada `{nombre}` de la plantilla por su valor en una sola pasada:
/// los valores insertados no se vuelven a expandir.
fn fill(template: &str, params: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let param = after
            .find('}')
            .and_then(|close| {
                let name = &after[..close];
                params
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| (close, *value))
            });
        match param {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Hallazgo de un checker antes de asociarlo a archivo y severidad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub code: DiagnosticCode,
    pub message: String,
    pub start: usize,
    pub end: usize,
    /// 1-based.
    pub line: usize,
    /// 1-based, en bytes.
    pub column: usize,
}

impl Finding {
    pub fn at(node: Node<'_>, message: FailureMessage<'_>) -> Self {
        let position = node.start_position();
        Self {
            code: message.code(),
            message: message.render(),
            start: node.start_byte(),
            end: node.end_byte(),
            line: position.row + 1,
            column: position.column + 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: PathBuf,
    pub rule_name: &'static str,
    pub code: DiagnosticCode,
    pub level: RuleLevel,
    pub message: String,
    /// Offset de inicio en bytes.
    pub start: usize,
    /// Offset de fin en bytes (exclusivo).
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

/// Acumula los diagnósticos de un archivo en orden de inserción.
#[derive(Debug)]
pub struct DiagnosticSink {
    file: PathBuf,
    rule_name: &'static str,
    level: RuleLevel,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new(file: &Path, rule_name: &'static str, level: RuleLevel) -> Self {
        Self {
            file: file.to_path_buf(),
            rule_name,
            level,
            diagnostics: Vec::new(),
        }
    }

    pub fn push(&mut self, finding: Finding) {
        self.diagnostics.push(Diagnostic {
            file: self.file.clone(),
            rule_name: self.rule_name,
            code: finding.code,
            level: self.level.clone(),
            message: finding.message,
            start: finding.start,
            end: finding.end,
            line: finding.line,
            column: finding.column,
        });
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        for finding in findings {
            self.push(finding);
        }
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
