use crate::rules::diagnostics::Diagnostic;
use crate::rules::source::SourceFile;

/// Un analizador estático sobre un archivo ya parseado.
///
/// Los analizadores no guardan estado entre archivos: todo lo que necesitan
/// llega en `file` y todo lo que producen sale en el resultado.
pub trait StaticAnalyzer {
    fn rule_name(&self) -> &'static str;

    /// Diagnósticos de `file` en orden de fuente. Un error aquí significa que
    /// el analizador no pudo ejecutarse, no que el código tenga fallos.
    fn analyze(&self, file: &SourceFile) -> anyhow::Result<Vec<Diagnostic>>;
}
