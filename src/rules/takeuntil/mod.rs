//! Regla `rxjs-prefer-angular-takeuntil-before-unsubscribe`.
//!
//! En cada clase `@Component()` toda llamada `.subscribe()` sobre un
//! `Observable` debe ir precedida de `.pipe(..., takeUntil(this.destroy$))`,
//! y `ngOnDestroy()` debe emitir y completar cada señal usada.

pub mod gate;
pub mod options;
pub mod teardown;

pub use gate::{GateOutcome, ensure_gate_before_subscribe};
pub use options::RuleOptions;
pub use teardown::check_teardown;

use tree_sitter::Node;

use crate::rules::RuleLevel;
use crate::rules::diagnostics::{Diagnostic, DiagnosticSink, Finding};
use crate::rules::query;
use crate::rules::source::SourceFile;
use crate::rules::static_analysis::StaticAnalyzer;
use crate::rules::types::{
    DeclaredTypes, NamePattern, TypeResolver, TypeUniverse, could_be_type, prelude,
};

pub const RULE_NAME: &str = "rxjs-prefer-angular-takeuntil-before-unsubscribe";

pub const RULE_DESCRIPTION: &str = "Enforces the application of the takeUntil operator \
                                    when calling of subscribe within an Angular component.";

pub const COMPONENT_DECORATOR: &str = "Component";
pub const SUBSCRIBE_METHOD: &str = "subscribe";
pub const PIPE_METHOD: &str = "pipe";
pub const CANCELLATION_OPERATOR: &str = "takeUntil";
pub const TEARDOWN_METHOD: &str = "ngOnDestroy";
/// Llamadas exigidas sobre cada señal en `ngOnDestroy`, en orden de reporte.
pub const REQUIRED_CALLS: [&str; 2] = ["next", "complete"];

#[derive(Debug, Clone)]
pub struct TakeUntilRule {
    options: RuleOptions,
    level: RuleLevel,
}

impl Default for TakeUntilRule {
    fn default() -> Self {
        Self::new(RuleOptions::default(), RuleLevel::Error)
    }
}

impl TakeUntilRule {
    pub fn new(options: RuleOptions, level: RuleLevel) -> Self {
        Self { options, level }
    }

    pub fn options(&self) -> &RuleOptions {
        &self.options
    }

    pub fn level(&self) -> &RuleLevel {
        &self.level
    }

    /// Hallazgos de todas las clases componente de `file`, en orden de fuente.
    pub fn check<T>(&self, file: &SourceFile, types: &T) -> Vec<Finding>
    where
        T: TypeResolver + TypeUniverse,
    {
        let observable = NamePattern::exact(prelude::OBSERVABLE);
        query::find_all(file.root(), |n| is_component(file, n), |_| false)
            .into_iter()
            .flat_map(|class| self.check_component(file, class, types, &observable))
            .collect()
    }

    fn check_component<T>(
        &self,
        file: &SourceFile,
        class: Node<'_>,
        types: &T,
        observable: &NamePattern,
    ) -> Vec<Finding>
    where
        T: TypeResolver + TypeUniverse,
    {
        let mut findings = Vec::new();
        let mut signals: Vec<String> = Vec::new();
        let mut has_subscribe = false;

        // las suscripciones de un componente anidado son suyas, no de `class`
        let calls = query::find_all(
            class,
            |n| query::member_call(file, n, SUBSCRIBE_METHOD).is_some(),
            |n| is_component(file, n),
        );

        for call in calls {
            let Some(subscribe) = query::member_call(file, call, SUBSCRIBE_METHOD) else {
                continue;
            };
            let Some(receiver) = subscribe.child_by_field_name("object") else {
                continue;
            };
            if !could_be_type(types, &types.type_of(receiver), observable) {
                continue;
            }

            has_subscribe = true;
            let outcome = ensure_gate_before_subscribe(file, subscribe, &self.options);
            findings.extend(outcome.findings);
            if let Some(signal) = outcome.signal {
                if !signals.contains(&signal) {
                    signals.push(signal);
                }
            }
        }

        if has_subscribe {
            findings.extend(check_teardown(file, class, &signals));
        }
        findings
    }
}

fn is_component(file: &SourceFile, node: Node<'_>) -> bool {
    query::is_class_annotated_with(file, node, COMPONENT_DECORATOR)
}

impl StaticAnalyzer for TakeUntilRule {
    fn rule_name(&self) -> &'static str {
        RULE_NAME
    }

    fn analyze(&self, file: &SourceFile) -> anyhow::Result<Vec<Diagnostic>> {
        let types = DeclaredTypes::build(file)?;
        let mut sink = DiagnosticSink::new(file.path(), RULE_NAME, self.level.clone());
        sink.extend(self.check(file, &types));
        Ok(sink.into_diagnostics())
    }
}
