//! Comprobación de `takeUntil` como última etapa antes de `subscribe`.

use tree_sitter::Node;

use super::{CANCELLATION_OPERATOR, PIPE_METHOD};
use super::options::RuleOptions;
use crate::rules::diagnostics::{FailureMessage, Finding};
use crate::rules::query;
use crate::rules::source::SourceFile;

/// Resultado de revisar un sitio de suscripción.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct GateOutcome {
    pub findings: Vec<Finding>,
    /// Nombre de la señal pasada a `takeUntil`, permitido o no.
    pub signal: Option<String>,
}

/// Revisa `recv.subscribe` (el `member_expression` del callee).
///
/// El gate existe sólo si `recv` es `x.pipe(..., takeUntil(...))` con
/// `takeUntil` en la última posición.
pub fn ensure_gate_before_subscribe(
    file: &SourceFile,
    subscribe: Node<'_>,
    options: &RuleOptions,
) -> GateOutcome {
    let Some(take_until) = trailing_take_until(file, subscribe) else {
        let anchor = query::member_property(subscribe).unwrap_or(subscribe);
        return GateOutcome {
            findings: vec![Finding::at(anchor, FailureMessage::MissingGate)],
            signal: None,
        };
    };
    check_signal_name(file, take_until, options)
}

/// La llamada `takeUntil(...)` en la última posición del `pipe` receptor.
fn trailing_take_until<'t>(file: &SourceFile, subscribe: Node<'t>) -> Option<Node<'t>> {
    let receiver = subscribe.child_by_field_name("object")?;
    query::member_call(file, receiver, PIPE_METHOD)?;
    let last = query::call_arguments(receiver).pop()?;
    (query::callee_identifier(file, last) == Some(CANCELLATION_OPERATOR)).then_some(last)
}

fn check_signal_name(file: &SourceFile, take_until: Node<'_>, options: &RuleOptions) -> GateOutcome {
    let disallowed = FailureMessage::DisallowedSignalName {
        allowed: options.allowed_destroy_subject_names(),
    };

    let argument = query::call_arguments(take_until).into_iter().next();
    let Some((argument, property)) =
        argument.and_then(|arg| query::member_property(arg).map(|p| (arg, p)))
    else {
        return GateOutcome {
            findings: vec![Finding::at(take_until, disallowed)],
            signal: None,
        };
    };

    let name = file.node_text(property);
    let findings = if options.is_allowed(name) {
        Vec::new()
    } else {
        vec![Finding::at(argument, disallowed)]
    };
    GateOutcome {
        findings,
        signal: Some(name.to_string()),
    }
}
