//! Comprobación de `ngOnDestroy()` en componentes con suscripciones.

use std::collections::HashSet;
use tree_sitter::Node;

use super::{REQUIRED_CALLS, TEARDOWN_METHOD};
use crate::rules::diagnostics::{FailureMessage, Finding};
use crate::rules::query;
use crate::rules::source::SourceFile;

/// Exige `ngOnDestroy` en `class` y, dentro de él, `this.<señal>.next()` y
/// `this.<señal>.complete()` para cada señal de `signals`.
///
/// Los hallazgos salen agrupados por llamada requerida (`next` primero) y,
/// dentro de cada grupo, en el orden de `signals`.
pub fn check_teardown(file: &SourceFile, class: Node<'_>, signals: &[String]) -> Vec<Finding> {
    let Some((method, name)) = teardown_method(file, class) else {
        return vec![Finding::at(
            query::class_name_anchor(class),
            FailureMessage::MissingTeardownMethod,
        )];
    };

    let mut findings = Vec::new();
    for call in REQUIRED_CALLS {
        let invoked = invoked_signals(file, method, call);
        for signal in signals {
            if !invoked.contains(signal.as_str()) {
                findings.push(Finding::at(
                    name,
                    FailureMessage::MissingSignalInvocation {
                        signal: signal.as_str(),
                        call,
                    },
                ));
            }
        }
    }
    findings
}

/// El miembro `ngOnDestroy` (método o campo) y el nodo de su nombre.
fn teardown_method<'t>(file: &SourceFile, class: Node<'t>) -> Option<(Node<'t>, Node<'t>)> {
    query::class_members(class).into_iter().find_map(|member| {
        let name = query::member_name(member)?;
        (file.node_text(name) == TEARDOWN_METHOD).then_some((member, name))
    })
}

/// Señales `s` para las que `method` contiene alguna llamada `<expr>.s.<call>()`.
fn invoked_signals<'f>(file: &'f SourceFile, method: Node<'_>, call: &str) -> HashSet<&'f str> {
    query::find_all(
        method,
        |n| query::member_call(file, n, call).is_some(),
        |_| false,
    )
    .into_iter()
    .filter_map(|invocation| {
        let callee = query::member_call(file, invocation, call)?;
        let receiver = callee.child_by_field_name("object")?;
        query::member_property(receiver).map(|signal| file.node_text(signal))
    })
    .collect()
}
