use colored::Colorize;
use std::path::Path;

use crate::config::{CONFIG_FILE, LintConfig, ResolvedRule};
use crate::rules::takeuntil::{
    CANCELLATION_OPERATOR, REQUIRED_CALLS, RULE_DESCRIPTION, RULE_NAME, TEARDOWN_METHOD,
};

/// Filas `(clave, valor)` que describen la regla efectiva.
pub fn describe_rule(resolved: &ResolvedRule) -> Vec<(&'static str, String)> {
    let allowed = resolved
        .options
        .allowed_destroy_subject_names()
        .iter()
        .map(|name| format!("this.{}", name))
        .collect::<Vec<_>>()
        .join(", ");
    vec![
        ("estado", if resolved.enabled { "[ON]" } else { "[OFF]" }.to_string()),
        ("severidad", resolved.level.to_string()),
        ("operador", format!("{}(...)", CANCELLATION_OPERATOR)),
        (
            "teardown",
            format!(
                "{}() con {}",
                TEARDOWN_METHOD,
                REQUIRED_CALLS.map(|c| format!(".{}()", c)).join(" y ")
            ),
        ),
        ("permitidos", format!("[{}]", allowed)),
        ("origen", resolved.source.to_string()),
    ]
}

pub fn handle_rules_command(project_root: &Path) {
    let config = LintConfig::load(project_root);
    let resolved = ResolvedRule::resolve(project_root, config.as_ref());

    println!("\n{}", "Reglas activas:".bold());
    println!("  {}", RULE_NAME.yellow());
    println!("  {}", RULE_DESCRIPTION.dimmed());
    for (key, value) in describe_rule(&resolved) {
        let value = if key == "estado" && resolved.enabled {
            value.green().to_string()
        } else {
            value
        };
        println!("    {:<12} {}", key, value);
    }

    println!();
    if config.is_none() {
        println!("   Info: No se encontró {}. Usando valores por defecto.", CONFIG_FILE);
        println!("   Ejecuta 'takeuntil-lint init' para crear uno.");
    } else {
        println!("   Info: Para cambiar la regla, edita la sección [rule] en {}:", CONFIG_FILE);
        println!("   [rule]");
        println!("   enabled = {}", resolved.enabled);
        println!("   severity = \"{}\"", resolved.level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleSource;
    use crate::rules::RuleLevel;
    use crate::rules::takeuntil::RuleOptions;

    #[test]
    fn test_describe_default_rule() {
        let rows = describe_rule(&ResolvedRule::default());
        let get = |k: &str| rows.iter().find(|(key, _)| *key == k).map(|(_, v)| v.clone()).unwrap();
        assert_eq!(get("estado"), "[ON]");
        assert_eq!(get("severidad"), "error");
        assert_eq!(get("permitidos"), "[this.destroy$, this._destroy$]");
        assert_eq!(get("teardown"), "ngOnDestroy() con .next() y .complete()");
        assert_eq!(get("origen"), "valores por defecto");
    }

    #[test]
    fn test_describe_overridden_rule() {
        let resolved = ResolvedRule {
            enabled: false,
            level: RuleLevel::Warning,
            options: RuleOptions::with_allowed(["stop$"]),
            source: RuleSource::CommandLine,
        };
        let rows = describe_rule(&resolved);
        assert!(rows.contains(&("estado", "[OFF]".to_string())));
        assert!(rows.contains(&("permitidos", "[this.stop$]".to_string())));
        assert!(rows.contains(&("origen", "--allow".to_string())));
    }
}
