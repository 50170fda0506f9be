use colored::*;
use std::path::{Path, PathBuf};

use crate::config::{CONFIG_FILE, LintConfig, TSLINT_FILES};
use crate::rules::takeuntil::options::DEFAULT_ALLOWED_DESTROY_SUBJECT_NAMES;

/// Runs `takeuntil-lint init` in `project_root`.
/// Returns Err if config already exists and force == false.
pub fn run_init(project_root: &Path, force: bool) -> anyhow::Result<PathBuf> {
    let config_path = project_root.join(CONFIG_FILE);

    if config_path.exists() && !force {
        anyhow::bail!(
            "Ya existe una configuración en {}. Usa --force para sobrescribir.",
            config_path.display()
        );
    }

    let defaults = LintConfig::default();
    let quote = |items: &[String]| {
        items
            .iter()
            .map(|e| format!("\"{}\"", e))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let allowed = DEFAULT_ALLOWED_DESTROY_SUBJECT_NAMES
        .iter()
        .map(|e| format!("\"{}\"", e))
        .collect::<Vec<_>>()
        .join(", ");

    let config_content = format!(
        r#"# takeuntil-lint: configuración del proyecto
# Generado por `takeuntil-lint init`

version = "{version}"
file_extensions = [{extensions}]
ignore_patterns = [{ignore}]
include_tests = false

[rule]
enabled = true
# error | warning | info
severity = "error"
# Reemplaza por completo la lista por defecto
allowedDestroySubjectNames = [{allowed}]
"#,
        version = defaults.version,
        extensions = quote(&defaults.file_extensions),
        ignore = quote(&defaults.ignore_patterns),
        allowed = allowed,
    );

    std::fs::write(&config_path, &config_content)?;
    Ok(config_path)
}

pub fn handle_init_command(project_root: &Path, force: bool) -> i32 {
    println!("\n{}", "🚀 takeuntil-lint init".bold().green());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if let Some(tslint) = TSLINT_FILES.iter().find(|f| project_root.join(f).is_file()) {
        println!(
            "   ℹ️  Se detectó {}: {} tiene prioridad sobre él.",
            tslint.cyan(),
            CONFIG_FILE
        );
    }

    match run_init(project_root, force) {
        Ok(config_path) => {
            println!("   ✅ Configuración creada en: {}", config_path.display().to_string().cyan());
            println!("\n   {} Próximos pasos:", "💡".yellow());
            println!("      takeuntil-lint check src/    # revisión completa");
            println!("      takeuntil-lint watch src/    # revisión al guardar");
            0
        }
        Err(e) => {
            eprintln!("   ❌ {}", e);
            eprintln!("   💡 Usa --force para sobrescribir la configuración existente.");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolvedRule;
    use crate::rules::takeuntil::RuleOptions;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_loadable_config() {
        let tmp = TempDir::new().unwrap();
        let path = run_init(tmp.path(), false).unwrap();
        assert_eq!(path, tmp.path().join(CONFIG_FILE));

        let config = LintConfig::load(tmp.path()).expect("init must write a valid config");
        assert_eq!(config.file_extensions, vec!["ts", "tsx"]);
        assert_eq!(config.rule.enabled, Some(true));

        let resolved = ResolvedRule::resolve(tmp.path(), Some(&config));
        assert_eq!(resolved.options, RuleOptions::default());
    }

    #[test]
    fn test_init_does_not_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE);
        std::fs::write(&config_path, "include_tests = true").unwrap();

        let result = run_init(tmp.path(), false);
        assert!(result.is_err(), "init without force should fail if config exists");
        let content = std::fs::read_to_string(&config_path).unwrap();
        assert_eq!(content, "include_tests = true", "content must be unchanged");
    }

    #[test]
    fn test_init_with_force_overwrites() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE);
        std::fs::write(&config_path, "old = true").unwrap();

        run_init(tmp.path(), true).unwrap();
        let content = std::fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("allowedDestroySubjectNames"), "force should overwrite with new config");
    }
}
