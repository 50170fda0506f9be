use anyhow::Context;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::rules::RuleLevel;
use crate::rules::languages::SUPPORTED_EXTENSIONS;
use crate::rules::takeuntil::{RULE_NAME, RuleOptions, options::OPTION_KEY};

/// Versión actual (leída desde Cargo.toml en tiempo de compilación)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const CONFIG_FILE: &str = ".takeuntilrc.toml";

/// Archivos de tslint que se consultan, en orden de prioridad.
pub const TSLINT_FILES: &[&str] = &["tslint.json", "tslint.yaml", "tslint.yml"];

/// Marcadores que identifican la raíz de un proyecto Angular/TypeScript.
const PROJECT_MARKERS: &[&str] = &["angular.json", "tslint.json", "tsconfig.json", "package.json"];

fn default_extensions() -> Vec<String> {
    vec!["ts".to_string(), "tsx".to_string()]
}

fn default_ignore_patterns() -> Vec<String> {
    vec![
        "node_modules".to_string(),
        "dist".to_string(),
        ".git".to_string(),
        "build".to_string(),
        ".angular".to_string(),
        "coverage".to_string(),
    ]
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LintConfig {
    pub version: String,
    pub file_extensions: Vec<String>, // Extensiones de archivo a revisar
    pub ignore_patterns: Vec<String>,
    pub include_tests: bool, // Revisar también *.spec.ts / *.test.ts
    pub rule: RuleSection,
}

/// Sección `[rule]`. Los campos ausentes no pisan lo que diga tslint.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct RuleSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<RuleLevel>,
    /// Se guarda sin tipar: un valor que no sea array se ignora en vez de
    /// romper la carga del archivo.
    #[serde(rename = "allowedDestroySubjectNames", skip_serializing_if = "Option::is_none")]
    pub allowed_destroy_subject_names: Option<toml::Value>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            version: VERSION.to_string(),
            file_extensions: default_extensions(),
            ignore_patterns: default_ignore_patterns(),
            include_tests: false,
            rule: RuleSection::default(),
        }
    }
}

impl LintConfig {
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let toml = toml::to_string_pretty(self)?;
        fs::write(path.join(CONFIG_FILE), toml)
            .with_context(|| format!("No se pudo escribir {}", path.join(CONFIG_FILE).display()))?;
        Ok(())
    }

    /// Carga `.takeuntilrc.toml` desde `path`.
    ///
    /// Devuelve `None` si el archivo no existe. Un archivo malformado se
    /// avisa por consola y también devuelve `None`: la configuración nunca
    /// es un error fatal.
    pub fn load(path: &Path) -> Option<Self> {
        let config_path = path.join(CONFIG_FILE);
        let content = fs::read_to_string(&config_path).ok()?;

        match toml::from_str::<LintConfig>(&content) {
            Ok(mut config) => {
                if config.file_extensions.is_empty() {
                    config.file_extensions = default_extensions();
                }
                Some(config)
            }
            Err(e) => {
                eprintln!(
                    "{}",
                    format!(
                        "   ⚠️  No se pudo leer {} ({}). Usando valores por defecto.",
                        config_path.display(),
                        e.message()
                    )
                    .yellow()
                );
                None
            }
        }
    }

    /// Sube desde el directorio actual hasta encontrar la raíz del proyecto.
    pub fn find_project_root() -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        Self::find_project_root_from(&cwd)
    }

    /// Primer ancestro de `start` con `.takeuntilrc.toml`; si no hay ninguno,
    /// el primero con un marcador de proyecto (`angular.json`, `package.json`...).
    pub fn find_project_root_from(start: &Path) -> Option<PathBuf> {
        if let Some(dir) = start.ancestors().find(|dir| dir.join(CONFIG_FILE).is_file()) {
            return Some(dir.to_path_buf());
        }
        start
            .ancestors()
            .find(|dir| PROJECT_MARKERS.iter().any(|m| dir.join(m).is_file()))
            .map(Path::to_path_buf)
    }

    pub fn debe_ignorar(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().replace('\\', "/");

        // 1. Tests, salvo que se pidan explícitamente
        if !self.include_tests && (path_str.contains(".spec.") || path_str.contains(".test.")) {
            return true;
        }

        // 2. Extensión permitida por la configuración y parseable
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        let tiene_extension_valida = self.file_extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext))
            && SUPPORTED_EXTENSIONS.contains(&ext.as_str());
        if !tiene_extension_valida {
            return true;
        }

        // 3. Filtros por componente de ruta
        path.components().any(|component| {
            let name = component.as_os_str().to_string_lossy();
            self.ignore_patterns.iter().any(|pattern| name == pattern.as_str())
        })
    }
}

/// De dónde salió la configuración efectiva de la regla.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
    Default,
    Tslint(PathBuf),
    RcFile(PathBuf),
    CommandLine,
}

impl std::fmt::Display for RuleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleSource::Default => write!(f, "valores por defecto"),
            RuleSource::Tslint(path) | RuleSource::RcFile(path) => write!(f, "{}", path.display()),
            RuleSource::CommandLine => write!(f, "--allow"),
        }
    }
}

/// Entrada de la regla en `tslint.json` / `tslint.yaml`.
#[derive(Debug, Clone, PartialEq)]
pub struct TslintRule {
    pub enabled: bool,
    pub level: Option<RuleLevel>,
    pub arguments: Vec<Value>,
}

impl TslintRule {
    /// Interpreta las formas que acepta tslint:
    /// `true`, `[true, {...}]`, `{ "severity": "warning", "options": [...] }`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(enabled) => Some(Self {
                enabled: *enabled,
                level: None,
                arguments: Vec::new(),
            }),
            Value::Array(items) => {
                let (enabled, arguments) = match items.split_first() {
                    Some((Value::Bool(enabled), rest)) => (*enabled, rest.to_vec()),
                    _ => (true, items.clone()),
                };
                Some(Self {
                    enabled,
                    level: None,
                    arguments,
                })
            }
            Value::Object(map) => {
                let severity = map.get("severity").and_then(Value::as_str);
                let enabled = !matches!(severity, Some("off" | "none"));
                let level = severity.and_then(parse_severity);
                let arguments = match map.get("options") {
                    Some(Value::Array(items)) => items.clone(),
                    Some(Value::Null) | None => Vec::new(),
                    Some(other) => vec![other.clone()],
                };
                Some(Self {
                    enabled,
                    level,
                    arguments,
                })
            }
            _ => None,
        }
    }
}

fn parse_severity(severity: &str) -> Option<RuleLevel> {
    match severity.to_lowercase().as_str() {
        "error" | "default" => Some(RuleLevel::Error),
        "warning" | "warn" => Some(RuleLevel::Warning),
        "info" | "note" => Some(RuleLevel::Info),
        _ => None,
    }
}

/// Busca la regla en el primer archivo de tslint presente en `root`.
/// `Ok(None)` si no hay archivo o el archivo no menciona la regla.
pub fn load_tslint(root: &Path) -> anyhow::Result<Option<(PathBuf, TslintRule)>> {
    let Some(path) = TSLINT_FILES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.is_file())
    else {
        return Ok(None);
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("No se pudo leer {}", path.display()))?;
    let document: Value = if path.extension().is_some_and(|e| e == "json") {
        serde_json::from_str(&content)
            .with_context(|| format!("JSON inválido en {}", path.display()))?
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("YAML inválido en {}", path.display()))?
    };

    let rule = document
        .get("rules")
        .and_then(|rules| rules.get(RULE_NAME))
        .and_then(TslintRule::from_value);
    Ok(rule.map(|rule| (path, rule)))
}

/// Configuración efectiva de la regla tras aplicar todas las fuentes.
#[derive(Debug, Clone)]
pub struct ResolvedRule {
    pub enabled: bool,
    pub level: RuleLevel,
    pub options: RuleOptions,
    /// Origen de la lista de nombres permitidos.
    pub source: RuleSource,
}

impl Default for ResolvedRule {
    fn default() -> Self {
        Self {
            enabled: true,
            level: RuleLevel::Error,
            options: RuleOptions::default(),
            source: RuleSource::Default,
        }
    }
}

impl ResolvedRule {
    /// Defaults, luego tslint, luego `.takeuntilrc.toml`. Un tslint ilegible
    /// se avisa y se ignora.
    pub fn resolve(root: &Path, config: Option<&LintConfig>) -> Self {
        let mut resolved = Self::default();

        match load_tslint(root) {
            Ok(Some((path, rule))) => {
                resolved.enabled = rule.enabled;
                if let Some(level) = rule.level {
                    resolved.level = level;
                }
                if has_allow_list(&rule.arguments) {
                    resolved.options = RuleOptions::from_rule_arguments(&rule.arguments);
                    resolved.source = RuleSource::Tslint(path);
                }
            }
            Ok(None) => {}
            Err(e) => eprintln!("{}", format!("   ⚠️  {:#}", e).yellow()),
        }

        if let Some(config) = config {
            resolved.apply_rc(&config.rule, root.join(CONFIG_FILE));
        }
        resolved
    }

    fn apply_rc(&mut self, section: &RuleSection, path: PathBuf) {
        if let Some(enabled) = section.enabled {
            self.enabled = enabled;
        }
        if let Some(level) = &section.severity {
            self.level = level.clone();
        }
        if let Some(raw) = &section.allowed_destroy_subject_names {
            let value = serde_json::to_value(raw).unwrap_or(Value::Null);
            self.options = RuleOptions::from_rule_arguments(&[serde_json::json!({ OPTION_KEY: value })]);
            self.source = RuleSource::RcFile(path);
        }
    }

    /// `--allow NAME...` reemplaza la lista por completo.
    pub fn override_allowed(&mut self, names: &[String]) {
        if names.is_empty() {
            return;
        }
        self.options = RuleOptions::with_allowed(names.iter().cloned());
        self.source = RuleSource::CommandLine;
    }
}

fn has_allow_list(arguments: &[Value]) -> bool {
    arguments
        .iter()
        .any(|arg| arg.as_object().is_some_and(|o| o.contains_key(OPTION_KEY)))
}
