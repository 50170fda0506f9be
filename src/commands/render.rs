use colored::*;
use serde::Serialize;
use std::path::Path;

use crate::files::display_path;
use crate::rules::takeuntil::RULE_DESCRIPTION;
use crate::rules::{Diagnostic, RuleLevel};

/// Hallazgo listo para imprimir, con la ruta relativa a la raíz del proyecto.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Issue {
    pub file: String,
    pub rule: String,
    pub code: String,
    pub severity: RuleLevel,
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub start: usize,
    pub end: usize,
}

impl Issue {
    pub fn from_diagnostic(diagnostic: &Diagnostic, project_root: &Path) -> Self {
        Self {
            file: display_path(&diagnostic.file, project_root),
            rule: diagnostic.rule_name.to_string(),
            code: diagnostic.code.to_string(),
            severity: diagnostic.level.clone(),
            message: diagnostic.message.clone(),
            line: diagnostic.line,
            column: diagnostic.column,
            start: diagnostic.start,
            end: diagnostic.end,
        }
    }
}

#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub checked: usize,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

impl Summary {
    pub fn new(checked: usize, issues: &[Issue]) -> Self {
        let mut summary = Self {
            checked,
            ..Self::default()
        };
        for issue in issues {
            match issue.severity {
                RuleLevel::Error => summary.errors += 1,
                RuleLevel::Warning => summary.warnings += 1,
                RuleLevel::Info => summary.infos += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.infos
    }
}

pub fn render_json(summary: Summary, issues: &[Issue]) -> String {
    #[derive(Serialize)]
    struct JsonOutput<'a> {
        #[serde(flatten)]
        summary: Summary,
        issues: &'a [Issue],
    }
    serde_json::to_string_pretty(&JsonOutput { summary, issues }).unwrap_or_default()
}

pub fn render_sarif(issues: &[Issue]) -> String {
    // Collect unique rule IDs for the driver.rules array
    let mut seen_rules: Vec<&str> = Vec::new();
    for issue in issues {
        if !seen_rules.contains(&issue.rule.as_str()) {
            seen_rules.push(&issue.rule);
        }
    }

    let rules_json: Vec<serde_json::Value> = seen_rules
        .iter()
        .map(|r| {
            serde_json::json!({
                "id": r,
                "shortDescription": { "text": RULE_DESCRIPTION }
            })
        })
        .collect();

    let results_json: Vec<serde_json::Value> = issues
        .iter()
        .map(|i| {
            serde_json::json!({
                "ruleId": i.rule,
                "level": i.severity.sarif_level(),
                "message": { "text": i.message },
                "properties": { "code": i.code },
                "locations": [{
                    "physicalLocation": {
                        "artifactLocation": {
                            "uri": i.file,
                            "uriBaseId": "%SRCROOT%"
                        },
                        "region": {
                            "startLine": i.line,
                            "startColumn": i.column,
                            "charOffset": i.start,
                            "charLength": i.end.saturating_sub(i.start)
                        }
                    }
                }]
            })
        })
        .collect();

    let sarif = serde_json::json!({
        "$schema": "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json",
        "version": "2.1.0",
        "runs": [{
            "tool": {
                "driver": {
                    "name": "takeuntil-lint",
                    "version": env!("CARGO_PKG_VERSION"),
                    "rules": rules_json
                }
            },
            "results": results_json
        }]
    });

    serde_json::to_string_pretty(&sarif).unwrap_or_default()
}

/// Reporte de texto agrupado por archivo, en el orden de `issues`.
pub fn render_text(issues: &[Issue]) -> String {
    let mut out = String::new();
    let mut current_file: &str = "";
    for issue in issues {
        if issue.file != current_file {
            current_file = issue.file.as_str();
            out.push_str(&format!("\n📄 {}\n", current_file.bold().cyan()));
        }
        let severity = match issue.severity {
            RuleLevel::Error => "error".red().bold(),
            RuleLevel::Warning => "warning".yellow(),
            RuleLevel::Info => "info".blue(),
        };
        out.push_str(&format!(
            "   {}:{}:{}  {}  {}  [{}]\n",
            issue.file,
            issue.line,
            issue.column,
            severity,
            issue.message,
            issue.rule.dimmed()
        ));
    }
    out
}

pub fn render_summary(summary: Summary) -> String {
    if summary.total() == 0 {
        format!("\n✅ Sin problemas detectados en {} archivo(s).", summary.checked)
    } else {
        format!(
            "\n🚩 {} error(s)  ⚠️  {} warning(s)  ℹ️  {} info(s) en {} archivo(s)",
            summary.errors.to_string().red().bold(),
            summary.warnings.to_string().yellow(),
            summary.infos.to_string().blue(),
            summary.checked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(file: &str, severity: RuleLevel, line: usize) -> Issue {
        Issue {
            file: file.to_string(),
            rule: "rxjs-prefer-angular-takeuntil-before-unsubscribe".to_string(),
            code: "missing-gate".to_string(),
            severity,
            message: "subscribe within a component must be preceded by takeUntil".to_string(),
            line,
            column: 7,
            start: 120,
            end: 129,
        }
    }

    #[test]
    fn test_summary_counts_by_severity() {
        let issues = vec![
            issue("a.ts", RuleLevel::Error, 1),
            issue("a.ts", RuleLevel::Warning, 2),
            issue("b.ts", RuleLevel::Error, 3),
        ];
        let summary = Summary::new(4, &issues);
        assert_eq!(
            summary,
            Summary {
                checked: 4,
                errors: 2,
                warnings: 1,
                infos: 0
            }
        );
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn test_render_json_shape() {
        let issues = vec![issue("src/a.component.ts", RuleLevel::Error, 12)];
        let json = render_json(Summary::new(1, &issues), &issues);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["checked"], 1);
        assert_eq!(parsed["errors"], 1);
        assert_eq!(parsed["warnings"], 0);
        assert_eq!(parsed["issues"][0]["file"], "src/a.component.ts");
        assert_eq!(parsed["issues"][0]["severity"], "error");
        assert_eq!(parsed["issues"][0]["code"], "missing-gate");
        assert_eq!(parsed["issues"][0]["line"], 12);
        assert_eq!(parsed["issues"][0]["end"], 129);
    }

    #[test]
    fn test_render_sarif_produces_valid_structure() {
        let issues = vec![issue("src/a.component.ts", RuleLevel::Info, 23)];
        let sarif = render_sarif(&issues);
        let parsed: serde_json::Value = serde_json::from_str(&sarif).expect("must be valid JSON");
        assert_eq!(parsed["version"], "2.1.0");
        let result = &parsed["runs"][0]["results"][0];
        assert_eq!(result["ruleId"], "rxjs-prefer-angular-takeuntil-before-unsubscribe");
        assert_eq!(result["level"], "note");
        let region = &result["locations"][0]["physicalLocation"]["region"];
        assert_eq!(region["startLine"], 23);
        assert_eq!(region["startColumn"], 7);
        assert_eq!(region["charOffset"], 120);
        assert_eq!(region["charLength"], 9);
        assert_eq!(parsed["runs"][0]["tool"]["driver"]["rules"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_render_sarif_empty() {
        let parsed: serde_json::Value = serde_json::from_str(&render_sarif(&[])).unwrap();
        assert!(parsed["runs"][0]["results"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_render_text_groups_by_file() {
        let issues = vec![
            issue("a.ts", RuleLevel::Error, 1),
            issue("a.ts", RuleLevel::Error, 5),
            issue("b.ts", RuleLevel::Warning, 2),
        ];
        let text = render_text(&issues);
        assert_eq!(text.matches("📄").count(), 2);
        assert!(text.contains("a.ts:5:7"));
        assert!(text.contains("b.ts:2:7"));
        assert!(text.contains("subscribe within a component must be preceded by takeUntil"));
    }
}
