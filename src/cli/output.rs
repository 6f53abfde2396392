//! Output formatting for command results
//!
//! Reports are printed to stdout as JSON, YAML, or human-readable text. Logs go to
//! stderr, so stdout stays parseable.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::classpath::Classpath;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// Result of the `classpath` command
#[derive(Debug, Clone, Serialize)]
pub struct ClasspathReport {
    pub application: String,
    pub start_class: String,
    pub classpath: Vec<String>,
}

impl ClasspathReport {
    pub fn new(application: &std::path::Path, start_class: &str, classpath: &Classpath) -> Self {
        Self {
            application: application.display().to_string(),
            start_class: start_class.to_string(),
            classpath: classpath
                .entries()
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
        }
    }
}

/// Result of the `build` command
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub application: String,
    pub executable: String,
    pub layer: String,
    pub stack: String,
    pub cache: bool,
    pub duration_secs: f64,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_classpath(&self, report: &ClasspathReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(report),
            OutputFormat::Yaml => to_yaml(report),
            OutputFormat::Human => {
                let mut out = String::new();
                out.push_str(&format!("Application: {}\n", report.application));
                out.push_str(&format!("Start class: {}\n", report.start_class));
                out.push_str(&format!("Classpath ({} entries):\n", report.classpath.len()));
                for entry in &report.classpath {
                    out.push_str(&format!("  {}\n", entry));
                }
                Ok(out)
            }
        }
    }

    pub fn format_build(&self, report: &BuildReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(report),
            OutputFormat::Yaml => to_yaml(report),
            OutputFormat::Human => Ok(format!(
                "Built {} in {:.1}s (stack {}, layer {}{})\n",
                report.executable,
                report.duration_secs,
                report.stack,
                report.layer,
                if report.cache { ", cached" } else { "" }
            )),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
    out.push('\n');
    Ok(out)
}

fn to_yaml<T: Serialize>(value: &T) -> Result<String> {
    serde_yaml::to_string(value).context("Failed to serialize to YAML")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classpath_report() -> ClasspathReport {
        ClasspathReport {
            application: "/workspace".to_string(),
            start_class: "com.example.App".to_string(),
            classpath: vec![
                "/workspace".to_string(),
                "/workspace/BOOT-INF/classes".to_string(),
                "/workspace/BOOT-INF/lib/spring-native-0.8.6.jar".to_string(),
            ],
        }
    }

    #[test]
    fn test_classpath_json() {
        let out = OutputFormatter::new(OutputFormat::Json)
            .format_classpath(&classpath_report())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["start_class"], "com.example.App");
        assert_eq!(value["classpath"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_classpath_human() {
        let out = OutputFormatter::new(OutputFormat::Human)
            .format_classpath(&classpath_report())
            .unwrap();
        assert!(out.contains("Classpath (3 entries):"));
        assert!(out.contains("  /workspace/BOOT-INF/classes\n"));
    }

    #[test]
    fn test_build_formats() {
        let report = BuildReport {
            application: "/workspace".to_string(),
            executable: "/workspace/com.example.App".to_string(),
            layer: "/layers/native-image".to_string(),
            stack: "io.paketo.stacks.tiny".to_string(),
            cache: true,
            duration_secs: 93.0,
        };

        let human = OutputFormatter::new(OutputFormat::Human)
            .format_build(&report)
            .unwrap();
        assert!(human.starts_with("Built /workspace/com.example.App in 93.0s"));
        assert!(human.contains("cached"));

        let yaml = OutputFormatter::new(OutputFormat::Yaml)
            .format_build(&report)
            .unwrap();
        assert!(yaml.contains("stack: io.paketo.stacks.tiny"));
    }
}
