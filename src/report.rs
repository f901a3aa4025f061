//! Output formatting for build results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: the full file models for programmatic consumption

use colored::*;
use serde::Serialize;

use crate::model::FileModel;

/// A file whose model could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub file: String,
    pub message: String,
}

/// Everything produced by one `build` run.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// The path the user asked to build.
    pub path: String,
    /// Configuration file in effect, if one was found.
    pub config: Option<String>,
    pub models: Vec<FileModel>,
    pub failures: Vec<Failure>,
}

impl BuildReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn files_scanned(&self) -> usize {
        self.models.len() + self.failures.len()
    }
}

// =============================================================================
// JSON Format
// =============================================================================

#[derive(Serialize)]
pub struct JsonReport<'a> {
    pub version: &'static str,
    pub path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<&'a str>,
    pub passed: bool,
    pub files_scanned: usize,
    pub files: &'a [FileModel],
    pub failures: &'a [Failure],
}

/// Render the report as pretty-printed JSON.
pub fn render_json(report: &BuildReport) -> anyhow::Result<String> {
    let json = JsonReport {
        version: env!("CARGO_PKG_VERSION"),
        path: &report.path,
        config: report.config.as_deref(),
        passed: report.passed(),
        files_scanned: report.files_scanned(),
        files: &report.models,
        failures: &report.failures,
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

/// Write results in JSON format.
pub fn write_json(report: &BuildReport) -> anyhow::Result<()> {
    println!("{}", render_json(report)?);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format.
pub fn write_pretty(report: &BuildReport) {
    // Header
    println!();
    print!("  ");
    print!("{}", "phpreflect".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Building: ".dimmed());
    println!("{}", report.path);
    print!("  {}", "Config:   ".dimmed());
    println!("{}", report.config.as_deref().unwrap_or("(defaults)"));
    println!();

    write_summary(report);
    println!();

    if !report.models.is_empty() {
        write_models(&report.models);
    }

    if !report.failures.is_empty() {
        write_failures(&report.failures);
        println!();
    }
}

fn write_summary(report: &BuildReport) {
    if report.passed() {
        print!("  {}", "✓ OK".green());
    } else {
        print!("  {}", "✗ FAILED".red());
    }
    print!("  Files: {}", report.files_scanned());
    print!("  Built: {}", report.models.len().to_string().green());
    if !report.failures.is_empty() {
        print!("  Failed: {}", report.failures.len().to_string().red());
    }
    println!();
}

fn write_models(models: &[FileModel]) {
    for model in models {
        print!("  {}", model.path().blue());
        if let Some(doc) = model.doc_block().filter(|d| !d.summary.is_empty()) {
            print!("  {}", doc.summary.dimmed());
        }
        println!();

        write_names("namespace", model.namespaces().keys());
        write_names("class", model.classes().keys());
        write_names("interface", model.interfaces().keys());
        write_names("trait", model.traits().keys());
        write_names("function", model.functions().keys());
        write_names("constant", model.constants().keys());
        println!();
    }
}

fn write_names<'a, I>(kind: &str, names: I)
where
    I: Iterator<Item = &'a crate::model::Fqsen>,
{
    for name in names {
        println!("    {:<10} {}", kind.dimmed(), name);
    }
}

fn write_failures(failures: &[Failure]) {
    println!("  {} ({}):", "Failures".bold(), failures.len());
    println!();

    for failure in failures {
        print!("    {} ", "ERROR".red());
        println!("{}", failure.file.blue());
        println!("            {}", failure.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Class, Element, Fqsen};

    fn sample() -> BuildReport {
        let model = FileModel::new("src/Foo.php", "abc")
            .with_element(Element::Class(Class::new(Fqsen::new("\\App\\Foo").unwrap())))
            .unwrap();
        BuildReport {
            path: "src".to_string(),
            config: None,
            models: vec![model],
            failures: vec![Failure {
                file: "src/Broken.php".to_string(),
                message: "syntax error at 3:1".to_string(),
            }],
        }
    }

    #[test]
    fn test_json_structure() {
        let json: serde_json::Value = serde_json::from_str(&render_json(&sample()).unwrap()).unwrap();
        assert_eq!(json["path"], "src");
        assert_eq!(json["passed"], false);
        assert_eq!(json["files_scanned"], 2);
        assert!(json.get("config").is_none());

        let file = &json["files"][0];
        assert_eq!(file["path"], "src/Foo.php");
        assert_eq!(file["hash"], "abc");
        assert_eq!(file["classes"]["\\App\\Foo"]["fqsen"], "\\App\\Foo");
        assert_eq!(json["failures"][0]["file"], "src/Broken.php");
    }

    #[test]
    fn test_passed() {
        let mut report = sample();
        assert!(!report.passed());
        report.failures.clear();
        assert!(report.passed());
        assert_eq!(report.files_scanned(), 1);
    }
}
