//! Command-line interface for phpreflect.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::ast::AstProvider;
use crate::config::{Config, PathFilter, DEFAULT_CONFIG_NAMES, DEFAULT_TEMPLATE};
use crate::factory::{BuildOptions, FileFactory};
use crate::model::FileModel;
use crate::pipeline::MiddlewareCatalog;
use crate::report::{self, BuildReport, Failure};
use crate::source::LocalFile;
use crate::strategy::StrategyRegistry;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Build semantic models of PHP source files.
///
/// phpreflect parses PHP files and reports the namespaces, classes,
/// interfaces, traits, functions and constants each one declares, together
/// with their documentation blocks.
#[derive(Parser)]
#[command(name = "phpreflect")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log build details to stderr (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build file models for a file or directory
    #[command(visible_alias = "inspect")]
    Build(BuildArgs),
    /// Create a phpreflect configuration file
    Init(InitArgs),
}

/// Arguments for the build command.
#[derive(Parser)]
pub struct BuildArgs {
    /// Path to build (file or directory)
    pub path: PathBuf,

    /// Path to configuration YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "phpreflect.yaml")]
    pub output: PathBuf,
}

/// Find a configuration file next to the build root, then in the current
/// directory.
fn discover_config(root: &Path) -> Option<PathBuf> {
    let dir = if root.is_dir() {
        root
    } else {
        root.parent().unwrap_or(root)
    };
    Config::discover(dir).or_else(|| Config::discover(Path::new(".")))
}

#[cfg(feature = "tree-sitter")]
fn create_provider(config: &Config) -> anyhow::Result<Arc<dyn AstProvider>> {
    Ok(Arc::new(crate::ast::PhpAstProvider::new().strict(config.strict)))
}

#[cfg(not(feature = "tree-sitter"))]
fn create_provider(_config: &Config) -> anyhow::Result<Arc<dyn AstProvider>> {
    anyhow::bail!("phpreflect was built without the tree-sitter feature; no PHP parser available")
}

/// Collect the files under `root` selected by `filter`.
fn collect_files(root: &Path, filter: &PathFilter) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            // Skip hidden directories
            let hidden = e.depth() > 0 && e.file_name().to_string_lossy().starts_with('.');
            !(e.file_type().is_dir() && hidden)
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if filter.is_path_included(relative) {
            files.push(entry.path().to_path_buf());
        }
    }

    Ok(files)
}

/// Read and build one file.
fn build_file(
    path: &Path,
    factory: &FileFactory,
    strategies: &StrategyRegistry,
) -> Result<FileModel, Failure> {
    let failure = |message: String| Failure {
        file: path.display().to_string(),
        message,
    };
    let file = LocalFile::open(path).map_err(|e| failure(e.to_string()))?;
    factory
        .create(&file, strategies)
        .map_err(|e| failure(e.to_string()))
}

/// Run the build command.
pub fn run_build(args: &BuildArgs) -> anyhow::Result<i32> {
    // Validate format
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    // Resolve path
    let abs_path = match args.path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    // Load configuration, falling back to defaults
    let config_path = args.config.clone().or_else(|| discover_config(&abs_path));
    let config = match &config_path {
        Some(path) => match Config::parse_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error parsing config {}: {}", path.display(), e);
                return Ok(EXIT_ERROR);
            }
        },
        None => {
            tracing::debug!(
                "no configuration found (looked for {}), using defaults",
                DEFAULT_CONFIG_NAMES.join(", ")
            );
            Config::default()
        }
    };

    let catalog = MiddlewareCatalog::with_defaults();
    let filter = match config.path_filter() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: invalid config: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let options = BuildOptions {
        duplicates: config.duplicates,
    };
    let factory = match FileFactory::from_config(
        create_provider(&config)?,
        &config.pipeline,
        &catalog,
        options,
    ) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: invalid config: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    // Collect files to build; an explicit file is built even if not included
    let files = if abs_path.is_dir() {
        collect_files(&abs_path, &filter)?
    } else {
        vec![abs_path.clone()]
    };

    if files.is_empty() {
        eprintln!("Warning: no files to build");
        return Ok(EXIT_SUCCESS);
    }
    tracing::debug!(files = files.len(), stages = factory.stages(), "starting build");

    let strategies = StrategyRegistry::default();
    let outcomes: Vec<Result<FileModel, Failure>> = files
        .par_iter()
        .map(|path| build_file(path, &factory, &strategies))
        .collect();

    let mut report = BuildReport {
        path: args.path.to_string_lossy().to_string(),
        config: config_path.map(|p| p.to_string_lossy().to_string()),
        ..Default::default()
    };
    for outcome in outcomes {
        match outcome {
            Ok(model) => report.models.push(model),
            Err(failure) => {
                tracing::warn!(file = %failure.file, "build failed: {}", failure.message);
                report.failures.push(failure);
            }
        }
    }

    match args.format.as_str() {
        "json" => report::write_json(&report)?,
        _ => report::write_pretty(&report),
    }

    if report.passed() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    // Check if output already exists
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, DEFAULT_TEMPLATE) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize for your project", args.output.display());
    println!("  2. Run: phpreflect build . --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}
