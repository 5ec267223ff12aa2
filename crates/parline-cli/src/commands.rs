//! CLI command implementations

use anyhow::{Context, bail};
use parline_core::{
    ConfigLoader, FileFilter, ParlineConfig, ResultExt, RuleCategory, SourceModel,
};
use parline_rules::{CancellationFlag, FixOptions, RuleEngine, fix_all};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::output::{FileReport, LintSummary, OutputFormatter};
use crate::{OutputFormat, Severity};

/// Name of the file written by `parline config init`
pub const DEFAULT_CONFIG_FILE: &str = "parline.toml";

/// What `check` does with fixable diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixMode {
    /// Report only
    Report,
    /// Rewrite files in place
    Write,
    /// Print the rewrite as a unified diff
    Diff,
}

pub struct CheckOptions {
    pub paths: Vec<PathBuf>,
    pub format: OutputFormat,
    pub mode: FixMode,
    pub min_severity: Severity,
    pub config_path: Option<PathBuf>,
    pub use_colors: bool,
}

/// Check command implementation
///
/// Returns `true` when no reported diagnostic at warning level or above
/// remains and every file could be read.
pub fn check_command(options: CheckOptions) -> anyhow::Result<bool> {
    debug!("Running check on paths: {:?}", options.paths);

    let config = load_config(options.config_path.as_deref(), &options.paths)?;
    let filter = config.file_filter()?;
    let files = discover_files(&options.paths, &filter)?;
    info!("Checking {} files", files.len());

    let engine = RuleEngine::with_builtin_rules(config);
    let fix_options = FixOptions::from_config(engine.config());
    let cancel = CancellationFlag::new();

    let start_time = Instant::now();
    let mut reports: Vec<FileReport> = files
        .par_iter()
        .map(|path| check_file(&engine, path, options.mode, &fix_options, &cancel))
        .collect();
    debug!("Checked {} files in {:?}", files.len(), start_time.elapsed());

    for report in &mut reports {
        report
            .diagnostics
            .retain(|d| options.min_severity.admits(d.severity));
    }

    let summary = LintSummary::from_reports(&reports);
    let formatter = OutputFormatter::new(options.format, options.use_colors);
    formatter.print_results(&reports, &summary, options.mode)?;

    Ok(!summary.has_failures())
}

fn check_file(
    engine: &RuleEngine,
    path: &Path,
    mode: FixMode,
    fix_options: &FixOptions,
    cancel: &CancellationFlag,
) -> FileReport {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return FileReport::unreadable(path, e.to_string());
        }
    };

    match mode {
        FixMode::Report => {
            let model = SourceModel::parse(path, source);
            let diagnostics = engine.lint(&model, cancel);
            FileReport::new(path, model.source, diagnostics)
        }
        FixMode::Diff => {
            let model = SourceModel::parse(path, source);
            let diagnostics = engine.lint(&model, cancel);
            let result = fix_all(engine, path, &model.source, fix_options);
            let mut report = FileReport::new(path, model.source, diagnostics);
            if result.is_changed() {
                report.fixes_applied = result.applied;
                report.fixed = Some(result.output);
            }
            report
        }
        FixMode::Write => {
            let result = fix_all(engine, path, &source, fix_options);
            if !result.is_changed() {
                return FileReport::new(path, source, result.remaining);
            }

            let mut report = FileReport::new(path, result.output.clone(), result.remaining);
            match fs::write(path, &result.output) {
                Ok(()) => {
                    debug!("Wrote {} fixes to {}", result.applied, path.display());
                    report.fixes_applied = result.applied;
                }
                Err(e) => {
                    warn!("Failed to write {}: {}", path.display(), e);
                    report.error = Some(format!("failed to write fixes: {e}"));
                }
            }
            report
        }
    }
}

/// Explicit config path, or discovery starting next to the first path
fn load_config(config_path: Option<&Path>, paths: &[PathBuf]) -> anyhow::Result<ParlineConfig> {
    let start_dir = match paths.first() {
        Some(path) if path.is_file() => match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        },
        Some(path) if path.is_dir() => path.clone(),
        _ => PathBuf::from("."),
    };

    let config = ConfigLoader::load(config_path, Some(&start_dir))?;
    debug!("Loaded configuration");
    Ok(config)
}

/// Files named on the command line plus every accepted file under the
/// named directories, sorted and deduplicated
fn discover_files(paths: &[PathBuf], filter: &FileFilter) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            for entry in WalkDir::new(path).follow_links(false) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!("Skipping unreadable entry: {}", e);
                        continue;
                    }
                };
                if entry.file_type().is_file() && filter.accepts(entry.path(), path) {
                    files.push(entry.into_path());
                }
            }
        } else {
            bail!("Path not found: {}", path.display());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

/// Rules command implementation
pub fn rules_command(
    detailed: bool,
    category: Option<String>,
    config_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    debug!("Listing available rules");

    let category = match category {
        Some(slug) => match RuleCategory::from_slug(&slug) {
            Some(category) => Some(category),
            None => bail!("Unknown rule category '{slug}'"),
        },
        None => None,
    };

    // Listing still works with a broken config; severities fall back to defaults
    let config = ConfigLoader::load(config_path.as_deref(), None)
        .log_and_continue()
        .unwrap_or_default();
    let engine = RuleEngine::with_builtin_rules(config);

    println!("Available Rules:");
    println!("================");

    let mut count = 0;
    for rule in engine.rules() {
        let metadata = rule.metadata();
        if category.is_some_and(|c| c != metadata.category) {
            continue;
        }
        count += 1;

        if detailed {
            println!("\n{}", metadata.id);
            println!("  Name: {}", metadata.name);
            println!("  Description: {}", metadata.description);
            println!("  Category: {}", metadata.category);
            println!("  Default severity: {}", metadata.severity);
            let status = match engine.effective_severity(metadata) {
                Some(severity) => severity.to_string(),
                None => "off".to_string(),
            };
            println!("  Configured severity: {status}");
            if let Some(title) = metadata.fix_title {
                println!("  Autofix: {title}");
            }
        } else {
            println!("  {} - {}", metadata.id, metadata.title);
        }
    }

    if count == 0 {
        println!("\nNo rules found matching the specified filters.");
    } else {
        println!("\nTotal: {count} rules");
    }

    Ok(())
}

/// Config init command implementation
pub fn config_init_command(force: bool) -> anyhow::Result<()> {
    let config_path = PathBuf::from(DEFAULT_CONFIG_FILE);

    if config_path.exists() && !force {
        bail!(
            "Configuration file '{}' already exists. Use --force to overwrite.",
            DEFAULT_CONFIG_FILE
        );
    }

    fs::write(&config_path, ConfigLoader::default_toml())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created configuration file: {DEFAULT_CONFIG_FILE}");
    println!("   Edit the file to customize rule severities and layout.");
    Ok(())
}

/// Config validate command implementation
pub fn config_validate_command(path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = match path {
        Some(path) => path,
        None => match ConfigLoader::auto_discover(Path::new("."))? {
            Some(path) => path,
            None => bail!("No configuration file found"),
        },
    };

    let config = ConfigLoader::load_from_file(&path)?;
    config.file_filter()?;

    println!("Configuration is valid: {}", path.display());
    Ok(())
}

/// Config show command implementation
pub fn config_show_command(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = ConfigLoader::load(config_path.as_deref(), None)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
