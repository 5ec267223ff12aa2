//! Output formatting and reporting
//!
//! Renders per-file check results as human-readable text, JSON or one line
//! per diagnostic, plus unified diffs for `--diff`.

use colored::*;
use parline_core::{Diagnostic, Severity};
use similar::{ChangeTag, TextDiff};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::OutputFormat;
use crate::commands::FixMode;

/// Outcome of checking one file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    /// Text the diagnostics refer to
    pub source: String,
    pub diagnostics: Vec<Diagnostic>,
    pub fixes_applied: usize,
    /// Fixed text, when fixes were computed but not written
    pub fixed: Option<String>,
    /// Read or write failure
    pub error: Option<String>,
}

impl FileReport {
    pub fn new(path: &Path, source: String, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            path: path.to_path_buf(),
            source,
            diagnostics,
            fixes_applied: 0,
            fixed: None,
            error: None,
        }
    }

    pub fn unreadable(path: &Path, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::new(path, String::new(), Vec::new())
        }
    }
}

/// Summary statistics for check results
#[derive(Debug, Clone, Default)]
pub struct LintSummary {
    pub files_checked: usize,
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
    pub hints: usize,
    pub fixes_applied: usize,
    pub files_fixed: usize,
    pub failed_files: usize,
}

impl LintSummary {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        let mut summary = Self {
            files_checked: reports.len(),
            ..Self::default()
        };

        for report in reports {
            for diagnostic in &report.diagnostics {
                match diagnostic.severity {
                    Severity::Error => summary.errors += 1,
                    Severity::Warning => summary.warnings += 1,
                    Severity::Info => summary.info += 1,
                    Severity::Hint => summary.hints += 1,
                }
            }
            summary.fixes_applied += report.fixes_applied;
            if report.fixes_applied > 0 {
                summary.files_fixed += 1;
            }
            if report.error.is_some() {
                summary.failed_files += 1;
            }
        }

        summary
    }

    pub fn total_issues(&self) -> usize {
        self.errors + self.warnings + self.info + self.hints
    }

    pub fn has_issues(&self) -> bool {
        self.total_issues() > 0
    }

    /// Warnings or errors remain, or a file could not be processed
    pub fn has_failures(&self) -> bool {
        self.errors > 0 || self.warnings > 0 || self.failed_files > 0
    }
}

/// Output formatter for different formats
pub struct OutputFormatter {
    format: OutputFormat,
    use_colors: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, use_colors: bool) -> Self {
        Self { format, use_colors }
    }

    /// Format and print check results
    pub fn print_results(
        &self,
        reports: &[FileReport],
        summary: &LintSummary,
        mode: FixMode,
    ) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Human => {
                print!("{}", self.render_human(reports, summary, mode));
                Ok(())
            }
            OutputFormat::Json => {
                println!("{}", render_json(reports, summary, mode)?);
                Ok(())
            }
            OutputFormat::Compact => {
                print!("{}", render_compact(reports, summary, mode));
                Ok(())
            }
        }
    }

    fn render_human(&self, reports: &[FileReport], summary: &LintSummary, mode: FixMode) -> String {
        let mut out = String::new();

        for report in reports {
            if let Some(error) = &report.error {
                let _ = writeln!(
                    out,
                    "{}: {}: {}",
                    self.paint("error", |s| s.red().bold()),
                    report.path.display(),
                    error
                );
            }
            if mode == FixMode::Diff
                && let Some(fixed) = &report.fixed
            {
                out.push_str(&self.render_diff(&report.path, &report.source, fixed));
            }
            for diagnostic in &report.diagnostics {
                out.push_str(&self.render_diagnostic(diagnostic, &report.source));
                out.push('\n');
            }
        }

        out.push_str(&self.render_summary(summary));
        out
    }

    fn render_diagnostic(&self, diagnostic: &Diagnostic, source: &str) -> String {
        let mut out = String::new();
        let location = &diagnostic.location;

        let header = format!("{}[{}]", diagnostic.severity, diagnostic.rule_id);
        let header = match diagnostic.severity {
            Severity::Error => self.paint(&header, |s| s.red().bold()),
            Severity::Warning => self.paint(&header, |s| s.yellow().bold()),
            Severity::Info => self.paint(&header, |s| s.blue().bold()),
            Severity::Hint => self.paint(&header, |s| s.cyan().bold()),
        };
        let _ = writeln!(out, "{}: {}", header, self.paint(&diagnostic.message, |s| s.bold()));

        let line_number = location.line.to_string();
        let gutter = " ".repeat(line_number.len());
        let _ = writeln!(
            out,
            "{}{} {}",
            gutter,
            self.paint("-->", |s| s.blue()),
            location
        );

        if let Some(line) = source.lines().nth(location.line.saturating_sub(1)) {
            let bar = self.paint("|", |s| s.blue());
            let line = line.trim_end_matches('\r');
            let _ = writeln!(out, "{gutter} {bar}");
            let _ = writeln!(out, "{} {} {}", self.paint(&line_number, |s| s.blue()), bar, line);
            let _ = writeln!(out, "{} {} {}", gutter, bar, self.underline(diagnostic, line));
        }

        for suggestion in &diagnostic.suggestions {
            let _ = writeln!(
                out,
                "{} {} {} {} ({} fix)",
                gutter,
                self.paint("=", |s| s.blue()),
                self.paint("help:", |s| s.bold()),
                suggestion.message,
                suggestion.applicability
            );
        }

        out
    }

    /// Carets under the flagged columns of `line`
    fn underline(&self, diagnostic: &Diagnostic, line: &str) -> String {
        let location = &diagnostic.location;
        let start = location.column.saturating_sub(1);
        let line_len = line.chars().count();
        let end = match (location.end_line, location.end_column) {
            (Some(end_line), Some(end_column)) if end_line == location.line => {
                end_column.saturating_sub(1)
            }
            _ => line_len,
        };
        let width = end.saturating_sub(start).max(1);

        // Keep tabs so the carets line up with the source line
        let padding: String = line
            .chars()
            .take(start)
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();
        let carets = "^".repeat(width);
        format!("{}{}", padding, self.paint(&carets, |s| s.yellow()))
    }

    fn render_summary(&self, summary: &LintSummary) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\n{}", self.paint("Summary:", |s| s.bold()));
        let _ = writeln!(out, "  Files checked: {}", summary.files_checked);

        if summary.has_issues() {
            let _ = writeln!(out, "  Issues found:");
            if summary.errors > 0 {
                let count = summary.errors.to_string();
                let _ = writeln!(out, "    Errors: {}", self.paint(&count, |s| s.red()));
            }
            if summary.warnings > 0 {
                let count = summary.warnings.to_string();
                let _ = writeln!(out, "    Warnings: {}", self.paint(&count, |s| s.yellow()));
            }
            if summary.info > 0 {
                let count = summary.info.to_string();
                let _ = writeln!(out, "    Info: {}", self.paint(&count, |s| s.blue()));
            }
            if summary.hints > 0 {
                let count = summary.hints.to_string();
                let _ = writeln!(out, "    Hints: {}", self.paint(&count, |s| s.cyan()));
            }
        } else {
            let _ = writeln!(out, "  {}", self.paint("No issues found", |s| s.green()));
        }

        if summary.fixes_applied > 0 {
            let count = summary.fixes_applied.to_string();
            let _ = writeln!(
                out,
                "  Fixes applied: {} in {} files",
                self.paint(&count, |s| s.green()),
                summary.files_fixed
            );
        }
        if summary.failed_files > 0 {
            let count = summary.failed_files.to_string();
            let _ = writeln!(out, "  Failed files: {}", self.paint(&count, |s| s.red()));
        }

        out
    }

    /// Unified diff of a proposed rewrite (`diff -u` compatible)
    fn render_diff(&self, path: &Path, old: &str, new: &str) -> String {
        let mut out = String::new();
        let diff = TextDiff::from_lines(old, new);
        let path = path.display();

        let _ = writeln!(out, "--- a/{path}");
        let _ = writeln!(out, "+++ b/{path}");

        for hunk in diff.unified_diff().context_radius(3).iter_hunks() {
            let _ = writeln!(out, "{}", self.paint(&hunk.header().to_string(), |s| s.cyan()));
            for change in hunk.iter_changes() {
                let line = match change.tag() {
                    ChangeTag::Delete => self.paint(&format!("-{change}"), |s| s.red()),
                    ChangeTag::Insert => self.paint(&format!("+{change}"), |s| s.green()),
                    ChangeTag::Equal => format!(" {change}"),
                };
                out.push_str(&line);
                if change.missing_newline() {
                    out.push('\n');
                }
            }
        }

        out
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.use_colors {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

fn render_json(
    reports: &[FileReport],
    summary: &LintSummary,
    mode: FixMode,
) -> anyhow::Result<String> {
    let issues: Vec<&Diagnostic> = reports.iter().flat_map(|r| &r.diagnostics).collect();
    let failures: Vec<serde_json::Value> = reports
        .iter()
        .filter_map(|r| {
            r.error.as_ref().map(|error| {
                serde_json::json!({
                    "file": r.path.display().to_string(),
                    "message": error,
                })
            })
        })
        .collect();

    let mut result = serde_json::json!({
        "files_checked": summary.files_checked,
        "issues": issues,
        "failures": failures,
        "summary": {
            "errors": summary.errors,
            "warnings": summary.warnings,
            "info": summary.info,
            "hints": summary.hints,
            "total": summary.total_issues(),
            "fixes_applied": summary.fixes_applied,
            "files_fixed": summary.files_fixed,
        }
    });

    if mode == FixMode::Diff {
        let fixes: Vec<serde_json::Value> = reports
            .iter()
            .filter_map(|r| {
                r.fixed.as_ref().map(|fixed| {
                    serde_json::json!({
                        "file": r.path.display().to_string(),
                        "fixes": r.fixes_applied,
                        "output": fixed,
                    })
                })
            })
            .collect();
        result["fixes"] = serde_json::Value::Array(fixes);
    }

    Ok(serde_json::to_string_pretty(&result)?)
}

fn render_compact(reports: &[FileReport], summary: &LintSummary, mode: FixMode) -> String {
    let mut out = String::new();

    for report in reports {
        if let Some(error) = &report.error {
            let _ = writeln!(out, "{}: error: {}", report.path.display(), error);
        }
        if mode == FixMode::Diff && report.fixed.is_some() {
            let _ = writeln!(
                out,
                "{}: {} fixes available",
                report.path.display(),
                report.fixes_applied
            );
        }
        for d in &report.diagnostics {
            let _ = writeln!(
                out,
                "{}:{}:{}: {} [{}] {}",
                d.location.file.display(),
                d.location.line,
                d.location.column,
                d.severity,
                d.rule_id,
                d.message
            );
        }
    }

    if summary.has_issues() {
        let _ = writeln!(
            out,
            "parline: {} files, {} issues ({} errors, {} warnings)",
            summary.files_checked,
            summary.total_issues(),
            summary.errors,
            summary.warnings
        );
    } else {
        let _ = writeln!(out, "parline: {} files checked, no issues", summary.files_checked);
    }
    if summary.fixes_applied > 0 {
        let _ = writeln!(out, "parline: {} fixes applied", summary.fixes_applied);
    }

    out
}
