//! docstrip CLI - document noise remover
//!
//! Cleans extracted text files in place (DOCX and PDF inputs get a `.txt`
//! sibling), keeping `.bak` backups and an undo log.

use clap::{ArgAction, Parser, ValueEnum};
use colored::*;
use docstrip::history::DEFAULT_LOG_FILE;
use docstrip::{CleanOptions, CleanStats, DocStripper, ProcessedDocument, RunStats};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Strip headers, footers, page numbers and broken lines from document text
#[derive(Parser)]
#[command(
    name = "docstrip",
    version,
    about = "Strip headers, footers, page numbers and layout noise from document text",
    long_about = "docstrip - heuristic noise remover for extracted document text.\n\n\
                  Cleans .txt files in place and writes <name>.txt next to .docx/.pdf\n\
                  inputs. Originals are backed up with a .bak suffix and every run is\n\
                  logged so it can be reverted.\n\n\
                  Usage:\n  \
                  docstrip report.txt notes.docx     Clean files\n  \
                  docstrip --dry-run *.txt           Show what would change\n  \
                  docstrip --undo                    Revert the last run"
)]
struct Cli {
    /// Files to clean (.txt, .docx, .pdf)
    #[arg(required_unless_present = "undo")]
    files: Vec<PathBuf>,

    /// Report changes without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Restore the files changed by the last run
    #[arg(long, conflicts_with_all = ["files", "dry_run"])]
    undo: bool,

    /// Option preset the --no-* flags are applied on top of
    #[arg(long, value_enum, default_value = "default")]
    preset: Preset,

    /// Keep words split by a hyphen at a line break
    #[arg(long)]
    no_dehyphenate: bool,

    /// Keep hard-wrapped lines as they are
    #[arg(long)]
    no_merge: bool,

    /// Keep whitespace runs and trailing spaces
    #[arg(long)]
    no_normalize_whitespace: bool,

    /// Keep curly quotes, dashes and ellipses
    #[arg(long)]
    no_normalize_unicode: bool,

    /// Keep page numbers and header/footer lines
    #[arg(long)]
    keep_headers: bool,

    /// Keep blank lines
    #[arg(long)]
    keep_empty_lines: bool,

    /// Keep bare page numbers
    #[arg(long)]
    keep_page_numbers: bool,

    /// Keep consecutive duplicate lines
    #[arg(long)]
    keep_duplicates: bool,

    /// Keep punctuation-only lines
    #[arg(long)]
    keep_punctuation_lines: bool,

    /// Keep one blank line between paragraphs
    #[arg(long)]
    preserve_paragraphs: bool,

    /// Share of pages a running header/footer must appear on (0.0-1.0)
    #[arg(long, value_name = "RATIO")]
    repeat_ratio: Option<f64>,

    /// Shortest line treated as a running header/footer
    #[arg(long, value_name = "CHARS")]
    min_repeat_len: Option<usize>,

    /// JSON file with extra header/footer patterns
    #[arg(long, value_name = "FILE")]
    patterns: Option<PathBuf>,

    /// Undo log location
    #[arg(long, value_name = "FILE", default_value = DEFAULT_LOG_FILE)]
    log: PathBuf,

    /// Print final statistics as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Option presets
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Preset {
    /// Every repair and filter enabled
    Default,
    /// Line filter only
    Minimal,
    /// No line merging, headers kept
    Conservative,
}

impl Cli {
    fn clean_options(&self) -> CleanOptions {
        let mut options = match self.preset {
            Preset::Default => CleanOptions::default(),
            Preset::Minimal => CleanOptions::minimal(),
            Preset::Conservative => CleanOptions::conservative(),
        };
        if self.no_dehyphenate {
            options = options.without_dehyphenation();
        }
        if self.no_merge {
            options = options.without_merge();
        }
        if self.no_normalize_whitespace {
            options = options.without_whitespace_normalization();
        }
        if self.no_normalize_unicode {
            options = options.without_unicode_normalization();
        }
        if self.keep_headers {
            options = options.keep_headers();
        }
        if self.keep_empty_lines {
            options = options.keep_empty_lines();
        }
        if self.keep_page_numbers {
            options = options.keep_page_numbers();
        }
        if self.keep_duplicates {
            options = options.keep_duplicates();
        }
        if self.keep_punctuation_lines {
            options = options.keep_punctuation_lines();
        }
        if self.preserve_paragraphs {
            options = options.preserve_paragraph_spacing();
        }
        if let Some(ratio) = self.repeat_ratio {
            options = options.with_repeat_ratio(ratio);
        }
        if let Some(len) = self.min_repeat_len {
            options = options.with_min_repeat_len(len);
        }
        options
    }
}

/// Display labels for the statistics counters; the first four are always shown.
const STAT_LABELS: &[(&str, &str)] = &[
    ("lines_removed", "Lines removed"),
    ("duplicates_collapsed", "Duplicates collapsed"),
    ("empty_lines_removed", "Empty lines removed"),
    ("header_footer_removed", "Headers/footers removed"),
    ("punctuation_lines_removed", "Punctuation lines removed"),
    ("dehyphenated_tokens", "Dehyphenated tokens"),
    ("repeating_headers_footers_removed", "Repeating headers/footers removed"),
    ("merged_lines", "Merged lines"),
];

const ALWAYS_SHOWN: usize = 4;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = if cli.undo { run_undo(&cli) } else { run(&cli) };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();
}

/// Cleans every file; returns whether at least one succeeded.
fn run(cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let mut stripper = DocStripper::new()
        .with_options(cli.clean_options())
        .with_log_file(&cli.log)
        .dry_run(cli.dry_run);

    if let Some(patterns) = &cli.patterns {
        stripper = stripper.with_patterns_file(patterns)?;
    }

    info!(
        files = cli.files.len(),
        dry_run = stripper.is_dry_run(),
        options = ?stripper.cleaner().options(),
        "starting run"
    );

    let pb = create_progress(cli.files.len(), cli.json);
    let mut processed: Vec<ProcessedDocument> = Vec::new();
    let mut failures: Vec<(PathBuf, String)> = Vec::new();

    for file in &cli.files {
        pb.set_message(file.display().to_string());
        match stripper.process(file) {
            Ok(document) => {
                if !cli.json {
                    report_document(&pb, &document, stripper.is_dry_run());
                }
                processed.push(document);
            }
            Err(e) => {
                pb.suspend(|| eprintln!("{} {}: {}", "✗".red().bold(), file.display(), e));
                failures.push((file.clone(), e.to_string()));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let run_stats = stripper.record_run(&processed)?;

    if cli.json {
        print_json(&run_stats, &processed, &failures, stripper.is_dry_run())?;
    } else {
        print_stats(&run_stats, cli);
    }

    Ok(!processed.is_empty())
}

fn run_undo(cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let stripper = DocStripper::new().with_log_file(&cli.log);
    let report = stripper.undo()?;

    println!(
        "Restoring {} file(s) from {}...",
        report.restored.len() + report.failed.len(),
        report.timestamp
    );
    for file in &report.restored {
        println!("  {} Restored: {}", "✓".green(), file.display());
    }
    for (file, reason) in &report.failed {
        eprintln!("  {} {}: {}", "✗".red(), file.display(), reason);
    }
    println!("\nRestored {} file(s).", report.restored.len());

    Ok(true)
}

fn report_document(pb: &ProgressBar, document: &ProcessedDocument, dry_run: bool) {
    let mut lines = vec![format!("{} {}", "Processing:".bold(), document.source.display())];

    if document.changed {
        lines.extend(stat_lines(&document.output.stats, "  - "));
    } else {
        lines.push(format!("  {}", "no changes".dimmed()));
    }

    if dry_run {
        lines.push(format!(
            "  {} Would write {}",
            "[DRY RUN]".yellow(),
            document.target.display()
        ));
    } else if let Some(record) = &document.record {
        let backup = record
            .backup
            .as_ref()
            .and_then(|b| b.file_name())
            .map(|name| format!(" (backup: {})", name.to_string_lossy()))
            .unwrap_or_default();
        lines.push(format!(
            "  {} Saved {}{}",
            "✓".green(),
            record.file.display(),
            backup
        ));
    }

    pb.println(lines.join("\n"));
}

fn stat_lines(stats: &CleanStats, prefix: &str) -> Vec<String> {
    let values = stats.as_map();
    STAT_LABELS
        .iter()
        .enumerate()
        .filter_map(|(idx, (key, label))| {
            let value = values.get(key).copied().unwrap_or(0);
            (idx < ALWAYS_SHOWN || value > 0).then(|| format!("{prefix}{label}: {value}"))
        })
        .collect()
}

fn print_stats(run_stats: &RunStats, cli: &Cli) {
    println!("\n{}", "Statistics".cyan().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Files processed".bold(), run_stats.files_processed);
    for line in stat_lines(&run_stats.totals, "") {
        println!("{line}");
    }
    if !cli.dry_run && run_stats.files_processed > 0 {
        println!("\n{}: {}", "Log saved to".bold(), cli.log.display());
        println!("Backup files created with .bak extension");
    }
}

fn print_json(
    run_stats: &RunStats,
    processed: &[ProcessedDocument],
    failures: &[(PathBuf, String)],
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let files: Vec<serde_json::Value> = processed
        .iter()
        .map(|d| {
            serde_json::json!({
                "file": d.source,
                "output": d.target,
                "changed": d.changed,
                "stats": d.output.stats,
            })
        })
        .collect();
    let errors: Vec<serde_json::Value> = failures
        .iter()
        .map(|(file, error)| serde_json::json!({ "file": file, "error": error }))
        .collect();

    let summary = serde_json::json!({
        "dry_run": dry_run,
        "stats": run_stats,
        "files": files,
        "errors": errors,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn create_progress(len: usize, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.blue} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=> "),
    );
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_preset() {
        let cli = Cli::parse_from([
            "docstrip",
            "--preset",
            "conservative",
            "--no-normalize-unicode",
            "a.txt",
        ]);
        let options = cli.clean_options();
        assert!(!options.merge_lines);
        assert!(!options.remove_headers);
        assert!(!options.normalize_unicode);
        assert!(options.dehyphenate);
    }

    #[test]
    fn test_category_flags() {
        let cli = Cli::parse_from([
            "docstrip",
            "--keep-page-numbers",
            "--keep-duplicates",
            "--preserve-paragraphs",
            "--repeat-ratio",
            "0.5",
            "--min-repeat-len",
            "12",
            "a.txt",
        ]);
        let options = cli.clean_options();
        assert!(options.remove_headers);
        assert!(!options.remove_page_numbers);
        assert!(!options.remove_duplicates);
        assert!(options.remove_empty_lines);
        assert!(options.remove_punctuation_lines);
        assert!(options.preserve_paragraph_spacing);
        assert_eq!(options.repeat_ratio, 0.5);
        assert_eq!(options.min_repeat_len, 12);
    }

    #[test]
    fn test_default_flags() {
        let cli = Cli::parse_from(["docstrip", "a.txt", "b.pdf"]);
        assert_eq!(cli.files.len(), 2);
        assert_eq!(cli.log, PathBuf::from(".strip-log"));
        assert_eq!(cli.clean_options(), CleanOptions::default());
    }

    #[test]
    fn test_undo_needs_no_files() {
        let cli = Cli::try_parse_from(["docstrip", "--undo"]).unwrap();
        assert!(cli.undo);
        assert!(Cli::try_parse_from(["docstrip"]).is_err());
        assert!(Cli::try_parse_from(["docstrip", "--undo", "a.txt"]).is_err());
    }

    #[test]
    fn test_stat_lines_hide_zero_extras() {
        let stats = CleanStats {
            lines_removed: 3,
            merged_lines: 2,
            ..Default::default()
        };
        let lines = stat_lines(&stats, "");
        assert_eq!(lines.len(), ALWAYS_SHOWN + 1);
        assert_eq!(lines[0], "Lines removed: 3");
        assert_eq!(lines.last().unwrap(), "Merged lines: 2");
    }
}
