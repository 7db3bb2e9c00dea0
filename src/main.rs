mod cleaner;
mod protection;
mod scanner;

use anyhow::Result;
use clap::Parser;
use cleaner::{CleanReport, Disposal, EntryKind, Outcome};
use colored::{ColoredString, Colorize};
use console::Term;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use protection::ProtectionRules;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const RULE_WIDTH: usize = 60;

#[derive(Parser)]
#[command(name = "tempsweep")]
#[command(about = "Empty your temporary directory, sparing protected folders")]
#[command(after_help = "Without a terminal the confirmation cannot be shown; scripted runs need -y.")]
#[command(version)]
struct Cli {
    /// Directory to clean (defaults to the current user's temp directory)
    path: Option<PathBuf>,

    /// Also protect folders whose name contains SUBSTRING (repeatable)
    #[arg(long, value_name = "SUBSTRING")]
    protect: Vec<String>,

    /// Skip confirmation prompt (required when not run from a terminal)
    #[arg(short = 'y', long)]
    yes: bool,

    /// Exit right away instead of waiting for Enter
    #[arg(long)]
    no_pause: bool,

    /// Log every entry as it is handled
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_target(path: Option<PathBuf>) -> PathBuf {
    let path = path.unwrap_or_else(std::env::temp_dir);
    // Not canonicalized: on Windows that yields a `\\?\` verbatim path.
    std::path::absolute(&path).unwrap_or(path)
}

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn describe(disposal: &Disposal) -> Option<ColoredString> {
    let name = &disposal.name;
    let line = match &disposal.outcome {
        Outcome::Removed(EntryKind::File) => format!("✓ File deleted: {name}").green(),
        Outcome::Removed(_) => format!("✓ Folder deleted: {name}").green(),
        Outcome::Protected => format!("⊘ Folder is protected, skipping: {name}").yellow(),
        Outcome::AccessDenied => format!("✗ Access denied: {name}").red(),
        Outcome::Failed(reason) => format!("✗ Error deleting {name}: {reason}").red(),
        Outcome::Skipped => return None,
    };
    Some(line)
}

fn summary_lines(report: &CleanReport) -> [String; 3] {
    [
        format!("   Files deleted: {}", report.files_removed),
        format!("   Folders deleted: {}", report.folders_removed),
        format!("   Total items deleted: {}", report.total()),
    ]
}

fn print_header() {
    println!("{}", "It would be better if you run it as administrator.".dimmed());
    println!("\n{}", rule());
    println!("{}", "🧹 TEMPORARY FILES CLEANUP UTILITY".bold());
    println!("{}\n", rule());
}

fn print_summary(report: &CleanReport) {
    println!("{}", rule());
    println!("\n{}", "📊 Cleanup Results:".bold());
    for line in summary_lines(report) {
        println!("{}", line.green());
    }
    println!();
}

fn run_pass(target: &Path, protection: &ProtectionRules) -> Result<CleanReport> {
    println!("📁 {} {}", "Starting cleanup:".cyan().bold(), target.display());
    println!("{}", rule());

    let progress = ProgressBar::new_spinner();
    progress.set_style(ProgressStyle::with_template("{spinner} {pos} entries processed")?);

    let result = cleaner::clean(target, protection, |disposal| {
        progress.inc(1);
        if let Some(line) = describe(disposal) {
            progress.suspend(|| println!("{line}"));
        }
    });
    progress.finish_and_clear();

    match result {
        Ok(report) => Ok(report),
        Err(err) => {
            println!("{}", format!("❌ Error: Cannot access {}", target.display()).red().bold());
            println!("   {err}");
            Ok(CleanReport::default())
        }
    }
}

fn wait_for_enter() -> Result<()> {
    let term = Term::stdout();
    term.write_str("Press Enter to exit...")?;
    term.read_line()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let target = resolve_target(cli.path);
    let protection = ProtectionRules::with_extra(&cli.protect);
    tracing::debug!(rules = ?protection.rules(), "protection rules");

    print_header();

    if !cli.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete everything in {}?", target.display()))
            .default(false)
            .interact();
        match confirmed {
            Ok(true) => {}
            Ok(false) => {
                println!("{}", "Cancelled.".yellow());
                return Ok(());
            }
            Err(_) => {
                println!("{}", "Cancelled. No terminal to confirm on; pass -y to run unattended.".yellow());
                return Ok(());
            }
        }
    }

    let report = run_pass(&target, &protection)?;
    print_summary(&report);

    if !cli.no_pause && console::user_attended() {
        wait_for_enter()?;
    }

    Ok(())
}
