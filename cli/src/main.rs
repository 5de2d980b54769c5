use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser};
use esmfix::config::{Config, Settings};
use esmfix::errors::RewriteError;
use esmfix::runner::{RunSummary, Runner};
use owo_colors::OwoColorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(
    name = "esmfix",
    version,
    about = "Add explicit .js extensions to relative ES module imports"
)]
struct Cli {
    /// Directory to rewrite in place
    root: PathBuf,
    /// JSON settings file (sourceExtensions, excludeDirs, ignorePrefixes)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Report files that would change without writing them; exits 1 if any would
    #[arg(long)]
    check: bool,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let summary = match execute(&cli) {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("{}", render_error(err));
            process::exit(1);
        }
    };

    if !cli.quiet {
        print_summary(&summary, cli.check);
    }

    if cli.check && summary.files_changed() > 0 {
        process::exit(1);
    }
}

fn render_error(err: RewriteError) -> String {
    format!("{:?}", miette::Report::new(err))
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    // A global subscriber can only be installed once per process.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn execute(cli: &Cli) -> Result<RunSummary, RewriteError> {
    let config = match &cli.config {
        Some(path) => Settings::load(path)?.into_config(),
        None => Config::default(),
    };

    Runner::new(config).dry_run(cli.check).run(&cli.root)
}

fn print_summary(summary: &RunSummary, check: bool) {
    let verb = if check { "would rewrite" } else { "rewrote" };

    for path in &summary.changed {
        println!("{} {}", verb.bright_black(), path.display().to_string().cyan());
    }

    println!(
        "{} {} {} specifiers in {} of {} files ({} scanned)",
        "esmfix".bright_cyan().bold(),
        verb,
        summary.specifiers_rewritten.to_string().green().bold(),
        summary.files_changed().to_string().green().bold(),
        summary.files_accepted,
        summary.files_visited.to_string().bright_black()
    );
}
