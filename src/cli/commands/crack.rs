//! Crack command implementation
//!
//! Probes the archive once, then runs the generator and verifier pool on a
//! blocking thread while listening for Ctrl-C.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::archive::{TargetOpener, ZipOpener};
use crate::cli::Output;
use crate::config::{ConfigOverrides, ZipsweepConfig};
use crate::parallel::SearchProgress;
use crate::search::{Search, SearchOutcome, SearchReport};

/// Exit status for an interrupted run (128 + SIGINT)
const EXIT_INTERRUPTED: i32 = 130;

#[derive(Args, Debug, Default)]
pub struct CrackArgs {
    /// Encrypted ZIP archive (defaults to archive.path from the configuration)
    #[arg(value_name = "ARCHIVE")]
    pub archive: Option<PathBuf>,

    /// Entry to test candidates against (defaults to the first entry)
    #[arg(short, long, value_name = "NAME")]
    pub entry: Option<String>,

    /// Characters candidates are built from, in enumeration order
    #[arg(short, long, value_name = "CHARS")]
    pub alphabet: Option<String>,

    /// Exact candidate length
    #[arg(short, long, value_name = "N")]
    pub length: Option<usize>,

    /// Candidates per queued batch
    #[arg(short, long, value_name = "N")]
    pub batch_size: Option<usize>,

    /// Worker threads (0 = derive from CPU count)
    #[arg(short, long, value_name = "N")]
    pub workers: Option<usize>,

    /// File the recovered password is written to
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl CrackArgs {
    /// Command-line values as the top configuration layer
    pub fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::default();
        overrides.search.alphabet = self.alphabet.clone();
        overrides.search.length = self.length;
        overrides.search.batch_size = self.batch_size;
        overrides.search.workers = self.workers;
        overrides.archive.path = self.archive.clone();
        overrides.archive.entry = self.entry.clone();
        overrides.output.result_file = self.output.clone();
        if self.no_progress {
            overrides.output.progress = Some(false);
        }
        overrides
    }
}

pub async fn execute(args: CrackArgs, custom_config: Option<&str>, output: &Output) -> Result<()> {
    let config = ZipsweepConfig::load_with_overrides(custom_config, &args.overrides())?;
    config.validate().context("Invalid configuration")?;

    if args.archive.is_none() {
        output.info(&format!(
            "No archive given, using {}",
            config.archive.path.display()
        ));
    }

    let keyspace = config.keyspace()?;
    let search_config = config.search_config();
    let opener = ZipOpener::new(&config.archive.path, config.archive.entry_name());

    // Probe once so an unusable archive is reported before any thread starts
    let probe = opener.open().context("archive probe failed")?;

    output.header("🔐 Password Recovery");
    output.key_value("Archive:", &opener.path().display().to_string(), false);
    output.key_value(
        "Entry:",
        &format!("{} ({} entries in archive)", probe.entry_name(), probe.entry_count()),
        false,
    );
    output.key_value(
        "Keyspace:",
        &format!(
            "{} candidates ({} chars, length {})",
            keyspace.size(),
            keyspace.alphabet().len(),
            keyspace.length()
        ),
        false,
    );
    output.key_value("Workers:", &search_config.workers.to_string(), false);
    output.key_value("Batch size:", &search_config.batch_size.to_string(), false);
    output.blank_line();
    drop(probe);

    let show_progress = config.output.progress && !output.is_quiet();
    let progress = SearchProgress::for_run(keyspace.size(), show_progress);
    let bar = progress.clone();

    let search = Search::new(opener, keyspace, search_config)
        .with_progress(move |tested, _total| bar.update(tested));
    let cancel = search.cancellation().clone();

    info!("Starting search");
    let mut handle = tokio::task::spawn_blocking(move || search.run());

    let joined = tokio::select! {
        joined = &mut handle => joined,
        Ok(()) = tokio::signal::ctrl_c() => {
            progress.finish();
            output.warning("Interrupted, stopping workers...");
            cancel.cancel();
            handle.await
        }
    };
    progress.finish();

    let report = joined.context("search thread failed")??;
    debug!(
        "Run finished: {} after {} attempts in {} batches",
        report.outcome.label(),
        report.attempts,
        report.batches
    );

    report_outcome(&report, &config, output)
}

fn report_outcome(report: &SearchReport, config: &ZipsweepConfig, output: &Output) -> Result<()> {
    match &report.outcome {
        SearchOutcome::Found {
            password, elapsed, ..
        } => {
            std::fs::write(&config.output.result_file, password).with_context(|| {
                format!(
                    "failed to write {}",
                    config.output.result_file.display()
                )
            })?;

            output.success(&format!(
                "Success! Password: {} ({:.2}s, batch size {})",
                password,
                elapsed.as_secs_f64(),
                report.batch_size
            ));
            output.key_value(
                "Saved to:",
                &config.output.result_file.display().to_string(),
                true,
            );
            print_stats(report, output);
            Ok(())
        }
        SearchOutcome::Exhausted => {
            output.warning(&format!(
                "Keyspace exhausted: no password among {} candidates",
                report.keyspace_size
            ));
            print_stats(report, output);
            std::process::exit(1);
        }
        SearchOutcome::Interrupted => {
            output.warning(&format!(
                "Search interrupted after {} attempts, no result written",
                report.attempts
            ));
            std::process::exit(EXIT_INTERRUPTED);
        }
        SearchOutcome::Faulted { worker_id, error } => {
            output.error(&format!("Archive fault in worker {}: {}", worker_id, error));
            std::process::exit(1);
        }
    }
}

fn print_stats(report: &SearchReport, output: &Output) {
    output.verbose(&format!(
        "{} attempts in {} batches across {} workers",
        report.attempts, report.batches, report.workers
    ));
    output.key_value("Elapsed:", &format!("{:.2}s", report.elapsed.as_secs_f64()), false);
    output.key_value(
        "Throughput:",
        &format!("{:.0} candidates/s", report.throughput()),
        false,
    );
}
