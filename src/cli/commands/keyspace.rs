//! Keyspace command implementation
//!
//! Shows the size of the configured keyspace and converts between indices
//! and candidates without touching an archive.

use anyhow::{Result, bail};
use clap::Args;

use crate::cli::Output;
use crate::config::{ConfigOverrides, ZipsweepConfig};

#[derive(Args, Debug, Default)]
pub struct KeyspaceArgs {
    /// Characters candidates are built from, in enumeration order
    #[arg(short, long, value_name = "CHARS")]
    pub alphabet: Option<String>,

    /// Exact candidate length
    #[arg(short, long, value_name = "N")]
    pub length: Option<usize>,

    /// Print the candidate at this index
    #[arg(long, value_name = "I", conflicts_with = "candidate")]
    pub index: Option<u64>,

    /// Print the index of this candidate
    #[arg(long, value_name = "S")]
    pub candidate: Option<String>,
}

pub async fn execute(args: KeyspaceArgs, custom_config: Option<&str>, output: &Output) -> Result<()> {
    let mut overrides = ConfigOverrides::default();
    overrides.search.alphabet = args.alphabet.clone();
    overrides.search.length = args.length;

    let config = ZipsweepConfig::load_with_overrides(custom_config, &overrides)?;
    let keyspace = config.keyspace()?;

    if let Some(index) = args.index {
        let Some(candidate) = keyspace.encode(index) else {
            bail!(
                "index {} is outside the keyspace (size {})",
                index,
                keyspace.size()
            );
        };
        output.raw(&candidate);
        return Ok(());
    }

    if let Some(candidate) = args.candidate.as_deref() {
        let Some(index) = keyspace.decode(candidate) else {
            bail!(
                "'{}' is not a length-{} candidate over the alphabet",
                candidate,
                keyspace.length()
            );
        };
        output.raw(&index.to_string());
        return Ok(());
    }

    output.header("🔢 Keyspace");
    output.key_value("Alphabet:", &config.search.alphabet, false);
    output.key_value("Length:", &keyspace.length().to_string(), false);
    output.key_value("Size:", &keyspace.size().to_string(), true);
    output.key_value(
        "Batches:",
        &keyspace.size().div_ceil(config.search.batch_size.max(1) as u64).to_string(),
        false,
    );
    Ok(())
}
