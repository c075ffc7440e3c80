//! Config command implementation

use anyhow::{Result, bail};

use crate::cli::{ConfigCommands, Output};
use crate::config::ZipsweepConfig;

pub async fn execute(cmd: ConfigCommands, custom_config: Option<&str>, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { format } => show(&format, custom_config, output),
        ConfigCommands::Validate => validate(custom_config, output),
    }
}

fn show(format: &str, custom_config: Option<&str>, output: &Output) -> Result<()> {
    let config = ZipsweepConfig::load(custom_config)?;

    let rendered = match format {
        "toml" => toml::to_string_pretty(&config)?,
        "json" => serde_json::to_string_pretty(&config)?,
        other => bail!("Unsupported format '{}'. Use toml or json", other),
    };

    output.raw(&rendered);
    Ok(())
}

fn validate(custom_config: Option<&str>, output: &Output) -> Result<()> {
    output.header("🔧 Validating Configuration");

    let config = match ZipsweepConfig::load(custom_config) {
        Ok(config) => config,
        Err(err) => {
            output.error(&format!("Configuration could not be loaded: {:#}", err));
            std::process::exit(1);
        }
    };

    if let Err(err) = config.validate() {
        output.error(&format!("Configuration is invalid: {}", err));
        std::process::exit(1);
    }

    output.success("Configuration is valid");
    let workers = config.search_config().workers;
    output.key_value("Keyspace size:", &config.keyspace()?.size().to_string(), false);
    output.key_value("Workers:", &workers.to_string(), false);
    output.key_value("Archive:", &config.archive.path.display().to_string(), false);
    output.key_value(
        "Entry:",
        config.archive.entry_name().as_deref().unwrap_or("(first entry)"),
        false,
    );
    Ok(())
}
