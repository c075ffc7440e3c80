use figment::providers::{Data, Format, Json, Toml, Yaml};
use figment::value::{Dict, Map};
use figment::{Metadata, Profile, Provider};
use std::path::Path;
use tracing::debug;

/// Provider for a config file whose format is picked from its extension,
/// falling back to sniffing the content (then TOML) for unknown extensions
pub fn auto<P: AsRef<Path>>(path: P) -> ConfigFile {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    let format = match extension.as_str() {
        "toml" => FileFormat::Toml,
        "json" => FileFormat::Json,
        "yaml" | "yml" => FileFormat::Yaml,
        _ => {
            let sniffed = std::fs::read_to_string(path)
                .ok()
                .and_then(|content| detect_format_from_content(&content));
            debug!(
                "Config {} has no known extension; detected {:?}",
                path.display(),
                sniffed
            );
            sniffed.unwrap_or(FileFormat::Toml)
        }
    };

    match format {
        FileFormat::Toml => ConfigFile::Toml(Toml::file(path)),
        FileFormat::Json => ConfigFile::Json(Json::file(path)),
        FileFormat::Yaml => ConfigFile::Yaml(Yaml::file(path)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Toml,
    Json,
    Yaml,
}

/// A file provider in one of the supported formats
pub enum ConfigFile {
    Toml(Data<Toml>),
    Json(Data<Json>),
    Yaml(Data<Yaml>),
}

impl Provider for ConfigFile {
    fn metadata(&self) -> Metadata {
        match self {
            ConfigFile::Toml(p) => p.metadata(),
            ConfigFile::Json(p) => p.metadata(),
            ConfigFile::Yaml(p) => p.metadata(),
        }
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        match self {
            ConfigFile::Toml(p) => p.data(),
            ConfigFile::Json(p) => p.data(),
            ConfigFile::Yaml(p) => p.data(),
        }
    }
}

/// Attempt to detect configuration format from file content
fn detect_format_from_content(content: &str) -> Option<FileFormat> {
    let trimmed = content.trim();

    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Some(FileFormat::Json);
    }

    // TOML section headers or `key = value`
    if trimmed.lines().any(|line| {
        let line = line.trim();
        (line.starts_with('[') && line.ends_with(']')) || (line.contains('=') && !line.contains(':'))
    }) {
        return Some(FileFormat::Toml);
    }

    // YAML document separator or `key: value`
    if trimmed.starts_with("---") || trimmed.lines().any(|line| line.contains(':')) {
        return Some(FileFormat::Yaml);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(detect_format_from_content(r#"{"search": {"length": 4}}"#), Some(FileFormat::Json));
        assert_eq!(detect_format_from_content("search:\n  length: 4"), Some(FileFormat::Yaml));
        assert_eq!(detect_format_from_content("[search]\nlength = 4"), Some(FileFormat::Toml));
        assert_eq!(detect_format_from_content("length = 4"), Some(FileFormat::Toml));
        assert_eq!(detect_format_from_content("just words"), None);
    }

    #[test]
    fn test_extensionless_file_is_sniffed() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("zipsweeprc");
        std::fs::write(&path, "search:\n  length: 3\n").unwrap();

        let length: usize = figment::Figment::from(auto(&path))
            .extract_inner("search.length")
            .unwrap();
        assert_eq!(length, 3);
    }
}
