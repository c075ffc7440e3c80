use serde::Serialize;
use std::path::PathBuf;

/// Command-line values layered over every other configuration source
///
/// Unset fields are skipped during serialization, so they never mask a value
/// from a file or the environment.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    pub search: SearchOverrides,
    pub archive: ArchiveOverrides,
    pub output: OutputOverrides,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alphabet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ArchiveOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OutputOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unset_fields_are_skipped() {
        let mut overrides = ConfigOverrides::default();
        overrides.search.length = Some(4);
        overrides.output.progress = Some(false);

        let value = serde_json::to_value(&overrides).unwrap();
        assert_eq!(
            value,
            json!({
                "search": { "length": 4 },
                "archive": {},
                "output": { "progress": false }
            })
        );
    }
}
