use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use riddler_config::Config;

/// Load a JSON config file; missing sections take their defaults
pub fn load_config_file(path: &Path) -> anyhow::Result<Config> {
    tracing::info!("Loading config from {}", path.display());
    let file =
        File::open(path).with_context(|| format!("Failed to open config {}", path.display()))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    Ok(config)
}

/// Config file when given, otherwise defaults plus environment
pub fn base_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => load_config_file(path),
        None => Ok(Config::new()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use riddler_types::RegionPreset;

    use super::*;

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"capture": {{"preset": "lower-left"}}, "ocr": {{"timeout_ms": 1500}}}}"#
        )
        .unwrap();

        let config = load_config_file(file.path()).unwrap();
        assert_eq!(config.capture.preset, RegionPreset::LowerLeft);
        assert_eq!(config.ocr.timeout_ms, Some(1500));
        assert_eq!(config.monitor.interval_ms, 1000);
    }

    #[test]
    fn test_bad_config_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "interval = 5").unwrap();
        assert!(load_config_file(file.path()).is_err());

        let dir = tempfile::tempdir().unwrap();
        assert!(base_config(Some(&dir.path().join("missing.json"))).is_err());
    }
}
