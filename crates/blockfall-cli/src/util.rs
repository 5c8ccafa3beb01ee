use std::{fs::File, io, path::Path};

use anyhow::Context as _;
use blockfall_engine::GameConfig;

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Loads the game configuration from `path`, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let config: GameConfig = read_json_file("config", path)?;
    config
        .validate()
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_no_path_gives_defaults() {
        assert_eq!(load_config(None).unwrap(), GameConfig::default());
    }

    #[test]
    fn test_partial_file_and_validation() {
        let dir = std::env::temp_dir();
        let good = dir.join(format!("blockfall-cli-{}-good.json", std::process::id()));
        fs::write(&good, r#"{ "width": 12 }"#).unwrap();
        assert_eq!(load_config(Some(&good)).unwrap().width, 12);

        let bad = dir.join(format!("blockfall-cli-{}-bad.json", std::process::id()));
        fs::write(&bad, r#"{ "width": 2 }"#).unwrap();
        let err = load_config(Some(&bad)).unwrap_err();
        assert!(format!("{err:#}").contains("board must be at least"));

        fs::remove_file(good).unwrap();
        fs::remove_file(bad).unwrap();
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = load_config(Some(Path::new("/nonexistent/blockfall.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to open config file"));
    }
}
