use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

pub(crate) const DB_FILE: &str = "saiel.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) data_dir: PathBuf,
    pub(crate) autosave_delay: Duration,
}

impl Config {
    /// Explicit values win; otherwise the platform data directory is used.
    pub(crate) fn resolve(data_dir: Option<PathBuf>, autosave_ms: u64) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        Ok(Self {
            data_dir,
            autosave_delay: Duration::from_millis(autosave_ms),
        })
    }

    pub(crate) fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }

    pub(crate) fn ensure_data_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir).with_context(|| {
            format!(
                "Failed to create data directory: {}",
                self.data_dir.display()
            )
        })
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "saiel", "Saiel")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_explicit_data_dir() {
        let config = Config::resolve(Some(PathBuf::from("/tmp/saiel-test")), 250).unwrap();
        assert_eq!(config.db_path(), PathBuf::from("/tmp/saiel-test/saiel.db"));
        assert_eq!(config.autosave_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_ensure_data_dir_creates_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("a").join("b");
        let config = Config::resolve(Some(dir.clone()), 1000).unwrap();
        config.ensure_data_dir().unwrap();
        assert!(dir.is_dir());
        // Idempotent
        config.ensure_data_dir().unwrap();
    }
}
