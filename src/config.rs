use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const LOCAL_CONFIG_FILE: &str = ".spellbench.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Word list the console and the benchmark pool load from
    pub dictionary: PathBuf,

    /// Benchmark concurrency budget; `None` means one per logical CPU
    pub concurrency: Option<usize>,

    pub accuracy: f64,

    /// Show the length-difference column for candidates
    pub len_diff: bool,

    pub command_prefix: char,

    pub color: bool,
}

fn default_dictionary() -> PathBuf {
    PathBuf::from("knownWords.txt")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dictionary: default_dictionary(),
            concurrency: None,
            accuracy: 1.0,
            len_diff: false,
            command_prefix: '-',
            color: true,
        }
    }
}

/// One config file as written: only the keys it sets are `Some`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub dictionary: Option<PathBuf>,
    pub concurrency: Option<usize>,
    pub accuracy: Option<f64>,
    pub len_diff: Option<bool>,
    pub command_prefix: Option<char>,
    pub color: Option<bool>,
}

impl ConfigFile {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Values given on the command line; each one present wins over any file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub dictionary: Option<PathBuf>,
    pub concurrency: Option<usize>,
    pub accuracy: Option<f64>,
    pub len_diff: bool,
    pub no_color: bool,
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(overrides: Overrides) -> Result<Self> {
        Self::load_layers(
            Self::global_config_path().as_deref(),
            Path::new(LOCAL_CONFIG_FILE),
            overrides,
        )
    }

    pub fn load_layers(global: Option<&Path>, local: &Path, overrides: Overrides) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = global {
            if global_path.exists() {
                config = config.merge(ConfigFile::from_file(global_path)?);
            }
        }

        if local.exists() {
            config = config.merge(ConfigFile::from_file(local)?);
        }

        if let Some(dictionary) = overrides.dictionary {
            config.dictionary = dictionary;
        }
        if let Some(concurrency) = overrides.concurrency {
            config.concurrency = Some(concurrency);
        }
        if let Some(accuracy) = overrides.accuracy {
            config.accuracy = accuracy;
        }
        config.len_diff |= overrides.len_diff;
        if overrides.no_color {
            config.color = false;
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply the keys `file` sets; everything else keeps its current value.
    fn merge(mut self, file: ConfigFile) -> Self {
        if let Some(dictionary) = file.dictionary {
            self.dictionary = dictionary;
        }
        if file.concurrency.is_some() {
            self.concurrency = file.concurrency;
        }
        if let Some(accuracy) = file.accuracy {
            self.accuracy = accuracy;
        }
        if let Some(len_diff) = file.len_diff {
            self.len_diff = len_diff;
        }
        if let Some(command_prefix) = file.command_prefix {
            self.command_prefix = command_prefix;
        }
        if let Some(color) = file.color {
            self.color = color;
        }
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.accuracy > 0.0 && self.accuracy <= 1.0) {
            anyhow::bail!("accuracy must be in (0, 1], got {}", self.accuracy);
        }
        if self.concurrency == Some(0) {
            anyhow::bail!("concurrency must be at least 1");
        }
        if self.command_prefix.is_alphanumeric() || self.command_prefix.is_whitespace() {
            anyhow::bail!(
                "command prefix {:?} would be confused with a word",
                self.command_prefix
            );
        }
        Ok(())
    }

    /// Effective benchmark concurrency
    pub fn concurrency(&self) -> usize {
        self.concurrency.unwrap_or_else(crate::default_concurrency)
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "spellbench").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.dictionary, PathBuf::from("knownWords.txt"));
        assert_eq!(config.command_prefix, '-');
        assert_eq!(config.accuracy, 1.0);
        assert!(config.concurrency() >= 1);
    }

    #[test]
    fn test_layers_and_overrides() {
        let dir = tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let local = dir.path().join("local.toml");
        fs::write(&global, "dictionary = \"global.txt\"\nconcurrency = 3\n").unwrap();
        fs::write(&local, "accuracy = 0.8\nlen_diff = true\n").unwrap();

        let config = Config::load_layers(Some(&global), &local, Overrides::default()).unwrap();
        assert_eq!(config.dictionary, PathBuf::from("global.txt"));
        assert_eq!(config.concurrency(), 3);
        assert_eq!(config.accuracy, 0.8);
        assert!(config.len_diff);

        let overrides = Overrides {
            dictionary: Some(PathBuf::from("cli.txt")),
            concurrency: Some(7),
            no_color: true,
            ..Default::default()
        };
        let config = Config::load_layers(Some(&global), &local, overrides).unwrap();
        assert_eq!(config.dictionary, PathBuf::from("cli.txt"));
        assert_eq!(config.concurrency(), 7);
        assert!(!config.color);
    }

    #[test]
    fn test_local_file_only_overrides_keys_it_sets() {
        let dir = tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let local = dir.path().join("local.toml");
        fs::write(
            &global,
            "color = false\nlen_diff = true\naccuracy = 0.8\ndictionary = \"global.txt\"\ncommand_prefix = \"/\"\n",
        )
        .unwrap();
        fs::write(&local, "accuracy = 1.0\ndictionary = \"knownWords.txt\"\n").unwrap();

        let config = Config::load_layers(Some(&global), &local, Overrides::default()).unwrap();
        assert!(!config.color);
        assert!(config.len_diff);
        assert_eq!(config.command_prefix, '/');
        assert_eq!(config.accuracy, 1.0);
        assert_eq!(config.dictionary, PathBuf::from("knownWords.txt"));
    }

    #[test]
    fn test_missing_files_use_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_layers(
            Some(&dir.path().join("nope.toml")),
            &dir.path().join("also-nope.toml"),
            Overrides::default(),
        )
        .unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        let dir = tempdir().unwrap();
        let local = dir.path().join("local.toml");

        fs::write(&local, "accuracy = 1.5\n").unwrap();
        assert!(Config::load_layers(None, &local, Overrides::default()).is_err());

        fs::write(&local, "command_prefix = \"a\"\n").unwrap();
        assert!(Config::load_layers(None, &local, Overrides::default()).is_err());

        let overrides = Overrides {
            concurrency: Some(0),
            ..Default::default()
        };
        assert!(Config::load_layers(None, &dir.path().join("x.toml"), overrides).is_err());
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = tempdir().unwrap();
        let local = dir.path().join("broken.toml");
        fs::write(&local, "accuracy = [").unwrap();

        let err = Config::load_layers(None, &local, Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }
}
