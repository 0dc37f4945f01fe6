use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.yaml";

/// Default embedding model (same family the complaint data was tuned with)
const DEFAULT_SEMANTIC_MODEL: &str = "all-MiniLM-L6-v2";
/// Default number of search results
const DEFAULT_TOP_K: usize = 10;
/// Default CSV location, relative to the working directory
const DEFAULT_DATA_PATH: &str = "data/consumer_complaints.csv";
/// Default number of rows loaded from the CSV
const DEFAULT_SAMPLE_SIZE: usize = 10_000;

/// Configuration for semantic search functionality
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SemanticSearchConfig {
    /// Model name for embeddings (e.g., "all-MiniLM-L6-v2")
    #[serde(default = "default_semantic_model")]
    pub model: String,

    /// Number of results returned when a request does not set one
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,

    /// Batch size passed to the model; the model's own default if unset
    #[serde(default)]
    pub batch_size: Option<usize>,

    /// Directory holding downloaded model files (`<dir>/models`)
    #[serde(skip_serializing, skip_deserializing)]
    pub cache_dir: PathBuf,
}

impl Default for SemanticSearchConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_SEMANTIC_MODEL.to_string(),
            default_top_k: DEFAULT_TOP_K,
            batch_size: None,
            cache_dir: PathBuf::from("."),
        }
    }
}

fn default_semantic_model() -> String {
    DEFAULT_SEMANTIC_MODEL.to_string()
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_data_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_PATH)
}

fn default_sample_size() -> Option<usize> {
    Some(DEFAULT_SAMPLE_SIZE)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Complaint CSV to load
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    /// Maximum rows read from `data_path`; all rows if null
    #[serde(default = "default_sample_size")]
    pub sample_size: Option<usize>,
    #[serde(default)]
    pub semantic_search: SemanticSearchConfig,

    #[serde(skip_serializing, skip_deserializing)]
    base_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            sample_size: default_sample_size(),
            semantic_search: SemanticSearchConfig::default(),
            base_path: PathBuf::new(),
        }
    }
}

impl Config {
    fn validate(&self) -> anyhow::Result<()> {
        if self.sample_size == Some(0) {
            bail!("sample_size must be greater than 0 or null");
        }

        let sem = &self.semantic_search;
        if sem.model.trim().is_empty() {
            bail!("semantic_search.model must not be empty");
        }
        if sem.default_top_k == 0 {
            bail!("semantic_search.default_top_k must be greater than 0");
        }
        if sem.batch_size == Some(0) {
            bail!("semantic_search.batch_size must be greater than 0 or null");
        }

        Ok(())
    }

    /// Default config directory: `~/.complaint-search`.
    pub fn default_dir() -> anyhow::Result<PathBuf> {
        let home = homedir::my_home()
            .context("failed to resolve home directory")?
            .context("home directory is not set")?;
        Ok(home.join(".complaint-search"))
    }

    /// Load `config.yaml` from `base_path`, writing the defaults first if it
    /// does not exist yet.
    pub fn load_with(base_path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let base_path = base_path.as_ref();
        let config_path = base_path.join(CONFIG_FILE);

        // create new if does not exist
        if !config_path.exists() {
            std::fs::create_dir_all(base_path)
                .with_context(|| format!("failed to create {}", base_path.display()))?;
            let defaults = serde_yml::to_string(&Self::default())?;
            std::fs::write(&config_path, defaults)
                .with_context(|| format!("failed to write {}", config_path.display()))?;
            log::info!("Created default config at {}", config_path.display());
        }

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let mut config: Self = serde_yml::from_str(&config_str).context("config is malformed")?;

        config.base_path = base_path.to_path_buf();
        config.semantic_search.cache_dir = base_path.to_path_buf();

        config.validate()?;

        // resave in case config version needs an upgrade
        if config_str != serde_yml::to_string(&config)? {
            config.save()?;
        }

        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = self.base_path.join(CONFIG_FILE);
        let config_str = serde_yml::to_string(&self)?;
        std::fs::write(&config_path, config_str)
            .with_context(|| format!("failed to write {}", config_path.display()))
    }
}
