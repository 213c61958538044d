use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::errors::AllycatError;
use crate::errors::Result;
use crate::llm::LlmBackend;

/// Fallback configuration file shipped with the repository
pub const EXAMPLE_CONFIG_FILE: &str = "config.example.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neo4jConfig {
    /// HTTP endpoint of the Neo4j server (transactional Cypher API)
    #[serde(default = "default_neo4j_uri")]
    pub uri: String,
    #[serde(default = "default_neo4j_user")]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_neo4j_database")]
    pub database: String,
    #[serde(default = "default_vector_index")]
    pub vector_index: String,
}

fn default_neo4j_uri() -> String {
    "http://localhost:7474".to_string()
}

fn default_neo4j_user() -> String {
    "neo4j".to_string()
}

fn default_neo4j_database() -> String {
    "neo4j".to_string()
}

fn default_vector_index() -> String {
    "document_embeddings".to_string()
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            uri: default_neo4j_uri(),
            user: default_neo4j_user(),
            password: String::new(),
            database: default_neo4j_database(),
            vector_index: default_vector_index(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_max_downloads")]
    pub max_downloads: usize,
    #[serde(default = "default_crawl_dir")]
    pub output_dir: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_max_depth() -> usize {
    3
}

fn default_max_downloads() -> usize {
    100
}

fn default_crawl_dir() -> String {
    "workspace/crawled".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_downloads: default_max_downloads(),
            output_dir: default_crawl_dir(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    #[serde(default = "default_processed_dir")]
    pub processed_dir: String,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

fn default_processed_dir() -> String {
    "workspace/processed".to_string()
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            processed_dir: default_processed_dir(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    /// `ollama` or `openai`
    #[serde(default = "default_embedding_provider")]
    pub provider: String,
    #[serde(default = "default_ollama_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_embedding_concurrency")]
    pub concurrency: usize,
}

fn default_embedding_provider() -> String {
    "ollama".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_embedding_dimension() -> usize {
    768
}

fn default_embedding_concurrency() -> usize {
    8
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            endpoint: default_ollama_endpoint(),
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
            api_key: None,
            concurrency: default_embedding_concurrency(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// `local_ollama` or `replicate`
    #[serde(default = "default_llm_run_env")]
    pub run_env: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_ollama_endpoint")]
    pub ollama_endpoint: String,
    #[serde(default = "default_replicate_endpoint")]
    pub replicate_endpoint: String,
    #[serde(default)]
    pub replicate_api_token: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "default_query_top_k")]
    pub top_k: usize,
}

fn default_llm_run_env() -> String {
    "local_ollama".to_string()
}

fn default_llm_model() -> String {
    "gemma3:1b".to_string()
}

fn default_replicate_endpoint() -> String {
    "https://api.replicate.com".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_tokens() -> usize {
    1024
}

fn default_query_top_k() -> usize {
    5
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            run_env: default_llm_run_env(),
            model: default_llm_model(),
            ollama_endpoint: default_ollama_endpoint(),
            replicate_endpoint: default_replicate_endpoint(),
            replicate_api_token: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_k: default_query_top_k(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Retrieval depth for web app queries
    #[serde(default = "default_server_top_k")]
    pub top_k: usize,
    #[serde(default)]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_server_top_k() -> usize {
    25
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            top_k: default_server_top_k(),
            enable_cors: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive such as `info` or `debug`; unset falls back to `RUST_LOG`
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default = "default_log_dir")]
    pub dir: String,
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            dir: default_log_dir(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub neo4j: Neo4jConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// File the configuration was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration: `.env`, then the TOML file, then environment overrides.
    ///
    /// An explicit path must exist. Without one, `config.toml` is tried, then
    /// `config.example.toml`, then built-in defaults.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        dotenv::dotenv().ok();

        let source = match path {
            Some(path) => Some(path.to_path_buf()),
            None => ["config.toml", EXAMPLE_CONFIG_FILE]
                .into_iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists()),
        };

        let mut config = match &source {
            Some(file) => Self::from_file(file)?,
            None => Self::default(),
        };
        config.source = source;

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Whether the configuration came from the bundled example file
    pub fn uses_example_file(&self) -> bool {
        self.source
            .as_deref()
            .and_then(Path::file_name)
            .is_some_and(|name| name == EXAMPLE_CONFIG_FILE)
    }

    /// Load configuration from the default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_env_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides using a custom variable lookup
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("NEO4J_URI") {
            self.neo4j.uri = v;
        }
        if let Some(v) = get("NEO4J_USER") {
            self.neo4j.user = v;
        }
        if let Some(v) = get("NEO4J_PASSWORD") {
            self.neo4j.password = v;
        }
        if let Some(v) = get("NEO4J_DATABASE") {
            self.neo4j.database = v;
        }
        if let Some(v) = get("NEO4J_VECTOR_INDEX") {
            self.neo4j.vector_index = v;
        }
        if let Some(v) = get("CRAWL_MAX_DOWNLOADS") {
            self.crawl.max_downloads = parse_var("CRAWL_MAX_DOWNLOADS", &v)?;
        }
        if let Some(v) = get("CRAWL_MAX_DEPTH") {
            self.crawl.max_depth = parse_var("CRAWL_MAX_DEPTH", &v)?;
        }
        if let Some(v) = get("CRAWL_DIR") {
            self.crawl.output_dir = v;
        }
        if let Some(v) = get("PROCESSED_DATA_DIR") {
            self.processing.processed_dir = v;
        }
        if let Some(v) = get("CHUNK_SIZE") {
            self.processing.chunk_size = parse_var("CHUNK_SIZE", &v)?;
        }
        if let Some(v) = get("CHUNK_OVERLAP") {
            self.processing.chunk_overlap = parse_var("CHUNK_OVERLAP", &v)?;
        }
        if let Some(v) = get("EMBEDDING_MODEL") {
            self.embeddings.model = v;
        }
        if let Some(v) = get("EMBEDDING_LENGTH") {
            self.embeddings.dimension = parse_var("EMBEDDING_LENGTH", &v)?;
        }
        if let Some(v) = get("EMBEDDING_ENDPOINT") {
            self.embeddings.endpoint = v;
        }
        if let Some(v) = get("LLM_RUN_ENV") {
            self.llm.run_env = v;
        }
        if let Some(v) = get("LLM_MODEL") {
            self.llm.model = v;
        }
        if let Some(v) = get("OLLAMA_ENDPOINT") {
            self.llm.ollama_endpoint = v;
        }
        if let Some(v) = get("REPLICATE_API_TOKEN") {
            self.llm.replicate_api_token = Some(v);
        }
        if let Some(v) = get("APP_HOST") {
            self.server.host = v;
        }
        if let Some(v) = get("APP_PORT") {
            self.server.port = parse_var("APP_PORT", &v)?;
        }
        if let Some(v) = get("LOG_LEVEL") {
            self.logging.level = Some(v);
        }

        Ok(())
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.processing.chunk_size == 0 {
            return Err(AllycatError::ConfigError(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.processing.chunk_overlap >= self.processing.chunk_size {
            return Err(AllycatError::ConfigError(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.processing.chunk_overlap, self.processing.chunk_size
            )));
        }
        if self.embeddings.dimension == 0 {
            return Err(AllycatError::ConfigError(
                "embedding dimension must be greater than zero".to_string(),
            ));
        }

        let backend = LlmBackend::from_str(&self.llm.run_env)?;
        if backend == LlmBackend::Replicate
            && self
                .llm
                .replicate_api_token
                .as_deref()
                .map_or(true, str::is_empty)
        {
            return Err(AllycatError::ConfigError(
                "LLM_RUN_ENV=replicate requires REPLICATE_API_TOKEN".to_string(),
            ));
        }

        Ok(())
    }

    /// Copy with secrets masked, for display
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.neo4j.password.is_empty() {
            copy.neo4j.password = "********".to_string();
        }
        if copy.llm.replicate_api_token.is_some() {
            copy.llm.replicate_api_token = Some("********".to_string());
        }
        if copy.embeddings.api_key.is_some() {
            copy.embeddings.api_key = Some("********".to_string());
        }
        copy
    }

    /// Get the LLM backend selected by `llm.run_env`
    pub fn llm_backend(&self) -> Result<LlmBackend> {
        LlmBackend::from_str(&self.llm.run_env)
    }

    /// Get embedding dimension
    pub fn embedding_dimension(&self) -> usize {
        self.embeddings.dimension
    }

    /// Get embedding model name
    pub fn embedding_model(&self) -> &str {
        &self.embeddings.model
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        AllycatError::ConfigError(format!("{key} has an invalid value: {value:?}"))
    })
}
