use crate::error::{Error, Result};
use once_cell::sync::Lazy;

const DEFAULT_CHUNK_SIZE: usize = 8_000;
const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_TEMPERATURE: f32 = 0.5;
const DEFAULT_MAX_TOKENS: u32 = 2_000;
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// The closed tag vocabulary used when the caller supplies none.
///
/// These are the editorial categories the tag-selection prompt may
/// choose from; the free-tag prompt must avoid them.
pub static DEFAULT_TAG_VOCABULARY: Lazy<Vec<String>> = Lazy::new(|| {
    [
        "Geopolityka",
        "Relacje międzynarodowe",
        "Gospodarka",
        "Społeczeństwo",
        "Historia",
        "Kultura",
        "Kościół",
        "Idee",
    ]
    .into_iter()
    .map(String::from)
    .collect()
});

/// Configuration for one editorial run.
///
/// Use [`Config::builder()`] to construct a new configuration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Maximum chunk size in bytes; chunks prefer to end at sentence boundaries
    pub chunk_size: usize,

    /// Model identifier sent to the generation service
    pub model: String,

    /// Sampling temperature for all generation calls
    pub temperature: f32,

    /// Completion token budget per generation call
    pub max_tokens: u32,

    /// Base URL of the chat-completions API
    pub api_base: String,

    /// API key for the generation service
    pub api_key: Option<String>,

    /// Closed vocabulary for tag selection
    pub tag_vocabulary: Vec<String>,

    /// Whether to prepend a generated heading to each proofread chunk
    pub include_headings: bool,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use redaktor::Config;
    ///
    /// let config = Config::builder()
    ///     .chunk_size(4_000)
    ///     .include_headings(true)
    ///     .build()
    ///     .expect("valid configuration");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The chunk size is zero
    /// - The temperature is outside `0.0..=2.0`
    /// - The model identifier or API base is empty
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::config("chunk_size must be greater than 0"));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::config(format!(
                "temperature ({}) must be within 0.0..=2.0",
                self.temperature
            )));
        }

        if self.model.trim().is_empty() {
            return Err(Error::config("model identifier must not be empty"));
        }

        if self.api_base.trim().is_empty() {
            return Err(Error::config("api_base must not be empty"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            tag_vocabulary: DEFAULT_TAG_VOCABULARY.clone(),
            include_headings: false,
        }
    }
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    chunk_size: Option<usize>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    api_base: Option<String>,
    api_key: Option<String>,
    tag_vocabulary: Option<Vec<String>>,
    include_headings: bool,
}

impl ConfigBuilder {
    /// Sets the maximum chunk size in bytes.
    #[must_use]
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = Some(size);
        self
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the completion token budget per call.
    #[must_use]
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    /// Sets the base URL of the chat-completions API.
    #[must_use]
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }

    /// Sets the API key for the generation service.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the closed tag vocabulary.
    #[must_use]
    pub fn tag_vocabulary(mut self, tags: Vec<String>) -> Self {
        self.tag_vocabulary = Some(tags);
        self
    }

    /// Enables or disables per-chunk headings.
    #[must_use]
    pub fn include_headings(mut self, enabled: bool) -> Self {
        self.include_headings = enabled;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(self) -> Result<Config> {
        let config = Config {
            chunk_size: self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            api_base: self.api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            api_key: self.api_key,
            tag_vocabulary: self
                .tag_vocabulary
                .unwrap_or_else(|| DEFAULT_TAG_VOCABULARY.clone()),
            include_headings: self.include_headings,
        };

        config.validate()?;
        Ok(config)
    }
}
