use crate::providers::GeminiProvider;
use crate::{Error, TextGenerator};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_VERTEX_REGION: &str = "europe-west1";

/// Supported Gemini backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderType {
    /// Generative Language API, authenticated with an API key.
    Gemini,
    /// Vertex AI, authenticated with an access token or ADC.
    Vertex,
}

/// Configuration for creating the text generator.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub provider_type: ProviderType,
    pub api_key: Option<String>,
    pub project_id: Option<String>,
    pub location: Option<String>,
    pub access_token: Option<String>,
    pub base_url: Option<String>,
}

// Credentials stay out of logs.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider_type", &self.provider_type)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("project_id", &self.project_id)
            .field("location", &self.location)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ProviderConfig {
    /// Configuration for the Generative Language API.
    pub fn gemini(api_key: String) -> Self {
        Self {
            provider_type: ProviderType::Gemini,
            api_key: Some(api_key),
            project_id: None,
            location: None,
            access_token: None,
            base_url: None,
        }
    }

    /// Configuration for Vertex AI with a static access token.
    pub fn vertex(project_id: String, location: String, access_token: String) -> Self {
        Self {
            provider_type: ProviderType::Vertex,
            api_key: None,
            project_id: Some(project_id),
            location: Some(location),
            access_token: Some(access_token),
            base_url: None,
        }
    }

    /// Configuration for Vertex AI with Application Default Credentials.
    pub fn vertex_with_adc(project_id: String, location: String) -> Self {
        Self {
            provider_type: ProviderType::Vertex,
            api_key: None,
            project_id: Some(project_id),
            location: Some(location),
            access_token: None,
            base_url: None,
        }
    }

    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut config = match var("PROVIDER_TYPE") {
            Some(provider_type) => match provider_type.to_lowercase().as_str() {
                "gemini" => {
                    let api_key = var("GEMINI_API_KEY").ok_or_else(|| {
                        Error::config("GEMINI_API_KEY environment variable is required for the Gemini provider")
                    })?;
                    Self::gemini(api_key)
                }
                "vertex" => Self::vertex_from(&var)?,
                _ => {
                    return Err(Error::config(format!(
                        "Invalid PROVIDER_TYPE '{provider_type}'. Valid values are: gemini, vertex"
                    )));
                }
            },
            None => {
                // Infer the backend from whichever credentials are present
                if let Some(api_key) = var("GEMINI_API_KEY") {
                    Self::gemini(api_key)
                } else if var("VERTEX_ACCESS_TOKEN").is_some()
                    || var("GOOGLE_CLOUD_PROJECT").is_some()
                    || var("GOOGLE_APPLICATION_CREDENTIALS").is_some()
                {
                    Self::vertex_from(&var)?
                } else {
                    return Err(Error::config(
                        "No Gemini credentials found in environment. Set GEMINI_API_KEY, or GOOGLE_CLOUD_PROJECT for Vertex AI",
                    ));
                }
            }
        };

        config.base_url = var("GEMINI_BASE_URL");
        Ok(config)
    }

    fn vertex_from(var: &impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let project_id = var("GOOGLE_CLOUD_PROJECT").ok_or_else(|| {
            Error::config("GOOGLE_CLOUD_PROJECT environment variable is required for Vertex AI")
        })?;
        let location =
            var("GOOGLE_CLOUD_REGION").unwrap_or_else(|| DEFAULT_VERTEX_REGION.to_string());

        Ok(match var("VERTEX_ACCESS_TOKEN") {
            Some(access_token) => Self::vertex(project_id, location, access_token),
            None => Self::vertex_with_adc(project_id, location),
        })
    }
}

/// Builds the process-wide text generator.
pub struct GeneratorFactory;

impl GeneratorFactory {
    /// Create a generator from configuration.
    pub async fn create(
        config: &ProviderConfig,
        model: &str,
        timeout: Duration,
    ) -> Result<Arc<dyn TextGenerator>, Error> {
        let model = model.to_string();
        let provider = match config.provider_type {
            ProviderType::Gemini => {
                let api_key = config
                    .api_key
                    .clone()
                    .ok_or_else(|| Error::config("API key required for Gemini provider"))?;
                match &config.base_url {
                    Some(base_url) => {
                        GeminiProvider::new_with_base_url(api_key, model, base_url.clone())?
                    }
                    None => GeminiProvider::new(api_key, model)?,
                }
            }
            ProviderType::Vertex => {
                let project_id = config
                    .project_id
                    .clone()
                    .ok_or_else(|| Error::config("Project ID required for Vertex provider"))?;
                let location = config
                    .location
                    .clone()
                    .ok_or_else(|| Error::config("Location required for Vertex provider"))?;
                let provider = match &config.access_token {
                    Some(access_token) => {
                        GeminiProvider::vertex(project_id, location, access_token.clone(), model)?
                    }
                    None => GeminiProvider::vertex_with_adc(project_id, location, model).await?,
                };
                match &config.base_url {
                    Some(base_url) => provider.with_vertex_base_url(base_url.clone()),
                    None => provider,
                }
            }
        };

        Ok(Arc::new(provider.with_timeout(timeout)?))
    }
}
