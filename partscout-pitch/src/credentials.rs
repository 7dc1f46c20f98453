use std::path::PathBuf;

use crate::error::PitchError;

/// ElevenLabs stock voice used when no voice is configured.
pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";

/// API credentials for the pitch services.
///
/// Both keys are optional at load time: matching works without either, the
/// clients that need a key reject its absence at construction.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub anthropic_api_key: Option<String>,
    pub elevenlabs_api_key: Option<String>,
    pub voice_id: String,
}

/// Where a credential field's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the config file.
    ConfigFile,
    /// Hard-coded default value.
    Default,
    /// Not set anywhere.
    Missing,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// Provenance of each credential field.
#[derive(Debug)]
pub struct CredentialSources {
    pub anthropic_api_key: CredentialSource,
    pub elevenlabs_api_key: CredentialSource,
    pub voice_id: CredentialSource,
}

/// TOML config file format.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct ConfigFile {
    anthropic: Option<AnthropicConfig>,
    elevenlabs: Option<ElevenLabsConfig>,
}

#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct AnthropicConfig {
    api_key: Option<String>,
}

#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct ElevenLabsConfig {
    api_key: Option<String>,
    voice_id: Option<String>,
}

impl Credentials {
    /// Load credentials from environment variables or the config file.
    ///
    /// Priority: env vars > config file > defaults. Nothing is required;
    /// missing keys surface when the corresponding client is constructed.
    pub fn load() -> Self {
        let config = load_config_file();

        let anthropic_api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .or_else(|| {
                config
                    .as_ref()
                    .and_then(|c| c.anthropic.as_ref())
                    .and_then(|a| a.api_key.clone())
            })
            .map(|k| k.trim().to_string());

        let elevenlabs_api_key = std::env::var("ELEVENLABS_API_KEY")
            .ok()
            .or_else(|| {
                config
                    .as_ref()
                    .and_then(|c| c.elevenlabs.as_ref())
                    .and_then(|e| e.api_key.clone())
            })
            .map(|k| k.trim().to_string());

        let voice_id = std::env::var("ELEVENLABS_VOICE_ID")
            .ok()
            .or_else(|| {
                config
                    .as_ref()
                    .and_then(|c| c.elevenlabs.as_ref())
                    .and_then(|e| e.voice_id.clone())
            })
            .unwrap_or_else(|| DEFAULT_VOICE_ID.to_string());

        Self {
            anthropic_api_key,
            elevenlabs_api_key,
            voice_id,
        }
    }

    /// The Anthropic API key, or a config error telling the user how to set it.
    pub fn require_anthropic(&self) -> Result<&str, PitchError> {
        self.anthropic_api_key.as_deref().ok_or_else(|| {
            PitchError::Config(
                "Missing Anthropic API key. Set ANTHROPIC_API_KEY or add to config file"
                    .to_string(),
            )
        })
    }

    /// The ElevenLabs API key, or a config error telling the user how to set it.
    pub fn require_elevenlabs(&self) -> Result<&str, PitchError> {
        self.elevenlabs_api_key.as_deref().ok_or_else(|| {
            PitchError::Config(
                "Missing ElevenLabs API key. Set ELEVENLABS_API_KEY or add to config file"
                    .to_string(),
            )
        })
    }
}

/// Return the path to the credentials config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("partscout").join("credentials.toml"))
}

/// Save credentials to the config file, creating parent directories as needed.
///
/// The default voice ID is omitted from the file. Returns the path the file
/// was written to.
pub fn save_to_file(creds: &Credentials) -> Result<PathBuf, PitchError> {
    let path = config_path()
        .ok_or_else(|| PitchError::Config("Could not determine config directory".to_string()))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let config = ConfigFile {
        anthropic: Some(AnthropicConfig {
            api_key: creds.anthropic_api_key.clone(),
        }),
        elevenlabs: Some(ElevenLabsConfig {
            api_key: creds.elevenlabs_api_key.clone(),
            voice_id: if creds.voice_id == DEFAULT_VOICE_ID {
                None
            } else {
                Some(creds.voice_id.clone())
            },
        }),
    };

    let toml_str = toml::to_string_pretty(&config)
        .map_err(|e| PitchError::Config(format!("Failed to serialize config: {}", e)))?;

    std::fs::write(&path, toml_str)?;
    Ok(path)
}

/// Determine where each credential field is coming from.
pub fn credential_sources() -> CredentialSources {
    let config = load_config_file();

    let anthropic_api_key = if std::env::var("ANTHROPIC_API_KEY").is_ok() {
        CredentialSource::EnvVar("ANTHROPIC_API_KEY")
    } else if config
        .as_ref()
        .and_then(|c| c.anthropic.as_ref())
        .and_then(|a| a.api_key.as_ref())
        .is_some()
    {
        CredentialSource::ConfigFile
    } else {
        CredentialSource::Missing
    };

    let elevenlabs_api_key = if std::env::var("ELEVENLABS_API_KEY").is_ok() {
        CredentialSource::EnvVar("ELEVENLABS_API_KEY")
    } else if config
        .as_ref()
        .and_then(|c| c.elevenlabs.as_ref())
        .and_then(|e| e.api_key.as_ref())
        .is_some()
    {
        CredentialSource::ConfigFile
    } else {
        CredentialSource::Missing
    };

    let voice_id = if std::env::var("ELEVENLABS_VOICE_ID").is_ok() {
        CredentialSource::EnvVar("ELEVENLABS_VOICE_ID")
    } else if config
        .as_ref()
        .and_then(|c| c.elevenlabs.as_ref())
        .and_then(|e| e.voice_id.as_ref())
        .is_some()
    {
        CredentialSource::ConfigFile
    } else {
        CredentialSource::Default
    };

    CredentialSources {
        anthropic_api_key,
        elevenlabs_api_key,
        voice_id,
    }
}

fn load_config_file() -> Option<ConfigFile> {
    let path = config_path()?;
    let content = std::fs::read_to_string(&path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            log::warn!("Ignoring malformed config file {}: {}", path.display(), e);
            None
        }
    }
}
