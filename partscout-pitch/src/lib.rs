//! Enrichment layer for matched catalog rows.
//!
//! Turns a matched part into a spoken sales pitch: the Anthropic Messages
//! API produces the pitch text, the ElevenLabs API voices it. Both are
//! treated as opaque capabilities that may fail; callers are expected to
//! degrade to a user-visible notice rather than abort.

pub mod anthropic;
pub mod credentials;
pub mod elevenlabs;
pub mod error;
pub mod log;
pub mod pitch;

pub use anthropic::AnthropicClient;
pub use credentials::{
    CredentialSource, CredentialSources, Credentials, config_path, credential_sources,
    save_to_file,
};
pub use elevenlabs::ElevenLabsClient;
pub use error::PitchError;
pub use log::{LogEntry, LogSummary, SessionLog};
pub use pitch::{build_pitch_prompt, generate_pitch};
