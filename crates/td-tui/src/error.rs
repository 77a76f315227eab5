//! Failures from the external collaborators, and the context-carrying wrapper
//! every effect returns them in.

use std::fmt;
use std::io;

use td_core::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum CollabError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("exit status {code}: {output}")]
    Exit { code: i32, output: String },
    #[error("HTTP {status}")]
    Http { status: u16 },
    #[error("transport: {0}")]
    Transport(String),
    #[error("decode: {0}")]
    Decode(String),
    #[error(transparent)]
    Io(#[from] StoreError),
    #[error("clipboard: {0}")]
    Clipboard(String),
}

impl From<reqwest::Error> for CollabError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CollabError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            CollabError::Http {
                status: status.as_u16(),
            }
        } else {
            CollabError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for CollabError {
    fn from(e: serde_json::Error) -> Self {
        CollabError::Decode(e.to_string())
    }
}

/// A collaborator failure tagged with the operation and the investigation
/// or agent it concerned.
#[derive(Debug)]
pub struct EffectError {
    pub op: &'static str,
    pub target: String,
    pub source: CollabError,
}

impl EffectError {
    pub fn new(op: &'static str, target: impl Into<String>, source: CollabError) -> Self {
        Self {
            op,
            target: target.into(),
            source,
        }
    }
}

impl fmt::Display for EffectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.op, self.target, self.source)
    }
}

impl std::error::Error for EffectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
