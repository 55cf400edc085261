/// Result alias that carries the custom [`SphereError`] type.
pub type Result<T> = std::result::Result<T, SphereError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum SphereError {
    /// Free-form failure surfaced to the host as a readable message.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Config or trace (de)serialisation failed.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// The browser refused to start video playback without a user gesture.
    #[error("video autoplay was rejected: {0}")]
    AutoplayRejected(String),
    /// A configuration value is out of its allowed range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A sphere id does not (or no longer) refer to a sphere in the scene.
    #[error("unknown sphere")]
    UnknownSphere,
}

impl SphereError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_render_verbatim() {
        let err = SphereError::msg("sphere went missing");
        assert_eq!(err.to_string(), "sphere went missing");
    }

    #[test]
    fn autoplay_rejection_mentions_reason() {
        let err = SphereError::AutoplayRejected("no user gesture".to_string());
        assert!(err.to_string().contains("no user gesture"));
    }
}
