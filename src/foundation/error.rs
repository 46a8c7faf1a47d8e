/// Convenience result type used across pocketbooth.
pub type BoothResult<T> = Result<T, BoothError>;

/// Top-level error taxonomy used by the capture pipeline and its collaborators.
#[derive(thiserror::Error, Debug)]
pub enum BoothError {
    /// Invalid caller-provided data or an operation issued in the wrong stage.
    #[error("validation error: {0}")]
    Validation(String),

    /// Camera permission denied, device missing or acquisition timed out.
    #[error("camera error: {0}")]
    Camera(String),

    /// A capture run that produced nothing usable.
    #[error("capture error: {0}")]
    Capture(String),

    /// Strip composition failed (empty input or an undecodable source image).
    #[error("composition error: {0}")]
    Composition(String),

    /// Durable or session storage failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Remote upload failure.
    #[error("upload error: {0}")]
    Upload(String),

    /// Errors when serializing or deserializing persisted data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BoothError {
    /// Build a [`BoothError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BoothError::Camera`] value.
    pub fn camera(msg: impl Into<String>) -> Self {
        Self::Camera(msg.into())
    }

    /// Build a [`BoothError::Capture`] value.
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// Build a [`BoothError::Composition`] value.
    pub fn composition(msg: impl Into<String>) -> Self {
        Self::Composition(msg.into())
    }

    /// Build a [`BoothError::Storage`] value.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Build a [`BoothError::Upload`] value.
    pub fn upload(msg: impl Into<String>) -> Self {
        Self::Upload(msg.into())
    }

    /// Build a [`BoothError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Message suitable for showing to the person in front of the booth.
    ///
    /// Strips the taxonomy prefix; wrapped dependency errors keep their context chain.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(m)
            | Self::Camera(m)
            | Self::Capture(m)
            | Self::Composition(m)
            | Self::Storage(m)
            | Self::Upload(m)
            | Self::Serde(m) => m.clone(),
            Self::Other(e) => format!("{e:#}"),
        }
    }
}

impl From<serde_json::Error> for BoothError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
