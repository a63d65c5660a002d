use axum::http::StatusCode;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

/// Failures writing the durable key-value file.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write data file: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures at the remote generation boundary.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("no API key configured for the generation service")]
    MissingApiKey,

    #[error("request to generation service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("generation service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response from generation service: {0}")]
    Malformed(String),

    #[error("generation service returned an empty result")]
    Empty,
}

/// A newer request of the same kind started before this one could commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("a newer request replaced this one")]
pub struct Superseded;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Please write something before analyzing.")]
    EmptyText,

    #[error("Failed to get grammar analysis from AI. Please check your API key and try again.")]
    Remote(#[source] GenerationError),

    #[error("a newer analysis replaced this one")]
    Superseded,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, thiserror::Error)]
pub enum ChallengeError {
    #[error("Failed to generate new challenges from AI. Please try again later.")]
    Remote(#[source] GenerationError),

    #[error("challenge '{0}' is not part of today's set")]
    UnknownChallenge(String),

    #[error("a newer request replaced this one")]
    Superseded,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("Failed to generate a new story prompt from AI.")]
    Remote(#[source] GenerationError),

    #[error("Failed to load AI examples.")]
    Examples(#[source] GenerationError),

    #[error("a newer request replaced this one")]
    Superseded,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<Superseded> for ChallengeError {
    fn from(_: Superseded) -> Self {
        ChallengeError::Superseded
    }
}

impl From<Superseded> for PromptError {
    fn from(_: Superseded) -> Self {
        PromptError::Superseded
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        Self::internal(err)
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        let status = match &err {
            AnalysisError::EmptyText => StatusCode::BAD_REQUEST,
            AnalysisError::Remote(_) => StatusCode::BAD_GATEWAY,
            AnalysisError::Superseded => StatusCode::CONFLICT,
            AnalysisError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<ChallengeError> for AppError {
    fn from(err: ChallengeError) -> Self {
        let status = match &err {
            ChallengeError::Remote(_) => StatusCode::BAD_GATEWAY,
            ChallengeError::UnknownChallenge(_) => StatusCode::NOT_FOUND,
            ChallengeError::Superseded => StatusCode::CONFLICT,
            ChallengeError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<PromptError> for AppError {
    fn from(err: PromptError) -> Self {
        let status = match &err {
            PromptError::Remote(_) | PromptError::Examples(_) => StatusCode::BAD_GATEWAY,
            PromptError::Superseded => StatusCode::CONFLICT,
            PromptError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
