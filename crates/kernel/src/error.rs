//! Error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors raised while fetching, decorating or rendering blocks.
#[derive(Debug, Error)]
pub enum BlockError {
    #[error("feed request failed: {0}")]
    Feed(#[from] reqwest::Error),

    #[error("invalid feed url '{url}': {source}")]
    FeedUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("feed source '{0}' is not available")]
    MissingSource(String),

    #[error("unknown block '{0}'")]
    UnknownBlock(String),
}

/// Result type alias using BlockError.
pub type BlockResult<T> = Result<T, BlockError>;

/// HTTP-facing errors for the preview server.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("not found")]
    NotFound,

    #[error("bad gateway")]
    Block(BlockError),
}

impl From<BlockError> for AppError {
    fn from(err: BlockError) -> Self {
        match err {
            BlockError::UnknownBlock(_) => AppError::NotFound,
            other => AppError::Block(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Block(_) => StatusCode::BAD_GATEWAY,
        };

        let body = match &self {
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal server error");
                "internal server error".to_string()
            }
            AppError::Block(e) => {
                tracing::error!(error = %e, "block rendering failed");
                "upstream content unavailable".to_string()
            }
            _ => self.to_string(),
        };

        (status, body).into_response()
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_block_maps_to_not_found() {
        let err: AppError = BlockError::UnknownBlock("nope".to_string()).into();
        assert!(matches!(err, AppError::NotFound));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn missing_source_maps_to_bad_gateway() {
        let err: AppError = BlockError::MissingSource("/x.json".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
