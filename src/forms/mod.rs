//! Query-string forms accepted by the member routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod members;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid sort: {0}")]
    InvalidSort(String),

    #[error("invalid page request: {0}")]
    InvalidPage(String),
}
