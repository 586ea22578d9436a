//! Crate-level error type for the coach service.

use crate::db::StoreError;
use crate::feedback::ExtractError;
use crate::llm::GatewayError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoachError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, CoachError>;
