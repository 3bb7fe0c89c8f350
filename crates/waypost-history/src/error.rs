//! Navigation error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Cross-origin navigation rejected: {0}")]
    CrossOrigin(String),

    #[error("Host rejected navigation: {0}")]
    Host(String),
}
