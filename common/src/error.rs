use crate::backend::BackendError;
use crate::draft::ValidationError;
use crate::listing::ListingId;

/// Outcome of a listing operation that did not go through.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MarketError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("listing {0} not found")]
    NotFound(ListingId),

    #[error("not authorized to change listing {0}")]
    NotAuthorized(ListingId),
}

pub type Result<T> = std::result::Result<T, MarketError>;
