pub mod amortization;
pub mod error;
pub mod numfmt;
pub mod types;

pub use error::HomeLoanError;
pub use types::*;

/// Standard result type for all homeloan operations
pub type HomeLoanResult<T> = Result<T, HomeLoanError>;
