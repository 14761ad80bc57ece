//! Error taxonomy for MOD manifest extraction.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModError {
    /// The external loader reported a failure; its message is surfaced
    /// verbatim.
    #[error("{0}")]
    Loader(String),
}
