//! Result type alias for Syncline operations

use crate::Error;

/// Result type alias for Syncline operations
pub type Result<T> = std::result::Result<T, Error>;
