//! Error types for tree layout construction.
//!
//! This module provides the main error type [`LayoutError`]. Every variant is
//! fatal for the current layout run: construction aborts immediately and no
//! partial layout is exposed. Retrying after fixing the input is the caller's
//! responsibility.

use thiserror::Error;

/// The error type reported when a layout cannot be computed.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A node is reachable from the root through more than one path.
    #[error("Structure error: {0}")]
    Structure(String),

    /// The tree access interface or the extent provider broke its contract,
    /// e.g. a negative node size or `is_leaf` disagreeing with `children`.
    #[error("Contract violation: {0}")]
    Contract(String),

    /// A configured gap function returned a negative value.
    #[error("Configuration error: {0}")]
    Config(String),
}
