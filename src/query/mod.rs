//! Query string configuration.
//!
//! Parses URL query strings like `?mode=grid&rows=3&cols=2&fit=crop` into a
//! [`LayoutConfig`], so a web front end can hand its control state straight
//! to the layout engine.
//!
//! # Example
//!
//! ```
//! use zencollage::{Background, GridFit, LayoutMode, ScalePolicy, query};
//!
//! let result = query::parse("mode=grid&rows=3&cols=2&fit=crop&scale=largest&bgcolor=transparent");
//! assert!(result.warnings.is_empty());
//!
//! let config = result.config;
//! assert_eq!(config.mode, LayoutMode::Grid);
//! assert_eq!((config.grid.rows(), config.grid.cols()), (3, 2));
//! assert_eq!(config.grid.fit, GridFit::Crop);
//! assert_eq!(config.scale, ScalePolicy::GrowToLargest);
//! assert_eq!(config.background, Background::Transparent);
//! ```
//!
//! Parsing never fails. Unknown keys, repeated keys, and unparseable values
//! are reported as [`ParseWarning`]s and leave the affected field at its
//! default.

mod parse;

#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::config::LayoutConfig;

/// Result of parsing a query string.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Configuration with every recognized key applied over the defaults.
    pub config: LayoutConfig,
    /// Non-fatal parse warnings.
    pub warnings: Vec<ParseWarning>,
}

/// Non-fatal warning from query string parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// A key appeared more than once (last value wins).
    DuplicateKey { key: String, value: String },
    /// A key was not recognized.
    KeyNotRecognized { key: String, value: String },
    /// A key was recognized but its value could not be parsed.
    ValueInvalid {
        key: String,
        value: String,
        reason: &'static str,
    },
}

/// Parse a query string (with or without leading `?`).
pub fn parse(query: &str) -> ParseResult {
    let (config, warnings) = parse::parse_query(query);
    if !warnings.is_empty() {
        tracing::debug!(count = warnings.len(), "query string produced warnings");
    }
    ParseResult { config, warnings }
}
