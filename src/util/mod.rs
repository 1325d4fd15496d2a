//! Utility functions for common operations.
//!
//! This module provides reusable utilities for:
//!
//! - **URL validation**: deciding whether a submitted source is a link the
//!   system browser can be handed
//! - **Text processing**: Unicode-aware width calculation, truncation, and
//!   terminal escape stripping for community-supplied text
//!
//! # Examples
//!
//! ```
//! use til::util::{validate_source_url, display_width, truncate_to_width};
//!
//! // Validate a fact's source link
//! let url = validate_source_url("https://example.com/article").unwrap();
//!
//! // Calculate display width for proper terminal rendering
//! let width = display_width("Hello 世界"); // Returns 10 (5 + 1 + 2*2)
//!
//! // Truncate to fit terminal width
//! let truncated = truncate_to_width("A very long fact text", 15);
//! ```

mod text;
mod url_validator;

pub use text::{display_width, strip_control_chars, truncate_to_width};
pub use url_validator::{is_valid_http_url, validate_source_url, SourceUrlError};
