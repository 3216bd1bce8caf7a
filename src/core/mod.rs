//! Core types for tryout
//!
//! This module holds the foundations shared by the rest of the crate:
//! the strongly-typed error taxonomy ([`TryoutError`]), the user-facing
//! error wrapper ([`ErrorContext`]), and the conversion helper
//! ([`user_friendly_error`]) used at the CLI boundary.
//!
//! # Design Principles
//!
//! - **Error first**: every fallible operation returns a [`Result`] with a
//!   meaningful variant; all errors are fatal to the pipeline.
//! - **User experience**: errors displayed to the terminal carry contextual
//!   details and an actionable suggestion, with color highlighting.
//!
//! [`Result`]: std::result::Result

pub mod error;

pub use error::{ErrorContext, TryoutError, user_friendly_error};
