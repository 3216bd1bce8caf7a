//! Error handling for tryout
//!
//! The error system is built around two types:
//! - [`TryoutError`] - strongly-typed variants for every failure mode in the
//!   assembly pipeline
//! - [`ErrorContext`] - wrapper that adds user-facing suggestions and details
//!
//! Every error is fatal to the whole pipeline: there is no partial-success
//! mode and no automatic retry anywhere. External tool flakiness is surfaced
//! verbatim, not masked. Partially-created project directories are left on
//! disk for inspection; a subsequent run needs `--force`.
//!
//! Use [`user_friendly_error`] at the CLI boundary to convert any error into
//! a colored, actionable message.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for tryout operations.
///
/// Variants map one-to-one onto the failure modes of the assembly pipeline,
/// from argument parsing through external tool invocation to artifact
/// generation.
#[derive(Error, Debug)]
pub enum TryoutError {
    /// A dependency argument is neither a recognizable URL nor an existing
    /// filesystem path, or its version requirement does not parse.
    #[error("Invalid dependency specification: {spec}")]
    InvalidDependencyFormat {
        /// The raw dependency token as supplied on the command line
        spec: String,
        /// Why the token was rejected
        reason: String,
    },

    /// No dependencies were supplied on the command line.
    ///
    /// Detected before any filesystem mutation or process invocation.
    #[error("No dependencies specified")]
    MissingDependency,

    /// The target project directory already exists and `--force` was not set.
    ///
    /// This check runs before any directory is created or any subprocess is
    /// spawned, so a rejected run leaves no partial artifacts behind.
    #[error("Path already exists: {path}")]
    PathAlreadyExists {
        /// The project directory that already exists
        path: String,
    },

    /// An external tool exited with a non-zero status.
    ///
    /// Captured output is carried verbatim for diagnosis. Exit status is the
    /// only thing the gateway ever interprets; tool output is never parsed
    /// for control decisions.
    #[error("'{tool}' failed with exit status {status}")]
    ToolFailure {
        /// The command line that failed (e.g. "swift package resolve")
        tool: String,
        /// Exit code reported by the process, or -1 if terminated by signal
        status: i32,
        /// Combined stdout/stderr captured from the process
        output: String,
    },

    /// A required toolchain binary is not installed or not in PATH.
    #[error("'{tool}' is not installed or not found in PATH")]
    ToolNotFound {
        /// The binary that could not be located (e.g. "swift", "xed")
        tool: String,
    },

    /// Resolution succeeded but no dependency exposes a single library
    /// product, so there is nothing to wire a target to.
    #[error("No libraries found in any of the dependencies")]
    NoLibrariesFound,

    /// `--book` was requested but no source modules could be extracted from
    /// the resolved checkouts.
    #[error("No sources found to bundle into a book")]
    NoSourcesFound,

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON decoding error (package manifest dumps)
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Semver parsing error
    #[error("Semver parsing error: {0}")]
    SemverError(#[from] semver::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for TryoutError {
    fn clone(&self) -> Self {
        match self {
            Self::InvalidDependencyFormat {
                spec,
                reason,
            } => Self::InvalidDependencyFormat {
                spec: spec.clone(),
                reason: reason.clone(),
            },
            Self::MissingDependency => Self::MissingDependency,
            Self::PathAlreadyExists {
                path,
            } => Self::PathAlreadyExists {
                path: path.clone(),
            },
            Self::ToolFailure {
                tool,
                status,
                output,
            } => Self::ToolFailure {
                tool: tool.clone(),
                status: *status,
                output: output.clone(),
            },
            Self::ToolNotFound {
                tool,
            } => Self::ToolNotFound {
                tool: tool.clone(),
            },
            Self::NoLibrariesFound => Self::NoLibrariesFound,
            Self::NoSourcesFound => Self::NoSourcesFound,
            // For errors that don't implement Clone, convert to Other
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::JsonError(e) => Self::Other {
                message: format!("JSON parsing error: {e}"),
            },
            Self::SemverError(e) => Self::Other {
                message: format!("Semver parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information.
///
/// Wraps a [`TryoutError`] with optional details and a suggestion. Displayed
/// errors show the message in red, details in yellow, and the suggestion in
/// green.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: TryoutError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: TryoutError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add an actionable suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining why the error occurred.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error context to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with suggestions.
///
/// This is the single entry point the CLI uses to turn whatever bubbled up
/// out of the pipeline into one descriptive message. [`TryoutError`] variants
/// get tailored suggestions; everything else is printed with its full cause
/// chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(tryout_error) = error.downcast_ref::<TryoutError>() {
        return create_error_context(tryout_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(TryoutError::Other {
                    message: format!("Permission denied: {io_error}"),
                })
                .with_suggestion(
                    "Check file ownership, or pick a different --outputdir you can write to",
                );
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(TryoutError::Other {
                    message: format!("File not found: {io_error}"),
                })
                .with_suggestion("Check that the path exists and is spelled correctly");
            }
            _ => {}
        }
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();

    let chain: Vec<String> = error
        .chain()
        .skip(1) // Skip the root cause which is already in to_string()
        .map(std::string::ToString::to_string)
        .collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(TryoutError::Other {
        message,
    })
}

/// Map each [`TryoutError`] variant to an [`ErrorContext`] with a tailored
/// suggestion.
fn create_error_context(error: TryoutError) -> ErrorContext {
    match &error {
        TryoutError::InvalidDependencyFormat { spec, reason } => {
            ErrorContext::new(error.clone())
                .with_details(format!("'{spec}' was rejected: {reason}"))
                .with_suggestion(
                    "Dependencies are given as a Git URL or a local path, optionally followed by \
                     '@' and a requirement: '@1.2.3', '@exact:1.2.3', '@1.0.0..<2.0.0', \
                     '@branch:main', or '@revision:<sha>'",
                )
        }

        TryoutError::MissingDependency => ErrorContext::new(error)
            .with_suggestion(
                "Pass at least one package reference, e.g. \
                 'tryout https://github.com/apple/swift-argument-parser@1.3.0'",
            ),

        TryoutError::PathAlreadyExists { path } => ErrorContext::new(error.clone())
            .with_details(format!(
                "Nothing was created or modified; '{path}' is untouched"
            ))
            .with_suggestion("Re-run with --force to delete and recreate it, or pick another --name"),

        TryoutError::ToolFailure { tool, output, .. } => {
            let mut ctx = ErrorContext::new(error.clone()).with_suggestion(format!(
                "Run '{tool}' manually in the project directory for more detail"
            ));
            if !output.trim().is_empty() {
                ctx = ctx.with_details(output.trim().to_string());
            }
            ctx
        }

        TryoutError::ToolNotFound { tool } => ErrorContext::new(error.clone())
            .with_suggestion(match tool.as_str() {
                "swift" => "Install the Swift toolchain from https://swift.org/download/ or via Xcode",
                "xed" => "xed ships with Xcode; install Xcode or pass --skip-open",
                _ => "Install the missing tool and make sure it is in your PATH",
            }),

        TryoutError::NoLibrariesFound => ErrorContext::new(error)
            .with_details(
                "Every dependency resolved, but none of them declares a product of type 'library'",
            )
            .with_suggestion(
                "Check that the packages expose library products (executables and plugins are not importable)",
            ),

        TryoutError::NoSourcesFound => ErrorContext::new(error)
            .with_details("None of the resolved checkouts contains a Sources/ module to copy")
            .with_suggestion("Drop --book, or point at packages with a conventional Sources/ layout"),

        _ => ErrorContext::new(error),
    }
}
