//! Pipeline progress notifications.
//!
//! The assembler reports each phase boundary to a caller-supplied
//! [`ProgressReporter`]. Notifications are synchronous, arrive in pipeline
//! order, and are purely observational: the assembler never branches on
//! anything a reporter does.
//!
//! The console implementation renders an `indicatif` spinner in interactive
//! terminals and falls back to plain lines when progress is disabled via
//! `TRYOUT_NO_PROGRESS`, `--no-progress`, or `--quiet`.

use std::sync::Mutex;
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// Ordered progress markers emitted at phase boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// The run was accepted and the project directory is being created
    Started,
    /// Dependency declarations were written to the manifest
    DependenciesListed,
    /// The external resolver is fetching dependencies
    Resolving,
    /// Library products were discovered across the resolved checkouts
    LibrariesListed,
    /// The IDE project is being generated and dependencies pre-built
    Building,
    /// The book bundle was written
    BookWritten,
    /// How the generated workspace will be (or can be) opened
    OpenAdvisory,
    /// The pipeline finished successfully
    Completed,
}

impl PipelineStage {
    /// Stable kebab-case identifier.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::DependenciesListed => "dependencies-listed",
            Self::Resolving => "resolving",
            Self::LibrariesListed => "libraries-listed",
            Self::Building => "building",
            Self::BookWritten => "book-written",
            Self::OpenAdvisory => "open-advisory",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Callback contract for stage notifications. Implementations must not
/// assume anything beyond "called once per stage, in order".
pub trait ProgressReporter {
    /// Observe one stage transition.
    fn report(&self, stage: PipelineStage, message: &str);
}

/// Checks if progress animations should be disabled.
fn is_progress_disabled() -> bool {
    std::env::var("TRYOUT_NO_PROGRESS").is_ok()
}

/// Terminal reporter: spinner in interactive use, plain lines otherwise.
pub struct ConsoleReporter {
    spinner: Option<ProgressBar>,
    quiet: bool,
}

impl ConsoleReporter {
    /// Create a console reporter. `quiet` suppresses everything except the
    /// open advisory, which the user still needs to see.
    pub fn new(quiet: bool) -> Self {
        let spinner = if quiet || is_progress_disabled() {
            None
        } else {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            Some(bar)
        };
        Self {
            spinner,
            quiet,
        }
    }
}

impl ProgressReporter for ConsoleReporter {
    fn report(&self, stage: PipelineStage, message: &str) {
        tracing::info!(target: "pipeline", "{stage}: {message}");

        match stage {
            PipelineStage::OpenAdvisory => {
                if let Some(bar) = &self.spinner {
                    bar.println(message.to_string());
                } else {
                    println!("{message}");
                }
            }
            PipelineStage::Completed => {
                if let Some(bar) = &self.spinner {
                    bar.finish_and_clear();
                }
                if !self.quiet {
                    println!("{} {message}", "✓".green().bold());
                }
            }
            _ => {
                if let Some(bar) = &self.spinner {
                    bar.set_message(message.to_string());
                } else if !self.quiet {
                    println!("{} {message}", "»".cyan());
                }
            }
        }
    }
}

/// Reporter that drops everything; used when the caller wants no output.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn report(&self, _stage: PipelineStage, _message: &str) {}
}

/// Reporter that records every notification, for asserting stage order in
/// tests.
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<(PipelineStage, String)>>,
}

impl RecordingReporter {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded `(stage, message)` pairs, in arrival order.
    pub fn events(&self) -> Vec<(PipelineStage, String)> {
        self.events.lock().expect("reporter lock poisoned").clone()
    }

    /// Just the stages, in arrival order.
    pub fn stages(&self) -> Vec<PipelineStage> {
        self.events().into_iter().map(|(stage, _)| stage).collect()
    }
}

impl ProgressReporter for RecordingReporter {
    fn report(&self, stage: PipelineStage, message: &str) {
        self.events
            .lock()
            .expect("reporter lock poisoned")
            .push((stage, message.to_string()));
    }
}
