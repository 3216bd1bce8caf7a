//! Command-line interface for tryout.
//!
//! tryout is a single-purpose tool, so the CLI is one flat command rather
//! than a subcommand tree: the positional arguments are dependency
//! references and everything else is a flag.
//!
//! # Usage
//!
//! ```bash
//! # Try out a package at its latest version
//! tryout https://github.com/apple/swift-nio
//!
//! # Pin a version, pick the libraries to import, target iOS
//! tryout https://github.com/apple/swift-nio from:2.61.0 \
//!     --libs NIO NIOHTTP1 --platform ios
//!
//! # Work against a local checkout, regenerate an existing project
//! tryout ../my-package --name Scratch --force
//! ```
//!
//! # Global Options
//!
//! - `--verbose` / `--quiet` control log output level
//! - `--no-progress` disables the spinner for scripts and CI

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::dependency::Dependency;
use crate::project::{Assembler, AssemblyConfig, ConsoleReporter, Platform};
use crate::toolchain::Toolchain;

/// Runtime configuration derived from the parsed CLI flags.
///
/// Holds settings that are otherwise communicated through environment
/// variables, so tests and programmatic callers can control behavior
/// without touching global state until [`apply_to_env`](Self::apply_to_env)
/// is called.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log level for the `RUST_LOG` environment variable. `None` preserves
    /// whatever is already set.
    pub log_level: Option<String>,

    /// Whether to disable the progress spinner. Sets `TRYOUT_NO_PROGRESS`,
    /// which the console reporter checks at construction time.
    pub no_progress: bool,
}

impl CliConfig {
    /// Apply this configuration to the process environment.
    ///
    /// Must be called once, from the main thread, before any other threads
    /// are spawned.
    pub fn apply_to_env(&self) {
        // Single-threaded at this point; nothing else reads the environment
        // concurrently.
        unsafe {
            if self.no_progress {
                std::env::set_var("TRYOUT_NO_PROGRESS", "1");
            }

            if let Some(ref level) = self.log_level {
                if std::env::var("RUST_LOG").is_err() {
                    std::env::set_var("RUST_LOG", level);
                }
            }
        }
    }
}

/// Main CLI structure for tryout.
///
/// Parses dependency references plus project options and drives the
/// assembly pipeline. `--verbose` and `--quiet` are mutually exclusive.
#[derive(Parser, Debug)]
#[command(
    name = "tryout",
    about = "Try out Swift packages in an Xcode playground",
    version,
    author,
    long_about = "tryout wires one or more Swift package dependencies into a freshly \
generated Xcode project with an attached playground, so a package can be explored \
interactively without hand-editing a manifest."
)]
pub struct Cli {
    /// Package dependencies to try out.
    ///
    /// Each dependency is a URL or local path, optionally followed by a
    /// version requirement, either appended with `@` or given as the next
    /// argument:
    ///
    /// ```bash
    /// tryout https://github.com/apple/swift-nio@from:2.61.0
    /// tryout https://github.com/apple/swift-nio from:2.61.0
    /// ```
    ///
    /// Supported requirements: `from:X.Y.Z`, `exact:X.Y.Z`,
    /// `branch:NAME`, `revision:SHA`, `X.Y.Z..<A.B.C`, `X.Y.Z...A.B.C`,
    /// or a bare version (treated as `from:`). Local paths take no
    /// requirement.
    #[arg(value_name = "DEPENDENCY")]
    dependencies: Vec<String>,

    /// Name for the generated project, package, and target.
    #[arg(short, long, default_value = "Tryout-Playground")]
    name: String,

    /// Libraries to import in the playground, in the order given.
    ///
    /// Defaults to every library the dependencies provide. This only
    /// filters the playground imports; all discovered libraries are still
    /// linked into the project target.
    #[arg(short, long, num_args = 1.., value_name = "LIBRARY")]
    libs: Vec<String>,

    /// Platform the playground targets.
    #[arg(short, long, value_enum, default_value_t = Platform::Macos)]
    platform: Platform,

    /// Directory the project is created under.
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    outputdir: PathBuf,

    /// Delete and recreate the project directory if it already exists.
    #[arg(short, long)]
    force: bool,

    /// Print the command to open the generated workspace instead of
    /// launching the IDE.
    #[arg(long)]
    skip_open: bool,

    /// Also copy the dependencies' sources into a browsable Book/ folder.
    #[arg(long)]
    book: bool,

    /// Enable verbose output for debugging.
    ///
    /// Equivalent to `RUST_LOG=debug`. Mutually exclusive with `--quiet`.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors and the open advisory.
    #[arg(short, long)]
    quiet: bool,

    /// Disable the progress spinner.
    ///
    /// Useful for CI pipelines and terminals without ANSI support.
    #[arg(long)]
    no_progress: bool,
}

impl Cli {
    /// Execute the CLI with configuration derived from the parsed flags.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Build a [`CliConfig`] from the parsed CLI arguments.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("warn".to_string())
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress,
        }
    }

    /// Execute with an explicit configuration, for tests and programmatic
    /// callers.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.apply_to_env();
        init_logging();

        let deps = Dependency::parse_all(&self.dependencies)?;

        let toolchain = Toolchain::locate()?;
        let reporter = ConsoleReporter::new(self.quiet);
        let assembly = AssemblyConfig {
            project_name: self.name,
            output_dir: self.outputdir,
            platform: self.platform,
            libs: self.libs,
            force: self.force,
            skip_open: self.skip_open,
            book: self.book,
        };

        Assembler::new(assembly, toolchain, &reporter).run(&deps).await
    }
}

/// Initialize the tracing subscriber from `RUST_LOG`. Safe to call more
/// than once; later calls are no-ops.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .try_init();
}
