//! Gateway to the external Swift/Xcode toolchain.
//!
//! tryout delegates everything heavyweight to tools outside its control:
//! scaffolding a package, resolving dependencies, generating the Xcode
//! project, pre-building, and opening the IDE. [`Toolchain`] names those
//! operations; [`ToolCommand`] executes them. Only the exit status is
//! authoritative: a non-zero exit is always fatal, with the captured
//! output surfaced verbatim for diagnosis.
//!
//! Binaries are located with `which` and can be overridden through
//! `TRYOUT_SWIFT_BIN` / `TRYOUT_XED_BIN`, which is also how the test suite
//! substitutes a stub toolchain.

pub mod command;

pub use command::{ToolCommand, ToolOutput};

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::TryoutError;

/// Environment variable overriding the `swift` binary location.
pub const SWIFT_BIN_ENV: &str = "TRYOUT_SWIFT_BIN";
/// Environment variable overriding the `xed` binary location.
pub const XED_BIN_ENV: &str = "TRYOUT_XED_BIN";

/// Locate a toolchain binary, honoring its environment override.
fn locate_binary(name: &str, env_var: &str) -> Result<PathBuf, TryoutError> {
    if let Ok(overridden) = std::env::var(env_var) {
        return Ok(PathBuf::from(overridden));
    }
    which::which(name).map_err(|_| TryoutError::ToolNotFound {
        tool: name.to_string(),
    })
}

/// The external toolchain facade.
///
/// Holds the resolved location of `swift`; `xed` is looked up lazily since
/// it is only needed when the run actually opens the IDE.
#[derive(Debug, Clone)]
pub struct Toolchain {
    swift: PathBuf,
}

impl Toolchain {
    /// Locate the toolchain. Fails with `ToolNotFound` before the pipeline
    /// has touched the filesystem if `swift` is not installed.
    pub fn locate() -> Result<Self, TryoutError> {
        let swift = locate_binary("swift", SWIFT_BIN_ENV)?;
        tracing::debug!(target: "toolchain", "using swift at {}", swift.display());
        Ok(Self {
            swift,
        })
    }

    fn swift_command(&self, label: &str) -> ToolCommand {
        ToolCommand::new(self.swift.display().to_string()).with_label(label)
    }

    /// Scaffold a new library package in `dir`, producing the original
    /// manifest block that all later rewrite passes append to.
    pub async fn init_package(&self, dir: &Path) -> Result<()> {
        self.swift_command("swift package init")
            .args(["package", "init", "--type", "library"])
            .current_dir(dir)
            .execute_success()
            .await
    }

    /// Resolve dependencies, fetching sources into `.build/checkouts` and
    /// pinning exact versions.
    pub async fn resolve(&self, dir: &Path) -> Result<()> {
        self.swift_command("swift package resolve")
            .args(["package", "resolve"])
            .current_dir(dir)
            .execute_success()
            .await
    }

    /// Dump the manifest of the package at `package_dir` as JSON.
    ///
    /// The gateway only checks the exit status; decoding the JSON is the
    /// introspector's job.
    pub async fn dump_manifest(&self, package_dir: &Path) -> Result<String> {
        self.swift_command("swift package dump-package")
            .args(["package", "dump-package"])
            .current_dir(package_dir)
            .execute_stdout()
            .await
    }

    /// Generate the Xcode project file for the package in `dir`.
    pub async fn generate_xcodeproj(&self, dir: &Path) -> Result<()> {
        self.swift_command("swift package generate-xcodeproj")
            .args(["package", "generate-xcodeproj"])
            .current_dir(dir)
            .execute_success()
            .await
    }

    /// Pre-build the dependencies so the playground opens against compiled
    /// modules.
    pub async fn build(&self, dir: &Path) -> Result<()> {
        self.swift_command("swift build")
            .arg("build")
            .current_dir(dir)
            .execute_success()
            .await
    }

    /// Open the workspace in the IDE via `xed`.
    pub async fn open(&self, workspace: &Path) -> Result<()> {
        let xed = locate_binary("xed", XED_BIN_ENV)?;
        ToolCommand::new(xed.display().to_string())
            .with_label("xed")
            .arg(workspace.display().to_string())
            .execute_success()
            .await
    }

    /// The manual command a user can run to open the workspace themselves.
    pub fn open_instruction(workspace: &Path) -> String {
        format!("xed {}", workspace.display())
    }
}
