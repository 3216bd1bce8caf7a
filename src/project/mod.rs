//! Project assembly pipeline.
//!
//! [`Assembler::run`] owns the strictly ordered phase sequence that turns
//! parsed dependencies into a coherent project:
//!
//! ```text
//! Init -> CreateDirectory -> ScaffoldPackage -> WriteDeps(pass 1)
//!      -> ResolveDependencies -> Introspect -> WriteDeps(pass 2)
//!      -> WriteTargets -> GenerateIDEProject -> WriteWorkspace
//!      -> BuildDependencies -> WriteInteractiveFiles -> [WriteBookBundle]
//!      -> Finalize
//! ```
//!
//! Every phase must complete before the next begins; later phases depend on
//! artifacts earlier ones produce (target wiring needs library discovery).
//! Any failure is fatal. Partially-created directories are left on disk for
//! inspection, and the overwrite check runs before anything is created so a
//! rejected run mutates nothing.

pub mod book;
pub mod layout;
pub mod playground;
pub mod reporter;

pub use layout::ProjectLayout;
pub use playground::Platform;
pub use reporter::{ConsoleReporter, PipelineStage, ProgressReporter, RecordingReporter,
    SilentReporter};

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::TryoutError;
use crate::dependency::Dependency;
use crate::introspect::{Introspector, all_libraries};
use crate::manifest::{ManifestDocument, dependencies_block, targets_block};
use crate::toolchain::Toolchain;

/// Everything the assembler needs to know about one run.
#[derive(Debug, Clone)]
pub struct AssemblyConfig {
    /// Project (and package, and target) name
    pub project_name: String,
    /// Directory the project is created under
    pub output_dir: PathBuf,
    /// Platform tag stamped into the playground metadata
    pub platform: Platform,
    /// Explicit library names to surface for import; empty means all
    /// discovered libraries
    pub libs: Vec<String>,
    /// Delete a pre-existing project directory instead of failing
    pub force: bool,
    /// Print the open command instead of launching the IDE
    pub skip_open: bool,
    /// Additionally emit the book bundle
    pub book: bool,
}

/// Pipeline orchestrator. Phases are non-retryable and sequential; the
/// reporter observes each boundary but never influences control flow.
pub struct Assembler<'a> {
    config: AssemblyConfig,
    toolchain: Toolchain,
    reporter: &'a dyn ProgressReporter,
}

impl<'a> Assembler<'a> {
    /// Create an assembler over a located toolchain.
    pub fn new(
        config: AssemblyConfig,
        toolchain: Toolchain,
        reporter: &'a dyn ProgressReporter,
    ) -> Self {
        Self {
            config,
            toolchain,
            reporter,
        }
    }

    /// Run the full pipeline for `deps`.
    pub async fn run(&self, deps: &[Dependency]) -> Result<()> {
        // Rejections that must precede any side effect: an empty dependency
        // list, and an existing target without --force.
        if deps.is_empty() {
            return Err(TryoutError::MissingDependency.into());
        }

        let layout = ProjectLayout::new(&self.config.output_dir, &self.config.project_name);
        let project_dir = layout.project_dir().to_path_buf();

        if project_dir.exists() {
            if self.config.force {
                tracing::info!("removing existing project at {}", project_dir.display());
                fs::remove_dir_all(&project_dir).with_context(|| {
                    format!("failed to remove existing {}", project_dir.display())
                })?;
            } else {
                return Err(TryoutError::PathAlreadyExists {
                    path: project_dir.display().to_string(),
                }
                .into());
            }
        }

        self.reporter.report(
            PipelineStage::Started,
            &format!("Creating project {}", project_dir.display()),
        );

        fs::create_dir_all(&project_dir)
            .with_context(|| format!("failed to create {}", project_dir.display()))?;
        self.toolchain.init_package(&project_dir).await?;

        // Pass 1: user-supplied sources only; this is what drives the
        // resolver.
        let manifest = ManifestDocument::in_dir(&project_dir);
        manifest.append_block(&dependencies_block(deps, None))?;
        self.reporter.report(
            PipelineStage::DependenciesListed,
            &format!(
                "Declared {} dependenc{}",
                deps.len(),
                if deps.len() == 1 { "y" } else { "ies" }
            ),
        );

        self.reporter
            .report(PipelineStage::Resolving, "Resolving dependencies");
        self.toolchain.resolve(&project_dir).await?;

        let introspector = Introspector::new(&self.toolchain, &project_dir);
        let packages = introspector.introspect_all(deps).await?;
        let libraries = all_libraries(&packages);
        self.reporter.report(
            PipelineStage::LibrariesListed,
            &format!(
                "Found libraries: {}",
                libraries
                    .iter()
                    .map(|l| l.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        );

        // Pass 2: re-declare the dependencies with their canonical names,
        // then wire one target to every discovered library. The target
        // override must come only after discovery succeeded; a target
        // referencing undiscovered libraries breaks the downstream build.
        let canonical_names: Vec<String> =
            packages.iter().map(|p| p.canonical_name.clone()).collect();
        manifest.append_block(&dependencies_block(deps, Some(&canonical_names)))?;
        manifest.append_block(&targets_block(layout.name(), &libraries))?;

        self.reporter
            .report(PipelineStage::Building, "Generating project and building dependencies");
        self.toolchain.generate_xcodeproj(&project_dir).await?;
        playground::write_workspace(&layout)?;
        self.toolchain.build(&project_dir).await?;

        let imports = self.surfaced_libraries(&libraries);
        playground::write_playground(&layout, &imports, self.config.platform)?;

        if self.config.book {
            let copied = book::write_book(&layout.book_dir(), &packages)?;
            self.reporter.report(
                PipelineStage::BookWritten,
                &format!(
                    "Copied {copied} module{} into {}",
                    if copied == 1 { "" } else { "s" },
                    layout.book_dir().display()
                ),
            );
        }

        let workspace = layout.workspace();
        if self.config.skip_open {
            self.reporter.report(
                PipelineStage::OpenAdvisory,
                &format!("Open the project with: {}", Toolchain::open_instruction(&workspace)),
            );
        } else {
            self.reporter.report(
                PipelineStage::OpenAdvisory,
                &format!("Opening {}", workspace.display()),
            );
            self.toolchain.open(&workspace).await?;
        }

        self.reporter.report(
            PipelineStage::Completed,
            &format!("Project ready at {}", project_dir.display()),
        );
        Ok(())
    }

    /// Libraries surfaced in the playground entry file: the explicit
    /// `--libs` selection in the order given, or every discovered library
    /// in declaration order.
    fn surfaced_libraries(&self, discovered: &[crate::introspect::Library]) -> Vec<String> {
        if self.config.libs.is_empty() {
            discovered.iter().map(|l| l.name.clone()).collect()
        } else {
            self.config.libs.clone()
        }
    }
}
