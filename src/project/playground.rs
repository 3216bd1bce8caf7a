//! Playground and workspace artifact generation.
//!
//! These are small, deterministic text artifacts: the playground entry file
//! with one `import` per surfaced library, the playground metadata stamped
//! with the target platform, and the minimal workspace XML that ties the
//! playground and the package container together.

use std::fs;

use anyhow::{Context, Result};
use clap::ValueEnum;

use super::layout::ProjectLayout;

/// Target platform stamped into the playground metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Platform {
    /// macOS playground
    #[default]
    Macos,
    /// iOS playground
    Ios,
    /// tvOS playground
    Tvos,
}

impl Platform {
    /// The `target-platform` attribute value.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Macos => "macos",
            Self::Ios => "ios",
            Self::Tvos => "tvos",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// The playground entry source: a short banner plus one import per library,
/// in the order the libraries are given.
pub fn entry_source(libraries: &[String]) -> String {
    let mut source = String::from(
        "// Generated by tryout.\n\
         //\n\
         // The libraries below were discovered in your dependencies and are\n\
         // ready to use. Start experimenting!\n\n",
    );
    for library in libraries {
        source.push_str(&format!("import {library}\n"));
    }
    source
}

/// The `contents.xcplayground` metadata document.
pub fn playground_metadata(platform: Platform) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <playground version='5.0' target-platform='{}'>\n\
         \x20   <timeline fileName='timeline.xctimeline'/>\n\
         </playground>\n",
        platform.tag()
    )
}

/// The `contents.xcworkspacedata` document referencing the playground and
/// the package container.
pub fn workspace_data() -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <Workspace\n\
         \x20  version = \"1.0\">\n\
         \x20  <FileRef\n\
         \x20     location = \"group:{}\">\n\
         \x20  </FileRef>\n\
         \x20  <FileRef\n\
         \x20     location = \"group:\">\n\
         \x20  </FileRef>\n\
         </Workspace>\n",
        ProjectLayout::PLAYGROUND_NAME
    )
}

/// Write the playground directory: entry source and platform metadata.
pub fn write_playground(
    layout: &ProjectLayout,
    libraries: &[String],
    platform: Platform,
) -> Result<()> {
    let playground = layout.playground();
    fs::create_dir_all(&playground)
        .with_context(|| format!("failed to create {}", playground.display()))?;
    fs::write(layout.playground_entry(), entry_source(libraries))
        .with_context(|| format!("failed to write {}", layout.playground_entry().display()))?;
    fs::write(layout.playground_metadata(), playground_metadata(platform))
        .with_context(|| format!("failed to write {}", layout.playground_metadata().display()))?;
    Ok(())
}

/// Write the workspace descriptor.
pub fn write_workspace(layout: &ProjectLayout) -> Result<()> {
    let workspace = layout.workspace();
    fs::create_dir_all(&workspace)
        .with_context(|| format!("failed to create {}", workspace.display()))?;
    fs::write(workspace.join("contents.xcworkspacedata"), workspace_data())
        .with_context(|| format!("failed to write workspace data in {}", workspace.display()))?;
    Ok(())
}
