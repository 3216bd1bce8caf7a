//! Two-phase rewriting of the generated `Package.swift`.
//!
//! The manifest is not parsed or patched structurally. It is treated as an
//! append-only sequence of text blocks: the scaffold the external toolchain
//! wrote, followed by override blocks appended by successive passes. Each
//! override fully re-declares the field it owns (`package.dependencies` or
//! `package.targets`), so only the last occurrence of a declaration is
//! semantically effective and earlier passes remain as harmless dead
//! declarations.
//!
//! Three blocks are appended over the lifetime of a run:
//!
//! 1. dependencies, rendered from the user-supplied sources only (drives the
//!    resolver),
//! 2. dependencies again, re-rendered with each package's canonical name
//!    (the manifest DSL needs an explicit `name:` whenever it differs from
//!    the name inferable from the URL, which is only knowable post-fetch),
//! 3. one target wired to every discovered library product.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::dependency::{Dependency, Requirement, Source};
use crate::introspect::Library;

/// Handle to the on-disk `Package.swift` being assembled.
///
/// Every mutation re-reads the file first and writes the full logical
/// content back (scaffold plus all overrides accumulated so far); an
/// external tool may have appended its own content between passes, and an
/// in-memory-only view would drop it.
#[derive(Debug)]
pub struct ManifestDocument {
    path: PathBuf,
}

impl ManifestDocument {
    /// File name of the package manifest.
    pub const FILE_NAME: &'static str = "Package.swift";

    /// Bind to the manifest inside `project_dir`. The file itself is created
    /// by the external scaffold tool before the first rewrite pass.
    pub fn in_dir(project_dir: &Path) -> Self {
        Self {
            path: project_dir.join(Self::FILE_NAME),
        }
    }

    /// Path to the manifest file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current on-disk content.
    pub fn read(&self) -> Result<String> {
        fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read manifest at {}", self.path.display()))
    }

    /// Append a fully self-contained override block.
    pub fn append_block(&self, block: &str) -> Result<()> {
        let mut content = self.read()?;
        if !content.ends_with('\n') {
            content.push('\n');
        }
        content.push('\n');
        content.push_str(block.trim_end());
        content.push('\n');
        fs::write(&self.path, content)
            .with_context(|| format!("failed to write manifest at {}", self.path.display()))?;
        tracing::debug!(target: "manifest", "appended override block to {}", self.path.display());
        Ok(())
    }
}

/// Render a complete `package.dependencies` override.
///
/// `canonical_names` is `None` on the first pass (before resolution) and
/// carries one resolved name per dependency, in declaration order, on the
/// second. The Swift DSL only needs the explicit `name:` for URL sources
/// whose canonical name is not inferable from the URL, but rendering it for
/// every resolved dependency is always valid and keeps the block uniform.
pub fn dependencies_block(deps: &[Dependency], canonical_names: Option<&[String]>) -> String {
    let mut block = String::from("// Generated by tryout: dependency declarations.\n");
    block.push_str("// A later re-declaration supersedes this one.\n");
    block.push_str("package.dependencies = [\n");
    for (index, dep) in deps.iter().enumerate() {
        let name = canonical_names.map(|names| names[index].as_str());
        block.push_str("    ");
        block.push_str(&package_clause(dep, name));
        block.push_str(",\n");
    }
    block.push(']');
    block
}

/// Render a complete `package.targets` override declaring one target that
/// depends on every discovered library product.
pub fn targets_block(project_name: &str, libraries: &[Library]) -> String {
    let mut block = String::from("// Generated by tryout: target wiring.\n");
    block.push_str("package.targets = [\n");
    block.push_str(&format!(
        "    .target(name: \"{project_name}\", dependencies: [\n"
    ));
    for library in libraries {
        block.push_str("        ");
        block.push_str(&product_clause(library));
        block.push_str(",\n");
    }
    block.push_str("    ]),\n");
    block.push(']');
    block
}

/// A single `.package(...)` clause.
fn package_clause(dep: &Dependency, canonical_name: Option<&str>) -> String {
    let name_arg = canonical_name
        .map(|name| format!("name: \"{name}\", "))
        .unwrap_or_default();
    match &dep.source {
        Source::Path(path) => {
            format!(".package({name_arg}path: \"{}\")", path.display())
        }
        Source::Url(url) => {
            format!(
                ".package({name_arg}url: \"{url}\", {})",
                requirement_clause(&dep.requirement)
            )
        }
    }
}

/// The requirement fragment of a `.package(url:...)` clause.
fn requirement_clause(requirement: &Requirement) -> String {
    match requirement {
        Requirement::Latest => "from: \"0.0.0\"".to_string(),
        Requirement::From(v) => format!("from: \"{v}\""),
        Requirement::Exact(v) => format!(".exact(\"{v}\")"),
        Requirement::Range {
            lower,
            upper,
        } => format!("\"{lower}\"..<\"{upper}\""),
        Requirement::ClosedRange {
            lower,
            upper,
        } => format!("\"{lower}\"...\"{upper}\""),
        Requirement::Branch(name) => format!(".branch(\"{name}\")"),
        Requirement::Revision(rev) => format!(".revision(\"{rev}\")"),
    }
}

/// A target dependency clause. Libraries whose name matches their owning
/// package can be referenced by bare name; otherwise the product must be
/// qualified with the package to disambiguate same-named libraries across
/// packages.
fn product_clause(library: &Library) -> String {
    if library.name == library.package_name {
        format!("\"{}\"", library.name)
    } else {
        format!(
            ".product(name: \"{}\", package: \"{}\")",
            library.name, library.package_name
        )
    }
}
