//! Post-resolution package introspection.
//!
//! After the resolver has populated `.build/checkouts`, each dependency is
//! turned into a [`ResolvedPackage`]: the canonical name its own manifest
//! declares (authoritative, and possibly different from anything inferable
//! from the source URL) plus the ordered list of library products it
//! exposes. Executables, plugins, and test products are not importable and
//! are filtered out.
//!
//! The checkout location is derived from filesystem state; the manifest
//! itself is obtained as a machine-readable JSON dump and decoded here;
//! the gateway never interprets tool output beyond the exit status.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::core::TryoutError;
use crate::dependency::{Dependency, Source};
use crate::toolchain::Toolchain;

/// A library product together with the canonical name of the package that
/// owns it. The pair is what target wiring and import generation need:
/// same-named libraries from different packages stay distinguishable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Library {
    /// Product name as declared by the owning package's manifest
    pub name: String,
    /// Canonical name of the owning package
    pub package_name: String,
}

/// A dependency after resolution and introspection. Read-only once created.
#[derive(Debug, Clone)]
pub struct ResolvedPackage {
    /// Name declared by the package's own manifest
    pub canonical_name: String,
    /// Filesystem location of the fetched sources
    pub checkout_path: PathBuf,
    /// Library product names, in manifest declaration order.
    ///
    /// May be empty for an individual package; the pipeline fails only when
    /// the aggregate across all dependencies is empty.
    pub libraries: Vec<String>,
}

/// Manifest dump as emitted by `swift package dump-package`.
#[derive(Debug, Deserialize)]
pub struct PackageDescription {
    /// Canonical package name
    pub name: String,
    /// Declared products of all kinds
    #[serde(default)]
    pub products: Vec<ProductDescription>,
}

/// One product entry of a manifest dump.
#[derive(Debug, Deserialize)]
pub struct ProductDescription {
    /// Product name
    pub name: String,
    /// Product kind; a JSON object keyed by kind, e.g.
    /// `{"library": ["automatic"]}` or `{"executable": null}`
    #[serde(rename = "type", default)]
    pub kind: serde_json::Value,
}

impl ProductDescription {
    /// True for products of kind `library`.
    pub fn is_library(&self) -> bool {
        self.kind.get("library").is_some()
    }
}

impl PackageDescription {
    /// Decode a manifest dump.
    pub fn from_json(json: &str) -> Result<Self, TryoutError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Names of the library products, in declaration order.
    pub fn library_products(&self) -> Vec<String> {
        self.products
            .iter()
            .filter(|product| product.is_library())
            .map(|product| product.name.clone())
            .collect()
    }
}

/// Locate a dependency's checkout under `checkouts_dir`.
///
/// The resolver names checkout directories after the trailing URL component;
/// when that exact directory is absent (SwiftPM normalizes some names), fall
/// back to a case-insensitive scan.
pub fn find_checkout(checkouts_dir: &Path, hint: &str) -> Option<PathBuf> {
    let direct = checkouts_dir.join(hint);
    if direct.is_dir() {
        return Some(direct);
    }

    let entries = std::fs::read_dir(checkouts_dir).ok()?;
    let wanted = hint.to_lowercase();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = path.file_name().map(|n| n.to_string_lossy().to_lowercase());
        if name.as_deref() == Some(wanted.as_str()) {
            return Some(path);
        }
    }
    None
}

/// Reads resolved checkouts and derives structured package metadata.
pub struct Introspector<'a> {
    toolchain: &'a Toolchain,
    project_dir: &'a Path,
}

impl<'a> Introspector<'a> {
    /// Create an introspector for the project at `project_dir`.
    pub fn new(toolchain: &'a Toolchain, project_dir: &'a Path) -> Self {
        Self {
            toolchain,
            project_dir,
        }
    }

    /// Where the resolver puts fetched sources.
    fn checkouts_dir(&self) -> PathBuf {
        self.project_dir.join(".build").join("checkouts")
    }

    /// The checkout location for one dependency. Local-path sources are
    /// their own checkout and never appear under `.build/checkouts`.
    fn checkout_path(&self, dep: &Dependency) -> Result<PathBuf> {
        match &dep.source {
            Source::Path(path) => Ok(path.clone()),
            Source::Url(url) => {
                let hint = dep.package_hint();
                find_checkout(&self.checkouts_dir(), &hint).ok_or_else(|| {
                    anyhow!(
                        "no checkout found for '{url}' under {} (looked for '{hint}')",
                        self.checkouts_dir().display()
                    )
                })
            }
        }
    }

    /// Introspect every dependency, in declaration order.
    ///
    /// A dependency with zero library products is recorded but contributes
    /// nothing; an empty aggregate across all dependencies fails with
    /// `NoLibrariesFound` before any target wiring happens.
    pub async fn introspect_all(&self, deps: &[Dependency]) -> Result<Vec<ResolvedPackage>> {
        let mut packages = Vec::with_capacity(deps.len());
        for dep in deps {
            let checkout = self.checkout_path(dep)?;
            let dump = self
                .toolchain
                .dump_manifest(&checkout)
                .await
                .with_context(|| format!("failed to dump manifest for {dep}"))?;
            let description = PackageDescription::from_json(&dump)
                .with_context(|| format!("failed to decode manifest dump for {dep}"))?;

            let libraries = description.library_products();
            if libraries.is_empty() {
                tracing::warn!(
                    "package '{}' exposes no library products",
                    description.name
                );
            } else {
                tracing::debug!(
                    "package '{}' exposes libraries: {}",
                    description.name,
                    libraries.join(", ")
                );
            }

            packages.push(ResolvedPackage {
                canonical_name: description.name,
                checkout_path: checkout,
                libraries,
            });
        }

        if packages.iter().all(|package| package.libraries.is_empty()) {
            return Err(TryoutError::NoLibrariesFound.into());
        }

        Ok(packages)
    }
}

/// Flatten the per-package library lists into one ordered list, preserving
/// dependency declaration order and each manifest's own product order.
pub fn all_libraries(packages: &[ResolvedPackage]) -> Vec<Library> {
    packages
        .iter()
        .flat_map(|package| {
            package.libraries.iter().map(|name| Library {
                name: name.clone(),
                package_name: package.canonical_name.clone(),
            })
        })
        .collect()
}
