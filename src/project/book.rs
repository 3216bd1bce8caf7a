//! Book bundle: a portable copy of the dependency sources.
//!
//! A "book" mirrors each resolved package's `Sources/<module>` directories
//! under `<project>/Book/<package>/<module>/`, so the modules can be
//! browsed or dropped into another project without the full workspace.
//! Files are copied verbatim; nothing is parsed.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::core::TryoutError;
use crate::introspect::ResolvedPackage;

/// Copy every package's source modules into `book_dir`.
///
/// Returns the number of modules copied. Zero extractable modules across
/// all packages fails with `NoSourcesFound`: a book with nothing in it is
/// a user-visible mistake, not an empty success.
pub fn write_book(book_dir: &Path, packages: &[ResolvedPackage]) -> Result<usize> {
    let mut modules_copied = 0;

    for package in packages {
        let sources = package.checkout_path.join("Sources");
        if !sources.is_dir() {
            tracing::debug!(
                "package '{}' has no Sources directory, skipping",
                package.canonical_name
            );
            continue;
        }

        let entries = fs::read_dir(&sources)
            .with_context(|| format!("failed to read {}", sources.display()))?;
        for entry in entries {
            let module_dir = entry?.path();
            if !module_dir.is_dir() {
                continue;
            }
            let module_name = module_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let destination = book_dir.join(&package.canonical_name).join(&module_name);
            copy_tree(&module_dir, &destination)?;
            modules_copied += 1;
            tracing::debug!(
                "copied module '{}' from '{}'",
                module_name,
                package.canonical_name
            );
        }
    }

    if modules_copied == 0 {
        return Err(TryoutError::NoSourcesFound.into());
    }

    Ok(modules_copied)
}

/// Recursively copy a directory tree.
fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    for entry in WalkDir::new(from) {
        let entry = entry.with_context(|| format!("failed to walk {}", from.display()))?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .expect("walkdir yields paths under its root");
        let target = to.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("failed to create {}", target.display()))?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            fs::copy(entry.path(), &target).with_context(|| {
                format!("failed to copy {} to {}", entry.path().display(), target.display())
            })?;
        }
    }
    Ok(())
}
