//! Derived filesystem layout of a generated project.

use std::path::{Path, PathBuf};

/// The set of paths a project occupies, computed deterministically from the
/// output directory and the project name. Never persisted; recomputed on
/// demand.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    project_dir: PathBuf,
    name: String,
}

impl ProjectLayout {
    /// Name of the playground directory inside the project.
    pub const PLAYGROUND_NAME: &'static str = "MyPlayground.playground";
    /// Name of the book bundle directory inside the project.
    pub const BOOK_DIR_NAME: &'static str = "Book";

    /// Compute the layout for `name` under `output_dir`.
    pub fn new(output_dir: &Path, name: &str) -> Self {
        Self {
            project_dir: output_dir.join(name),
            name: name.to_string(),
        }
    }

    /// Project name (also the package and target name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root directory of the generated project.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// The generated Xcode project file.
    pub fn xcodeproj(&self) -> PathBuf {
        self.project_dir.join(format!("{}.xcodeproj", self.name))
    }

    /// The workspace tying the playground and the package container together.
    pub fn workspace(&self) -> PathBuf {
        self.project_dir.join(format!("{}.xcworkspace", self.name))
    }

    /// The playground directory.
    pub fn playground(&self) -> PathBuf {
        self.project_dir.join(Self::PLAYGROUND_NAME)
    }

    /// The playground's entry source file.
    pub fn playground_entry(&self) -> PathBuf {
        self.playground().join("Contents.swift")
    }

    /// The playground's metadata file (stamped with the target platform).
    pub fn playground_metadata(&self) -> PathBuf {
        self.playground().join("contents.xcplayground")
    }

    /// The book bundle directory.
    pub fn book_dir(&self) -> PathBuf {
        self.project_dir.join(Self::BOOK_DIR_NAME)
    }
}
