//! Dependency references supplied on the command line.
//!
//! A dependency token is a package source (Git URL or local path) optionally
//! followed by `@` and a version requirement:
//!
//! ```text
//! https://github.com/apple/swift-argument-parser            -> latest
//! https://github.com/apple/swift-argument-parser@1.3.0      -> from: 1.3.0
//! https://github.com/apple/swift-argument-parser@exact:1.3.0
//! https://github.com/foo/bar@1.0.0..<2.0.0
//! https://github.com/foo/bar@branch:main
//! https://github.com/foo/bar@revision:7c2a1b9
//! ../local/checkout                                          -> pinned by path
//! ```
//!
//! Parsing is pure: the only side effect is an existence check for local
//! path sources. Parsed values are immutable for the rest of the pipeline.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use semver::Version;

use crate::core::TryoutError;

/// Where a package's sources come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A remote Git repository (https, git, ssh, or scp-style `git@host:path`).
    Url(String),
    /// An existing local package directory, stored as an absolute path so the
    /// rendered manifest clause stays valid from inside the project directory.
    Path(PathBuf),
}

impl Source {
    /// True for local path sources.
    pub const fn is_path(&self) -> bool {
        matches!(self, Self::Path(_))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Version requirement attached to a dependency.
///
/// `Latest` is the default when no requirement is given; it renders as
/// `from: "0.0.0"`, which delegates "pick the newest" to the external
/// resolver instead of implementing version selection here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// No explicit requirement; resolve to the newest available version.
    Latest,
    /// Up-to-next-major starting at the given version (`from:`).
    From(Version),
    /// Exactly the given version.
    Exact(Version),
    /// Half-open range `lower..<upper`.
    Range {
        /// Inclusive lower bound
        lower: Version,
        /// Exclusive upper bound
        upper: Version,
    },
    /// Closed range `lower...upper`.
    ClosedRange {
        /// Inclusive lower bound
        lower: Version,
        /// Inclusive upper bound
        upper: Version,
    },
    /// Follow a branch.
    Branch(String),
    /// Pin to a specific revision (commit hash).
    Revision(String),
}

impl Requirement {
    /// Parse the text after the `@` delimiter.
    ///
    /// Returns `None` when the text is not a recognizable requirement; the
    /// caller decides whether that is an error (URL sources) or just part of
    /// the source itself.
    pub fn parse(text: &str) -> Option<Self> {
        if let Some(rest) = text.strip_prefix("exact:") {
            return parse_version(rest).map(Self::Exact);
        }
        if let Some(rest) = text.strip_prefix("from:") {
            return parse_version(rest).map(Self::From);
        }
        if let Some(rest) = text.strip_prefix("branch:") {
            return (!rest.is_empty()).then(|| Self::Branch(rest.to_string()));
        }
        if let Some(rest) = text.strip_prefix("revision:") {
            return (!rest.is_empty()).then(|| Self::Revision(rest.to_string()));
        }
        if let Some((lower, upper)) = text.split_once("..<") {
            return Some(Self::Range {
                lower: parse_version(lower)?,
                upper: parse_version(upper)?,
            });
        }
        if let Some((lower, upper)) = text.split_once("...") {
            return Some(Self::ClosedRange {
                lower: parse_version(lower)?,
                upper: parse_version(upper)?,
            });
        }
        parse_version(text).map(Self::From)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => write!(f, "latest"),
            Self::From(v) => write!(f, "from {v}"),
            Self::Exact(v) => write!(f, "exactly {v}"),
            Self::Range {
                lower,
                upper,
            } => write!(f, "{lower}..<{upper}"),
            Self::ClosedRange {
                lower,
                upper,
            } => write!(f, "{lower}...{upper}"),
            Self::Branch(name) => write!(f, "branch {name}"),
            Self::Revision(rev) => write!(f, "revision {rev}"),
        }
    }
}

/// Accept versions with or without a leading `v` and pad partial versions
/// (`1`, `1.2`) the way SwiftPM's shorthand does.
fn parse_version(text: &str) -> Option<Version> {
    let text = text.trim().trim_start_matches('v');
    if text.is_empty() {
        return None;
    }
    if let Ok(version) = Version::parse(text) {
        return Some(version);
    }
    let dots = text.chars().filter(|&c| c == '.').count();
    let padded = match dots {
        0 => format!("{text}.0.0"),
        1 => format!("{text}.0"),
        _ => return None,
    };
    Version::parse(&padded).ok()
}

/// A user-declared package reference: source plus version requirement.
///
/// Immutable once parsed; consumed throughout the pipeline, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Where the package comes from
    pub source: Source,
    /// Which versions are acceptable
    pub requirement: Requirement,
}

impl Dependency {
    /// Parse a single command-line token into a dependency.
    pub fn parse(token: &str) -> Result<Self, TryoutError> {
        let (raw_source, requirement) = split_requirement(token);

        if let Some(url) = recognize_url(raw_source) {
            // An @-suffix on a URL source must be a valid requirement;
            // swallowing it would silently change what gets resolved.
            if requirement.is_none() && raw_source.len() != token.len() {
                return Err(TryoutError::InvalidDependencyFormat {
                    spec: token.to_string(),
                    reason: "unrecognized version requirement after '@'".to_string(),
                });
            }
            return Ok(Self {
                source: Source::Url(url),
                requirement: requirement.unwrap_or(Requirement::Latest),
            });
        }

        // Not a URL: the whole token (including any '@') may name a path.
        if let Some(path) = recognize_path(token) {
            return Ok(Self {
                source: Source::Path(path),
                requirement: Requirement::Latest,
            });
        }
        if let Some(path) = recognize_path(raw_source) {
            // Path with an @version suffix: the checkout is pinned by the
            // path itself, so the requirement is ignored.
            tracing::debug!(
                "ignoring version requirement on local path dependency: {token}"
            );
            return Ok(Self {
                source: Source::Path(path),
                requirement: Requirement::Latest,
            });
        }

        Err(TryoutError::InvalidDependencyFormat {
            spec: token.to_string(),
            reason: "not a recognizable URL and not an existing local path".to_string(),
        })
    }

    /// Parse all positional tokens, folding an adjacent bare requirement into
    /// the preceding dependency (`tryout <url> 1.2.3`).
    pub fn parse_all(tokens: &[String]) -> Result<Vec<Self>, TryoutError> {
        if tokens.is_empty() {
            return Err(TryoutError::MissingDependency);
        }

        let mut deps = Vec::with_capacity(tokens.len());
        let mut iter = tokens.iter().peekable();
        while let Some(token) = iter.next() {
            let mut dep = Self::parse(token)?;
            if dep.requirement == Requirement::Latest && !dep.source.is_path() {
                let folded = iter.peek().and_then(|next| {
                    if recognize_url(next).is_some() || recognize_path(next).is_some() {
                        None
                    } else {
                        Requirement::parse(next)
                    }
                });
                if let Some(req) = folded {
                    dep.requirement = req;
                    iter.next();
                }
            }
            deps.push(dep);
        }
        Ok(deps)
    }

    /// The package name inferable from the trailing source component,
    /// `.git` stripped.
    ///
    /// Only a hint: used to locate the checkout directory after resolution.
    /// The canonical name always comes from the package's own manifest.
    pub fn package_hint(&self) -> String {
        let trailing = match &self.source {
            Source::Url(url) => url
                .trim_end_matches('/')
                .rsplit(['/', ':'])
                .next()
                .unwrap_or(url)
                .to_string(),
            Source::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };
        trailing.trim_end_matches(".git").to_string()
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.source, self.requirement)
    }
}

/// Split a token at the requirement delimiter.
///
/// An `@` can also appear in a URL's authority part (`ssh://git@host/...`,
/// `https://token@host/...`) or in scp-style `git@host:path` form. The
/// requirement delimiter can only follow the final path component, so only
/// an `@` after the last `/` is considered; for slash-free tokens the
/// `git@` user part is skipped explicitly.
fn split_requirement(token: &str) -> (&str, Option<Requirement>) {
    let search_from = match token.rfind('/') {
        Some(idx) => idx + 1,
        None if token.starts_with("git@") => 4,
        None => 0,
    };
    match token[search_from..].rfind('@') {
        Some(rel_idx) => {
            let idx = search_from + rel_idx;
            let (source, rest) = (&token[..idx], &token[idx + 1..]);
            match Requirement::parse(rest) {
                Some(req) => (source, Some(req)),
                None => (source, None),
            }
        }
        None => (token, None),
    }
}

/// Recognize remote Git URL forms. Returns the normalized URL string.
fn recognize_url(text: &str) -> Option<String> {
    let has_scheme = ["https://", "http://", "git://", "ssh://"]
        .iter()
        .any(|scheme| text.starts_with(scheme));
    let is_scp_form = text.starts_with("git@") && text.contains(':');
    (has_scheme || is_scp_form).then(|| text.to_string())
}

/// Recognize an existing local directory, with `~` expansion. Returns the
/// absolute path.
fn recognize_path(text: &str) -> Option<PathBuf> {
    if text.is_empty() {
        return None;
    }
    let expanded = shellexpand::tilde(text);
    let path = Path::new(expanded.as_ref());
    if !path.is_dir() {
        return None;
    }
    std::fs::canonicalize(path).ok()
}
