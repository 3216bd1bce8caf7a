//! tryout - try out Swift packages in an Xcode playground
//!
//! tryout takes one or more Swift package dependency references (URLs or
//! local paths, optionally with version requirements) and assembles a
//! ready-to-use Xcode project around them: a scaffolded package whose
//! manifest declares the dependencies, a target linked against every
//! library they provide, a generated `.xcodeproj`, a workspace, and a
//! playground that already imports the discovered libraries.
//!
//! # Pipeline Overview
//!
//! The assembly runs as a strict sequence of phases:
//!
//! 1. Parse dependency references ([`dependency`])
//! 2. Scaffold a package and write the dependency declarations into its
//!    manifest ([`manifest`])
//! 3. Run the external resolver to fetch checkouts ([`toolchain`])
//! 4. Introspect each checkout for its canonical package name and library
//!    products ([`introspect`])
//! 5. Re-declare the dependencies with canonical names, wire a target to
//!    the discovered libraries, generate the IDE project, and write the
//!    playground artifacts ([`project`])
//!
//! The manifest is only ever appended to: each pass adds a whole
//! `package.dependencies` or `package.targets` reassignment that supersedes
//! earlier ones, so manual edits between runs survive.
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line interface (one flat command, no subcommands)
//! - [`core`] - Error taxonomy and user-facing error presentation
//! - [`dependency`] - Dependency reference parsing (sources and requirements)
//! - [`manifest`] - Append-only manifest block rendering and writing
//! - [`toolchain`] - Subprocess gateway over `swift` and `xed`
//! - [`introspect`] - Package description decoding and library discovery
//! - [`project`] - Layout, pipeline orchestration, playground, book, progress
//!
//! # External Tools
//!
//! All package operations go through the `swift` binary (`package init`,
//! `package resolve`, `package dump-package`, `package generate-xcodeproj`,
//! `build`) and the workspace is opened with `xed`. Both binaries are
//! located via `PATH` and can be overridden with `TRYOUT_SWIFT_BIN` and
//! `TRYOUT_XED_BIN`.

pub mod cli;
pub mod core;
pub mod dependency;
pub mod introspect;
pub mod manifest;
pub mod project;
pub mod toolchain;
