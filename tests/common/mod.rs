//! Common test utilities for tryout integration tests.
//!
//! The suite never touches a real Swift toolchain: each [`TestProject`]
//! materializes stub `swift` and `xed` shell scripts and points the binary
//! at them through `TRYOUT_SWIFT_BIN` / `TRYOUT_XED_BIN`. The stubs log
//! every invocation, scaffold a realistic `Package.swift` on `package
//! init`, copy pre-registered checkout fixtures into `.build/checkouts` on
//! `package resolve`, and answer `package dump-package` with canned JSON
//! keyed by the checkout directory name.

// Not every helper is used by every test file.
#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// The scaffold the stub `swift package init` writes, mirroring the shape
/// (header comment, import, `let package =` declaration) of the real tool.
pub const SCAFFOLD_MANIFEST: &str = r#"// swift-tools-version:5.9
import PackageDescription

let package = Package(
    name: "Scaffold",
    targets: [
        .target(name: "Scaffold"),
    ]
)
"#;

/// Output of one `tryout` invocation.
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

impl CommandOutput {
    /// Combined stdout and stderr, for assertions that don't care which
    /// stream a message landed on.
    pub fn all_output(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

/// Isolated environment for driving the `tryout` binary against a stub
/// toolchain.
pub struct TestProject {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    work_dir: PathBuf,
    bin_dir: PathBuf,
    fixtures_dir: PathBuf,
    dumps_dir: PathBuf,
    swift_log: PathBuf,
    xed_log: PathBuf,
}

impl TestProject {
    /// Create a fresh environment with stub `swift` and `xed` binaries.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        let work_dir = root.join("work");
        let bin_dir = root.join("bin");
        let fixtures_dir = root.join("checkout-fixtures");
        let dumps_dir = root.join("dumps");

        fs::create_dir_all(&work_dir)?;
        fs::create_dir_all(&bin_dir)?;
        fs::create_dir_all(&fixtures_dir)?;
        fs::create_dir_all(&dumps_dir)?;

        let project = Self {
            swift_log: root.join("swift-calls.log"),
            xed_log: root.join("xed-calls.log"),
            _temp_dir: temp_dir,
            work_dir,
            bin_dir,
            fixtures_dir,
            dumps_dir,
        };
        project.write_stub_swift()?;
        project.write_stub_xed()?;
        Ok(project)
    }

    /// Directory `tryout` runs in; generated projects land under it.
    pub fn work_path(&self) -> &Path {
        &self.work_dir
    }

    /// The directory a project named `name` is generated into.
    pub fn project_path(&self, name: &str) -> PathBuf {
        self.work_dir.join(name)
    }

    /// Register a package the stub resolver will "fetch": a checkout
    /// directory named `checkout_name` plus the `dump-package` JSON the stub
    /// answers with for that checkout.
    pub fn add_package(&self, checkout_name: &str, dump_json: &str) -> Result<()> {
        let checkout = self.fixtures_dir.join(checkout_name);
        fs::create_dir_all(&checkout)?;
        fs::write(
            self.dumps_dir.join(format!("{checkout_name}.json")),
            dump_json,
        )?;
        Ok(())
    }

    /// Add a source file to a registered package's checkout fixture, e.g.
    /// `Sources/DemoKit/DemoKit.swift`.
    pub fn add_checkout_file(
        &self,
        checkout_name: &str,
        relative_path: &str,
        content: &str,
    ) -> Result<()> {
        let path = self.fixtures_dir.join(checkout_name).join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)
            .with_context(|| format!("failed to write fixture file {}", path.display()))?;
        Ok(())
    }

    /// Run `tryout` with `args` in the work directory.
    pub fn run_tryout(&self, args: &[&str]) -> Result<CommandOutput> {
        let binary = env!("CARGO_BIN_EXE_tryout");
        let output = Command::new(binary)
            .args(args)
            .current_dir(&self.work_dir)
            .env("TRYOUT_SWIFT_BIN", self.bin_dir.join("swift"))
            .env("TRYOUT_XED_BIN", self.bin_dir.join("xed"))
            .env("TRYOUT_NO_PROGRESS", "1")
            .env("NO_COLOR", "1")
            .output()
            .context("Failed to run tryout command")?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        })
    }

    /// Every stub `swift` invocation so far, one per line, as
    /// `<cwd> <args...>`.
    pub fn swift_calls(&self) -> Vec<String> {
        read_log(&self.swift_log)
    }

    /// Every stub `xed` invocation so far.
    pub fn xed_calls(&self) -> Vec<String> {
        read_log(&self.xed_log)
    }

    /// The generated manifest of the project named `name`.
    pub fn read_manifest(&self, name: &str) -> Result<String> {
        let path = self.project_path(name).join("Package.swift");
        fs::read_to_string(&path)
            .with_context(|| format!("failed to read manifest at {}", path.display()))
    }

    /// The playground entry source of the project named `name`.
    pub fn read_playground_entry(&self, name: &str) -> Result<String> {
        let path = self
            .project_path(name)
            .join("MyPlayground.playground")
            .join("Contents.swift");
        fs::read_to_string(&path)
            .with_context(|| format!("failed to read playground entry at {}", path.display()))
    }

    fn write_stub_swift(&self) -> Result<()> {
        let scaffold_path = self._temp_dir.path().join("scaffold.swift");
        fs::write(&scaffold_path, SCAFFOLD_MANIFEST)?;
        let script = format!(
            r#"#!/bin/sh
echo "$PWD $*" >> "{log}"
case "$1 $2" in
    "package init")
        cp "{scaffold}" Package.swift
        ;;
    "package resolve")
        mkdir -p .build/checkouts
        if [ -n "$(ls -A "{fixtures}" 2>/dev/null)" ]; then
            cp -R "{fixtures}"/. .build/checkouts/
        fi
        ;;
    "package dump-package")
        dump="{dumps}/$(basename "$PWD").json"
        if [ -f "$dump" ]; then
            cat "$dump"
        else
            echo "error: no manifest dump registered for $PWD" >&2
            exit 1
        fi
        ;;
esac
exit 0
"#,
            log = self.swift_log.display(),
            scaffold = scaffold_path.display(),
            fixtures = self.fixtures_dir.display(),
            dumps = self.dumps_dir.display(),
        );
        write_executable(&self.bin_dir.join("swift"), &script)
    }

    fn write_stub_xed(&self) -> Result<()> {
        let script = format!(
            "#!/bin/sh\necho \"$*\" >> \"{}\"\nexit 0\n",
            self.xed_log.display()
        );
        write_executable(&self.bin_dir.join("xed"), &script)
    }
}

fn write_executable(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

fn read_log(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .map(|content| content.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Build a `dump-package` JSON document with the given canonical name and
/// products. Each product is `(name, is_library)`.
pub fn dump_json(name: &str, products: &[(&str, bool)]) -> String {
    let products: Vec<serde_json::Value> = products
        .iter()
        .map(|(product, is_library)| {
            let kind = if *is_library {
                serde_json::json!({ "library": ["automatic"] })
            } else {
                serde_json::json!({ "executable": null })
            };
            serde_json::json!({ "name": product, "type": kind })
        })
        .collect();
    serde_json::json!({
        "name": name,
        "products": products,
        "targets": [],
    })
    .to_string()
}
