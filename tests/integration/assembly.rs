//! Happy-path assembly tests: the generated manifest, playground,
//! workspace, and book artifacts, plus the toolchain invocation sequence.

use anyhow::Result;

use crate::common::{TestProject, dump_json};

#[test]
fn test_basic_assembly_produces_all_artifacts() -> Result<()> {
    let project = TestProject::new()?;
    project.add_package("DemoKit", &dump_json("DemoKit", &[("DemoKit", true)]))?;

    let output = project.run_tryout(&["https://example.com/pkgs/DemoKit", "--skip-open"])?;
    assert!(output.success, "tryout failed: {}", output.all_output());

    let root = project.project_path("Tryout-Playground");
    assert!(root.join("Package.swift").is_file());
    assert!(
        root.join("Tryout-Playground.xcworkspace")
            .join("contents.xcworkspacedata")
            .is_file()
    );
    assert!(
        root.join("MyPlayground.playground")
            .join("Contents.swift")
            .is_file()
    );
    assert!(
        root.join("MyPlayground.playground")
            .join("contents.xcplayground")
            .is_file()
    );
    Ok(())
}

#[test]
fn test_manifest_carries_scaffold_and_both_dependency_passes() -> Result<()> {
    let project = TestProject::new()?;
    project.add_package("DemoKit", &dump_json("DemoKit", &[("DemoKit", true)]))?;

    let output = project.run_tryout(&["https://example.com/pkgs/DemoKit", "--skip-open"])?;
    assert!(output.success, "tryout failed: {}", output.all_output());

    let manifest = project.read_manifest("Tryout-Playground")?;

    // Scaffold written by `swift package init` survives both passes.
    assert!(manifest.contains("import PackageDescription"));
    assert!(manifest.contains("let package = Package("));

    // Pass 1 declares the dependency without a name, pass 2 with the
    // canonical name, and pass 2 comes later so it supersedes.
    let pass1 = ".package(url: \"https://example.com/pkgs/DemoKit\", from: \"0.0.0\")";
    let pass2 =
        ".package(name: \"DemoKit\", url: \"https://example.com/pkgs/DemoKit\", from: \"0.0.0\")";
    let pass1_at = manifest.find(pass1).expect("pass 1 clause missing");
    let pass2_at = manifest.find(pass2).expect("pass 2 clause missing");
    assert!(pass1_at < pass2_at);

    // Target wiring comes after the second dependency pass.
    let targets_at = manifest
        .find("package.targets = [")
        .expect("targets override missing");
    assert!(pass2_at < targets_at);
    assert!(manifest.contains(".target(name: \"Tryout-Playground\""));
    assert!(manifest.contains("\"DemoKit\""));
    Ok(())
}

#[test]
fn test_toolchain_invocations_run_in_pipeline_order() -> Result<()> {
    let project = TestProject::new()?;
    project.add_package("DemoKit", &dump_json("DemoKit", &[("DemoKit", true)]))?;

    let output = project.run_tryout(&["https://example.com/pkgs/DemoKit", "--skip-open"])?;
    assert!(output.success, "tryout failed: {}", output.all_output());

    let calls = project.swift_calls();
    let subcommands: Vec<&str> = calls
        .iter()
        .map(|line| line.split_once(' ').map_or("", |(_, args)| args))
        .collect();
    assert_eq!(
        subcommands,
        vec![
            "package init --type library",
            "package resolve",
            "package dump-package",
            "package generate-xcodeproj",
            "build",
        ]
    );
    Ok(())
}

#[test]
fn test_progress_messages_arrive_in_phase_order() -> Result<()> {
    let project = TestProject::new()?;
    project.add_package("DemoKit", &dump_json("DemoKit", &[("DemoKit", true)]))?;

    let output = project.run_tryout(&["https://example.com/pkgs/DemoKit", "--skip-open"])?;
    assert!(output.success, "tryout failed: {}", output.all_output());

    let positions: Vec<usize> = [
        "Creating project",
        "Declared 1 dependency",
        "Resolving dependencies",
        "Found libraries: DemoKit",
        "Generating project and building dependencies",
        "Open the project with: xed ",
        "Project ready at",
    ]
    .iter()
    .map(|needle| {
        output
            .stdout
            .find(needle)
            .unwrap_or_else(|| panic!("missing '{needle}' in: {}", output.stdout))
    })
    .collect();
    assert!(
        positions.windows(2).all(|pair| pair[0] < pair[1]),
        "phase messages out of order: {}",
        output.stdout
    );
    Ok(())
}

#[test]
fn test_library_from_differently_named_package_uses_product_clause() -> Result<()> {
    let project = TestProject::new()?;
    project.add_package("swift-nio", &dump_json("swift-nio", &[("NIO", true)]))?;

    let output =
        project.run_tryout(&["https://github.com/apple/swift-nio", "--skip-open"])?;
    assert!(output.success, "tryout failed: {}", output.all_output());

    let manifest = project.read_manifest("Tryout-Playground")?;
    assert!(manifest.contains(".product(name: \"NIO\", package: \"swift-nio\")"));

    let entry = project.read_playground_entry("Tryout-Playground")?;
    assert!(entry.contains("import NIO\n"));
    Ok(())
}

#[test]
fn test_playground_imports_follow_declaration_order() -> Result<()> {
    let project = TestProject::new()?;
    project.add_package("AlphaKit", &dump_json("AlphaKit", &[("AlphaKit", true)]))?;
    project.add_package("BetaKit", &dump_json("BetaKit", &[("BetaKit", true)]))?;

    let output = project.run_tryout(&[
        "https://example.com/pkgs/BetaKit",
        "https://example.com/pkgs/AlphaKit",
        "--skip-open",
    ])?;
    assert!(output.success, "tryout failed: {}", output.all_output());

    let entry = project.read_playground_entry("Tryout-Playground")?;
    let beta_at = entry.find("import BetaKit").expect("BetaKit import missing");
    let alpha_at = entry
        .find("import AlphaKit")
        .expect("AlphaKit import missing");
    assert!(beta_at < alpha_at, "imports out of declaration order");
    Ok(())
}

#[test]
fn test_libs_flag_filters_and_orders_imports() -> Result<()> {
    let project = TestProject::new()?;
    project.add_package(
        "MultiKit",
        &dump_json("MultiKit", &[("CoreKit", true), ("ExtraKit", true), ("tool", false)]),
    )?;

    let output = project.run_tryout(&[
        "https://example.com/pkgs/MultiKit",
        "--libs",
        "ExtraKit",
        "--skip-open",
    ])?;
    assert!(output.success, "tryout failed: {}", output.all_output());

    // The playground surfaces only the selected library.
    let entry = project.read_playground_entry("Tryout-Playground")?;
    assert!(entry.contains("import ExtraKit"));
    assert!(!entry.contains("import CoreKit"));

    // The target still links every discovered library; executables are
    // never wired in.
    let manifest = project.read_manifest("Tryout-Playground")?;
    assert!(manifest.contains("\"CoreKit\""));
    assert!(manifest.contains("\"ExtraKit\""));
    assert!(!manifest.contains("\"tool\""));
    Ok(())
}

#[test]
fn test_platform_flag_is_stamped_into_playground_metadata() -> Result<()> {
    let project = TestProject::new()?;
    project.add_package("DemoKit", &dump_json("DemoKit", &[("DemoKit", true)]))?;

    let output = project.run_tryout(&[
        "https://example.com/pkgs/DemoKit",
        "--platform",
        "ios",
        "--skip-open",
    ])?;
    assert!(output.success, "tryout failed: {}", output.all_output());

    let metadata = std::fs::read_to_string(
        project
            .project_path("Tryout-Playground")
            .join("MyPlayground.playground")
            .join("contents.xcplayground"),
    )?;
    assert!(metadata.contains("target-platform='ios'"));
    Ok(())
}

#[test]
fn test_skip_open_prints_advisory_instead_of_launching() -> Result<()> {
    let project = TestProject::new()?;
    project.add_package("DemoKit", &dump_json("DemoKit", &[("DemoKit", true)]))?;

    let output = project.run_tryout(&["https://example.com/pkgs/DemoKit", "--skip-open"])?;
    assert!(output.success, "tryout failed: {}", output.all_output());

    assert!(project.xed_calls().is_empty());
    assert!(
        output.stdout.contains("xed "),
        "missing open advisory in: {}",
        output.stdout
    );
    Ok(())
}

#[test]
fn test_open_launches_workspace_via_xed() -> Result<()> {
    let project = TestProject::new()?;
    project.add_package("DemoKit", &dump_json("DemoKit", &[("DemoKit", true)]))?;

    let output = project.run_tryout(&["https://example.com/pkgs/DemoKit"])?;
    assert!(output.success, "tryout failed: {}", output.all_output());

    let calls = project.xed_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].contains("Tryout-Playground.xcworkspace"));
    Ok(())
}

#[test]
fn test_custom_name_and_output_dir() -> Result<()> {
    let project = TestProject::new()?;
    project.add_package("DemoKit", &dump_json("DemoKit", &[("DemoKit", true)]))?;
    std::fs::create_dir_all(project.work_path().join("sandbox"))?;

    let output = project.run_tryout(&[
        "https://example.com/pkgs/DemoKit",
        "--name",
        "Scratch",
        "--outputdir",
        "sandbox",
        "--skip-open",
    ])?;
    assert!(output.success, "tryout failed: {}", output.all_output());

    let root = project.work_path().join("sandbox").join("Scratch");
    assert!(root.join("Package.swift").is_file());
    let manifest = std::fs::read_to_string(root.join("Package.swift"))?;
    assert!(manifest.contains(".target(name: \"Scratch\""));
    assert!(root.join("Scratch.xcworkspace").is_dir());
    Ok(())
}

#[test]
fn test_forced_rerun_produces_identical_manifest() -> Result<()> {
    let project = TestProject::new()?;
    project.add_package("DemoKit", &dump_json("DemoKit", &[("DemoKit", true)]))?;

    let first = project.run_tryout(&["https://example.com/pkgs/DemoKit", "--skip-open"])?;
    assert!(first.success, "first run failed: {}", first.all_output());
    let manifest_before = project.read_manifest("Tryout-Playground")?;

    let second = project.run_tryout(&[
        "https://example.com/pkgs/DemoKit",
        "--skip-open",
        "--force",
    ])?;
    assert!(second.success, "second run failed: {}", second.all_output());
    let manifest_after = project.read_manifest("Tryout-Playground")?;

    assert_eq!(manifest_before, manifest_after);
    Ok(())
}

#[test]
fn test_force_replaces_existing_project() -> Result<()> {
    let project = TestProject::new()?;
    project.add_package("DemoKit", &dump_json("DemoKit", &[("DemoKit", true)]))?;

    let existing = project.project_path("Tryout-Playground");
    std::fs::create_dir_all(&existing)?;
    std::fs::write(existing.join("stale.txt"), "left over")?;

    let output = project.run_tryout(&[
        "https://example.com/pkgs/DemoKit",
        "--force",
        "--skip-open",
    ])?;
    assert!(output.success, "tryout failed: {}", output.all_output());

    assert!(!existing.join("stale.txt").exists());
    assert!(existing.join("Package.swift").is_file());
    Ok(())
}

#[test]
fn test_book_copies_dependency_sources() -> Result<()> {
    let project = TestProject::new()?;
    project.add_package("DemoKit", &dump_json("DemoKit", &[("DemoKit", true)]))?;
    project.add_checkout_file(
        "DemoKit",
        "Sources/DemoKit/DemoKit.swift",
        "public struct Demo {}\n",
    )?;
    project.add_checkout_file(
        "DemoKit",
        "Sources/DemoKit/Internal/Helpers.swift",
        "struct Helpers {}\n",
    )?;

    let output = project.run_tryout(&[
        "https://example.com/pkgs/DemoKit",
        "--book",
        "--skip-open",
    ])?;
    assert!(output.success, "tryout failed: {}", output.all_output());

    let book = project.project_path("Tryout-Playground").join("Book");
    assert!(book.join("DemoKit/DemoKit/DemoKit.swift").is_file());
    assert!(book.join("DemoKit/DemoKit/Internal/Helpers.swift").is_file());
    Ok(())
}

#[test]
fn test_checkout_lookup_is_case_insensitive() -> Result<()> {
    let project = TestProject::new()?;
    // The resolver normalized the checkout directory to lowercase.
    project.add_package("demokit", &dump_json("DemoKit", &[("DemoKit", true)]))?;

    let output = project.run_tryout(&["https://example.com/pkgs/DemoKit", "--skip-open"])?;
    assert!(output.success, "tryout failed: {}", output.all_output());

    let manifest = project.read_manifest("Tryout-Playground")?;
    assert!(manifest.contains("name: \"DemoKit\""));
    Ok(())
}
