//! CLI integration tests for buildgroup.
//!
//! These tests run the binary against small on-disk projects.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

const MANIFEST: &str = r#"
prune = ["topwin"]

[[subbuild]]
name = "components"
dir = "components"
variant-dir = "build/components"

[[subbuild.group]]
name = "rtgui"
src = ["rtgui/common/*.c", "rtgui/server/topwin.c"]
depend = ["RT_USING_RTGUI"]
options = { include-paths = ["rtgui/include"] }

[[subbuild.group]]
name = "lua"
src = ["lua/lua.c"]
depend = "RT_USING_LUA"

[[subbuild]]
name = "win32"
dir = "win32"

[[subbuild.group]]
name = "kernel"
src = ["thread.c", "timer.c"]
"#;

/// Get the buildgroup binary command, isolated from the user's global config.
fn buildgroup(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("buildgroup").unwrap();
    cmd.env("HOME", home).env_remove("BUILDGROUP_MANIFEST");
    cmd
}

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "").unwrap();
}

/// Create a project with two sub-builds in a fresh temporary directory.
fn create_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    for file in [
        "components/rtgui/common/dc.c",
        "components/rtgui/common/font.c",
        "components/rtgui/server/topwin.c",
        "components/lua/lua.c",
        "win32/thread.c",
        "win32/timer.c",
    ] {
        touch(&tmp.path().join(file));
    }
    fs::write(tmp.path().join("Groups.toml"), MANIFEST).unwrap();
    tmp
}

fn plan_json(tmp: &TempDir, extra: &[&str]) -> serde_json::Value {
    let output = buildgroup(tmp.path())
        .args(["plan", "--json"])
        .args(extra)
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

fn object_outputs(plan: &serde_json::Value) -> Vec<String> {
    plan["objects"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["output"].as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// buildgroup relpath
// ============================================================================

#[cfg(unix)]
#[test]
fn test_relpath_preserves_destination_case() {
    let tmp = TempDir::new().unwrap();
    buildgroup(tmp.path())
        .args(["relpath", "/Proj/build", "/proj/Src/main.c"])
        .assert()
        .success()
        .stdout("../Src/main.c\n");
}

#[test]
fn test_relpath_across_drives_returns_destination() {
    let tmp = TempDir::new().unwrap();
    buildgroup(tmp.path())
        .args(["relpath", "C:/proj", "D:/other"])
        .assert()
        .success()
        .stdout("D:/other\n");
}

#[test]
fn test_relpath_identity() {
    let tmp = TempDir::new().unwrap();
    buildgroup(tmp.path())
        .args(["relpath", "/a/b", "/a/b/"])
        .assert()
        .success()
        .stdout(".\n");
}

// ============================================================================
// buildgroup depend
// ============================================================================

#[test]
fn test_depend_default_denylist() {
    let tmp = TempDir::new().unwrap();

    buildgroup(tmp.path())
        .args(["depend", "RT_USING_RTGUI"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("supported"));

    buildgroup(tmp.path())
        .args(["depend", "RT_USING_RTGUI", "RT_USING_LUA"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("rejected by RT_USING_LUA"));
}

#[test]
fn test_depend_project_config_replaces_denylist() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join(".buildgroup")).unwrap();
    fs::write(
        tmp.path().join(".buildgroup/config.toml"),
        "[features]\nunsupported = [\"RT_USING_DFS\"]\n",
    )
    .unwrap();

    buildgroup(tmp.path())
        .args(["depend", "RT_USING_LUA"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("supported"));

    buildgroup(tmp.path())
        .args(["depend", "RT_USING_DFS"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("unsupported"));

    // The disabled subsystem stays disabled
    buildgroup(tmp.path())
        .args(["depend", "RT_USING_FTK"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("unsupported"));
}

// ============================================================================
// buildgroup plan
// ============================================================================

#[test]
fn test_plan_summary() {
    let tmp = create_project();

    buildgroup(tmp.path())
        .arg("plan")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Groups (2):"))
        .stdout(predicate::str::contains("rtgui [3 sources]"))
        .stdout(predicate::str::contains("kernel [2 sources]"))
        .stdout(predicate::str::contains("dc.obj"))
        .stdout(predicate::str::contains("topwin.obj").not())
        .stdout(predicate::str::contains("lua.obj").not());
}

#[cfg(unix)]
#[test]
fn test_plan_json() {
    let tmp = create_project();
    let plan = plan_json(&tmp, &[]);

    assert_eq!(
        object_outputs(&plan),
        vec![
            "build/components/rtgui/common/dc.obj",
            "build/components/rtgui/common/font.obj",
            "build/win32/thread.obj",
            "build/win32/timer.obj",
        ]
    );

    let env = &plan["environment"];
    assert_eq!(env["include_paths"][0], "rtgui/include");
    assert!(env["library_paths"][0]
        .as_str()
        .unwrap()
        .ends_with("/win32/SDL/lib"));
    assert_eq!(env["libraries"][0], "SDL");
}

#[test]
fn test_plan_prune_flag_removes_one_object_per_use() {
    let tmp = create_project();

    let plan = plan_json(&tmp, &["--prune", "common/"]);
    let outputs = object_outputs(&plan);
    // Only the first match goes
    assert_eq!(outputs.len(), 3);
    assert!(!outputs.iter().any(|o| o.ends_with("dc.obj")));
    assert!(outputs.iter().any(|o| o.ends_with("font.obj")));

    let plan = plan_json(&tmp, &["--prune", "timer", "--prune", "timer"]);
    assert_eq!(object_outputs(&plan).len(), 3);
}

#[test]
fn test_plan_legacy_toolchain_library_dir() {
    let tmp = create_project();
    fs::create_dir_all(tmp.path().join(".buildgroup")).unwrap();
    fs::write(
        tmp.path().join(".buildgroup/config.toml"),
        "[toolchain]\nfamily = \"msvc\"\nversion = \"6.0\"\n",
    )
    .unwrap();

    let plan = plan_json(&tmp, &[]);
    assert!(plan["environment"]["library_paths"][0]
        .as_str()
        .unwrap()
        .ends_with("/win32/SDL/lib_vc6"));
}

#[test]
fn test_plan_gcc_objects() {
    let tmp = create_project();
    fs::create_dir_all(tmp.path().join(".buildgroup")).unwrap();
    fs::write(
        tmp.path().join(".buildgroup/config.toml"),
        "[toolchain]\nfamily = \"gcc\"\n",
    )
    .unwrap();

    let plan = plan_json(&tmp, &[]);
    assert_eq!(plan["toolchain"], "gcc");
    assert!(object_outputs(&plan).iter().all(|o| o.ends_with(".o")));
}

#[test]
fn test_plan_emit_compile_commands() {
    let tmp = create_project();

    buildgroup(tmp.path())
        .args(["plan", "--emit-compile-commands"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let contents = fs::read_to_string(tmp.path().join("compile_commands.json")).unwrap();
    let commands: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(commands.as_array().unwrap().len(), 4);
    assert!(!contents.contains("topwin"));
}

#[test]
fn test_plan_with_manifest_flag() {
    let tmp = create_project();
    let other = TempDir::new().unwrap();

    buildgroup(tmp.path())
        .args(["plan", "--manifest"])
        .arg(tmp.path().join("Groups.toml"))
        .current_dir(other.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Groups (2):"));
}

#[test]
fn test_plan_fails_without_manifest() {
    let tmp = TempDir::new().unwrap();

    buildgroup(tmp.path())
        .arg("plan")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no manifest found"));
}

#[test]
fn test_plan_fails_on_missing_source() {
    let tmp = create_project();
    fs::remove_file(tmp.path().join("win32/timer.c")).unwrap();

    buildgroup(tmp.path())
        .arg("plan")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("source file not found"))
        .stderr(predicate::str::contains("timer.c"));
}

#[test]
fn test_plan_ignores_missing_source_of_rejected_group() {
    let tmp = create_project();
    fs::remove_file(tmp.path().join("components/lua/lua.c")).unwrap();

    buildgroup(tmp.path())
        .arg("plan")
        .current_dir(tmp.path())
        .assert()
        .success();
}

#[test]
fn test_plan_fails_on_pattern_without_matches() {
    let tmp = create_project();
    fs::remove_file(tmp.path().join("components/rtgui/common/dc.c")).unwrap();
    fs::remove_file(tmp.path().join("components/rtgui/common/font.c")).unwrap();

    buildgroup(tmp.path())
        .args(["--no-color", "plan"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "error: source pattern `rtgui/common/*.c` matched no source files",
        ));
}

#[test]
fn test_plan_reports_unmatched_prune_and_rejected_groups() {
    let tmp = create_project();

    buildgroup(tmp.path())
        .args(["--no-color", "plan", "--prune", "no_such_object"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "warning: no object matches `no_such_object`",
        ))
        .stderr(predicate::str::contains(
            "note: 1 of 3 groups rejected by the feature denylist",
        ))
        .stdout(predicate::str::contains("Objects (4):"));
}

// ============================================================================
// buildgroup completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    buildgroup(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("buildgroup"));
}
