//! Tests for the generate-conda-mirror-config binary
//!
//! These tests run the real binary against a stand-in resolver script and
//! check stdout, exit status, and the files left behind.

use std::os::unix::fs::PermissionsExt;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

use nix::sys::signal::{Signal, killpg};
use nix::unistd::Pid;

use conda_mirror_config::MirrorList;
use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_generate-conda-mirror-config");

const SCENARIO_CONFIG: &str =
    r#"{"PackageInfo":[{"name":"numpy","version":"1.24.0"},{"name":"requests","version":""}]}"#;

/// Write an executable script that ignores its arguments and prints `stdout`
fn fake_resolver(dir: &Path, stdout: &str, exit_code: i32) -> PathBuf {
    let path = dir.join("fake-conda");
    let script = format!("#!/bin/sh\ncat <<'EOF'\n{}\nEOF\nexit {}\n", stdout, exit_code);
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("package_config.json");
    std::fs::write(&path, content).unwrap();
    path
}

fn run_bin(args: &[&str]) -> Output {
    Command::new(BIN)
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to run binary")
}

#[test]
fn test_show_command_prints_and_exits_zero() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), SCENARIO_CONFIG);

    let output = run_bin(&[
        "--packageConfigPath",
        config.to_str().unwrap(),
        "--yamlOutputDirectoryPath",
        dir.path().to_str().unwrap(),
        "--show-command",
    ]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "run command: conda install --channel conda-forge --override-channel --json --dry-run numpy=1.24.0 requests"
    );
    assert!(!dir.path().join("noarch.yml").exists());
}

#[test]
fn test_execute_writes_lists_into_output_directory() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), SCENARIO_CONFIG);
    let resolver = fake_resolver(
        dir.path(),
        r#"{"actions":{"LINK":[{"platform":"noarch","name":"requests","version":"2.31.0","build_string":"pyhd3_0"},{"platform":"osx-arm64","name":"numpy","version":"1.24.0","build_string":"py310_0"}]}}"#,
        0,
    );
    let out = dir.path().join("mirror");
    std::fs::create_dir(&out).unwrap();

    let output = run_bin(&[
        "--packageConfigPath",
        config.to_str().unwrap(),
        "--yamlOutputDirectoryPath",
        out.to_str().unwrap(),
        "--resolver",
        resolver.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let noarch = MirrorList::load_from_file(out.join("noarch.yml")).unwrap();
    let arch = MirrorList::load_from_file(out.join("osx-arm64.yml")).unwrap();
    assert_eq!(noarch.whitelist[0].name, "requests");
    assert_eq!(arch.whitelist[0].build, "py310_0");
}

#[test]
fn test_resolver_exit_code_does_not_gate_success() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), SCENARIO_CONFIG);
    let resolver = fake_resolver(dir.path(), r#"{"actions":{"LINK":[]}}"#, 1);

    let output = run_bin(&[
        "--packageConfigPath",
        config.to_str().unwrap(),
        "--yamlOutputDirectoryPath",
        dir.path().to_str().unwrap(),
        "--resolver",
        resolver.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    let noarch = MirrorList::load_from_file(dir.path().join("noarch.yml")).unwrap();
    assert!(noarch.whitelist.is_empty());
}

#[test]
fn test_missing_package_info_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), r#"{"packages":[]}"#);

    let output = run_bin(&[
        "--packageConfigPath",
        config.to_str().unwrap(),
        "--yamlOutputDirectoryPath",
        dir.path().to_str().unwrap(),
    ]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("PackageInfo"));
    assert!(!dir.path().join("noarch.yml").exists());
    assert!(!dir.path().join("osx-arm64.yml").exists());
}

#[test]
fn test_non_json_resolver_output_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), SCENARIO_CONFIG);
    let resolver = fake_resolver(dir.path(), "Solving environment: failed", 1);

    let output = run_bin(&[
        "--packageConfigPath",
        config.to_str().unwrap(),
        "--yamlOutputDirectoryPath",
        dir.path().to_str().unwrap(),
        "--resolver",
        resolver.to_str().unwrap(),
    ]);

    assert!(!output.status.success());
    assert!(!dir.path().join("noarch.yml").exists());
}

/// Poll until `path` exists or `timeout` runs out
fn wait_for_file(path: &Path, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if path.exists() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    false
}

/// Poll until `path` has non-empty contents or `timeout` runs out
fn wait_for_contents(path: &Path, timeout: Duration) -> Option<String> {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if let Ok(contents) = std::fs::read_to_string(path) {
            if !contents.is_empty() {
                return Some(contents);
            }
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    None
}

#[test]
fn test_interrupt_reaches_resolver() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), SCENARIO_CONFIG);
    let ready = dir.path().join("ready");
    let received = dir.path().join("received");

    // Records the first signal it gets, then stops its own sleeper
    let resolver = dir.path().join("slow-conda");
    let script = format!(
        "#!/bin/sh\n\
         trap 'echo INT >> \"{received}\"; kill $pid 2>/dev/null; exit 130' INT\n\
         trap 'echo TERM >> \"{received}\"; kill $pid 2>/dev/null; exit 143' TERM\n\
         sleep 30 &\n\
         pid=$!\n\
         touch \"{ready}\"\n\
         wait $pid\n",
        received = received.display(),
        ready = ready.display(),
    );
    std::fs::write(&resolver, script).unwrap();
    std::fs::set_permissions(&resolver, std::fs::Permissions::from_mode(0o755)).unwrap();

    // Own process group, standing in for the terminal's foreground group
    let mut tool = Command::new(BIN)
        .args([
            "--packageConfigPath",
            config.to_str().unwrap(),
            "--yamlOutputDirectoryPath",
            dir.path().to_str().unwrap(),
            "--resolver",
            resolver.to_str().unwrap(),
        ])
        .env("RUST_LOG", "warn")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .process_group(0)
        .spawn()
        .expect("Failed to spawn binary");

    assert!(
        wait_for_file(&ready, Duration::from_secs(10)),
        "Resolver never started"
    );
    killpg(Pid::from_raw(tool.id() as i32), Signal::SIGINT).expect("killpg failed");

    let status = tool.wait().expect("Failed to wait for binary");
    assert!(!status.success());
    let recorded = wait_for_contents(&received, Duration::from_secs(10))
        .expect("Resolver recorded no signal");
    assert_eq!(recorded.lines().next(), Some("INT"));
    assert!(!dir.path().join("noarch.yml").exists());
}
