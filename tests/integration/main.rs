//! Integration tests for Tandem

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn tandem() -> Command {
        let mut cmd = cargo_bin_cmd!("tandem");
        for var in [
            "GITHUB_RUN_ID",
            "ImageOS",
            "TANDEM_API_URL",
            "TANDEM_API_TOKEN",
            "TANDEM_CACHE_DIR",
            "TANDEM_CONFIG",
        ] {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Config probing with `echo` so no runtime needs to be installed
    fn write_config(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("config.toml");
        let content = format!(
            r#"
[cache]
dir = "{cache}"
work_dir = "{work}"

[probe]
command = "echo"
args = ["v20.11.1"]
"#,
            cache = dir.join("cache").display(),
            work = dir.display()
        );
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn help_displays() {
        tandem()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("share one remote session"));
    }

    #[test]
    fn version_displays() {
        tandem()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("tandem"));
    }

    #[test]
    fn config_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        tandem()
            .args(["--config", path.to_str().unwrap(), "config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("custom.toml"));
    }

    #[test]
    fn config_show() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.toml");
        tandem()
            .args(["--config", path.to_str().unwrap(), "config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[readiness]"));
    }

    #[test]
    fn config_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        tandem()
            .args(["--config", path.to_str().unwrap(), "config", "init"])
            .assert()
            .success();
        tandem()
            .args(["--config", path.to_str().unwrap(), "config", "init"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[readiness]\ninterval_ms = 0\n").unwrap();
        tandem()
            .args(["--config", path.to_str().unwrap(), "config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("interval_ms must be greater than zero"));
    }

    #[test]
    fn session_commands_require_run_identity() {
        tandem()
            .args(["key"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--run-id"));
    }

    #[cfg(unix)]
    #[test]
    fn key_from_environment() {
        let dir = TempDir::new().unwrap();
        let config = write_config(dir.path());
        tandem()
            .args(["--config", config.to_str().unwrap(), "key"])
            .env("GITHUB_RUN_ID", "314")
            .env("ImageOS", "ubuntu22")
            .assert()
            .success()
            .stdout(predicate::str::diff("sessionId-314-ubuntu22-v20.11.1\n"));
    }

    #[test]
    fn start_without_api_url_fails_with_hint() {
        tandem()
            .args(["start", "--run-id", "1", "--os-image", "ubuntu22"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("API URL not configured"))
            .stderr(predicate::str::contains("TANDEM_API_URL"));
    }

    #[cfg(unix)]
    #[test]
    fn resume_without_record_reports_no_session() {
        let dir = TempDir::new().unwrap();
        let config = write_config(dir.path());
        tandem()
            .args([
                "--config",
                config.to_str().unwrap(),
                "resume",
                "--run-id",
                "7",
                "--os-image",
                "ubuntu22",
                "--api-url",
                "http://127.0.0.1:9",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("No session found"));
    }

    #[cfg(unix)]
    #[test]
    fn resume_require_fails_without_record() {
        let dir = TempDir::new().unwrap();
        let config = write_config(dir.path());
        tandem()
            .args([
                "--config",
                config.to_str().unwrap(),
                "resume",
                "--require",
                "--run-id",
                "7",
                "--os-image",
                "ubuntu22",
                "--api-url",
                "http://127.0.0.1:9",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No session id recorded"));
    }

    #[test]
    fn completions_generate() {
        tandem()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("tandem"));
    }
}
