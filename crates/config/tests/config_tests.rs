//! Tests for the `autosplit-config` loader: default handling, file
//! discovery, and environment overrides.

use std::fs;
use std::path::PathBuf;

use serial_test::serial;
use tempfile::TempDir;

use autosplit_config::{load, AppConfig};

const ENV_VARS_TO_RESET: &[&str] = &[
    "AUTOSPLIT_CONFIG",
    "AUTOSPLIT__HTTP__ADDRESS",
    "AUTOSPLIT__HTTP__PORT",
    "AUTOSPLIT__DATABASE__URL",
    "AUTOSPLIT__DATABASE__MAX_CONNECTIONS",
    "AUTOSPLIT__REALTIME__SESSION_QUEUE_CAPACITY",
    "AUTOSPLIT__REALTIME__SUMMARY_RETRY_DELAY_MS",
];

struct TestContext {
    vars: Vec<(String, Option<String>)>,
    original_dir: Option<PathBuf>,
}

impl TestContext {
    fn new() -> Self {
        let mut ctx = Self {
            vars: Vec::new(),
            original_dir: None,
        };
        for key in ENV_VARS_TO_RESET {
            ctx.remove_var(key);
        }
        ctx
    }

    fn set_var(&mut self, key: &str, value: impl AsRef<str>) {
        let previous = std::env::var(key).ok();
        std::env::set_var(key, value.as_ref());
        self.vars.push((key.to_string(), previous));
    }

    fn remove_var(&mut self, key: &str) {
        let previous = std::env::var(key).ok();
        std::env::remove_var(key);
        self.vars.push((key.to_string(), previous));
    }

    fn change_dir(&mut self, dir: &std::path::Path) {
        if self.original_dir.is_none() {
            self.original_dir = std::env::current_dir().ok();
        }
        std::env::set_current_dir(dir).expect("change working directory");
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        if let Some(dir) = self.original_dir.take() {
            let _ = std::env::set_current_dir(dir);
        }
        for (key, previous) in self.vars.drain(..).rev() {
            match previous {
                Some(value) => std::env::set_var(&key, value),
                None => std::env::remove_var(&key),
            }
        }
    }
}

#[test]
#[serial]
fn loads_defaults_without_file_or_env() {
    let _ctx = TestContext::new();

    let config = load().expect("defaults should load");
    let expected = AppConfig::default();

    assert_eq!(config.http.address, expected.http.address);
    assert_eq!(config.http.port, expected.http.port);
    assert_eq!(config.database.url, expected.database.url);
    assert_eq!(
        config.realtime.session_queue_capacity,
        expected.realtime.session_queue_capacity
    );
    assert_eq!(config.realtime.summary_retry_delay_ms, 200);
}

#[test]
#[serial]
fn environment_overrides_take_precedence() {
    let mut ctx = TestContext::new();
    ctx.set_var("AUTOSPLIT__HTTP__PORT", "9091");
    ctx.set_var("AUTOSPLIT__DATABASE__URL", "sqlite://override.db");
    ctx.set_var("AUTOSPLIT__REALTIME__SESSION_QUEUE_CAPACITY", "8");

    let config = load().expect("config should load with env overrides");

    assert_eq!(config.http.port, 9091);
    assert_eq!(config.database.url, "sqlite://override.db");
    assert_eq!(config.realtime.session_queue_capacity, 8);
}

#[test]
#[serial]
fn explicit_config_file_is_loaded() {
    let mut ctx = TestContext::new();

    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("autosplit.toml");
    fs::write(
        &path,
        r#"
[http]
address = "0.0.0.0"
port = 6000

[realtime]
summary_retry_delay_ms = 50
"#,
    )
    .expect("write config file");

    ctx.set_var("AUTOSPLIT_CONFIG", path.to_string_lossy());

    let config = load().expect("config file should load");

    assert_eq!(config.http.address, "0.0.0.0");
    assert_eq!(config.http.port, 6000);
    assert_eq!(config.realtime.summary_retry_delay_ms, 50);
    // Sections absent from the file keep their defaults.
    assert_eq!(config.database.max_connections, 10);
}

#[test]
#[serial]
fn config_file_discovered_in_working_directory() {
    let mut ctx = TestContext::new();

    let dir = TempDir::new().expect("create temp dir");
    fs::write(
        dir.path().join("autosplit.toml"),
        "[http]\nport = 7777\n",
    )
    .expect("write config file");

    ctx.change_dir(dir.path());

    let config = load().expect("discovered file should load");
    assert_eq!(config.http.port, 7777);
}
