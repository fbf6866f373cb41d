//! Common test utilities and helpers
//!
//! Shared by the integration tests: a builder around the `ionic-push`
//! binary, an isolated config environment, and a one-shot HTTP server that
//! captures a single request.

#![allow(dead_code)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use tempfile::TempDir;

/// Test command builder for the ionic-push CLI
pub struct TestCommand {
    cmd: Command,
}

impl TestCommand {
    pub fn new() -> Self {
        let mut cmd = Command::cargo_bin("ionic-push").expect("Failed to find ionic-push binary");
        cmd.env_remove("IONIC_PUSH_KEY").env_remove("RUST_LOG");
        Self { cmd }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.cmd.arg(arg.as_ref());
        }
        self
    }

    pub fn arg<S: AsRef<str>>(mut self, arg: S) -> Self {
        self.cmd.arg(arg.as_ref());
        self
    }

    pub fn env<K, V>(mut self, key: K, val: V) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.cmd.env(key.as_ref(), val.as_ref());
        self
    }

    pub fn expect_success(mut self) -> TestAssertion {
        let assert = self.cmd.assert().success();
        TestAssertion { assert }
    }

    pub fn expect_failure(mut self) -> TestAssertion {
        let assert = self.cmd.assert().failure();
        TestAssertion { assert }
    }
}

impl Default for TestCommand {
    fn default() -> Self {
        Self::new()
    }
}

/// Assertion wrapper with convenient methods
pub struct TestAssertion {
    assert: assert_cmd::assert::Assert,
}

impl TestAssertion {
    pub fn stdout_contains<S: AsRef<str>>(self, text: S) -> Self {
        let assert = self.assert.stdout(predicate::str::contains(text.as_ref()));
        Self { assert }
    }

    pub fn stdout_not_contains<S: AsRef<str>>(self, text: S) -> Self {
        let assert = self
            .assert
            .stdout(predicate::str::contains(text.as_ref()).not());
        Self { assert }
    }

    pub fn stderr_contains<S: AsRef<str>>(self, text: S) -> Self {
        let assert = self.assert.stderr(predicate::str::contains(text.as_ref()));
        Self { assert }
    }

    pub fn done(self) -> assert_cmd::assert::Assert {
        self.assert
    }
}

/// Isolated project and global config directories
pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub home_dir: TempDir,
    pub config_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let home_dir = TempDir::new().expect("Failed to create temp home directory");
        let config_path = temp_dir.path().join(".ionic-push/config.toml");

        Self {
            temp_dir,
            home_dir,
            config_path,
        }
    }

    pub fn project_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Command bound to this environment's project and global directories
    pub fn command(&self) -> TestCommand {
        TestCommand::new()
            .env("IONIC_PUSH_HOME", self.home_dir.path().to_string_lossy())
            .arg("--project")
            .arg(self.project_path().to_string_lossy())
    }

    pub fn init_config(&self) -> TestAssertion {
        self.command().arg("init").expect_success()
    }

    pub fn set(&self, key: &str, value: &str) -> TestAssertion {
        self.command()
            .args(["config", "set", key, value])
            .expect_success()
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

/// A request captured by [`OneShotServer`]
#[derive(Debug)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    /// Header names are lowercased
    pub headers: HashMap<String, String>,
    pub body: String,
}

/// Accepts exactly one HTTP request and answers it with a fixed status
pub struct OneShotServer {
    pub url: String,
    handle: JoinHandle<CapturedRequest>,
}

impl OneShotServer {
    pub fn start(status: u16) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test server");
        let url = format!(
            "http://{}/push/notifications",
            listener.local_addr().expect("Failed to read local address")
        );

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("Failed to accept connection");
            let mut reader = BufReader::new(stream.try_clone().expect("Failed to clone stream"));

            let mut request_line = String::new();
            reader.read_line(&mut request_line).expect("Failed to read request line");
            let mut parts = request_line.split_whitespace();
            let method = parts.next().unwrap_or_default().to_string();
            let path = parts.next().unwrap_or_default().to_string();

            let mut headers = HashMap::new();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).expect("Failed to read header");
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
                }
            }

            let length = headers
                .get("content-length")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(0);
            let mut body = vec![0; length];
            reader.read_exact(&mut body).expect("Failed to read body");

            let response = format!(
                "HTTP/1.1 {status} Test\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            );
            stream
                .write_all(response.as_bytes())
                .expect("Failed to write response");
            stream.flush().expect("Failed to flush response");

            CapturedRequest {
                method,
                path,
                headers,
                body: String::from_utf8(body).expect("Body is not UTF-8"),
            }
        });

        Self { url, handle }
    }

    /// Wait for the request to be served and return it
    pub fn captured(self) -> CapturedRequest {
        self.handle.join().expect("Test server panicked")
    }
}

pub const EXPECTED_TOKEN_BODY: &str = r#"{"tokens":"device_token","profile":"my-security-profile","notification":{"message":"A message to your user","ios":{"badge":1,"sound":"ping.aiff"}}}"#;

pub const EXPECTED_EMAIL_BODY: &str = r#"{"emails":"device_token","profile":"my-security-profile","notification":{"message":"A message to your user","ios":{"badge":1,"sound":"ping.aiff"}}}"#;
