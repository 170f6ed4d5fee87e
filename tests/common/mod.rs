#![allow(dead_code)]
//! Shared test utilities for integration tests.
//!
//! - [`FakeRunner`]: records invocations and simulates `cargo`, `hdiutil`
//!   and `open` without spawning processes
//! - [`write_project`]: lays out a minimal project with a bundle template

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use release_bundler::bundler::{
    CommandRunner, PackageSettings, Result, Settings, SettingsBuilder, ToolInvocation, ToolOutput,
};

/// Content the fake compiler writes as the executable.
pub const PLACEHOLDER: &str = "#!/bin/sh\necho placeholder\n";

/// Command runner that never spawns a process.
///
/// On success `cargo` writes [`PLACEHOLDER`] to the configured executable
/// path and `hdiutil` creates its last argument as a file. Like cargo, an
/// executable that already holds the placeholder is left untouched.
#[derive(Debug, Default)]
pub struct FakeRunner {
    executable: PathBuf,
    exit_codes: HashMap<String, i32>,
    edits: HashMap<String, PathBuf>,
    calls: Mutex<Vec<ToolInvocation>>,
}

impl FakeRunner {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            ..Default::default()
        }
    }

    /// Make `program` exit with `code` without producing anything.
    pub fn exit_with(mut self, program: &str, code: i32) -> Self {
        self.exit_codes.insert(program.to_string(), code);
        self
    }

    /// Rewrite `path` while `program` is running.
    pub fn edit_during(mut self, program: &str, path: impl Into<PathBuf>) -> Self {
        self.edits.insert(program.to_string(), path.into());
        self
    }

    pub fn calls(&self) -> Vec<ToolInvocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Programs invoked so far, in order.
    pub fn programs(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.program).collect()
    }
}

impl CommandRunner for FakeRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput> {
        self.calls.lock().unwrap().push(invocation.clone());

        let code = self.exit_codes.get(&invocation.program).copied().unwrap_or(0);
        if code != 0 {
            return Ok(ToolOutput {
                exit_code: Some(code),
                stdout: String::new(),
                stderr: format!("{}: simulated failure\n", invocation.program),
            });
        }

        if let Some(path) = self.edits.get(&invocation.program) {
            // Step past coarse filesystem timestamps.
            std::thread::sleep(Duration::from_millis(20));
            write_file(path, "edited while the tool ran\n");
        }

        match invocation.program.as_str() {
            "cargo" => {
                if std::fs::read_to_string(&self.executable).ok().as_deref() != Some(PLACEHOLDER) {
                    write_file(&self.executable, PLACEHOLDER);
                }
            }
            "hdiutil" => {
                let dmg = invocation.args.last().expect("hdiutil output path");
                write_file(Path::new(dmg), "disk image");
            }
            _ => {}
        }

        Ok(ToolOutput::with_code(0))
    }
}

pub fn write_file(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Write a minimal `demo` project under `root`.
pub fn write_project(root: &Path) {
    write_file(
        &root.join("Cargo.toml"),
        "[package]\nname = \"demo\"\nversion = \"0.1.0\"\nedition = \"2024\"\n",
    );
    write_file(&root.join("src/main.rs"), "fn main() {}\n");
    write_file(
        &root.join("extra/osx/Demo.app/Contents/Info.plist"),
        "<plist><dict><key>CFBundleExecutable</key><string>demo</string></dict></plist>\n",
    );
    write_file(
        &root.join("extra/osx/Demo.app/Contents/Resources/demo.icns"),
        "icon",
    );
}

/// Settings for the project written by [`write_project`].
pub fn settings(root: &Path) -> Settings {
    SettingsBuilder::new()
        .manifest_path(root.join("Cargo.toml"))
        .package_settings(PackageSettings {
            product_name: "Demo".into(),
            binary_name: "demo".into(),
            version: "0.1.0".into(),
        })
        .build()
        .unwrap()
}
