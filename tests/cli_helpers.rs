#![allow(dead_code)]

use anyhow::{bail, Result};
use assert_cmd::cargo;
use serde_json::Value;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn data_file(home: &TempDir) -> PathBuf {
    home.path().join(".carteira").join("carteira.json")
}

/// Command isolated inside `home`: no user config, no user data file.
pub fn base_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("carteira"));
    cmd.env("HOME", home.path());
    cmd.env("XDG_CONFIG_HOME", home.path().join(".config"));
    cmd.env_remove("CARTEIRA_FILE");
    cmd.env_remove("RUST_LOG");
    cmd.arg("--no-color");
    cmd
}

pub fn write_config(home: &TempDir, content: &str) {
    let dir = home.path().join(".config").join("carteira");
    std::fs::create_dir_all(&dir).expect("failed to create config dir");
    std::fs::write(dir.join("config.toml"), content).expect("failed to write config");
}

pub fn run_cmd(home: &TempDir, args: &[&str]) -> Result<Output> {
    let mut cmd = base_cmd(home);
    cmd.args(args);
    let output = cmd.output()?;
    if !output.status.success() {
        bail!(
            "command failed: {:?}\nstdout: {}\nstderr: {}",
            args,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(output)
}

pub fn run_cmd_json(home: &TempDir, args: &[&str]) -> Result<Value> {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    let output = run_cmd(home, &full)?;
    let stdout = String::from_utf8(output.stdout)?;
    Ok(serde_json::from_str(&stdout)?)
}

pub fn add_treasury(home: &TempDir, name: &str, principal: &str, rate: &str) -> Result<u64> {
    let created = run_cmd_json(
        home,
        &[
            "positions",
            "add",
            "treasury",
            "--name",
            name,
            "--principal",
            principal,
            "--rate",
            rate,
            "--purchase",
            "2023-01-01",
        ],
    )?;
    created["id"]
        .as_u64()
        .ok_or_else(|| anyhow::anyhow!("missing id in {}", created))
}
