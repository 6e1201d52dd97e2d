use anyhow::{bail, Result};
use std::env;
use std::process::Command;

/// Demos registered as `[[example]]`s in the root manifest.
pub const DEMOS: [&str; 3] = ["basic_usage", "image_subbands", "verbose_logging"];

/// Options derived from the host machine used to configure cargo commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub features: Vec<String>,
}

impl BuildConfig {
    /// Join features into a single string suitable for passing to cargo.
    pub fn features_arg(&self) -> Option<String> {
        if self.features.is_empty() {
            None
        } else {
            Some(self.features.join(" "))
        }
    }
}

/// Detect build configuration from the current machine and `FSWT_FEATURES`.
pub fn detect_config() -> BuildConfig {
    let extra = env::var("FSWT_FEATURES").unwrap_or_default();
    compute_config(detect_nproc(), &extra)
}

fn detect_nproc() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Compute a [`BuildConfig`] from supplied inputs. This is separated for testing.
pub fn compute_config(nproc: usize, extra: &str) -> BuildConfig {
    let mut features: Vec<String> = Vec::new();
    if nproc > 1 {
        features.push("parallel".into());
    }
    for feat in extra.split([' ', ',']) {
        let feat = feat.trim();
        if !feat.is_empty() && !features.iter().any(|f| f == feat) {
            features.push(feat.to_string());
        }
    }
    BuildConfig { features }
}

fn cargo_with_features(subcommand: &str, cfg: &BuildConfig) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.arg(subcommand);
    if let Some(f) = cfg.features_arg() {
        cmd.arg("--features").arg(f);
    }
    cmd
}

pub fn build_command(cfg: &BuildConfig) -> Command {
    cargo_with_features("build", cfg)
}

pub fn test_command(cfg: &BuildConfig) -> Command {
    cargo_with_features("test", cfg)
}

/// Tests with every optional feature, including the in-crate property tests.
pub fn test_all_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["test", "--all-features"]);
    cmd
}

pub fn clippy_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["clippy", "--all-targets", "--all-features"]);
    cmd
}

pub fn fmt_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["fmt", "--all"]);
    cmd
}

pub fn bench_command(cfg: &BuildConfig) -> Command {
    let mut cmd = cargo_with_features("bench", cfg);
    cmd.args(["--bench", "bench_dwt"]);
    cmd
}

pub fn demo_command(name: &str, cfg: &BuildConfig) -> Result<Command> {
    if !DEMOS.contains(&name) {
        bail!("unknown demo '{}', expected one of {:?}", name, DEMOS);
    }
    let mut cfg = cfg.clone();
    if name == "verbose_logging" && !cfg.features.iter().any(|f| f == "verbose-logging") {
        cfg.features.push("verbose-logging".into());
    }
    let mut cmd = cargo_with_features("run", &cfg);
    cmd.args(["--release", "--example", name]);
    Ok(cmd)
}

/// Run `cmd` to completion, failing if it exits unsuccessfully.
pub fn run(mut cmd: Command) -> Result<()> {
    let status = cmd.status()?;
    if !status.success() {
        bail!("{:?} exited with {}", cmd, status);
    }
    Ok(())
}
