// Test intent: verifies the parallel threshold environment overrides.
#![cfg(all(feature = "parallel", feature = "std"))]

use std::process::Command;

#[test]
fn print_threshold() {
    // The harness prints `test print_threshold ... ` without a newline first.
    println!("\nthreshold={}", fswt::parallel_threshold());
}

fn threshold_with_env(key: &str, value: &str) -> usize {
    let exe = std::env::current_exe().unwrap();
    let output = Command::new(&exe)
        .env_remove("FSWT_PAR_THRESHOLD")
        .env_remove("FSWT_PAR_PER_CORE_WORK")
        .env(key, value)
        .args(["--exact", "print_threshold", "--nocapture"])
        .output()
        .expect("run threshold test");
    let stdout = String::from_utf8(output.stdout).unwrap();
    stdout
        .lines()
        .find_map(|l| l.trim().strip_prefix("threshold=")?.parse().ok())
        .unwrap_or_else(|| panic!("no threshold in child output:\n{}", stdout))
}

#[test]
fn env_threshold_is_used_verbatim() {
    assert_eq!(threshold_with_env("FSWT_PAR_THRESHOLD", "32"), 32);
    assert_eq!(threshold_with_env("FSWT_PAR_THRESHOLD", "64"), 64);
}

#[test]
fn env_per_core_work_scales_with_cores() {
    let t = threshold_with_env("FSWT_PAR_PER_CORE_WORK", "100");
    assert_eq!(t, 100 * num_cpus::get().max(1));
}

#[test]
fn programmatic_override_wins() {
    fswt::set_parallel_threshold(12345);
    assert_eq!(fswt::parallel_threshold(), 12345);
    fswt::set_parallel_threshold(0);
    assert_ne!(fswt::parallel_threshold(), 0);
}
