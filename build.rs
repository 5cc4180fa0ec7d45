use std::{env, process::Command};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");

    let hash = run(&["git", "rev-parse", "--short", "HEAD"]).unwrap_or_else(unknown);
    let status = run(&["git", "status", "--porcelain"])
        .map(|out| if out.is_empty() { "clean" } else { "dirty" }.to_string())
        .unwrap_or_else(unknown);
    let rustc = run(&["rustc", "--version"]).unwrap_or_else(unknown);
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

    emit("HASH", &hash);
    emit("STATUS", &status);
    emit("TIMESTAMP", &timestamp);
    emit("TARGET", &env::var("TARGET").unwrap_or_else(|_| unknown()));
    emit("PROFILE", &env::var("PROFILE").unwrap_or_else(|_| unknown()));
    emit("RUSTC", &rustc);
}

fn emit(key: &str, value: &str) {
    println!("cargo:rustc-env=CANTEEN_BUILD_{key}={value}");
}

fn unknown() -> String {
    "unknown".to_string()
}

/// Trimmed stdout of a successful command.
fn run(argv: &[&str]) -> Option<String> {
    let (program, args) = argv.split_first()?;
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|text| text.trim().to_string())
}
