// SPDX-License-Identifier: MPL-2.0

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");
    println!("cargo::rerun-if-env-changed=CLOAK_CONTROL_VERSION");

    // Packagers can pin the version string
    let version = std::env::var("CLOAK_CONTROL_VERSION")
        .ok()
        .or_else(describe)
        .unwrap_or_else(|| std::env::var("CARGO_PKG_VERSION").unwrap_or_default());

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// `git describe`, with the tag's `v` prefix dropped
///
/// "v0.2.0" stays "0.2.0"; "v0.2.0-3-gabc1234" becomes "0.2.0+3.abc1234".
fn describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--match", "v*"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let raw = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let raw = raw.strip_prefix('v').unwrap_or(&raw);

    let parts: Vec<&str> = raw.rsplitn(3, '-').collect();
    match parts.as_slice() {
        [hash, commits, base] if hash.starts_with('g') => {
            Some(format!("{}+{}.{}", base, commits, &hash[1..]))
        }
        _ => Some(raw.to_string()),
    }
}
