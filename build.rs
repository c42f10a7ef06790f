//! Embeds a monotonically increasing build number and a build timestamp
//! into the binary via environment variables.

use std::fs;

const COUNTER_FILE: &str = "build_number.txt";

fn next_build_number() -> u64 {
    let previous = fs::read_to_string(COUNTER_FILE)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(0);
    previous + 1
}

fn main() {
    println!("cargo:rerun-if-changed=src");

    let build = next_build_number();
    if let Err(e) = fs::write(COUNTER_FILE, build.to_string()) {
        println!("cargo:warning=could not persist build number: {}", e);
    }

    let stamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");

    println!("cargo:rustc-env=CALTRACK_BUILD_NUMBER={}", build);
    println!("cargo:rustc-env=CALTRACK_BUILD_TIMESTAMP={}", stamp);
    println!("cargo:warning=CalTrack build #{} ({})", build, stamp);
}
