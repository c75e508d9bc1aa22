//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `studyhall_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("studyhall_core version={}", studyhall_core::core_version());
    println!(
        "studyhall_core schema_version={}",
        studyhall_core::db::migrations::latest_version()
    );
}
