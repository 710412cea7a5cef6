use std::path::PathBuf;

/// Per-process scratch path under the system temp dir.
pub fn scratch(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("easel-{}-{}", std::process::id(), name));
    p
}
