use std::path::PathBuf;
use std::process::Command;

// Packaged builds (tarballs, distro recipes) have no .git; let them pass the SHA in.
const OVERRIDE_VAR: &str = "STUDYPLAN_BUILD_SHA";

fn main() {
    println!("cargo:rerun-if-env-changed={OVERRIDE_VAR}");

    let manifest_dir =
        PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string()));
    let repo_root = manifest_dir.join("..");

    let git_dir = repo_root.join(".git");
    if git_dir.exists() {
        println!("cargo:rerun-if-changed={}", git_dir.join("HEAD").display());
        println!("cargo:rerun-if-changed={}", git_dir.join("index").display());
    }

    let sha = std::env::var(OVERRIDE_VAR)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| git_sha(&repo_root))
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env={OVERRIDE_VAR}={sha}");
}

/// Short HEAD SHA, suffixed with "-dirty" when tracked files have local edits.
fn git_sha(repo_root: &std::path::Path) -> Option<String> {
    let git = |args: &[&str]| {
        Command::new("git")
            .arg("-C")
            .arg(repo_root)
            .args(args)
            .output()
            .ok()
            .filter(|o| o.status.success())
    };

    let head = git(&["rev-parse", "--short", "HEAD"])?;
    let sha = String::from_utf8_lossy(&head.stdout).trim().to_string();
    if sha.is_empty() {
        return None;
    }

    let dirty = git(&["status", "--porcelain", "--untracked-files=no"])
        .is_some_and(|o| !o.stdout.is_empty());
    Some(if dirty { format!("{sha}-dirty") } else { sha })
}
