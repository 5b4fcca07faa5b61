use std::process::Command;

fn main() {
    // Release builds from a tarball have no .git; packagers can pin the revision.
    println!("cargo:rerun-if-env-changed=IDFLAGS_BUILD_REV");
    println!("cargo:rerun-if-changed=../../.git/HEAD");

    let rev = std::env::var("IDFLAGS_BUILD_REV")
        .ok()
        .filter(|s| !s.is_empty())
        .or_else(git_short_rev)
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=GIT_COMMIT_HASH={rev}");

    let target = std::env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=TARGET={target}");
}

fn git_short_rev() -> Option<String> {
    let output = Command::new("git").args(["rev-parse", "--short=7", "HEAD"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout).ok().map(|s| s.trim().to_string())
}
