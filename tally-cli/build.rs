use std::env;
use std::path::Path;
use std::process::Command;

/// Short commit for `tally --version`. A packager can pin it with
/// `TALLY_BUILD_SHA`; otherwise ask git, falling back to "unknown".
fn build_sha(workspace: &Path) -> String {
    if let Ok(pinned) = env::var("TALLY_BUILD_SHA") {
        if !pinned.trim().is_empty() {
            return pinned.trim().to_string();
        }
    }

    let Ok(output) = Command::new("git")
        .arg("-C")
        .arg(workspace)
        .args(["describe", "--always", "--dirty", "--abbrev=8"])
        .output()
    else {
        return "unknown".to_string();
    };

    match String::from_utf8(output.stdout) {
        Ok(s) if output.status.success() && !s.trim().is_empty() => s.trim().to_string(),
        _ => "unknown".to_string(),
    }
}

fn main() {
    let manifest = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let workspace = Path::new(&manifest).join("..");

    println!("cargo:rerun-if-env-changed=TALLY_BUILD_SHA");
    println!("cargo:rerun-if-changed={}", workspace.join(".git/HEAD").display());
    println!("cargo:rustc-env=TALLY_BUILD_SHA={}", build_sha(&workspace));
}
