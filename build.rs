use std::process::Command;

fn main() {
    let described = Command::new("git")
        .args(["describe", "--tags", "--always"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| {
            let s = String::from_utf8(o.stdout).ok()?;
            let s = s.trim();
            Some(s.strip_prefix('v').unwrap_or(s).to_string())
        });

    let version = described.unwrap_or_else(|| env!("CARGO_PKG_VERSION").into());
    println!("cargo:rustc-env=GIT_VERSION={version}");
}
