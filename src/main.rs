//! Host-side helper: `cargo run` builds the WASM bundle into `static/pkg`
//! and serves `static/` on a local port for previewing the backdrops.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::io::Result<()> {
    use std::process::{Command, Stdio};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("building WASM pkg");
    match Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()
    {
        Ok(status) if status.success() => {}
        Ok(status) => {
            log::error!("wasm-pack exited with {status}");
            std::process::exit(1);
        }
        Err(err) => {
            log::warn!("wasm-pack not found ({err}); serving whatever is already in static/pkg");
        }
    }

    log::info!("serving static/ at http://127.0.0.1:8000");
    let status = Command::new("python3")
        .args(["-m", "http.server", "8000", "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .status()?;
    if !status.success() {
        log::error!("http server exited with {status}");
    }
    Ok(())
}

// The wasm build has no use for the helper.
#[cfg(target_arch = "wasm32")]
fn main() {}
