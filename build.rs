// Copies static/ (page plus any wasm-pack output in static/pkg) to dist/.
use std::path::Path;

use fs_extra::dir::{copy, create, CopyOptions};

fn main() {
    println!("cargo:rerun-if-changed=static");

    let static_dir = Path::new("static");
    if !static_dir.exists() {
        return;
    }

    let out_dir = Path::new("dist");
    // Start from an empty dist/.
    if let Err(err) = create(out_dir, true) {
        println!("cargo:warning=could not reset dist/: {err}");
        return;
    }

    let options = CopyOptions::new().content_only(true);
    if let Err(err) = copy(static_dir, out_dir, &options) {
        println!("cargo:warning=could not copy static/ to dist/: {err}");
    }
}
