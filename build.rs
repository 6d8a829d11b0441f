//! # yuzu.shot - Tauri build script
//!
//! Runs before the crate is compiled so Tauri can generate its context
//! (window/security config from `tauri.conf.json`, capability manifests,
//! icons and the Windows resource file).

fn main() {
  tauri_build::build()
}
