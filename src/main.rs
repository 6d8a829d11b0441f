//! # yuzu.shot - 桌面端入口
//!
//! 仅负责启动应用；初始化逻辑位于 `lib.rs`，桌面端和移动端入口共用。

// Release 构建下不在 Windows 上弹出额外的控制台窗口，请勿删除！
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
  app_lib::run();
}
