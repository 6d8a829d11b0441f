//! # yuzu.shot - Tauri 应用核心初始化模块
//!
//! yuzu.shot（App Store 截图制作工具）的桌面宿主，负责 Web 界面之外的原生能力：
//! - 窗口管理（主窗口、关于、偏好设置），每种窗口只有一个实例
//! - 应用菜单栏
//! - 原生对话框和截图导入
//! - 与主窗口存储之间的设置通道
//! - 截图目录扫描和 AI 提供商注册表
//!
//! ## 模块结构
//! - `commands/` - Tauri command 处理函数（IPC 接口层）
//! - `models/` - 与前端交换的数据模型
//! - `services/` - 与 Tauri 解耦的核心逻辑
//! - `shell/` - 窗口、菜单、外部链接
//! - `utils/` - 路径工具函数

mod commands;
mod models;
mod services;
mod shell;
mod utils;

use tauri::{Manager, WindowEvent};

use services::dialog_gate::DialogGate;
use services::settings_bridge::SettingsBridge;
use services::window_registry::WindowRole;
use shell::menu::ZoomLevel;
use shell::windows::Windows;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
/// Tauri 应用启动函数
///
/// 注册插件和全局状态、安装菜单与窗口事件处理、注册所有 commands，
/// 在 `setup` 中创建主窗口，最后进入事件循环。
///
/// # Panics
/// Tauri 应用构建失败（配置或上下文无效）时 panic。
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_fs::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_opener::init())
        .manage(Windows::new())
        .manage(SettingsBridge::new())
        .manage(DialogGate::new())
        .manage(ZoomLevel::default())
        .menu(shell::menu::build_menu)
        .on_menu_event(|app, event| shell::menu::handle_menu_event(app, event.id().as_ref()))
        .on_window_event(|window, event| {
            if let WindowEvent::Destroyed = event {
                shell::windows::release_window(window.app_handle(), window.label());
            }
        })
        .invoke_handler(tauri::generate_handler![
            // 对话框 commands
            commands::dialogs::show_open_dialog,
            commands::dialogs::show_save_dialog,
            commands::dialogs::import_screenshots,
            // 设置和注册表 commands
            commands::settings::get_settings,
            commands::settings::save_settings,
            commands::settings::settings_bridge_respond,
            commands::settings::get_llm_providers,
            commands::settings::get_model_options,
            commands::settings::get_config,
            // 截图 commands
            commands::screenshots::get_latest_screenshots,
            commands::screenshots::scan_for_screenshots,
            // 窗口和外部链接 commands
            commands::windows::open_about_window,
            commands::windows::open_preferences_window,
            commands::windows::open_external_url,
            commands::windows::get_platform,
        ])
        .setup(|app| {
            // 仅在开发调试模式下启用日志插件
            if cfg!(debug_assertions) {
                app.handle().plugin(
                    tauri_plugin_log::Builder::default()
                        .level(log::LevelFilter::Info)
                        .build(),
                )?;
            }
            shell::windows::open_window(app.handle(), WindowRole::Main)?;
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(shell::windows::handle_run_event);
}
