//! # 窗口和外部链接 Tauri Commands
//!
//! 前端调用的窗口与链接入口，与菜单项走同一套处理逻辑：
//! - `open_about_window` / `open_preferences_window` - 创建或聚焦窗口
//! - `open_external_url` - 用系统默认程序打开 http(s) 链接
//! - `get_platform` - 当前操作系统名称

use serde::Serialize;
use tauri::AppHandle;

use crate::services::window_registry::WindowRole;
use crate::shell::{external, windows};

/// `open_external_url` 的结果：`{ ok, reason? }`
#[derive(Debug, Clone, Serialize)]
pub struct OpenUrlResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<Result<(), String>> for OpenUrlResult {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self {
                ok: true,
                reason: None,
            },
            Err(reason) => Self {
                ok: false,
                reason: Some(reason),
            },
        }
    }
}

/// 显示关于窗口，已打开时聚焦
///
/// # 错误
/// 窗口创建或聚焦失败时返回错误信息
#[tauri::command]
pub async fn open_about_window(app: AppHandle) -> Result<(), String> {
    windows::open_window(&app, WindowRole::About).map(|_| ())
}

/// 显示偏好设置窗口，已打开时聚焦
///
/// # 错误
/// 窗口创建或聚焦失败时返回错误信息
#[tauri::command]
pub async fn open_preferences_window(app: AppHandle) -> Result<(), String> {
    windows::open_window(&app, WindowRole::Preferences).map(|_| ())
}

/// 用系统默认程序打开 http(s) 链接
///
/// # 参数
/// - `url` - 要打开的链接，只接受 http/https
///
/// # 返回值
/// `{ ok: true }`，或带失败原因的 `{ ok: false, reason }`
#[tauri::command]
pub fn open_external_url(app: AppHandle, url: String) -> OpenUrlResult {
    let result = external::open_external(&app, &url);
    if let Err(e) = &result {
        log::warn!("open_external_url rejected: {}", e);
    }
    result.into()
}

/// 当前操作系统名称（`macos`、`windows`、`linux` 等）
#[tauri::command]
pub fn get_platform() -> Result<String, String> {
    Ok(std::env::consts::OS.to_string())
}
