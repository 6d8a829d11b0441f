//! # 设置和配置 Tauri Commands
//!
//! - `get_settings` / `save_settings` - 读写主窗口存储中的 AI 设置（经设置通道）
//! - `settings_bridge_respond` - 前端对设置请求的应答
//! - `get_llm_providers` / `get_model_options` - 提供商注册表数据
//! - `get_config` - 工作目录下的 `dosio.config.json`

use serde_json::Value;
use tauri::{AppHandle, Emitter, State, WebviewWindow};

use crate::models::settings::{SaveSettingsResult, Settings, SettingsReply, SettingsRequest};
use crate::services::registry::{self, ModelOption, RegistrySnapshot};
use crate::services::settings_bridge::{SETTINGS_REQUEST_EVENT, SettingsBridge, SettingsTransport};
use crate::services::{config, window_registry::WindowRole};
use crate::shell::windows;
use crate::utils::path;

/// 以事件形式把设置请求投递给主窗口
struct MainWindowTransport {
    app: AppHandle,
}

impl SettingsTransport for MainWindowTransport {
    fn dispatch(&self, request: &SettingsRequest) -> Result<(), String> {
        // emit_to 对不存在的窗口不会报错，需要先确认主窗口存在
        if windows::main_window(&self.app).is_none() {
            return Err("main window is not open".to_string());
        }
        self.app
            .emit_to(WindowRole::Main.label(), SETTINGS_REQUEST_EVENT, request)
            .map_err(|e| format!("emit failed: {}", e))
    }
}

/// 读取 AI 设置记录
///
/// 不会返回错误：主窗口无法应答时返回兜底记录
/// （`provider: "anthropic"`，其余字段为空）。
///
/// # 参数
/// - `bridge` - Tauri managed state，设置通道
#[tauri::command]
pub async fn get_settings(
    app: AppHandle,
    bridge: State<'_, SettingsBridge>,
) -> Result<Settings, String> {
    let transport = MainWindowTransport { app };
    Ok(bridge.get_settings(&transport).await)
}

/// 保存 AI 设置记录
///
/// 缺失的字段按空字符串保存，读取时模型字段回落为默认模型。
///
/// # 参数
/// - `settings` - 要保存的设置记录，可只包含部分字段
/// - `bridge` - Tauri managed state，设置通道
///
/// # 返回值
/// `{ success: true }`；未知提供商或通道失败时为 `{ success: false, error }`
#[tauri::command]
pub async fn save_settings(
    app: AppHandle,
    settings: Settings,
    bridge: State<'_, SettingsBridge>,
) -> Result<SaveSettingsResult, String> {
    let transport = MainWindowTransport { app };
    Ok(bridge.save_settings(&transport, &settings).await)
}

/// 前端对 `settings-bridge://request` 事件的应答
///
/// # 参数
/// - `window` - 发起调用的窗口，只接受主窗口的应答
/// - `request_id` - 请求 id
/// - `reply` - 应答内容
///
/// # 返回值
/// 应答匹配到等待中的请求时返回 `true`
#[tauri::command]
pub fn settings_bridge_respond(
    window: WebviewWindow,
    request_id: u64,
    reply: SettingsReply,
    bridge: State<'_, SettingsBridge>,
) -> bool {
    bridge.resolve_from(window.label(), request_id, reply)
}

/// 提供商注册表：`{ version, providers }`，注册表不合法时为 `null`
#[tauri::command]
pub fn get_llm_providers() -> Option<RegistrySnapshot> {
    registry::snapshot()
}

/// `provider` 的模型选择列表，未知提供商返回空列表
#[tauri::command]
pub fn get_model_options(provider: String, selected: Option<String>) -> Vec<ModelOption> {
    registry::model_options(&provider, selected.as_deref())
}

/// 读取工作目录下的 `dosio.config.json`
///
/// # 返回值
/// 解析后的 JSON；文件不存在、不可读或格式错误时为 `null`
///
/// # 错误
/// 不会返回错误，配置问题只记录日志
#[tauri::command]
pub async fn get_config() -> Result<Option<Value>, String> {
    Ok(config::read_project_config(&path::working_dir()).await)
}
