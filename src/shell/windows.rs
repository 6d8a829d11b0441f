//! # 窗口管理
//!
//! 负责创建主窗口、关于窗口和偏好设置窗口。所有打开窗口的请求都经过
//! `WindowRegistry`，重复请求只会聚焦已有窗口，不会打开第二个实例。
//!
//! 窗口创建时隐藏，页面加载完成后再显示，避免深色界面绘制前出现白屏闪烁。

use tauri::webview::PageLoadEvent;
use tauri::window::Color;
use tauri::{AppHandle, Manager, RunEvent, WebviewUrl, WebviewWindow, WebviewWindowBuilder};

use crate::services::window_registry::{WindowAction, WindowHandle, WindowRegistry, WindowRole};
use crate::shell::external;

/// 所有窗口共用的背景色（`#1a1a2e`）
const BACKGROUND: Color = Color(0x1a, 0x1a, 0x2e, 0xff);

/// 作为 Tauri managed state 注册的窗口注册表类型
pub type Windows = WindowRegistry<WebviewWindow>;

impl WindowHandle for WebviewWindow {
    fn focus(&self) -> Result<(), String> {
        if self.is_minimized().unwrap_or(false) {
            if let Err(e) = self.unminimize() {
                log::warn!("Failed to unminimize window {}: {}", self.label(), e);
            }
        }
        self.show()
            .and_then(|_| self.set_focus())
            .map_err(|e| format!("Failed to focus window {}: {}", self.label(), e))
    }
}

/// 是否以 `--dev` 参数启动（仅调试构建）
#[cfg(debug_assertions)]
pub fn dev_mode() -> bool {
    std::env::args().any(|arg| arg == "--dev")
}

/// 显示 `role` 对应的窗口，不存在时创建
///
/// # 参数
/// - `app` - Tauri 应用句柄
/// - `role` - 目标窗口角色
///
/// # 返回值
/// 实际执行的动作：新建（`Created`）或聚焦已有窗口（`Focused`）
///
/// # 错误
/// 窗口创建或聚焦失败时返回错误信息
pub fn open_window(app: &AppHandle, role: WindowRole) -> Result<WindowAction, String> {
    let windows = app.state::<Windows>();
    let action = windows.create_or_focus(role, || build_window(app, role))?;
    log::info!("{} window: {:?}", role.label(), action);
    Ok(action)
}

/// 与 `open_window` 相同，但失败时只记录日志；供没有调用方可以报告错误的菜单项使用
pub fn open_window_logged(app: &AppHandle, role: WindowRole) {
    if let Err(e) = open_window(app, role) {
        log::error!("Failed to open {} window: {}", role.label(), e);
    }
}

/// 窗口销毁后移除其注册表条目
pub fn release_window(app: &AppHandle, label: &str) {
    if let Some(role) = WindowRole::from_label(label) {
        app.state::<Windows>().release(role);
        log::info!("{} window closed", label);
    }
}

/// 当前存活的主窗口
pub fn main_window(app: &AppHandle) -> Option<WebviewWindow> {
    app.state::<Windows>().get(WindowRole::Main)
}

/// 所有角色共用的窗口配置：页面、标题、背景色、加载完成前隐藏、
/// 外部链接交给系统默认程序打开
fn base_builder<'a>(
    app: &'a AppHandle,
    role: WindowRole,
    page: &str,
    title: &str,
) -> WebviewWindowBuilder<'a, tauri::Wry, AppHandle> {
    let nav_app = app.clone();
    WebviewWindowBuilder::new(app, role.label(), WebviewUrl::App(page.into()))
        .title(title)
        .background_color(BACKGROUND)
        .visible(false)
        .on_navigation(move |url| external::allow_navigation(&nav_app, url))
        .on_page_load(|window, payload| {
            if matches!(payload.event(), PageLoadEvent::Finished) {
                if let Err(e) = window.show() {
                    log::warn!("Failed to show window {}: {}", window.label(), e);
                }
            }
        })
}

/// 创建 `role` 对应的窗口
///
/// Tauri 的窗口标签全局唯一：同标签窗口已存在（例如并发请求先一步建好）
/// 时直接复用，不再创建。
fn build_window(app: &AppHandle, role: WindowRole) -> Result<WebviewWindow, String> {
    if let Some(existing) = app.get_webview_window(role.label()) {
        return Ok(existing);
    }

    let built = match role {
        WindowRole::Main => {
            let builder = base_builder(app, role, "index.html", "yuzu.shot")
                .inner_size(1400.0, 900.0)
                .min_inner_size(1024.0, 700.0);

            #[cfg(target_os = "macos")]
            let builder = builder
                .title_bar_style(tauri::TitleBarStyle::Overlay)
                .hidden_title(true);

            builder.build()
        }
        WindowRole::About => {
            let mut builder = base_builder(app, role, "about.html", "About yuzu.shot")
                .inner_size(400.0, 380.0)
                .resizable(false)
                .minimizable(false)
                .maximizable(false);
            if let Some(main) = app.get_webview_window(WindowRole::Main.label()) {
                builder = builder
                    .parent(&main)
                    .map_err(|e| format!("Failed to attach about window to main: {}", e))?;
            }
            builder.build()
        }
        WindowRole::Preferences => base_builder(app, role, "preferences.html", "Preferences")
            .inner_size(500.0, 620.0)
            .resizable(false)
            .minimizable(false)
            .maximizable(false)
            .build(),
    };

    let window = match built {
        Ok(window) => window,
        // 创建期间另一请求建好了同标签窗口
        Err(e) => app
            .get_webview_window(role.label())
            .ok_or_else(|| format!("Failed to create {} window: {}", role.label(), e))?,
    };

    #[cfg(debug_assertions)]
    if role == WindowRole::Main && dev_mode() {
        window.open_devtools();
    }

    Ok(window)
}

/// 应用生命周期处理
///
/// macOS 上关闭所有窗口后应用仍保持运行，点击 Dock 图标时重新打开主窗口。
#[cfg_attr(not(target_os = "macos"), allow(unused_variables))]
pub fn handle_run_event(app: &AppHandle, event: RunEvent) {
    match event {
        #[cfg(target_os = "macos")]
        RunEvent::Reopen {
            has_visible_windows,
            ..
        } => {
            if !has_visible_windows {
                open_window_logged(app, WindowRole::Main);
            }
        }
        RunEvent::ExitRequested { code, api, .. } => {
            // code 为 None 表示最后一个窗口被关闭；显式退出会携带退出码
            if code.is_none() && cfg!(target_os = "macos") {
                api.prevent_exit();
            }
        }
        _ => {}
    }
}
