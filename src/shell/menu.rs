//! # 应用菜单栏
//!
//! 原生菜单栏及其事件处理。菜单项要么由宿主直接执行
//! （窗口、缩放、外部链接、截图导入），要么以携带菜单项 id 的
//! `menu://action` 事件转交主窗口前端处理。
//!
//! macOS 上第一个子菜单是应用菜单，包含"关于"和"偏好设置"；
//! 其他平台上这两项分别移到 File 和 Help 菜单。

use std::sync::Mutex;

use tauri::menu::{Menu, MenuItem, PredefinedMenuItem, Submenu};
use tauri::{AppHandle, Emitter, Manager, WebviewWindow, Wry};

use crate::commands::dialogs;
use crate::services::window_registry::WindowRole;
use crate::shell::{external, windows};

/// 由主窗口前端自行处理的菜单动作事件
pub const MENU_ACTION_EVENT: &str = "menu://action";
/// 通过 File → Import Screenshots… 选中的截图
pub const IMPORT_EVENT: &str = "menu://import-screenshots";
/// 导入失败，载荷为错误信息
pub const IMPORT_FAILED_EVENT: &str = "menu://import-failed";

const ZOOM_STEP: f64 = 0.1;
const ZOOM_MIN: f64 = 0.5;
const ZOOM_MAX: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    About,
    Preferences,
    NewProject,
    ImportScreenshots,
    ExportCurrent,
    ExportAll,
    Reload,
    ToggleDevtools,
    ResetZoom,
    ZoomIn,
    ZoomOut,
    Documentation,
    ReportIssue,
    VisitWebsite,
}

impl MenuAction {
    pub const ALL: [MenuAction; 14] = [
        MenuAction::About,
        MenuAction::Preferences,
        MenuAction::NewProject,
        MenuAction::ImportScreenshots,
        MenuAction::ExportCurrent,
        MenuAction::ExportAll,
        MenuAction::Reload,
        MenuAction::ToggleDevtools,
        MenuAction::ResetZoom,
        MenuAction::ZoomIn,
        MenuAction::ZoomOut,
        MenuAction::Documentation,
        MenuAction::ReportIssue,
        MenuAction::VisitWebsite,
    ];

    pub fn id(self) -> &'static str {
        match self {
            MenuAction::About => "about",
            MenuAction::Preferences => "preferences",
            MenuAction::NewProject => "new-project",
            MenuAction::ImportScreenshots => "import-screenshots",
            MenuAction::ExportCurrent => "export-current",
            MenuAction::ExportAll => "export-all",
            MenuAction::Reload => "reload",
            MenuAction::ToggleDevtools => "toggle-devtools",
            MenuAction::ResetZoom => "reset-zoom",
            MenuAction::ZoomIn => "zoom-in",
            MenuAction::ZoomOut => "zoom-out",
            MenuAction::Documentation => "help-documentation",
            MenuAction::ReportIssue => "help-report-issue",
            MenuAction::VisitWebsite => "help-website",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.id() == id)
    }

    /// 是否为由主窗口前端执行的动作
    pub fn is_delegated(self) -> bool {
        matches!(
            self,
            MenuAction::NewProject | MenuAction::ExportCurrent | MenuAction::ExportAll
        )
    }

    pub fn external_url(self) -> Option<&'static str> {
        match self {
            MenuAction::Documentation => Some(external::DOCUMENTATION_URL),
            MenuAction::ReportIssue => Some(external::ISSUES_URL),
            MenuAction::VisitWebsite => Some(external::WEBSITE_URL),
            _ => None,
        }
    }
}

/// 主窗口缩放比例（Tauri managed state）
#[derive(Debug)]
pub struct ZoomLevel(Mutex<f64>);

impl Default for ZoomLevel {
    fn default() -> Self {
        Self(Mutex::new(1.0))
    }
}

impl ZoomLevel {
    /// 应用缩放动作并返回新的缩放比例
    pub fn apply(&self, action: MenuAction) -> f64 {
        match self.0.lock() {
            Ok(mut zoom) => {
                *zoom = next_zoom(*zoom, action);
                *zoom
            }
            Err(_) => 1.0,
        }
    }
}

/// 执行 `action` 后的缩放比例，限制在支持的范围内
pub fn next_zoom(current: f64, action: MenuAction) -> f64 {
    let next = match action {
        MenuAction::ResetZoom => 1.0,
        MenuAction::ZoomIn => current + ZOOM_STEP,
        MenuAction::ZoomOut => current - ZOOM_STEP,
        _ => current,
    };
    // 保留一位小数，避免多次步进后产生误差
    ((next.clamp(ZOOM_MIN, ZOOM_MAX)) * 10.0).round() / 10.0
}

fn item(
    app: &AppHandle,
    action: MenuAction,
    label: &str,
    accelerator: Option<&str>,
) -> tauri::Result<MenuItem<Wry>> {
    MenuItem::with_id(app, action.id(), label, true, accelerator)
}

fn separator(app: &AppHandle) -> tauri::Result<PredefinedMenuItem<Wry>> {
    PredefinedMenuItem::separator(app)
}

fn preferences_item(app: &AppHandle) -> tauri::Result<MenuItem<Wry>> {
    item(app, MenuAction::Preferences, "Preferences...", Some("CmdOrCtrl+,"))
}

fn about_item(app: &AppHandle) -> tauri::Result<MenuItem<Wry>> {
    item(app, MenuAction::About, "About yuzu.shot", None)
}

#[cfg(target_os = "macos")]
fn app_menu(app: &AppHandle) -> tauri::Result<Submenu<Wry>> {
    Submenu::with_items(
        app,
        app.package_info().name.clone(),
        true,
        &[
            &about_item(app)?,
            &separator(app)?,
            &preferences_item(app)?,
            &separator(app)?,
            &PredefinedMenuItem::services(app, None)?,
            &separator(app)?,
            &PredefinedMenuItem::hide(app, None)?,
            &PredefinedMenuItem::hide_others(app, None)?,
            &PredefinedMenuItem::show_all(app, None)?,
            &separator(app)?,
            &PredefinedMenuItem::quit(app, None)?,
        ],
    )
}

fn file_menu(app: &AppHandle) -> tauri::Result<Submenu<Wry>> {
    let menu = Submenu::with_items(
        app,
        "File",
        true,
        &[
            &item(app, MenuAction::NewProject, "New Project", Some("CmdOrCtrl+N"))?,
            &separator(app)?,
            &item(
                app,
                MenuAction::ImportScreenshots,
                "Import Screenshots...",
                Some("CmdOrCtrl+O"),
            )?,
            &separator(app)?,
            &item(app, MenuAction::ExportCurrent, "Export Current", Some("CmdOrCtrl+E"))?,
            &item(app, MenuAction::ExportAll, "Export All", Some("CmdOrCtrl+Shift+E"))?,
            &separator(app)?,
        ],
    )?;

    if cfg!(target_os = "macos") {
        menu.append(&PredefinedMenuItem::close_window(app, None)?)?;
    } else {
        menu.append(&preferences_item(app)?)?;
        menu.append(&separator(app)?)?;
        menu.append(&PredefinedMenuItem::quit(app, None)?)?;
    }
    Ok(menu)
}

fn edit_menu(app: &AppHandle) -> tauri::Result<Submenu<Wry>> {
    Submenu::with_items(
        app,
        "Edit",
        true,
        &[
            &PredefinedMenuItem::undo(app, None)?,
            &PredefinedMenuItem::redo(app, None)?,
            &separator(app)?,
            &PredefinedMenuItem::cut(app, None)?,
            &PredefinedMenuItem::copy(app, None)?,
            &PredefinedMenuItem::paste(app, None)?,
            &separator(app)?,
            &PredefinedMenuItem::select_all(app, None)?,
        ],
    )
}

fn view_menu(app: &AppHandle) -> tauri::Result<Submenu<Wry>> {
    let menu = Submenu::with_items(
        app,
        "View",
        true,
        &[&item(app, MenuAction::Reload, "Reload", Some("CmdOrCtrl+R"))?],
    )?;

    if cfg!(debug_assertions) {
        menu.append(&item(
            app,
            MenuAction::ToggleDevtools,
            "Toggle Developer Tools",
            Some("CmdOrCtrl+Alt+I"),
        )?)?;
    }

    menu.append_items(&[
        &separator(app)?,
        &item(app, MenuAction::ResetZoom, "Actual Size", Some("CmdOrCtrl+0"))?,
        &item(app, MenuAction::ZoomIn, "Zoom In", Some("CmdOrCtrl+Plus"))?,
        &item(app, MenuAction::ZoomOut, "Zoom Out", Some("CmdOrCtrl+-"))?,
        &separator(app)?,
        &PredefinedMenuItem::fullscreen(app, None)?,
    ])?;
    Ok(menu)
}

fn window_menu(app: &AppHandle) -> tauri::Result<Submenu<Wry>> {
    let menu = Submenu::with_items(
        app,
        "Window",
        true,
        &[
            &PredefinedMenuItem::minimize(app, None)?,
            &PredefinedMenuItem::maximize(app, None)?,
        ],
    )?;

    if !cfg!(target_os = "macos") {
        menu.append(&PredefinedMenuItem::close_window(app, None)?)?;
    }
    Ok(menu)
}

fn help_menu(app: &AppHandle) -> tauri::Result<Submenu<Wry>> {
    let menu = Submenu::with_items(
        app,
        "Help",
        true,
        &[
            &item(app, MenuAction::Documentation, "Documentation", None)?,
            &item(app, MenuAction::ReportIssue, "Report Issue", None)?,
            &separator(app)?,
            &item(app, MenuAction::VisitWebsite, "Visit yuzuhub.com", None)?,
        ],
    )?;

    if !cfg!(target_os = "macos") {
        menu.append(&separator(app)?)?;
        menu.append(&about_item(app)?)?;
    }
    Ok(menu)
}

/// 构建应用菜单栏
pub fn build_menu(app: &AppHandle) -> tauri::Result<Menu<Wry>> {
    let menu = Menu::with_items(
        app,
        &[
            &file_menu(app)?,
            &edit_menu(app)?,
            &view_menu(app)?,
            &window_menu(app)?,
            &help_menu(app)?,
        ],
    )?;

    #[cfg(target_os = "macos")]
    menu.insert(&app_menu(app)?, 0)?;

    Ok(menu)
}

/// 在主窗口上执行 `f`；主窗口未打开时只记录日志
fn with_main_window<F>(app: &AppHandle, action: MenuAction, f: F)
where
    F: FnOnce(&WebviewWindow) -> Result<(), String>,
{
    let Some(window) = windows::main_window(app) else {
        log::warn!("Menu action {} skipped: main window not open", action.id());
        return;
    };
    if let Err(e) = f(&window) {
        log::error!("Menu action {} failed: {}", action.id(), e);
    }
}

/// 打开导入对话框，并把编码后的图片发送给主窗口
async fn import_into_main_window(app: AppHandle) {
    let gate = app.state::<crate::services::dialog_gate::DialogGate>();
    match dialogs::import_screenshots_with(&app, &gate).await {
        Ok(result) if result.canceled => {}
        Ok(result) => {
            log::info!("Imported {} screenshot(s) from menu", result.files.len());
            if let Err(e) = app.emit_to(WindowRole::Main.label(), IMPORT_EVENT, result.files) {
                log::error!("Failed to deliver imported screenshots: {}", e);
            }
        }
        Err(e) => {
            log::error!("Screenshot import failed: {}", e);
            if let Err(emit_err) = app.emit_to(WindowRole::Main.label(), IMPORT_FAILED_EVENT, e) {
                log::warn!("Failed to report import failure: {}", emit_err);
            }
        }
    }
}

/// 按菜单项 id 分发点击事件，未知 id 忽略
pub fn handle_menu_event(app: &AppHandle, menu_id: &str) {
    let Some(action) = MenuAction::from_id(menu_id) else {
        return;
    };

    if let Some(url) = action.external_url() {
        if let Err(e) = external::open_external(app, url) {
            log::error!("{}", e);
        }
        return;
    }

    if action.is_delegated() {
        with_main_window(app, action, |window| {
            window
                .emit_to(window.label(), MENU_ACTION_EVENT, action.id())
                .map_err(|e| e.to_string())
        });
        return;
    }

    match action {
        MenuAction::About => windows::open_window_logged(app, WindowRole::About),
        MenuAction::Preferences => windows::open_window_logged(app, WindowRole::Preferences),
        MenuAction::ImportScreenshots => {
            if windows::main_window(app).is_none() {
                log::warn!("Import skipped: main window not open");
                return;
            }
            tauri::async_runtime::spawn(import_into_main_window(app.clone()));
        }
        MenuAction::Reload => {
            with_main_window(app, action, |window| {
                window.reload().map_err(|e| e.to_string())
            });
        }
        MenuAction::ToggleDevtools => {
            #[cfg(debug_assertions)]
            with_main_window(app, action, |window| {
                if window.is_devtools_open() {
                    window.close_devtools();
                } else {
                    window.open_devtools();
                }
                Ok(())
            });
        }
        MenuAction::ResetZoom | MenuAction::ZoomIn | MenuAction::ZoomOut => {
            let zoom = app.state::<ZoomLevel>().apply(action);
            with_main_window(app, action, |window| {
                window.set_zoom(zoom).map_err(|e| e.to_string())
            });
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_ids_round_trip() {
        for action in MenuAction::ALL {
            assert_eq!(MenuAction::from_id(action.id()), Some(action));
        }
        assert_eq!(MenuAction::from_id("quit"), None);
    }

    #[test]
    fn menu_ids_are_unique() {
        let mut ids: Vec<_> = MenuAction::ALL.iter().map(|a| a.id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), MenuAction::ALL.len());
    }

    #[test]
    fn only_project_actions_are_delegated() {
        let delegated: Vec<_> = MenuAction::ALL
            .into_iter()
            .filter(|a| a.is_delegated())
            .map(|a| a.id())
            .collect();
        assert_eq!(delegated, vec!["new-project", "export-current", "export-all"]);
    }

    #[test]
    fn help_items_open_external_urls() {
        assert_eq!(
            MenuAction::ReportIssue.external_url(),
            Some("https://github.com/YUZU-Hub/appscreen/issues")
        );
        assert_eq!(MenuAction::About.external_url(), None);
    }

    #[test]
    fn zoom_steps_and_clamps() {
        assert_eq!(next_zoom(1.0, MenuAction::ZoomIn), 1.1);
        assert_eq!(next_zoom(1.0, MenuAction::ZoomOut), 0.9);
        assert_eq!(next_zoom(2.4, MenuAction::ResetZoom), 1.0);
        assert_eq!(next_zoom(3.0, MenuAction::ZoomIn), 3.0);
        assert_eq!(next_zoom(0.5, MenuAction::ZoomOut), 0.5);

        let zoom = ZoomLevel::default();
        for _ in 0..3 {
            zoom.apply(MenuAction::ZoomIn);
        }
        assert_eq!(zoom.apply(MenuAction::ZoomOut), 1.2);
    }
}
