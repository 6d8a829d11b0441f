//! # 截图 Tauri Commands
//!
//! 从最新一次截图运行中加载截图：
//! - `get_latest_screenshots` - 读取某个平台/语言组合的全部图片
//! - `scan_for_screenshots` - 列出最新运行包含的平台/语言组合
//!
//! 每次调用都重新解析截图根目录，修改 `dosio.config.json` 后无需重启。

use std::path::PathBuf;

use crate::models::screenshot::{LatestScreenshots, ScreenshotQuery, ScreenshotScan};
use crate::services::{config, scanner};
use crate::utils::path;

/// 截图根目录：`YUZU_SCREENSHOTS_DIR` 环境变量 → `dosio.config.json` 中的
/// `screenshotsDir` → `../GeeLPee/Screenshots`
async fn screenshots_dir() -> PathBuf {
    let cwd = path::working_dir();
    let env_override = std::env::var(path::SCREENSHOTS_DIR_ENV).ok();
    let project_config = config::read_project_config(&cwd).await;
    let config_override =
        config::string_setting(project_config.as_ref(), path::SCREENSHOTS_DIR_CONFIG_KEY);

    path::resolve_screenshots_dir(&cwd, env_override.as_deref(), config_override)
}

/// 读取 `<最新运行>/<platform>/<language>` 下的全部图片
///
/// # 参数
/// - `options` - `{ platform = "ios", language = "en" }`，两个字段均可省略
///
/// # 返回值
/// `{ success, images?, sourcePath?, error? }`；目录缺失以 `success: false`
/// 的数据形式返回，不会作为错误抛给前端
#[tauri::command]
pub async fn get_latest_screenshots(
    options: Option<ScreenshotQuery>,
) -> Result<LatestScreenshots, String> {
    let query = options.unwrap_or_default();
    let base_dir = screenshots_dir().await;
    Ok(scanner::load_latest_screenshots(&base_dir, &query.platform, &query.language).await)
}

/// 列出最新运行中包含图片的平台/语言组合
///
/// # 返回值
/// `{ success, found, count, platforms?, timestamp?, basePath?, error? }`
#[tauri::command]
pub async fn scan_for_screenshots() -> Result<ScreenshotScan, String> {
    let base_dir = screenshots_dir().await;
    Ok(scanner::scan_latest_run(&base_dir).await)
}
