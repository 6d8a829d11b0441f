//! # 路径工具函数
//!
//! 提供与文件路径相关的工具函数，包括：
//! - 定位工作目录下的 `dosio.config.json`
//! - 解析截图根目录（环境变量、配置项、固定默认值）
//! - 检查前端传入的名称只包含单个路径组件

use std::path::{Component, Path, PathBuf};

/// 项目配置文件名，在进程工作目录中查找
pub const CONFIG_FILE_NAME: &str = "dosio.config.json";

/// 覆盖截图根目录的环境变量
pub const SCREENSHOTS_DIR_ENV: &str = "YUZU_SCREENSHOTS_DIR";

/// 覆盖截图根目录的配置项
pub const SCREENSHOTS_DIR_CONFIG_KEY: &str = "screenshotsDir";

/// 截图运行目录默认位于应用目录旁：
/// `<工作目录>/../GeeLPee/Screenshots`
const DEFAULT_SCREENSHOTS_DIR: [&str; 3] = ["..", "GeeLPee", "Screenshots"];

/// 当前工作目录，无法获取时返回 `.`
pub fn working_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// `dir` 下 `dosio.config.json` 的路径
pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// 解析截图根目录
///
/// 优先级：`env_override` → `config_override` → 固定默认值。
/// 空白值视为未设置，相对路径基于 `working_dir` 解析。
///
/// # 参数
/// - `working_dir` - 进程工作目录
/// - `env_override` - `YUZU_SCREENSHOTS_DIR` 环境变量的值
/// - `config_override` - 项目配置中的 `screenshotsDir`
///
/// # 返回值
/// 截图根目录路径（不检查是否存在）
pub fn resolve_screenshots_dir(
    working_dir: &Path,
    env_override: Option<&str>,
    config_override: Option<&str>,
) -> PathBuf {
    let chosen = env_override
        .or(config_override)
        .map(str::trim)
        .filter(|value| !value.is_empty());

    match chosen {
        Some(value) => working_dir.join(value),
        None => DEFAULT_SCREENSHOTS_DIR
            .iter()
            .fold(working_dir.to_path_buf(), |path, part| path.join(part)),
    }
}

/// `name` 是否恰好是一个普通路径组件
///
/// 不含路径分隔符、不是 `.`/`..`、不是绝对路径，
/// 用于阻止前端传入的平台/语言名称跳出截图目录。
pub fn is_plain_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}
