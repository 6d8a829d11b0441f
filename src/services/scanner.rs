//! # 截图目录扫描服务
//!
//! 只读地发现外部生成器产出的截图运行目录。根目录下的结构：
//!
//! ```text
//! <base>/<run timestamp>/<platform>/<language>/<image files>
//! ```
//!
//! 最新运行即目录名字典序最大的运行（运行目录名是可排序的时间戳）。
//! 本模块不会写入任何运行目录。

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::models::screenshot::{EncodedImage, LatestScreenshots, ScreenshotScan};
use crate::services::media;
use crate::utils::path::is_plain_component;

/// `dir` 的直接子目录 (名称, 路径)，按名称排序
async fn list_subdirs(dir: &Path) -> Result<Vec<(String, PathBuf)>, String> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| format!("Failed to read directory {}: {}", dir.display(), e))?;

    let mut dirs = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| format!("Failed to iterate directory {}: {}", dir.display(), e))?
    {
        // metadata() 会跟随符号链接，链接的目录同样计入
        let is_dir = tokio::fs::metadata(entry.path())
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if is_dir {
            dirs.push((entry.file_name().to_string_lossy().to_string(), entry.path()));
        }
    }

    dirs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(dirs)
}

/// `dir` 下的截图图片文件（不递归），按文件名排序
async fn list_images(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| format!("Failed to read directory {}: {}", dir.display(), e))?;

    let mut images = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| format!("Failed to iterate directory {}: {}", dir.display(), e))?
    {
        let path = entry.path();
        if !media::has_extension(&path, &media::SCREENSHOT_EXTENSIONS) {
            continue;
        }
        let is_file = tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if is_file {
            images.push(path);
        }
    }

    images.sort();
    Ok(images)
}

/// 查找 `base_dir` 下的最新运行目录
///
/// # 返回值
/// - `Ok(Some(path))` - 名称最大的运行目录
/// - `Ok(None)` - `base_dir` 不存在或没有运行目录
///
/// # 错误
/// 目录读取失败时返回错误信息
pub async fn find_latest_run_dir(base_dir: &Path) -> Result<Option<PathBuf>, String> {
    if !base_dir.is_dir() {
        return Ok(None);
    }

    let runs = list_subdirs(base_dir).await?;
    Ok(runs.into_iter().next_back().map(|(_, path)| path))
}

/// 加载 `<最新运行>/<platform>/<language>` 下的全部图片
///
/// # 参数
/// - `base_dir` - 截图根目录
/// - `platform` / `language` - 必须是单个普通路径组件
///
/// # 返回值
/// 目录缺失和不安全的名称通过 `LatestScreenshots::failed` 返回，不会作为 `Err`
pub async fn load_latest_screenshots(
    base_dir: &Path,
    platform: &str,
    language: &str,
) -> LatestScreenshots {
    log::info!("Scanning for screenshots in: {}", base_dir.display());

    if !is_plain_component(platform) || !is_plain_component(language) {
        return LatestScreenshots::failed(format!(
            "Invalid platform or language: {}/{}",
            platform, language
        ));
    }

    if !base_dir.is_dir() {
        log::info!("Screenshot directory not found");
        return LatestScreenshots::failed("Screenshot directory not found");
    }

    let latest_run = match find_latest_run_dir(base_dir).await {
        Ok(Some(run)) => run,
        Ok(None) => return LatestScreenshots::failed("No screenshot runs found"),
        Err(e) => return LatestScreenshots::failed(e),
    };

    let target_dir = latest_run.join(platform).join(language);
    log::info!("Target screenshot directory: {}", target_dir.display());

    if !target_dir.is_dir() {
        return LatestScreenshots::failed(format!(
            "Directory not found: {}",
            target_dir.display()
        ));
    }

    match read_images(&target_dir).await {
        Ok(images) => {
            LatestScreenshots::loaded(images, target_dir.to_string_lossy().to_string())
        }
        Err(e) => {
            log::error!("Error getting screenshots: {}", e);
            LatestScreenshots::failed(e)
        }
    }
}

/// 读取并编码 `dir` 下的全部截图
async fn read_images(dir: &Path) -> Result<Vec<EncodedImage>, String> {
    let mut images = Vec::new();
    for path in list_images(dir).await? {
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        images.push(media::encode_image(&path, &bytes));
    }
    Ok(images)
}

/// 扫描最新运行中包含图片的全部平台/语言组合
pub async fn scan_latest_run(base_dir: &Path) -> ScreenshotScan {
    let latest_run = match find_latest_run_dir(base_dir).await {
        Ok(Some(run)) => run,
        Ok(None) => return ScreenshotScan::not_found(),
        Err(e) => {
            log::error!("Error scanning screenshots: {}", e);
            return ScreenshotScan::failed(e);
        }
    };

    match scan_run(&latest_run).await {
        Ok(platforms) => {
            let count = platforms.values().map(Vec::len).sum();
            let timestamp = latest_run
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            ScreenshotScan {
                success: true,
                found: !platforms.is_empty(),
                count,
                platforms: Some(platforms),
                timestamp: Some(timestamp),
                base_path: Some(latest_run.to_string_lossy().to_string()),
                error: None,
            }
        }
        Err(e) => {
            log::error!("Error scanning screenshots: {}", e);
            ScreenshotScan::failed(e)
        }
    }
}

/// 单个运行目录内：平台 → 至少包含一张图片的语言
async fn scan_run(run_dir: &Path) -> Result<BTreeMap<String, Vec<String>>, String> {
    let mut platforms = BTreeMap::new();

    for (platform, platform_dir) in list_subdirs(run_dir).await? {
        let mut languages = Vec::new();
        for (language, language_dir) in list_subdirs(&platform_dir).await? {
            if !list_images(&language_dir).await?.is_empty() {
                languages.push(language);
            }
        }
        if !languages.is_empty() {
            platforms.insert(platform, languages);
        }
    }

    Ok(platforms)
}
