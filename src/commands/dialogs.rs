//! # 对话框 Tauri Commands
//!
//! 提供前端使用的原生打开/保存对话框，以及与"文件 → 导入截图"菜单共用的
//! 截图导入流程：
//! - `show_open_dialog` / `show_save_dialog` - 原生文件对话框
//! - `import_screenshots` - 多选图片并编码为 data URL
//!
//! 对话框插件采用回调风格：回调把选择结果通过 `oneshot` 通道发回，
//! command 在通道上 await。每种对话框由 `DialogGate` 限制为同时只显示一个，
//! 重复请求直接返回 `canceled: true`。

use std::path::{Path, PathBuf};

use tauri::{AppHandle, State};
use tauri_plugin_dialog::{DialogExt, FileDialogBuilder, FilePath};
use tauri_plugin_fs::FsExt;
use tokio::sync::oneshot;

use crate::models::dialog::{DialogOptions, ImportResult, OpenDialogResult, SaveDialogResult};
use crate::services::dialog_gate::{DialogGate, DialogKind};
use crate::services::media;
use crate::shell::windows;

/// 将 `defaultPath` 拆分为起始目录和建议文件名
///
/// 已存在的目录原样作为起始目录；其他值视为文件路径，
/// 其父目录作为起始目录、文件名作为建议文件名。
///
/// # 参数
/// - `raw` - 前端传入的 `defaultPath`
/// - `is_dir` - 该路径是否为已存在的目录（由调用方检测，便于测试）
///
/// # 返回值
/// `(起始目录, 建议文件名)`，空路径返回 `(None, None)`
fn split_default_path(raw: &str, is_dir: bool) -> (Option<PathBuf>, Option<String>) {
    let raw = raw.trim();
    if raw.is_empty() {
        return (None, None);
    }
    let path = Path::new(raw);
    if is_dir {
        return (Some(path.to_path_buf()), None);
    }

    let directory = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf);
    let file_name = path.file_name().map(|n| n.to_string_lossy().to_string());
    (directory, file_name)
}

/// 应用标题、扩展名过滤器、起始位置，并将对话框挂到主窗口上
fn configure(
    app: &AppHandle,
    options: &DialogOptions,
    with_file_name: bool,
) -> FileDialogBuilder<tauri::Wry> {
    let mut builder = app.dialog().file();

    if let Some(title) = options.title.as_deref() {
        builder = builder.set_title(title);
    }
    for filter in &options.filters {
        let extensions: Vec<&str> = filter.extensions.iter().map(String::as_str).collect();
        builder = builder.add_filter(&filter.name, &extensions);
    }
    if let Some(raw) = options.default_path.as_deref() {
        let (directory, file_name) = split_default_path(raw, Path::new(raw.trim()).is_dir());
        if let Some(directory) = directory {
            builder = builder.set_directory(directory);
        }
        if let (true, Some(file_name)) = (with_file_name, file_name) {
            builder = builder.set_file_name(file_name);
        }
    }
    if let Some(main) = windows::main_window(app) {
        builder = builder.set_parent(&main);
    }
    builder
}

fn into_paths(files: Vec<FilePath>) -> Vec<PathBuf> {
    files
        .into_iter()
        .filter_map(|file| file.into_path().ok())
        .collect()
}

/// 记录 fs 作用域授权结果
///
/// 授权失败不影响对话框结果，但前端随后读写该路径会被拒绝，
/// 因此必须留下日志。
///
/// # 返回值
/// 授权是否成功
fn report_scope_grant<E: std::fmt::Display>(path: &Path, result: Result<(), E>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Failed to allow {} in fs scope: {}", path.display(), e);
            false
        }
    }
}

/// 将用户选中的路径加入 fs 插件作用域，目录递归授权
fn allow_in_scope(app: &AppHandle, paths: &[PathBuf]) {
    let scope = app.fs_scope();
    for path in paths {
        let result = if path.is_dir() {
            scope.allow_directory(path, true)
        } else {
            scope.allow_file(path)
        };
        report_scope_grant(path, result);
    }
}

fn to_strings(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.to_string_lossy().to_string())
        .collect()
}

/// 显示原生打开对话框
///
/// 根据 `properties` 选择文件或目录、单选或多选。
///
/// # 参数
/// - `options` - 标题、`defaultPath`、过滤器和 `properties`，均可省略
/// - `gate` - Tauri managed state，限制同时只显示一个打开对话框
///
/// # 返回值
/// `{ canceled, filePaths }`；用户取消、未选择任何内容或已有打开对话框
/// 正在显示时均返回 `canceled: true`
#[tauri::command]
pub async fn show_open_dialog(
    app: AppHandle,
    options: Option<DialogOptions>,
    gate: State<'_, DialogGate>,
) -> Result<OpenDialogResult, String> {
    let Some(_slot) = gate.try_acquire(DialogKind::Open) else {
        log::warn!("Open dialog already showing, refusing another");
        return Ok(OpenDialogResult::canceled());
    };

    let options = options.unwrap_or_default();
    let builder = configure(&app, &options, false);
    let (tx, rx) = oneshot::channel();

    match (options.pick_directory(), options.multi_select()) {
        (true, true) => builder.pick_folders(move |picked| {
            let _ = tx.send(picked.unwrap_or_default());
        }),
        (true, false) => builder.pick_folder(move |picked| {
            let _ = tx.send(picked.into_iter().collect());
        }),
        (false, true) => builder.pick_files(move |picked| {
            let _ = tx.send(picked.unwrap_or_default());
        }),
        (false, false) => builder.pick_file(move |picked| {
            let _ = tx.send(picked.into_iter().collect());
        }),
    }

    let paths = into_paths(rx.await.unwrap_or_default());
    if paths.is_empty() {
        return Ok(OpenDialogResult::canceled());
    }

    allow_in_scope(&app, &paths);
    Ok(OpenDialogResult {
        canceled: false,
        file_paths: to_strings(&paths),
    })
}

/// 显示原生保存对话框
///
/// 选中的路径会加入 fs 插件作用域，前端随后可直接写入导出文件。
///
/// # 参数
/// - `options` - 标题、`defaultPath`（可包含建议文件名）和过滤器
/// - `gate` - Tauri managed state，限制同时只显示一个保存对话框
///
/// # 返回值
/// `{ canceled, filePath? }`
#[tauri::command]
pub async fn show_save_dialog(
    app: AppHandle,
    options: Option<DialogOptions>,
    gate: State<'_, DialogGate>,
) -> Result<SaveDialogResult, String> {
    let Some(_slot) = gate.try_acquire(DialogKind::Save) else {
        log::warn!("Save dialog already showing, refusing another");
        return Ok(SaveDialogResult::canceled());
    };

    let options = options.unwrap_or_default();
    let (tx, rx) = oneshot::channel();
    configure(&app, &options, true).save_file(move |picked| {
        let _ = tx.send(picked);
    });

    let Some(path) = rx.await.ok().flatten().and_then(|file| file.into_path().ok()) else {
        return Ok(SaveDialogResult::canceled());
    };

    report_scope_grant(&path, app.fs_scope().allow_file(&path));
    Ok(SaveDialogResult {
        canceled: false,
        file_path: Some(path.to_string_lossy().to_string()),
    })
}

/// 选择图片文件并编码为 data URL
///
/// 与 `show_open_dialog` 共用"打开"对话框名额。文件在阻塞线程池中并行读取，
/// 任一文件读取失败则整个导入失败。
///
/// # 参数
/// - `app` - Tauri 应用句柄
/// - `gate` - 对话框名额
///
/// # 返回值
/// `{ canceled, files }`
///
/// # 错误
/// 任一文件读取失败或读取线程异常时返回错误信息
pub async fn import_screenshots_with(
    app: &AppHandle,
    gate: &DialogGate,
) -> Result<ImportResult, String> {
    let paths = {
        let Some(_slot) = gate.try_acquire(DialogKind::Open) else {
            log::warn!("Open dialog already showing, refusing import");
            return Ok(ImportResult::canceled());
        };

        let mut builder = app
            .dialog()
            .file()
            .set_title("Import Screenshots")
            .add_filter("Images", &media::IMPORT_EXTENSIONS);
        if let Some(pictures) = dirs::picture_dir() {
            builder = builder.set_directory(pictures);
        }
        if let Some(main) = windows::main_window(app) {
            builder = builder.set_parent(&main);
        }

        let (tx, rx) = oneshot::channel();
        builder.pick_files(move |picked| {
            let _ = tx.send(picked.unwrap_or_default());
        });
        into_paths(rx.await.unwrap_or_default())
    };

    if paths.is_empty() {
        return Ok(ImportResult::canceled());
    }

    let files = tauri::async_runtime::spawn_blocking(move || media::read_images(&paths))
        .await
        .map_err(|e| format!("Import worker failed: {}", e))??;

    Ok(ImportResult {
        canceled: false,
        files,
    })
}

/// 前端调用的多文件截图导入，流程同菜单项"导入截图"
#[tauri::command]
pub async fn import_screenshots(
    app: AppHandle,
    gate: State<'_, DialogGate>,
) -> Result<ImportResult, String> {
    import_screenshots_with(&app, &gate).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_of_a_file_splits_into_directory_and_name() {
        let (dir, name) = split_default_path("/tmp/exports/shot.png", false);
        assert_eq!(dir, Some(PathBuf::from("/tmp/exports")));
        assert_eq!(name.as_deref(), Some("shot.png"));
    }

    #[test]
    fn default_path_of_a_directory_is_kept_whole() {
        let (dir, name) = split_default_path("/tmp/exports", true);
        assert_eq!(dir, Some(PathBuf::from("/tmp/exports")));
        assert_eq!(name, None);
    }

    #[test]
    fn scope_grant_failure_is_reported() {
        let path = Path::new("/tmp/export.png");
        assert!(report_scope_grant::<String>(path, Ok(())));
        assert!(!report_scope_grant(path, Err("path is forbidden")));
    }

    #[test]
    fn bare_file_name_has_no_directory() {
        assert_eq!(
            split_default_path("screenshot.png", false),
            (None, Some("screenshot.png".to_string()))
        );
        assert_eq!(split_default_path("  ", false), (None, None));
    }
}
