//! # 图片编码服务
//!
//! 将图片文件转换为前端可用的 `data:` URL：
//! - 固定的扩展名 → MIME 对照表（未知扩展名按 PNG 发送）
//! - 使用标准字母表进行 base64 编码
//! - 截图导入的批量读取：全部成功或整体失败

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rayon::prelude::*;

use crate::models::screenshot::EncodedImage;

/// 导入对话框允许选择的扩展名
pub const IMPORT_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// 截图运行目录中识别的扩展名
pub const SCREENSHOT_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// `path` 的小写扩展名
fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// 图片路径对应的 MIME 类型，未知或缺失扩展名按 PNG 处理
pub fn mime_for_path(path: &Path) -> &'static str {
    match extension(path).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}

/// `path` 的扩展名是否在 `extensions` 中（不区分大小写）
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    extension(path).is_some_and(|ext| extensions.contains(&ext.as_str()))
}

/// `data:<mime>;base64,<payload>`
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// 将已读取的 `path` 文件内容包装为 `EncodedImage`
pub fn encode_image(path: &Path, bytes: &[u8]) -> EncodedImage {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    EncodedImage {
        name,
        data_url: to_data_url(mime_for_path(path), bytes),
    }
}

/// 完整读取单个图片文件并编码
///
/// # 错误
/// 文件读取失败时返回包含路径的错误信息
pub fn read_image(path: &Path) -> Result<EncodedImage, String> {
    let bytes = std::fs::read(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    Ok(encode_image(path, &bytes))
}

/// 使用 rayon 并行读取并编码所有文件，结果保持输入顺序
///
/// # 参数
/// - `paths` - 用户选中的图片路径
///
/// # 错误
/// 任一文件不可读时整体失败，不返回部分结果
pub fn read_images(paths: &[PathBuf]) -> Result<Vec<EncodedImage>, String> {
    paths.par_iter().map(|path| read_image(path)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_table() {
        assert_eq!(mime_for_path(Path::new("a.png")), "image/png");
        assert_eq!(mime_for_path(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("a.gif")), "image/gif");
        assert_eq!(mime_for_path(Path::new("a.webp")), "image/webp");
        assert_eq!(mime_for_path(Path::new("a.bmp")), "image/png");
        assert_eq!(mime_for_path(Path::new("noext")), "image/png");
    }

    #[test]
    fn extension_filter_ignores_case() {
        assert!(has_extension(Path::new("shot.PNG"), &SCREENSHOT_EXTENSIONS));
        assert!(!has_extension(Path::new("shot.gif"), &SCREENSHOT_EXTENSIONS));
        assert!(has_extension(Path::new("shot.gif"), &IMPORT_EXTENSIONS));
        assert!(!has_extension(Path::new(".DS_Store"), &SCREENSHOT_EXTENSIONS));
    }

    #[test]
    fn data_url_format() {
        assert_eq!(to_data_url("image/png", b"hi"), "data:image/png;base64,aGk=");
    }

    #[test]
    fn batch_read_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("b.webp");
        let b = dir.path().join("a.png");
        std::fs::write(&a, b"one").unwrap();
        std::fs::write(&b, b"two").unwrap();

        let images = read_images(&[a, b]).unwrap();
        assert_eq!(images[0].name, "b.webp");
        assert_eq!(images[0].data_url, "data:image/webp;base64,b25l");
        assert_eq!(images[1].name, "a.png");
    }

    #[test]
    fn batch_read_is_all_or_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("ok.png");
        std::fs::write(&present, b"x").unwrap();
        let missing = dir.path().join("missing.png");

        let result = read_images(&[present, missing]);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("missing.png"));
    }
}
