//! # 截图数据模型
//!
//! 定义交给前端的图片数据和截图目录扫描结果。
//! 目录缺失等失败以数据形式（`success: false`）返回，
//! 前端无需处理被拒绝的 IPC 调用。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 可直接用于 `<img src>` 的图片：文件名 + `data:` URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedImage {
    pub name: String,
    pub data_url: String,
}

fn default_platform() -> String {
    "ios".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

/// 要加载的平台/语言组合，默认 `ios` / `en`
#[derive(Debug, Clone, Deserialize)]
pub struct ScreenshotQuery {
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for ScreenshotQuery {
    fn default() -> Self {
        Self {
            platform: default_platform(),
            language: default_language(),
        }
    }
}

/// `get_latest_screenshots` 的结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestScreenshots {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<EncodedImage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LatestScreenshots {
    pub fn loaded(images: Vec<EncodedImage>, source_path: String) -> Self {
        Self {
            success: true,
            images: Some(images),
            source_path: Some(source_path),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            images: None,
            source_path: None,
            error: Some(error.into()),
        }
    }
}

/// `scan_for_screenshots` 的结果
///
/// `platforms` 将平台目录名映射到至少包含一张图片的语言列表，两级均已排序。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotScan {
    pub success: bool,
    pub found: bool,
    /// 包含图片的平台/语言组合数量
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platforms: Option<BTreeMap<String, Vec<String>>>,
    /// 运行目录名，通常是时间戳
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScreenshotScan {
    pub fn not_found() -> Self {
        Self {
            success: false,
            found: false,
            count: 0,
            platforms: None,
            timestamp: None,
            base_path: None,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::not_found()
        }
    }
}
