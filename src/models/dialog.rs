//! # 原生对话框数据模型
//!
//! 定义 `show_open_dialog` / `show_save_dialog` 的参数和结果。
//! 参数结构沿用前端已有的写法（`filters`、`properties`、`defaultPath`），
//! 前端调用无需修改。

use serde::{Deserialize, Serialize};

use crate::models::screenshot::EncodedImage;

/// 扩展名过滤器，例如 `{ name: "Images", extensions: ["png"] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

/// 打开/保存对话框参数
///
/// 所有字段均可省略。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DialogOptions {
    pub title: Option<String>,
    /// 起始目录；保存对话框可以是包含文件名的完整路径
    pub default_path: Option<String>,
    pub filters: Vec<FileFilter>,
    /// 支持 `openFile`、`openDirectory`、`multiSelections`，其余忽略
    pub properties: Vec<String>,
}

impl DialogOptions {
    fn has_property(&self, property: &str) -> bool {
        self.properties.iter().any(|p| p == property)
    }

    pub fn multi_select(&self) -> bool {
        self.has_property("multiSelections")
    }

    /// 仅在未同时要求选择文件时才选择目录
    pub fn pick_directory(&self) -> bool {
        self.has_property("openDirectory") && !self.has_property("openFile")
    }
}

/// `show_open_dialog` 的结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenDialogResult {
    pub canceled: bool,
    pub file_paths: Vec<String>,
}

impl OpenDialogResult {
    pub fn canceled() -> Self {
        Self {
            canceled: true,
            file_paths: vec![],
        }
    }
}

/// `show_save_dialog` 的结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDialogResult {
    pub canceled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl SaveDialogResult {
    pub fn canceled() -> Self {
        Self {
            canceled: true,
            file_path: None,
        }
    }
}

/// 截图导入结果
#[derive(Debug, Clone, Serialize)]
pub struct ImportResult {
    pub canceled: bool,
    pub files: Vec<EncodedImage>,
}

impl ImportResult {
    pub fn canceled() -> Self {
        Self {
            canceled: true,
            files: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ui_options() {
        let options: DialogOptions = serde_json::from_str(
            r#"{
                "title": "Export",
                "defaultPath": "/tmp/out.png",
                "filters": [{ "name": "PNG", "extensions": ["png"] }],
                "properties": ["openFile", "multiSelections"]
            }"#,
        )
        .unwrap();
        assert_eq!(options.default_path.as_deref(), Some("/tmp/out.png"));
        assert_eq!(options.filters[0].extensions, vec!["png"]);
        assert!(options.multi_select());
        assert!(!options.pick_directory());
    }

    #[test]
    fn missing_fields_default() {
        let options: DialogOptions = serde_json::from_str("{}").unwrap();
        assert!(options.filters.is_empty());
        assert!(!options.multi_select());

        let dirs: DialogOptions =
            serde_json::from_str(r#"{ "properties": ["openDirectory"] }"#).unwrap();
        assert!(dirs.pick_directory());
    }

    #[test]
    fn save_result_omits_missing_path() {
        let value = serde_json::to_value(SaveDialogResult::canceled()).unwrap();
        assert_eq!(value["canceled"], true);
        assert!(value.get("filePath").is_none());
    }
}
