//! # 项目配置服务
//!
//! 读取目录下的 `dosio.config.json`。该文件可选，内容原样交给前端，
//! 因此文件缺失、不可读或格式错误都返回 `None`，而不是错误。

use std::path::Path;

use serde_json::Value;

use crate::utils::path;

/// 读取 `dir` 下的 `dosio.config.json`
///
/// # 参数
/// - `dir` - 配置文件所在目录（通常为进程工作目录）
///
/// # 返回值
/// - `Some(value)` - 解析后的 JSON 文档
/// - `None` - 文件不存在、不可读或不是合法 JSON（后两种情况记录警告日志）
pub async fn read_project_config(dir: &Path) -> Option<Value> {
    let config_path = path::config_path(dir);

    if !config_path.exists() {
        return None;
    }

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(e) => {
            log::warn!("Failed to read {}: {}", config_path.display(), e);
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring malformed {}: {}", config_path.display(), e);
            None
        }
    }
}

/// 配置文档中 `key` 对应的字符串值
pub fn string_setting<'a>(config: Option<&'a Value>, key: &str) -> Option<&'a str> {
    config?.get(key)?.as_str()
}
