//! # AI 设置数据模型
//!
//! 定义偏好设置窗口读写的 AI 设置记录（Settings），
//! 以及宿主与前端之间设置通道的消息类型（SettingsRequest / SettingsReply）。
//!
//! 所有字段按前端约定序列化为 camelCase。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::services::registry::{self, KeyValueStore};

/// AI 翻译设置
///
/// 所有字段均为字符串，API Key 为空表示"未配置"。
///
/// 反序列化时缺失的字段取 `Settings::default()`（即 `fallback()`），
/// 前端只提交部分字段时也能正常保存，而不是在 IPC 层直接报错。
///
/// 对应前端 TypeScript 接口：
/// ```typescript
/// interface Settings {
///   provider: string;
///   anthropicKey: string; openaiKey: string; googleKey: string;
///   anthropicModel: string; openaiModel: string; googleModel: string;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub provider: String,
    pub anthropic_key: String,
    pub openai_key: String,
    pub google_key: String,
    pub anthropic_model: String,
    pub openai_model: String,
    pub google_model: String,
}

impl Settings {
    /// 兜底记录：provider 为 `anthropic`，其余字段为空字符串
    ///
    /// 设置通道不可用（主窗口未打开、超时、前端报错）时返回此记录。
    pub fn fallback() -> Self {
        Self {
            provider: registry::DEFAULT_PROVIDER.to_string(),
            anthropic_key: String::new(),
            openai_key: String::new(),
            google_key: String::new(),
            anthropic_model: String::new(),
            openai_model: String::new(),
            google_model: String::new(),
        }
    }

    /// 从前端存储构建设置记录
    ///
    /// 未设置的模型字段使用注册表中各提供商的默认模型填充。
    ///
    /// # 参数
    /// - `store` - 前端 `localStorage` 的键值视图
    pub fn from_store(store: &impl KeyValueStore) -> Self {
        Self {
            provider: registry::selected_provider(store),
            anthropic_key: registry::api_key(store, "anthropic").unwrap_or_default(),
            openai_key: registry::api_key(store, "openai").unwrap_or_default(),
            google_key: registry::api_key(store, "google").unwrap_or_default(),
            anthropic_model: registry::selected_model(store, "anthropic").unwrap_or_default(),
            openai_model: registry::selected_model(store, "openai").unwrap_or_default(),
            google_model: registry::selected_model(store, "google").unwrap_or_default(),
        }
    }

    /// 保存时写入前端存储的条目，键名取自注册表的 storage key
    pub fn to_entries(&self) -> Vec<StorageEntry> {
        let mut entries = vec![StorageEntry::new(
            registry::PROVIDER_STORAGE_KEY,
            &self.provider,
        )];
        for (provider_key, key, model) in [
            ("anthropic", &self.anthropic_key, &self.anthropic_model),
            ("openai", &self.openai_key, &self.openai_model),
            ("google", &self.google_key, &self.google_model),
        ] {
            if let Some(config) = registry::provider(provider_key) {
                entries.push(StorageEntry::new(config.storage_key, key));
                entries.push(StorageEntry::new(config.model_storage_key, model));
            }
        }
        entries
    }

    /// 已填写但前缀不符合提供商要求的 API Key 所属提供商
    pub fn malformed_keys(&self) -> Vec<&'static str> {
        [
            ("anthropic", &self.anthropic_key),
            ("openai", &self.openai_key),
            ("google", &self.google_key),
        ]
        .into_iter()
        .filter(|(provider, key)| {
            !key.is_empty() && !registry::validate_api_key_format(provider, key)
        })
        .map(|(provider, _)| provider)
        .collect()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::fallback()
    }
}

/// `save_settings` 的结果：`{ success, error? }`
#[derive(Debug, Clone, Serialize)]
pub struct SaveSettingsResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveSettingsResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// 一条 `localStorage` 键值对
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEntry {
    pub key: String,
    pub value: String,
}

impl StorageEntry {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// 宿主请求前端执行的存储操作
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum SettingsOp {
    /// 读取指定的键
    Get { keys: Vec<String> },
    /// 写入所有条目，之后由前端刷新设置界面
    Set { entries: Vec<StorageEntry> },
}

/// 设置通道消息：宿主 → 前端
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRequest {
    pub request_id: u64,
    #[serde(flatten)]
    pub op: SettingsOp,
}

/// 设置通道应答：前端 → 宿主
///
/// `get` 请求的结果放在 `values` 中；未存储的键可以省略或为 `null`。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsReply {
    pub ok: bool,
    #[serde(default)]
    pub values: HashMap<String, Option<String>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SettingsReply {
    /// 转换为键值视图，丢弃前端报告为 `null` 的键
    pub fn into_store(self) -> HashMap<String, String> {
        self.values
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_yields_registry_defaults() {
        let settings = Settings::from_store(&HashMap::new());
        assert_eq!(settings.provider, "anthropic");
        assert_eq!(settings.anthropic_model, "claude-sonnet-4-20250514");
        assert_eq!(settings.openai_model, "gpt-5-mini-2025-08-07");
        assert_eq!(settings.google_model, "gemini-2.0-flash");
        assert_eq!(settings.anthropic_key, "");
    }

    #[test]
    fn fallback_is_blank_except_provider() {
        let fallback = Settings::fallback();
        assert_eq!(fallback.provider, "anthropic");
        assert_eq!(fallback.anthropic_model, "");
        assert_eq!(fallback.google_key, "");
    }

    #[test]
    fn entries_use_registry_storage_keys() {
        let mut settings = Settings::from_store(&HashMap::new());
        settings.anthropic_key = "sk-ant-1".into();
        let entries = settings.to_entries();
        assert_eq!(entries.len(), 7);
        assert_eq!(entries[0], StorageEntry::new("aiProvider", "anthropic"));
        assert!(entries.contains(&StorageEntry::new("claudeApiKey", "sk-ant-1")));
        assert!(entries.contains(&StorageEntry::new("googleModel", "gemini-2.0-flash")));

        // 写入的内容读回后保持一致
        let store: HashMap<String, String> =
            entries.into_iter().map(|e| (e.key, e.value)).collect();
        assert_eq!(Settings::from_store(&store), settings);
    }

    #[test]
    fn serializes_camel_case() {
        let value = serde_json::to_value(Settings::fallback()).unwrap();
        assert!(value.get("openaiKey").is_some());
        assert!(value.get("anthropicModel").is_some());
    }

    #[test]
    fn request_wire_format() {
        let request = SettingsRequest {
            request_id: 7,
            op: SettingsOp::Get {
                keys: vec!["aiProvider".into()],
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["requestId"], 7);
        assert_eq!(value["op"], "get");
        assert_eq!(value["keys"][0], "aiProvider");
    }

    #[test]
    fn reply_drops_null_values() {
        let reply: SettingsReply = serde_json::from_str(
            r#"{"ok":true,"values":{"aiProvider":"openai","openaiModel":null}}"#,
        )
        .unwrap();
        let store = reply.into_store();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("aiProvider").map(String::as_str), Some("openai"));
    }

    #[test]
    fn partial_record_fills_missing_fields() {
        let settings: Settings =
            serde_json::from_str(r#"{"provider":"openai","openaiKey":"sk-x"}"#).unwrap();
        assert_eq!(settings.provider, "openai");
        assert_eq!(settings.openai_key, "sk-x");
        assert_eq!(settings.anthropic_key, "");
        assert_eq!(settings.google_model, "");

        let empty: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, Settings::fallback());
    }

    #[test]
    fn flags_keys_with_wrong_prefix() {
        let mut settings = Settings::fallback();
        settings.openai_key = "xyz".into();
        settings.google_key = "AIza123".into();
        assert_eq!(settings.malformed_keys(), vec!["openai"]);
    }
}
