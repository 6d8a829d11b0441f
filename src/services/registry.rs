//! # AI 提供商/模型注册表
//!
//! 前端可选用的 AI 翻译提供商的唯一数据来源。
//! 注册表由宿主持有，通过 `get_llm_providers` 以只读形式交给前端，前端不保留副本。
//!
//! 访问函数基于前端存储的键值视图（`KeyValueStore`）解析用户的选择。
//! 未知提供商返回 `None` / `false`，不会 panic。

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// 提供商、模型或存储键发生变化时递增
pub const REGISTRY_VERSION: u32 = 1;

/// 保存所选提供商的存储键
pub const PROVIDER_STORAGE_KEY: &str = "aiProvider";

/// 尚未选择时使用的提供商
pub const DEFAULT_PROVIDER: &str = "anthropic";

/// 可选模型
#[derive(Debug, Clone, serde::Serialize)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
}

/// 单个提供商的静态描述
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// 偏好设置界面中显示的名称
    #[serde(rename = "name")]
    pub display_name: &'static str,
    /// 该提供商的 API 密钥必须以此前缀开头
    pub key_prefix: &'static str,
    /// 保存 API 密钥的前端存储键
    pub storage_key: &'static str,
    /// 保存所选模型 id 的前端存储键
    pub model_storage_key: &'static str,
    pub models: &'static [ModelInfo],
    pub default_model: &'static str,
}

/// 模型选择列表中的一项
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ModelOption {
    pub id: &'static str,
    pub name: &'static str,
    pub selected: bool,
}

/// 注册表条目，按显示顺序排列
static PROVIDERS: [(&str, ProviderConfig); 3] = [
    (
        "anthropic",
        ProviderConfig {
            display_name: "Anthropic (Claude)",
            key_prefix: "sk-ant-",
            storage_key: "claudeApiKey",
            model_storage_key: "anthropicModel",
            models: &[
                ModelInfo { id: "claude-sonnet-4-20250514", name: "Claude Sonnet 4" },
                ModelInfo { id: "claude-3-5-sonnet-20241022", name: "Claude 3.5 Sonnet" },
                ModelInfo { id: "claude-3-5-haiku-20241022", name: "Claude 3.5 Haiku" },
            ],
            default_model: "claude-sonnet-4-20250514",
        },
    ),
    (
        "openai",
        ProviderConfig {
            display_name: "OpenAI (GPT)",
            key_prefix: "sk-",
            storage_key: "openaiApiKey",
            model_storage_key: "openaiModel",
            models: &[
                ModelInfo { id: "gpt-5.1-2025-11-13", name: "GPT-5.1" },
                ModelInfo { id: "gpt-5-mini-2025-08-07", name: "GPT-5 Mini" },
                ModelInfo { id: "gpt-5-nano-2025-08-07", name: "GPT-5 Nano" },
            ],
            default_model: "gpt-5-mini-2025-08-07",
        },
    ),
    (
        "google",
        ProviderConfig {
            display_name: "Google (Gemini)",
            key_prefix: "AIza",
            storage_key: "googleApiKey",
            model_storage_key: "googleModel",
            models: &[
                ModelInfo { id: "gemini-2.0-flash", name: "Gemini 2.0 Flash" },
                ModelInfo { id: "gemini-1.5-flash", name: "Gemini 1.5 Flash" },
                ModelInfo { id: "gemini-1.5-pro", name: "Gemini 1.5 Pro" },
            ],
            default_model: "gemini-2.0-flash",
        },
    ),
];

/// 前端存储条目的只读视图
///
/// 前端经设置通道返回的存储快照实现了此 trait。
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<&str>;
}

impl KeyValueStore for HashMap<String, String> {
    fn get_item(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

/// `key` 的存储值，空字符串视为未设置
fn stored<'a>(store: &'a impl KeyValueStore, key: &str) -> Option<&'a str> {
    store.get_item(key).filter(|value| !value.is_empty())
}

/// 按 key 查找提供商
pub fn provider(key: &str) -> Option<&'static ProviderConfig> {
    PROVIDERS
        .iter()
        .find(|(provider_key, _)| *provider_key == key)
        .map(|(_, config)| config)
}

/// 全部提供商 key，按显示顺序
#[cfg(test)]
pub fn provider_keys() -> impl Iterator<Item = &'static str> {
    PROVIDERS.iter().map(|(key, _)| *key)
}

/// 构建设置记录所需的全部存储键
pub fn settings_storage_keys() -> Vec<String> {
    let mut keys = vec![PROVIDER_STORAGE_KEY.to_string()];
    for (_, config) in PROVIDERS.iter() {
        keys.push(config.storage_key.to_string());
        keys.push(config.model_storage_key.to_string());
    }
    keys
}

/// 当前选择的提供商，默认 `anthropic`
pub fn selected_provider(store: &impl KeyValueStore) -> String {
    stored(store, PROVIDER_STORAGE_KEY)
        .unwrap_or(DEFAULT_PROVIDER)
        .to_string()
}

/// `provider_key` 当前选择的模型
///
/// # 返回值
/// 未选择时为该提供商的默认模型；未知提供商返回 `None`
pub fn selected_model(store: &impl KeyValueStore, provider_key: &str) -> Option<String> {
    let config = provider(provider_key)?;
    Some(
        stored(store, config.model_storage_key)
            .unwrap_or(config.default_model)
            .to_string(),
    )
}

/// `provider_key` 已保存的 API 密钥
pub fn api_key(store: &impl KeyValueStore, provider_key: &str) -> Option<String> {
    let config = provider(provider_key)?;
    stored(store, config.storage_key).map(str::to_string)
}

/// 检查 `key` 是否带有 `provider_key` 要求的前缀
pub fn validate_api_key_format(provider_key: &str, key: &str) -> bool {
    provider(provider_key).is_some_and(|config| key.starts_with(config.key_prefix))
}

/// `provider_key` 的模型选择列表
///
/// # 参数
/// - `provider_key` - 提供商 key
/// - `selected_model` - 要标记为选中的模型 id，省略时标记默认模型
///
/// # 返回值
/// 按注册表顺序排列的模型列表；未知提供商返回空列表
pub fn model_options(provider_key: &str, selected_model: Option<&str>) -> Vec<ModelOption> {
    let Some(config) = provider(provider_key) else {
        return vec![];
    };
    let selected = selected_model.unwrap_or(config.default_model);
    config
        .models
        .iter()
        .map(|model| ModelOption {
            id: model.id,
            name: model.name,
            selected: model.id == selected,
        })
        .collect()
}

/// 检查注册表约束：默认模型必须属于该提供商的模型列表，密钥前缀不能为空
///
/// # 错误
/// 返回第一个违反约束的提供商及原因
pub fn validate_registry() -> Result<(), String> {
    for (key, config) in PROVIDERS.iter() {
        if config.key_prefix.is_empty() {
            return Err(format!("provider {} has an empty key prefix", key));
        }
        if !config.models.iter().any(|m| m.id == config.default_model) {
            return Err(format!(
                "provider {} default model {} is not one of its models",
                key, config.default_model
            ));
        }
    }
    Ok(())
}

/// 交给前端的注册表快照
///
/// 序列化为 `{ "version": 1, "providers": { "anthropic": {...}, ... } }`，
/// 提供商按显示顺序排列。
#[derive(Debug, Clone, Copy)]
pub struct RegistrySnapshot;

impl Serialize for RegistrySnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Providers;

        impl Serialize for Providers {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_map(PROVIDERS.iter().map(|(key, config)| (*key, config)))
            }
        }

        let mut state = serializer.serialize_struct("ProviderRegistry", 2)?;
        state.serialize_field("version", &REGISTRY_VERSION)?;
        state.serialize_field("providers", &Providers)?;
        state.end()
    }
}

/// 注册表快照；违反约束时记录错误并返回 `None`
pub fn snapshot() -> Option<RegistrySnapshot> {
    match validate_registry() {
        Ok(()) => Some(RegistrySnapshot),
        Err(e) => {
            log::error!("provider registry is invalid: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn registry_invariants_hold() {
        assert!(validate_registry().is_ok());
        for key in provider_keys() {
            let config = provider(key).unwrap();
            assert!(config.models.iter().any(|m| m.id == config.default_model));
        }
    }

    #[test]
    fn unknown_provider_is_total() {
        let empty = store(&[]);
        assert_eq!(selected_model(&empty, "mistral"), None);
        assert_eq!(api_key(&empty, "mistral"), None);
        assert!(!validate_api_key_format("mistral", "sk-abc"));
        assert!(!validate_api_key_format("", ""));
        assert!(model_options("mistral", None).is_empty());
    }

    #[test]
    fn validates_key_prefix() {
        assert!(validate_api_key_format("openai", "sk-abc"));
        assert!(!validate_api_key_format("openai", "xyz"));
        assert!(validate_api_key_format("anthropic", "sk-ant-123"));
        assert!(!validate_api_key_format("anthropic", "sk-123"));
        assert!(validate_api_key_format("google", "AIzaSy"));
    }

    #[test]
    fn selection_falls_back_to_defaults() {
        let empty = store(&[]);
        assert_eq!(selected_provider(&empty), "anthropic");
        assert_eq!(
            selected_model(&empty, "openai").as_deref(),
            Some("gpt-5-mini-2025-08-07")
        );
        assert_eq!(api_key(&empty, "openai"), None);

        // 空字符串视为未设置
        let blank = store(&[("aiProvider", ""), ("googleModel", "")]);
        assert_eq!(selected_provider(&blank), "anthropic");
        assert_eq!(
            selected_model(&blank, "google").as_deref(),
            Some("gemini-2.0-flash")
        );
    }

    #[test]
    fn selection_reads_stored_values() {
        let s = store(&[
            ("aiProvider", "google"),
            ("googleModel", "gemini-1.5-pro"),
            ("googleApiKey", "AIza-key"),
        ]);
        assert_eq!(selected_provider(&s), "google");
        assert_eq!(selected_model(&s, "google").as_deref(), Some("gemini-1.5-pro"));
        assert_eq!(api_key(&s, "google").as_deref(), Some("AIza-key"));
    }

    #[test]
    fn model_options_mark_selection() {
        let options = model_options("anthropic", Some("claude-3-5-haiku-20241022"));
        assert_eq!(options.len(), 3);
        let selected: Vec<_> = options.iter().filter(|o| o.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, "claude-3-5-haiku-20241022");

        let defaults = model_options("anthropic", None);
        assert!(defaults[0].selected);
    }

    #[test]
    fn snapshot_serializes_in_display_order() {
        let json = serde_json::to_string(&snapshot().unwrap()).unwrap();
        let anthropic = json.find("\"anthropic\"").unwrap();
        let openai = json.find("\"openai\"").unwrap();
        let google = json.find("\"google\"").unwrap();
        assert!(anthropic < openai && openai < google);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], REGISTRY_VERSION);
        assert_eq!(value["providers"]["openai"]["keyPrefix"], "sk-");
        assert_eq!(value["providers"]["google"]["name"], "Google (Gemini)");
        assert_eq!(
            value["providers"]["anthropic"]["models"][1]["id"],
            "claude-3-5-sonnet-20241022"
        );
    }

    #[test]
    fn storage_keys_cover_every_field() {
        let keys = settings_storage_keys();
        assert_eq!(keys.len(), 7);
        assert!(keys.contains(&"aiProvider".to_string()));
        assert!(keys.contains(&"claudeApiKey".to_string()));
        assert!(keys.contains(&"openaiModel".to_string()));
    }
}
