//! # 设置通道服务
//!
//! AI 设置保存在主窗口的 `localStorage` 中。宿主不会向前端注入脚本读写设置，
//! 而是发送类型化的 `SettingsRequest`，等待对应的 `SettingsReply`：
//!
//! ```text
//! host                                   main window
//!  | -- settings-bridge://request {id,op} -->  |
//!  | <-- invoke settings_bridge_respond(id) -- |
//! ```
//!
//! ## 失败处理
//! 请求无法送达、前端返回错误或超时未应答都视为失败：
//! `get_settings` 返回 `Settings::fallback()`，`save_settings` 返回
//! `success: false`。只接受主窗口发来的应答。
//!
//! ## 线程安全
//! 待应答表使用 `std::sync::Mutex`，不会跨 `.await` 持有。

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::oneshot;

use crate::models::settings::{
    SaveSettingsResult, Settings, SettingsOp, SettingsReply, SettingsRequest,
};
use crate::services::registry;
use crate::services::window_registry::WindowRole;

/// 前端监听设置请求的事件名
pub const SETTINGS_REQUEST_EVENT: &str = "settings-bridge://request";

/// 等待前端应答的超时时间
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(3);

/// 将请求投递给持有设置存储的前端
pub trait SettingsTransport: Send + Sync {
    fn dispatch(&self, request: &SettingsRequest) -> Result<(), String>;
}

/// Tauri managed state：把前端应答匹配到等待中的请求
pub struct SettingsBridge {
    next_id: AtomicU64,
    pending: Mutex<HashMap<u64, oneshot::Sender<SettingsReply>>>,
    reply_timeout: Duration,
}

impl SettingsBridge {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_REPLY_TIMEOUT)
    }

    pub fn with_timeout(reply_timeout: Duration) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            pending: Mutex::new(HashMap::new()),
            reply_timeout,
        }
    }

    fn take_pending(&self, request_id: u64) -> Option<oneshot::Sender<SettingsReply>> {
        self.pending.lock().ok()?.remove(&request_id)
    }

    /// 仍在等待应答的请求数
    #[cfg(test)]
    pub fn pending_count(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// 发送 `op` 并等待前端应答
    ///
    /// # 参数
    /// - `transport` - 请求投递方式（运行时为主窗口事件）
    /// - `op` - 读或写操作
    ///
    /// # 错误
    /// 投递失败、超时、请求被丢弃，或前端应答 `ok: false` 时返回错误信息
    pub async fn round_trip(
        &self,
        transport: &impl SettingsTransport,
        op: SettingsOp,
    ) -> Result<SettingsReply, String> {
        let request_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .map_err(|e| format!("Settings channel lock poisoned: {}", e))?
            .insert(request_id, tx);

        let request = SettingsRequest { request_id, op };
        if let Err(e) = transport.dispatch(&request) {
            self.take_pending(request_id);
            return Err(format!("Failed to deliver settings request: {}", e));
        }

        let reply = match tokio::time::timeout(self.reply_timeout, rx).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(_)) => return Err("Settings request was dropped".to_string()),
            Err(_) => {
                self.take_pending(request_id);
                return Err(format!(
                    "No settings reply within {} ms",
                    self.reply_timeout.as_millis()
                ));
            }
        };

        if reply.ok {
            Ok(reply)
        } else {
            Err(reply
                .error
                .unwrap_or_else(|| "Settings request failed in the UI".to_string()))
        }
    }

    /// 将前端应答交给等待中的请求
    ///
    /// # 返回值
    /// 没有该 id 的待应答请求（迟到或未知的应答）时返回 `false`
    pub fn resolve(&self, request_id: u64, reply: SettingsReply) -> bool {
        match self.take_pending(request_id) {
            Some(tx) => tx.send(reply).is_ok(),
            None => {
                log::warn!("Ignoring settings reply for unknown request {}", request_id);
                false
            }
        }
    }

    /// 处理来自某个窗口的应答，只接受主窗口
    ///
    /// 设置只由主窗口持有，其他窗口（关于、偏好设置）的应答一律忽略，
    /// 对应请求保持等待。
    ///
    /// # 参数
    /// - `sender_label` - 发送应答的窗口标签
    /// - `request_id` - 请求 id
    /// - `reply` - 应答内容
    pub fn resolve_from(
        &self,
        sender_label: &str,
        request_id: u64,
        reply: SettingsReply,
    ) -> bool {
        if sender_label != WindowRole::Main.label() {
            log::warn!(
                "Ignoring settings reply {} from window {}",
                request_id,
                sender_label
            );
            return false;
        }
        self.resolve(request_id, reply)
    }

    /// 读取设置记录，未设置的模型字段合并注册表默认值
    ///
    /// 不会失败：任何通道错误都返回 `Settings::fallback()`。
    pub async fn get_settings(&self, transport: &impl SettingsTransport) -> Settings {
        let op = SettingsOp::Get {
            keys: registry::settings_storage_keys(),
        };
        match self.round_trip(transport, op).await {
            Ok(reply) => Settings::from_store(&reply.into_store()),
            Err(e) => {
                log::warn!("get_settings falling back to defaults: {}", e);
                Settings::fallback()
            }
        }
    }

    /// 将设置记录写入前端存储
    ///
    /// 未知提供商在发送前即被拒绝；API Key 前缀不符只记录警告，仍然保存。
    ///
    /// # 返回值
    /// `{ success: true }`，或 `{ success: false, error }`
    pub async fn save_settings(
        &self,
        transport: &impl SettingsTransport,
        settings: &Settings,
    ) -> SaveSettingsResult {
        if registry::provider(&settings.provider).is_none() {
            return SaveSettingsResult::failed(format!(
                "Unknown provider: {}",
                settings.provider
            ));
        }
        for provider in settings.malformed_keys() {
            log::warn!("Saving {} API key without the expected prefix", provider);
        }

        let op = SettingsOp::Set {
            entries: settings.to_entries(),
        };
        match self.round_trip(transport, op).await {
            Ok(_) => SaveSettingsResult::ok(),
            Err(e) => {
                log::error!("save_settings failed: {}", e);
                SaveSettingsResult::failed(e)
            }
        }
    }
}

impl Default for SettingsBridge {
    fn default() -> Self {
        Self::new()
    }
}
