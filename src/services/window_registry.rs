//! # 窗口注册表服务
//!
//! 维护"窗口角色 → 存活窗口"的映射，保证每个角色最多只有一个窗口实例。
//! `create_or_focus` 是创建窗口的唯一入口；窗口销毁后由 shell 层调用
//! `release` 移除对应条目。
//!
//! ## 线程安全
//! 内部 `Mutex` 只保护映射本身的读写，聚焦和创建窗口时**不持有锁**：
//! 这两个操作在非主线程上会等待事件循环应答，而主线程的菜单、窗口事件
//! 处理函数同样需要访问注册表，持锁等待会造成死锁。
//!
//! 对窗口句柄类型泛型化，便于在没有 webview 的情况下测试窗口策略。

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Mutex;

/// 应用的三种窗口角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowRole {
    Main,
    About,
    Preferences,
}

impl WindowRole {
    /// Webview 标签，capability 文件中也使用同一标签
    pub fn label(self) -> &'static str {
        match self {
            WindowRole::Main => "main",
            WindowRole::About => "about",
            WindowRole::Preferences => "preferences",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "main" => Some(WindowRole::Main),
            "about" => Some(WindowRole::About),
            "preferences" => Some(WindowRole::Preferences),
            _ => None,
        }
    }
}

/// 注册表对窗口句柄的最小要求
pub trait WindowHandle: Clone {
    fn focus(&self) -> Result<(), String>;
}

/// `create_or_focus` 实际执行的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAction {
    Created,
    Focused,
}

pub struct WindowRegistry<H> {
    windows: Mutex<HashMap<WindowRole, H>>,
}

impl<H: WindowHandle> WindowRegistry<H> {
    pub fn new() -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// 聚焦 `role` 的已有窗口，不存在时调用 `create` 创建
    ///
    /// 锁只在查表和登记时短暂持有，`focus()` 与 `create()` 都在锁外执行。
    /// 若创建期间另一个请求已登记了同一角色的窗口，以先登记者为准：
    /// 聚焦已登记的窗口并返回 `Focused`。`create` 应复用同标签的已有窗口
    /// （Tauri 的窗口标签唯一），因此并发请求不会产生重复窗口。
    ///
    /// # 参数
    /// - `role` - 目标窗口角色
    /// - `create` - 创建窗口的闭包，可以安全地再次访问注册表
    ///
    /// # 错误
    /// 创建或聚焦失败时返回错误信息；创建失败不会留下注册表条目。
    pub fn create_or_focus<F>(&self, role: WindowRole, create: F) -> Result<WindowAction, String>
    where
        F: FnOnce() -> Result<H, String>,
    {
        if let Some(existing) = self.get(role) {
            existing.focus()?;
            return Ok(WindowAction::Focused);
        }

        let handle = create()?;

        let registered = {
            let mut windows = self
                .windows
                .lock()
                .map_err(|e| format!("Window registry lock poisoned: {}", e))?;
            match windows.entry(role) {
                Entry::Occupied(entry) => Some(entry.get().clone()),
                Entry::Vacant(entry) => {
                    entry.insert(handle);
                    None
                }
            }
        };

        match registered {
            Some(existing) => {
                existing.focus()?;
                Ok(WindowAction::Focused)
            }
            None => Ok(WindowAction::Created),
        }
    }

    /// `role` 当前的存活窗口
    pub fn get(&self, role: WindowRole) -> Option<H> {
        self.windows.lock().ok()?.get(&role).cloned()
    }

    /// 移除 `role` 的窗口条目，在窗口销毁后调用
    pub fn release(&self, role: WindowRole) -> Option<H> {
        self.windows.lock().ok()?.remove(&role)
    }

    #[cfg(test)]
    pub fn is_open(&self, role: WindowRole) -> bool {
        self.windows
            .lock()
            .map(|windows| windows.contains_key(&role))
            .unwrap_or(false)
    }
}

impl<H: WindowHandle> Default for WindowRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, OnceLock};

    use super::*;

    #[derive(Clone)]
    struct FakeWindow {
        focused: Arc<AtomicUsize>,
    }

    impl WindowHandle for FakeWindow {
        fn focus(&self) -> Result<(), String> {
            self.focused.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn second_open_focuses_existing_window() {
        let registry = WindowRegistry::new();
        let created = AtomicUsize::new(0);
        let focused = Arc::new(AtomicUsize::new(0));

        let open = || {
            registry.create_or_focus(WindowRole::About, || {
                created.fetch_add(1, Ordering::SeqCst);
                Ok(FakeWindow {
                    focused: focused.clone(),
                })
            })
        };

        assert_eq!(open().unwrap(), WindowAction::Created);
        assert_eq!(open().unwrap(), WindowAction::Focused);
        assert_eq!(created.load(Ordering::SeqCst), 1);
        assert_eq!(focused.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn released_role_is_created_again() {
        let registry = WindowRegistry::new();
        let make = || {
            Ok(FakeWindow {
                focused: Arc::new(AtomicUsize::new(0)),
            })
        };

        registry.create_or_focus(WindowRole::Preferences, make).unwrap();
        assert!(registry.is_open(WindowRole::Preferences));
        assert!(registry.release(WindowRole::Preferences).is_some());
        assert!(!registry.is_open(WindowRole::Preferences));
        assert_eq!(
            registry.create_or_focus(WindowRole::Preferences, make).unwrap(),
            WindowAction::Created
        );
    }

    #[test]
    fn roles_are_independent_and_failures_leave_no_entry() {
        let registry: WindowRegistry<FakeWindow> = WindowRegistry::new();
        let result = registry.create_or_focus(WindowRole::About, || Err("boom".to_string()));
        assert_eq!(result, Err("boom".to_string()));
        assert!(!registry.is_open(WindowRole::About));
        assert!(registry.get(WindowRole::Main).is_none());
        assert!(registry.release(WindowRole::Main).is_none());
    }

    #[test]
    fn create_may_touch_the_registry_from_another_thread() {
        let registry = WindowRegistry::new();
        let focused = Arc::new(AtomicUsize::new(0));
        registry
            .create_or_focus(WindowRole::Main, || {
                Ok(FakeWindow {
                    focused: focused.clone(),
                })
            })
            .unwrap();

        // 窗口在工作线程中创建时，主线程的菜单和窗口事件处理仍会访问注册表
        let action = registry.create_or_focus(WindowRole::Preferences, || {
            std::thread::scope(|scope| {
                scope
                    .spawn(|| {
                        assert!(registry.get(WindowRole::Main).is_some());
                        assert!(registry.release(WindowRole::About).is_none());
                    })
                    .join()
                    .unwrap();
            });
            Ok(FakeWindow {
                focused: Arc::new(AtomicUsize::new(0)),
            })
        });

        assert_eq!(action.unwrap(), WindowAction::Created);
        assert!(registry.is_open(WindowRole::Preferences));
    }

    #[test]
    fn focus_may_touch_the_registry_from_another_thread() {
        static REGISTRY: OnceLock<WindowRegistry<SharedWindow>> = OnceLock::new();

        #[derive(Clone)]
        struct SharedWindow;

        impl WindowHandle for SharedWindow {
            fn focus(&self) -> Result<(), String> {
                std::thread::spawn(|| REGISTRY.get().and_then(|r| r.get(WindowRole::Main)))
                    .join()
                    .map(|_| ())
                    .map_err(|_| "focus thread panicked".to_string())
            }
        }

        let registry = REGISTRY.get_or_init(WindowRegistry::new);
        registry
            .create_or_focus(WindowRole::Main, || Ok(SharedWindow))
            .unwrap();
        assert_eq!(
            registry
                .create_or_focus(WindowRole::Main, || Ok(SharedWindow))
                .unwrap(),
            WindowAction::Focused
        );
    }

    #[test]
    fn window_registered_during_creation_wins() {
        let registry = WindowRegistry::new();
        let first_focus = Arc::new(AtomicUsize::new(0));

        let action = registry.create_or_focus(WindowRole::About, || {
            std::thread::scope(|scope| {
                scope
                    .spawn(|| {
                        registry
                            .create_or_focus(WindowRole::About, || {
                                Ok(FakeWindow {
                                    focused: first_focus.clone(),
                                })
                            })
                            .unwrap();
                    })
                    .join()
                    .unwrap();
            });
            Ok(FakeWindow {
                focused: Arc::new(AtomicUsize::new(0)),
            })
        });

        assert_eq!(action.unwrap(), WindowAction::Focused);
        assert_eq!(first_focus.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn labels_round_trip() {
        for role in [WindowRole::Main, WindowRole::About, WindowRole::Preferences] {
            assert_eq!(WindowRole::from_label(role.label()), Some(role));
        }
        assert_eq!(WindowRole::from_label("devtools"), None);
    }
}
