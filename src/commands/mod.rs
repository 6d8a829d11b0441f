//! # Tauri Command 处理模块
//!
//! 本模块包含所有注册到 Tauri 的 command 处理函数。
//! 每个子模块对应一个功能域：
//! - `dialogs` - 原生打开/保存对话框和截图导入
//! - `screenshots` - 最新截图运行的加载与扫描
//! - `settings` - AI 设置、提供商注册表、项目配置
//! - `windows` - 关于/偏好设置窗口、外部链接、平台信息

pub mod dialogs;
pub mod screenshots;
pub mod settings;
pub mod windows;
