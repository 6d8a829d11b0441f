//! # 核心服务模块
//!
//! 与 Tauri command 层解耦的业务逻辑：
//! - `registry` - AI 提供商/模型注册表及其访问函数
//! - `settings_bridge` - 宿主与前端之间的类型化设置通道
//! - `scanner` - 截图运行目录扫描
//! - `media` - 图片 MIME 识别和 data URL 编码
//! - `config` - `dosio.config.json` 读取
//! - `window_registry` - 每种窗口角色只保留一个实例
//! - `dialog_gate` - 每种原生对话框同时只显示一个

pub mod config;
pub mod dialog_gate;
pub mod media;
pub mod registry;
pub mod scanner;
pub mod settings_bridge;
pub mod window_registry;
