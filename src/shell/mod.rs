//! # 桌面外壳模块
//!
//! 应用的原生界面层：
//! - `windows` - 窗口创建与生命周期
//! - `menu` - 应用菜单栏
//! - `external` - 外部链接

pub mod external;
pub mod menu;
pub mod windows;
