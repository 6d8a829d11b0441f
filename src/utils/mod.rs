//! # 工具函数模块
//! - `path` - 配置文件/截图目录路径解析和路径组件检查

pub mod path;
