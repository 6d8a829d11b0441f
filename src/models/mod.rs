//! # 数据模型模块
//!
//! 定义与前端交换的数据结构，全部按 camelCase 序列化：
//! - `settings` - AI 设置记录和设置通道消息
//! - `dialog` - 原生对话框的参数和结果
//! - `screenshot` - 编码后的图片和截图扫描结果

pub mod dialog;
pub mod screenshot;
pub mod settings;
