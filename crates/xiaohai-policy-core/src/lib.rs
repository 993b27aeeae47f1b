//! 小海策略工具核心库（跨平台/不依赖 Windows API）。
//!
//! 功能：
//! - 解析本地组策略文本导出格式（LGPO 文本格式）为结构化设置模型
//! - 定义设置模型（键路径 → 值名 → 类型化值）与作用域规则（HKLM 前缀）
//! - 定义应用/校验结果报告模型（可序列化为 JSON 落盘）
//! - 定义策略引擎统一错误类型（解析/账户/配置单元/刷新）
//!
//! 约定：
//! - 本库只做解析与模型定义，不执行任何注册表/系统修改
//! - 实际的配置单元挂载与注册表读写在 `xiaohai-policy-windows` 中实现
//!
//! 作者：小海策略工具项目组（自动生成）
//! 创建时间：2026-08-28
//! 修改时间：2026-08-28

pub mod error;
pub mod model;
pub mod parse;
pub mod report;
