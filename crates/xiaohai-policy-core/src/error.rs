//! 策略引擎统一错误类型。
//!
//! 传播策略：
//! - 本枚举只承载“致命”错误：没有合法的结构化设置或无法触达目标配置单元时，
//!   整个应用/校验操作中止并以 `Err` 返回
//! - 单个键/单个值级别的可恢复问题不在此处建模，由报告结构
//!   （[`crate::report::ApplyReport`] / [`crate::report::CheckReport`]）承载
//!
//! 作者：小海策略工具项目组（自动生成）
//! 创建时间：2026-08-28
//! 修改时间：2026-08-28

use thiserror::Error;

use crate::parse::ParseError;

/// 应用/校验操作的致命错误。
#[derive(Debug, Error)]
pub enum PolicyError {
    /// 策略文件解析失败（无合法结构化设置，无法继续）。
    #[error("策略文件解析失败: {0}")]
    Parse(#[from] ParseError),

    /// 无法将账户名解析为 SID。
    #[error("无法解析用户账户: {user}: {detail}")]
    UserNotFound { user: String, detail: String },

    /// 用户配置单元数据文件（NTUSER.DAT）不存在。
    #[error("未找到用户 {user} 的配置单元文件: {path}")]
    ProfileNotFound { user: String, path: String },

    /// 加载配置单元失败（`reg load` 非零退出或启动失败）。
    #[error("加载配置单元 HKU\\{mount} 失败: {detail}")]
    Mount { mount: String, detail: String },

    /// 卸载配置单元失败（通常为句柄未释放）。
    #[error("卸载配置单元 HKU\\{mount} 失败: {detail}")]
    Unmount { mount: String, detail: String },

    /// 触发策略刷新失败（`gpupdate /force` 非零退出或启动失败）。
    #[error("触发策略刷新失败: {detail}")]
    Refresh { detail: String },
}
