//! 系统策略刷新触发。
//!
//! 说明：
//! - 应用成功后触发一次 `gpupdate /force`，让系统立即重新评估生效策略
//! - 同步等待命令退出；触发失败对本次应用是硬错误
//!
//! 作者：小海策略工具项目组（自动生成）
//! 创建时间：2026-08-28
//! 修改时间：2026-08-28

use xiaohai_policy_core::error::PolicyError;

use crate::exec;

/// 触发系统策略刷新（`gpupdate /force`）。
///
/// 异常处理：
/// - 启动失败或非零退出 → [`PolicyError::Refresh`]
pub fn trigger_policy_refresh() -> Result<(), PolicyError> {
    exec::run_checked("gpupdate", &["/force"]).map_err(|e| PolicyError::Refresh {
        detail: format!("{e:#}"),
    })
}
