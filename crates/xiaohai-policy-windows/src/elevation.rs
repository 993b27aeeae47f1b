//! 提权/权限相关检测。
//!
//! 作者：小海策略工具项目组（自动生成）
//! 创建时间：2026-08-28
//! 修改时间：2026-08-28

use anyhow::Result;
use windows::Win32::UI::Shell::IsUserAnAdmin;

/// 判断当前进程是否以管理员权限运行。
///
/// 返回值：
/// - `Ok(true)`：当前为管理员
/// - `Ok(false)`：当前非管理员
///
/// 异常处理：
/// - 该 Win32 API 本身不返回错误码；此处保留 `Result` 以统一上层调用风格。
///
/// 安全注意：
/// - 加载离线用户配置单元与写入 HKLM 均要求管理员；该检查仅用于提前给出
///   友好提示，不能作为完整的安全边界。
pub fn is_running_as_admin() -> Result<bool> {
    unsafe { Ok(IsUserAnAdmin().as_bool()) }
}
