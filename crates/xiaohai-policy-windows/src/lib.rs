//! Windows 平台能力封装（账户枚举、SID 解析、配置单元挂载、注册表应用/校验）。
//!
//! 目标：
//! - 将 Windows 专有 API 与系统操作集中封装，上层（CLI/引擎调用方）不直接依赖 Win32 细节
//! - 统一错误处理风格：底层封装以 `anyhow::Result` 返回，引擎边界映射为
//!   `xiaohai_policy_core::error::PolicyError` 的类型化错误
//!
//! 安全注意：
//! - 加载他人配置单元与写入 HKLM 需要管理员权限
//! - 绝不卸载操作开始前就已挂载的配置单元（属于活动用户会话，归操作系统所有）
//!
//! 平台说明：
//! - 触达注册表与 Win32 API 的模块仅在 Windows 目标上编译；
//!   引擎编排骨架与挂载状态模型跨平台编译（便于脱离真实注册表验证生命周期决策）
//!
//! 作者：小海策略工具项目组（自动生成）
//! 创建时间：2026-08-28
//! 修改时间：2026-08-28

#[cfg(windows)]
pub mod apply;
#[cfg(windows)]
pub mod elevation;
pub mod engine;
#[cfg(windows)]
mod exec;
pub mod hive;
#[cfg(windows)]
pub mod identity;
#[cfg(windows)]
pub mod refresh;
#[cfg(windows)]
pub mod users;
#[cfg(windows)]
pub mod verify;
