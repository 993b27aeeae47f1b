//! 用户配置单元（hive）挂载管理。
//!
//! 生命周期策略：
//! - 操作开始时探测 `HKU\<SID>`：已挂载（用户在线）则直接以 SID 为挂载名使用，
//!   操作结束时绝不卸载（配置单元归活动会话所有，强行卸载会损坏会话）
//! - 未挂载（用户离线）则以“每次操作生成的临时挂载名”加载 NTUSER.DAT，
//!   操作结束时无论应用/校验成败都必须卸载
//! - 挂载名含随机 UUID，不同操作并发处理不同离线用户时不会互相冲突
//!
//! 权限要求：
//! - `reg load`/`reg unload` 需要管理员权限
//!
//! 作者：小海策略工具项目组（自动生成）
//! 创建时间：2026-08-28
//! 修改时间：2026-08-28

#[cfg(windows)]
use std::path::PathBuf;

use uuid::Uuid;
#[cfg(windows)]
use winreg::enums::{HKEY_LOCAL_MACHINE, HKEY_USERS};
#[cfg(windows)]
use winreg::RegKey;
#[cfg(windows)]
use xiaohai_policy_core::error::PolicyError;

#[cfg(windows)]
use crate::exec;

/// 一次应用/校验操作期间的配置单元挂载状态。
#[derive(Debug, Clone)]
pub struct HiveMount {
    /// 目标用户 SID 字符串。
    pub sid: String,
    /// `HKU` 下的挂载名（在线用户为 SID 本身；离线用户为临时名）。
    pub mount_name: String,
    /// 是否由本次操作加载（决定操作结束时是否卸载）。
    pub loaded_by_us: bool,
}

/// 探测指定 SID 的配置单元是否已挂载在 `HKU` 下。
#[cfg(windows)]
pub fn is_hive_mounted(sid: &str) -> bool {
    RegKey::predef(HKEY_USERS).open_subkey(sid).is_ok()
}

/// 生成本次操作专用的临时挂载名。
///
/// 返回值：
/// - `XiaoHaiPolicy_<uuid>` 形式的挂载名；每次调用都不同
pub fn temp_mount_name() -> String {
    format!("XiaoHaiPolicy_{}", Uuid::new_v4().simple())
}

/// 确保目标用户的配置单元可用，并返回挂载状态。
///
/// 参数：
/// - `username`：账户名（用于定位用户目录与错误信息）
/// - `sid`：账户 SID 字符串
///
/// 返回值：
/// - 在线用户：`mount_name = sid`，`loaded_by_us = false`
/// - 离线用户：加载 NTUSER.DAT 到临时挂载名，`loaded_by_us = true`
///
/// 异常处理：
/// - NTUSER.DAT 不存在 → [`PolicyError::ProfileNotFound`]
/// - `reg load` 失败 → [`PolicyError::Mount`]
#[cfg(windows)]
pub fn ensure_mounted(username: &str, sid: &str) -> Result<HiveMount, PolicyError> {
    if is_hive_mounted(sid) {
        return Ok(HiveMount {
            sid: sid.to_string(),
            mount_name: sid.to_string(),
            loaded_by_us: false,
        });
    }
    let mount_name = temp_mount_name();
    load_user_hive(username, sid, &mount_name)?;
    Ok(HiveMount {
        sid: sid.to_string(),
        mount_name,
        loaded_by_us: true,
    })
}

/// 加载指定用户的配置单元文件到 `HKU\<mount_name>`。
///
/// 异常处理：
/// - 见 [`ensure_mounted`]
#[cfg(windows)]
pub fn load_user_hive(username: &str, sid: &str, mount_name: &str) -> Result<(), PolicyError> {
    let ntuser = profile_dir(sid, username).join("NTUSER.DAT");
    if !ntuser.exists() {
        return Err(PolicyError::ProfileNotFound {
            user: username.to_string(),
            path: ntuser.display().to_string(),
        });
    }
    exec::run_checked(
        "reg",
        &[
            "load",
            &format!("HKU\\{mount_name}"),
            &ntuser.to_string_lossy(),
        ],
    )
    .map_err(|e| PolicyError::Mount {
        mount: mount_name.to_string(),
        detail: format!("{e:#}"),
    })
}

/// 卸载 `HKU\<mount_name>` 下的配置单元。
///
/// 异常处理：
/// - `reg unload` 失败（通常是仍有句柄未释放）→ [`PolicyError::Unmount`]
#[cfg(windows)]
pub fn unload_user_hive(mount_name: &str) -> Result<(), PolicyError> {
    exec::run_checked("reg", &["unload", &format!("HKU\\{mount_name}")]).map_err(|e| {
        PolicyError::Unmount {
            mount: mount_name.to_string(),
            detail: format!("{e:#}"),
        }
    })
}

/// 解析用户目录。
///
/// 实现策略：
/// - 优先读取 `ProfileList\<SID>` 的 `ProfileImagePath`（系统记录的真实位置）
/// - 读取失败时回退为常规约定 `C:\Users\<username>`
#[cfg(windows)]
fn profile_dir(sid: &str, username: &str) -> PathBuf {
    let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
    let key_path =
        format!("SOFTWARE\\Microsoft\\Windows NT\\CurrentVersion\\ProfileList\\{sid}");
    if let Ok(key) = hklm.open_subkey(&key_path) {
        if let Ok(path) = key.get_value::<String, _>("ProfileImagePath") {
            return PathBuf::from(path);
        }
    }
    PathBuf::from(format!("C:\\Users\\{username}"))
}
