//! 策略引擎编排（应用/校验两个顶层操作）。
//!
//! 流程（两个操作共享前半段）：
//! 1) 账户名 → SID
//! 2) 确保配置单元可用（在线直接用 SID；离线加载到临时挂载名）
//! 3) 解析策略文件
//! 4) 应用（逐键写入）或校验（逐值比对）
//! 5) 若配置单元由本次操作加载，无论 3)/4) 成败都卸载
//! 6) 仅应用操作：触发系统策略刷新
//!
//! 错误传播策略：
//! - 解析/账户/挂载/卸载/刷新属于致命错误，以 [`PolicyError`] 返回；
//!   两个操作的错误面完全对称
//! - 单键/单值级别的问题进入报告结构，不中断操作
//!
//! 结构说明：
//! - 编排骨架通过 [`HiveOps`] 访问身份解析与挂载/卸载，生产实现为
//!   [`SystemHive`]；卸载时机等生命周期决策因此可以脱离真实注册表单独验证
//!
//! 作者：小海策略工具项目组（自动生成）
//! 创建时间：2026-08-28
//! 修改时间：2026-08-28

use std::path::Path;

use xiaohai_policy_core::error::PolicyError;
use xiaohai_policy_core::model::PolicySet;
use xiaohai_policy_core::parse::parse_policy_file;
#[cfg(windows)]
use xiaohai_policy_core::report::{ApplyReport, CheckReport};

use crate::hive::HiveMount;
#[cfg(windows)]
use crate::{apply, hive, identity, refresh, verify};

/// 配置单元操作接口（身份解析 + 挂载/卸载）。
pub trait HiveOps {
    /// 将账户名解析为 SID 字符串。
    fn resolve_sid(&self, username: &str) -> Result<String, PolicyError>;

    /// 确保目标用户的配置单元可用，返回挂载状态。
    fn ensure_mounted(&self, username: &str, sid: &str) -> Result<HiveMount, PolicyError>;

    /// 卸载 `HKU\<mount_name>` 下的配置单元。
    fn unload(&self, mount_name: &str) -> Result<(), PolicyError>;
}

/// 生产实现：直连 Win32 身份解析与 `reg load`/`reg unload`。
#[cfg(windows)]
pub struct SystemHive;

#[cfg(windows)]
impl HiveOps for SystemHive {
    fn resolve_sid(&self, username: &str) -> Result<String, PolicyError> {
        identity::lookup_sid_string(username).map_err(|e| PolicyError::UserNotFound {
            user: username.to_string(),
            detail: format!("{e:#}"),
        })
    }

    fn ensure_mounted(&self, username: &str, sid: &str) -> Result<HiveMount, PolicyError> {
        hive::ensure_mounted(username, sid)
    }

    fn unload(&self, mount_name: &str) -> Result<(), PolicyError> {
        hive::unload_user_hive(mount_name)
    }
}

/// 将策略文件应用到目标用户。
///
/// 参数：
/// - `username`：目标账户名
/// - `policy_file`：策略文件路径
/// - `log`：进度日志接收器（由前端提供并负责展示）
///
/// 返回值：
/// - 成功：应用报告（含逐键成功/失败明细；存在失败键不算整体失败）
///
/// 异常处理：
/// - 致命错误见 [`PolicyError`]；配置单元若由本次调用加载，
///   即使解析/应用阶段失败也会先卸载再返回错误
#[cfg(windows)]
pub fn apply_policy(
    username: &str,
    policy_file: &Path,
    log: &mut dyn FnMut(&str),
) -> Result<ApplyReport, PolicyError> {
    let report = with_mounted_hive(
        &SystemHive,
        username,
        policy_file,
        log,
        |settings, mount_name, log| {
            log(&format!("开始应用 {} 个注册表键", settings.keys.len()));
            let (applied, failed) = apply::apply_settings(settings, mount_name, log);
            let mut report = ApplyReport::new(username, &policy_file.display().to_string());
            report.applied_keys = applied;
            report.failed_keys = failed;
            report
        },
    )?;

    refresh::trigger_policy_refresh()?;
    log("✔ 已触发策略刷新 (gpupdate /force)");
    Ok(report)
}

/// 校验目标用户的注册表现状是否与策略文件一致。
///
/// 参数与错误面与 [`apply_policy`] 完全对称；不触发策略刷新。
///
/// 返回值：
/// - 成功：校验报告；`report.all_match()` 即总体一致
#[cfg(windows)]
pub fn check_policy(
    username: &str,
    policy_file: &Path,
    log: &mut dyn FnMut(&str),
) -> Result<CheckReport, PolicyError> {
    with_mounted_hive(
        &SystemHive,
        username,
        policy_file,
        log,
        |settings, mount_name, log| {
            log(&format!("开始校验 {} 个注册表键", settings.keys.len()));
            let (matched, mismatches) = verify::check_settings(settings, mount_name, log);
            let mut report = CheckReport::new(username, &policy_file.display().to_string());
            report.matched = matched;
            report.mismatches = mismatches;
            report
        },
    )
}

/// 两个顶层操作的公共骨架：解析身份、挂载、解析文件、执行、按需卸载。
///
/// 卸载保证：
/// - 操作开始前就已挂载的配置单元（`loaded_by_us == false`）绝不卸载
/// - 只要配置单元由本次调用加载，解析或执行阶段失败后仍会尝试卸载；
///   原始错误优先于卸载错误返回
#[cfg_attr(not(windows), allow(dead_code))]
fn with_mounted_hive<T>(
    ops: &dyn HiveOps,
    username: &str,
    policy_file: &Path,
    log: &mut dyn FnMut(&str),
    run: impl FnOnce(&PolicySet, &str, &mut dyn FnMut(&str)) -> T,
) -> Result<T, PolicyError> {
    let sid = ops.resolve_sid(username)?;
    log(&format!("用户 {username} 的 SID: {sid}"));

    let mount = ops.ensure_mounted(username, &sid)?;
    if mount.loaded_by_us {
        log(&format!("已加载配置单元: HKU\\{}", mount.mount_name));
    } else {
        log("配置单元已在线，直接使用（操作结束后不卸载）");
    }

    let outcome = match parse_policy_file(policy_file) {
        Ok(settings) => Ok(run(&settings, &mount.mount_name, log)),
        Err(e) => Err(PolicyError::from(e)),
    };

    let unload = if mount.loaded_by_us {
        match ops.unload(&mount.mount_name) {
            Ok(()) => {
                log(&format!("已卸载配置单元: HKU\\{}", mount.mount_name));
                Ok(())
            }
            Err(e) => {
                log(&format!("❌ 卸载配置单元失败: {e}"));
                Err(e)
            }
        }
    } else {
        Ok(())
    };

    let value = outcome?;
    unload?;
    Ok(value)
}
