//! 结构化设置写入注册表。
//!
//! 语义：
//! - 每个键路径独立处理：目标键不存在则创建（幂等），键下每个值按解析出的
//!   类型写入并覆盖同名旧值
//! - 单个键失败（权限、路径非法等）记录为失败项并继续处理其余键——
//!   “部分应用”是可接受的结果，不视为整个操作失败
//!
//! 作者：小海策略工具项目组（自动生成）
//! 创建时间：2026-08-28
//! 修改时间：2026-08-28

use anyhow::{Context, Result};
use winreg::enums::{HKEY_LOCAL_MACHINE, HKEY_USERS};
use winreg::{RegKey, HKEY};
use xiaohai_policy_core::model::{classify_key_path, KeyBlock, KeyScope, PolicySet, SettingValue};
use xiaohai_policy_core::report::KeyFailure;

/// 将键路径解析为注册表根与子键路径。
///
/// 规则：
/// - `HKLM\` 前缀 → `HKEY_LOCAL_MACHINE` 下的剩余路径
/// - 其余 → `HKEY_USERS` 下的 `<mount_name>\<键路径>`
pub(crate) fn resolve_target(key_path: &str, mount_name: &str) -> (HKEY, String) {
    match classify_key_path(key_path) {
        KeyScope::Machine(rest) => (HKEY_LOCAL_MACHINE, rest.to_string()),
        KeyScope::User(rel) => (HKEY_USERS, format!("{mount_name}\\{rel}")),
    }
}

/// 将整个策略集写入注册表（逐键尽力而为）。
///
/// 参数：
/// - `settings`：结构化设置
/// - `mount_name`：用户作用域键的挂载名
/// - `log`：进度日志接收器（每键一行成功/失败）
///
/// 返回值：
/// - `(成功键路径列表, 失败记录列表)`；失败不中断其余键
pub fn apply_settings(
    settings: &PolicySet,
    mount_name: &str,
    log: &mut dyn FnMut(&str),
) -> (Vec<String>, Vec<KeyFailure>) {
    let mut applied = Vec::new();
    let mut failed = Vec::new();
    for (key_path, block) in &settings.keys {
        match apply_key_path(key_path, block, mount_name) {
            Ok(()) => {
                log(&format!("✔ 已应用: {key_path}"));
                applied.push(key_path.clone());
            }
            Err(e) => {
                log(&format!("❌ 应用失败: {key_path}: {e:#}"));
                failed.push(KeyFailure {
                    key_path: key_path.clone(),
                    detail: format!("{e:#}"),
                });
            }
        }
    }
    (applied, failed)
}

/// 写入单个键路径下的全部值（键不存在则创建）。
fn apply_key_path(key_path: &str, block: &KeyBlock, mount_name: &str) -> Result<()> {
    let (root, subkey) = resolve_target(key_path, mount_name);
    let (key, _disp) = RegKey::predef(root)
        .create_subkey(&subkey)
        .with_context(|| format!("打开/创建注册表键失败: {subkey}"))?;
    write_key_block(&key, block)
}

/// 将一个键块写入已打开的注册表键。
///
/// 参数：
/// - `key`：已打开（可写）的注册表键
/// - `block`：值名 → 类型化值
///
/// 异常处理：
/// - 任一值写入失败返回错误（由调用方按键粒度记录）
pub fn write_key_block(key: &RegKey, block: &KeyBlock) -> Result<()> {
    for (name, value) in block {
        match value {
            SettingValue::Sz(s) => key
                .set_value(name, s)
                .with_context(|| format!("写入 REG_SZ 值失败: {name}"))?,
            SettingValue::Dword(v) => key
                .set_value(name, v)
                .with_context(|| format!("写入 REG_DWORD 值失败: {name}"))?,
        }
    }
    Ok(())
}
