//! 注册表现状与期望设置的比对。
//!
//! 语义：
//! - 逐键只读打开（绝不创建）：键缺失记为键级不一致，继续比对其余键
//! - 逐值比对：值缺失、存储类型不符、存储值不符均记为不一致；
//!   类型与值完全一致才记为匹配
//! - 永不短路：总体结果是全部逐值比对的合取
//!
//! 作者：小海策略工具项目组（自动生成）
//! 创建时间：2026-08-28
//! 修改时间：2026-08-28

use winreg::enums::{REG_DWORD, REG_SZ};
use winreg::types::FromRegValue;
use winreg::{RegKey, RegValue};
use xiaohai_policy_core::model::{KeyBlock, PolicySet, SettingValue};
use xiaohai_policy_core::report::ValueMismatch;

use crate::apply::resolve_target;

/// 比对整个策略集与注册表现状。
///
/// 参数：
/// - `settings`：期望设置
/// - `mount_name`：用户作用域键的挂载名
/// - `log`：进度日志接收器（每值一行匹配/不一致）
///
/// 返回值：
/// - `(匹配项列表, 不一致列表)`；`mismatches.is_empty()` 即总体一致
pub fn check_settings(
    settings: &PolicySet,
    mount_name: &str,
    log: &mut dyn FnMut(&str),
) -> (Vec<String>, Vec<ValueMismatch>) {
    let mut matched = Vec::new();
    let mut mismatches = Vec::new();
    for (key_path, block) in &settings.keys {
        let (root, subkey) = resolve_target(key_path, mount_name);
        let key = match RegKey::predef(root).open_subkey(&subkey) {
            Ok(k) => k,
            Err(e) => {
                log(&format!("❌ 缺少注册表键: {key_path} ({e})"));
                mismatches.push(ValueMismatch {
                    key_path: key_path.clone(),
                    value_name: None,
                    expected: None,
                    found: None,
                });
                continue;
            }
        };
        check_key_block(&key, key_path, block, log, &mut matched, &mut mismatches);
    }
    (matched, mismatches)
}

/// 比对一个已打开注册表键下的全部期望值。
///
/// 参数：
/// - `key`：已打开（只读）的注册表键
/// - `key_path`：策略文件中的原始键路径（日志/报告用）
/// - `block`：期望的值名 → 类型化值
/// - `log`：日志接收器
/// - `matched` / `mismatches`：结果累积器
pub fn check_key_block(
    key: &RegKey,
    key_path: &str,
    block: &KeyBlock,
    log: &mut dyn FnMut(&str),
    matched: &mut Vec<String>,
    mismatches: &mut Vec<ValueMismatch>,
) {
    for (name, expected) in block {
        let raw = match key.get_raw_value(name) {
            Ok(raw) => raw,
            Err(_) => {
                log(&format!("❌ 缺少值: {key_path}\\{name}"));
                mismatches.push(ValueMismatch {
                    key_path: key_path.to_string(),
                    value_name: Some(name.clone()),
                    expected: Some(describe_expected(expected)),
                    found: None,
                });
                continue;
            }
        };
        let found = decode_raw(&raw);
        if found.as_ref() == Some(expected) {
            log(&format!("✔ 匹配: {key_path}\\{name}"));
            matched.push(format!("{key_path}\\{name}"));
        } else {
            let found_repr = describe_raw(&raw);
            log(&format!(
                "❌ 不匹配: {key_path}\\{name} (期望: {}, 实际: {found_repr})",
                describe_expected(expected)
            ));
            mismatches.push(ValueMismatch {
                key_path: key_path.to_string(),
                value_name: Some(name.clone()),
                expected: Some(describe_expected(expected)),
                found: Some(found_repr),
            });
        }
    }
}

/// 将注册表原始值解码为类型化设置值。
///
/// 返回值：
/// - `REG_SZ` → `Sz`，`REG_DWORD` → `Dword`
/// - 其他存储类型或解码失败 → `None`（与任何期望值都不一致）
fn decode_raw(raw: &RegValue) -> Option<SettingValue> {
    match raw.vtype {
        REG_SZ => String::from_reg_value(raw).ok().map(SettingValue::Sz),
        REG_DWORD => u32::from_reg_value(raw).ok().map(SettingValue::Dword),
        _ => None,
    }
}

/// 期望值的展示形式（含类型标签）。
fn describe_expected(v: &SettingValue) -> String {
    format!("{}:{v}", v.type_tag())
}

/// 注册表实际值的展示形式（含存储类型）。
fn describe_raw(raw: &RegValue) -> String {
    format!("{:?}:{raw}", raw.vtype)
}
