//! 策略设置模型定义。
//!
//! 该模块描述一次策略应用/校验需要的全部结构化输入：
//! - 值类型（封闭枚举：字符串/DWORD，未知类型标签回退为字符串）
//! - 类型化设置值（类型与值绑定在同一枚举中，校验时二者必须同时一致）
//! - 键路径作用域（`HKLM\` 前缀 → 机器作用域；否则相对已挂载用户配置单元）
//!
//! 约定：
//! - 同一键下重复的值名后写覆盖先写（与顺序应用语义一致）
//! - 跨块重复的键路径合并到同一个 [`KeyBlock`]
//!
//! 作者：小海策略工具项目组（自动生成）
//! 创建时间：2026-08-28
//! 修改时间：2026-08-28

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// 机器作用域键路径前缀。
pub const MACHINE_PREFIX: &str = "HKLM\\";

/// 注册表值类型（封闭枚举）。
///
/// 说明：
/// - 只建模文本导出格式实际出现的两类值；未知类型标签按约定回退为 [`ValueKind::Sz`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// 字符串（REG_SZ）。
    Sz,
    /// 32 位无符号整数（REG_DWORD）。
    Dword,
}

impl ValueKind {
    /// 将文本导出中的类型标签归一化为值类型。
    ///
    /// 参数：
    /// - `tag`：数据行冒号前的类型标签（大小写不敏感）
    ///
    /// 返回值：
    /// - `REG_DWORD`/`DWORD` → [`ValueKind::Dword`]
    /// - `REG_SZ`/`SZ` 以及任何未识别标签 → [`ValueKind::Sz`]（约定回退，不报错）
    pub fn from_tag(tag: &str) -> ValueKind {
        match tag.to_ascii_uppercase().as_str() {
            "REG_DWORD" | "DWORD" => ValueKind::Dword,
            _ => ValueKind::Sz,
        }
    }
}

/// 类型化设置值。
///
/// 说明：
/// - 类型与值绑定在同一枚举中；相等比较同时覆盖“存储类型”与“存储值”，
///   正好对应校验操作“类型与值都必须一致”的语义
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SettingValue {
    /// 字符串值（REG_SZ）。
    Sz(String),
    /// DWORD 值（REG_DWORD，十进制解析）。
    Dword(u32),
}

impl SettingValue {
    /// 返回该值对应的注册表类型标签（用于日志展示）。
    pub fn type_tag(&self) -> &'static str {
        match self {
            SettingValue::Sz(_) => "REG_SZ",
            SettingValue::Dword(_) => "REG_DWORD",
        }
    }
}

impl fmt::Display for SettingValue {
    /// 仅展示值本身（类型通过 [`SettingValue::type_tag`] 单独展示）。
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Sz(s) => f.write_str(s),
            SettingValue::Dword(v) => write!(f, "{v}"),
        }
    }
}

/// 一个注册表键下的全部期望值（值名 → 类型化值）。
pub type KeyBlock = BTreeMap<String, SettingValue>;

/// 一次策略应用/校验的全部结构化设置（键路径 → 键块）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySet {
    /// 键路径到键块的映射。
    pub keys: BTreeMap<String, KeyBlock>,
}

impl PolicySet {
    /// 向指定键路径插入一个值（键块不存在则创建；同名值后写覆盖先写）。
    pub fn insert(&mut self, key_path: &str, value_name: &str, value: SettingValue) {
        self.keys
            .entry(key_path.to_string())
            .or_default()
            .insert(value_name.to_string(), value);
    }

    /// 是否不包含任何设置。
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// 键路径作用域。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScope<'a> {
    /// 机器作用域：HKLM 下的剩余路径（已去掉 `HKLM\` 前缀）。
    Machine(&'a str),
    /// 用户作用域：相对已挂载配置单元根的路径。
    User(&'a str),
}

/// 根据前缀判断键路径作用域。
///
/// 规则：
/// - 以 `HKLM\` 开头 → 机器作用域，返回去掉前缀的剩余路径
/// - 否则 → 用户作用域，路径相对挂载名解析
pub fn classify_key_path(key_path: &str) -> KeyScope<'_> {
    match key_path.strip_prefix(MACHINE_PREFIX) {
        Some(rest) => KeyScope::Machine(rest),
        None => KeyScope::User(key_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// 验证类型标签归一化：大小写与带/不带 `REG_` 前缀等价，未知标签回退为字符串。
    fn value_kind_from_tag_normalizes() {
        assert_eq!(ValueKind::from_tag("dword"), ValueKind::Dword);
        assert_eq!(ValueKind::from_tag("DWORD"), ValueKind::Dword);
        assert_eq!(ValueKind::from_tag("REG_DWORD"), ValueKind::Dword);
        assert_eq!(ValueKind::from_tag("SZ"), ValueKind::Sz);
        assert_eq!(ValueKind::from_tag("reg_sz"), ValueKind::Sz);
        assert_eq!(ValueKind::from_tag("REG_BINARY"), ValueKind::Sz);
    }

    #[test]
    /// 验证键路径作用域判定：`HKLM\` 前缀进入机器作用域，其余进入用户作用域。
    fn classify_key_path_by_prefix() {
        assert_eq!(
            classify_key_path("HKLM\\Software\\Policies"),
            KeyScope::Machine("Software\\Policies")
        );
        assert_eq!(
            classify_key_path("Software\\Policies"),
            KeyScope::User("Software\\Policies")
        );
    }

    #[test]
    /// 验证同键同名值的“后写覆盖先写”合并语义。
    fn policy_set_last_write_wins() {
        let mut set = PolicySet::default();
        set.insert("Software\\Test", "Greeting", SettingValue::Sz("a".into()));
        set.insert("Software\\Test", "Greeting", SettingValue::Sz("b".into()));
        assert_eq!(
            set.keys["Software\\Test"]["Greeting"],
            SettingValue::Sz("b".into())
        );
    }
}
