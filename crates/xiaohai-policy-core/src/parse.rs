//! 本地组策略文本导出格式解析。
//!
//! 输入格式（行式，WINDOWS-1252 编码）：
//! - 注释行（以 `;` 开头）与空行在结构解析前丢弃
//! - 块 = 作用域标记行（`Computer` 或 `User`）+ 键路径行 + 零个或多个
//!   （值名行，数据行）对，直到下一个作用域标记或文件结束
//! - 数据行形如 `类型标签:字面值`，两侧分别修剪空白
//! - `*` + `DELETEALLVALUES`/`CREATEKEY` 为结构指令对，跳过不建模
//! - 不含 `:` 的数据行静默跳过
//!
//! 异常处理：
//! - DWORD 字面值无法按十进制解析 → [`ParseError::BadInteger`]（不静默降级）
//! - 作用域标记后缺少键路径行 → [`ParseError::MissingKeyPath`]
//!
//! 作者：小海策略工具项目组（自动生成）
//! 创建时间：2026-08-28
//! 修改时间：2026-08-28

use std::path::Path;

use encoding_rs::WINDOWS_1252;
use thiserror::Error;

use crate::model::{PolicySet, SettingValue, ValueKind};

/// 策略文本解析错误。
#[derive(Debug, Error)]
pub enum ParseError {
    /// 策略文件读取失败（不存在/权限/IO）。
    #[error("读取策略文件失败: {path}")]
    Read {
        /// 文件路径（展示用）。
        path: String,
        /// 底层 IO 错误。
        #[source]
        source: std::io::Error,
    },
    /// 作用域标记行后缺少键路径行。
    #[error("第 {line} 行: 作用域标记 {scope} 后缺少键路径行")]
    MissingKeyPath {
        /// 作用域标记所在行号（1 起始，按原始文件计）。
        line: usize,
        /// 作用域标记内容（`Computer` 或 `User`）。
        scope: String,
    },
    /// DWORD 字面值不是合法十进制整数。
    #[error("第 {line} 行: DWORD 值不是十进制整数: {text}")]
    BadInteger {
        /// 数据行所在行号（1 起始，按原始文件计）。
        line: usize,
        /// 冒号后的原始字面值（已修剪）。
        text: String,
    },
}

/// 读取并解析策略文件。
///
/// 参数：
/// - `path`：策略文件路径（WINDOWS-1252 编码的文本导出）
///
/// 返回值：
/// - 成功：结构化的 [`PolicySet`]
///
/// 异常处理：
/// - 文件读取失败返回 [`ParseError::Read`]
/// - 结构/字面值错误同 [`parse_policy_text`]
///
/// 编码说明：
/// - 按 WINDOWS-1252 宽松解码（无法映射的字节替换为占位符，不报错），
///   与该导出格式的历史来源一致
pub fn parse_policy_file(path: &Path) -> Result<PolicySet, ParseError> {
    let bytes = std::fs::read(path).map_err(|source| ParseError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let (text, _, _) = WINDOWS_1252.decode(&bytes);
    parse_policy_text(&text)
}

/// 解析已解码的策略文本。
///
/// 参数：
/// - `text`：策略文本（任意换行风格，行内容会被修剪）
///
/// 返回值：
/// - 成功：结构化的 [`PolicySet`]；重复键路径合并，同名值后写覆盖先写
///
/// 异常处理：
/// - 见 [`ParseError`]；块外的散落行与末尾不成对的值名行按约定丢弃
pub fn parse_policy_text(text: &str) -> Result<PolicySet, ParseError> {
    // 预处理：保留原始行号，丢弃空行与注释行。
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(idx, raw)| (idx + 1, raw.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with(';'))
        .collect();

    let mut set = PolicySet::default();
    let mut i = 0;
    while i < lines.len() {
        let (marker_line, marker) = lines[i];
        if !is_scope_marker(marker) {
            i += 1;
            continue;
        }
        i += 1;
        let Some(&(_, key_path)) = lines.get(i) else {
            return Err(ParseError::MissingKeyPath {
                line: marker_line,
                scope: marker.to_string(),
            });
        };
        i += 1;

        while i + 1 < lines.len() && !is_scope_marker(lines[i].1) {
            let (_, name) = lines[i];
            let (data_line, data) = lines[i + 1];
            i += 2;

            if name == "*" && (data == "DELETEALLVALUES" || data == "CREATEKEY") {
                continue;
            }
            let Some((tag, literal)) = data.split_once(':') else {
                continue;
            };
            let literal = literal.trim();
            let value = match ValueKind::from_tag(tag.trim()) {
                ValueKind::Dword => {
                    let parsed = literal.parse::<u32>().map_err(|_| ParseError::BadInteger {
                        line: data_line,
                        text: literal.to_string(),
                    })?;
                    SettingValue::Dword(parsed)
                }
                ValueKind::Sz => SettingValue::Sz(literal.to_string()),
            };
            set.insert(key_path, name, value);
        }
    }
    Ok(set)
}

/// 判断一行是否为作用域标记。
fn is_scope_marker(line: &str) -> bool {
    line == "Computer" || line == "User"
}
