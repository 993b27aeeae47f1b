//! 外部系统命令执行（`reg` / `gpupdate`）。
//!
//! 说明：
//! - 配置单元加载/卸载与策略刷新走系统自带命令行工具，便于排障
//!   （命令行与输出可直接人工复现）
//! - 命令同步执行并等待退出；失败时错误信息携带 stdout/stderr
//!
//! 作者：小海策略工具项目组（自动生成）
//! 创建时间：2026-08-28
//! 修改时间：2026-08-28

use std::process::Command;

use anyhow::{anyhow, Context, Result};
use tracing::debug;

/// 执行外部命令并要求退出码为 0。
///
/// 参数：
/// - `program`：程序名（如 `reg`、`gpupdate`）
/// - `args`：参数数组（不包含程序名）
///
/// 异常处理：
/// - 启动失败：返回错误（通常是系统缺失或权限问题）
/// - 非零退出：返回错误并携带 stdout/stderr，便于日志与人工复现
pub(crate) fn run_checked(program: &str, args: &[&str]) -> Result<()> {
    debug!("执行命令: {program} {}", args.join(" "));
    let out = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("执行 {program} 失败"))?;
    if out.status.success() {
        return Ok(());
    }
    let stdout = String::from_utf8_lossy(&out.stdout);
    let stderr = String::from_utf8_lossy(&out.stderr);
    Err(anyhow!(
        "{program} 执行失败: {}\n{}\n{}",
        out.status,
        stdout,
        stderr
    ))
}
