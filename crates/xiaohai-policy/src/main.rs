//! 小海策略工具（命令行前端）。
//!
//! 职责：
//! - 作为策略引擎的薄前端：枚举目标账户、应用策略、校验策略、环境自检
//! - 将引擎的进度日志行通过 `tracing` 输出到控制台
//! - 按需将结构化结果报告（JSON）落盘，便于批量部署后的审计
//!
//! 边界约定：
//! - `apply` 的结果（成功或失败）统一以一条人类可读的结果消息输出，
//!   进程退出码不反映引擎错误（与历史前端的消息框语义一致）
//! - `check` 在发现差异时以退出码 1 结束，便于脚本化巡检
//!
//! 权限要求：
//! - `apply`/`check` 建议以管理员权限运行（加载离线配置单元、写 HKLM）
//!
//! 作者：小海策略工具项目组（自动生成）
//! 创建时间：2026-08-28
//! 修改时间：2026-08-28

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// 命令行参数。
///
/// 说明：
/// - `--report` 仅对 `apply`/`check` 生效，将结构化报告写为 JSON 文件
#[derive(Debug, Parser)]
#[command(name = "xiaohai-policy", version)]
struct Cli {
    #[arg(long)]
    report: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// 支持的子命令。
#[derive(Debug, Subcommand)]
enum Commands {
    /// 列出可作为策略目标的本机启用账户。
    Users,
    /// 将策略文件应用到目标用户（需要管理员权限）。
    Apply {
        #[arg(long)]
        user: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// 校验目标用户注册表与策略文件是否一致（需要管理员权限）。
    Check {
        #[arg(long)]
        user: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// 环境自检（管理员权限、账户枚举）。
    Doctor,
}

#[cfg(not(windows))]
fn main() {
    // 引擎依赖注册表与配置单元挂载，仅在 Windows 上可用。
    let _ = Cli::parse();
    eprintln!("xiaohai-policy 仅支持 Windows");
    std::process::exit(1);
}

#[cfg(windows)]
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Users => imp::users(),
        Commands::Apply { user, file } => imp::apply(&cli, user, file),
        Commands::Check { user, file } => imp::check(&cli, user, file),
        Commands::Doctor => imp::doctor(),
    }
}

#[cfg(windows)]
mod imp {
    use std::path::Path;

    use anyhow::{anyhow, Context, Result};
    use tracing::info;
    use xiaohai_policy_windows::{elevation, engine, users};

    use crate::Cli;

    /// 测试逃生口：允许在非管理员环境下执行（仅用于自动化测试）。
    fn allow_non_admin_for_tests() -> bool {
        matches!(
            std::env::var("XIAOHAI_POLICY_TEST_ALLOW_NON_ADMIN").as_deref(),
            Ok("1")
        )
    }

    /// 校验管理员权限（除非设置了测试逃生口）。
    fn ensure_admin() -> Result<()> {
        if !allow_non_admin_for_tests() && !elevation::is_running_as_admin()? {
            return Err(anyhow!("应用/校验策略需要管理员权限，请以管理员方式运行"));
        }
        Ok(())
    }

    /// 列出可作为策略目标的账户名（每行一个）。
    pub(crate) fn users() -> Result<()> {
        for name in users::list_enabled_local_users()? {
            println!("{name}");
        }
        Ok(())
    }

    /// 执行策略应用并输出结果消息。
    ///
    /// 边界约定：
    /// - 引擎的致命错误转为结果消息输出，不向进程退出码传播
    pub(crate) fn apply(cli: &Cli, user: &str, file: &Path) -> Result<()> {
        ensure_admin()?;
        let mut sink = |line: &str| info!("{line}");
        let message = match engine::apply_policy(user, file, &mut sink) {
            Ok(report) => {
                if let Some(path) = cli.report.as_deref() {
                    write_report(path, &report)?;
                }
                if report.fully_applied() {
                    format!("✔ 策略已成功应用到 {user}")
                } else {
                    format!(
                        "⚠ 策略已应用到 {user}，但有 {} 个键失败（详见日志/报告）",
                        report.failed_keys.len()
                    )
                }
            }
            Err(e) => format!("❌ {e}"),
        };
        println!("{message}");
        Ok(())
    }

    /// 执行策略校验并输出总体结果。
    ///
    /// 退出码：
    /// - 全部一致或发生致命错误 → 0（错误以消息形式输出，与 `apply` 对称）
    /// - 存在差异 → 1（便于脚本化巡检）
    pub(crate) fn check(cli: &Cli, user: &str, file: &Path) -> Result<()> {
        ensure_admin()?;
        let mut sink = |line: &str| info!("{line}");
        match engine::check_policy(user, file, &mut sink) {
            Ok(report) => {
                if let Some(path) = cli.report.as_deref() {
                    write_report(path, &report)?;
                }
                if report.all_match() {
                    println!("✔ 全部设置匹配");
                } else {
                    println!("❌ 存在差异（{} 处）", report.mismatches.len());
                    std::process::exit(1);
                }
            }
            Err(e) => println!("❌ {e}"),
        }
        Ok(())
    }

    /// 环境自检（用于排障）。
    pub(crate) fn doctor() -> Result<()> {
        println!("admin = {}", elevation::is_running_as_admin()?);
        println!(
            "enabled_users = {}",
            users::list_enabled_local_users()?.len()
        );
        Ok(())
    }

    /// 将结构化报告序列化并写入 JSON 文件。
    fn write_report<T: serde::Serialize>(path: &Path, report: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(report).context("序列化报告失败")?;
        std::fs::write(path, bytes)
            .with_context(|| format!("写入报告文件失败: {}", path.display()))?;
        Ok(())
    }
}
