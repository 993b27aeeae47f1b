//! 本机账户枚举。
//!
//! 主要用途：
//! - 为前端提供“可作为策略目标”的账户列表
//!
//! 实现策略：
//! - `NetUserEnum`（信息级别 1，普通账户过滤器），按 `ERROR_MORE_DATA` 分页
//! - 跳过被禁用的账户（`UF_ACCOUNTDISABLE`）
//!
//! 作者：小海策略工具项目组（自动生成）
//! 创建时间：2026-08-28
//! 修改时间：2026-08-28

use anyhow::{anyhow, Result};
use windows::core::PCWSTR;
use windows::Win32::Foundation::ERROR_MORE_DATA;
use windows::Win32::NetworkManagement::NetManagement::{
    NetApiBufferFree, NetUserEnum, FILTER_NORMAL_ACCOUNT, MAX_PREFERRED_LENGTH, NERR_Success,
    UF_ACCOUNTDISABLE, USER_INFO_1,
};

/// 枚举本机启用状态的普通账户名。
///
/// 返回值：
/// - 账户名列表（按系统枚举顺序；被禁用账户已剔除）
///
/// 异常处理：
/// - `NetUserEnum` 返回非成功状态码时返回错误
///
/// 内存说明：
/// - 每页缓冲区由系统分配，读取完毕后必须用 `NetApiBufferFree` 释放
pub fn list_enabled_local_users() -> Result<Vec<String>> {
    let mut names = Vec::new();
    let mut resume: u32 = 0;
    loop {
        let mut buf: *mut u8 = std::ptr::null_mut();
        let mut read: u32 = 0;
        let mut total: u32 = 0;
        let status = unsafe {
            NetUserEnum(
                PCWSTR::null(),
                1,
                FILTER_NORMAL_ACCOUNT,
                &mut buf,
                MAX_PREFERRED_LENGTH,
                &mut read,
                &mut total,
                Some(&mut resume),
            )
        };
        if status != NERR_Success && status != ERROR_MORE_DATA.0 {
            return Err(anyhow!("NetUserEnum 失败: 状态码 {status}"));
        }

        // 成功状态也可能返回空页（buf 为 NULL / read 为 0），此时没有可读条目。
        if !buf.is_null() {
            unsafe {
                if read > 0 {
                    let entries =
                        std::slice::from_raw_parts(buf as *const USER_INFO_1, read as usize);
                    for entry in entries {
                        if entry.usri1_flags.contains(UF_ACCOUNTDISABLE) {
                            continue;
                        }
                        if let Ok(name) = entry.usri1_name.to_string() {
                            names.push(name);
                        }
                    }
                }
                let _ = NetApiBufferFree(Some(buf as *const core::ffi::c_void));
            }
        }

        if status != ERROR_MORE_DATA.0 {
            break;
        }
    }
    Ok(names)
}
