//! 账户名到 SID 字符串的解析。
//!
//! 说明：
//! - SID 字符串既是稳定的账户标识，也兼作“在线用户”的配置单元挂载名
//!   （用户已登录时其配置单元挂载在 `HKU\<SID>` 下）
//!
//! 作者：小海策略工具项目组（自动生成）
//! 创建时间：2026-08-28
//! 修改时间：2026-08-28

use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;

use anyhow::{anyhow, Context, Result};
use windows::core::{PCWSTR, PWSTR};
use windows::Win32::Foundation::{HLOCAL, LocalFree, PSID};
use windows::Win32::Security::Authorization::ConvertSidToStringSidW;
use windows::Win32::Security::{LookupAccountNameW, SID_NAME_USE};

/// 将本机账户名解析为 SID 字符串（如 `S-1-5-21-...`）。
///
/// 参数：
/// - `username`：本机账户名
///
/// 返回值：
/// - 成功：SID 字符串
///
/// 异常处理：
/// - 账户不存在或无法解析时返回错误（引擎边界映射为 `UserNotFound`）
///
/// 内存说明：
/// - `ConvertSidToStringSidW` 返回的字符串由系统分配，必须用 `LocalFree` 释放
pub fn lookup_sid_string(username: &str) -> Result<String> {
    let account = to_wide(OsStr::new(username));

    // 第一次调用仅询问缓冲区大小（预期失败并回填 sid_len/domain_len）。
    let mut sid_len: u32 = 0;
    let mut domain_len: u32 = 0;
    let mut sid_use = SID_NAME_USE::default();
    unsafe {
        let _ = LookupAccountNameW(
            PCWSTR::null(),
            PCWSTR(account.as_ptr()),
            PSID::default(),
            &mut sid_len,
            PWSTR::null(),
            &mut domain_len,
            &mut sid_use,
        );
    }
    if sid_len == 0 {
        return Err(anyhow!("账户不存在或无法解析: {username}"));
    }

    let mut sid_buf = vec![0u8; sid_len as usize];
    let mut domain_buf = vec![0u16; domain_len as usize];
    unsafe {
        LookupAccountNameW(
            PCWSTR::null(),
            PCWSTR(account.as_ptr()),
            PSID(sid_buf.as_mut_ptr() as *mut core::ffi::c_void),
            &mut sid_len,
            PWSTR(domain_buf.as_mut_ptr()),
            &mut domain_len,
            &mut sid_use,
        )
        .with_context(|| format!("LookupAccountNameW 失败: {username}"))?;

        let mut string_sid = PWSTR::null();
        ConvertSidToStringSidW(
            PSID(sid_buf.as_mut_ptr() as *mut core::ffi::c_void),
            &mut string_sid,
        )
        .context("ConvertSidToStringSidW 失败")?;
        let sid = string_sid.to_string().context("SID 字符串解码失败");
        let _ = LocalFree(HLOCAL(string_sid.0 as *mut core::ffi::c_void));
        sid
    }
}

/// 将字符串编码为 UTF-16 宽字符串并追加 NUL 结尾。
fn to_wide(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(std::iter::once(0)).collect()
}
