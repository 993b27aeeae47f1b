//! 应用/校验结果报告模型。
//!
//! 目的：
//! - 将“单个键失败/单个值不一致”这类可恢复问题收敛为结构化报告，
//!   而不是通过异常中断整个操作（致命错误仍走 [`crate::error::PolicyError`]）
//! - 报告可序列化为 JSON 落盘，便于企业批量部署后的审计与排障
//!
//! 作者：小海策略工具项目组（自动生成）
//! 创建时间：2026-08-28
//! 修改时间：2026-08-28

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// 策略应用结果报告。
///
/// 字段说明：
/// - `report_id`：本次操作 ID（用于区分多次执行）
/// - `user` / `policy_file`：目标用户与策略文件（展示/审计用）
/// - `generated_at`：操作时间（UTC）
/// - `applied_keys`：成功写入的键路径
/// - `failed_keys`：写入失败的键路径及原因（失败不中断其余键）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyReport {
    pub report_id: Uuid,
    pub user: String,
    pub policy_file: String,
    pub generated_at: OffsetDateTime,
    #[serde(default)]
    pub applied_keys: Vec<String>,
    #[serde(default)]
    pub failed_keys: Vec<KeyFailure>,
}

impl ApplyReport {
    /// 创建一份空的应用报告（时间取当前 UTC，ID 为随机 UUID）。
    pub fn new(user: &str, policy_file: &str) -> Self {
        Self {
            report_id: Uuid::new_v4(),
            user: user.to_string(),
            policy_file: policy_file.to_string(),
            generated_at: OffsetDateTime::now_utc(),
            applied_keys: Vec::new(),
            failed_keys: Vec::new(),
        }
    }

    /// 是否所有键都应用成功。
    pub fn fully_applied(&self) -> bool {
        self.failed_keys.is_empty()
    }
}

/// 单个键路径的应用失败记录。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyFailure {
    /// 失败的键路径（策略文件中的原始写法）。
    pub key_path: String,
    /// 失败原因（含底层错误链）。
    pub detail: String,
}

/// 策略校验结果报告。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub report_id: Uuid,
    pub user: String,
    pub policy_file: String,
    pub generated_at: OffsetDateTime,
    /// 完全一致的值（`键路径\值名`）。
    #[serde(default)]
    pub matched: Vec<String>,
    /// 所有不一致项（缺键/缺值/类型或值不符）。
    #[serde(default)]
    pub mismatches: Vec<ValueMismatch>,
}

impl CheckReport {
    /// 创建一份空的校验报告。
    pub fn new(user: &str, policy_file: &str) -> Self {
        Self {
            report_id: Uuid::new_v4(),
            user: user.to_string(),
            policy_file: policy_file.to_string(),
            generated_at: OffsetDateTime::now_utc(),
            matched: Vec::new(),
            mismatches: Vec::new(),
        }
    }

    /// 是否所有期望值都完全一致（校验操作的总体布尔结果）。
    pub fn all_match(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// 单条不一致记录。
///
/// 约定：
/// - `value_name` 为 `None` 表示整个键缺失
/// - `found` 为 `None` 表示该值名在注册表中不存在
/// - 类型或值不符时 `expected`/`found` 均为展示字符串（含类型标签）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueMismatch {
    pub key_path: String,
    #[serde(default)]
    pub value_name: Option<String>,
    #[serde(default)]
    pub expected: Option<String>,
    #[serde(default)]
    pub found: Option<String>,
}
