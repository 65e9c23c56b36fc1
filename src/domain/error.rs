// ==========================================
// 需求分配引擎 - 输入校验错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 非法输入在分配开始前拒绝，不使用默认值兜底
// ==========================================

use thiserror::Error;

/// 输入校验错误（畸形输入）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    // ===== 交期周 =====
    #[error("交期周格式错误: {value}（期望 W<ww>'<yy>）: {reason}")]
    InvalidDueWeek { value: String, reason: String },

    // ===== 需求行字段 =====
    #[error("剩余需求量为负: part={part}, remaining_balance={value}")]
    NegativeBalance { part: String, value: i64 },

    #[error("包装类需求行标准包装数量非法: part={part}, process={process}, std_qty={value}")]
    NonPositiveStandardQuantity {
        part: String,
        process: String,
        value: i64,
    },

    #[error("成品料号为空 (due_week={due_week})")]
    EmptyPartNumber { due_week: String },

    #[error("未知精整类型: part={part}, value={value}")]
    UnknownFinishType { part: String, value: String },

    // ===== 批次 =====
    #[error("批次数量必须为正: {0}")]
    NonPositiveLotQuantity(i64),

    // ===== 拆分优化输入 =====
    #[error("数组长度不一致: {name} ({left} != {right})")]
    MismatchedLengths {
        name: String,
        left: usize,
        right: usize,
    },

    #[error("需求量非法: {class}[{index}] = {value}")]
    InvalidDemand {
        class: String,
        index: usize,
        value: f64,
    },

    #[error("单步数量非法: TR[{index}] = {value}")]
    InvalidUnitPerStep { index: usize, value: f64 },

    #[error("总供给量非法: {0}")]
    InvalidTotalSupply(f64),

    #[error("衰减系数必须在 (0,1) 区间: {0}")]
    InvalidDecayRatio(f64),
}

/// Result 类型别名
pub type ValidationResult<T> = Result<T, ValidationError>;
