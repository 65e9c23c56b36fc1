// ==========================================
// 需求分配引擎 - 需求行与批次
// ==========================================
// 职责: 定义需求行 (DemandLine) 与待分配批次 (Lot)
// 红线: 构造时完成校验，分配过程中不可变
// ==========================================

use crate::domain::error::{ValidationError, ValidationResult};
use crate::domain::types::{FinishProcess, FinishType, ProductClass};
use crate::domain::week::DueWeek;
use serde::{Deserialize, Serialize};

// ==========================================
// DemandLine - 需求行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandLine {
    pub due_week: DueWeek,
    pub finish_part_number: String,
    pub finish_process: FinishProcess,
    pub finish_type: FinishType,
    /// 未满足数量（非负）
    pub remaining_balance: u64,
    /// 标准包装数量；包装类工序保证 > 0，非包装类可为 0
    pub standard_quantity: u64,
}

impl DemandLine {
    /// 构造并校验需求行
    ///
    /// # 校验规则
    /// - 成品料号非空
    /// - remaining_balance >= 0
    /// - 包装类工序 standard_quantity > 0
    pub fn new(
        due_week: DueWeek,
        finish_part_number: impl Into<String>,
        finish_process: FinishProcess,
        finish_type: FinishType,
        remaining_balance: i64,
        standard_quantity: i64,
    ) -> ValidationResult<Self> {
        let finish_part_number = finish_part_number.into().trim().to_string();
        if finish_part_number.is_empty() {
            return Err(ValidationError::EmptyPartNumber {
                due_week: due_week.to_string(),
            });
        }

        if remaining_balance < 0 {
            return Err(ValidationError::NegativeBalance {
                part: finish_part_number,
                value: remaining_balance,
            });
        }

        if finish_process.is_packaging() && standard_quantity <= 0 {
            return Err(ValidationError::NonPositiveStandardQuantity {
                part: finish_part_number,
                process: finish_process.to_string(),
                value: standard_quantity,
            });
        }

        Ok(Self {
            due_week,
            finish_part_number,
            finish_process,
            finish_type,
            remaining_balance: remaining_balance as u64,
            standard_quantity: standard_quantity.max(0) as u64,
        })
    }

    /// 由原始字符串字段构造（交期周/精整类型需解析）
    pub fn parse(
        due_week: &str,
        finish_part_number: &str,
        finish_process: &str,
        finish_type: &str,
        remaining_balance: i64,
        standard_quantity: i64,
    ) -> ValidationResult<Self> {
        let week: DueWeek = due_week.parse()?;
        let ftype: FinishType =
            finish_type
                .parse()
                .map_err(|_| ValidationError::UnknownFinishType {
                    part: finish_part_number.trim().to_string(),
                    value: finish_type.to_string(),
                })?;

        Self::new(
            week,
            finish_part_number,
            FinishProcess::from(finish_process),
            ftype,
            remaining_balance,
            standard_quantity,
        )
    }

    /// 复检已构造的需求行（反序列化得到的记录绕过了 new()）
    pub fn validate(&self) -> ValidationResult<()> {
        if self.finish_part_number.trim().is_empty() {
            return Err(ValidationError::EmptyPartNumber {
                due_week: self.due_week.to_string(),
            });
        }
        if self.finish_process.is_packaging() && self.standard_quantity == 0 {
            return Err(ValidationError::NonPositiveStandardQuantity {
                part: self.finish_part_number.clone(),
                process: self.finish_process.to_string(),
                value: 0,
            });
        }
        Ok(())
    }

    pub fn is_customer_specific(&self) -> bool {
        self.finish_type == FinishType::Cust
    }
}

// ==========================================
// Lot - 待分配批次
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    pub quantity: u64,
    pub product_class: ProductClass,
}

impl Lot {
    pub fn new(quantity: i64, product_class: ProductClass) -> ValidationResult<Self> {
        if quantity <= 0 {
            return Err(ValidationError::NonPositiveLotQuantity(quantity));
        }
        Ok(Self {
            quantity: quantity as u64,
            product_class,
        })
    }
}
