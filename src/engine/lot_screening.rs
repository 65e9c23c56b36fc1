// ==========================================
// 需求分配引擎 - 批次筛选
// ==========================================
// 职责: 判定在制批次能否进入分配
// 规则（全部满足才可分配）:
//   1. action / status 为空
//   2. 工序号 != 挂起工序
//   3. 描述不含排除关键字
//   4. 批次号不以排除前缀开头（忽略大小写）
// 红线: 每个拒绝都必须输出 reason
// ==========================================

use crate::config::LotScreeningConfig;
use crate::domain::demand::Lot;
use crate::domain::error::ValidationResult;
use crate::domain::types::ProductClass;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// 在制批次行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WipLotRow {
    pub lot_number: String,
    pub description: String,
    pub operation: u32,
    pub action: String,
    pub status: String,
    pub quantity: u64,
}

/// 批次筛选结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotEligibility {
    pub lot_number: String,
    pub eligible: bool,
    pub reasons: Vec<String>,
}

// ==========================================
// LotScreening - 批次筛选器
// ==========================================
pub struct LotScreening {
    config: LotScreeningConfig,
}

impl LotScreening {
    pub fn new(config: LotScreeningConfig) -> Self {
        Self { config }
    }

    /// 评估单个批次
    pub fn evaluate(&self, row: &WipLotRow) -> LotEligibility {
        let mut reasons = Vec::new();

        if !row.action.trim().is_empty() {
            reasons.push(format!("BLOCKED: 已有待处理动作 ({})", row.action.trim()));
        }
        if !row.status.trim().is_empty() {
            reasons.push(format!("BLOCKED: 批次状态非空 ({})", row.status.trim()));
        }
        if row.operation == self.config.held_operation {
            reasons.push(format!("BLOCKED: 批次处于挂起工序 {}", row.operation));
        }
        if let Some(keyword) = self
            .config
            .excluded_keywords
            .iter()
            .find(|k| !k.is_empty() && row.description.contains(k.as_str()))
        {
            reasons.push(format!("EXCLUDED: 描述含关键字 {}", keyword));
        }
        let prefix = self.config.excluded_lot_prefix.to_lowercase();
        if !prefix.is_empty() && row.lot_number.to_lowercase().starts_with(&prefix) {
            reasons.push(format!("EXCLUDED: 批次号以 {} 开头", self.config.excluded_lot_prefix));
        }

        LotEligibility {
            lot_number: row.lot_number.clone(),
            eligible: reasons.is_empty(),
            reasons,
        }
    }

    /// 批量筛选，返回可分配批次与全部评估结果
    #[instrument(skip(self, rows), fields(row_count = rows.len()))]
    pub fn screen<'a>(&self, rows: &'a [WipLotRow]) -> (Vec<&'a WipLotRow>, Vec<LotEligibility>) {
        let mut eligible = Vec::new();
        let mut results = Vec::with_capacity(rows.len());

        for row in rows {
            let result = self.evaluate(row);
            if result.eligible {
                eligible.push(row);
            } else {
                tracing::debug!(lot_number = %row.lot_number, reasons = ?result.reasons, "批次被筛除");
            }
            results.push(result);
        }

        tracing::info!(
            eligible = eligible.len(),
            rejected = rows.len() - eligible.len(),
            "批次筛选完成"
        );
        (eligible, results)
    }
}

impl Default for LotScreening {
    fn default() -> Self {
        Self::new(LotScreeningConfig::default())
    }
}

impl WipLotRow {
    /// 转为分配批次
    pub fn to_lot(&self, product_class: ProductClass) -> ValidationResult<Lot> {
        Lot::new(self.quantity as i64, product_class)
    }
}
