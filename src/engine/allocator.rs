// ==========================================
// 需求分配引擎 - 批次贪心分配
// ==========================================
// 职责: 按交期周分组顺序消耗批次数量，包装类需求按 STD_QTY 取整
// 输入: 批次数量 + 已排序分组的需求行 + 产品类别
// 输出: 分配记录 + 料号汇总（已完成包装余量回补，合计 == 批次数量）
// ==========================================
// 规则:
// 1) 包装类: candidate_floor = floor(min(lot, balance[*buffer]) / std[*buffer]) * std[*buffer]
//    balance >= candidate_floor -> min(lot, balance)，否则 min(lot, candidate_floor)
// 2) 非包装类: min(lot, balance)
// 3) 批次耗尽即停止
// 4) 非零记录 != 1 时对包装类料号做 STD_QTY 取整，削下的余量交由回补器
// ==========================================

use crate::config::EngineConfig;
use crate::domain::allocation::{AllocationRecord, PartAllocationSummary};
use crate::domain::demand::DemandLine;
use crate::domain::types::ProductClass;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::ordering::DueWeekGroup;
use crate::engine::surplus::SurplusResolver;
use serde::{Deserialize, Serialize};
use tracing::instrument;

const FLOAT_EPS: f64 = 1e-9;

/// 批次分配结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotAllocation {
    /// 逐行分配记录（按分配顺序）
    pub records: Vec<AllocationRecord>,
    /// 最终料号汇总
    pub summary: PartAllocationSummary,
    /// 包装取整削下的数量
    pub shaved_units: u64,
    /// 需求耗尽后批次剩余的数量
    pub unallocated_units: u64,
    /// 回补给目标料号的总量 (shaved + unallocated)
    pub surplus_units: u64,
    pub destination_part: Option<String>,
    /// 单一非零分配，跳过取整回补
    pub single_allocation: bool,
}

// ==========================================
// LotAllocator - 批次贪心分配器
// ==========================================
#[derive(Debug, Clone)]
pub struct LotAllocator {
    config: EngineConfig,
    resolver: SurplusResolver,
}

impl Default for LotAllocator {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl LotAllocator {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            resolver: SurplusResolver::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 分配批次
    ///
    /// # 参数
    /// - `lot_quantity`: 批次数量（> 0）
    /// - `groups`: 已按交期周排序分组的需求行
    /// - `product_class`: 产品类别（决定是否应用 STD_QTY 缓冲）
    ///
    /// # 返回
    /// 分配结果；合计恒等于 lot_quantity
    #[instrument(skip(self, groups), fields(groups = groups.len()))]
    pub fn allocate(
        &self,
        lot_quantity: u64,
        groups: &[DueWeekGroup],
        product_class: ProductClass,
    ) -> EngineResult<LotAllocation> {
        let line_count: usize = groups.iter().map(|g| g.lines.len()).sum();
        if lot_quantity == 0 {
            return Err(EngineError::Validation(
                crate::domain::error::ValidationError::NonPositiveLotQuantity(0),
            ));
        }
        for line in groups.iter().flat_map(|g| g.lines.iter()) {
            line.validate()?;
        }

        let buffer = self.config.buffer_for(product_class);

        // 1. 贪心遍历
        let mut remaining = lot_quantity;
        let mut records = Vec::with_capacity(line_count);
        'walk: for group in groups {
            for line in &group.lines {
                let allocated = self.allocate_line(remaining, line, buffer);
                remaining -= allocated;
                records.push(AllocationRecord::for_line(line, allocated));

                if remaining == 0 {
                    break 'walk;
                }
            }
        }

        let mut summary = PartAllocationSummary::from_records(&records);
        if summary.is_empty() {
            return Err(EngineError::NoAllocatableDemand {
                lot_quantity,
                line_count,
            });
        }

        let unallocated_units = remaining;
        if unallocated_units > 0 {
            tracing::warn!(
                lot_quantity,
                unallocated_units,
                "需求总量不足，剩余批次数量并入回补余量"
            );
        }

        // 2. 单一非零分配: 跳过取整
        let non_zero_records = records.iter().filter(|r| r.allocated_qty != 0).count();
        let single_allocation = non_zero_records == 1;

        let (summary, shaved_units, destination_part) = if single_allocation {
            let mut destination_part = None;
            if unallocated_units > 0 {
                if let Some(part) = summary.parts_mut().first_mut() {
                    part.allocated_qty += unallocated_units;
                    destination_part = Some(part.finish_part_number.clone());
                }
            }
            (summary, 0, destination_part)
        } else {
            // 3. STD_QTY 取整 + 余量回补
            let shaved_units = Self::reconcile_standard_quantities(&mut summary);
            let resolution = self
                .resolver
                .resolve(summary, shaved_units + unallocated_units)?;
            (resolution.summary, shaved_units, resolution.destination_part)
        };

        // 4. 守恒校验
        let allocated = summary.total();
        if allocated != lot_quantity {
            return Err(EngineError::ConservationViolated {
                allocated,
                lot_quantity,
            });
        }

        tracing::info!(
            lot_quantity,
            parts = summary.len(),
            shaved_units,
            unallocated_units,
            single_allocation,
            "批次分配完成"
        );

        Ok(LotAllocation {
            records,
            summary,
            shaved_units,
            unallocated_units,
            surplus_units: shaved_units + unallocated_units,
            destination_part,
            single_allocation,
        })
    }

    /// 单行分配量
    pub fn allocate_line(&self, remaining_lot: u64, line: &DemandLine, buffer: f64) -> u64 {
        let balance = line.remaining_balance;
        if !line.finish_process.is_packaging() {
            return remaining_lot.min(balance);
        }

        let floor = candidate_floor(remaining_lot, balance, line.standard_quantity, buffer);
        if balance >= floor {
            remaining_lot.min(balance)
        } else {
            remaining_lot.min(floor)
        }
    }

    /// 包装类料号取整到 STD_QTY 整数倍，返回削下的总量
    ///
    /// 只会减少包装类料号的总量
    pub fn reconcile_standard_quantities(summary: &mut PartAllocationSummary) -> u64 {
        let mut shaved = 0;
        for part in summary.parts_mut() {
            let remainder = part.packaging_remainder();
            if remainder != 0 {
                part.allocated_qty -= remainder;
                shaved += remainder;
                tracing::debug!(
                    part = %part.finish_part_number,
                    std_qty = part.standard_quantity,
                    remainder,
                    "包装类料号取整"
                );
            }
        }
        shaved
    }
}

/// 不超过 min(lot, balance) 的最大 STD_QTY 整数倍
///
/// buffer != 1 时 std_qty 与 balance 同乘缓冲系数，结果向上取整为整数
pub fn candidate_floor(remaining_lot: u64, balance: u64, standard_quantity: u64, buffer: f64) -> u64 {
    if standard_quantity == 0 {
        return 0;
    }

    if buffer == 1.0 {
        let cap = remaining_lot.min(balance);
        return (cap / standard_quantity) * standard_quantity;
    }

    let std_qty = standard_quantity as f64 * buffer;
    let cap = (remaining_lot as f64).min(balance as f64 * buffer);
    let multiples = (cap / std_qty + FLOAT_EPS).floor();
    (multiples * std_qty - FLOAT_EPS).ceil().max(0.0) as u64
}

/// 顺序满额分配
///
/// 按给定顺序依次满足需求，每项得到 min(剩余, 需求)
pub fn allocate_in_sequence(demands: &[u64], total: u64) -> Vec<u64> {
    let mut remaining = total;
    demands
        .iter()
        .map(|&demand| {
            let allocated = remaining.min(demand);
            remaining -= allocated;
            allocated
        })
        .collect()
}

#[cfg(test)]
mod tests;
