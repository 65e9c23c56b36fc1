// ==========================================
// 需求分配引擎 - 分配记录与料号汇总
// ==========================================
// 职责: 定义单行分配记录 (AllocationRecord) 与按成品料号聚合的汇总
// 输出: 交给外部 UI 适配层的 料号 -> (分配量, 工序, 类型) 映射
// ==========================================

use crate::domain::demand::DemandLine;
use crate::domain::types::{FinishProcess, FinishType, ProcessFamily};
use crate::domain::week::DueWeek;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// AllocationRecord - 单行分配记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRecord {
    pub due_week: DueWeek,
    pub finish_part_number: String,
    pub finish_process: FinishProcess,
    pub finish_type: FinishType,
    pub standard_quantity: u64,
    pub allocated_qty: u64,
}

impl AllocationRecord {
    pub fn for_line(line: &DemandLine, allocated_qty: u64) -> Self {
        Self {
            due_week: line.due_week,
            finish_part_number: line.finish_part_number.clone(),
            finish_process: line.finish_process.clone(),
            finish_type: line.finish_type,
            standard_quantity: line.standard_quantity,
            allocated_qty,
        }
    }
}

// ==========================================
// PartAllocation - 单个成品料号的分配汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartAllocation {
    pub finish_part_number: String,
    pub allocated_qty: u64,
    /// 同一次分配内假定同料号工序一致，取首条记录
    pub finish_process: FinishProcess,
    pub finish_type: FinishType,
    pub standard_quantity: u64,
}

impl PartAllocation {
    /// 包装类料号当前总量相对 STD_QTY 的余数
    pub fn packaging_remainder(&self) -> u64 {
        if self.finish_process.is_packaging() && self.standard_quantity > 0 {
            self.allocated_qty % self.standard_quantity
        } else {
            0
        }
    }
}

// ==========================================
// PartAllocationSummary - 料号汇总（保持首次出现顺序）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartAllocationSummary {
    parts: Vec<PartAllocation>,
}

impl PartAllocationSummary {
    pub fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// 由分配记录聚合，只收录分配量 > 0 的记录
    pub fn from_records(records: &[AllocationRecord]) -> Self {
        let mut summary = Self::new();
        for record in records.iter().filter(|r| r.allocated_qty > 0) {
            match summary.get_mut(&record.finish_part_number) {
                Some(part) => part.allocated_qty += record.allocated_qty,
                None => summary.parts.push(PartAllocation {
                    finish_part_number: record.finish_part_number.clone(),
                    allocated_qty: record.allocated_qty,
                    finish_process: record.finish_process.clone(),
                    finish_type: record.finish_type,
                    standard_quantity: record.standard_quantity,
                }),
            }
        }
        summary
    }

    pub fn parts(&self) -> &[PartAllocation] {
        &self.parts
    }

    pub fn parts_mut(&mut self) -> &mut [PartAllocation] {
        &mut self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn get(&self, part_number: &str) -> Option<&PartAllocation> {
        self.parts
            .iter()
            .find(|p| p.finish_part_number == part_number)
    }

    pub fn get_mut(&mut self, part_number: &str) -> Option<&mut PartAllocation> {
        self.parts
            .iter_mut()
            .find(|p| p.finish_part_number == part_number)
    }

    /// 分配总量
    pub fn total(&self) -> u64 {
        self.parts.iter().map(|p| p.allocated_qty).sum()
    }

    /// 分配量非零的料号数
    pub fn non_zero_count(&self) -> usize {
        self.parts.iter().filter(|p| p.allocated_qty != 0).count()
    }

    /// 是否含客户定制 (CUST) 料号
    pub fn has_customer_specific(&self) -> bool {
        self.parts.iter().any(|p| p.finish_type == FinishType::Cust)
    }

    /// 按首次出现顺序列出各料号的工序
    pub fn processes(&self) -> Vec<&FinishProcess> {
        self.parts.iter().map(|p| &p.finish_process).collect()
    }

    /// 按工序族 (TR/LS/OTHER) 汇总分配量
    pub fn family_totals(&self) -> BTreeMap<ProcessFamily, u64> {
        let mut totals = BTreeMap::new();
        for part in &self.parts {
            *totals.entry(part.finish_process.family()).or_insert(0) += part.allocated_qty;
        }
        totals
    }

    /// 输出映射: 料号 -> (分配量, 工序, 类型)
    pub fn to_map(&self) -> BTreeMap<String, (u64, FinishProcess, FinishType)> {
        self.parts
            .iter()
            .map(|p| {
                (
                    p.finish_part_number.clone(),
                    (p.allocated_qty, p.finish_process.clone(), p.finish_type),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(part: &str, process: FinishProcess, std_qty: u64, qty: u64) -> AllocationRecord {
        AllocationRecord {
            due_week: "W10'24".parse().unwrap(),
            finish_part_number: part.to_string(),
            finish_process: process,
            finish_type: FinishType::Std,
            standard_quantity: std_qty,
            allocated_qty: qty,
        }
    }

    #[test]
    fn test_from_records_aggregates_and_skips_zero() {
        let records = vec![
            record("A+T", FinishProcess::TapeReel, 300, 1000),
            record("B+", FinishProcess::LeadScan, 0, 0),
            record("A+T", FinishProcess::TapeReel, 300, 630),
            record("C+", FinishProcess::LeadScan, 0, 400),
        ];
        let summary = PartAllocationSummary::from_records(&records);

        assert_eq!(summary.len(), 2);
        assert_eq!(summary.parts()[0].finish_part_number, "A+T");
        assert_eq!(summary.parts()[0].allocated_qty, 1630);
        assert_eq!(summary.parts()[0].packaging_remainder(), 130);
        assert_eq!(summary.parts()[1].finish_part_number, "C+");
        assert!(summary.get("B+").is_none());
        assert_eq!(summary.total(), 2030);
    }

    #[test]
    fn test_family_totals() {
        let records = vec![
            record("A+T", FinishProcess::TapeReel, 300, 900),
            record("B+T", FinishProcess::BdpackTr, 100, 100),
            record("C+", FinishProcess::LeadScan, 0, 400),
            record("D+", FinishProcess::PackLabel, 50, 50),
        ];
        let totals = PartAllocationSummary::from_records(&records).family_totals();
        assert_eq!(totals.get(&ProcessFamily::Tr), Some(&1000));
        assert_eq!(totals.get(&ProcessFamily::Ls), Some(&400));
        assert_eq!(totals.get(&ProcessFamily::Other), Some(&50));
    }

    #[test]
    fn test_to_map_keys_by_part() {
        let records = vec![
            record("A+T", FinishProcess::TapeReel, 300, 1500),
            record("B+", FinishProcess::LeadScan, 0, 400),
            record("B+", FinishProcess::LeadScan, 0, 130),
            record("C+P", FinishProcess::PackLabel, 100, 0),
        ];
        let map = PartAllocationSummary::from_records(&records).to_map();

        assert_eq!(map.len(), 2);
        assert_eq!(map["A+T"], (1500, FinishProcess::TapeReel, FinishType::Std));
        assert_eq!(map["B+"], (530, FinishProcess::LeadScan, FinishType::Std));
        assert!(!map.contains_key("C+P"));
    }
}
