// ==========================================
// 需求分配引擎 - 分配分类
// ==========================================
// FULL: 恰好一个料号分配量非零，且无 CUST 料号
// SPLIT: 其余情况
// 另: 需求细分类（仅供参考，不替代 FULL/SPLIT）
// ==========================================

use crate::domain::allocation::PartAllocationSummary;
use crate::domain::demand::DemandLine;
use crate::domain::types::{AllocationCategory, DemandCategory, FinishProcess, FinishType};
use std::collections::BTreeSet;

/// 判定 FULL / SPLIT（纯函数，结果只取决于汇总内容）
pub fn evaluate_allocation(summary: &PartAllocationSummary) -> AllocationCategory {
    if !summary.has_customer_specific() && summary.non_zero_count() == 1 {
        AllocationCategory::Full
    } else {
        AllocationCategory::Split
    }
}

/// 需求细分类
pub fn classify_demands(lines: &[DemandLine]) -> BTreeSet<DemandCategory> {
    let mut tapereel_std = 0usize;
    let mut leadscan_std = 0usize;
    let mut has_cust = false;
    let mut non_standard = false;

    for line in lines {
        match (&line.finish_process, line.finish_type) {
            (FinishProcess::TapeReel, FinishType::Std) => tapereel_std += 1,
            (FinishProcess::LeadScan, FinishType::Std) => leadscan_std += 1,
            _ => {}
        }
        if line.finish_type == FinishType::Cust {
            has_cust = true;
        }
        if !matches!(
            line.finish_process,
            FinishProcess::TapeReel | FinishProcess::LeadScan
        ) {
            non_standard = true;
        }
    }

    let mut categories = BTreeSet::new();
    if has_cust {
        categories.insert(DemandCategory::SplitCustSpecial);
    }
    if non_standard {
        categories.insert(DemandCategory::Maxcim);
    }
    if tapereel_std > 0 {
        categories.insert(DemandCategory::FullTr);
    }
    if leadscan_std > 0 {
        categories.insert(DemandCategory::FullLs);
    }
    if tapereel_std > 0 && leadscan_std > 0 {
        categories.insert(DemandCategory::SplitTr);
    }
    if tapereel_std > 1
        || leadscan_std > 1
        || (tapereel_std > 0 && leadscan_std > 0 && tapereel_std + leadscan_std > 2)
    {
        categories.insert(DemandCategory::SplitStd);
    }

    categories
}
