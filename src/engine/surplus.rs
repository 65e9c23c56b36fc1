// ==========================================
// 需求分配引擎 - 包装余量回补
// ==========================================
// 职责: 将包装取整削下的余量整体加回一个目标料号，保证总量守恒
// 目标选择（固定优先级，与数量无关）:
//   1) 存在 {BDPACK-TR, PACKLABEL, TAPEREEL} 以外的工序 -> 该工序
//   2) 否则存在 PACKLABEL -> PACKLABEL
//   3) 否则取 BDPACK-TR / TAPEREEL 中出现的那个
// ==========================================

use crate::domain::allocation::PartAllocationSummary;
use crate::domain::types::FinishProcess;
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// 余量回补结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurplusResolution {
    pub summary: PartAllocationSummary,
    pub surplus_units: u64,
    /// 接收余量的料号（无余量时为 None）
    pub destination_part: Option<String>,
}

/// 非兜底工序集合
fn is_restricted(process: &FinishProcess) -> bool {
    matches!(
        process,
        FinishProcess::BdpackTr | FinishProcess::PackLabel | FinishProcess::TapeReel
    )
}

/// 按固定优先级选择接收余量的工序
///
/// 输入按料号首次出现顺序排列；返回 None 表示列表为空
pub fn select_destination_process(processes: &[&FinishProcess]) -> Option<FinishProcess> {
    if let Some(p) = processes.iter().find(|p| !is_restricted(p)) {
        return Some((*p).clone());
    }

    if processes.iter().any(|p| **p == FinishProcess::PackLabel) {
        return Some(FinishProcess::PackLabel);
    }

    processes.iter().find(|p| is_restricted(p)).map(|p| (*p).clone())
}

// ==========================================
// SurplusResolver - 余量回补器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct SurplusResolver {
    // 无状态
}

impl SurplusResolver {
    pub fn new() -> Self {
        Self {}
    }

    /// 回补余量
    ///
    /// 余量整体加到目标工序下首次出现的料号上；恰好一个料号接收
    #[instrument(skip(self, summary), fields(parts = summary.len()))]
    pub fn resolve(
        &self,
        mut summary: PartAllocationSummary,
        surplus_units: u64,
    ) -> EngineResult<SurplusResolution> {
        if surplus_units == 0 {
            return Ok(SurplusResolution {
                summary,
                surplus_units,
                destination_part: None,
            });
        }

        let destination = select_destination_process(&summary.processes());
        let target = destination.as_ref().and_then(|process| {
            summary
                .parts_mut()
                .iter_mut()
                .find(|p| &p.finish_process == process)
        });

        let Some(part) = target else {
            let allocated = summary.total();
            return Err(EngineError::ConservationViolated {
                allocated,
                lot_quantity: allocated + surplus_units,
            });
        };

        part.allocated_qty += surplus_units;
        let destination_part = part.finish_part_number.clone();
        tracing::debug!(
            destination = %destination_part,
            surplus_units,
            "余量已回补"
        );

        Ok(SurplusResolution {
            summary,
            surplus_units,
            destination_part: Some(destination_part),
        })
    }
}
