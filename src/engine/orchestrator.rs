// ==========================================
// 需求分配引擎 - 引擎编排器
// ==========================================
// 主流程: 校验 -> 排序分组 -> 贪心分配 -> 余量回补 -> FULL/SPLIT 判定
// 拆分优化: 需求行 -> TR/LS 输入 -> 衰减网格求解
// 红线: 任一步失败即整体失败，不输出部分结果
// ==========================================

use crate::config::EngineConfig;
use crate::domain::allocation::{AllocationRecord, PartAllocationSummary};
use crate::domain::demand::{DemandLine, Lot};
use crate::domain::split::{SplitPlan, SplitPlanInput};
use crate::domain::types::{
    AllocationCategory, DemandCategory, FinishProcess, FinishType, ProcessFamily, ProductClass,
};
use crate::domain::week::DueWeek;
use crate::engine::allocator::LotAllocator;
use crate::engine::classifier::{classify_demands, evaluate_allocation};
use crate::engine::error::EngineResult;
use crate::engine::ordering::DemandOrdering;
use crate::engine::split_optimizer::DecaySplitOptimizer;
use crate::solver::{LinearSolver, MicroLpSolver};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument};
use uuid::Uuid;

// ==========================================
// AllocationOutcome - 分配结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub run_id: Uuid,
    pub lot: Lot,

    // 分配输出
    pub records: Vec<AllocationRecord>,
    pub summary: PartAllocationSummary,
    /// 成品料号 -> (分配数量, 成品工艺, 成品类型)
    pub allocations: BTreeMap<String, (u64, FinishProcess, FinishType)>,
    pub family_totals: BTreeMap<ProcessFamily, u64>,

    // 回补输出
    pub surplus_units: u64,
    pub destination_part: Option<String>,

    // 分类输出
    pub category: AllocationCategory,
    pub demand_categories: BTreeSet<DemandCategory>,
}

// ==========================================
// AllocationOrchestrator - 引擎编排器
// ==========================================
pub struct AllocationOrchestrator<S: LinearSolver = MicroLpSolver> {
    ordering: DemandOrdering,
    allocator: LotAllocator,
    optimizer: DecaySplitOptimizer<S>,
}

impl AllocationOrchestrator<MicroLpSolver> {
    /// 使用默认求解器创建编排器
    pub fn new(config: EngineConfig) -> Self {
        Self::with_solver(MicroLpSolver::new(), config)
    }
}

impl Default for AllocationOrchestrator<MicroLpSolver> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<S: LinearSolver> AllocationOrchestrator<S> {
    pub fn with_solver(solver: S, config: EngineConfig) -> Self {
        Self {
            ordering: DemandOrdering::new(),
            allocator: LotAllocator::new(config.clone()),
            optimizer: DecaySplitOptimizer::new(solver, config),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        self.allocator.config()
    }

    /// 执行一次批次分配
    ///
    /// # 参数
    /// - `lot`: 待分配批次
    /// - `lines`: 需求行（任意顺序）
    ///
    /// # 返回
    /// - Ok(AllocationOutcome): 料号汇总合计 == 批次数量
    /// - Err: 畸形输入 / 无可分配需求
    #[instrument(skip(self, lot, lines), fields(
        run_id = tracing::field::Empty,
        lot_quantity = lot.quantity,
        product_class = %lot.product_class,
        line_count = lines.len()
    ))]
    pub fn run(&self, lot: &Lot, lines: Vec<DemandLine>) -> EngineResult<AllocationOutcome> {
        let run_id = Uuid::new_v4();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));
        info!("开始批次分配");

        // === 步骤 1: 校验 ===
        for line in &lines {
            line.validate()?;
        }
        let demand_categories = classify_demands(&lines);

        // === 步骤 2: 排序分组 ===
        let groups = self.ordering.order(lines);
        debug!(groups = groups.len(), "需求排序分组完成");

        // === 步骤 3: 分配 + 回补 ===
        let allocation = self
            .allocator
            .allocate(lot.quantity, &groups, lot.product_class)?;

        // === 步骤 4: 判定 ===
        let category = evaluate_allocation(&allocation.summary);
        let family_totals = allocation.summary.family_totals();
        let allocations = allocation.summary.to_map();

        info!(
            parts = allocation.summary.len(),
            surplus_units = allocation.surplus_units,
            destination_part = ?allocation.destination_part,
            category = %category,
            "批次分配完成"
        );

        Ok(AllocationOutcome {
            run_id,
            lot: lot.clone(),
            records: allocation.records,
            summary: allocation.summary,
            allocations,
            family_totals,
            surplus_units: allocation.surplus_units,
            destination_part: allocation.destination_part,
            category,
            demand_categories,
        })
    }

    /// 针对需求行做 TR / LS 拆分优化
    ///
    /// 提前期以 `reference` 周为基准
    #[instrument(skip(self, lines), fields(
        run_id = tracing::field::Empty,
        line_count = lines.len(),
        reference = %reference
    ))]
    pub fn plan_split(
        &self,
        lines: &[DemandLine],
        reference: DueWeek,
        total_supply: f64,
        product_class: ProductClass,
    ) -> EngineResult<SplitPlan> {
        let run_id = Uuid::new_v4();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));

        let input =
            SplitPlanInput::from_demand_lines(lines, reference, total_supply, product_class)?;
        self.optimizer.plan_split_with_run_id(&input, run_id)
    }

    /// 直接对已构造的拆分输入求解
    #[instrument(skip(self, input), fields(run_id = tracing::field::Empty))]
    pub fn plan_split_input(&self, input: &SplitPlanInput) -> EngineResult<SplitPlan> {
        let run_id = Uuid::new_v4();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));
        self.optimizer.plan_split_with_run_id(input, run_id)
    }
}
