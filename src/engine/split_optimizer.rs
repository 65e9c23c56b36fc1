// ==========================================
// 需求分配引擎 - 衰减加权拆分优化
// ==========================================
// 职责: 给定总供给，决定 TR / LS 两类需求的供给拆分，使衰减加权缺口最小
// 决策变量:
//   n_TR[i] ∈ Z+ (u_TR[i] = n_TR[i] * STD_QTY_i)，u_LS[i] >= 0
//   w_TR[i] >= D_TR[i] - u_TR[i]，w_LS[i] >= D_LS[i] - u_LS[i]，w >= 0
// 约束: Σ u_TR + Σ u_LS == 总供给
// 目标: min Σ r^Ti * w
// 网格: 按配置顺序逐个求解，ln(目标值) 严格更小才替换（先出现者赢得并列）
// ==========================================

use crate::config::EngineConfig;
use crate::domain::split::{CandidateScore, SplitPlan, SplitPlanInput, TrAllocation};
use crate::engine::decay::DecayModel;
use crate::engine::error::{EngineError, EngineResult};
use crate::solver::{
    LinearExpr, LinearProgram, LinearSolver, LpSolution, MicroLpSolver, Relation, SolverError,
    VarId,
};
use tracing::instrument;
use uuid::Uuid;

/// 模型变量句柄
#[derive(Debug, Clone, PartialEq)]
pub struct SplitVariables {
    pub n_tr: Vec<VarId>,
    pub u_ls: Vec<VarId>,
    pub w_tr: Vec<VarId>,
    pub w_ls: Vec<VarId>,
    /// 缓冲调整后的 TR 单步数量
    pub tr_units: Vec<f64>,
}

// ==========================================
// DecaySplitOptimizer - 拆分优化器
// ==========================================
pub struct DecaySplitOptimizer<S: LinearSolver> {
    solver: S,
    config: EngineConfig,
}

impl DecaySplitOptimizer<MicroLpSolver> {
    /// 使用默认 microlp 后端
    pub fn with_default_solver(config: EngineConfig) -> Self {
        Self::new(MicroLpSolver::new(), config)
    }
}

impl<S: LinearSolver> DecaySplitOptimizer<S> {
    pub fn new(solver: S, config: EngineConfig) -> Self {
        Self { solver, config }
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// 构造单个衰减系数下的规划模型
    pub fn build_program(
        &self,
        input: &SplitPlanInput,
        model: &DecayModel,
    ) -> (LinearProgram, SplitVariables) {
        let buffer = self.config.buffer_for(input.product_class);
        let mut program = LinearProgram::new();

        let tr_units: Vec<f64> = input
            .tr_lines
            .iter()
            .map(|line| line.unit_per_step * buffer)
            .collect();

        let n_tr: Vec<VarId> = (0..input.tr_lines.len())
            .map(|i| program.add_integer(format!("n_TR_{}", i)))
            .collect();
        let u_ls: Vec<VarId> = (0..input.ls_lines.len())
            .map(|i| program.add_continuous(format!("u_LS_{}", i)))
            .collect();
        let w_tr: Vec<VarId> = (0..input.tr_lines.len())
            .map(|i| program.add_continuous(format!("w_TR_{}", i)))
            .collect();
        let w_ls: Vec<VarId> = (0..input.ls_lines.len())
            .map(|i| program.add_continuous(format!("w_LS_{}", i)))
            .collect();

        // 缺口线性化: w + u >= D
        for (i, line) in input.tr_lines.iter().enumerate() {
            program.add_constraint(
                format!("shortfall_TR_{}", i),
                LinearExpr::new()
                    .with_term(w_tr[i], 1.0)
                    .with_term(n_tr[i], tr_units[i]),
                Relation::Ge,
                line.demand,
            );
        }
        for (i, line) in input.ls_lines.iter().enumerate() {
            program.add_constraint(
                format!("shortfall_LS_{}", i),
                LinearExpr::new()
                    .with_term(w_ls[i], 1.0)
                    .with_term(u_ls[i], 1.0),
                Relation::Ge,
                line.demand,
            );
        }

        // 供给约束
        let mut supply = LinearExpr::new();
        for (var, unit) in n_tr.iter().zip(&tr_units) {
            supply.add_term(*var, *unit);
        }
        for var in &u_ls {
            supply.add_term(*var, 1.0);
        }
        program.add_constraint("supply", supply, Relation::Eq, input.total_supply);

        // 目标
        let mut objective = LinearExpr::new();
        for (var, line) in w_tr.iter().zip(&input.tr_lines) {
            objective.add_term(*var, model.weight(line.lead_time));
        }
        for (var, line) in w_ls.iter().zip(&input.ls_lines) {
            objective.add_term(*var, model.weight(line.lead_time));
        }
        program.set_objective(objective);

        (
            program,
            SplitVariables {
                n_tr,
                u_ls,
                w_tr,
                w_ls,
                tr_units,
            },
        )
    }

    /// 网格搜索最优拆分
    ///
    /// # 返回
    /// - Ok(SplitPlan): 最小 ln(目标值) 对应的衰减系数与逐行分配
    /// - Err(Validation): 输入非法
    /// - Err(SolverFailure): 所有网格点均求解失败
    pub fn plan_split(&self, input: &SplitPlanInput) -> EngineResult<SplitPlan> {
        self.plan_split_with_run_id(input, Uuid::new_v4())
    }

    /// 同 `plan_split`，由调用方指定运行标识
    #[instrument(skip(self, input, run_id), fields(
        run_id = %run_id,
        solver = self.solver.name(),
        tr_lines = input.tr_lines.len(),
        ls_lines = input.ls_lines.len(),
        total_supply = input.total_supply
    ))]
    pub fn plan_split_with_run_id(
        &self,
        input: &SplitPlanInput,
        run_id: Uuid,
    ) -> EngineResult<SplitPlan> {
        input.validate()?;
        let models = self
            .config
            .decay_ratio_grid
            .iter()
            .map(|r| DecayModel::new(*r))
            .collect::<Result<Vec<_>, _>>()?;

        let mut candidates = Vec::with_capacity(models.len());
        let mut best: Option<(f64, DecayModel, SplitVariables, LpSolution)> = None;
        let mut last_error: Option<SolverError> = None;

        for model in &models {
            let (program, vars) = self.build_program(input, model);
            match self.solver.solve(&program) {
                Ok(solution) => {
                    let objective = solution.objective.max(0.0);
                    let score = objective.ln();
                    tracing::debug!(decay_ratio = model.decay_ratio(), objective, score, "网格点求解完成");
                    candidates.push(CandidateScore {
                        decay_ratio: model.decay_ratio(),
                        score: Some(score),
                    });

                    let improved = match &best {
                        Some((best_score, ..)) => *best_score > score,
                        None => true,
                    };
                    if improved {
                        best = Some((score, *model, vars, solution));
                    }
                }
                Err(e) => {
                    tracing::warn!(decay_ratio = model.decay_ratio(), error = %e, "网格点求解失败");
                    candidates.push(CandidateScore {
                        decay_ratio: model.decay_ratio(),
                        score: None,
                    });
                    last_error = Some(e);
                }
            }
        }

        let Some((score, model, vars, solution)) = best else {
            return Err(EngineError::SolverFailure {
                solver: self.solver.name().to_string(),
                attempts: models.len(),
                source: last_error.unwrap_or(SolverError::Infeasible),
            });
        };

        let tr_allocations = vars
            .n_tr
            .iter()
            .zip(&vars.tr_units)
            .map(|(var, unit)| {
                let steps = solution.value(*var).round().max(0.0) as u64;
                TrAllocation {
                    steps,
                    quantity: steps as f64 * unit,
                }
            })
            .collect();
        let ls_allocations = vars
            .u_ls
            .iter()
            .map(|var| solution.value(*var).max(0.0))
            .collect();

        tracing::info!(
            decay_ratio = model.decay_ratio(),
            score,
            "拆分优化完成"
        );

        Ok(SplitPlan {
            decay_ratio: model.decay_ratio(),
            score,
            objective: solution.objective.max(0.0),
            tr_allocations,
            ls_allocations,
            candidates,
        })
    }
}
