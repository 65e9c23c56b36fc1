// ==========================================
// 需求分配引擎 - 引擎层错误类型
// ==========================================
// 三类失败: 畸形输入 / 求解失败 / 无可分配需求
// 红线: 失败即返回，不输出部分分配结果
// ==========================================

use crate::domain::error::ValidationError;
use crate::solver::SolverError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    // ===== 畸形输入（分配开始前拒绝）=====
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("没有可分配需求: 批次数量={lot_quantity}, 需求行数={line_count}")]
    NoAllocatableDemand { lot_quantity: u64, line_count: usize },

    // ===== 求解失败 =====
    #[error("拆分优化求解失败 (solver={solver}, 尝试 {attempts} 个衰减系数): {source}")]
    SolverFailure {
        solver: String,
        attempts: usize,
        #[source]
        source: SolverError,
    },

    // ===== 内部不变量 =====
    #[error("分配守恒校验失败: 分配合计={allocated}, 批次数量={lot_quantity}")]
    ConservationViolated { allocated: u64, lot_quantity: u64 },
}

impl EngineError {
    /// 是否为畸形输入类错误
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            EngineError::Validation(_) | EngineError::NoAllocatableDemand { .. }
        )
    }

    /// 是否为求解失败
    pub fn is_solver_failure(&self) -> bool {
        matches!(self, EngineError::SolverFailure { .. })
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
