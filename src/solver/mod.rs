// ==========================================
// 需求分配引擎 - 求解器抽象层
// ==========================================
// 职责: 窄接口（变量、线性约束、目标、求解），任何 LP/MIP 后端可替换
// 红线: 网格搜索与目标构造不依赖具体求解器
// ==========================================

pub mod microlp_backend;
pub mod model;

use thiserror::Error;

pub use microlp_backend::MicroLpSolver;
pub use model::{
    LinearConstraint, LinearExpr, LinearProgram, LpSolution, Relation, VarId, VarKind,
    VariableDef,
};

/// 求解器错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("模型不可行")]
    Infeasible,

    #[error("模型无界")]
    Unbounded,

    #[error("求解器内部错误: {0}")]
    Backend(String),
}

/// 线性/混合整数规划求解器
pub trait LinearSolver {
    /// 后端名称（用于日志）
    fn name(&self) -> &str;

    /// 求解最小化问题
    fn solve(&self, program: &LinearProgram) -> Result<LpSolution, SolverError>;
}

impl<S: LinearSolver + ?Sized> LinearSolver for &S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&self, program: &LinearProgram) -> Result<LpSolution, SolverError> {
        (**self).solve(program)
    }
}

impl<S: LinearSolver + ?Sized> LinearSolver for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&self, program: &LinearProgram) -> Result<LpSolution, SolverError> {
        (**self).solve(program)
    }
}
