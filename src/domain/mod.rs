// ==========================================
// 需求分配引擎 - 领域模型层
// ==========================================
// 职责: 定义需求行、批次、分配记录、拆分优化输入输出
// 红线: 不含分配算法，仅做构造校验
// ==========================================

pub mod allocation;
pub mod demand;
pub mod error;
pub mod split;
pub mod types;
pub mod week;

// 重导出核心类型
pub use allocation::{AllocationRecord, PartAllocation, PartAllocationSummary};
pub use demand::{DemandLine, Lot};
pub use error::{ValidationError, ValidationResult};
pub use split::{
    CandidateScore, ClassLine, SplitDiagnostic, SplitOutput, SplitOutputKind, SplitPlan,
    SplitPlanInput, TrAllocation,
};
pub use types::{
    AllocationCategory, DemandCategory, FinishProcess, FinishType, ProcessFamily, ProductClass,
};
pub use week::DueWeek;
