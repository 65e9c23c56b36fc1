// ==========================================
// 需求分配引擎 - 引擎层
// ==========================================
// 职责: 实现分配规则，不做 I/O
// 红线: 失败返回错误，不输出部分分配；筛选规则必须输出 reason
// ==========================================

pub mod allocator;
pub mod classifier;
pub mod decay;
pub mod error;
pub mod lot_screening;
pub mod orchestrator;
pub mod ordering;
pub mod split_optimizer;
pub mod surplus;

// 重导出核心引擎
pub use allocator::{allocate_in_sequence, candidate_floor, LotAllocation, LotAllocator};
pub use classifier::{classify_demands, evaluate_allocation};
pub use decay::{decay_weight, DecayModel};
pub use error::{EngineError, EngineResult};
pub use lot_screening::{LotEligibility, LotScreening, WipLotRow};
pub use orchestrator::{AllocationOrchestrator, AllocationOutcome};
pub use ordering::{DemandOrdering, DueWeekGroup};
pub use split_optimizer::{DecaySplitOptimizer, SplitVariables};
pub use surplus::{select_destination_process, SurplusResolution, SurplusResolver};
