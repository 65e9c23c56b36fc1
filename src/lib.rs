// ==========================================
// 需求分配引擎 - 核心库
// ==========================================
// 职责: 把单个成品批次分配到按交期排序的成品需求行
//   贪心分配 -> 包装余量回补 -> FULL/SPLIT 判定
//   衰减加权 TR/LS 拆分优化
// 系统定位: 纯计算库，不含界面与外部系统交互
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 分配规则
pub mod engine;

// 求解器层 - LP/MIP 抽象
pub mod solver;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 引擎配置
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AllocationCategory, DemandCategory, FinishProcess, FinishType, ProcessFamily, ProductClass,
};

// 领域实体
pub use domain::{
    AllocationRecord, DemandLine, DueWeek, Lot, PartAllocationSummary, SplitPlan,
    SplitPlanInput,
};

// 引擎
pub use engine::{
    AllocationOrchestrator, AllocationOutcome, DecaySplitOptimizer, DemandOrdering, EngineError,
    LotAllocator, LotScreening, SurplusResolver,
};

// 配置
pub use config::EngineConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "成品批次需求分配引擎";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(!APP_NAME.is_empty());
    }
}
