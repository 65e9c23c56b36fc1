// ==========================================
// 需求分配引擎 - 配置层
// ==========================================
// 职责: 缓冲系数、衰减网格、批次筛选规则
// ==========================================

pub mod engine_config;

// 重导出
pub use engine_config::{ConfigError, EngineConfig, LotScreeningConfig, CONFIG_PATH_ENV};
