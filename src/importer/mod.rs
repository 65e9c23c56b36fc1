// ==========================================
// 需求分配引擎 - 导入层
// ==========================================
// 职责: 外部需求数据 -> 已校验的 DemandLine
// 支持: CSV
// ==========================================

pub mod demand_csv;
pub mod error;

// 重导出核心类型
pub use demand_csv::{parse_quantity, DemandCsvImporter};
pub use error::{ImportError, ImportResult};
