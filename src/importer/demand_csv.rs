// ==========================================
// 需求分配引擎 - 需求 CSV 导入
// ==========================================
// 表头: BSD, Finish Part #, Finish Process, Finish Type, Remaining Balance, STD_QTY
// 清洗: 去首尾空白，数量去千分位逗号，STD_QTY 为空按 0
// 输出: 已校验的 DemandLine（失败时报告文件行号）
// ==========================================

use crate::domain::demand::DemandLine;
use crate::importer::error::{ImportError, ImportResult};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::instrument;

const REQUIRED_COLUMNS: [&str; 6] = [
    "BSD",
    "Finish Part #",
    "Finish Process",
    "Finish Type",
    "Remaining Balance",
    "STD_QTY",
];

/// 原始需求行（字段保持字符串，转换时带行号报错）
#[derive(Debug, Clone, Deserialize)]
struct RawDemandRow {
    #[serde(rename = "BSD")]
    due_week: String,
    #[serde(rename = "Finish Part #")]
    finish_part_number: String,
    #[serde(rename = "Finish Process")]
    finish_process: String,
    #[serde(rename = "Finish Type")]
    finish_type: String,
    #[serde(rename = "Remaining Balance")]
    remaining_balance: String,
    #[serde(rename = "STD_QTY", default)]
    standard_quantity: String,
}

impl RawDemandRow {
    fn is_blank(&self) -> bool {
        [
            &self.due_week,
            &self.finish_part_number,
            &self.finish_process,
            &self.finish_type,
            &self.remaining_balance,
            &self.standard_quantity,
        ]
        .iter()
        .all(|v| v.trim().is_empty())
    }

    fn into_demand_line(self, row: usize) -> ImportResult<DemandLine> {
        let balance = parse_quantity(&self.remaining_balance).map_err(|message| {
            ImportError::TypeConversionError {
                row,
                field: "Remaining Balance".to_string(),
                message,
            }
        })?;
        let std_qty = if self.standard_quantity.trim().is_empty() {
            0
        } else {
            parse_quantity(&self.standard_quantity).map_err(|message| {
                ImportError::TypeConversionError {
                    row,
                    field: "STD_QTY".to_string(),
                    message,
                }
            })?
        };

        DemandLine::parse(
            &self.due_week,
            &self.finish_part_number,
            &self.finish_process,
            &self.finish_type,
            balance,
            std_qty,
        )
        .map_err(|source| ImportError::InvalidRow { row, source })
    }
}

/// 解析数量（"1,630" -> 1630，"600.0" -> 600）
pub fn parse_quantity(value: &str) -> Result<i64, String> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Err("数量为空".to_string());
    }

    if let Ok(v) = cleaned.parse::<i64>() {
        return Ok(v);
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 => Ok(v as i64),
        Ok(v) => Err(format!("数量必须为整数，实际 {}", v)),
        Err(_) => Err(format!("无法解析数量: {}", value.trim())),
    }
}

// ==========================================
// DemandCsvImporter - 需求 CSV 导入器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct DemandCsvImporter;

impl DemandCsvImporter {
    pub fn new() -> Self {
        Self
    }

    /// 从文件导入
    #[instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub fn import_file(&self, path: impl AsRef<Path>) -> ImportResult<Vec<DemandLine>> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        let file = std::fs::File::open(path)?;
        let lines = self.import_reader(file)?;
        tracing::info!(rows = lines.len(), "需求 CSV 导入完成");
        Ok(lines)
    }

    /// 从任意读取源导入
    pub fn import_reader<R: Read>(&self, reader: R) -> ImportResult<Vec<DemandLine>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            // STD_QTY 列缺失时按 0 处理
            if column != "STD_QTY" && !headers.iter().any(|h| h == column) {
                return Err(ImportError::MissingColumn(column.to_string()));
            }
        }

        let mut lines = Vec::new();
        for (idx, result) in reader.deserialize::<RawDemandRow>().enumerate() {
            // 表头占第 1 行
            let row = idx + 2;
            let raw = result.map_err(|e| ImportError::TypeConversionError {
                row,
                field: "*".to_string(),
                message: e.to_string(),
            })?;

            // 跳过完全空白的行
            if raw.is_blank() {
                continue;
            }

            lines.push(raw.into_demand_line(row)?);
        }

        Ok(lines)
    }
}
