// ==========================================
// 需求分配引擎 - 引擎配置
// ==========================================
// 存储: JSON 文件（路径由 DEMAND_ALLOC_CONFIG 指定，未设置则使用默认值）
// ==========================================

use crate::domain::types::ProductClass;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "DEMAND_ALLOC_CONFIG";

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件解析失败 ({path}): {message}")]
    ParseError { path: String, message: String },

    #[error("配置值非法 (key: {key}): {message}")]
    InvalidValue { key: String, message: String },
}

// ==========================================
// EngineConfig - 引擎配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 标准包装数量缓冲系数
    pub standard_qty_buffer: f64,

    /// 需要缓冲调整的产品类别
    pub buffered_product_classes: Vec<ProductClass>,

    /// 衰减系数网格（按此顺序求解，先出现者赢得并列）
    pub decay_ratio_grid: Vec<f64>,

    /// 批次筛选规则
    pub lot_screening: LotScreeningConfig,
}

/// 批次筛选规则
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LotScreeningConfig {
    /// 描述中含任一关键字即排除（工程/新品/认证批次）
    pub excluded_keywords: Vec<String>,

    /// 批次号前缀（忽略大小写）
    pub excluded_lot_prefix: String,

    /// 挂起工序号
    pub held_operation: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            standard_qty_buffer: 1.002,
            buffered_product_classes: vec![ProductClass::Maxcim],
            decay_ratio_grid: vec![0.1, 0.3, 0.5, 0.7, 0.9],
            lot_screening: LotScreeningConfig::default(),
        }
    }
}

impl Default for LotScreeningConfig {
    fn default() -> Self {
        Self {
            excluded_keywords: ["ENG", "NPI", "QUAL", "QUA"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            excluded_lot_prefix: "z".to_string(),
            held_operation: 9790,
        }
    }
}

impl EngineConfig {
    /// 从 JSON 文件加载并校验
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: display.clone(),
            message: e.to_string(),
        })?;

        let config: EngineConfig =
            serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
                path: display,
                message: e.to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// 按环境变量加载，未设置时返回默认配置
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                tracing::info!(path = %path, "加载引擎配置文件");
                Self::load(path.trim())
            }
            _ => {
                tracing::debug!("未设置 {}，使用默认配置", CONFIG_PATH_ENV);
                Ok(Self::default())
            }
        }
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.standard_qty_buffer.is_finite() || self.standard_qty_buffer < 1.0 {
            return Err(ConfigError::InvalidValue {
                key: "standard_qty_buffer".to_string(),
                message: format!("必须 >= 1.0，实际 {}", self.standard_qty_buffer),
            });
        }

        if self.decay_ratio_grid.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "decay_ratio_grid".to_string(),
                message: "网格不能为空".to_string(),
            });
        }

        if let Some(bad) = self
            .decay_ratio_grid
            .iter()
            .find(|r| !(r.is_finite() && **r > 0.0 && **r < 1.0))
        {
            return Err(ConfigError::InvalidValue {
                key: "decay_ratio_grid".to_string(),
                message: format!("衰减系数必须在 (0,1) 区间，实际 {}", bad),
            });
        }

        Ok(())
    }

    /// 该产品类别是否需要标准包装缓冲
    pub fn requires_buffer(&self, product_class: ProductClass) -> bool {
        self.buffered_product_classes.contains(&product_class)
    }

    /// 该产品类别适用的缓冲系数（不需要时为 1.0）
    pub fn buffer_for(&self, product_class: ProductClass) -> f64 {
        if self.requires_buffer(product_class) {
            self.standard_qty_buffer
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.requires_buffer(ProductClass::Maxcim));
        assert!(!config.requires_buffer(ProductClass::Comets));
        assert_eq!(config.buffer_for(ProductClass::Maxcim), 1.002);
        assert_eq!(config.buffer_for(ProductClass::Comets), 1.0);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"decay_ratio_grid": [0.2, 0.5, 0.9]}}"#).unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.decay_ratio_grid, vec![0.2, 0.5, 0.9]);
        assert_eq!(config.standard_qty_buffer, 1.002);
        assert_eq!(config.lot_screening.held_operation, 9790);
    }

    #[test]
    fn test_load_rejects_invalid_grid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"decay_ratio_grid": [0.5, 1.0]}}"#).unwrap();

        let err = EngineConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = EngineConfig::load("/nonexistent/demand_alloc.json").unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
