// ==========================================
// 需求分配引擎 - 领域类型定义
// ==========================================
// 依据: 需求行字段 Finish Process / Finish Type / 产品类别
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 精整工序 (Finish Process)
// ==========================================
// 包装类工序必须按标准包装数量 (STD_QTY) 的整数倍交付
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FinishProcess {
    TapeReel,  // 卷带
    LeadScan,  // 引脚扫描
    PackLabel, // 贴标包装
    BdpackTr,  // 板装-卷带
    BdpackLs,  // 板装-扫描
    Other(String),
}

impl FinishProcess {
    /// 是否为包装类工序（需按 STD_QTY 取整）
    pub fn is_packaging(&self) -> bool {
        matches!(
            self,
            FinishProcess::TapeReel
                | FinishProcess::PackLabel
                | FinishProcess::BdpackTr
                | FinishProcess::BdpackLs
        )
    }

    /// 工序族（用于 TR/LS 汇总）
    pub fn family(&self) -> ProcessFamily {
        match self {
            FinishProcess::TapeReel | FinishProcess::BdpackTr => ProcessFamily::Tr,
            FinishProcess::LeadScan | FinishProcess::BdpackLs => ProcessFamily::Ls,
            _ => ProcessFamily::Other,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FinishProcess::TapeReel => "TAPEREEL",
            FinishProcess::LeadScan => "LEADSCAN",
            FinishProcess::PackLabel => "PACKLABEL",
            FinishProcess::BdpackTr => "BDPACK-TR",
            FinishProcess::BdpackLs => "BDPACK-LS",
            FinishProcess::Other(s) => s.as_str(),
        }
    }
}

impl From<&str> for FinishProcess {
    fn from(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_uppercase().as_str() {
            "TAPEREEL" => FinishProcess::TapeReel,
            "LEADSCAN" => FinishProcess::LeadScan,
            "PACKLABEL" => FinishProcess::PackLabel,
            "BDPACK-TR" => FinishProcess::BdpackTr,
            "BDPACK-LS" => FinishProcess::BdpackLs,
            _ => FinishProcess::Other(trimmed.to_string()),
        }
    }
}

impl From<String> for FinishProcess {
    fn from(s: String) -> Self {
        FinishProcess::from(s.as_str())
    }
}

impl From<FinishProcess> for String {
    fn from(p: FinishProcess) -> Self {
        p.as_str().to_string()
    }
}

impl fmt::Display for FinishProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 工序族 (Process Family)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessFamily {
    Tr,    // 卷带类
    Ls,    // 扫描类
    Other, // 其他
}

impl fmt::Display for ProcessFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessFamily::Tr => write!(f, "TR"),
            ProcessFamily::Ls => write!(f, "LS"),
            ProcessFamily::Other => write!(f, "OTHER"),
        }
    }
}

// ==========================================
// 精整类型 (Finish Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishType {
    Std,  // 标准目录包装
    Cust, // 客户定制
}

impl fmt::Display for FinishType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinishType::Std => write!(f, "STD"),
            FinishType::Cust => write!(f, "CUST"),
        }
    }
}

impl FromStr for FinishType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "STD" => Ok(FinishType::Std),
            "CUST" => Ok(FinishType::Cust),
            other => Err(format!("未知精整类型: {}", other)),
        }
    }
}

// ==========================================
// 产品类别 (Product Class)
// ==========================================
// MAXCIM 类别的标准包装数量需乘以缓冲系数（见 EngineConfig）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductClass {
    Comets,
    Maxcim,
}

impl fmt::Display for ProductClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductClass::Comets => write!(f, "COMETS"),
            ProductClass::Maxcim => write!(f, "MAXCIM"),
        }
    }
}

impl FromStr for ProductClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "COMETS" => Ok(ProductClass::Comets),
            "MAXCIM" => Ok(ProductClass::Maxcim),
            other => Err(format!("未知产品类别: {}", other)),
        }
    }
}

// ==========================================
// 分配类别 (Allocation Category)
// ==========================================
// FULL: 仅一个成品料号有分配量且无 CUST
// SPLIT: 其余情况
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationCategory {
    Full,
    Split,
}

impl fmt::Display for AllocationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationCategory::Full => write!(f, "FULL"),
            AllocationCategory::Split => write!(f, "SPLIT"),
        }
    }
}

// ==========================================
// 需求类别 (Demand Category)
// ==========================================
// 细粒度需求分类，仅作参考，不替代 FULL/SPLIT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DemandCategory {
    SplitCustSpecial,
    Maxcim,
    FullTr,
    FullLs,
    SplitTr,
    SplitStd,
}

impl fmt::Display for DemandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemandCategory::SplitCustSpecial => write!(f, "Split CUST Special"),
            DemandCategory::Maxcim => write!(f, "Maxcim"),
            DemandCategory::FullTr => write!(f, "Full TR"),
            DemandCategory::FullLs => write!(f, "Full LS"),
            DemandCategory::SplitTr => write!(f, "Split TR"),
            DemandCategory::SplitStd => write!(f, "Split STD"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_process_parse_and_packaging() {
        assert_eq!(FinishProcess::from("taperEEL "), FinishProcess::TapeReel);
        assert_eq!(FinishProcess::from("BDPACK-LS"), FinishProcess::BdpackLs);
        assert_eq!(
            FinishProcess::from("DRYPACK"),
            FinishProcess::Other("DRYPACK".to_string())
        );

        assert!(FinishProcess::TapeReel.is_packaging());
        assert!(FinishProcess::PackLabel.is_packaging());
        assert!(FinishProcess::BdpackTr.is_packaging());
        assert!(FinishProcess::BdpackLs.is_packaging());
        assert!(!FinishProcess::LeadScan.is_packaging());
        assert!(!FinishProcess::Other("DRYPACK".to_string()).is_packaging());
    }

    #[test]
    fn test_finish_process_serde_as_string() {
        let json = serde_json::to_string(&FinishProcess::BdpackTr).unwrap();
        assert_eq!(json, "\"BDPACK-TR\"");
        let back: FinishProcess = serde_json::from_str("\"LEADSCAN\"").unwrap();
        assert_eq!(back, FinishProcess::LeadScan);
    }

    #[test]
    fn test_finish_type_and_product_class_from_str() {
        assert_eq!("cust".parse::<FinishType>().unwrap(), FinishType::Cust);
        assert!("SPECIAL".parse::<FinishType>().is_err());
        assert_eq!("Maxcim".parse::<ProductClass>().unwrap(), ProductClass::Maxcim);
        assert!("OTHER".parse::<ProductClass>().is_err());
    }
}
