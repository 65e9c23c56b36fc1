// ==========================================
// 需求分配引擎 - 衰减加权拆分优化 输入/输出
// ==========================================
// 职责: 描述 TR / LS 两类需求的类级别汇总数据与拆分方案
// 说明: 非批次级分配，用于决定总体 TR/LS 供给比例
// ==========================================

use crate::domain::demand::DemandLine;
use crate::domain::error::{ValidationError, ValidationResult};
use crate::domain::types::{FinishProcess, ProductClass};
use crate::domain::week::DueWeek;
use serde::{Deserialize, Serialize};

/// 类级需求行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassLine {
    /// 距交期的周期数
    pub lead_time: f64,
    /// 未满足需求量
    pub demand: f64,
    /// 单步对应数量（TR 为标准包装数量，LS 为 1）
    pub unit_per_step: f64,
}

impl ClassLine {
    pub fn tr(lead_time: f64, demand: f64, standard_quantity: f64) -> Self {
        Self {
            lead_time,
            demand,
            unit_per_step: standard_quantity,
        }
    }

    pub fn ls(lead_time: f64, demand: f64) -> Self {
        Self {
            lead_time,
            demand,
            unit_per_step: 1.0,
        }
    }
}

// ==========================================
// SplitPlanInput - 拆分优化输入
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitPlanInput {
    pub tr_lines: Vec<ClassLine>,
    pub ls_lines: Vec<ClassLine>,
    pub total_supply: f64,
    pub product_class: ProductClass,
}

impl SplitPlanInput {
    /// 由平行数组构造
    ///
    /// # 参数
    /// - `ti_tr` / `d_tr`: TR 提前期 / 需求量
    /// - `ti_ls` / `d_ls`: LS 提前期 / 需求量
    /// - `standard_qty_tr`: TR 标准包装数量（全部 TR 行共用）
    #[allow(clippy::too_many_arguments)]
    pub fn from_arrays(
        ti_tr: &[f64],
        d_tr: &[f64],
        ti_ls: &[f64],
        d_ls: &[f64],
        standard_qty_tr: f64,
        total_supply: f64,
        product_class: ProductClass,
    ) -> ValidationResult<Self> {
        if ti_tr.len() != d_tr.len() {
            return Err(ValidationError::MismatchedLengths {
                name: "Ti_TR / D_TR".to_string(),
                left: ti_tr.len(),
                right: d_tr.len(),
            });
        }
        if ti_ls.len() != d_ls.len() {
            return Err(ValidationError::MismatchedLengths {
                name: "Ti_LS / D_LS".to_string(),
                left: ti_ls.len(),
                right: d_ls.len(),
            });
        }

        let input = Self {
            tr_lines: ti_tr
                .iter()
                .zip(d_tr)
                .map(|(&t, &d)| ClassLine::tr(t, d, standard_qty_tr))
                .collect(),
            ls_lines: ti_ls
                .iter()
                .zip(d_ls)
                .map(|(&t, &d)| ClassLine::ls(t, d))
                .collect(),
            total_supply,
            product_class,
        };
        input.validate()?;
        Ok(input)
    }

    /// 由需求行构造（提前期 = 交期周 - 参考周）
    ///
    /// TAPEREEL / BDPACK-TR / PACKLABEL 归入 TR（按标准包装取整），其余归入 LS
    pub fn from_demand_lines(
        lines: &[DemandLine],
        reference: DueWeek,
        total_supply: f64,
        product_class: ProductClass,
    ) -> ValidationResult<Self> {
        let mut tr_lines = Vec::new();
        let mut ls_lines = Vec::new();

        for line in lines {
            line.validate()?;
            let lead_time = line.due_week.lead_time_from(reference) as f64;
            let demand = line.remaining_balance as f64;
            match line.finish_process {
                FinishProcess::TapeReel | FinishProcess::BdpackTr | FinishProcess::PackLabel => {
                    tr_lines.push(ClassLine::tr(
                        lead_time,
                        demand,
                        line.standard_quantity as f64,
                    ));
                }
                _ => ls_lines.push(ClassLine::ls(lead_time, demand)),
            }
        }

        let input = Self {
            tr_lines,
            ls_lines,
            total_supply,
            product_class,
        };
        input.validate()?;
        Ok(input)
    }

    /// 校验输入（非负需求、正单步数量、有限值）
    pub fn validate(&self) -> ValidationResult<()> {
        if !self.total_supply.is_finite() || self.total_supply < 0.0 {
            return Err(ValidationError::InvalidTotalSupply(self.total_supply));
        }

        for (class, lines) in [("TR", &self.tr_lines), ("LS", &self.ls_lines)] {
            for (index, line) in lines.iter().enumerate() {
                if !line.demand.is_finite() || line.demand < 0.0 {
                    return Err(ValidationError::InvalidDemand {
                        class: class.to_string(),
                        index,
                        value: line.demand,
                    });
                }
                if !line.lead_time.is_finite() {
                    return Err(ValidationError::InvalidDemand {
                        class: format!("{}.lead_time", class),
                        index,
                        value: line.lead_time,
                    });
                }
            }
        }

        for (index, line) in self.tr_lines.iter().enumerate() {
            if !line.unit_per_step.is_finite() || line.unit_per_step <= 0.0 {
                return Err(ValidationError::InvalidUnitPerStep {
                    index,
                    value: line.unit_per_step,
                });
            }
        }

        Ok(())
    }
}

// ==========================================
// SplitPlan - 拆分方案
// ==========================================

/// TR 行分配结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrAllocation {
    /// 包装整数倍数 n_i
    pub steps: u64,
    /// n_i * 单步数量
    pub quantity: f64,
}

/// 单个衰减系数的求解记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub decay_ratio: f64,
    /// ln(衰减加权缺口)；求解失败为 None，零缺口为 -inf
    #[serde(with = "log_score::option")]
    pub score: Option<f64>,
}

/// 标量诊断 (score, decay_ratio)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitDiagnostic {
    #[serde(with = "log_score")]
    pub score: f64,
    pub decay_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitPlan {
    pub decay_ratio: f64,
    /// ln(objective)；供给覆盖全部需求时为 -inf
    #[serde(with = "log_score")]
    pub score: f64,
    /// 未取对数的衰减加权缺口
    pub objective: f64,
    pub tr_allocations: Vec<TrAllocation>,
    pub ls_allocations: Vec<f64>,
    pub candidates: Vec<CandidateScore>,
}

/// 调用方期望的输出形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SplitOutputKind {
    Diagnostic,
    Allocations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SplitOutput {
    Diagnostic(SplitDiagnostic),
    Allocations {
        tr_steps: Vec<u64>,
        tr_quantities: Vec<f64>,
        ls_quantities: Vec<f64>,
    },
}

impl SplitPlan {
    /// 缺口为零（供给覆盖全部需求）
    pub fn is_zero_backlog(&self) -> bool {
        self.score == f64::NEG_INFINITY
    }

    pub fn diagnostic(&self) -> SplitDiagnostic {
        SplitDiagnostic {
            score: self.score,
            decay_ratio: self.decay_ratio,
        }
    }

    pub fn tr_total(&self) -> f64 {
        self.tr_allocations.iter().map(|a| a.quantity).sum()
    }

    pub fn ls_total(&self) -> f64 {
        self.ls_allocations.iter().sum()
    }

    pub fn output(&self, kind: SplitOutputKind) -> SplitOutput {
        match kind {
            SplitOutputKind::Diagnostic => SplitOutput::Diagnostic(self.diagnostic()),
            SplitOutputKind::Allocations => SplitOutput::Allocations {
                tr_steps: self.tr_allocations.iter().map(|a| a.steps).collect(),
                tr_quantities: self.tr_allocations.iter().map(|a| a.quantity).collect(),
                ls_quantities: self.ls_allocations.clone(),
            },
        }
    }
}

// ==========================================
// 对数得分序列化
// ==========================================
// JSON 无法表示非有限浮点数: 有限值写数字，-inf / inf / NaN 写字符串

mod log_score {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_sign_negative() {
            serializer.serialize_str("-inf")
        } else {
            serializer.serialize_str("inf")
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Number(value) => Ok(value),
            Raw::Text(text) => match text.as_str() {
                "-inf" => Ok(f64::NEG_INFINITY),
                "inf" => Ok(f64::INFINITY),
                "NaN" => Ok(f64::NAN),
                other => Err(serde::de::Error::custom(format!("无效得分: {}", other))),
            },
        }
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};

        #[derive(Deserialize)]
        struct Wrapped(#[serde(with = "super")] f64);

        pub fn serialize<S: Serializer>(
            value: &Option<f64>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => super::serialize(v, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<f64>, D::Error> {
            Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|w| w.0))
        }
    }
}
