// ==========================================
// 需求分配引擎 - 衰减加权缺口模型
// ==========================================
// 权重: r^Ti = exp(ln(r) * Ti)，交期越近权重越接近 1
// 缺口: max(D_i - u_i, 0)
// 评分: Z(r) = ln(Σ 权重 * 缺口)，越小越好
// ==========================================

use crate::domain::error::{ValidationError, ValidationResult};
use crate::domain::split::{ClassLine, SplitPlanInput};

/// 衰减权重 r^lead_time
pub fn decay_weight(decay_ratio: f64, lead_time: f64) -> f64 {
    (decay_ratio.ln() * lead_time).exp()
}

// ==========================================
// DecayModel - 单个衰减系数下的缺口评估
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayModel {
    decay_ratio: f64,
}

impl DecayModel {
    pub fn new(decay_ratio: f64) -> ValidationResult<Self> {
        if !(decay_ratio.is_finite() && decay_ratio > 0.0 && decay_ratio < 1.0) {
            return Err(ValidationError::InvalidDecayRatio(decay_ratio));
        }
        Ok(Self { decay_ratio })
    }

    pub fn decay_ratio(&self) -> f64 {
        self.decay_ratio
    }

    pub fn weight(&self, lead_time: f64) -> f64 {
        decay_weight(self.decay_ratio, lead_time)
    }

    /// 衰减加权缺口 Σ r^Ti * max(D_i - u_i, 0)
    pub fn decayed_backlog(
        &self,
        input: &SplitPlanInput,
        u_tr: &[f64],
        u_ls: &[f64],
    ) -> ValidationResult<f64> {
        Ok(self.class_backlog("u_TR", &input.tr_lines, u_tr)?
            + self.class_backlog("u_LS", &input.ls_lines, u_ls)?)
    }

    /// ln(衰减加权缺口)
    pub fn score(&self, input: &SplitPlanInput, u_tr: &[f64], u_ls: &[f64]) -> ValidationResult<f64> {
        Ok(self.decayed_backlog(input, u_tr, u_ls)?.ln())
    }

    /// 按候选总量评估份额方案: u = share * Z
    ///
    /// # 参数
    /// - `tr_shares` / `ls_shares`: 各行占该类总量的比例
    /// - `z_tr` / `z_ls`: 候选 TR / LS 总量
    pub fn score_split(
        &self,
        input: &SplitPlanInput,
        tr_shares: &[f64],
        ls_shares: &[f64],
        z_tr: f64,
        z_ls: f64,
    ) -> ValidationResult<f64> {
        let u_tr: Vec<f64> = tr_shares.iter().map(|s| s * z_tr).collect();
        let u_ls: Vec<f64> = ls_shares.iter().map(|s| s * z_ls).collect();
        self.score(input, &u_tr, &u_ls)
    }

    fn class_backlog(&self, name: &str, lines: &[ClassLine], allocated: &[f64]) -> ValidationResult<f64> {
        if lines.len() != allocated.len() {
            return Err(ValidationError::MismatchedLengths {
                name: name.to_string(),
                left: lines.len(),
                right: allocated.len(),
            });
        }

        Ok(lines
            .iter()
            .zip(allocated)
            .map(|(line, u)| self.weight(line.lead_time) * (line.demand - u).max(0.0))
            .sum())
    }
}
