// ==========================================
// 需求分配引擎 - 线性/整数规划模型
// ==========================================
// 职责: 与求解器无关的模型描述（变量、线性约束、目标函数）
// 约定: 目标函数一律最小化
// ==========================================

use serde::{Deserialize, Serialize};

/// 变量句柄（模型内下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VarId(pub(crate) usize);

impl VarId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VarKind {
    Continuous,
    Integer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDef {
    pub name: String,
    pub kind: VarKind,
    pub lower: f64,
}

/// 线性表达式: Σ coef * var + constant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearExpr {
    pub terms: Vec<(VarId, f64)>,
    pub constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant(value: f64) -> Self {
        Self {
            terms: Vec::new(),
            constant: value,
        }
    }

    pub fn term(var: VarId, coef: f64) -> Self {
        Self {
            terms: vec![(var, coef)],
            constant: 0.0,
        }
    }

    pub fn add_term(&mut self, var: VarId, coef: f64) -> &mut Self {
        self.terms.push((var, coef));
        self
    }

    pub fn with_term(mut self, var: VarId, coef: f64) -> Self {
        self.terms.push((var, coef));
        self
    }

    /// 代入变量取值求值
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.constant
            + self
                .terms
                .iter()
                .map(|(var, coef)| coef * values.get(var.0).copied().unwrap_or(0.0))
                .sum::<f64>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    Le,
    Ge,
    Eq,
}

/// 线性约束: expr (<= | >= | ==) rhs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    pub name: String,
    pub expr: LinearExpr,
    pub relation: Relation,
    pub rhs: f64,
}

impl LinearConstraint {
    /// 按容差检查是否满足
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.relation {
            Relation::Le => lhs <= self.rhs + tolerance,
            Relation::Ge => lhs + tolerance >= self.rhs,
            Relation::Eq => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

// ==========================================
// LinearProgram - 最小化问题
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearProgram {
    variables: Vec<VariableDef>,
    constraints: Vec<LinearConstraint>,
    objective: LinearExpr,
}

impl LinearProgram {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新增非负连续变量
    pub fn add_continuous(&mut self, name: impl Into<String>) -> VarId {
        self.add_variable(name, VarKind::Continuous, 0.0)
    }

    /// 新增非负整数变量
    pub fn add_integer(&mut self, name: impl Into<String>) -> VarId {
        self.add_variable(name, VarKind::Integer, 0.0)
    }

    pub fn add_variable(&mut self, name: impl Into<String>, kind: VarKind, lower: f64) -> VarId {
        self.variables.push(VariableDef {
            name: name.into(),
            kind,
            lower,
        });
        VarId(self.variables.len() - 1)
    }

    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        expr: LinearExpr,
        relation: Relation,
        rhs: f64,
    ) {
        self.constraints.push(LinearConstraint {
            name: name.into(),
            expr,
            relation,
            rhs,
        });
    }

    pub fn set_objective(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    pub fn variables(&self) -> &[VariableDef] {
        &self.variables
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }
}

/// 求解结果（变量取值按 VarId 下标排列）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LpSolution {
    pub values: Vec<f64>,
    pub objective: f64,
}

impl LpSolution {
    /// 由变量取值构造，目标值按模型重新计算
    pub fn from_values(program: &LinearProgram, values: Vec<f64>) -> Self {
        let objective = program.objective().evaluate(&values);
        Self { values, objective }
    }

    pub fn value(&self, var: VarId) -> f64 {
        self.values.get(var.0).copied().unwrap_or(0.0)
    }
}
