// ==========================================
// 需求分配引擎 - microlp 求解后端
// ==========================================
// 依托 good_lp 的纯 Rust 求解器（支持整数变量分支定界）
// ==========================================

use crate::solver::model::{LinearExpr, LinearProgram, LpSolution, Relation, VarKind};
use crate::solver::{LinearSolver, SolverError};
use good_lp::solvers::microlp::microlp;
use good_lp::{variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable};

/// good_lp + microlp 后端
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpSolver;

impl MicroLpSolver {
    pub fn new() -> Self {
        Self
    }
}

fn to_expression(expr: &LinearExpr, handles: &[Variable]) -> Expression {
    let linear: Expression = expr
        .terms
        .iter()
        .filter_map(|(var, coef)| handles.get(var.index()).map(|h| *coef * *h))
        .sum();
    linear + expr.constant
}

impl LinearSolver for MicroLpSolver {
    fn name(&self) -> &str {
        "microlp"
    }

    fn solve(&self, program: &LinearProgram) -> Result<LpSolution, SolverError> {
        if program.variables().is_empty() {
            return Err(SolverError::Backend("模型没有变量".to_string()));
        }

        let mut vars = ProblemVariables::new();
        let handles: Vec<Variable> = program
            .variables()
            .iter()
            .map(|def| {
                let definition = variable().min(def.lower).name(def.name.clone());
                match def.kind {
                    VarKind::Integer => vars.add(definition.integer()),
                    VarKind::Continuous => vars.add(definition),
                }
            })
            .collect();

        let objective = to_expression(program.objective(), &handles);
        let mut model = vars.minimise(objective).using(microlp);

        for constraint in program.constraints() {
            let lhs = to_expression(&constraint.expr, &handles);
            let c = match constraint.relation {
                Relation::Le => good_lp::constraint::leq(lhs, constraint.rhs),
                Relation::Ge => good_lp::constraint::geq(lhs, constraint.rhs),
                Relation::Eq => good_lp::constraint::eq(lhs, constraint.rhs),
            };
            model = model.with(c);
        }

        let solution = model.solve().map_err(|e| match e {
            ResolutionError::Infeasible => SolverError::Infeasible,
            ResolutionError::Unbounded => SolverError::Unbounded,
            other => SolverError::Backend(other.to_string()),
        })?;

        let values = handles.iter().map(|h| solution.value(*h)).collect();
        Ok(LpSolution::from_values(program, values))
    }
}
