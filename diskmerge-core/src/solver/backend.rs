//! `good_lp` backend using the pure-Rust `microlp` solver.

use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable,
    default_solver, variable,
};
use tracing::{debug, instrument};

use super::{Assignment, Optimizer};
use crate::{
    error::SolverError,
    model::{BinaryProgram, Comparison, LinearExpr},
};

const NAME: &str = "good_lp/microlp";

/// [`Optimizer`] backed by `good_lp`.
///
/// # Examples
/// ```
/// use diskmerge_core::{
///     BinaryProgram, Comparison, ConstraintKind, GoodLpOptimizer, LinearConstraint, Optimizer,
///     ProgramBuilder,
/// };
///
/// let mut program = BinaryProgram::default();
/// let a = program.add_binary();
/// let b = program.add_binary();
/// program.add_constraint(LinearConstraint {
///     kind: ConstraintKind::Assignment,
///     expr: [(a, 1.0), (b, 1.0)].into_iter().collect(),
///     comparison: Comparison::AtMost,
///     rhs: 1.0,
/// });
/// program.minimise([(a, -1.0), (b, -2.0)].into_iter().collect());
/// let assignment = GoodLpOptimizer::new().solve(&program)?;
/// assert_eq!(assignment.values(), &[false, true]);
/// # Ok::<(), diskmerge_core::SolverError>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct GoodLpOptimizer;

impl GoodLpOptimizer {
    /// Creates the optimizer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Optimizer for GoodLpOptimizer {
    fn name(&self) -> &str {
        NAME
    }

    #[instrument(
        name = "core.solve",
        err,
        skip(self, program),
        fields(
            solver = NAME,
            variables = program.variable_count(),
            rows = program.constraints().len(),
        ),
    )]
    fn solve(&self, program: &BinaryProgram) -> Result<Assignment, SolverError> {
        let mut vars = ProblemVariables::new();
        let xs: Vec<Variable> = (0..program.variable_count())
            .map(|_| vars.add(variable().binary()))
            .collect();

        let objective = to_expression(program.objective(), &xs);
        let mut problem = vars.minimise(objective).using(default_solver);
        for row in program.constraints() {
            let expr = to_expression(&row.expr, &xs);
            let constraint = match row.comparison {
                Comparison::Equal => expr.eq(row.rhs),
                Comparison::AtMost => expr.leq(row.rhs),
                Comparison::AtLeast => expr.geq(row.rhs),
            };
            problem = problem.with(constraint);
        }

        let solution = problem.solve().map_err(map_resolution_error)?;
        let values: Vec<f64> = xs.iter().map(|&x| solution.value(x)).collect();
        let assignment = Assignment::from_reals(&values);
        debug!(
            set = assignment.values().iter().filter(|&&value| value).count(),
            "solve completed"
        );
        Ok(assignment)
    }
}

fn to_expression(expr: &LinearExpr, xs: &[Variable]) -> Expression {
    let mut out = Expression::with_capacity(expr.terms().len());
    for &(var, coefficient) in expr.terms() {
        out.add_mul(coefficient, xs[var.index()]);
    }
    out
}

fn map_resolution_error(error: ResolutionError) -> SolverError {
    let solver = NAME.to_owned();
    match error {
        ResolutionError::Infeasible => SolverError::Infeasible { solver },
        ResolutionError::Unbounded => SolverError::Unbounded { solver },
        other => SolverError::Backend {
            solver,
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConstraintKind, LinearConstraint, ProgramBuilder};

    #[test]
    fn reports_infeasible_programs() {
        let mut program = BinaryProgram::default();
        let a = program.add_binary();
        program.add_constraint(LinearConstraint {
            kind: ConstraintKind::Assignment,
            expr: [(a, 1.0)].into_iter().collect(),
            comparison: Comparison::Equal,
            rhs: 2.0,
        });
        let err = GoodLpOptimizer::new()
            .solve(&program)
            .expect_err("x = 2 has no binary solution");
        assert_eq!(err.code().as_str(), "SOLVER_INFEASIBLE");
    }

    #[test]
    fn honours_at_least_rows() {
        let mut program = BinaryProgram::default();
        let a = program.add_binary();
        let b = program.add_binary();
        program.add_constraint(LinearConstraint {
            kind: ConstraintKind::Nesting,
            expr: [(a, 1.0), (b, -1.0)].into_iter().collect(),
            comparison: Comparison::AtLeast,
            rhs: 0.0,
        });
        program.minimise([(a, 1.0), (b, -3.0)].into_iter().collect());
        let assignment = GoodLpOptimizer::new().solve(&program).expect("feasible");
        assert_eq!(assignment.values(), &[true, true]);
        assert!(assignment.check_len(&program).is_ok());
    }
}
