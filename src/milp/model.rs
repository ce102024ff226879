//! MILP model definition.

use serde::{Deserialize, Serialize};

/// Index of a variable inside a [`MilpModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(pub usize);

/// Domain of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    /// Integer within `[lower, upper]`.
    Integer,
    /// Integer within `[0, 1]`.
    Binary,
    /// Real within `[lower, upper]`.
    Continuous,
}

/// A bounded decision variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Variable name (unique within the model).
    pub name: String,
    /// Domain.
    pub kind: VarKind,
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
}

impl Variable {
    /// Creates an integer variable with the given bounds.
    pub fn integer(name: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            name: name.into(),
            kind: VarKind::Integer,
            lower,
            upper,
        }
    }

    /// Creates a binary variable.
    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: VarKind::Binary,
            lower: 0.0,
            upper: 1.0,
        }
    }

    /// Creates a continuous variable with the given bounds.
    pub fn continuous(name: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            name: name.into(),
            kind: VarKind::Continuous,
            lower,
            upper,
        }
    }

    /// Whether the solver must return an integral value.
    pub fn is_integral(&self) -> bool {
        matches!(self.kind, VarKind::Integer | VarKind::Binary)
    }
}

/// Comparison between a constraint's left-hand side and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    /// `lhs <= rhs`
    LessEq,
    /// `lhs == rhs`
    Equal,
    /// `lhs >= rhs`
    GreaterEq,
}

impl Relation {
    /// Operator symbol, e.g. `<=`.
    pub fn symbol(&self) -> &'static str {
        match self {
            Relation::LessEq => "<=",
            Relation::Equal => "==",
            Relation::GreaterEq => ">=",
        }
    }
}

/// A sparse linear combination of variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearExpr {
    /// (variable, coefficient) pairs. Zero coefficients are never stored.
    pub terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    /// Creates an empty expression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `coefficient * var`. Zero coefficients are dropped.
    pub fn add_term(&mut self, var: VarId, coefficient: f64) {
        if coefficient != 0.0 {
            self.terms.push((var, coefficient));
        }
    }

    /// Builder form of [`add_term`](Self::add_term).
    pub fn with_term(mut self, var: VarId, coefficient: f64) -> Self {
        self.add_term(var, coefficient);
        self
    }

    /// Evaluates the expression against a value vector indexed by [`VarId`].
    ///
    /// Missing values count as zero.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(v, c)| c * values.get(v.0).copied().unwrap_or(0.0))
            .sum()
    }

    /// Whether the expression has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// A named linear constraint `expr (<=|==|>=) rhs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    /// Constraint name.
    pub name: String,
    /// Left-hand side.
    pub expr: LinearExpr,
    /// Comparison.
    pub relation: Relation,
    /// Right-hand side constant.
    pub rhs: f64,
}

impl LinearConstraint {
    /// Creates `expr <= rhs`.
    pub fn leq(name: impl Into<String>, expr: LinearExpr, rhs: f64) -> Self {
        Self::new(name, expr, Relation::LessEq, rhs)
    }

    /// Creates `expr == rhs`.
    pub fn equal(name: impl Into<String>, expr: LinearExpr, rhs: f64) -> Self {
        Self::new(name, expr, Relation::Equal, rhs)
    }

    /// Creates `expr >= rhs`.
    pub fn geq(name: impl Into<String>, expr: LinearExpr, rhs: f64) -> Self {
        Self::new(name, expr, Relation::GreaterEq, rhs)
    }

    fn new(name: impl Into<String>, expr: LinearExpr, relation: Relation, rhs: f64) -> Self {
        Self {
            name: name.into(),
            expr,
            relation,
            rhs,
        }
    }

    /// Whether `values` satisfies this constraint within `tolerance`.
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.relation {
            Relation::LessEq => lhs <= self.rhs + tolerance,
            Relation::Equal => (lhs - self.rhs).abs() <= tolerance,
            Relation::GreaterEq => lhs >= self.rhs - tolerance,
        }
    }
}

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sense {
    Minimize,
    Maximize,
}

/// Linear objective function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    /// Direction.
    pub sense: Sense,
    /// Objective expression.
    pub expr: LinearExpr,
}

/// A mixed-integer linear program.
///
/// Pure description: variables with bounds and domains, named linear
/// constraints, and a linear objective. It carries no solver state and can
/// be handed to any [`MilpSolver`](super::MilpSolver).
///
/// # Examples
///
/// ```
/// use u_staffing::milp::{LinearConstraint, LinearExpr, MilpModel, Variable};
///
/// let mut model = MilpModel::new("example");
/// let x = model.add_variable(Variable::integer("x", 0.0, 10.0));
/// let y = model.add_variable(Variable::binary("y"));
/// model.add_constraint(LinearConstraint::leq(
///     "link",
///     LinearExpr::new().with_term(x, 1.0).with_term(y, -10.0),
///     0.0,
/// ));
/// model.minimize(LinearExpr::new().with_term(y, 1.0));
/// assert!(model.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilpModel {
    /// Model name.
    pub name: String,
    /// Decision variables, indexed by [`VarId`].
    pub variables: Vec<Variable>,
    /// Constraints, in insertion order.
    pub constraints: Vec<LinearConstraint>,
    /// Objective function.
    pub objective: Option<Objective>,
}

impl MilpModel {
    /// Creates an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: None,
        }
    }

    /// Adds a variable and returns its id.
    pub fn add_variable(&mut self, var: Variable) -> VarId {
        self.variables.push(var);
        VarId(self.variables.len() - 1)
    }

    /// Adds a constraint.
    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    /// Sets a minimization objective.
    pub fn minimize(&mut self, expr: LinearExpr) {
        self.objective = Some(Objective {
            sense: Sense::Minimize,
            expr,
        });
    }

    /// Sets a maximization objective.
    pub fn maximize(&mut self, expr: LinearExpr) {
        self.objective = Some(Objective {
            sense: Sense::Maximize,
            expr,
        });
    }

    /// Looks up a variable.
    pub fn variable(&self, id: VarId) -> Option<&Variable> {
        self.variables.get(id.0)
    }

    /// Looks up a constraint by name.
    pub fn constraint(&self, name: &str) -> Option<&LinearConstraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    /// Validates the model for consistency.
    ///
    /// Checks that bounds are ordered and finite where integral, and that
    /// every referenced variable exists.
    pub fn validate(&self) -> Result<(), String> {
        for var in &self.variables {
            if var.lower.is_nan() || var.upper.is_nan() {
                return Err(format!("variable {}: NaN bound", var.name));
            }
            if var.lower > var.upper {
                return Err(format!(
                    "variable {}: lower bound {} exceeds upper bound {}",
                    var.name, var.lower, var.upper
                ));
            }
        }

        let check_expr = |owner: &str, expr: &LinearExpr| -> Result<(), String> {
            for (id, coef) in &expr.terms {
                if id.0 >= self.variables.len() {
                    return Err(format!("{owner}: undefined variable #{}", id.0));
                }
                if !coef.is_finite() {
                    return Err(format!("{owner}: non-finite coefficient {coef}"));
                }
            }
            Ok(())
        };

        for constraint in &self.constraints {
            check_expr(&constraint.name, &constraint.expr)?;
            if !constraint.rhs.is_finite() {
                return Err(format!("{}: non-finite right-hand side", constraint.name));
            }
        }
        if let Some(objective) = &self.objective {
            check_expr("objective", &objective.expr)?;
        }
        Ok(())
    }

    /// Returns the number of variables.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Returns the number of integral (integer or binary) variables.
    pub fn integral_count(&self) -> usize {
        self.variables.iter().filter(|v| v.is_integral()).count()
    }

    /// Returns the number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}
