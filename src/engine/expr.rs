//! Integer variables, expressions and constraints.
//!
//! Expressions are small trees evaluated against a resolved assignment.
//! Arithmetic saturates, so open bounds stay open instead of wrapping.

use std::ops::{Add, Sub};

/// Identifies a dimension inside a [`RoutingModel`](super::RoutingModel).
pub type DimensionId = usize;

/// An integer variable of the routing model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IntVar {
    /// Cumulative value of a dimension at an index.
    Cumul { dimension: DimensionId, index: usize },
    /// Slack of a dimension at an index.
    Slack { dimension: DimensionId, index: usize },
    /// Vehicle serving an index, `-1` when unperformed.
    Vehicle(usize),
    /// A free variable created with `new_int_var`.
    Decision(usize),
}

/// Resolved values of model variables.
pub trait VarValues {
    fn value(&self, var: IntVar) -> i64;
}

/// An integer expression over model variables.
///
/// # Examples
///
/// ```
/// use u_vrptw::engine::{Expr, IntVar, VarValues};
///
/// struct Fixed;
/// impl VarValues for Fixed {
///     fn value(&self, _var: IntVar) -> i64 { 7 }
/// }
///
/// let x = Expr::var(IntVar::Decision(0));
/// let chosen = Expr::conditional(x.clone().is_equal(7), Expr::from(30), Expr::from(0));
/// assert_eq!(chosen.evaluate(&Fixed), 30);
/// assert_eq!((Expr::from(100) - x).max(Expr::from(0)).evaluate(&Fixed), 93);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Const(i64),
    Var(IntVar),
    Sum(Box<Expr>, Box<Expr>),
    Difference(Box<Expr>, Box<Expr>),
    Max(Box<Expr>, Box<Expr>),
    /// `1` if the inner expression equals the constant, else `0`.
    IsEqual(Box<Expr>, i64),
    /// `1` if the inner expression differs from the constant, else `0`.
    IsDifferent(Box<Expr>, i64),
    /// `then` if `condition` is non-zero, else `otherwise`.
    Conditional {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
}

impl Expr {
    pub fn constant(value: i64) -> Self {
        Expr::Const(value)
    }

    pub fn var(var: IntVar) -> Self {
        Expr::Var(var)
    }

    pub fn max(self, other: Expr) -> Self {
        Expr::Max(Box::new(self), Box::new(other))
    }

    pub fn is_equal(self, value: i64) -> Self {
        Expr::IsEqual(Box::new(self), value)
    }

    pub fn is_different(self, value: i64) -> Self {
        Expr::IsDifferent(Box::new(self), value)
    }

    pub fn conditional(condition: Expr, then: Expr, otherwise: Expr) -> Self {
        Expr::Conditional {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    pub fn evaluate(&self, values: &impl VarValues) -> i64 {
        match self {
            Expr::Const(value) => *value,
            Expr::Var(var) => values.value(*var),
            Expr::Sum(a, b) => a.evaluate(values).saturating_add(b.evaluate(values)),
            Expr::Difference(a, b) => a.evaluate(values).saturating_sub(b.evaluate(values)),
            Expr::Max(a, b) => a.evaluate(values).max(b.evaluate(values)),
            Expr::IsEqual(a, value) => i64::from(a.evaluate(values) == *value),
            Expr::IsDifferent(a, value) => i64::from(a.evaluate(values) != *value),
            Expr::Conditional {
                condition,
                then,
                otherwise,
            } => {
                if condition.evaluate(values) != 0 {
                    then.evaluate(values)
                } else {
                    otherwise.evaluate(values)
                }
            }
        }
    }

    /// Appends every variable read by this expression.
    pub fn collect_vars(&self, out: &mut Vec<IntVar>) {
        match self {
            Expr::Const(_) => {}
            Expr::Var(var) => out.push(*var),
            Expr::Sum(a, b) | Expr::Difference(a, b) | Expr::Max(a, b) => {
                a.collect_vars(out);
                b.collect_vars(out);
            }
            Expr::IsEqual(a, _) | Expr::IsDifferent(a, _) => a.collect_vars(out),
            Expr::Conditional {
                condition,
                then,
                otherwise,
            } => {
                condition.collect_vars(out);
                then.collect_vars(out);
                otherwise.collect_vars(out);
            }
        }
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::Const(value)
    }
}

impl From<IntVar> for Expr {
    fn from(var: IntVar) -> Self {
        Expr::Var(var)
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, other: Expr) -> Expr {
        Expr::Sum(Box::new(self), Box::new(other))
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, other: Expr) -> Expr {
        Expr::Difference(Box::new(self), Box::new(other))
    }
}

/// A relation between two expressions that every solution must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Equal(Expr, Expr),
    NotEqual(Expr, Expr),
    LessOrEqual(Expr, Expr),
    GreaterOrEqual(Expr, Expr),
}

impl Constraint {
    pub fn is_satisfied(&self, values: &impl VarValues) -> bool {
        match self {
            Constraint::Equal(a, b) => a.evaluate(values) == b.evaluate(values),
            Constraint::NotEqual(a, b) => a.evaluate(values) != b.evaluate(values),
            Constraint::LessOrEqual(a, b) => a.evaluate(values) <= b.evaluate(values),
            Constraint::GreaterOrEqual(a, b) => a.evaluate(values) >= b.evaluate(values),
        }
    }

    pub fn vars(&self) -> Vec<IntVar> {
        let mut out = Vec::new();
        let (a, b) = self.operands();
        a.collect_vars(&mut out);
        b.collect_vars(&mut out);
        out.sort_unstable();
        out.dedup();
        out
    }

    fn operands(&self) -> (&Expr, &Expr) {
        match self {
            Constraint::Equal(a, b)
            | Constraint::NotEqual(a, b)
            | Constraint::LessOrEqual(a, b)
            | Constraint::GreaterOrEqual(a, b) => (a, b),
        }
    }

    /// Reads the constraint as `var >= expr`, if it has that shape.
    pub(crate) fn as_lower_bound(&self) -> Option<(IntVar, &Expr)> {
        match self {
            Constraint::GreaterOrEqual(Expr::Var(var), expr)
            | Constraint::LessOrEqual(expr, Expr::Var(var)) => Some((*var, expr)),
            _ => None,
        }
    }

    /// Reads the constraint as `var <= expr`, if it has that shape.
    pub(crate) fn as_upper_bound(&self) -> Option<(IntVar, &Expr)> {
        match self {
            Constraint::LessOrEqual(Expr::Var(var), expr)
            | Constraint::GreaterOrEqual(expr, Expr::Var(var)) => Some((*var, expr)),
            _ => None,
        }
    }
}
