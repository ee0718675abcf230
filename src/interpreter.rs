use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, trace};

use crate::parser::{Expression, Operator};

pub type Value = i64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("Division by zero in {left} / {right}")]
    DivisionByZero { left: Value, right: Value },
    #[error("Integer overflow while computing {left} {op} {right}")]
    Overflow {
        op: Operator,
        left: Value,
        right: Value,
    },
}

/// Variable store of one evaluation run. Names that were never assigned read
/// as `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    variables: BTreeMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Value {
        self.variables.get(name).copied().unwrap_or(0)
    }

    pub fn assign(&mut self, name: &str, value: Value) {
        self.variables.insert(name.to_string(), value);
    }

    #[cfg(test)]
    fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Value)> {
        self.variables.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Value)> for Environment {
    fn from_iter<I: IntoIterator<Item = (S, Value)>>(iter: I) -> Self {
        Self {
            variables: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, "}}")
    }
}

/// Evaluates `expression` against `env`. Assignments made along the way stay
/// in `env`, including those preceding a failure.
pub fn evaluate(expression: &Expression, env: &mut Environment) -> Result<Value, EvaluationError> {
    let value = evaluate_expr(expression, env)?;
    debug!(value, variables = env.len(), "evaluated expression");
    Ok(value)
}

/// Evaluates `expression` against a fresh environment and hands that
/// environment back.
pub fn evaluate_fresh(expression: &Expression) -> Result<(Value, Environment), EvaluationError> {
    let mut env = Environment::new();
    let value = evaluate(expression, &mut env)?;
    Ok((value, env))
}

fn evaluate_expr(expression: &Expression, env: &mut Environment) -> Result<Value, EvaluationError> {
    let value = match expression {
        Expression::NumberLiteral(value) => *value,
        Expression::VariableReference(name) => env.get(name),
        Expression::Assignment(name, expr) => {
            let value = evaluate_expr(expr, env)?;
            env.assign(name, value);
            value
        }
        Expression::BinaryOp(op, larg, rarg) => {
            let left = evaluate_expr(larg, env)?;
            let right = evaluate_expr(rarg, env)?;
            apply(*op, left, right)?
        }
    };
    trace!(node = expression.kind(), value, "evaluated node");
    Ok(value)
}

fn apply(op: Operator, left: Value, right: Value) -> Result<Value, EvaluationError> {
    let result = match op {
        Operator::Add => left.checked_add(right),
        Operator::Subtract => left.checked_sub(right),
        Operator::Multiply => left.checked_mul(right),
        Operator::Divide if right == 0 => {
            return Err(EvaluationError::DivisionByZero { left, right })
        }
        // truncates toward zero
        Operator::Divide => left.checked_div(right),
    };
    result.ok_or(EvaluationError::Overflow { op, left, right })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::{parse, scan};

    fn tree(input: &str) -> Expression {
        parse(&scan(input).unwrap()).unwrap()
    }

    fn eval_in(input: &str, env: &mut Environment) -> Result<Value, EvaluationError> {
        evaluate(&tree(input), env)
    }

    fn eval(input: &str) -> Result<Value, EvaluationError> {
        eval_in(input, &mut Environment::new())
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("2 + 3 * 4"), Ok(14));
        assert_eq!(eval("(2 + 3) * 4"), Ok(20));
        assert_eq!(eval("8 - 3 - 2"), Ok(3));
        assert_eq!(eval("100 / 10 / 5"), Ok(2));
        assert_eq!(eval("0 - 5 * 3"), Ok(-15));
    }

    #[test]
    fn test_division_truncates() {
        assert_eq!(eval("7 / 2"), Ok(3));
        assert_eq!(eval("(0 - 7) / 2"), Ok(-3));
        assert_eq!(eval("1 / 3"), Ok(0));
    }

    #[test]
    fn test_assignment_returns_and_stores() {
        let mut env = Environment::new();
        assert_eq!(eval_in("x = 3 + 5 * (2 - 1)", &mut env), Ok(8));
        assert_eq!(env.get("x"), 8);
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_chained_assignment() {
        let mut env = Environment::new();
        assert_eq!(eval_in("x = y = 4", &mut env), Ok(4));
        let expected: Environment = [("x", 4), ("y", 4)].into_iter().collect();
        assert_eq!(env, expected);
    }

    #[test]
    fn test_unassigned_defaults_to_zero() {
        let mut env = Environment::new();
        assert_eq!(eval_in("y + 1", &mut env), Ok(1));
        assert!(!env.contains("y"));
        assert!(env.is_empty());
    }

    #[test]
    fn test_prepopulated_environment() {
        let mut env: Environment = [("a", 6)].into_iter().collect();
        assert_eq!(eval_in("a * 7", &mut env), Ok(42));
        assert_eq!(eval_in("a = a - 1", &mut env), Ok(5));
        assert_eq!(env.get("a"), 5);
    }

    #[test]
    fn test_left_operand_evaluated_first() {
        let mut env = Environment::new();
        assert_eq!(eval_in("(x = 2) * (x + 3)", &mut env), Ok(10));
        assert_eq!(eval_in("(x = 1) + (x = x + 10)", &mut env), Ok(12));
        assert_eq!(env.get("x"), 11);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            eval("1 / 0"),
            Err(EvaluationError::DivisionByZero { left: 1, right: 0 })
        );
        assert!(matches!(
            eval("5 / (x - x)"),
            Err(EvaluationError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_assignment_before_failure_is_kept() {
        let mut env = Environment::new();
        assert!(eval_in("(x = 3) / 0", &mut env).is_err());
        assert_eq!(env.get("x"), 3);
    }

    #[test]
    fn test_overflow() {
        assert!(matches!(
            eval("9223372036854775807 + 1"),
            Err(EvaluationError::Overflow { op: Operator::Add, .. })
        ));
        assert!(matches!(
            eval("0 - 9223372036854775807 - 2"),
            Err(EvaluationError::Overflow { op: Operator::Subtract, .. })
        ));
        assert!(matches!(
            eval("4611686018427387904 * 2"),
            Err(EvaluationError::Overflow { op: Operator::Multiply, .. })
        ));
        let mut env: Environment = [("m", i64::MIN)].into_iter().collect();
        assert!(matches!(
            eval_in("m / (0 - 1)", &mut env),
            Err(EvaluationError::Overflow { op: Operator::Divide, .. })
        ));
    }

    #[test]
    fn test_deepest_accepted_trees() {
        let depth = crate::parser::MAX_NESTING_DEPTH;
        let parens = format!("{}7{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(eval(&parens), Ok(7));
        let mut env = Environment::new();
        let chain = (0..depth).map(|i| format!("v{i} = ")).collect::<String>() + "3";
        assert_eq!(eval_in(&chain, &mut env), Ok(3));
        assert_eq!(env.len(), depth);
        assert_eq!(env.get("v0"), 3);
    }

    #[test]
    fn test_evaluate_fresh() {
        let (value, env) = evaluate_fresh(&tree("b = 2 * (a = 5)")).unwrap();
        assert_eq!(value, 10);
        assert_eq!(env.to_string(), "{a: 5, b: 10}");
    }

    #[test]
    fn test_environment_display() {
        assert_eq!(Environment::new().to_string(), "{}");
        let env: Environment = [("y", 1), ("x", 8)].into_iter().collect();
        assert_eq!(env.to_string(), "{x: 8, y: 1}");
    }
}
