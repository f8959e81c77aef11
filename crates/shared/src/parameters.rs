use crate::{ShapeDescriptor, ShapeKind, ShapeParams};
use evalexpr::{build_operator_tree, ContextWithMutableVariables, HashMapContext, Value};

/// Результат вычисления параметра
pub type ParameterResult = Result<f64, ParameterError>;

/// Ошибки при работе с параметрами
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// Обязательный параметр отсутствует
    Missing(String),
    /// Значение не положительное
    NotPositive(String, f64),
    /// NaN или бесконечность
    NotFinite(String),
    /// Ошибка парсинга формулы или аргумента
    ParseError(String),
    /// Ошибка вычисления формулы
    EvaluationError(String),
    /// Неверный тип значения
    InvalidType(String),
}

impl std::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterError::Missing(key) => write!(f, "Parameter '{}' is missing", key),
            ParameterError::NotPositive(key, value) => {
                write!(f, "Parameter '{}' must be positive, got {}", key, value)
            }
            ParameterError::NotFinite(key) => write!(f, "Parameter '{}' is not finite", key),
            ParameterError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ParameterError::EvaluationError(msg) => write!(f, "Evaluation error: {}", msg),
            ParameterError::InvalidType(msg) => write!(f, "Invalid type: {}", msg),
        }
    }
}

impl std::error::Error for ParameterError {}

impl ShapeDescriptor {
    /// Проверить параметры фигуры.
    ///
    /// Возвращает список проблем; пустой список — всё в порядке.
    /// Построение фигуры эту проверку не требует: значения используются как есть.
    /// Для неизвестной фигуры проверять нечего.
    pub fn check_params(&self) -> Vec<ParameterError> {
        match self.kind() {
            Some(kind) => check_params(kind, &self.params),
            None => Vec::new(),
        }
    }
}

/// Проверить набор параметров для конкретной фигуры
pub fn check_params(kind: ShapeKind, params: &ShapeParams) -> Vec<ParameterError> {
    let mut problems = Vec::new();
    for spec in kind.params() {
        match params.get(spec.key) {
            None if spec.optional => {}
            None => problems.push(ParameterError::Missing(spec.key.to_string())),
            Some(v) if !v.is_finite() => {
                problems.push(ParameterError::NotFinite(spec.key.to_string()))
            }
            Some(v) if v <= 0.0 => {
                problems.push(ParameterError::NotPositive(spec.key.to_string(), v))
            }
            Some(_) => {}
        }
    }
    problems
}

/// Вычислить числовое выражение (`4`, `2*PI`, `math::sqrt(2)`)
pub fn eval_number(expression: &str) -> ParameterResult {
    let mut context = HashMapContext::new();

    // Математические константы
    context
        .set_value("PI".to_string(), Value::Float(std::f64::consts::PI))
        .ok();
    context
        .set_value("E".to_string(), Value::Float(std::f64::consts::E))
        .ok();

    let tree = build_operator_tree(expression.trim())
        .map_err(|e| ParameterError::ParseError(e.to_string()))?;

    let value = tree
        .eval_with_context(&context)
        .map_err(|e| ParameterError::EvaluationError(e.to_string()))?;

    match value {
        Value::Float(f) => Ok(f),
        Value::Int(i) => Ok(i as f64),
        _ => Err(ParameterError::InvalidType(format!(
            "Expected number, got {:?}",
            value
        ))),
    }
}

/// Разобрать аргумент вида `key=value` (значение — выражение)
pub fn parse_assignment(arg: &str) -> Result<(String, f64), ParameterError> {
    let (key, expr) = arg
        .split_once('=')
        .ok_or_else(|| ParameterError::ParseError(format!("expected key=value, got '{}'", arg)))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ParameterError::ParseError(format!(
            "empty parameter name in '{}'",
            arg
        )));
    }
    let value = eval_number(expr)?;
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_pass_check() {
        for kind in ShapeKind::ALL {
            let desc = ShapeDescriptor::with_defaults(kind);
            assert!(desc.check_params().is_empty(), "{} defaults rejected", kind);
        }
    }

    #[test]
    fn test_missing_required_reported() {
        let desc = ShapeDescriptor::new("cylinder", ShapeParams::new().with("r", 2.0));
        assert_eq!(
            desc.check_params(),
            vec![ParameterError::Missing("h".to_string())]
        );
    }

    #[test]
    fn test_optional_angle_not_reported() {
        let desc = ShapeDescriptor::new(
            "rhomboid",
            ShapeParams::new().with("b", 5.0).with("h", 3.0),
        );
        assert!(desc.check_params().is_empty());
    }

    #[test]
    fn test_zero_and_nan_reported() {
        let desc = ShapeDescriptor::new(
            "trapezoid",
            ShapeParams::new()
                .with("a", 0.0)
                .with("b", f64::NAN)
                .with("h", -1.0),
        );
        let problems = desc.check_params();
        assert_eq!(problems.len(), 3);
        assert!(matches!(problems[0], ParameterError::NotPositive(_, _)));
        assert!(matches!(problems[1], ParameterError::NotFinite(_)));
    }

    #[test]
    fn test_unknown_shape_has_nothing_to_check() {
        let desc = ShapeDescriptor::new("torus", ShapeParams::new());
        assert!(desc.check_params().is_empty());
    }

    #[test]
    fn test_eval_number() {
        assert_eq!(eval_number("4").unwrap(), 4.0);
        assert_eq!(eval_number("2.5").unwrap(), 2.5);
        assert!((eval_number("2*PI").unwrap() - std::f64::consts::TAU).abs() < 1e-12);
        assert!((eval_number("math::sqrt(2)").unwrap() - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_eval_number_errors() {
        assert!(eval_number("(2 + 3").is_err());
        assert!(matches!(
            eval_number("\"text\""),
            Err(ParameterError::InvalidType(_))
        ));
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("a=4").unwrap(), ("a".to_string(), 4.0));
        assert_eq!(parse_assignment(" D = 3*2").unwrap(), ("D".to_string(), 6.0));
        assert!(parse_assignment("a").is_err());
        assert!(parse_assignment("=4").is_err());
    }
}
