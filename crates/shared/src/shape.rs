use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Закрытый набор фигур, которые умеет строить просмотрщик
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    Cube,
    RectangularPrism,
    Sphere,
    Cylinder,
    Cone,
    Pyramid,
    TriangularPrism,
    Triangle,
    Rectangle,
    Square,
    Circle,
    Trapezoid,
    Rhombus,
    Rhomboid,
    Pentagon,
    Hexagon,
}

/// Семейство фигуры: объёмная или плоская (лежит на плоскости земли)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeFamily {
    Solid,
    Planar,
}

/// Описание одного параметра фигуры
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub key: &'static str,
    pub default: f64,
    /// Необязательный параметр: если отсутствует, используется `default`
    pub optional: bool,
}

const fn required(key: &'static str, default: f64) -> ParamSpec {
    ParamSpec {
        key,
        default,
        optional: false,
    }
}

const fn optional(key: &'static str, default: f64) -> ParamSpec {
    ParamSpec {
        key,
        default,
        optional: true,
    }
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 16] = [
        ShapeKind::Cube,
        ShapeKind::RectangularPrism,
        ShapeKind::Sphere,
        ShapeKind::Cylinder,
        ShapeKind::Cone,
        ShapeKind::Pyramid,
        ShapeKind::TriangularPrism,
        ShapeKind::Triangle,
        ShapeKind::Rectangle,
        ShapeKind::Square,
        ShapeKind::Circle,
        ShapeKind::Trapezoid,
        ShapeKind::Rhombus,
        ShapeKind::Rhomboid,
        ShapeKind::Pentagon,
        ShapeKind::Hexagon,
    ];

    /// Строковый идентификатор (kebab-case)
    pub fn id(self) -> &'static str {
        match self {
            ShapeKind::Cube => "cube",
            ShapeKind::RectangularPrism => "rectangular-prism",
            ShapeKind::Sphere => "sphere",
            ShapeKind::Cylinder => "cylinder",
            ShapeKind::Cone => "cone",
            ShapeKind::Pyramid => "pyramid",
            ShapeKind::TriangularPrism => "triangular-prism",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Square => "square",
            ShapeKind::Circle => "circle",
            ShapeKind::Trapezoid => "trapezoid",
            ShapeKind::Rhombus => "rhombus",
            ShapeKind::Rhomboid => "rhomboid",
            ShapeKind::Pentagon => "pentagon",
            ShapeKind::Hexagon => "hexagon",
        }
    }

    /// Разобрать идентификатор. Принимает kebab-case и snake_case.
    /// Неизвестный идентификатор даёт `None`.
    pub fn from_id(id: &str) -> Option<ShapeKind> {
        let normalized = id.trim().to_ascii_lowercase().replace('_', "-");
        ShapeKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.id() == normalized)
    }

    pub fn family(self) -> ShapeFamily {
        match self {
            ShapeKind::Cube
            | ShapeKind::RectangularPrism
            | ShapeKind::Sphere
            | ShapeKind::Cylinder
            | ShapeKind::Cone
            | ShapeKind::Pyramid
            | ShapeKind::TriangularPrism => ShapeFamily::Solid,
            ShapeKind::Triangle
            | ShapeKind::Rectangle
            | ShapeKind::Square
            | ShapeKind::Circle
            | ShapeKind::Trapezoid
            | ShapeKind::Rhombus
            | ShapeKind::Rhomboid
            | ShapeKind::Pentagon
            | ShapeKind::Hexagon => ShapeFamily::Planar,
        }
    }

    /// Параметры фигуры в порядке отображения
    pub fn params(self) -> &'static [ParamSpec] {
        const CUBE: &[ParamSpec] = &[required("a", 4.0)];
        const PRISM: &[ParamSpec] = &[required("a", 4.0), required("b", 3.0), required("c", 2.0)];
        const SPHERE: &[ParamSpec] = &[required("r", 2.0)];
        const ROUND: &[ParamSpec] = &[required("r", 2.0), required("h", 4.0)];
        const PYRAMID: &[ParamSpec] = &[required("a", 4.0), required("h", 4.0)];
        const TRI_PRISM: &[ParamSpec] = &[required("a", 4.0), required("h", 5.0)];
        const TRIANGLE: &[ParamSpec] = &[required("a", 5.0), required("h", 4.0)];
        const RECTANGLE: &[ParamSpec] = &[required("a", 6.0), required("b", 4.0)];
        const SQUARE: &[ParamSpec] = &[required("a", 4.0)];
        const CIRCLE: &[ParamSpec] = &[required("r", 3.0)];
        const TRAPEZOID: &[ParamSpec] =
            &[required("a", 6.0), required("b", 3.0), required("h", 3.0)];
        const RHOMBUS: &[ParamSpec] = &[required("D", 6.0), required("d", 4.0)];
        const RHOMBOID: &[ParamSpec] =
            &[required("b", 5.0), required("h", 3.0), optional("ang", 60.0)];
        const REGULAR: &[ParamSpec] = &[required("a", 3.0)];

        match self {
            ShapeKind::Cube => CUBE,
            ShapeKind::RectangularPrism => PRISM,
            ShapeKind::Sphere => SPHERE,
            ShapeKind::Cylinder | ShapeKind::Cone => ROUND,
            ShapeKind::Pyramid => PYRAMID,
            ShapeKind::TriangularPrism => TRI_PRISM,
            ShapeKind::Triangle => TRIANGLE,
            ShapeKind::Rectangle => RECTANGLE,
            ShapeKind::Square => SQUARE,
            ShapeKind::Circle => CIRCLE,
            ShapeKind::Trapezoid => TRAPEZOID,
            ShapeKind::Rhombus => RHOMBUS,
            ShapeKind::Rhomboid => RHOMBOID,
            ShapeKind::Pentagon | ShapeKind::Hexagon => REGULAR,
        }
    }

    /// Набор параметров по умолчанию (включая необязательные)
    pub fn default_params(self) -> ShapeParams {
        let mut params = ShapeParams::new();
        for spec in self.params() {
            params.set(spec.key, spec.default);
        }
        params
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Именованные числовые параметры фигуры (ключ → значение)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeParams(BTreeMap<String, f64>);

/// Значения сравниваются побитово: NaN равен самому себе
impl PartialEq for ShapeParams {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(&other.0)
                .all(|((ka, va), (kb, vb))| ka == kb && va.to_bits() == vb.to_bits())
    }
}

impl Eq for ShapeParams {}

impl ShapeParams {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, key: &str, value: f64) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: f64) {
        self.0.insert(key.to_string(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<f64> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// Значение параметра без проверки наличия: отсутствующий ключ даёт NaN
    pub fn value(&self, key: &str) -> f64 {
        self.get(key).unwrap_or(f64::NAN)
    }

    pub fn value_or(&self, key: &str, default: f64) -> f64 {
        self.get(key).unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<'a> FromIterator<(&'a str, f64)> for ShapeParams {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        let mut params = ShapeParams::new();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}

/// Фигура + её параметры: единственный вход просмотрщика
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeDescriptor {
    /// Идентификатор фигуры; может быть неизвестным
    pub shape: String,
    #[serde(default)]
    pub params: ShapeParams,
}

impl ShapeDescriptor {
    pub fn new(shape: impl Into<String>, params: ShapeParams) -> Self {
        Self {
            shape: shape.into(),
            params,
        }
    }

    /// Фигура с параметрами по умолчанию
    pub fn with_defaults(kind: ShapeKind) -> Self {
        Self::new(kind.id(), kind.default_params())
    }

    pub fn kind(&self) -> Option<ShapeKind> {
        ShapeKind::from_id(&self.shape)
    }
}

impl Default for ShapeDescriptor {
    fn default() -> Self {
        Self::with_defaults(ShapeKind::Cube)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id_round_trips_every_kind() {
        for kind in ShapeKind::ALL {
            assert_eq!(ShapeKind::from_id(kind.id()), Some(kind));
        }
    }

    #[test]
    fn test_from_id_accepts_snake_case() {
        assert_eq!(
            ShapeKind::from_id("rectangular_prism"),
            Some(ShapeKind::RectangularPrism)
        );
        assert_eq!(ShapeKind::from_id(" Hexagon "), Some(ShapeKind::Hexagon));
    }

    #[test]
    fn test_from_id_unknown() {
        assert_eq!(ShapeKind::from_id("dodecahedron"), None);
        assert_eq!(ShapeKind::from_id(""), None);
    }

    #[test]
    fn test_families() {
        assert_eq!(ShapeKind::Cube.family(), ShapeFamily::Solid);
        assert_eq!(ShapeKind::TriangularPrism.family(), ShapeFamily::Solid);
        assert_eq!(ShapeKind::Rhomboid.family(), ShapeFamily::Planar);
        assert_eq!(ShapeKind::Circle.family(), ShapeFamily::Planar);
    }

    #[test]
    fn test_rhomboid_angle_is_optional() {
        let spec = ShapeKind::Rhomboid
            .params()
            .iter()
            .find(|p| p.key == "ang")
            .unwrap();
        assert!(spec.optional);
        assert_eq!(spec.default, 60.0);
    }

    #[test]
    fn test_missing_value_is_nan() {
        let params = ShapeParams::new().with("a", 4.0);
        assert_eq!(params.value("a"), 4.0);
        assert!(params.value("b").is_nan());
        assert_eq!(params.value_or("b", 2.0), 2.0);
    }

    #[test]
    fn test_descriptor_json() {
        let json = r#"{"shape":"cube","params":{"a":4}}"#;
        let desc: ShapeDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(desc.kind(), Some(ShapeKind::Cube));
        assert_eq!(desc.params.get("a"), Some(4.0));
    }

    #[test]
    fn test_descriptor_json_without_params() {
        let desc: ShapeDescriptor = serde_json::from_str(r#"{"shape":"sphere"}"#).unwrap();
        assert!(desc.params.is_empty());
    }

    #[test]
    fn test_nan_parameter_equals_itself() {
        let nan = crate::eval_number("0.0/0.0").unwrap();
        assert!(nan.is_nan());
        let desc = ShapeDescriptor::new("cube", ShapeParams::new().with("a", nan));
        assert_eq!(desc, desc.clone());
    }

    #[test]
    fn test_params_differ_by_value_and_key() {
        let a = ShapeParams::new().with("a", 4.0);
        assert_ne!(a, ShapeParams::new().with("a", 5.0));
        assert_ne!(a, ShapeParams::new().with("b", 4.0));
        assert_ne!(a, a.clone().with("b", 1.0));
        assert_eq!(a, ShapeParams::new().with("a", 4.0));
    }
}
