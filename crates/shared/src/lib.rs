//! Общий словарь просмотрщика фигур: набор фигур, параметры, описание фигуры.
//!
//! Этот крейт не зависит от рендеринга и используется как вызывающей стороной,
//! так и самим просмотрщиком.

pub mod parameters;
mod shape;

pub use parameters::{check_params, eval_number, parse_assignment, ParameterError, ParameterResult};
pub use shape::{ParamSpec, ShapeDescriptor, ShapeFamily, ShapeKind, ShapeParams};
