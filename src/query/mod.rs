// Query module - normalization, parameter binding and SELECT editing
pub mod binder;
pub mod editor;
pub mod normalize;

pub use binder::{bind_params, Binder, ParamValue, ParameterMap};
pub use editor::StatementEditor;
pub use normalize::normalize;
