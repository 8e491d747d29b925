//! Header parameters: identities, the decode registry and per-value lists

pub mod list;
pub mod param_id;
pub mod registry;
pub mod typed;

pub use list::{ParamStyle, Parameter, ParameterList};
pub use param_id::{ParamId, ParamKind};
pub use registry::{registry, ParamValue, ParameterRegistry};
pub use typed::{p, ParamType, ParamValueType};
