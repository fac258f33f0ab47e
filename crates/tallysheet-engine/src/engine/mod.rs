//! Formula evaluation engine.
//!
//! - [`create_engine`] - Create a sandboxed Rhai engine with built-ins
//! - [`evaluate`] - Run a scoring formula against export data

mod eval;

pub use eval::{create_engine, data_to_array, evaluate};

pub use rhai::{Dynamic, Engine, EvalAltResult};
