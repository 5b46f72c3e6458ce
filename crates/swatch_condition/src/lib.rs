//! Swatch Condition Expressions
//!
//! Small boolean expressions evaluated against JSON context data, used to
//! switch theme token overrides on and off at request time.
//!
//! ```ignore
//! use serde_json::json;
//! use swatch_condition::ConditionEvaluator;
//! use swatch_core::CallContext;
//!
//! let evaluator = ConditionEvaluator::default();
//! let data = json!({ "user": { "role": "admin" } });
//! assert!(evaluator.evaluate(&CallContext::new(), "user.role == 'admin'", &data)?);
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod eval;
pub mod evaluator;
pub mod parser;

pub use ast::{CompareOp, Expr};
pub use config::ConditionConfig;
pub use error::ConditionError;
pub use evaluator::ConditionEvaluator;
pub use parser::parse;
