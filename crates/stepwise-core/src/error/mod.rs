//! Error types for Stepwise
//!
//! Every fallible operation in the core returns [`StepwiseResult`]. Handlers
//! never surface these errors to the reasoning loop; they are folded into
//! synthetic error steps once the retry budget is spent.

mod constructors;
mod conversions;
mod types;

pub use types::{StepwiseError, StepwiseResult};
