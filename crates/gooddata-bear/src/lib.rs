//! `gooddata-bear` turns execution definitions into Bear AFM execution requests.

pub mod afm;
mod convert;
mod error;

pub use afm::{Afm, BearExecution, NativeTotal, ResultSpec};
pub use convert::to_bear_execution;
pub use error::{BearError, Result};
