//! `gooddata-tiger` talks the Tiger dialect of the execution model.
//!
//! [`to_tiger_execution`] turns a validated [`gooddata_model::ExecutionDefinition`] into the
//! Tiger AFM request, and [`rsql`] builds filter clauses for Tiger list and search endpoints.

pub mod afm;
mod convert;
mod error;
pub mod rsql;

pub use afm::{TigerExecution, TigerResultSpec};
pub use convert::{dimension_local_identifier, to_tiger_execution};
pub use error::{Result, TigerError};
pub use rsql::{
    build_clause_for_filter, build_contains_ic_clause, build_is_clause, build_is_null_clause,
    build_list_clause, escape_value, format_value, join_clauses, EntitySearchFilter, ListOperator,
};
