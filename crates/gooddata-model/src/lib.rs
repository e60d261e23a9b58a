//! `gooddata-model` defines the backend-agnostic analytical execution model.
//!
//! Charts describe what to compute as buckets of attributes and measures. This crate holds those
//! values, converts buckets into an [`ExecutionDefinition`] (local identifiers, dimensions, totals
//! and ratio filter handling) and validates the result. Backend crates turn the definition into
//! their own request payloads:
//! - `gooddata-bear` (AFM execution request)
//! - `gooddata-tiger` (AFM execution request with auxiliary measures, RSQL filters)

mod attribute;
pub mod bucket;
pub mod date_format;
pub mod dimension;
mod error;
pub mod execution;
pub mod filter;
pub mod measure;
mod objref;
mod serde_defaults;
pub mod sort;
mod totals;

pub use attribute::{new_attribute, Attribute};
pub use bucket::{
    apply_ratio_rule, bucket_attributes, bucket_is_empty, bucket_measures, bucket_modify_items,
    bucket_set_totals, new_bucket, AttributeOrMeasure, Bucket, ComputeRatioRule,
};
pub use date_format::{format_date, parse_date, DateFormat};
pub use dimension::{
    assemble, dimension_set_totals, dimensions_find_item, new_dimension, new_two_dimensional,
    Dimension, MEASURE_GROUP_IDENTIFIER,
};
pub use error::{ModelError, Result};
pub use execution::{
    convert_afm_filters, convert_buckets, def_fingerprint, def_set_totals, def_with_date_format,
    def_with_dimensions, def_with_sorting, new_def_for_buckets, new_def_for_items,
    validate_execution_definition, AfmFilters, BucketConverter, ConversionOptions,
    ExecutionDefinition, PostProcessing, COLUMNS_BUCKET,
};
pub use filter::*;
pub use measure::*;
pub use objref::{
    are_obj_refs_equal, id_ref, local_id_ref, obj_ref_to_string, uri_ref, ObjRef, ObjectType,
};
pub use sort::{
    new_attribute_locator, new_attribute_sort, new_measure_sort, AttributeLocatorBody,
    AttributeSortItemBody, LocatorItem, MeasureLocatorBody, MeasureSortItemBody, SortAggregation,
    SortDirection, SortItem,
};
pub use totals::{new_total, Total, TotalType};
