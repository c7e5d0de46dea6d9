//! Metadata objects and the metadata service

pub mod models;
pub mod restriction;
pub mod service;

pub use models::{
    Attribute, AttributeContent, Entry, Meta, Metric, MetricContent, Obj, Query, Queryable,
    Report, ReportContent, ReportDefinition, ReportDefinitionContent,
};
pub use restriction::Restriction;
pub use service::{MetadataService, OBJ_URI_TEMPLATE};
