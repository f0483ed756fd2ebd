//! Parameter display resolution and diff reporting.
//!
//! [`DisplayResolver`] turns a raw normalized value into a display value by
//! consulting parameter tables in priority order. [`build_report`] applies it
//! to a whole preset against a default preset, including option chaining.

/// Natural key ordering.
pub mod natural;
/// Diff report construction.
pub mod report;
/// Multi-table display resolver.
pub mod resolver;
/// Single-table value scaling.
pub mod scale;

pub use report::{
    NumericValue, OptionEntry, Report, ReportEntry, ReportLine, SkipReason, SkippedParam,
    build_report,
};
pub use resolver::DisplayResolver;
pub use scale::{DisplayValue, Lookup, Resolved, index_for, percent_change, scale_linear};
