//! Preset dump decoding and parameter display resolution.
//!
//! Decodes a synthesizer's binary preset dump into header metadata and raw
//! parameter values ([`decode_preset`]), renders raw values through parameter
//! definition tables ([`DisplayResolver`]), and reports parameters that differ
//! from a default preset ([`build_report`], [`diff_presets`]).

#![warn(missing_docs)]

/// Decoder and resolver configuration.
pub mod config;
/// Binary preset decoding.
pub mod decode;
/// Error types.
pub mod error;
/// Decode-and-diff pipeline.
pub mod pipeline;
/// Display resolution and reporting.
pub mod resolve;

// ── Convenience re-exports ──────────────────────────────────────────────────

// Config
pub use config::{
    DEFAULT_ITEM_LIST_VERSION, DEFAULT_SEQUENCE, DecodeConfig, OptionChain, ReportOptions,
    ResolveConfig,
};

// Decoder
pub use decode::{CommandSequence, DecodedPreset, Metadata, RawParams, decode_preset};

// Errors
pub use error::{DecodeError, DomainError, SequenceError, TokenFault};

// Resolver
pub use resolve::{DisplayResolver, DisplayValue, Lookup, Report, ReportLine, build_report};

// Pipeline
pub use pipeline::{PresetDiff, diff_presets};

// Tables (re-exported from the tables crate)
pub use preset_diff_tables::{ParamTable, TableCache, TableError};
