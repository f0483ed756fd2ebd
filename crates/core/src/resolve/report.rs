use std::collections::HashMap;

use serde::{Serialize, Serializer};
use thiserror::Error;

use super::natural::natural_cmp;
use super::resolver::DisplayResolver;
use super::scale::{DisplayValue, Resolved, percent_change};
use crate::config::{OptionChain, ReportOptions};
use crate::decode::RawParams;
use crate::error::DomainError;

/// A raw parameter value after numeric conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericValue {
    /// The text parsed as a number.
    Parsed(f64),
    /// The text is not numeric.
    NotNumeric,
}

impl NumericValue {
    /// Convert raw value text, ignoring surrounding whitespace.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(v) => NumericValue::Parsed(v),
            Err(_) => NumericValue::NotNumeric,
        }
    }

    /// The parsed number, if any.
    pub fn value(self) -> Option<f64> {
        match self {
            NumericValue::Parsed(v) => Some(v),
            NumericValue::NotNumeric => None,
        }
    }
}

/// One parameter line of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    /// Parameter key.
    pub key: String,
    /// Human-readable name from the matching definition.
    pub display_name: Option<String>,
    /// Display of the current value; `None` when no table defines the key.
    pub display_value: Option<DisplayValue>,
    /// Current raw value text.
    pub raw_value: String,
    /// Display of the default value.
    pub default_display_value: Option<DisplayValue>,
    /// Default raw value text.
    pub default_raw_value: Option<String>,
    /// Percent change from the default, when the default is non-zero.
    pub percent_change: Option<i64>,
}

/// A dependent option whose key was selected by its governing type's label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionEntry {
    /// Dependent key, e.g. `"Opt1_Chorus"`.
    pub key: String,
    /// The type parameter that selected it, e.g. `"FX1_Type"`.
    pub governed_by: String,
    /// Human-readable name from the matching definition.
    pub display_name: Option<String>,
    /// Display of the option value; `None` when no table defines the key.
    pub display_value: Option<DisplayValue>,
    /// Raw option value text.
    pub raw_value: String,
}

/// One line of a report, in output order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportLine {
    /// A parameter of the preset.
    Param(ReportEntry),
    /// A chained effect option.
    Option(OptionEntry),
}

impl ReportLine {
    /// Key of the line.
    pub fn key(&self) -> &str {
        match self {
            ReportLine::Param(e) => &e.key,
            ReportLine::Option(o) => &o.key,
        }
    }
}

/// Why a parameter is missing from the report.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum SkipReason {
    /// The raw value is not a number.
    #[error("value is not numeric")]
    NotNumeric,
    /// The value could not be resolved against its definition.
    #[error("{0}")]
    Domain(DomainError),
    /// The default preset holds a value for the key that is not a number.
    #[error("default value is not numeric")]
    DefaultNotNumeric,
    /// The default value could not be resolved against its definition.
    #[error("default value: {0}")]
    DefaultDomain(DomainError),
}

impl Serialize for SkipReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A parameter left out of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedParam {
    /// Parameter key.
    pub key: String,
    /// Raw value text.
    pub raw_value: String,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// A diff report of one preset against a default preset.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Report {
    /// Emitted lines in natural key order, each chained option right after
    /// its governing type parameter.
    pub lines: Vec<ReportLine>,
    /// Parameters that could not be reported.
    pub skipped: Vec<SkippedParam>,
}

/// Raw values of chain option keys, collected before any type is resolved.
struct OptionMemory<'a> {
    values: HashMap<&'a str, &'a str>,
}

impl<'a> OptionMemory<'a> {
    fn collect(params: &'a RawParams, chains: &[OptionChain]) -> Self {
        let values = chains
            .iter()
            .filter_map(|c| params.get_key_value(c.option_key.as_str()))
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        Self { values }
    }

    fn get(&self, key: &str) -> Option<&'a str> {
        self.values.get(key).copied()
    }
}

/// Build the diff report of `current` against `defaults`.
///
/// Runs in two passes: the first records every chain option value, the
/// second resolves parameters in natural key order and emits chained options
/// after their governing type parameters.
pub fn build_report(
    current: &RawParams,
    defaults: &RawParams,
    resolver: &DisplayResolver,
    options: &ReportOptions,
) -> Report {
    let memory = OptionMemory::collect(current, &options.chains);
    let chains: HashMap<&str, &OptionChain> = options
        .chains
        .iter()
        .map(|c| (c.type_key.as_str(), c))
        .collect();

    let mut ordered: Vec<(&String, &String)> = current.iter().collect();
    ordered.sort_by(|a, b| natural_cmp(a.0, b.0));

    let mut report = Report::default();
    for (key, raw) in ordered {
        let NumericValue::Parsed(value) = NumericValue::parse(raw) else {
            tracing::debug!(key = %key, raw = %raw, "skipping non-numeric parameter");
            report.skipped.push(SkippedParam {
                key: key.clone(),
                raw_value: raw.clone(),
                reason: SkipReason::NotNumeric,
            });
            continue;
        };

        let resolved = match resolver.resolve(key, value) {
            Ok(lookup) => lookup.found(),
            Err(e) => {
                tracing::warn!(key = %key, raw = %raw, error = %e, "skipping unresolvable parameter");
                report.skipped.push(SkippedParam {
                    key: key.clone(),
                    raw_value: raw.clone(),
                    reason: SkipReason::Domain(e),
                });
                continue;
            }
        };

        let default_raw = defaults.get(key);
        let (default_value, default_display) = match default_raw {
            None => (None, None),
            Some(d) => match resolve_default(key, d, resolver) {
                Ok(resolved) => resolved,
                Err(reason) => {
                    tracing::debug!(key = %key, default = %d, %reason, "skipping parameter");
                    report.skipped.push(SkippedParam {
                        key: key.clone(),
                        raw_value: raw.clone(),
                        reason,
                    });
                    continue;
                }
            },
        };

        if options.show_all || default_value != Some(value) {
            let (display_name, display_value) = split(resolved.clone());
            report.lines.push(ReportLine::Param(ReportEntry {
                key: key.clone(),
                display_name,
                display_value,
                raw_value: raw.clone(),
                default_display_value: default_display,
                default_raw_value: default_raw.cloned(),
                percent_change: default_value.and_then(|d| percent_change(value, d)),
            }));
        }

        if let Some(chain) = chains.get(key.as_str())
            && let Some(governing) = &resolved
            && let Some(option) = chained_option(chain, &governing.value, &memory, resolver, options)
        {
            report.lines.push(ReportLine::Option(option));
        }
    }
    report
}

/// Numeric default and its display. A default that is present but unusable
/// drops the whole parameter.
fn resolve_default(
    key: &str,
    raw: &str,
    resolver: &DisplayResolver,
) -> Result<(Option<f64>, Option<DisplayValue>), SkipReason> {
    let NumericValue::Parsed(value) = NumericValue::parse(raw) else {
        return Err(SkipReason::DefaultNotNumeric);
    };
    let lookup = resolver.resolve(key, value).map_err(SkipReason::DefaultDomain)?;
    Ok((Some(value), lookup.found().map(|r| r.value)))
}

fn split(resolved: Option<Resolved>) -> (Option<String>, Option<DisplayValue>) {
    match resolved {
        Some(r) => (r.display_name, Some(r.value)),
        None => (None, None),
    }
}

fn chained_option(
    chain: &OptionChain,
    governing: &DisplayValue,
    memory: &OptionMemory<'_>,
    resolver: &DisplayResolver,
    options: &ReportOptions,
) -> Option<OptionEntry> {
    let label = governing.to_string();
    let label = options.label_aliases.get(&label).unwrap_or(&label);
    let key = chain.target_key(label);

    let Some(raw) = memory.get(&chain.option_key) else {
        tracing::debug!(key = %key, option = %chain.option_key, "no option value recorded");
        return None;
    };
    let value = NumericValue::parse(raw).value()?;

    match resolver.resolve(&key, value) {
        Ok(lookup) => {
            let (display_name, display_value) = split(lookup.found());
            Some(OptionEntry {
                key,
                governed_by: chain.type_key.clone(),
                display_name,
                display_value,
                raw_value: raw.to_string(),
            })
        }
        Err(e) => {
            tracing::warn!(key = %key, raw = %raw, error = %e, "skipping unresolvable option");
            None
        }
    }
}
