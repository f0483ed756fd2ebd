//! Output rendering for reports and decoded presets, plus ariadne rendering of
//! decode failures.
//!
//! Report and metadata output goes to stdout. Decode failures are rendered to
//! stderr with a labelled window of the byte stream around the failing offset.

use std::collections::BTreeMap;

use anyhow::Result;
use ariadne::{Color, Config, Label, Report as Diagnostic, ReportKind, Source};
use clap::ValueEnum;
use preset_diff_core::resolve::{NumericValue, OptionEntry, ReportEntry};
use preset_diff_core::{DecodeError, DecodedPreset, DisplayValue, Metadata, Report, ReportLine};
use serde_yaml::{Mapping, Value};

// ── Output formats ──────────────────────────────────────────────────────

/// Output format for the `diff` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReportFormat {
    /// One YAML mapping per parameter with display and default details.
    Yaml,
    /// `key: value` per parameter.
    Compact,
    /// A single JSON object.
    Json,
}

/// Output format for the `decode` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum DecodeFormat {
    /// YAML document.
    Yaml,
    /// A single JSON object.
    Json,
}

/// Flags shaping a rendered report.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RenderOptions {
    /// Include raw values; compact output shows the raw value instead of the
    /// display value.
    pub(crate) debug: bool,
    /// Leave default values and percent change out of YAML output.
    pub(crate) hide_default_value: bool,
}

// ── Diff report ─────────────────────────────────────────────────────────

/// Render the preset metadata followed by its report.
pub(crate) fn render_diff(
    metadata: &Metadata,
    report: &Report,
    format: ReportFormat,
    options: RenderOptions,
) -> Result<String> {
    if format == ReportFormat::Json {
        let out = serde_json::json!({
            "metadata": metadata,
            "entries": report.lines,
            "skipped": report.skipped,
        });
        return Ok(format!("{}\n", serde_json::to_string_pretty(&out)?));
    }

    let mut out = serde_yaml::to_string(&BTreeMap::from([("Metadata", metadata)]))?;
    for line in &report.lines {
        let value = match line {
            ReportLine::Param(entry) => param_value(entry, format, options),
            ReportLine::Option(option) => option_value(option, options),
        };
        out += &serde_yaml::to_string(&Mapping::from_iter([(
            Value::from(line.key()),
            value,
        )]))?;
    }
    Ok(out)
}

fn display(value: Option<&DisplayValue>) -> Value {
    value.map_or(Value::Null, |v| Value::from(v.to_string()))
}

fn param_value(entry: &ReportEntry, format: ReportFormat, options: RenderOptions) -> Value {
    if format == ReportFormat::Compact {
        return if options.debug {
            Value::from(entry.raw_value.as_str())
        } else {
            display(entry.display_value.as_ref())
        };
    }

    let mut out = Mapping::new();
    if let Some(name) = &entry.display_name {
        out.insert("display_name".into(), name.as_str().into());
    }
    out.insert("display_value".into(), display(entry.display_value.as_ref()));
    if options.debug {
        out.insert("raw_value".into(), entry.raw_value.as_str().into());
    }

    if !options.hide_default_value && entry.default_raw_value.is_some() {
        out.insert(
            "display_default_value".into(),
            display(entry.default_display_value.as_ref()),
        );
        if options.debug
            && let Some(raw) = &entry.default_raw_value
        {
            out.insert("default_raw_value".into(), raw.as_str().into());
        }
        if let Some(pct) = entry.percent_change {
            out.insert("percent_change".into(), format!("{pct}%").into());
        }
    }
    Value::Mapping(out)
}

fn option_value(option: &OptionEntry, options: RenderOptions) -> Value {
    if options.debug {
        match NumericValue::parse(&option.raw_value) {
            NumericValue::Parsed(v) => Value::from(v),
            NumericValue::NotNumeric => Value::from(option.raw_value.as_str()),
        }
    } else {
        display(option.display_value.as_ref())
    }
}

// ── Decoded preset ──────────────────────────────────────────────────────

/// Render a decoded preset without consulting any tables.
pub(crate) fn render_decoded(decoded: &DecodedPreset, format: DecodeFormat) -> Result<String> {
    Ok(match format {
        DecodeFormat::Json => format!("{}\n", serde_json::to_string_pretty(decoded)?),
        DecodeFormat::Yaml => serde_yaml::to_string(decoded)?,
    })
}

// ── Decode errors ───────────────────────────────────────────────────────

/// Bytes of context shown on each side of a failing offset.
const WINDOW: usize = 40;

/// A printable-ASCII view of `bytes[start..end]`; other bytes become `.`.
fn printable_window(bytes: &[u8], offset: usize) -> (usize, String) {
    let offset = offset.min(bytes.len());
    let start = offset.saturating_sub(WINDOW);
    let end = offset.saturating_add(WINDOW).min(bytes.len());
    let text = bytes[start..end]
        .iter()
        .map(|&b| if (0x20..=0x7e).contains(&b) { b as char } else { '.' })
        .collect();
    (start, text)
}

/// Render a decode failure with the surrounding bytes to stderr.
pub(crate) fn render_decode_error(bytes: &[u8], filename: &str, error: &DecodeError) {
    let offset = error.offset();
    let (window_start, text) = printable_window(bytes, offset);

    let start = offset.min(bytes.len()) - window_start;
    let width = text[start..]
        .find(' ')
        .unwrap_or(text.len() - start)
        .max(1);
    let end = (start + width).min(text.len());

    let label = format!("token read starting at byte {offset}");
    Diagnostic::build(ReportKind::Error, (filename, start..end))
        .with_config(Config::default().with_compact(false))
        .with_message(error.to_string())
        .with_label(
            Label::new((filename, start..end))
                .with_message(label)
                .with_color(Color::Red),
        )
        .with_note(format!(
            "showing bytes {window_start}..{} of {}; non-printable bytes shown as '.'",
            window_start + text.len(),
            bytes.len()
        ))
        .finish()
        .eprint((filename, Source::from(text)))
        .ok();
}
