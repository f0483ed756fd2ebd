use crate::config::{DecodeConfig, ReportOptions};
use crate::decode::{CommandSequence, DecodedPreset, decode_preset};
use crate::error::DecodeError;
use crate::resolve::{DisplayResolver, Report, build_report};

/// A decoded preset together with its diff against a default preset.
#[derive(Debug, Clone)]
pub struct PresetDiff {
    /// The decoded preset under inspection.
    pub preset: DecodedPreset,
    /// The decoded reference preset.
    pub defaults: DecodedPreset,
    /// Parameters differing from the reference.
    pub report: Report,
}

/// Decode `preset` and `defaults` with the same sequence and report the
/// differences.
pub fn diff_presets(
    preset: &[u8],
    defaults: &[u8],
    sequence: &CommandSequence,
    decode: &DecodeConfig,
    resolver: &DisplayResolver,
    options: &ReportOptions,
) -> Result<PresetDiff, DecodeError> {
    let defaults = decode_preset(defaults, sequence, decode)?;
    let preset = decode_preset(preset, sequence, decode)?;
    let report = build_report(&preset.params, &defaults.params, resolver, options);
    Ok(PresetDiff {
        preset,
        defaults,
        report,
    })
}
