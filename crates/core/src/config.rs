//! Configuration types for decoding and resolution.

use std::collections::BTreeMap;

/// Default command sequence for the preset dumps this tool targets.
pub const DEFAULT_SEQUENCE: &str = "_ 5 N B 1 D _ 6 T 1 V 14 #*14D";

/// Default item-list version suffix.
pub const DEFAULT_ITEM_LIST_VERSION: &str = "1.9.0";

/// Byte-level settings for the decoder.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct DecodeConfig {
    /// How many bytes the token reader scans for the length separator.
    pub lookahead: usize,
    /// Word and token separator.
    pub separator: u8,
    /// Byte ending the trailing parameter text.
    pub terminator: u8,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            lookahead: 1024,
            separator: b' ',
            terminator: 0x01,
        }
    }
}

/// Settings for the display resolver.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct ResolveConfig {
    /// Version used to build item-list names (`"{param}_V{version}"`).
    pub version: String,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_ITEM_LIST_VERSION.to_string(),
        }
    }
}

impl ResolveConfig {
    /// Config with a specific item-list version.
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }
}

/// One effect slot whose type label selects how its option is displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionChain {
    /// Parameter whose resolved label selects the option key (e.g. `"FX1_Type"`).
    pub type_key: String,
    /// Parameter holding the option's raw value (e.g. `"FX1_Opt1"`).
    pub option_key: String,
    /// Prefix of the dependent key; the label is appended after `_`
    /// (e.g. `"Opt1"` → `"Opt1_Chorus"`).
    pub target_prefix: String,
}

impl OptionChain {
    /// Chain for effect slot `slot` (1-based).
    pub fn effect_slot(slot: usize) -> Self {
        Self {
            type_key: format!("FX{slot}_Type"),
            option_key: format!("FX{slot}_Opt1"),
            target_prefix: format!("Opt{slot}"),
        }
    }

    /// Dependent key for a governing label.
    pub fn target_key(&self, label: &str) -> String {
        format!("{}_{}", self.target_prefix, label)
    }
}

/// Settings for building a diff report.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Emit every parameter, not only those differing from the default.
    pub show_all: bool,
    /// Option-chaining rules.
    pub chains: Vec<OptionChain>,
    /// Label remaps applied before building a dependent key.
    pub label_aliases: BTreeMap<String, String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            show_all: false,
            chains: (1..=3).map(OptionChain::effect_slot).collect(),
            label_aliases: BTreeMap::from([("Delay".to_string(), "StereoDelay".to_string())]),
        }
    }
}

impl ReportOptions {
    /// Default options with `show_all` set.
    pub fn show_all(mut self, show_all: bool) -> Self {
        self.show_all = show_all;
        self
    }
}
