//! Shared test helpers for `preset_diff_core` integration tests.

#![allow(unreachable_pub)]

use std::sync::{Arc, LazyLock};

use preset_diff_core::{DisplayResolver, ParamTable, ResolveConfig};
use preset_diff_tables::load_table_from_str;

// ─── Byte stream builders ────────────────────────────────────────────────────

/// Encode `s` as a length-prefixed token with a trailing separator.
#[allow(dead_code)]
pub fn token(s: &str) -> String {
    format!("{} {} ", s.len(), s)
}

/// Header fields written by [`preset_bytes`].
#[allow(dead_code)]
pub struct Header<'a> {
    pub name: &'a str,
    pub bank: &'a str,
    pub designer: &'a str,
    pub text: &'a str,
    pub version: &'a str,
}

#[allow(dead_code)]
pub const HEADER: Header<'static> = Header {
    name: "Glass Pad",
    bank: "User",
    designer: "Alice",
    text: "Soft pad",
    version: "1.9.0",
};

/// Build a dump laid out for the default command sequence
/// `_ 5 N B 1 D _ 6 T 1 V 14 #*14D`.
///
/// `extra` pairs land in the hash block before the 14-zero digit run. A pair
/// whose value ends exactly at the run is never stored, so a `1 x` sentinel
/// token separates them. `params` become the trailing `<len> <key> <value>`
/// text, which is terminated by `0x01` and followed by junk.
#[allow(dead_code)]
pub fn preset_bytes(header: &Header<'_>, extra: &[(&str, &str)], params: &[(&str, &str)]) -> Vec<u8> {
    let mut s = String::new();
    s += &token("serialization::archive");
    s += "18 0 0 0 0 ";
    s += &token(header.name);
    s += &token(header.bank);
    s += "0 ";
    s += &token(header.designer);
    s += &token("preset");
    s += "1 2 3 4 5 6 ";
    s += &token(header.text);
    s += "0 ";
    s += &token(header.version);
    s += "a b c d e f g h i j k l m n ";
    for (k, v) in extra {
        s += &token(k);
        s += &token(v);
    }
    s += "1 x ";
    s += &"0 ".repeat(14);
    for (k, v) in params {
        s += &format!("{} {} {} ", k.chars().count(), k, v);
    }
    let mut bytes = s.into_bytes();
    bytes.push(0x01);
    bytes.extend_from_slice(b"7 Ignored 1 \xff\xfe");
    bytes
}

// ─── Table fixtures ──────────────────────────────────────────────────────────

fn table(json: &str) -> Arc<ParamTable> {
    Arc::new(load_table_from_str(json).expect("invalid table JSON in test fixture"))
}

/// Highest-priority table: synth parameters.
#[allow(dead_code)]
pub static VST_TABLE: LazyLock<Arc<ParamTable>> = LazyLock::new(|| {
    table(
        r#"{ "params": [
            { "name": "Cutoff", "displayName": "Cutoff", "mappingMin": 20, "mappingMax": 20000 },
            { "name": "Mode", "displayName": "Mode",
              "items": [{"text": "Off"}, {"text": "Low"}, {"text": "Mid"}, {"text": "High"}] },
            { "name": "Level", "displayName": "Level" },
            { "name": "Octave", "displayName": "Octave", "mappingMin": -2, "mappingMax": 2,
              "items": [{"text": "-2", "from": -2}] },
            { "name": "Osc1_Type", "displayName": "Osc 1 Type", "itemLists": ["Osc1_Type_V1.9.0"] },
            { "name": "FX1_Type", "displayName": "FX 1 Type",
              "items": [{"text": "Chorus"}, {"text": "Delay"}] },
            { "name": "Shared", "displayName": "From first" }
        ],
        "itemLists": [ { "name": "Osc1_Type_V1.9.0", "items": ["Basic", "SuperWave", "Harmo"] } ] }"#,
    )
});

/// Second table: internal parameters.
#[allow(dead_code)]
pub static INTERNAL_TABLE: LazyLock<Arc<ParamTable>> = LazyLock::new(|| {
    table(
        r#"{ "params": [
            { "name": "Shared", "displayName": "From second", "mappingMin": 0, "mappingMax": 10 },
            { "name": "Glide", "displayName": "Glide", "mappingMin": 0, "mappingMax": 10 }
        ] }"#,
    )
});

/// Third table: effect options keyed by effect type.
#[allow(dead_code)]
pub static FX_TABLE: LazyLock<Arc<ParamTable>> = LazyLock::new(|| {
    table(
        r#"{ "params": [
            { "name": "Opt1_Chorus", "displayName": "Chorus Depth" },
            { "name": "Opt1_StereoDelay", "displayName": "Delay Time",
              "items": [{"text": "1/4"}, {"text": "1/8"}, {"text": "1/16"}] }
        ] }"#,
    )
});

/// Resolver over the three fixture tables in priority order.
#[allow(dead_code)]
pub fn resolver() -> DisplayResolver {
    DisplayResolver::new(
        vec![
            Arc::clone(&VST_TABLE),
            Arc::clone(&INTERNAL_TABLE),
            Arc::clone(&FX_TABLE),
        ],
        ResolveConfig::default(),
    )
}
