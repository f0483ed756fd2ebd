//! Shared helpers for `preset-diff` CLI tests.

#![allow(unreachable_pub, dead_code)]

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::cargo;
use zip::write::SimpleFileOptions;

pub fn preset_diff() -> Command {
    Command::new(cargo::cargo_bin!("preset-diff"))
}

fn token(s: &str) -> String {
    format!("{} {} ", s.len(), s)
}

/// A dump laid out for the default command sequence, with `params` as the
/// trailing parameter text.
pub fn preset_bytes(name: &str, params: &[(&str, &str)]) -> Vec<u8> {
    let mut s = String::new();
    s += &token("serialization::archive");
    s += "18 0 0 0 0 ";
    s += &token(name);
    s += &token("User");
    s += "0 ";
    s += &token("Alice");
    s += &token("preset");
    s += "1 2 3 4 5 6 ";
    s += &token("Soft pad");
    s += "0 ";
    s += &token("1.9.0");
    s += "a b c d e f g h i j k l m n ";
    s += &token("Style");
    s += &token("Pad");
    s += "1 x ";
    s += &"0 ".repeat(14);
    for (k, v) in params {
        s += &format!("{} {} {} ", k.len(), k, v);
    }
    let mut bytes = s.into_bytes();
    bytes.push(0x01);
    bytes.extend_from_slice(b"\xff\xfe trailing junk");
    bytes
}

pub const TABLE_JSON: &str = r#"{
  "formatVersion": "1",
  "params": [
    { "name": "Cutoff", "displayName": "Cutoff", "mappingMin": 20, "mappingMax": 20000 },
    { "name": "Mode", "displayName": "Mode",
      "items": [{"text": "Off"}, {"text": "Low"}, {"text": "Mid"}, {"text": "High"}] },
    { "name": "FX1_Type", "displayName": "FX 1 Type",
      "items": [{"text": "Chorus"}, {"text": "Delay"}] },
    { "name": "Opt1_StereoDelay", "displayName": "Delay Time",
      "items": [{"text": "1/4"}, {"text": "1/8"}, {"text": "1/16"}] }
  ]
}"#;

/// Files for one diff run, kept alive by the temp dir.
pub struct Workspace {
    pub dir: tempfile::TempDir,
    pub preset: PathBuf,
    pub default: PathBuf,
    pub table: PathBuf,
}

impl Workspace {
    pub fn new(preset: &[(&str, &str)], default: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let preset_path = dir.path().join("Pad");
        let default_path = dir.path().join("Default");
        let table_path = dir.path().join("params.json");
        fs::write(&preset_path, preset_bytes("Glass Pad", preset)).expect("write preset");
        fs::write(&default_path, preset_bytes("Init", default)).expect("write default");
        fs::write(&table_path, TABLE_JSON).expect("write table");
        Self {
            dir,
            preset: preset_path,
            default: default_path,
            table: table_path,
        }
    }

    /// Args for `diff` against this workspace's default preset and table.
    pub fn diff_args(&self, file: &Path) -> Vec<String> {
        vec![
            "diff".into(),
            file.display().to_string(),
            "--default-file".into(),
            self.default.display().to_string(),
            "--tables".into(),
            self.table.display().to_string(),
        ]
    }

    /// Pack `bytes` into a zip archive under `entry` and return its path.
    pub fn zip(&self, entry: &str, bytes: &[u8]) -> PathBuf {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("notes.txt", SimpleFileOptions::default())
            .expect("start notes");
        writer.write_all(b"not a preset").expect("write notes");
        writer
            .start_file(entry, SimpleFileOptions::default())
            .expect("start entry");
        writer.write_all(bytes).expect("write entry");
        let data = writer.finish().expect("finish zip").into_inner();

        let path = self.dir.path().join("bundle.mnfx");
        fs::write(&path, data).expect("write zip");
        path
    }
}
