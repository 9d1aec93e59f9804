//! JSON store for binding profiles.
//!
//! The store is a single file holding one top-level array, one object per profile:
//!
//! ```json
//! [
//!   {
//!     "name": "8BitDo SN30",
//!     "binds": [ { "in": 5, "out": 42, "is_axis": true } ],
//!     "devices": [ "045e:02ea" ]
//!   }
//! ]
//! ```
//!
//! # Tolerance
//! - A profile element must be an object holding `binds` and `devices` arrays;
//!   `name` is optional but must be a string when present. Anything else makes that
//!   one element a [`ParseIssue`] and the rest of the array still loads.
//! - Inside a profile the reader is permissive: a missing `in`/`out` reads as `0`,
//!   a missing or non-boolean `is_axis` reads as `false`, and override items that are
//!   not objects or device items that are not strings are dropped.
//! - An override whose `in` is present but not a `u16` (negative, fractional, too
//!   large, not a number) is dropped rather than bound at code `0`. An `out` of that
//!   kind reads as `0`, which translates to
//!   [`VirtualCode::UNMAPPED`](crate::codes::VirtualCode::UNMAPPED).
//!
//! # Writes
//! Bytes are written with a counted loop so a short write is visible to the caller.
//! With [`SaveOptions::atomic`] the document goes to a sibling temp file which only
//! replaces the store after every byte landed.

use crate::error::{LoadError, ParseIssue, SaveError};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// File name of the store under `~/.config`.
pub const STORE_FILE_NAME: &str = "gamepad_bindings.json";

/// Location of the store: `~/.config/gamepad_bindings.json`.
///
/// `None` when the home directory can't be determined.
pub fn default_store_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join(STORE_FILE_NAME))
}

/// One override as stored: raw `in` code, canonical `out` code and axis flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindRecord {
    #[serde(rename = "in")]
    pub physical_in: u16,
    #[serde(rename = "out")]
    pub virtual_out: u16,
    #[serde(default)]
    pub is_axis: bool,
}

impl BindRecord {
    /// Reads an override permissively.
    ///
    /// `None` for non-objects and for a present `in` that is not a valid code.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let physical_in = match obj.get("in") {
            None => 0,
            Some(raw) => as_u16(raw)?,
        };
        Some(Self {
            physical_in,
            virtual_out: obj.get("out").and_then(as_u16).unwrap_or(0),
            is_axis: obj.get("is_axis").and_then(Value::as_bool).unwrap_or(false),
        })
    }
}

/// One stored profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(default)]
    pub name: String,
    #[serde(deserialize_with = "lenient_binds")]
    pub binds: Vec<BindRecord>,
    #[serde(deserialize_with = "lenient_devices")]
    pub devices: Vec<String>,
}

impl ProfileRecord {
    /// Parses one array element of the store.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        if !value.is_object() {
            return Err(serde_json::Error::custom(format!(
                "expected a profile object, found {}",
                kind(&value)
            )));
        }
        serde_json::from_value(value)
    }
}

fn as_u16(value: &Value) -> Option<u16> {
    if let Some(n) = value.as_u64() {
        return u16::try_from(n).ok();
    }
    match value.as_f64() {
        Some(f) if f.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(&f) => {
            Some(f as u16)
        }
        _ => None,
    }
}

fn lenient_binds<'de, D>(deserializer: D) -> Result<Vec<BindRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Vec::<Value>::deserialize(deserializer)?;
    Ok(items.iter().filter_map(BindRecord::from_value).collect())
}

fn lenient_devices<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Vec::<Value>::deserialize(deserializer)?;
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parses raw store bytes into the elements of the top-level array.
pub fn decode_document(bytes: &[u8]) -> Result<Vec<Value>, LoadError> {
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Array(items) => Ok(items),
        other => Err(LoadError::NotAnArray {
            found: kind(&other),
        }),
    }
}

/// Lazily turns array elements into profile records, tagging failures with their index.
pub fn parse_records(
    values: Vec<Value>,
) -> impl Iterator<Item = Result<ProfileRecord, ParseIssue>> {
    values.into_iter().enumerate().map(|(index, value)| {
        ProfileRecord::from_value(value).map_err(|reason| ParseIssue { index, reason })
    })
}

/// Encodes the aggregate document.
pub fn encode_document(records: &[ProfileRecord]) -> Result<Vec<u8>, SaveError> {
    Ok(serde_json::to_vec_pretty(records)?)
}

/// Reads the whole store file.
pub fn read_store(path: &Path) -> Result<Vec<u8>, LoadError> {
    fs::read(path).map_err(|source| LoadError::StoreUnavailable {
        path: path.to_path_buf(),
        source,
    })
}

/// How the store file is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// Treat a short write as a failed save instead of only reporting it.
    pub strict_writes: bool,
    /// Write to a temp file and rename it over the store.
    pub atomic: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            strict_writes: true,
            atomic: true,
        }
    }
}

impl SaveOptions {
    /// Direct, non-atomic write where a short write is only logged.
    pub fn best_effort() -> Self {
        Self {
            strict_writes: false,
            atomic: false,
        }
    }

    pub fn strict_writes(mut self, strict: bool) -> Self {
        self.strict_writes = strict;
        self
    }

    pub fn atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }
}

/// Writes `bytes` until done or the sink stops accepting data. Returns the count written.
pub fn write_counted<W: Write + ?Sized>(writer: &mut W, bytes: &[u8]) -> io::Result<usize> {
    let mut written = 0;
    while written < bytes.len() {
        match writer.write(&bytes[written..]) {
            Ok(0) => break,
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    writer.flush()?;
    Ok(written)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| STORE_FILE_NAME.into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes the store file and returns how many bytes landed.
///
/// In atomic mode an incomplete temp file is discarded and the previous store is kept.
pub fn write_store(path: &Path, bytes: &[u8], options: SaveOptions) -> Result<usize, SaveError> {
    let unavailable = |source| SaveError::StoreUnavailable {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(unavailable)?;
    }

    if !options.atomic {
        let mut file = File::create(path).map_err(unavailable)?;
        return Ok(write_counted(&mut file, bytes)?);
    }

    let tmp = temp_path(path);
    let mut file = File::create(&tmp).map_err(unavailable)?;
    let written = match write_counted(&mut file, bytes).and_then(|n| file.sync_all().map(|_| n)) {
        Ok(n) => n,
        Err(e) => {
            drop(file);
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
    };
    drop(file);

    if written == bytes.len() {
        if let Err(source) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(unavailable(source));
        }
    } else {
        let _ = fs::remove_file(&tmp);
    }
    Ok(written)
}
