use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::StorageError;

/// Longest extension carried over from an uploaded file name.
const MAX_EXTENSION_LEN: usize = 16;

/// Opaque name of a stored photo, e.g. `1718044800123.png`.
///
/// Always a flat file name: never empty, no path separators, no `..`, no
/// leading dot, no control characters.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StorageRef(String);

impl StorageRef {
    /// Build the name for a new blob from a unique token and the uploaded
    /// file's name. Only an ASCII-alphanumeric extension is kept.
    pub fn generate(token: u64, original_name: &str) -> Self {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| {
                !ext.is_empty()
                    && ext.len() <= MAX_EXTENSION_LEN
                    && ext.chars().all(|c| c.is_ascii_alphanumeric())
            });

        match extension {
            Some(ext) => Self(format!("{token}.{ext}")),
            None => Self(token.to_string()),
        }
    }

    /// Parse a name received from outside the store.
    pub fn parse(s: &str) -> Result<Self, StorageError> {
        check_name(s)?;
        Ok(Self(s.to_string()))
    }

    /// Re-check a name that bypassed [`StorageRef::parse`], such as one
    /// loaded from a hand-edited collection file.
    pub fn validate(&self) -> Result<(), StorageError> {
        check_name(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn check_name(s: &str) -> Result<(), StorageError> {
    if s.is_empty() {
        return Err(StorageError::InvalidRef("name cannot be empty"));
    }

    if s.contains('\0') {
        return Err(StorageError::InvalidRef("null bytes are not allowed"));
    }

    if s.chars().any(|c| c.is_ascii_control()) {
        return Err(StorageError::InvalidRef("control characters are not allowed"));
    }

    if s.contains('/') || s.contains('\\') {
        return Err(StorageError::InvalidRef("path separators are not allowed"));
    }

    if s == ".." {
        return Err(StorageError::InvalidRef("'..' is not allowed"));
    }

    if s.starts_with('.') {
        return Err(StorageError::InvalidRef(
            "hidden names (starting with '.') are not allowed",
        ));
    }

    Ok(())
}

impl fmt::Debug for StorageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StorageRef({})", self.0)
    }
}

impl fmt::Display for StorageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for StorageRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Accepts any string so one bad entry in the collection file cannot make the
/// whole file unreadable. Names are checked again before the blob store opens
/// them.
impl<'de> Deserialize<'de> for StorageRef {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self)
    }
}
