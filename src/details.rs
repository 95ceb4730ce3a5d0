use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::limits::DecodeLimits;
use crate::registry::RegistryChange;
use crate::shortcut::ShortcutInfo;

/// What to do with one file of the install.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateFile {
    /// Path of the file within the install root. Never empty in a decoded record.
    pub relative_path: String,
    /// Run this file as part of the update.
    pub execute: bool,
    /// Run it before the new files are copied, instead of after. Only meaningful with `execute`.
    pub execute_before_update: bool,
    /// Wait for the started process to exit before continuing.
    pub wait_for_execution: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_line_args: Option<String>,
    /// The file needs an ahead-of-time native compilation step once installed.
    pub is_assembly: bool,
    /// Remove the file rather than install it.
    pub delete_file: bool,
    /// Patch to apply to the installed file to produce the new one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_patch_relative_path: Option<String>,
    /// Checksum of the patched file, used to verify the patch applied. Zero means there is none.
    pub new_file_checksum: i64,
}

impl UpdateFile {
    pub fn new(relative_path: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            ..Self::default()
        }
    }

    /// True if applying this instruction actually does something. Only these are written out.
    pub fn is_actionable(&self) -> bool {
        self.execute
            || self.is_assembly
            || self.delete_file
            || self.delta_patch_relative_path.is_some()
    }
}

/// Everything an updater needs to apply one update, beyond the new files themselves.
///
/// The sequences are kept in the order they are applied. Build one by hand (it starts out
/// empty), or read one with [`decode`](UpdateDetails::decode) / [`load`](UpdateDetails::load).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateDetails {
    /// Command line to run once the update has been applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_update_command: Option<String>,
    pub registry_changes: Vec<RegistryChange>,
    pub update_files: Vec<UpdateFile>,
    pub shortcuts: Vec<ShortcutInfo>,
    /// Desktop shortcuts that must already exist for new shortcuts to be installed.
    pub previous_desktop_shortcuts: Vec<String>,
    /// Start menu shortcuts that must already exist for new shortcuts to be installed.
    pub previous_start_menu_shortcuts: Vec<String>,
    pub folders_to_delete: Vec<String>,
}

impl UpdateDetails {
    pub fn new() -> Self {
        Self::default()
    }

    /// The file count written ahead of the file instructions. This counts the files that are
    /// executed or compiled, which isn't the same set that gets written; readers only use it to
    /// size their storage.
    pub fn file_count_hint(&self) -> i32 {
        let count = self
            .update_files
            .iter()
            .filter(|file| file.execute || file.is_assembly)
            .count();
        i32::try_from(count).unwrap_or(i32::MAX)
    }

    /// Open, read, and decode an update details file. The file is closed before returning,
    /// whether decoding succeeded or not.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(path, &DecodeLimits::default())
    }

    pub fn load_with(path: impl AsRef<Path>, limits: &DecodeLimits) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading update details");
        let file = File::open(path).map_err(|source| Error::FailOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Self::decode_reader_with(file, limits).map_err(|e| e.in_file(path))
    }

    /// Read an already-open stream to its end and decode it. The stream is dropped on return.
    pub fn decode_reader<R: Read>(reader: R) -> Result<Self> {
        Self::decode_reader_with(reader, &DecodeLimits::default())
    }

    pub fn decode_reader_with<R: Read>(mut reader: R, limits: &DecodeLimits) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::decode_with(&data, limits)
    }

    /// Encode and write to a file, replacing it if it exists.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = self.encode();
        tracing::debug!(path = %path.display(), len = data.len(), "saving update details");
        let mut file = File::create(path).map_err(|source| Error::FailOpen {
            path: path.to_path_buf(),
            source,
        })?;
        file.write_all(&data)
            .and_then(|_| file.flush())
            .map_err(|e| Error::from(e).in_file(path))
    }
}
