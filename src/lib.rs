//! Encoding and decoding for update details records: the instructions an updater follows when it
//! applies an update, beyond copying the new files into place.
//!
//! A record says:
//!
//! - Which files to execute (before or after the update, optionally waiting on them), which need
//!     native compilation, which to delete, and which to patch with a binary delta
//! - Which registry changes to make, in order
//! - Which shortcuts to install, and which older shortcuts must exist first
//! - Which folders to remove
//! - An optional command line to run once everything is done
//!
//! The record is a flat stream of one-byte tags, each followed by a value whose size is implied
//! by the tag. A reader that meets a tag it doesn't know can still step over its value, so newer
//! writers can add fields without breaking older readers. See [`format`] for the layout.
//!
//! ```
//! use update_details::{UpdateDetails, UpdateFile};
//!
//! let mut details = UpdateDetails::new();
//! details.post_update_command = Some("setup.exe /finish".to_string());
//! details.update_files.push(UpdateFile {
//!     delta_patch_relative_path: Some("app.dll.patch".to_string()),
//!     new_file_checksum: 123456,
//!     ..UpdateFile::new("app.dll")
//! });
//! details.folders_to_delete.push("temp".to_string());
//!
//! let encoded = details.encode();
//! let decoded = UpdateDetails::decode(&encoded).unwrap();
//! assert_eq!(decoded, details);
//! ```

mod decode;
mod depth_tracking;
mod details;
mod element;
mod encode;
mod error;
mod limits;
mod marker;
mod record;
mod registry;
mod shortcut;

pub mod format;

pub use self::details::{UpdateDetails, UpdateFile};
pub use self::element::{
    is_end_sentinel, write_bool, write_header, write_int32, write_int64, write_marker, write_text,
    Reader,
};
pub use self::error::{Error, Result};
pub use self::limits::DecodeLimits;
pub use self::marker::{Shape, Tag};
pub use self::record::Record;
pub use self::registry::{RegOperation, RegRoot, RegValueKind, RegistryChange};
pub use self::shortcut::{ShortcutInfo, WindowStyle};

/// File identifier at the start of every update details record.
pub const MAGIC: &str = "IUUDFV2";
/// The default maximum length of a single text field is 16 MiB.
pub const MAX_TEXT_LEN: usize = 1usize << 24; // 16 MiB
/// The default maximum nesting depth when skipping unknown objects.
pub const MAX_DEPTH: usize = 32;
/// The default cap on how much storage a count hint may reserve up front.
pub const MAX_RESERVE: usize = 4096;
