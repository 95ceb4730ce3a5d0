/// Tags of the update details record. Bytes without an assigned meaning become `Unknown`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tag {
    PostUpdateCommand,
    RegistryCount,
    FileCount,
    DesktopShortcut,
    StartMenuShortcut,
    FilePath,
    FileExecute,
    FileExecuteBefore,
    FileArgs,
    FileAssembly,
    FileWait,
    FileDelete,
    FileDeltaPatch,
    FileChecksum,
    FolderToDelete,
    BeginFile,
    Shortcut,
    RegistryChange,
    EndFile,
    End,
    Unknown(u8),
}

impl Tag {
    /// Construct a tag from a single byte.
    pub fn from_u8(n: u8) -> Tag {
        match n {
            0x01 => Tag::PostUpdateCommand,
            0x20 => Tag::RegistryCount,
            0x21 => Tag::FileCount,
            0x30 => Tag::DesktopShortcut,
            0x31 => Tag::StartMenuShortcut,
            0x40 => Tag::FilePath,
            0x41 => Tag::FileExecute,
            0x42 => Tag::FileExecuteBefore,
            0x43 => Tag::FileArgs,
            0x44 => Tag::FileAssembly,
            0x45 => Tag::FileWait,
            0x46 => Tag::FileDelete,
            0x47 => Tag::FileDeltaPatch,
            0x48 => Tag::FileChecksum,
            0x60 => Tag::FolderToDelete,
            0x8B => Tag::BeginFile,
            0x8D => Tag::Shortcut,
            0x8E => Tag::RegistryChange,
            0x9B => Tag::EndFile,
            0xFF => Tag::End,
            n => Tag::Unknown(n),
        }
    }

    /// Converts a tag into its single-byte representation.
    pub fn into_u8(self) -> u8 {
        match self {
            Tag::PostUpdateCommand => 0x01,
            Tag::RegistryCount => 0x20,
            Tag::FileCount => 0x21,
            Tag::DesktopShortcut => 0x30,
            Tag::StartMenuShortcut => 0x31,
            Tag::FilePath => 0x40,
            Tag::FileExecute => 0x41,
            Tag::FileExecuteBefore => 0x42,
            Tag::FileArgs => 0x43,
            Tag::FileAssembly => 0x44,
            Tag::FileWait => 0x45,
            Tag::FileDelete => 0x46,
            Tag::FileDeltaPatch => 0x47,
            Tag::FileChecksum => 0x48,
            Tag::FolderToDelete => 0x60,
            Tag::BeginFile => 0x8B,
            Tag::Shortcut => 0x8D,
            Tag::RegistryChange => 0x8E,
            Tag::EndFile => 0x9B,
            Tag::End => 0xFF,
            Tag::Unknown(n) => n,
        }
    }

    /// The payload shape that follows this tag.
    pub fn shape(self) -> Shape {
        use self::Tag::*;
        match self {
            PostUpdateCommand | DesktopShortcut | StartMenuShortcut | FilePath | FileArgs
            | FileDeltaPatch | FolderToDelete => Shape::Text,
            RegistryCount | FileCount => Shape::Int32,
            FileExecute | FileExecuteBefore | FileAssembly | FileWait | FileDelete => Shape::Bool,
            FileChecksum => Shape::Int64,
            BeginFile | Shortcut | RegistryChange | EndFile | End | Unknown(_) => {
                Shape::from_range(self.into_u8())
            }
        }
    }
}

impl From<u8> for Tag {
    fn from(val: u8) -> Tag {
        Tag::from_u8(val)
    }
}

impl From<Tag> for u8 {
    fn from(val: Tag) -> u8 {
        val.into_u8()
    }
}

/// Value encoding implied by a tag. This is what lets a reader step over tags it doesn't
/// recognize without losing its place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// Bare tag, no payload.
    Marker,
    /// One byte, nonzero is true.
    Bool,
    /// Little-endian `i32`.
    Int32,
    /// Little-endian `i64`.
    Int64,
    /// Little-endian `i32` byte length, then that many UTF-8 bytes.
    Text,
    /// A nested tag stream running up to and including the given end marker.
    Object { end: u8 },
    /// The end-of-record sentinel.
    End,
    /// No payload shape is assigned to this tag, so it can't be skipped.
    Invalid,
}

impl Shape {
    /// Shape assigned to a tag purely by where its value falls. Tags added by newer writers must
    /// pick a value whose range matches their payload.
    pub fn from_range(n: u8) -> Shape {
        match n {
            0x00 => Shape::Invalid,
            0x01..=0x1f => Shape::Text,
            0x20..=0x2f => Shape::Int32,
            0x30..=0x3f => Shape::Text,
            0x40..=0x4f => Shape::Bool,
            0x50..=0x5f => Shape::Int64,
            0x60..=0x7f => Shape::Text,
            0x80..=0x8f => Shape::Object { end: n + 0x10 },
            0x90..=0x9f => Shape::Marker,
            0xa0..=0xfe => Shape::Invalid,
            0xff => Shape::End,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Marker => "Marker",
            Shape::Bool => "Bool",
            Shape::Int32 => "Int32",
            Shape::Int64 => "Int64",
            Shape::Text => "Text",
            Shape::Object { .. } => "Object",
            Shape::End => "End",
            Shape::Invalid => "Invalid",
        }
    }
}
