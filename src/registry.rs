use serde::{Deserialize, Serialize};

use crate::element::*;
use crate::error::{Error, Result};
use crate::record::Record;

const SUB_KEY: u8 = 0x01;
const VALUE_NAME: u8 = 0x02;
const VALUE_DATA: u8 = 0x03;
const OPERATION: u8 = 0x20;
const ROOT: u8 = 0x21;
const VALUE_KIND: u8 = 0x22;

/// What a registry change does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegOperation {
    #[default]
    CreateKey,
    RemoveKey,
    CreateValue,
    RemoveValue,
}

/// The hive a registry change applies to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegRoot {
    ClassesRoot,
    CurrentConfig,
    CurrentUser,
    #[default]
    LocalMachine,
    Users,
}

/// How a registry value's data is stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegValueKind {
    #[default]
    String,
    ExpandString,
    MultiString,
    DWord,
    QWord,
    Binary,
}

macro_rules! int_enum {
    ($name:ident { $($variant:ident = $val:literal),* $(,)? }) => {
        impl $name {
            fn into_i32(self) -> i32 {
                match self {
                    $($name::$variant => $val,)*
                }
            }

            fn from_i32(v: i32) -> Result<Self> {
                match v {
                    $($val => Ok($name::$variant),)*
                    v => Err(Error::BadEncode(format!(
                        concat!("Got unrecognized ", stringify!($name), " value {}"),
                        v
                    ))),
                }
            }
        }
    };
}

int_enum!(RegOperation {
    CreateKey = 0,
    RemoveKey = 1,
    CreateValue = 2,
    RemoveValue = 3,
});

int_enum!(RegRoot {
    ClassesRoot = 0,
    CurrentConfig = 1,
    CurrentUser = 2,
    LocalMachine = 3,
    Users = 4,
});

int_enum!(RegValueKind {
    String = 0,
    ExpandString = 1,
    MultiString = 2,
    DWord = 3,
    QWord = 4,
    Binary = 5,
});

/// A single registry edit carried by an update. The updater applies these in the order they
/// appear in the record.
///
/// Value data is kept as text whatever its kind; numeric and binary kinds hold the textual form
/// the updater parses when it applies the change.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryChange {
    pub operation: RegOperation,
    pub root: RegRoot,
    pub sub_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_name: Option<String>,
    pub value_kind: RegValueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_data: Option<String>,
}

impl RegistryChange {
    pub fn new(operation: RegOperation, root: RegRoot, sub_key: impl Into<String>) -> Self {
        Self {
            operation,
            root,
            sub_key: sub_key.into(),
            ..Self::default()
        }
    }
}

impl Record for RegistryChange {
    const TAG: u8 = 0x8E;
    const END: u8 = 0x9E;

    fn decode_one(reader: &mut Reader) -> Result<Self> {
        let mut change = RegistryChange::default();
        loop {
            let tag = reader.read_tag()?;
            if tag == Self::END {
                break;
            }
            match tag {
                OPERATION => change.operation = RegOperation::from_i32(reader.read_int32()?)?,
                ROOT => change.root = RegRoot::from_i32(reader.read_int32()?)?,
                VALUE_KIND => change.value_kind = RegValueKind::from_i32(reader.read_int32()?)?,
                SUB_KEY => change.sub_key = reader.read_text()?,
                VALUE_NAME => change.value_name = Some(reader.read_text()?),
                VALUE_DATA => change.value_data = Some(reader.read_text()?),
                tag => reader.skip_field(tag)?,
            }
        }
        Ok(change)
    }

    fn encode_one(&self, buf: &mut Vec<u8>, include_tag: bool) {
        if include_tag {
            write_marker(buf, Self::TAG);
        }
        write_int32(buf, OPERATION, self.operation.into_i32());
        write_int32(buf, ROOT, self.root.into_i32());
        write_text(buf, SUB_KEY, &self.sub_key);
        if let Some(ref name) = self.value_name {
            write_text(buf, VALUE_NAME, name);
        }
        write_int32(buf, VALUE_KIND, self.value_kind.into_i32());
        if let Some(ref data) = self.value_data {
            write_text(buf, VALUE_DATA, data);
        }
        write_marker(buf, Self::END);
    }
}
