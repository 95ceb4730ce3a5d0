use serde::{Deserialize, Serialize};

use crate::element::*;
use crate::error::{Error, Result};
use crate::record::Record;

const PATH: u8 = 0x01;
const WORKING_DIRECTORY: u8 = 0x02;
const ARGUMENTS: u8 = 0x03;
const DESCRIPTION: u8 = 0x04;
const ICON_PATH: u8 = 0x05;
const RELATIVE_OUTPUT_PATH: u8 = 0x06;
const ICON_INDEX: u8 = 0x20;
const WINDOW_STYLE: u8 = 0x21;

/// Window state of the program a shortcut launches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowStyle {
    #[default]
    Normal,
    Minimized,
    Maximized,
}

impl WindowStyle {
    fn into_i32(self) -> i32 {
        match self {
            WindowStyle::Normal => 1,
            WindowStyle::Maximized => 3,
            WindowStyle::Minimized => 7,
        }
    }

    fn from_i32(v: i32) -> Result<Self> {
        match v {
            1 => Ok(WindowStyle::Normal),
            3 => Ok(WindowStyle::Maximized),
            7 => Ok(WindowStyle::Minimized),
            v => Err(Error::BadEncode(format!(
                "Got unrecognized WindowStyle value {}",
                v
            ))),
        }
    }
}

/// A shortcut the update installs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortcutInfo {
    /// Target the shortcut points at.
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_path: Option<String>,
    pub icon_index: i32,
    pub window_style: WindowStyle,
    /// Where the shortcut file itself goes, relative to the desktop or start menu folder.
    pub relative_output_path: String,
}

impl ShortcutInfo {
    pub fn new(path: impl Into<String>, relative_output_path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            relative_output_path: relative_output_path.into(),
            ..Self::default()
        }
    }
}

impl Record for ShortcutInfo {
    const TAG: u8 = 0x8D;
    const END: u8 = 0x9D;

    fn decode_one(reader: &mut Reader) -> Result<Self> {
        let mut shortcut = ShortcutInfo::default();
        loop {
            let tag = reader.read_tag()?;
            if tag == Self::END {
                break;
            }
            match tag {
                PATH => shortcut.path = reader.read_text()?,
                WORKING_DIRECTORY => shortcut.working_directory = Some(reader.read_text()?),
                ARGUMENTS => shortcut.arguments = Some(reader.read_text()?),
                DESCRIPTION => shortcut.description = Some(reader.read_text()?),
                ICON_PATH => shortcut.icon_path = Some(reader.read_text()?),
                RELATIVE_OUTPUT_PATH => shortcut.relative_output_path = reader.read_text()?,
                ICON_INDEX => shortcut.icon_index = reader.read_int32()?,
                WINDOW_STYLE => shortcut.window_style = WindowStyle::from_i32(reader.read_int32()?)?,
                tag => reader.skip_field(tag)?,
            }
        }
        Ok(shortcut)
    }

    fn encode_one(&self, buf: &mut Vec<u8>, include_tag: bool) {
        if include_tag {
            write_marker(buf, Self::TAG);
        }
        write_text(buf, PATH, &self.path);
        if let Some(ref dir) = self.working_directory {
            write_text(buf, WORKING_DIRECTORY, dir);
        }
        if let Some(ref args) = self.arguments {
            write_text(buf, ARGUMENTS, args);
        }
        if let Some(ref description) = self.description {
            write_text(buf, DESCRIPTION, description);
        }
        if let Some(ref icon) = self.icon_path {
            write_text(buf, ICON_PATH, icon);
        }
        write_int32(buf, ICON_INDEX, self.icon_index);
        write_int32(buf, WINDOW_STYLE, self.window_style.into_i32());
        write_text(buf, RELATIVE_OUTPUT_PATH, &self.relative_output_path);
        write_marker(buf, Self::END);
    }
}
