use crate::depth_tracking::DepthTracker;
use crate::error::{Error, Result};
use crate::limits::DecodeLimits;
use crate::marker::{Shape, Tag};

use byteorder::{LittleEndian, ReadBytesExt};

/// True only for the tag that terminates a record.
pub fn is_end_sentinel(tag: u8) -> bool {
    tag == Tag::End.into_u8()
}

/// Write the file identifier. No tag precedes it.
pub fn write_header(buf: &mut Vec<u8>, magic: &str) {
    buf.extend_from_slice(magic.as_bytes());
}

/// Write a bare tag with no payload, as used for block delimiters and the end of record.
pub fn write_marker(buf: &mut Vec<u8>, tag: u8) {
    buf.push(tag);
}

/// Write a tag followed by length-prefixed UTF-8 text.
///
/// # Panics
///
/// Panics if `text` is longer than `i32::MAX` bytes, which the length prefix can't hold.
pub fn write_text(buf: &mut Vec<u8>, tag: u8, text: &str) {
    buf.push(tag);
    buf.extend_from_slice(&text_len_prefix(text.len()).to_le_bytes());
    buf.extend_from_slice(text.as_bytes());
}

fn text_len_prefix(len: usize) -> i32 {
    match i32::try_from(len) {
        Ok(len) => len,
        Err(_) => panic!("text of {} bytes doesn't fit a 32-bit length prefix", len),
    }
}

pub fn write_bool(buf: &mut Vec<u8>, tag: u8, v: bool) {
    buf.push(tag);
    buf.push(v as u8);
}

pub fn write_int32(buf: &mut Vec<u8>, tag: u8, v: i32) {
    buf.push(tag);
    buf.extend_from_slice(&v.to_le_bytes());
}

pub fn write_int64(buf: &mut Vec<u8>, tag: u8, v: i64) {
    buf.push(tag);
    buf.extend_from_slice(&v.to_le_bytes());
}

/// Reads tagged fields out of an in-memory record.
///
/// Tags are read with [`read_tag`](Reader::read_tag) and the caller decides what to do with the
/// payload that follows: one of the typed reads, or [`skip_field`](Reader::skip_field). Reads
/// never go past the end of the data; running out is always a
/// [`LengthTooShort`](Error::LengthTooShort) error.
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    data: &'a [u8],
    len: usize,
    limits: DecodeLimits,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Reader<'a> {
        Self::with_limits(data, DecodeLimits::default())
    }

    pub fn with_limits(data: &'a [u8], limits: DecodeLimits) -> Reader<'a> {
        Self {
            data,
            len: data.len(),
            limits,
        }
    }

    /// Limits this reader was created with.
    pub fn limits(&self) -> &DecodeLimits {
        &self.limits
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.len - self.data.len()
    }

    /// Consume `expected.len()` bytes and check them against the expected file identifier.
    /// Returns false if they differ or if there aren't enough bytes.
    pub fn validate_header(&mut self, expected: &str) -> bool {
        let expected = expected.as_bytes();
        if self.data.len() < expected.len() {
            self.data = &self.data[self.data.len()..];
            return false;
        }
        let (header, data) = self.data.split_at(expected.len());
        self.data = data;
        header == expected
    }

    pub fn read_tag(&mut self) -> Result<u8> {
        self.data.read_u8().map_err(|_| Error::LengthTooShort {
            step: "read tag",
            actual: 0,
            expected: 1,
        })
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        let v = self.data.read_u8().map_err(|_| Error::LengthTooShort {
            step: "decode Bool",
            actual: 0,
            expected: 1,
        })?;
        Ok(v != 0)
    }

    pub fn read_int32(&mut self) -> Result<i32> {
        let actual = self.data.len();
        self.data
            .read_i32::<LittleEndian>()
            .map_err(|_| Error::LengthTooShort {
                step: "decode Int32",
                actual,
                expected: 4,
            })
    }

    pub fn read_int64(&mut self) -> Result<i64> {
        let actual = self.data.len();
        self.data
            .read_i64::<LittleEndian>()
            .map_err(|_| Error::LengthTooShort {
                step: "decode Int64",
                actual,
                expected: 8,
            })
    }

    /// Read a length-prefixed string. Fails if the length is negative, over the configured limit,
    /// or longer than the data left, or if the bytes aren't UTF-8.
    pub fn read_text(&mut self) -> Result<String> {
        let bytes = self.read_text_bytes()?;
        std::str::from_utf8(bytes)
            .map(|s| s.to_string())
            .map_err(|e| Error::BadEncode(format!("Text field isn't valid UTF-8: {}", e)))
    }

    fn read_text_bytes(&mut self) -> Result<&'a [u8]> {
        let actual = self.data.len();
        let len = self
            .data
            .read_i32::<LittleEndian>()
            .map_err(|_| Error::LengthTooShort {
                step: "decode Text length",
                actual,
                expected: 4,
            })?;
        if len < 0 {
            return Err(Error::BadEncode(format!(
                "Got Text with negative length = {}",
                len
            )));
        }
        let len = len as usize;
        if len > self.limits.max_text_len {
            return Err(Error::LengthTooLong {
                max: self.limits.max_text_len,
                actual: len,
            });
        }
        if len > self.data.len() {
            return Err(Error::LengthTooShort {
                step: "get Text content",
                actual: self.data.len(),
                expected: len,
            });
        }
        let (bytes, data) = self.data.split_at(len);
        self.data = data;
        Ok(bytes)
    }

    /// Consume and discard the payload of a field, working out its length from the tag alone.
    /// Nested objects are skipped through their end marker, however deep they go (up to the
    /// configured limit).
    pub fn skip_field(&mut self, tag: u8) -> Result<()> {
        let shape = Tag::from_u8(tag).shape();
        tracing::trace!(tag, shape = shape.name(), "skipping field");
        match shape {
            Shape::Object { end } => self.skip_object(end),
            shape => self.skip_flat(tag, shape),
        }
    }

    fn skip_flat(&mut self, tag: u8, shape: Shape) -> Result<()> {
        match shape {
            Shape::Marker => (),
            Shape::Bool => {
                self.read_bool()?;
            }
            Shape::Int32 => {
                self.read_int32()?;
            }
            Shape::Int64 => {
                self.read_int64()?;
            }
            Shape::Text => {
                self.read_text_bytes()?;
            }
            Shape::End => {
                return Err(Error::BadEncode(String::from(
                    "End of record marker can't be skipped",
                )))
            }
            Shape::Invalid => {
                return Err(Error::BadEncode(format!(
                    "Tag 0x{:02x} has no known payload shape",
                    tag
                )))
            }
            Shape::Object { .. } => unreachable!("objects are skipped through skip_object"),
        }
        Ok(())
    }

    fn skip_object(&mut self, end: u8) -> Result<()> {
        let mut depth = DepthTracker::new(self.limits.max_depth);
        depth.open(end)?;
        while let Some(end) = depth.current() {
            let tag = self.read_tag()?;
            if tag == end {
                depth.close();
                continue;
            }
            match Tag::from_u8(tag).shape() {
                Shape::Object { end } => depth.open(end)?,
                Shape::End => {
                    return Err(Error::BadEncode(format!(
                        "Record ended inside a nested object waiting for 0x{:02x}",
                        end
                    )))
                }
                shape => self.skip_flat(tag, shape)?,
            }
        }
        Ok(())
    }
}
