use crate::element::Reader;
use crate::error::Result;

/// An object that carries its own stream encoding and can be embedded in an update details
/// record.
///
/// The record only knows the tag that opens the object. Everything after that tag, up to and
/// including the object's end marker, belongs to the object, and the record never looks inside.
pub trait Record: Sized {
    /// Tag that introduces the object inside a record.
    const TAG: u8;
    /// Marker that closes the object's own tag stream.
    const END: u8;

    /// Decode one object. The opening tag has already been consumed; this reads through the end
    /// marker.
    fn decode_one(reader: &mut Reader) -> Result<Self>;

    /// Encode one object, optionally preceded by its opening tag. The end marker is always
    /// written.
    fn encode_one(&self, buf: &mut Vec<u8>, include_tag: bool);
}
