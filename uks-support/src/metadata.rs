//! Fixed-layout object metadata record
//!
//! Every field is written the same way:
//!
//! ```text
//! tag (1 byte, 0) | name length (u32 BE) | name | value length (u32 BE) | value (BE)
//! ```
//!
//! Fields always appear in the same order. Times are seconds as `f64`, stored
//! with [`pack754`] in the 64-bit, 11-exponent-bit layout.

use crate::error::{Result, SupportError};
use crate::ieee754::{pack754, unpack754};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::trace;

/// Tag byte in front of every field
const FIELD_TAG: u8 = 0;

/// Size of the archive id field
pub const ARCHID_LEN: usize = 20;

/// Current metadata format version
pub const MD_VERSION: u32 = 4;

const TIME_BITS: u32 = 64;
const TIME_EXP_BITS: u32 = 11;

/// Object metadata as stored next to the data
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMetadata {
    pub mdver: u32,
    pub mflags: u32,
    /// Access time, seconds
    pub atime: f64,
    /// Modification time, seconds
    pub mtime: f64,
    /// Change time, seconds
    pub ctime: f64,
    pub crf: u32,
    pub version: u32,
    pub dataversion: u32,
    pub crc32: u32,
    pub size: u32,
    pub archidlen: u32,
    pub archid: [u8; ARCHID_LEN],
    pub archversion: u32,
}

impl Default for ObjectMetadata {
    fn default() -> Self {
        Self {
            mdver: MD_VERSION,
            mflags: 0,
            atime: 0.0,
            mtime: 0.0,
            ctime: 0.0,
            crf: 0,
            version: 0,
            dataversion: 0,
            crc32: 0,
            size: 0,
            archidlen: 0,
            archid: [0; ARCHID_LEN],
            archversion: 0,
        }
    }
}

impl ObjectMetadata {
    /// Encode into the field-by-field layout
    pub fn serialize(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(Self::encoded_len());

        put_u32(&mut buf, "mdver", self.mdver);
        put_u32(&mut buf, "mflags", self.mflags);
        put_time(&mut buf, "atime", self.atime)?;
        put_time(&mut buf, "mtime", self.mtime)?;
        put_time(&mut buf, "ctime", self.ctime)?;
        put_u32(&mut buf, "crf", self.crf);
        put_u32(&mut buf, "version", self.version);
        put_u32(&mut buf, "dataversion", self.dataversion);
        put_u32(&mut buf, "crc32", self.crc32);
        put_u32(&mut buf, "size", self.size);
        put_u32(&mut buf, "archidlen", self.archidlen);
        put_field(&mut buf, "archid", &self.archid);
        put_u32(&mut buf, "archversion", self.archversion);

        trace!(len = buf.len(), "serialized metadata");
        Ok(buf.freeze())
    }

    /// Decode a record produced by [`ObjectMetadata::serialize`]
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        let mut buf = data;

        let md = Self {
            mdver: get_u32(&mut buf, "mdver")?,
            mflags: get_u32(&mut buf, "mflags")?,
            atime: get_time(&mut buf, "atime")?,
            mtime: get_time(&mut buf, "mtime")?,
            ctime: get_time(&mut buf, "ctime")?,
            crf: get_u32(&mut buf, "crf")?,
            version: get_u32(&mut buf, "version")?,
            dataversion: get_u32(&mut buf, "dataversion")?,
            crc32: get_u32(&mut buf, "crc32")?,
            size: get_u32(&mut buf, "size")?,
            archidlen: get_u32(&mut buf, "archidlen")?,
            archid: {
                let value = get_field(&mut buf, "archid", ARCHID_LEN)?;
                let mut archid = [0u8; ARCHID_LEN];
                archid.copy_from_slice(value);
                archid
            },
            archversion: get_u32(&mut buf, "archversion")?,
        };

        if buf.has_remaining() {
            return Err(SupportError::TrailingBytes(buf.remaining()));
        }
        Ok(md)
    }

    /// Encoded size; every field has a fixed width so this never changes
    pub fn encoded_len() -> usize {
        const FIELDS: [(&str, usize); 13] = [
            ("mdver", 4),
            ("mflags", 4),
            ("atime", 8),
            ("mtime", 8),
            ("ctime", 8),
            ("crf", 4),
            ("version", 4),
            ("dataversion", 4),
            ("crc32", 4),
            ("size", 4),
            ("archidlen", 4),
            ("archid", ARCHID_LEN),
            ("archversion", 4),
        ];
        FIELDS
            .iter()
            .map(|(name, len)| 1 + 4 + name.len() + 4 + len)
            .sum()
    }
}

// ===== Encoding =====

fn put_field(buf: &mut BytesMut, name: &str, value: &[u8]) {
    buf.put_u8(FIELD_TAG);
    buf.put_u32(name.len() as u32);
    buf.put_slice(name.as_bytes());
    buf.put_u32(value.len() as u32);
    buf.put_slice(value);
}

fn put_u32(buf: &mut BytesMut, name: &str, value: u32) {
    put_field(buf, name, &value.to_be_bytes());
}

fn put_time(buf: &mut BytesMut, name: &str, seconds: f64) -> Result<()> {
    let packed = pack754(seconds, TIME_BITS, TIME_EXP_BITS)?;
    put_field(buf, name, &packed.to_be_bytes());
    Ok(())
}

// ===== Decoding =====

fn take_u32(buf: &mut &[u8], field: &'static str) -> Result<u32> {
    if buf.remaining() < 4 {
        return Err(SupportError::Truncated(field));
    }
    Ok(buf.get_u32())
}

fn take_bytes<'a>(buf: &mut &'a [u8], len: usize, field: &'static str) -> Result<&'a [u8]> {
    if buf.len() < len {
        return Err(SupportError::Truncated(field));
    }
    let slice: &'a [u8] = *buf;
    let (head, rest) = slice.split_at(len);
    *buf = rest;
    Ok(head)
}

/// Read one field, checking tag, name and value length
fn get_field<'a>(buf: &mut &'a [u8], name: &'static str, len: usize) -> Result<&'a [u8]> {
    if !buf.has_remaining() {
        return Err(SupportError::Truncated(name));
    }
    let tag = buf.get_u8();
    if tag != FIELD_TAG {
        return Err(SupportError::UnexpectedTag { field: name, tag });
    }

    let name_len = take_u32(buf, name)? as usize;
    let found = take_bytes(buf, name_len, name)?;
    if found != name.as_bytes() {
        return Err(SupportError::UnexpectedField {
            expected: name,
            found: String::from_utf8_lossy(found).into_owned(),
        });
    }

    let value_len = take_u32(buf, name)? as usize;
    if value_len != len {
        return Err(SupportError::UnexpectedLength {
            field: name,
            expected: len,
            actual: value_len,
        });
    }
    take_bytes(buf, len, name)
}

fn get_u32(buf: &mut &[u8], name: &'static str) -> Result<u32> {
    let mut value = get_field(buf, name, 4)?;
    Ok(value.get_u32())
}

fn get_time(buf: &mut &[u8], name: &'static str) -> Result<f64> {
    let mut value = get_field(buf, name, 8)?;
    unpack754(value.get_i64(), TIME_BITS, TIME_EXP_BITS)
}
