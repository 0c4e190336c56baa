//! Binary trace file layout: a 24-byte header followed by fixed-width
//! tagged operation records.
//!
//! Every record is padded to the width of its widest payload
//! (`INSERT`'s four `u32` fields) so a reader can slice the op stream
//! without branching on opcode first. All integers are little-endian.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{ReplayError, Result};

/// Widest payload (`INSERT`: pq_id, node_id, item, key) in `u32` fields.
const PAYLOAD_FIELDS: usize = 4;
/// `code:u32` plus the padded payload.
const RECORD_BYTES: usize = 4 + PAYLOAD_FIELDS * 4;

/// Fixed 24-byte trace header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceHeader {
    /// Number of op records following the header.
    pub op_count: u64,
    /// One past the highest `pq_id` referenced anywhere in the trace.
    pub pq_ids: u32,
    /// One past the highest `node_id` referenced anywhere in the trace.
    pub node_ids: u32,
    /// Upper bound on concurrently live nodes; drives allocator sizing.
    pub max_live_nodes: u64,
}

impl TraceHeader {
    /// Reads a header from `reader`, validating nothing beyond shape:
    /// semantic self-consistency is the generator's responsibility.
    pub fn read_from(reader: &mut impl Read) -> Result<Self> {
        let op_count = reader.read_u64::<LittleEndian>()?;
        let pq_ids = reader.read_u32::<LittleEndian>()?;
        let node_ids = reader.read_u32::<LittleEndian>()?;
        let max_live_nodes = reader.read_u64::<LittleEndian>()?;
        Ok(Self {
            op_count,
            pq_ids,
            node_ids,
            max_live_nodes,
        })
    }

    /// Writes the header in the documented layout.
    pub fn write_to(&self, writer: &mut impl Write) -> Result<()> {
        writer.write_u64::<LittleEndian>(self.op_count)?;
        writer.write_u32::<LittleEndian>(self.pq_ids)?;
        writer.write_u32::<LittleEndian>(self.node_ids)?;
        writer.write_u64::<LittleEndian>(self.max_live_nodes)?;
        Ok(())
    }
}

/// One trace operation. `Meld` is reserved in the wire format (code
/// 11) but implemented by no heap variant; it is never produced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Creates the heap under test for `pq_id`.
    Create { pq_id: u32 },
    /// Destroys the heap for `pq_id`.
    Destroy { pq_id: u32 },
    /// Clears the heap for `pq_id`.
    Clear { pq_id: u32 },
    /// Reads the key of `node_id` in `pq_id`.
    GetKey { pq_id: u32, node_id: u32 },
    /// Reads the item of `node_id` in `pq_id`.
    GetItem { pq_id: u32, node_id: u32 },
    /// Reads the size of `pq_id`.
    GetSize { pq_id: u32 },
    /// Inserts `item` at `key`, registering the result under `node_id`.
    Insert { pq_id: u32, node_id: u32, item: u32, key: u32 },
    /// Reads the minimum handle of `pq_id`.
    FindMin { pq_id: u32 },
    /// Deletes `node_id` from `pq_id`.
    Delete { pq_id: u32, node_id: u32 },
    /// Deletes the minimum of `pq_id`.
    DeleteMin { pq_id: u32 },
    /// Decreases `node_id`'s key to `key` in `pq_id`.
    DecreaseKey { pq_id: u32, node_id: u32, key: u32 },
    /// Reads whether `pq_id` is empty.
    Empty { pq_id: u32 },
}

const CODE_CREATE: u32 = 0;
const CODE_DESTROY: u32 = 1;
const CODE_CLEAR: u32 = 2;
const CODE_GET_KEY: u32 = 3;
const CODE_GET_ITEM: u32 = 4;
const CODE_GET_SIZE: u32 = 5;
const CODE_INSERT: u32 = 6;
const CODE_FIND_MIN: u32 = 7;
const CODE_DELETE: u32 = 8;
const CODE_DELETE_MIN: u32 = 9;
const CODE_DECREASE_KEY: u32 = 10;
const CODE_MELD: u32 = 11;
const CODE_EMPTY: u32 = 12;

impl Op {
    /// Reads one fixed-width record. Returns `Ok(None)` for `MELD` or
    /// an unrecognized opcode, having still consumed the record's
    /// bytes; the caller is expected to log a warning in that case.
    pub fn read_from(reader: &mut impl Read) -> Result<Option<Self>> {
        let code = reader.read_u32::<LittleEndian>()?;
        let mut fields = [0u32; PAYLOAD_FIELDS];
        for field in &mut fields {
            *field = reader.read_u32::<LittleEndian>()?;
        }
        let [a, b, c, d] = fields;

        let op = match code {
            CODE_CREATE => Self::Create { pq_id: a },
            CODE_DESTROY => Self::Destroy { pq_id: a },
            CODE_CLEAR => Self::Clear { pq_id: a },
            CODE_GET_KEY => Self::GetKey { pq_id: a, node_id: b },
            CODE_GET_ITEM => Self::GetItem { pq_id: a, node_id: b },
            CODE_GET_SIZE => Self::GetSize { pq_id: a },
            CODE_INSERT => Self::Insert {
                pq_id: a,
                node_id: b,
                item: c,
                key: d,
            },
            CODE_FIND_MIN => Self::FindMin { pq_id: a },
            CODE_DELETE => Self::Delete { pq_id: a, node_id: b },
            CODE_DELETE_MIN => Self::DeleteMin { pq_id: a },
            CODE_DECREASE_KEY => Self::DecreaseKey {
                pq_id: a,
                node_id: b,
                key: c,
            },
            CODE_MELD => return Ok(None),
            CODE_EMPTY => Self::Empty { pq_id: a },
            other => {
                return Err(ReplayError::MalformedTrace(format!("unknown opcode {other}")));
            }
        };
        Ok(Some(op))
    }

    /// Writes one fixed-width record, padding unused payload fields with zero.
    pub fn write_to(&self, writer: &mut impl Write) -> Result<()> {
        let (code, fields) = match *self {
            Self::Create { pq_id } => (CODE_CREATE, [pq_id, 0, 0, 0]),
            Self::Destroy { pq_id } => (CODE_DESTROY, [pq_id, 0, 0, 0]),
            Self::Clear { pq_id } => (CODE_CLEAR, [pq_id, 0, 0, 0]),
            Self::GetKey { pq_id, node_id } => (CODE_GET_KEY, [pq_id, node_id, 0, 0]),
            Self::GetItem { pq_id, node_id } => (CODE_GET_ITEM, [pq_id, node_id, 0, 0]),
            Self::GetSize { pq_id } => (CODE_GET_SIZE, [pq_id, 0, 0, 0]),
            Self::Insert {
                pq_id,
                node_id,
                item,
                key,
            } => (CODE_INSERT, [pq_id, node_id, item, key]),
            Self::FindMin { pq_id } => (CODE_FIND_MIN, [pq_id, 0, 0, 0]),
            Self::Delete { pq_id, node_id } => (CODE_DELETE, [pq_id, node_id, 0, 0]),
            Self::DeleteMin { pq_id } => (CODE_DELETE_MIN, [pq_id, 0, 0, 0]),
            Self::DecreaseKey { pq_id, node_id, key } => (CODE_DECREASE_KEY, [pq_id, node_id, key, 0]),
            Self::Empty { pq_id } => (CODE_EMPTY, [pq_id, 0, 0, 0]),
        };
        writer.write_u32::<LittleEndian>(code)?;
        for field in fields {
            writer.write_u32::<LittleEndian>(field)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn header_round_trips() {
        let header = TraceHeader {
            op_count: 10,
            pq_ids: 1,
            node_ids: 3,
            max_live_nodes: 3,
        };
        let mut buf = Vec::new();
        header.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), 24);
        let read_back = TraceHeader::read_from(&mut Cursor::new(buf)).unwrap();
        assert_eq!(read_back, header);
    }

    #[test]
    fn every_op_round_trips() {
        let ops = [
            Op::Create { pq_id: 0 },
            Op::Insert {
                pq_id: 0,
                node_id: 2,
                item: 7,
                key: 5,
            },
            Op::DecreaseKey {
                pq_id: 0,
                node_id: 2,
                key: 1,
            },
            Op::DeleteMin { pq_id: 0 },
            Op::Destroy { pq_id: 0 },
        ];
        for op in ops {
            let mut buf = Vec::new();
            op.write_to(&mut buf).unwrap();
            assert_eq!(buf.len(), RECORD_BYTES);
            let read_back = Op::read_from(&mut Cursor::new(buf)).unwrap();
            assert_eq!(read_back, Some(op));
        }
    }

    #[test]
    fn meld_reads_as_none() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&CODE_MELD.to_le_bytes());
        buf.extend_from_slice(&[0u8; PAYLOAD_FIELDS * 4]);
        assert_eq!(Op::read_from(&mut Cursor::new(buf)).unwrap(), None);
    }

    #[test]
    fn unknown_opcode_is_malformed() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&999u32.to_le_bytes());
        buf.extend_from_slice(&[0u8; PAYLOAD_FIELDS * 4]);
        let err = Op::read_from(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, ReplayError::MalformedTrace(_)));
    }
}
