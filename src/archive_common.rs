use byteorder::{ByteOrder, LittleEndian};

use crate::error::ArchiveError;

/// Little-endian byte sink the records are serialized into.
#[derive(Debug, Default)]
pub struct ArchiveDescriptor {
    buffer: Vec<u8>,
}

impl ArchiveDescriptor {
    pub fn new(capacity: usize) -> ArchiveDescriptor {
        ArchiveDescriptor {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn write_u16(&mut self, val: u16) {
        self.buffer.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_u32(&mut self, val: u32) {
        self.buffer.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_bytes(&mut self, val: &[u8]) {
        self.buffer.extend_from_slice(val);
    }

    pub fn finish(self) -> Vec<u8> {
        self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }
}

/// Cursor over a byte slice; every read is bounds-checked.
#[derive(Debug, Clone)]
pub struct ArchiveDescriptorReader<'a> {
    stream: &'a [u8],
    index: usize,
}

impl<'a> ArchiveDescriptorReader<'a> {
    pub fn new(stream: &'a [u8]) -> ArchiveDescriptorReader<'a> {
        ArchiveDescriptorReader { stream, index: 0 }
    }

    pub fn at(stream: &'a [u8], index: usize) -> ArchiveDescriptorReader<'a> {
        ArchiveDescriptorReader { stream, index }
    }

    pub fn get_index(&self) -> usize {
        self.index
    }

    pub fn remaining(&self) -> usize {
        self.stream.len().saturating_sub(self.index)
    }

    pub fn read_u16(&mut self) -> Result<u16, ArchiveError> {
        self.read_bytes(2).map(LittleEndian::read_u16)
    }

    pub fn read_u32(&mut self) -> Result<u32, ArchiveError> {
        self.read_bytes(4).map(LittleEndian::read_u32)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ArchiveError> {
        let upper_bound = self
            .index
            .checked_add(len)
            .filter(|upper_bound| *upper_bound <= self.stream.len())
            .ok_or_else(|| ArchiveError::UnexpectedEnd {
                index: self.index,
                needed: len,
                available: self.remaining(),
            })?;

        let value = &self.stream[self.index..upper_bound];
        self.index = upper_bound;

        Ok(value)
    }
}
