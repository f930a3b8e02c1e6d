use std::io::Write;

use tracing::{debug, trace, warn};

use crate::archive_common::ArchiveDescriptor;
use crate::checksum::crc32;
use crate::constants::{CENTRAL_DIRECTORY_END_SIGNATURE, ZIP_CONTENT_TYPE};
use crate::error::ArchiveError;
use crate::records::{CentralDirectoryEnd, CentralDirectoryFileHeader, LocalFileHeader};
use crate::types::{ArchiveFileEntry, FileDateTime};

#[derive(Debug, Clone)]
struct PendingEntry {
    name: String,
    content: Vec<u8>,
    /// `(date, time)` in MS-DOS encoding, resolved when the entry is added.
    ms_dos: (u16, u16),
}

impl PendingEntry {
    /// Name as written: longer names are cut to fit the 16-bit length field.
    fn name_len(&self) -> usize {
        self.name.len().min(u16::MAX as usize)
    }

    fn local_block_size(&self) -> u64 {
        (LocalFileHeader::BASE_SIZE + self.name_len() + self.content.len()) as u64
    }
}

fn end_signature_position(bytes: &[u8]) -> Option<usize> {
    let signature = CENTRAL_DIRECTORY_END_SIGNATURE.to_le_bytes();
    bytes
        .windows(signature.len())
        .position(|window| window == signature)
}

/// An in-memory, stored (uncompressed) zip archive.
///
/// Add entries with [`add`](Self::add()), then produce the container with
/// [`build`](Self::build()). Entries are serialized in insertion order.
///
/// The archive does no locking: prepare entry contents concurrently if
/// needed, but add them from a single owner.
#[derive(Debug, Clone, Default)]
pub struct ZipArchive {
    entries: Vec<PendingEntry>,
    default_time: FileDateTime,
    archive_comment: Vec<u8>,
    /// Running total of local header + content bytes.
    archive_size: u64,
}

impl ZipArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time written for entries appended with [`add`](Self::add()).
    pub fn with_default_time(mut self, time: FileDateTime) -> Self {
        self.default_time = time;
        self
    }

    /// Append an entry. Names should be unique: readers resolve duplicates to
    /// the last one.
    ///
    /// Names longer than `u16::MAX` bytes are truncated. Content larger than
    /// `u32::MAX` bytes does not fit the format; use [`try_add`](Self::try_add())
    /// to have either rejected.
    pub fn add(&mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.add_with_time(name, content, self.default_time);
    }

    pub fn add_with_time(
        &mut self,
        name: impl Into<String>,
        content: impl Into<Vec<u8>>,
        time: FileDateTime,
    ) {
        let name = name.into();
        if name.len() > u16::MAX as usize {
            warn!("entry name of {} bytes truncated to {}", name.len(), u16::MAX);
        }
        let entry = PendingEntry {
            name,
            content: content.into(),
            ms_dos: time.ms_dos(),
        };
        self.archive_size += entry.local_block_size();
        self.entries.push(entry);
    }

    /// Like [`add`](Self::add()), but refuses entries that the 32-bit format
    /// cannot represent.
    pub fn try_add(
        &mut self,
        name: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Result<(), ArchiveError> {
        let name = name.into();
        let content = content.into();

        let limit = if name.len() > u16::MAX as usize {
            Some(format!("name of {} bytes", name.len()))
        } else if content.len() as u64 > u32::MAX as u64 {
            Some(format!("'{}' has {} bytes of content", name, content.len()))
        } else if self.entries.len() >= u16::MAX as usize - 1 {
            Some(format!("more than {} entries", u16::MAX - 1))
        } else {
            let block = (LocalFileHeader::BASE_SIZE + name.len() + content.len()) as u64;
            if self.archive_size + block > u32::MAX as u64 {
                Some(format!("'{}' would end past offset {}", name, u32::MAX))
            } else {
                None
            }
        };

        if let Some(detail) = limit {
            warn!("entry rejected: {}", detail);
            return Err(ArchiveError::LimitExceeded(detail));
        }

        self.add(name, content);
        Ok(())
    }

    /// Trailing archive comment, truncated to `u16::MAX` bytes.
    ///
    /// Readers locate the end record by scanning back for its signature, so a
    /// comment is cut just before any `PK\x05\x06` it contains.
    pub fn set_archive_comment(&mut self, comment: &str) {
        let bytes = comment.as_bytes();
        let mut len = std::cmp::min(bytes.len(), u16::MAX as usize);
        if let Some(position) = end_signature_position(&bytes[..len]) {
            warn!(
                "archive comment cut at byte {}: it holds the end record signature",
                position
            );
            len = position;
        }
        self.archive_comment = bytes[..len].to_owned();
    }

    /// Like [`set_archive_comment`](Self::set_archive_comment()), but refuses
    /// a comment instead of cutting it.
    pub fn try_set_archive_comment(&mut self, comment: &str) -> Result<(), ArchiveError> {
        let bytes = comment.as_bytes();
        if bytes.len() > u16::MAX as usize {
            return Err(ArchiveError::LimitExceeded(format!(
                "archive comment of {} bytes",
                bytes.len()
            )));
        }
        if let Some(position) = end_signature_position(bytes) {
            return Err(ArchiveError::BadArchiveStructure(format!(
                "Archive comment holds the end of central directory signature at byte {}",
                position
            )));
        }
        self.archive_comment = bytes.to_owned();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Checksum and offset of every entry, in insertion order.
    fn layout(&self) -> Vec<ArchiveFileEntry> {
        let mut offset = 0u64;

        self.entries
            .iter()
            .map(|pending| {
                let size = pending.content.len().min(u32::MAX as usize) as u32;
                let entry = ArchiveFileEntry::stored(
                    &pending.name,
                    crc32(&pending.content),
                    size,
                    offset.min(u32::MAX as u64) as u32,
                    pending.ms_dos,
                );
                trace!(
                    "entry {:?} at offset {} crc {:08x}",
                    pending.name,
                    offset,
                    entry.crc32
                );
                offset += pending.local_block_size();
                entry
            })
            .collect()
    }

    /// Serialize the archive: every local header followed by its content,
    /// then the central directory, then the end record.
    ///
    /// Deterministic: with no `add` in between, two calls return identical bytes.
    pub fn build(&self) -> Vec<u8> {
        let layout = self.layout();

        let central_directory_capacity: usize = layout
            .iter()
            .map(|entry| CentralDirectoryFileHeader::BASE_SIZE + entry.file_name_as_bytes.len())
            .sum();
        let mut archive = ArchiveDescriptor::new(
            self.archive_size as usize
                + central_directory_capacity
                + CentralDirectoryEnd::BASE_SIZE
                + self.archive_comment.len(),
        );

        for (pending, entry) in self.entries.iter().zip(&layout) {
            debug_assert_eq!(archive.len() as u64, entry.offset as u64);
            LocalFileHeader::for_entry(entry).write(&mut archive);
            archive.write_bytes(&pending.content);
        }

        let central_directory_offset = archive.len() as u64;

        for entry in &layout {
            CentralDirectoryFileHeader::for_entry(entry).write(&mut archive);
        }

        let central_directory_size = archive.len() as u64 - central_directory_offset;

        CentralDirectoryEnd::new(
            layout.len(),
            central_directory_size,
            central_directory_offset,
            &self.archive_comment,
        )
        .write(&mut archive);

        debug!(
            "built archive: {} entries, central directory at {} ({} bytes), {} bytes total",
            layout.len(),
            central_directory_offset,
            central_directory_size,
            archive.len()
        );

        archive.finish()
    }

    /// [`build`](Self::build()) together with the content type to declare on download.
    pub fn build_blob(&self) -> ZipBlob {
        ZipBlob {
            bytes: self.build(),
            content_type: ZIP_CONTENT_TYPE,
        }
    }

    /// Write the built archive to `sink`; returns the number of bytes written.
    pub fn write_to<W: Write>(&self, mut sink: W) -> Result<u64, ArchiveError> {
        let bytes = self.build();
        sink.write_all(&bytes)?;
        sink.flush()?;
        Ok(bytes.len() as u64)
    }
}

/// A finished archive and its declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipBlob {
    bytes: Vec<u8>,
    content_type: &'static str,
}

impl ZipBlob {
    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
