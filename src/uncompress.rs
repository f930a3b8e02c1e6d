use std::fmt::{self, Debug, Display};

use tracing::trace;

use crate::archive_common::ArchiveDescriptorReader;
use crate::checksum::crc32;
use crate::constants::{CENTRAL_DIRECTORY_END_SIGNATURE, END_OF_CENTRAL_DIRECTORY_SIZE, STORE};
use crate::error::ArchiveError;
use crate::records::{CentralDirectoryEnd, CentralDirectoryFileHeader, LocalFileHeader};
use crate::types::ArchiveFileEntry;

/// Reads a stored zip archive held in memory.
///
/// The end record is located by scanning back from the end of the stream,
/// then the central directory is walked to list the entries. Content is only
/// touched by [`read`](Self::read()), which checks it against the recorded CRC.
pub struct ArchiveReader<'a> {
    stream: &'a [u8],
    file_entries: Vec<ArchiveFileEntry>,
    central_directory_end: CentralDirectoryEnd<'a>,
}

impl<'a> ArchiveReader<'a> {
    pub fn new(stream: &'a [u8]) -> Result<ArchiveReader<'a>, ArchiveError> {
        let position = Self::find_central_directory_end(stream)?;
        trace!("end of central directory found at {}", position);

        let central_directory_end =
            CentralDirectoryEnd::parse(&mut ArchiveDescriptorReader::at(stream, position))?;

        if central_directory_end.number_of_this_disk != 0
            || central_directory_end.number_of_the_disk_with_central_directory != 0
        {
            return Err(ArchiveError::BadArchiveStructure(
                "Multi-disk archives are not supported".to_owned(),
            ));
        }

        let file_entries = Self::read_central_directory(stream, position, &central_directory_end)?;

        Ok(ArchiveReader {
            stream,
            file_entries,
            central_directory_end,
        })
    }

    fn find_central_directory_end(stream: &[u8]) -> Result<usize, ArchiveError> {
        let mut position = stream
            .len()
            .checked_sub(END_OF_CENTRAL_DIRECTORY_SIZE)
            .ok_or_else(|| ArchiveError::BadArchiveStructure("Archive too small".to_owned()))?;

        // the comment is at most u16::MAX bytes long
        let search_lower_bound = position.saturating_sub(u16::MAX as usize);

        loop {
            let signature = &stream[position..position + 4];
            if signature == CENTRAL_DIRECTORY_END_SIGNATURE.to_le_bytes() {
                // a genuine end record's comment runs exactly to the end of the stream
                let comment_length =
                    ArchiveDescriptorReader::at(stream, position + 20).read_u16()? as usize;
                if position + END_OF_CENTRAL_DIRECTORY_SIZE + comment_length == stream.len() {
                    return Ok(position);
                }
                trace!("skipping end record signature at {}", position);
            }

            if position == search_lower_bound {
                return Err(ArchiveError::BadArchiveStructure(
                    "End of central directory signature not found".to_owned(),
                ));
            }
            position -= 1;
        }
    }

    fn read_central_directory(
        stream: &'a [u8],
        end_position: usize,
        central_directory_end: &CentralDirectoryEnd<'a>,
    ) -> Result<Vec<ArchiveFileEntry>, ArchiveError> {
        let start = central_directory_end.offset_of_start_of_central_directory as usize;
        let size = central_directory_end.central_directory_size as usize;

        if start + size > end_position {
            return Err(ArchiveError::BadArchiveStructure(format!(
                "Central directory ({} bytes at {}) overlaps the end record at {}",
                size, start, end_position
            )));
        }

        let central_directory = &stream[start..start + size];
        let expected = central_directory_end.total_number_of_entries_in_the_central_directory;

        let mut indexer = ArchiveDescriptorReader::new(central_directory);
        let mut entries = Vec::with_capacity(expected as usize);
        while indexer.remaining() > 0 {
            let header = CentralDirectoryFileHeader::parse(&mut indexer)?;
            entries.push(ArchiveFileEntry::from(&header));
        }

        if entries.len() != expected as usize
            || central_directory_end.total_number_of_entries_on_this_disk != expected
        {
            return Err(ArchiveError::BadArchiveStructure(format!(
                "End record declares {} entries, central directory holds {}",
                expected,
                entries.len()
            )));
        }

        Ok(entries)
    }

    pub fn entries(&self) -> &[ArchiveFileEntry] {
        &self.file_entries
    }

    pub fn len(&self) -> usize {
        self.file_entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_entries.is_empty()
    }

    pub fn central_directory_end(&self) -> &CentralDirectoryEnd<'a> {
        &self.central_directory_end
    }

    /// Content of the entry at `index`, checked against its local header and CRC.
    pub fn read(&self, index: usize) -> Result<&'a [u8], ArchiveError> {
        let entry = self.file_entries.get(index).ok_or_else(|| {
            ArchiveError::BadArchiveStructure(format!(
                "No entry at index {} ({} entries)",
                index,
                self.file_entries.len()
            ))
        })?;

        let mut indexer = ArchiveDescriptorReader::at(self.stream, entry.offset as usize);
        let local_header = LocalFileHeader::parse(&mut indexer)?;

        if local_header.file_name != entry.file_name_as_bytes.as_slice() {
            return Err(ArchiveError::BadArchiveStructure(format!(
                "Local header at {} names '{}', central directory names '{}'",
                entry.offset,
                String::from_utf8_lossy(local_header.file_name),
                entry.get_file_name()
            )));
        }

        if entry.compression_method != STORE {
            return Err(ArchiveError::UnsupportedCompressionMethod(
                entry.compression_method,
            ));
        }

        let content = indexer.read_bytes(entry.compressed_size as usize)?;

        let actual = crc32(content);
        for expected in [local_header.crc32, entry.crc32] {
            if expected != actual {
                return Err(ArchiveError::ChecksumMismatch {
                    name: entry.get_file_name().into_owned(),
                    expected,
                    actual,
                });
            }
        }

        Ok(content)
    }

    /// Content of the last entry named `name`, if any.
    pub fn read_by_name(&self, name: &str) -> Result<Option<&'a [u8]>, ArchiveError> {
        match self
            .file_entries
            .iter()
            .rposition(|entry| entry.file_name_as_bytes == name.as_bytes())
        {
            Some(index) => self.read(index).map(Some),
            None => Ok(None),
        }
    }

    /// Read every entry, failing on the first inconsistency.
    pub fn verify(&self) -> Result<(), ArchiveError> {
        (0..self.file_entries.len()).try_for_each(|index| self.read(index).map(|_| ()))
    }
}

impl Debug for ArchiveReader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveReader")
            .field("file_entries", &self.file_entries)
            .field("central_directory_end", &self.central_directory_end)
            .finish()
    }
}

impl Display for ArchiveReader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = &self.central_directory_end;

        if end.archive_comment.is_empty() {
            writeln!(f, "There is no zipfile comment.")?;
        } else {
            writeln!(
                f,
                "The zipfile comment is {} bytes long and contains the following text:",
                end.archive_comment.len()
            )?;
            writeln!(f, "{}", String::from_utf8_lossy(end.archive_comment))?;
        }
        writeln!(f)?;
        writeln!(f, "End-of-central-directory record:")?;
        writeln!(f, "-------------------------------")?;
        writeln!(
            f,
            "  Zip archive file length:                 {} bytes",
            self.stream.len()
        )?;
        writeln!(
            f,
            "  Actual offset of end-of-central-dir record: {} bytes",
            end.offset_of_start_of_central_directory as u64 + end.central_directory_size as u64
        )?;
        writeln!(
            f,
            "  There are {} entries in the central directory ({} bytes).",
            end.total_number_of_entries_in_the_central_directory, end.central_directory_size
        )?;
        writeln!(f)?;

        for (i, entry) in self.file_entries.iter().enumerate() {
            writeln!(f, "Central directory entry #{}:", i + 1)?;
            writeln!(f, "---------------------------")?;
            writeln!(f, "{}", entry)?;
        }

        Ok(())
    }
}
