//! The three fixed-layout records of a stored Zip archive.
//!
//! Each record has an encoder (`write`) and a decoder (`parse`). All fields
//! are little-endian; variable-length parts (name, extra field, comment)
//! follow the fixed part without padding.

use crate::archive_common::{ArchiveDescriptor, ArchiveDescriptorReader};
use crate::constants::{
    CENTRAL_DIRECTORY_END_SIGNATURE, CENTRAL_DIRECTORY_ENTRY_BASE_SIZE,
    CENTRAL_DIRECTORY_ENTRY_SIGNATURE, END_OF_CENTRAL_DIRECTORY_SIZE, FILE_HEADER_BASE_SIZE,
    LOCAL_FILE_HEADER_SIGNATURE,
};
use crate::error::ArchiveError;
use crate::types::ArchiveFileEntry;

fn check_signature(
    reader: &mut ArchiveDescriptorReader<'_>,
    expected: u32,
    record: &str,
) -> Result<(), ArchiveError> {
    let position = reader.get_index();
    let signature = reader.read_u32()?;
    if signature != expected {
        return Err(ArchiveError::BadArchiveStructure(format!(
            "{} signature {:08X} expected at {}, found {:08X}",
            record, expected, position, signature
        )));
    }
    Ok(())
}

fn len_u16(bytes: &[u8]) -> u16 {
    bytes.len().min(u16::MAX as usize) as u16
}

/// Preamble written immediately before an entry's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFileHeader<'a> {
    pub version_needed: u16,
    pub general_purpose_flags: u16,
    pub compression_method: u16,
    pub last_mod_file_time: u16,
    pub last_mod_file_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name: &'a [u8],
    pub extra_field: &'a [u8],
}

impl<'a> LocalFileHeader<'a> {
    pub const SIGNATURE: u32 = LOCAL_FILE_HEADER_SIGNATURE;
    pub const BASE_SIZE: usize = FILE_HEADER_BASE_SIZE;

    pub fn for_entry(entry: &'a ArchiveFileEntry) -> Self {
        Self {
            version_needed: entry.version_needed,
            general_purpose_flags: entry.general_purpose_flags,
            compression_method: entry.compression_method,
            last_mod_file_time: entry.last_mod_file_time,
            last_mod_file_date: entry.last_mod_file_date,
            crc32: entry.crc32,
            compressed_size: entry.compressed_size,
            uncompressed_size: entry.uncompressed_size,
            file_name: &entry.file_name_as_bytes,
            extra_field: &[],
        }
    }

    /// Fixed part plus name and extra field; the entry's content starts right after.
    pub fn size(&self) -> usize {
        Self::BASE_SIZE + self.file_name.len() + self.extra_field.len()
    }

    pub fn write(&self, desc: &mut ArchiveDescriptor) {
        desc.write_u32(Self::SIGNATURE);
        desc.write_u16(self.version_needed);
        desc.write_u16(self.general_purpose_flags);
        desc.write_u16(self.compression_method);
        desc.write_u16(self.last_mod_file_time);
        desc.write_u16(self.last_mod_file_date);
        desc.write_u32(self.crc32);
        desc.write_u32(self.compressed_size);
        desc.write_u32(self.uncompressed_size);
        desc.write_u16(len_u16(self.file_name));
        desc.write_u16(len_u16(self.extra_field));
        desc.write_bytes(self.file_name);
        desc.write_bytes(self.extra_field);
    }

    pub fn parse(reader: &mut ArchiveDescriptorReader<'a>) -> Result<Self, ArchiveError> {
        check_signature(reader, Self::SIGNATURE, "Local file header")?;

        let version_needed = reader.read_u16()?;
        let general_purpose_flags = reader.read_u16()?;
        let compression_method = reader.read_u16()?;
        let last_mod_file_time = reader.read_u16()?;
        let last_mod_file_date = reader.read_u16()?;
        let crc32 = reader.read_u32()?;
        let compressed_size = reader.read_u32()?;
        let uncompressed_size = reader.read_u32()?;
        let file_name_len = reader.read_u16()?;
        let extra_field_length = reader.read_u16()?;
        let file_name = reader.read_bytes(file_name_len as usize)?;
        let extra_field = reader.read_bytes(extra_field_length as usize)?;

        Ok(Self {
            version_needed,
            general_purpose_flags,
            compression_method,
            last_mod_file_time,
            last_mod_file_date,
            crc32,
            compressed_size,
            uncompressed_size,
            file_name,
            extra_field,
        })
    }
}

/// One record of the trailing index; mirrors the local header and adds the
/// local header's offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CentralDirectoryFileHeader<'a> {
    pub version_made_by: u16,
    pub version_needed: u16,
    pub general_purpose_flags: u16,
    pub compression_method: u16,
    pub last_mod_file_time: u16,
    pub last_mod_file_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub disk_number_start: u16,
    pub internal_file_attributes: u16,
    pub external_file_attributes: u32,
    pub offset: u32,
    pub file_name: &'a [u8],
    pub extra_field: &'a [u8],
    pub file_comment: &'a [u8],
}

impl<'a> CentralDirectoryFileHeader<'a> {
    pub const SIGNATURE: u32 = CENTRAL_DIRECTORY_ENTRY_SIGNATURE;
    pub const BASE_SIZE: usize = CENTRAL_DIRECTORY_ENTRY_BASE_SIZE;

    pub fn for_entry(entry: &'a ArchiveFileEntry) -> Self {
        Self {
            version_made_by: entry.version_made_by,
            version_needed: entry.version_needed,
            general_purpose_flags: entry.general_purpose_flags,
            compression_method: entry.compression_method,
            last_mod_file_time: entry.last_mod_file_time,
            last_mod_file_date: entry.last_mod_file_date,
            crc32: entry.crc32,
            compressed_size: entry.compressed_size,
            uncompressed_size: entry.uncompressed_size,
            disk_number_start: 0,
            internal_file_attributes: entry.internal_file_attributes,
            external_file_attributes: entry.external_file_attributes,
            offset: entry.offset,
            file_name: &entry.file_name_as_bytes,
            extra_field: &[],
            file_comment: &[],
        }
    }

    pub fn size(&self) -> usize {
        Self::BASE_SIZE + self.file_name.len() + self.extra_field.len() + self.file_comment.len()
    }

    pub fn write(&self, desc: &mut ArchiveDescriptor) {
        desc.write_u32(Self::SIGNATURE);
        desc.write_u16(self.version_made_by);
        desc.write_u16(self.version_needed);
        desc.write_u16(self.general_purpose_flags);
        desc.write_u16(self.compression_method);
        desc.write_u16(self.last_mod_file_time);
        desc.write_u16(self.last_mod_file_date);
        desc.write_u32(self.crc32);
        desc.write_u32(self.compressed_size);
        desc.write_u32(self.uncompressed_size);
        desc.write_u16(len_u16(self.file_name));
        desc.write_u16(len_u16(self.extra_field));
        desc.write_u16(len_u16(self.file_comment));
        desc.write_u16(self.disk_number_start);
        desc.write_u16(self.internal_file_attributes);
        desc.write_u32(self.external_file_attributes);
        desc.write_u32(self.offset);
        desc.write_bytes(self.file_name);
        desc.write_bytes(self.extra_field);
        desc.write_bytes(self.file_comment);
    }

    pub fn parse(reader: &mut ArchiveDescriptorReader<'a>) -> Result<Self, ArchiveError> {
        check_signature(reader, Self::SIGNATURE, "Central directory file header")?;

        let version_made_by = reader.read_u16()?;
        let version_needed = reader.read_u16()?;
        let general_purpose_flags = reader.read_u16()?;
        let compression_method = reader.read_u16()?;
        let last_mod_file_time = reader.read_u16()?;
        let last_mod_file_date = reader.read_u16()?;
        let crc32 = reader.read_u32()?;
        let compressed_size = reader.read_u32()?;
        let uncompressed_size = reader.read_u32()?;
        let file_name_len = reader.read_u16()?;
        let extra_field_length = reader.read_u16()?;
        let file_comment_length = reader.read_u16()?;
        let disk_number_start = reader.read_u16()?;
        let internal_file_attributes = reader.read_u16()?;
        let external_file_attributes = reader.read_u32()?;
        let offset = reader.read_u32()?;
        let file_name = reader.read_bytes(file_name_len as usize)?;
        let extra_field = reader.read_bytes(extra_field_length as usize)?;
        let file_comment = reader.read_bytes(file_comment_length as usize)?;

        Ok(Self {
            version_made_by,
            version_needed,
            general_purpose_flags,
            compression_method,
            last_mod_file_time,
            last_mod_file_date,
            crc32,
            compressed_size,
            uncompressed_size,
            disk_number_start,
            internal_file_attributes,
            external_file_attributes,
            offset,
            file_name,
            extra_field,
            file_comment,
        })
    }
}

impl From<&CentralDirectoryFileHeader<'_>> for ArchiveFileEntry {
    fn from(header: &CentralDirectoryFileHeader<'_>) -> Self {
        ArchiveFileEntry {
            version_made_by: header.version_made_by,
            version_needed: header.version_needed,
            general_purpose_flags: header.general_purpose_flags,
            compression_method: header.compression_method,
            last_mod_file_time: header.last_mod_file_time,
            last_mod_file_date: header.last_mod_file_date,
            crc32: header.crc32,
            compressed_size: header.compressed_size,
            uncompressed_size: header.uncompressed_size,
            file_name_as_bytes: header.file_name.to_vec(),
            offset: header.offset,
            internal_file_attributes: header.internal_file_attributes,
            external_file_attributes: header.external_file_attributes,
        }
    }
}

/// Terminal record; readers find it by scanning back from the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CentralDirectoryEnd<'a> {
    pub number_of_this_disk: u16,
    pub number_of_the_disk_with_central_directory: u16,
    pub total_number_of_entries_on_this_disk: u16,
    pub total_number_of_entries_in_the_central_directory: u16,
    pub central_directory_size: u32,
    pub offset_of_start_of_central_directory: u32,
    pub archive_comment: &'a [u8],
}

impl<'a> CentralDirectoryEnd<'a> {
    pub const SIGNATURE: u32 = CENTRAL_DIRECTORY_END_SIGNATURE;
    pub const BASE_SIZE: usize = END_OF_CENTRAL_DIRECTORY_SIZE;

    /// Single-disk end record; counts and sizes saturate at their field width.
    pub fn new(
        entry_count: usize,
        central_directory_size: u64,
        central_directory_offset: u64,
        archive_comment: &'a [u8],
    ) -> Self {
        let entry_count = entry_count.min(u16::MAX as usize) as u16;
        let comment_len = len_u16(archive_comment) as usize;
        Self {
            number_of_this_disk: 0,
            number_of_the_disk_with_central_directory: 0,
            total_number_of_entries_on_this_disk: entry_count,
            total_number_of_entries_in_the_central_directory: entry_count,
            central_directory_size: central_directory_size.min(u32::MAX as u64) as u32,
            offset_of_start_of_central_directory: central_directory_offset
                .min(u32::MAX as u64) as u32,
            archive_comment: &archive_comment[..comment_len],
        }
    }

    pub fn size(&self) -> usize {
        Self::BASE_SIZE + self.archive_comment.len()
    }

    pub fn write(&self, desc: &mut ArchiveDescriptor) {
        desc.write_u32(Self::SIGNATURE);
        desc.write_u16(self.number_of_this_disk);
        desc.write_u16(self.number_of_the_disk_with_central_directory);
        desc.write_u16(self.total_number_of_entries_on_this_disk);
        desc.write_u16(self.total_number_of_entries_in_the_central_directory);
        desc.write_u32(self.central_directory_size);
        desc.write_u32(self.offset_of_start_of_central_directory);
        desc.write_u16(len_u16(self.archive_comment));
        desc.write_bytes(self.archive_comment);
    }

    pub fn parse(reader: &mut ArchiveDescriptorReader<'a>) -> Result<Self, ArchiveError> {
        check_signature(reader, Self::SIGNATURE, "End of central directory")?;

        let number_of_this_disk = reader.read_u16()?;
        let number_of_the_disk_with_central_directory = reader.read_u16()?;
        let total_number_of_entries_on_this_disk = reader.read_u16()?;
        let total_number_of_entries_in_the_central_directory = reader.read_u16()?;
        let central_directory_size = reader.read_u32()?;
        let offset_of_start_of_central_directory = reader.read_u32()?;
        let zip_file_comment_length = reader.read_u16()?;
        let archive_comment = reader.read_bytes(zip_file_comment_length as usize)?;

        Ok(Self {
            number_of_this_disk,
            number_of_the_disk_with_central_directory,
            total_number_of_entries_on_this_disk,
            total_number_of_entries_in_the_central_directory,
            central_directory_size,
            offset_of_start_of_central_directory,
            archive_comment,
        })
    }
}
