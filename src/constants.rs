use std::mem::size_of;

pub const FILE_HEADER_BASE_SIZE: usize = 7 * size_of::<u16>() + 4 * size_of::<u32>();
pub const CENTRAL_DIRECTORY_ENTRY_BASE_SIZE: usize = 11 * size_of::<u16>() + 6 * size_of::<u32>();
pub const END_OF_CENTRAL_DIRECTORY_SIZE: usize = 5 * size_of::<u16>() + 3 * size_of::<u32>();

pub const LOCAL_FILE_HEADER_SIGNATURE: u32 = 0x04034b50;
pub const CENTRAL_DIRECTORY_ENTRY_SIGNATURE: u32 = 0x02014b50;
pub const CENTRAL_DIRECTORY_END_SIGNATURE: u32 = 0x06054b50;

/// 1.0: stored entries only.
pub const VERSION_NEEDED: u16 = 10;
/// Host system 0 (MS-DOS) in the high byte, 2.0 in the low byte.
pub const VERSION_MADE_BY: u16 = 20;

pub const NO_FLAGS: u16 = 0;
pub const STORE: u16 = 0;

pub const ZIP_CONTENT_TYPE: &str = "application/zip";
