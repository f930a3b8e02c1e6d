//! A library for packaging a set of named byte buffers into a Zip archive, entirely in memory.
//!
//! Entries are *stored* (not compressed): each one is written as a local file header followed by
//! its raw bytes, then a central directory record per entry and a single end of central directory
//! record close the archive. The result is a plain `application/zip` blob that any standard
//! unpacking tool can open.
//!
//! The current implementation is based on
//!
//! [PKWARE's APPNOTE.TXT v6.3.10](https://pkware.cachefly.net/webdocs/casestudies/APPNOTE.TXT)
//!
//! ## Features
//!
//! Feature  | Description
//! ---------|------
//! favicon  | Favicon family packaging: web manifest and browser config generation (default)
//!
//! ## Examples
//!
//! ### Building an archive
//!
//!```rust
//! use favzip::{uncompress::ArchiveReader, ZipArchive};
//!
//! let mut archive = ZipArchive::new();
//! archive.add("favicon.svg", "<svg/>");
//! archive.add("favicon-16x16.png", vec![0u8; 10]);
//!
//! let blob = archive.build_blob();
//! assert_eq!(blob.content_type(), "application/zip");
//!
//! let reader = ArchiveReader::new(blob.as_bytes()).unwrap();
//! assert_eq!(reader.read(0).unwrap(), b"<svg/>");
//!```
//!
//! ### [File system](demos/fs.rs)
//!
//! Write an archive to disk with [`ZipArchive::write_to`]:
//!
//!```rust,no_run
//! use favzip::{error::ArchiveError, ZipArchive};
//! use std::fs::File;
//!
//! fn main() -> Result<(), ArchiveError> {
//!     let mut archive = ZipArchive::new();
//!     archive.add("file1.txt", "hello\n");
//!     archive.add("file2.txt", "world\n");
//!
//!     archive.write_to(File::create("archive.zip")?)?;
//!     Ok(())
//! }
//!```

pub mod archive_common;
mod constants;

pub mod archive;
pub mod checksum;
pub mod error;
#[cfg(feature = "favicon")]
pub mod favicon;
pub mod records;
pub mod types;
pub mod uncompress;

pub use archive::{ZipArchive, ZipBlob};
pub use constants::ZIP_CONTENT_TYPE;
pub use error::ArchiveError;
pub use types::{DateTimeCS, FileDateTime};
