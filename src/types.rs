use core::fmt;
use std::borrow::Cow;

use crate::constants::{NO_FLAGS, STORE, VERSION_MADE_BY, VERSION_NEEDED};
use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Timelike};

/// Metadata of one entry as laid out in the archive: everything the local
/// header and the central directory record are built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFileEntry {
    pub version_made_by: u16,
    pub version_needed: u16,
    pub general_purpose_flags: u16,
    pub compression_method: u16,
    pub last_mod_file_time: u16,
    pub last_mod_file_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name_as_bytes: Vec<u8>,
    /// Position of the local header from the start of the archive.
    pub offset: u32,
    pub internal_file_attributes: u16,
    pub external_file_attributes: u32,
}

impl ArchiveFileEntry {
    /// A stored entry: both size fields hold the literal content length.
    pub fn stored(
        file_name: &str,
        crc32: u32,
        size: u32,
        offset: u32,
        (date, time): (u16, u16),
    ) -> Self {
        let name = file_name.as_bytes();
        Self {
            version_made_by: VERSION_MADE_BY,
            version_needed: VERSION_NEEDED,
            general_purpose_flags: NO_FLAGS,
            compression_method: STORE,
            last_mod_file_time: time,
            last_mod_file_date: date,
            crc32,
            compressed_size: size,
            uncompressed_size: size,
            file_name_as_bytes: name[..name.len().min(u16::MAX as usize)].to_vec(),
            offset,
            internal_file_attributes: 0,
            external_file_attributes: 0,
        }
    }

    pub fn get_file_name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.file_name_as_bytes)
    }

    pub fn file_name_len(&self) -> u16 {
        self.file_name_as_bytes.len().min(u16::MAX as usize) as u16
    }

    pub fn last_modified(&self) -> DateTimeCS {
        DateTimeCS::from_msdos(self.last_mod_file_date, self.last_mod_file_time)
    }

    fn pretty_version(zip_version: u16) -> (u16, u16) {
        let zip_version = zip_version & 0xFF;
        (zip_version / 10, zip_version % 10)
    }
}

impl fmt::Display for ArchiveFileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let padding = 48;

        writeln!(f, "{: <padding$}{}", "file name:", self.get_file_name())?;
        writeln!(
            f,
            "{: <padding$}{}",
            "offset of local header from start of archive:", self.offset
        )?;

        let (major, minor) = ArchiveFileEntry::pretty_version(self.version_made_by);
        writeln!(
            f,
            "{: <padding$}{}.{}",
            "version of encoding software:", major, minor
        )?;

        let (major, minor) = ArchiveFileEntry::pretty_version(self.version_needed);
        writeln!(
            f,
            "{: <padding$}{}.{}",
            "minimum software version required to extract:", major, minor
        )?;

        writeln!(
            f,
            "{: <padding$}{:#018b}",
            "general purpose bit flag:", self.general_purpose_flags
        )?;

        let method = match self.compression_method {
            STORE => Cow::Borrowed("none (stored)"),
            other => Cow::Owned(format!("unknown ({})", other)),
        };
        writeln!(f, "{: <padding$}{}", "compression method:", method)?;

        writeln!(
            f,
            "{: <padding$}{}",
            "file last modified on (DOS date/time):",
            self.last_modified()
        )?;
        writeln!(f, "{: <padding$}{:08x}", "32-bit CRC value (hex):", self.crc32)?;
        writeln!(
            f,
            "{: <padding$}{} bytes",
            "compressed size:", self.compressed_size
        )?;
        writeln!(
            f,
            "{: <padding$}{} bytes",
            "uncompressed size:", self.uncompressed_size
        )?;
        writeln!(
            f,
            "{: <padding$}{} characters",
            "length of filename:",
            self.file_name_as_bytes.len()
        )
    }
}

/// A calendar date and time with the resolution of the MS-DOS format.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct DateTimeCS {
    year: u16,
    month: u16,
    day: u16,
    hour: u16,
    minute: u16,
    second: u16,
}

impl Default for DateTimeCS {
    fn default() -> Self {
        Self {
            year: 1980,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
        }
    }
}

impl DateTimeCS {
    pub fn new(year: u16, month: u16, day: u16, hour: u16, minute: u16, second: u16) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub fn from_chrono_datetime<Tz: TimeZone>(datetime: DateTime<Tz>) -> Self {
        Self {
            year: datetime.year() as u16,
            month: datetime.month() as u16,
            day: datetime.day() as u16,
            hour: datetime.hour() as u16,
            minute: datetime.minute() as u16,
            second: datetime.second() as u16,
        }
    }

    pub fn now() -> Self {
        Self::from_chrono_datetime(Local::now())
    }

    pub fn from_msdos(datepart: u16, timepart: u16) -> Self {
        let seconds = (timepart & 0b0000000000011111) << 1;
        let minutes = (timepart & 0b0000011111100000) >> 5;
        let hours = (timepart & 0b1111100000000000) >> 11;
        let days = datepart & 0b0000000000011111;
        let months = (datepart & 0b0000000111100000) >> 5;
        let years = (datepart & 0b1111111000000000) >> 9;

        Self {
            year: years + 1980,
            month: months,
            day: days,
            hour: hours,
            minute: minutes,
            second: seconds,
        }
    }

    /// Encoded as `(date, time)`. Years before 1980 clamp to 1980, seconds
    /// are stored with a two second resolution.
    pub fn ms_dos(&self) -> (u16, u16) {
        let date = self.day | (self.month << 5) | self.year.saturating_sub(1980) << 9;
        let time = (self.second / 2) | (self.minute << 5) | self.hour << 11;
        (date, time)
    }

    pub fn to_time(&self) -> Option<chrono::NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, self.day as u32)?.and_hms_opt(
            self.hour as u32,
            self.minute as u32,
            self.second as u32,
        )
    }
}

impl fmt::Display for DateTimeCS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_time() {
            Some(date_time) => write!(f, "{}", date_time),
            None => write!(
                f,
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02} (invalid)",
                self.year, self.month, self.day, self.hour, self.minute, self.second
            ),
        }
    }
}

/// The (timezone-less) date and time written alongside an entry.
///
/// `FileDateTime::Zero` writes raw zeros in both DOS fields; readers do not
/// check the value.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum FileDateTime {
    #[default]
    Zero,
    Custom(DateTimeCS),
    /// Local clock, sampled when the entry is added.
    Now,
}

impl FileDateTime {
    /// Encoded as `(date, time)`.
    pub fn ms_dos(&self) -> (u16, u16) {
        match self {
            FileDateTime::Zero => (0, 0),
            FileDateTime::Custom(date_time) => date_time.ms_dos(),
            FileDateTime::Now => DateTimeCS::now().ms_dos(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_is_raw_zero() {
        assert_eq!(FileDateTime::Zero.ms_dos(), (0, 0));
        assert_eq!(FileDateTime::default(), FileDateTime::Zero);
    }

    #[test]
    fn msdos_encoding() {
        let date_time = DateTimeCS::new(2020, 2, 21, 1, 20, 20);
        let (date, time) = date_time.ms_dos();

        assert_eq!(date, 21 | (2 << 5) | (40 << 9));
        assert_eq!(time, 10 | (20 << 5) | (1 << 11));
        assert_eq!(DateTimeCS::from_msdos(date, time), date_time);
    }

    #[test]
    fn msdos_odd_seconds_round_down() {
        let date_time = DateTimeCS::new(2001, 12, 31, 23, 59, 59);
        let (date, time) = date_time.ms_dos();

        assert_eq!(
            DateTimeCS::from_msdos(date, time),
            DateTimeCS::new(2001, 12, 31, 23, 59, 58)
        );
    }

    #[test]
    fn display_zero_fields() {
        let date_time = DateTimeCS::from_msdos(0, 0);

        assert!(date_time.to_time().is_none());
        assert_eq!(
            date_time.to_string(),
            "1980-00-00 00:00:00 (invalid)".to_owned()
        );
        assert_eq!(DateTimeCS::default().to_string(), "1980-01-01 00:00:00");
    }

    #[test]
    fn stored_entry_sizes_are_equal() {
        let entry = ArchiveFileEntry::stored("a.png", 7, 10, 45, (0, 0));

        assert_eq!(entry.compressed_size, entry.uncompressed_size);
        assert_eq!(entry.compression_method, STORE);
        assert_eq!(entry.file_name_len(), 5);
        assert_eq!(entry.get_file_name(), "a.png");
    }
}
