//! ZIP containers for OOXML packages and plain archives.
//!
//! Every entry is deflated and stamped with the same modification time, so
//! a container built from the same seed is byte-identical.

use std::io::{self, Cursor, Write};

use chrono::{Datelike, NaiveDateTime, Timelike};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// In-memory ZIP builder.
pub(crate) struct ZipBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl ZipBuilder {
    pub(crate) fn new(modified: NaiveDateTime) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(dos_time(modified));
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options,
        }
    }

    pub(crate) fn add(&mut self, name: &str, data: &[u8]) -> io::Result<()> {
        self.writer
            .start_file(name, self.options)
            .map_err(io::Error::other)?;
        self.writer.write_all(data)
    }

    /// Write the central directory and return the archive bytes.
    pub(crate) fn finish(self) -> io::Result<Vec<u8>> {
        let cursor = self.writer.finish().map_err(io::Error::other)?;
        Ok(cursor.into_inner())
    }
}

/// MS-DOS timestamps cover 1980..=2107; anything outside gets the format's
/// zero date.
fn dos_time(at: NaiveDateTime) -> DateTime {
    let Ok(year) = u16::try_from(at.year()) else {
        return DateTime::default();
    };
    DateTime::from_date_and_time(
        year,
        at.month() as u8,
        at.day() as u8,
        at.hour() as u8,
        at.minute() as u8,
        at.second() as u8,
    )
    .unwrap_or_default()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Read;
    use zip::ZipArchive;

    pub(crate) fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 6, 14)
            .and_then(|d| d.and_hms_opt(10, 30, 0))
            .unwrap()
    }

    /// Every entry as `(name, contents)`, in archive order.
    pub(crate) fn read_entries(archive: &[u8]) -> Vec<(String, Vec<u8>)> {
        let mut zip = ZipArchive::new(Cursor::new(archive)).unwrap();
        (0..zip.len())
            .map(|i| {
                let mut file = zip.by_index(i).unwrap();
                let mut data = Vec::new();
                file.read_to_end(&mut data).unwrap();
                (file.name().to_string(), data)
            })
            .collect()
    }

    #[test]
    fn entries_read_back_in_order() {
        let mut zip = ZipBuilder::new(stamp());
        zip.add("a.txt", b"alpha").unwrap();
        zip.add("dir/b.txt", &[b'b'; 4096]).unwrap();
        let bytes = zip.finish().unwrap();

        let entries = read_entries(&bytes);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ("a.txt".to_string(), b"alpha".to_vec()));
        assert_eq!(entries[1].0, "dir/b.txt");
        assert_eq!(entries[1].1.len(), 4096);
    }

    #[test]
    fn empty_archive_opens() {
        let bytes = ZipBuilder::new(stamp()).finish().unwrap();
        assert!(read_entries(&bytes).is_empty());
    }

    #[test]
    fn same_stamp_same_bytes() {
        let build = || {
            let mut zip = ZipBuilder::new(stamp());
            zip.add("notes.txt", b"quarterly figures").unwrap();
            zip.finish().unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn out_of_range_years_fall_back_to_dos_epoch() {
        let ancient = NaiveDate::from_ymd_opt(1901, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        assert_eq!(dos_time(ancient), DateTime::default());
        assert_eq!(dos_time(stamp()).year(), 2023);
    }
}
