use favzip::{
    checksum::crc32, error::ArchiveError, records::LocalFileHeader, uncompress::ArchiveReader,
    ZipArchive,
};

fn u16_at(vec: &[u8], index: usize) -> u16 {
    u16::from_le_bytes([vec[index], vec[index + 1]])
}

fn u32_at(vec: &[u8], index: usize) -> u32 {
    u32::from_le_bytes([vec[index], vec[index + 1], vec[index + 2], vec[index + 3]])
}

#[test]
fn single_svg_entry() -> Result<(), ArchiveError> {
    let mut archive = ZipArchive::new();
    archive.add("favicon.svg", "<svg/>");

    let vec = archive.build();

    // local header + name, content, central record + name, end record
    assert_eq!(vec.len(), 41 + 6 + 57 + 22);
    assert_eq!(vec.len(), 126);

    let reader = ArchiveReader::new(&vec)?;
    assert_eq!(reader.len(), 1);
    assert_eq!(reader.entries()[0].get_file_name(), "favicon.svg");
    assert_eq!(reader.read(0)?, b"<svg/>");
    Ok(())
}

#[test]
fn second_entry_offset() -> Result<(), ArchiveError> {
    let mut archive = ZipArchive::new();
    archive.add("a.png", vec![0u8; 10]);
    archive.add("b.png", vec![0xFFu8; 20]);

    let vec = archive.build();
    let reader = ArchiveReader::new(&vec)?;

    assert_eq!(reader.entries()[0].offset, 0);
    assert_eq!(reader.entries()[1].offset, 30 + 5 + 10);
    assert_eq!(reader.read(1)?, &[0xFFu8; 20][..]);
    assert_eq!(reader.read(0)?, &[0u8; 10][..]);
    Ok(())
}

#[test]
fn empty_archive_is_end_record_only() -> Result<(), ArchiveError> {
    let vec = ZipArchive::new().build();

    assert_eq!(vec.len(), 22);
    assert_eq!(u32_at(&vec, 0), 0x06054b50);
    assert_eq!(u16_at(&vec, 8), 0); // entries on this disk
    assert_eq!(u16_at(&vec, 10), 0); // total entries
    assert_eq!(u32_at(&vec, 12), 0); // central directory size

    let reader = ArchiveReader::new(&vec)?;
    assert!(reader.is_empty());
    Ok(())
}

#[test]
fn build_is_idempotent() {
    let mut archive = ZipArchive::new();
    archive.add("favicon-16x16.png", vec![1u8, 2, 3, 4]);
    archive.add("favicon-32x32.png", vec![5u8; 64]);

    let first = archive.build();
    let second = archive.build();

    assert_eq!(first, second);
}

#[test]
fn add_after_build_yields_fresh_container() -> Result<(), ArchiveError> {
    let mut archive = ZipArchive::new();
    archive.add("a.txt", "a");
    let first = archive.build();

    archive.add("b.txt", "b");
    let second = archive.build();

    assert_eq!(ArchiveReader::new(&first)?.len(), 1);
    let reader = ArchiveReader::new(&second)?;
    assert_eq!(reader.len(), 2);
    assert_eq!(reader.read_by_name("b.txt")?, Some(&b"b"[..]));
    Ok(())
}

#[test]
fn end_record_matches_layout() -> Result<(), ArchiveError> {
    let contents: Vec<(String, Vec<u8>)> = (0..7u8)
        .map(|i| (format!("icon-{}.png", i), vec![i; 3 * i as usize + 1]))
        .collect();

    let mut archive = ZipArchive::new();
    for (name, content) in &contents {
        archive.add(name.as_str(), content.as_slice());
    }

    let vec = archive.build();
    let reader = ArchiveReader::new(&vec)?;
    let end = reader.central_directory_end();

    let local_blocks: usize = contents
        .iter()
        .map(|(name, content)| LocalFileHeader::BASE_SIZE + name.len() + content.len())
        .sum();

    assert_eq!(end.total_number_of_entries_in_the_central_directory, 7);
    assert_eq!(end.total_number_of_entries_on_this_disk, 7);
    assert_eq!(end.offset_of_start_of_central_directory as usize, local_blocks);
    assert_eq!(
        local_blocks + end.central_directory_size as usize + 22,
        vec.len()
    );
    Ok(())
}

#[test]
fn offsets_are_contiguous() -> Result<(), ArchiveError> {
    let mut archive = ZipArchive::new();
    archive.add("apple-touch-icon.png", vec![7u8; 33]);
    archive.add("x", Vec::new());
    archive.add("android-chrome-192x192.png", vec![9u8; 100]);

    let vec = archive.build();
    let reader = ArchiveReader::new(&vec)?;

    let entries = reader.entries();
    for pair in entries.windows(2) {
        let previous = &pair[0];
        assert_eq!(
            pair[1].offset,
            previous.offset + 30 + previous.file_name_as_bytes.len() as u32 + previous.compressed_size
        );
    }
    Ok(())
}

#[test]
fn checksums_in_both_records() -> Result<(), ArchiveError> {
    let contents: [(&str, &[u8]); 3] = [
        ("favicon.svg", b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>"),
        ("empty.txt", b""),
        ("binary.bin", &[0x00, 0xFF, 0x50, 0x4B, 0x05, 0x06]),
    ];

    let mut archive = ZipArchive::new();
    for (name, content) in contents {
        archive.add(name, content);
    }

    let vec = archive.build();
    let reader = ArchiveReader::new(&vec)?;

    for (entry, (name, content)) in reader.entries().iter().zip(contents) {
        assert_eq!(entry.get_file_name(), name);
        assert_eq!(entry.crc32, crc32(content));
        assert_eq!(entry.crc32, crc32fast::hash(content));

        // crc32 field of the local header
        let local_crc = u32_at(&vec, entry.offset as usize + 14);
        assert_eq!(local_crc, entry.crc32);
        assert_eq!(entry.compressed_size, content.len() as u32);
        assert_eq!(entry.uncompressed_size, content.len() as u32);
    }

    reader.verify()
}

#[test]
fn duplicate_names_resolve_to_last() -> Result<(), ArchiveError> {
    let mut archive = ZipArchive::new();
    archive.add("favicon.ico", "old");
    archive.add("favicon.ico", "new");

    let vec = archive.build();
    let reader = ArchiveReader::new(&vec)?;

    assert_eq!(reader.len(), 2);
    assert_eq!(reader.read_by_name("favicon.ico")?, Some(&b"new"[..]));
    Ok(())
}

#[test]
fn reader_display_lists_entries() -> Result<(), ArchiveError> {
    let mut archive = ZipArchive::new();
    archive.add("favicon.svg", "<svg/>");
    archive.set_archive_comment("favicon package");

    let vec = archive.build();
    let text = ArchiveReader::new(&vec)?.to_string();

    assert!(text.contains("favicon package"));
    assert!(text.contains("Central directory entry #1:"));
    assert!(text.contains("favicon.svg"));
    assert!(text.contains("none (stored)"));
    Ok(())
}
