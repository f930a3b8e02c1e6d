#![allow(dead_code)]

use std::{
    fs::{create_dir_all, remove_file, File},
    io::{Cursor, Read},
    path::{Path, PathBuf},
};

pub fn clean_file_path(file_name: &str) -> PathBuf {
    let out_dir = std::env::temp_dir().join("favzip");
    if !out_dir.exists() {
        create_dir_all(&out_dir).unwrap_or_else(|error| {
            panic!("creating dir {:?} failed, because {:?}", out_dir, error);
        })
    }

    let out_path = out_dir.join(file_name);

    if out_path.exists() {
        remove_file(&out_path).unwrap_or_else(|error| {
            panic!("deleting file {:?} failed, because {:?}", &out_path, error);
        });
    }
    out_path
}

pub fn create_new_clean_file(file_name: &str) -> (File, PathBuf) {
    let out_path = clean_file_path(file_name);
    let file = File::create(&out_path).unwrap_or_else(|error| {
        panic!("creating file {:?} failed, because {:?}", &out_path, error);
    });
    (file, out_path)
}

/// Every entry as seen by the `zip` crate: name, content and recorded CRC.
pub fn read_with_zip_crate<R: Read + std::io::Seek>(reader: R) -> Vec<(String, Vec<u8>, u32)> {
    let mut archive = zip::ZipArchive::new(reader).expect("zip crate rejected the archive");

    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).expect("entry readable");
            assert_eq!(file.compression(), zip::CompressionMethod::Stored);
            assert_eq!(file.size(), file.compressed_size());

            let mut content = Vec::new();
            file.read_to_end(&mut content).expect("content readable");
            (file.name().to_owned(), content, file.crc32())
        })
        .collect()
}

pub fn read_bytes_with_zip_crate(bytes: &[u8]) -> Vec<(String, Vec<u8>, u32)> {
    read_with_zip_crate(Cursor::new(bytes))
}

pub fn read_path_with_zip_crate(path: &Path) -> Vec<(String, Vec<u8>, u32)> {
    let file = File::open(path).unwrap_or_else(|error| {
        panic!("opening file {:?} failed, because {:?}", path, error);
    });
    read_with_zip_crate(file)
}
