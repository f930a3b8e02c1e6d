use favzip::{error::ArchiveError, FileDateTime, ZipArchive};
use std::fs::File;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Package the files given on the command line into `archive.zip`.
fn main() -> Result<(), ArchiveError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut archive = ZipArchive::new().with_default_time(FileDateTime::Now);

    for arg in std::env::args().skip(1) {
        let path = Path::new(&arg);
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| arg.clone());
        archive.try_add(name, std::fs::read(path)?)?;
    }

    let size = archive.write_to(File::create("archive.zip")?)?;
    println!("archive.zip: {} entries, {} bytes", archive.len(), size);

    Ok(())
}
