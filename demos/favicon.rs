use favzip::{
    error::ArchiveError,
    favicon::{FaviconFamily, FaviconOptions, FaviconPackager, IconFormat},
};
use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Package `<dir>/logo.svg` and the renders already present in `<dir>`
/// (`16.png`, `32.png`, ..., `48.ico`) into `favicons.zip`, then print the
/// head markup to paste into the page.
fn main() -> Result<(), ArchiveError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| ".".to_owned()));
    let svg = std::fs::read(dir.join("logo.svg"))?;

    let prerendered = |_: &[u8],
                       size: u32,
                       format: IconFormat|
     -> Result<Vec<u8>, Box<dyn Error + Send + Sync>> {
        let extension = match format {
            IconFormat::Png => "png",
            IconFormat::Ico => "ico",
        };
        Ok(std::fs::read(dir.join(format!("{}.{}", size, extension)))?)
    };

    let packager = FaviconPackager::new(
        FaviconFamily::standard(),
        FaviconOptions::default().name("My Site").short_name("Site"),
    );
    let archive = packager.package(&svg, &prerendered)?;
    let size = archive.write_to(File::create("favicons.zip")?)?;

    println!("favicons.zip: {} entries, {} bytes", archive.len(), size);
    println!();
    print!("{}", packager.head_markup());

    Ok(())
}
