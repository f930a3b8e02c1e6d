//! Favicon family generation.
//!
//! A single vector source is rendered into every size of the standard
//! favicon family by a caller-supplied [`Rasterizer`], then packaged together
//! with `site.webmanifest` and `browserconfig.xml` into a [`ZipArchive`].

use std::error::Error;

use serde::Serialize;
use tracing::debug;

use crate::archive::ZipArchive;
use crate::error::ArchiveError;

pub const MANIFEST_FILE_NAME: &str = "site.webmanifest";
pub const BROWSERCONFIG_FILE_NAME: &str = "browserconfig.xml";
pub const SVG_FILE_NAME: &str = "favicon.svg";

/// Output encoding requested from the rasterizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconFormat {
    Png,
    Ico,
}

impl IconFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            IconFormat::Png => "image/png",
            IconFormat::Ico => "image/x-icon",
        }
    }
}

/// Where an icon is referenced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconRole {
    /// `<link rel="icon">` in the page head.
    Icon,
    AppleTouchIcon,
    /// Listed in `site.webmanifest`.
    Manifest,
    /// Referenced by `browserconfig.xml`.
    Tile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSpec {
    pub file_name: &'static str,
    pub size: u32,
    pub format: IconFormat,
    pub role: IconRole,
}

impl IconSpec {
    pub const fn new(file_name: &'static str, size: u32, format: IconFormat, role: IconRole) -> Self {
        Self {
            file_name,
            size,
            format,
            role,
        }
    }

    pub fn sizes(&self) -> String {
        format!("{0}x{0}", self.size)
    }
}

/// An ordered set of icons to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaviconFamily {
    icons: Vec<IconSpec>,
}

impl FaviconFamily {
    /// The icons a page is expected to declare: legacy ICO at the root, 16
    /// and 32 PNG, Apple touch icon, the two manifest icons, and the Windows tile.
    pub fn standard() -> Self {
        use IconFormat::{Ico, Png};
        use IconRole::{AppleTouchIcon, Icon, Manifest, Tile};

        Self {
            icons: vec![
                IconSpec::new("favicon.ico", 48, Ico, Icon),
                IconSpec::new("favicon-16x16.png", 16, Png, Icon),
                IconSpec::new("favicon-32x32.png", 32, Png, Icon),
                IconSpec::new("apple-touch-icon.png", 180, Png, AppleTouchIcon),
                IconSpec::new("android-chrome-192x192.png", 192, Png, Manifest),
                IconSpec::new("android-chrome-512x512.png", 512, Png, Manifest),
                IconSpec::new("mstile-150x150.png", 150, Png, Tile),
            ],
        }
    }

    pub fn new(icons: Vec<IconSpec>) -> Self {
        Self { icons }
    }

    pub fn icons(&self) -> &[IconSpec] {
        &self.icons
    }

    fn with_role(&self, role: IconRole) -> impl Iterator<Item = &IconSpec> {
        self.icons.iter().filter(move |icon| icon.role == role)
    }
}

impl Default for FaviconFamily {
    fn default() -> Self {
        Self::standard()
    }
}

/// External image pipeline: decodes `source`, draws it at `size` x `size`
/// and encodes it as `format`.
pub trait Rasterizer {
    fn render(
        &self,
        source: &[u8],
        size: u32,
        format: IconFormat,
    ) -> Result<Vec<u8>, Box<dyn Error + Send + Sync>>;
}

impl<F> Rasterizer for F
where
    F: Fn(&[u8], u32, IconFormat) -> Result<Vec<u8>, Box<dyn Error + Send + Sync>>,
{
    fn render(
        &self,
        source: &[u8],
        size: u32,
        format: IconFormat,
    ) -> Result<Vec<u8>, Box<dyn Error + Send + Sync>> {
        self(source, size, format)
    }
}

/// Metadata written into the manifest and browser config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaviconOptions {
    pub name: String,
    pub short_name: String,
    pub theme_color: String,
    pub background_color: String,
    pub tile_color: String,
    pub display: String,
    /// Ship the vector source as `favicon.svg`.
    pub include_svg: bool,
}

impl Default for FaviconOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            short_name: String::new(),
            theme_color: "#ffffff".to_owned(),
            background_color: "#ffffff".to_owned(),
            tile_color: "#da532c".to_owned(),
            display: "standalone".to_owned(),
            include_svg: true,
        }
    }
}

impl FaviconOptions {
    pub fn name(mut self, name: &str) -> FaviconOptions {
        self.name = name.to_owned();
        self
    }

    pub fn short_name(mut self, short_name: &str) -> FaviconOptions {
        self.short_name = short_name.to_owned();
        self
    }

    pub fn theme_color(mut self, color: &str) -> FaviconOptions {
        self.theme_color = color.to_owned();
        self
    }

    pub fn background_color(mut self, color: &str) -> FaviconOptions {
        self.background_color = color.to_owned();
        self
    }

    pub fn tile_color(mut self, color: &str) -> FaviconOptions {
        self.tile_color = color.to_owned();
        self
    }

    pub fn display(mut self, display: &str) -> FaviconOptions {
        self.display = display.to_owned();
        self
    }

    pub fn include_svg(mut self, include_svg: bool) -> FaviconOptions {
        self.include_svg = include_svg;
        self
    }
}

#[derive(Serialize)]
struct WebManifest<'a> {
    name: &'a str,
    short_name: &'a str,
    icons: Vec<ManifestIcon>,
    theme_color: &'a str,
    background_color: &'a str,
    display: &'a str,
}

#[derive(Serialize)]
struct ManifestIcon {
    src: String,
    sizes: String,
    #[serde(rename = "type")]
    mime_type: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct FaviconPackager {
    family: FaviconFamily,
    options: FaviconOptions,
}

impl FaviconPackager {
    pub fn new(family: FaviconFamily, options: FaviconOptions) -> Self {
        Self { family, options }
    }

    pub fn family(&self) -> &FaviconFamily {
        &self.family
    }

    /// Render every icon of the family from `svg` and package the results.
    ///
    /// Entry order: `favicon.svg` (if enabled), the icons in family order,
    /// `site.webmanifest`, `browserconfig.xml`. A rasterizer failure aborts
    /// packaging before anything is added for that icon.
    pub fn package<R: Rasterizer + ?Sized>(
        &self,
        svg: &[u8],
        rasterizer: &R,
    ) -> Result<ZipArchive, ArchiveError> {
        let mut archive = ZipArchive::new();

        if self.options.include_svg {
            archive.try_add(SVG_FILE_NAME, svg)?;
        }

        for icon in self.family.icons() {
            let rendered = rasterizer
                .render(svg, icon.size, icon.format)
                .map_err(|source| ArchiveError::Rasterizer {
                    name: icon.file_name.to_owned(),
                    source,
                })?;
            debug!("rendered {} ({} bytes)", icon.file_name, rendered.len());
            archive.try_add(icon.file_name, rendered)?;
        }

        archive.try_add(MANIFEST_FILE_NAME, self.manifest()?)?;
        archive.try_add(BROWSERCONFIG_FILE_NAME, self.browserconfig())?;

        Ok(archive)
    }

    /// `site.webmanifest` listing the manifest icons.
    pub fn manifest(&self) -> Result<String, ArchiveError> {
        let manifest = WebManifest {
            name: &self.options.name,
            short_name: &self.options.short_name,
            icons: self
                .family
                .with_role(IconRole::Manifest)
                .map(|icon| ManifestIcon {
                    src: format!("/{}", icon.file_name),
                    sizes: icon.sizes(),
                    mime_type: icon.format.mime_type(),
                })
                .collect(),
            theme_color: &self.options.theme_color,
            background_color: &self.options.background_color,
            display: &self.options.display,
        };

        Ok(serde_json::to_string_pretty(&manifest)?)
    }

    /// `browserconfig.xml` pointing the Windows tile at the tile icon.
    pub fn browserconfig(&self) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        xml.push_str("<browserconfig>\n    <msapplication>\n        <tile>\n");
        for icon in self.family.with_role(IconRole::Tile) {
            xml.push_str(&format!(
                "            <square{0}logo src=\"/{1}\"/>\n",
                icon.sizes(),
                escape_xml(icon.file_name)
            ));
        }
        xml.push_str(&format!(
            "            <TileColor>{}</TileColor>\n",
            escape_xml(&self.options.tile_color)
        ));
        xml.push_str("        </tile>\n    </msapplication>\n</browserconfig>\n");
        xml
    }

    /// The `<link>` and `<meta>` tags declaring the packaged files.
    pub fn head_markup(&self) -> String {
        let mut lines = Vec::new();

        if self.options.include_svg {
            lines.push(format!(
                "<link rel=\"icon\" type=\"image/svg+xml\" href=\"/{}\">",
                SVG_FILE_NAME
            ));
        }

        for icon in self.family.icons() {
            let href = escape_xml(icon.file_name);
            match (icon.role, icon.format) {
                (IconRole::Icon, IconFormat::Ico) => {
                    lines.push(format!("<link rel=\"icon\" href=\"/{}\" sizes=\"any\">", href));
                }
                (IconRole::Icon, _) => lines.push(format!(
                    "<link rel=\"icon\" type=\"{}\" sizes=\"{}\" href=\"/{}\">",
                    icon.format.mime_type(),
                    icon.sizes(),
                    href
                )),
                (IconRole::AppleTouchIcon, _) => lines.push(format!(
                    "<link rel=\"apple-touch-icon\" sizes=\"{}\" href=\"/{}\">",
                    icon.sizes(),
                    href
                )),
                (IconRole::Manifest, _) | (IconRole::Tile, _) => {}
            }
        }

        lines.push(format!("<link rel=\"manifest\" href=\"/{}\">", MANIFEST_FILE_NAME));
        lines.push(format!(
            "<meta name=\"msapplication-config\" content=\"/{}\">",
            BROWSERCONFIG_FILE_NAME
        ));
        lines.push(format!(
            "<meta name=\"theme-color\" content=\"{}\">",
            escape_xml(&self.options.theme_color)
        ));

        let mut html = lines.join("\n");
        html.push('\n');
        html
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn standard_family_sizes() {
        let family = FaviconFamily::standard();
        let sizes: Vec<u32> = family.icons().iter().map(|icon| icon.size).collect();

        assert_eq!(sizes, vec![48, 16, 32, 180, 192, 512, 150]);
        assert_eq!(family.with_role(IconRole::Manifest).count(), 2);
        assert_eq!(family.icons()[0].format, IconFormat::Ico);
    }

    #[test]
    fn manifest_lists_android_icons() -> Result<(), ArchiveError> {
        let packager = FaviconPackager::new(
            FaviconFamily::standard(),
            FaviconOptions::default().name("Example").short_name("Ex"),
        );

        let manifest: serde_json::Value = serde_json::from_str(&packager.manifest()?)?;

        assert_eq!(manifest["name"], "Example");
        assert_eq!(manifest["short_name"], "Ex");
        assert_eq!(manifest["display"], "standalone");
        assert_eq!(manifest["icons"][0]["src"], "/android-chrome-192x192.png");
        assert_eq!(manifest["icons"][0]["sizes"], "192x192");
        assert_eq!(manifest["icons"][0]["type"], "image/png");
        assert_eq!(manifest["icons"][1]["sizes"], "512x512");
        assert_eq!(manifest["icons"].as_array().map(Vec::len), Some(2));
        Ok(())
    }

    #[test]
    fn browserconfig_has_tile() {
        let packager = FaviconPackager::new(
            FaviconFamily::standard(),
            FaviconOptions::default().tile_color("#00aba9"),
        );

        let xml = packager.browserconfig();

        assert!(xml.contains("<square150x150logo src=\"/mstile-150x150.png\"/>"));
        assert!(xml.contains("<TileColor>#00aba9</TileColor>"));
    }

    #[test]
    fn head_markup_declares_files() {
        let html = FaviconPackager::default().head_markup();

        assert!(html.contains("<link rel=\"icon\" type=\"image/svg+xml\" href=\"/favicon.svg\">"));
        assert!(html.contains("<link rel=\"icon\" href=\"/favicon.ico\" sizes=\"any\">"));
        assert!(html.contains("sizes=\"32x32\" href=\"/favicon-32x32.png\""));
        assert!(html.contains("<link rel=\"apple-touch-icon\" sizes=\"180x180\""));
        assert!(html.contains("<link rel=\"manifest\" href=\"/site.webmanifest\">"));
        assert!(!html.contains("android-chrome"));
    }

    #[test]
    fn head_markup_one_tag_per_line() {
        let packager = FaviconPackager::new(
            FaviconFamily::standard(),
            FaviconOptions::default().include_svg(false),
        );

        let html = packager.head_markup();
        let lines: Vec<&str> = html.lines().collect();

        assert!(html.ends_with(">\n"));
        assert_eq!(lines.len(), 7);
        assert!(lines.iter().all(|line| line.starts_with('<') && line.ends_with('>')));
        assert_eq!(lines[6], "<meta name=\"theme-color\" content=\"#ffffff\">");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }
}
