//! Artifact Bundling - PNG, JPG, SVG and PDF downloads
//!
//! SVG and PDF are raster placeholders: the SVG embeds the PNG as an
//! `<image>`, and the PDF url is the PNG data URL under a `.pdf` name.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageError, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::templates::TemplateDimensions;

/// Lowercase, with each whitespace run collapsed to one hyphen.
pub fn filename_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.extend(c.to_lowercase());
            in_space = false;
        }
    }
    slug
}

/// Name safe to create inside a single directory.
///
/// Path separators, characters illegal in file names and control
/// characters become `-`. Names made only of dots are prefixed so they
/// cannot mean the current or parent directory.
pub fn disk_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '<' | '>' | ':' | '"' | '|' | '?' | '*' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        format!("-{cleaned}")
    } else {
        cleaned
    }
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ImageError> {
    let mut bytes = vec![];
    PngEncoder::new(&mut bytes).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(bytes)
}

/// JPEG has no alpha; the surface is flattened to RGB first.
pub fn encode_jpeg(image: &RgbaImage, quality: u8) -> Result<Vec<u8>, ImageError> {
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut bytes = vec![];
    JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100)).write_image(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(bytes)
}

pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Inverse of [`data_url`]; `None` for anything that is not base64 data.
pub fn decode_data_url(url: &str) -> Option<(String, Vec<u8>)> {
    let rest = url.strip_prefix("data:")?;
    let (mime, payload) = rest.split_once(";base64,")?;
    let bytes = STANDARD.decode(payload).ok()?;
    Some((mime.to_string(), bytes))
}

/// SVG document wrapping a raster data URL.
pub fn svg_wrapper(dimensions: TemplateDimensions, png_url: &str) -> String {
    format!(
        "<svg width=\"{w}\" height=\"{h}\" xmlns=\"http://www.w3.org/2000/svg\">\n  <image href=\"{url}\" width=\"{w}\" height=\"{h}\"/>\n</svg>",
        w = dimensions.width,
        h = dimensions.height,
        url = png_url,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PngQuality {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PngDownload {
    pub url: String,
    pub filename: String,
    pub size: String,
    pub quality: PngQuality,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JpgDownload {
    pub url: String,
    pub filename: String,
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SvgDownload {
    pub url: String,
    pub filename: String,
    pub editable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfDownload {
    pub url: String,
    pub filename: String,
    pub print_ready: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Downloads {
    pub png: PngDownload,
    pub jpg: JpgDownload,
    pub svg: SvgDownload,
    pub pdf: PdfDownload,
}

impl Downloads {
    /// `(filename, url)` for each artifact, in png, jpg, svg, pdf order.
    pub fn artifacts(&self) -> [(&str, &str); 4] {
        [
            (self.png.filename.as_str(), self.png.url.as_str()),
            (self.jpg.filename.as_str(), self.jpg.url.as_str()),
            (self.svg.filename.as_str(), self.svg.url.as_str()),
            (self.pdf.filename.as_str(), self.pdf.url.as_str()),
        ]
    }
}

/// Encode a rendered surface into the four download artifacts.
pub fn bundle_downloads(
    image: &RgbaImage,
    template_name: &str,
    jpeg_quality: u8,
) -> Result<Downloads, ImageError> {
    let dimensions = TemplateDimensions::new(image.width(), image.height());
    let slug = filename_slug(template_name);
    let size = dimensions.label();

    let png_url = data_url("image/png", &encode_png(image)?);
    let jpg_url = data_url("image/jpeg", &encode_jpeg(image, jpeg_quality)?);
    let svg_url = data_url("image/svg+xml", svg_wrapper(dimensions, &png_url).as_bytes());

    Ok(Downloads {
        png: PngDownload {
            url: png_url.clone(),
            filename: format!("{slug}.png"),
            size: size.clone(),
            quality: PngQuality::High,
        },
        jpg: JpgDownload {
            url: jpg_url,
            filename: format!("{slug}.jpg"),
            size,
        },
        svg: SvgDownload {
            url: svg_url,
            filename: format!("{slug}.svg"),
            editable: true,
        },
        pdf: PdfDownload {
            url: png_url,
            filename: format!("{slug}.pdf"),
            print_ready: true,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([15, 23, 42, 255]))
    }

    #[test]
    fn test_slug() {
        assert_eq!(filename_slug("My Great Template"), "my-great-template");
        assert_eq!(filename_slug("Launch   Post\tQ3"), "launch-post-q3");
        assert_eq!(filename_slug(" Edge "), "-edge-");
        assert_eq!(filename_slug("already-slugged"), "already-slugged");
    }

    #[test]
    fn test_disk_file_name_strips_separators() {
        assert_eq!(disk_file_name("../escaped.png"), "..-escaped.png");
        assert_eq!(disk_file_name("/tmp/x.png"), "-tmp-x.png");
        assert_eq!(disk_file_name("a\\b:c?.jpg"), "a-b-c-.jpg");
        assert_eq!(disk_file_name(".."), "-..");
        assert_eq!(disk_file_name(""), "-");
        assert_eq!(disk_file_name("launch-post.png"), "launch-post.png");
    }

    #[test]
    fn test_png_signature() {
        let bytes = encode_png(&solid(3, 2)).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn test_jpeg_signature() {
        let bytes = encode_jpeg(&solid(8, 8), 90).unwrap();
        assert_eq!(&bytes[..2], &[0xff, 0xd8]);
    }

    #[test]
    fn test_data_url_round_trip() {
        let url = data_url("image/png", b"abc");
        assert_eq!(url, "data:image/png;base64,YWJj");
        assert_eq!(decode_data_url(&url), Some(("image/png".to_string(), b"abc".to_vec())));
        assert_eq!(decode_data_url("https://example.com/a.png"), None);
    }

    #[test]
    fn test_bundle_fields() {
        let downloads = bundle_downloads(&solid(4, 3), "Spring Sale", 90).unwrap();
        assert_eq!(downloads.png.filename, "spring-sale.png");
        assert_eq!(downloads.png.size, "4×3");
        assert_eq!(downloads.png.quality, PngQuality::High);
        assert_eq!(downloads.jpg.filename, "spring-sale.jpg");
        assert_eq!(downloads.jpg.size, "4×3");
        assert!(downloads.jpg.url.starts_with("data:image/jpeg;base64,"));
        assert_eq!(downloads.svg.filename, "spring-sale.svg");
        assert!(downloads.svg.editable);
        assert!(downloads.pdf.print_ready);
        assert_eq!(downloads.pdf.filename, "spring-sale.pdf");
    }

    #[test]
    fn test_pdf_is_png_placeholder() {
        let downloads = bundle_downloads(&solid(4, 3), "x", 90).unwrap();
        assert_eq!(downloads.pdf.url, downloads.png.url);
    }

    #[test]
    fn test_svg_embeds_png() {
        let downloads = bundle_downloads(&solid(4, 3), "x", 90).unwrap();
        let (mime, bytes) = decode_data_url(&downloads.svg.url).unwrap();
        assert_eq!(mime, "image/svg+xml");
        let svg = String::from_utf8(bytes).unwrap();
        assert!(svg.starts_with(r#"<svg width="4" height="3""#));
        assert!(svg.contains(&downloads.png.url));
    }

    #[test]
    fn test_json_field_names() {
        let downloads = bundle_downloads(&solid(2, 2), "x", 90).unwrap();
        let json = serde_json::to_value(&downloads).unwrap();
        assert_eq!(json["png"]["quality"], "high");
        assert_eq!(json["pdf"]["printReady"], true);
        assert_eq!(json["svg"]["editable"], true);
        assert!(json["jpg"].get("quality").is_none());
    }
}
