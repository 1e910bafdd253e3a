use crate::config::Config;
use crate::error::{QuizSheetError, Result};
use crate::pdf::reader::Page;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use lopdf::{Document as LopdfDocument, Object, Stream};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

const RAW_CONTENT_HOST: &str = "https://raw.githubusercontent.com/";

/// A raster image pulled out of a page, ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub data: Vec<u8>,
    pub extension: String,
}

impl EmbeddedImage {
    pub fn new<S: Into<String>>(data: Vec<u8>, extension: S) -> Self {
        Self {
            data,
            extension: extension.into(),
        }
    }
}

/// Turns an image XObject stream into file bytes.
///
/// JPEG and JPEG 2000 streams are kept verbatim. 8-bit gray or RGB samples,
/// raw or Flate-compressed, are re-encoded as PNG. Anything else comes back as
/// an `Err` describing why it was skipped.
pub(crate) fn decode_image_stream(
    pdf: &LopdfDocument,
    stream: &Stream,
) -> std::result::Result<EmbeddedImage, String> {
    let dict = &stream.dict;
    let filters = stream_filters(stream);

    match filters.as_slice() {
        [only] if only == "DCTDecode" => {
            return Ok(EmbeddedImage::new(stream.content.clone(), "jpg"));
        }
        [only] if only == "JPXDecode" => {
            return Ok(EmbeddedImage::new(stream.content.clone(), "jp2"));
        }
        _ => {}
    }

    let samples = match filters.as_slice() {
        [] => stream.content.clone(),
        [only] if only == "FlateDecode" => stream
            .decompressed_content()
            .map_err(|e| format!("cannot inflate image stream: {}", e))?,
        other => return Err(format!("unsupported image filter {:?}", other)),
    };

    let integer = |key: &[u8]| dict.get(key).ok().and_then(|o| o.as_i64().ok());

    let width = integer(b"Width").ok_or("missing width")?;
    let height = integer(b"Height").ok_or("missing height")?;
    let bits = integer(b"BitsPerComponent").unwrap_or(8);
    if bits != 8 {
        return Err(format!("{} bits per component", bits));
    }

    let (color_type, channels) = match color_components(pdf, dict.get(b"ColorSpace").ok()) {
        Some(1) => (ExtendedColorType::L8, 1),
        Some(3) => (ExtendedColorType::Rgb8, 3),
        Some(n) => return Err(format!("{} color components", n)),
        None => return Err("unsupported color space".to_string()),
    };

    let (width, height) = match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(format!("invalid dimensions {}x{}", width, height)),
    };

    let expected = width as usize * height as usize * channels;
    if samples.len() < expected {
        return Err(format!(
            "truncated samples: {} of {} bytes",
            samples.len(),
            expected
        ));
    }

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(&samples[..expected], width, height, color_type)
        .map_err(|e| format!("PNG encoding failed: {}", e))?;

    Ok(EmbeddedImage::new(png, "png"))
}

fn stream_filters(stream: &Stream) -> Vec<String> {
    match stream.dict.get(b"Filter") {
        Ok(Object::Name(name)) => vec![String::from_utf8_lossy(name).to_string()],
        Ok(Object::Array(names)) => names
            .iter()
            .filter_map(|o| o.as_name_str().ok())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

fn color_components(pdf: &LopdfDocument, color_space: Option<&Object>) -> Option<i64> {
    let color_space = match color_space? {
        Object::Reference(id) => pdf.get_object(*id).ok()?,
        other => other,
    };

    match color_space {
        Object::Name(name) => match name.as_slice() {
            b"DeviceGray" | b"CalGray" => Some(1),
            b"DeviceRGB" | b"CalRGB" => Some(3),
            b"DeviceCMYK" => Some(4),
            _ => None,
        },
        Object::Array(parts) => match parts.first()?.as_name_str().ok()? {
            "ICCBased" => {
                let profile = pdf.get_object(parts.get(1)?.as_reference().ok()?).ok()?;
                profile.as_stream().ok()?.dict.get(b"N").ok()?.as_i64().ok()
            }
            "CalGray" => Some(1),
            "CalRGB" => Some(3),
            _ => None,
        },
        _ => None,
    }
}

/// Writes page images into the images directory and builds the markup that
/// points at their hosted copies.
pub struct ImageExtractor {
    directory: PathBuf,
    url_segments: Vec<String>,
}

impl ImageExtractor {
    pub fn new(config: &Config, repository: &str) -> Self {
        let url_segments = repository
            .split('/')
            .chain(config.images.branch.split('/'))
            .chain(config.images.directory.split('/'))
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            directory: config.images_path(),
            url_segments,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.directory)?;
        Ok(())
    }

    /// `{stem}_p{page}_img{index}.{ext}` with 1-based page and index.
    pub fn image_name(stem: &str, page_number: u32, index: usize, extension: &str) -> String {
        format!("{}_p{}_img{}.{}", stem, page_number, index, extension)
    }

    /// Saves every image of `page`, overwriting files of the same name, and
    /// returns the file names in page order.
    pub fn save_page_images(&self, stem: &str, page: &Page) -> Result<Vec<String>> {
        let mut names = Vec::with_capacity(page.images.len());

        for (index, image) in page.images.iter().enumerate() {
            let name = Self::image_name(stem, page.number, index + 1, &image.extension);
            let path = self.directory.join(&name);

            fs::write(&path, &image.data).map_err(|e| QuizSheetError::Image {
                name: path.display().to_string(),
                message: e.to_string(),
            })?;

            names.push(name);
        }

        Ok(names)
    }

    pub fn raw_url(&self, name: &str) -> String {
        let mut url = match Url::parse(RAW_CONTENT_HOST) {
            Ok(url) => url,
            Err(_) => return format!("{}{}/{}", RAW_CONTENT_HOST, self.url_segments.join("/"), name),
        };

        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(self.url_segments.iter().map(String::as_str))
                .push(name);
        }

        url.to_string()
    }

    /// One `<img>` line per image name.
    pub fn markup(&self, names: &[String]) -> String {
        names
            .iter()
            .map(|name| format!("<img src=\"{}\">", self.raw_url(name)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
