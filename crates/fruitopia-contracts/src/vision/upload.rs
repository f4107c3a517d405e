use std::path::Path;

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// An image file ready to be submitted for classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("failed reading {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("upload")
            .to_string();
        Self::from_bytes(file_name, bytes)
    }

    /// Sniffs the content; anything that is not a recognizable image is refused.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let Ok(format) = image::guess_format(&bytes) else {
            bail!("Please upload an image file (jpg, png, jpeg)");
        };
        Ok(Self {
            file_name: file_name.into(),
            mime_type: format.to_mime_type().to_string(),
            bytes,
        })
    }

    pub fn preview_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, BASE64.encode(&self.bytes))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, Rgb, RgbImage};

    use super::ImageUpload;

    fn png_bytes() -> anyhow::Result<Vec<u8>> {
        let mut image = RgbImage::new(2, 2);
        for pixel in image.pixels_mut() {
            *pixel = Rgb([250, 180, 20]);
        }
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }

    #[test]
    fn upload_from_path_sniffs_mime_type() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("mango.png");
        std::fs::write(&path, png_bytes()?)?;

        let upload = ImageUpload::from_path(&path)?;
        assert_eq!(upload.file_name, "mango.png");
        assert_eq!(upload.mime_type, "image/png");
        assert!(upload.preview_data_url().starts_with("data:image/png;base64,"));
        Ok(())
    }

    #[test]
    fn non_image_content_is_refused() {
        let err = ImageUpload::from_bytes("notes.txt", b"just some text".to_vec())
            .err()
            .map(|err| err.to_string());
        assert_eq!(
            err.as_deref(),
            Some("Please upload an image file (jpg, png, jpeg)")
        );
    }
}
