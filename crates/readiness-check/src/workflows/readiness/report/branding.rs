use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Decoded brand logo, carried both as the original encoded bytes and as packed RGB.
pub struct BrandLogo {
    mime: String,
    encoded: Vec<u8>,
    width: u32,
    height: u32,
    rgb: Vec<u8>,
}

impl BrandLogo {
    pub fn from_bytes(encoded: Vec<u8>, mime: impl Into<String>) -> Result<Self, AssetError> {
        let decoded = image::load_from_memory(&encoded)?.to_rgb8();
        let (width, height) = decoded.dimensions();
        Ok(Self {
            mime: mime.into(),
            encoded,
            width,
            height,
            rgb: decoded.into_raw(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let encoded = std::fs::read(path)?;
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        Self::from_bytes(encoded, mime.essence_str())
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgb(&self) -> &[u8] {
        &self.rgb
    }
}

impl fmt::Debug for BrandLogo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrandLogo")
            .field("mime", &self.mime)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read logo: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode logo: {0}")]
    Decode(#[from] image::ImageError),
}

/// Branding applied to every rendered report.
#[derive(Debug, Clone, Default)]
pub struct Branding {
    logo: Option<Arc<BrandLogo>>,
}

impl Branding {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_logo(logo: BrandLogo) -> Self {
        Self {
            logo: Some(Arc::new(logo)),
        }
    }

    /// Reports render without a logo when the asset is missing or unreadable.
    pub fn from_logo_path(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::none();
        };

        match BrandLogo::load(path) {
            Ok(logo) => Self::with_logo(logo),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "brand logo unavailable");
                Self::none()
            }
        }
    }

    pub fn logo(&self) -> Option<&Arc<BrandLogo>> {
        self.logo.as_ref()
    }
}

#[cfg(test)]
pub(crate) fn sample_png() -> Vec<u8> {
    use std::io::Cursor;

    let image = image::RgbImage::from_pixel(3, 2, image::Rgb([0, 86, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .expect("encode png");
    bytes
}
