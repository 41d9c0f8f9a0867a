//! Images (`<library_images>/<image>`).

use super::Item;

/// Where the pixels of an image come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// URI of an external image file (`<init_from>`).
    InitFrom(String),
    /// Embedded bytes (`<data>`, hex encoded in the document).
    Data(Vec<u8>),
}

/// Decoded `<image>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Image {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Pixel format hint.
    pub format: Option<String>,
    /// Width in pixels, 0 if not given.
    pub width: u32,
    /// Height in pixels, 0 if not given.
    pub height: u32,
    /// Depth in pixels, 0 if not given.
    pub depth: u32,
    pub source: Option<ImageSource>,
}

impl Image {
    /// URI of the image file, if the image is not embedded.
    pub fn uri(&self) -> Option<&str> {
        match &self.source {
            Some(ImageSource::InitFrom(uri)) => Some(uri),
            _ => None,
        }
    }

    /// Embedded bytes, if any.
    pub fn data(&self) -> Option<&[u8]> {
        match &self.source {
            Some(ImageSource::Data(bytes)) => Some(bytes),
            _ => None,
        }
    }
}

impl Item for Image {
    const ELEMENT: &'static str = "image";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
