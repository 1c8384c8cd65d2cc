//! Image loading for the scene textures.
//!
//! Images are decoded to tightly packed RGBA8 and handed to the renderer by
//! texture slot, never by raw file path.
//!
//! # Layout
//! All six images live flat in one asset directory under the names given by
//! [`TextureSlot::file_name`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tilemaze_common::TextureSlot;

/// Which image row comes first in [`ImageData::rgba`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// First row is the top of the picture (as stored in the file).
    UpperLeft,
    /// First row is the bottom of the picture, so texture coordinate
    /// (0,0) samples the bottom-left corner.
    LowerLeft,
}

/// Decoded RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` bytes, row-major.
    pub rgba: Vec<u8>,
}

impl ImageData {
    /// Bytes per row of pixel data.
    pub fn row_bytes(&self) -> u32 {
        self.width * 4
    }
}

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to load image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("image {path} has zero size")]
    EmptyImage { path: PathBuf },
}

/// Load a PNG (or any format the `image` build supports) as RGBA8.
pub fn load_image(path: impl AsRef<Path>, origin: Origin) -> Result<ImageData, AssetError> {
    let path = path.as_ref();
    let mut img = image::open(path)
        .map_err(|source| AssetError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(AssetError::EmptyImage {
            path: path.to_path_buf(),
        });
    }
    if origin == Origin::LowerLeft {
        image::imageops::flip_vertical_in_place(&mut img);
    }
    tracing::debug!(path = %path.display(), width, height, "loaded image");
    Ok(ImageData {
        width,
        height,
        rgba: img.into_raw(),
    })
}

/// The full set of scene textures, one image per [`TextureSlot`].
#[derive(Debug, Clone)]
pub struct TextureImages {
    images: BTreeMap<TextureSlot, ImageData>,
}

impl TextureImages {
    /// Load every slot's image from `dir` with a lower-left origin. Any
    /// missing or undecodable file fails the whole set.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, AssetError> {
        let dir = dir.as_ref();
        let mut images = BTreeMap::new();
        for slot in TextureSlot::ALL {
            let image = load_image(dir.join(slot.file_name()), Origin::LowerLeft)?;
            images.insert(slot, image);
        }
        tracing::info!(dir = %dir.display(), count = images.len(), "loaded scene textures");
        Ok(Self { images })
    }

    /// Every slot is populated by construction.
    pub fn get(&self, slot: TextureSlot) -> &ImageData {
        &self.images[&slot]
    }

    /// Images in draw order.
    pub fn iter(&self) -> impl Iterator<Item = (TextureSlot, &ImageData)> {
        self.images.iter().map(|(slot, image)| (*slot, image))
    }
}
