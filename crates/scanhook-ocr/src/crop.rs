use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, GenericImageView, ImageFormat};
use scanhook_types::CaptureRegion;

use crate::error::{OcrError, Result};

/// Cut `region` out of the image at `path` and encode it as PNG
pub fn crop_region(path: &Path, region: CaptureRegion) -> Result<Vec<u8>> {
    let image = image::open(path)?;
    let cropped = crop_image(&image, region)?;
    encode_png(&cropped)
}

pub fn crop_image(image: &DynamicImage, region: CaptureRegion) -> Result<DynamicImage> {
    if region.is_empty() {
        return Err(OcrError::EmptyRegion(region));
    }

    let (width, height) = image.dimensions();
    if !region.fits_within(width, height) {
        return Err(OcrError::RegionOutOfBounds {
            region,
            width,
            height,
        });
    }

    Ok(image.crop_imm(region.x, region.y, region.width, region.height))
}

fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}
