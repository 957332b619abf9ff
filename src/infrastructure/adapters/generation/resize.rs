//! 把生成服务返回的图片规整为指定尺寸的 PNG

use image::imageops::FilterType;
use image::{load_from_memory, DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

use crate::application::ports::GenerationError;

/// 解码任意受支持格式的图片，缩放到 width x height 后编码为 PNG
pub fn fit_exact(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, GenerationError> {
    let picture = load_from_memory(data)
        .map_err(|e| GenerationError::ImageProcessing(format!("Decode failed: {}", e)))?;

    let picture = if picture.dimensions() == (width, height) {
        picture
    } else {
        picture.resize_exact(width, height, FilterType::Lanczos3)
    };

    encode_png(&picture)
}

pub(crate) fn encode_png(picture: &DynamicImage) -> Result<Vec<u8>, GenerationError> {
    let mut out = Cursor::new(Vec::new());
    picture
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| GenerationError::ImageProcessing(format!("Encode failed: {}", e)))?;
    Ok(out.into_inner())
}
