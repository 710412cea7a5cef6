/// PNG encoding of finished bitmaps

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::rendering::Rendered;
use crate::Result;

pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

/// Encode a bitmap into a `Rendered` artwork.
pub fn rasterize(img: &RgbaImage) -> Result<Rendered> {
    Ok(Rendered {
        width: img.width(),
        height: img.height(),
        png_data: encode_png(img)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rasterize_produces_png_of_same_size() {
        let img = RgbaImage::from_pixel(128, 64, image::Rgba([10, 20, 30, 255]));
        let r = rasterize(&img).unwrap();
        assert_eq!(r.width, 128);
        assert_eq!(r.height, 64);
        assert_eq!(&r.png_data[0..8], b"\x89PNG\r\n\x1a\n");
    }
}
