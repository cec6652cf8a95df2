// Collision masks: image-sized pixel arrays defining a silhouette

use super::CollisionError;
use crate::core::{Rect, Size};

/// One mask pixel. Layout matches RGBA8 image data.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Any non-zero alpha counts as solid
    pub fn is_opaque(&self) -> bool {
        self.a != 0
    }
}

/// Row-major pixel data whose length always equals `size.area()`
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    size: Size,
    pixels: Vec<Rgba>,
}

impl Mask {
    /// Create a mask, validating the pixel count against the size
    pub fn new(size: Size, pixels: Vec<Rgba>) -> Result<Self, CollisionError> {
        if pixels.len() != size.area() {
            return Err(CollisionError::MaskSizeMismatch {
                len: pixels.len(),
                size,
            });
        }
        Ok(Self { size, pixels })
    }

    /// Mask where every pixel has the same color
    pub fn filled(size: Size, color: Rgba) -> Self {
        Self {
            size,
            pixels: vec![color; size.area()],
        }
    }

    /// Reinterpret raw RGBA8 bytes as a mask
    pub fn from_rgba_bytes(size: Size, bytes: &[u8]) -> Result<Self, CollisionError> {
        let pixels: &[Rgba] =
            bytemuck::try_cast_slice(bytes).map_err(|_| CollisionError::MaskSizeMismatch {
                len: bytes.len() / 4,
                size,
            })?;
        Self::new(size, pixels.to_vec())
    }

    /// Build a mask from an already decoded image
    pub fn from_image(image: &image::RgbaImage) -> Self {
        let size = Size::new(image.width(), image.height());
        let pixels = bytemuck::cast_slice::<u8, Rgba>(image.as_raw()).to_vec();
        Self { size, pixels }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Pixel at column `x`, row `y`
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.pixels
            .get(x as usize + y as usize * self.size.width as usize)
            .copied()
    }

    /// Overwrite the pixel at column `x`, row `y`. Out-of-range writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        if x < self.size.width && y < self.size.height {
            let index = x as usize + y as usize * self.size.width as usize;
            self.pixels[index] = color;
        }
    }

    /// Whether any pixel is solid
    pub fn any_opaque(&self) -> bool {
        self.pixels.iter().any(Rgba::is_opaque)
    }

    /// Copy out the pixels covered by `region`, row-major
    pub fn extract(&self, region: Rect) -> Result<Vec<Rgba>, CollisionError> {
        if !region.fits_in(self.size) {
            return Err(CollisionError::RegionOutOfBounds {
                region,
                size: self.size,
            });
        }

        let stride = self.size.width as usize;
        let left = region.x as usize;
        let right = left + region.width as usize;
        let mut extracted = Vec::with_capacity(region.width as usize * region.height as usize);
        for row in region.top()..region.bottom() {
            let start = row as usize * stride;
            extracted.extend_from_slice(&self.pixels[start + left..start + right]);
        }
        Ok(extracted)
    }

    /// Sub-mask covering `region`
    pub fn sub_mask(&self, region: Rect) -> Result<Mask, CollisionError> {
        let pixels = self.extract(region)?;
        Mask::new(
            Size::new(region.width as u32, region.height as u32),
            pixels,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_mask(size: Size) -> Mask {
        let pixels = (0..size.area())
            .map(|i| Rgba::new(i as u8, 0, 0, 255))
            .collect();
        Mask::new(size, pixels).unwrap()
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        let err = Mask::new(Size::new(3, 3), vec![Rgba::WHITE; 8]).unwrap_err();
        assert_eq!(
            err,
            CollisionError::MaskSizeMismatch {
                len: 8,
                size: Size::new(3, 3)
            }
        );
    }

    #[test]
    fn test_extract_region() {
        let mask = numbered_mask(Size::new(4, 3));
        let pixels = mask.extract(Rect::new(1, 1, 2, 2)).unwrap();
        let reds: Vec<u8> = pixels.iter().map(|p| p.r).collect();
        assert_eq!(reds, vec![5, 6, 9, 10]);
    }

    #[test]
    fn test_extract_whole_mask() {
        let mask = numbered_mask(Size::new(4, 3));
        let pixels = mask.extract(Rect::new(0, 0, 4, 3)).unwrap();
        assert_eq!(pixels, mask.pixels());
    }

    #[test]
    fn test_extract_out_of_bounds() {
        let mask = numbered_mask(Size::new(4, 3));
        assert!(matches!(
            mask.extract(Rect::new(3, 0, 2, 1)),
            Err(CollisionError::RegionOutOfBounds { .. })
        ));
        assert!(matches!(
            mask.extract(Rect::new(0, -1, 1, 1)),
            Err(CollisionError::RegionOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_from_rgba_bytes() {
        let bytes = [1, 2, 3, 4, 5, 6, 7, 0];
        let mask = Mask::from_rgba_bytes(Size::new(2, 1), &bytes).unwrap();
        assert_eq!(mask.get(0, 0), Some(Rgba::new(1, 2, 3, 4)));
        assert!(!mask.get(1, 0).unwrap().is_opaque());

        assert!(Mask::from_rgba_bytes(Size::new(2, 1), &bytes[..7]).is_err());
        assert!(Mask::from_rgba_bytes(Size::new(3, 1), &bytes).is_err());
    }

    #[test]
    fn test_from_image() {
        let mut image = image::RgbaImage::new(3, 2);
        image.put_pixel(2, 1, image::Rgba([10, 20, 30, 255]));
        let mask = Mask::from_image(&image);
        assert_eq!(mask.size(), Size::new(3, 2));
        assert_eq!(mask.get(2, 1), Some(Rgba::rgb(10, 20, 30)));
        assert_eq!(mask.get(0, 0), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_set_and_any_opaque() {
        let mut mask = Mask::filled(Size::new(2, 2), Rgba::TRANSPARENT);
        assert!(!mask.any_opaque());
        mask.set(1, 1, Rgba::WHITE);
        assert!(mask.any_opaque());
        mask.set(5, 5, Rgba::WHITE);
        assert_eq!(mask.get(5, 5), None);
    }
}
