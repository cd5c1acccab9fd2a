use image::RgbaImage;

use crate::error::AppError;
use crate::models::capture::Region;

/// Crops `region` out of the rendered page buffer. The output has exactly
/// `region.width x region.height` pixels. Regions extending past the source
/// are rejected rather than silently clamped.
pub fn extract(source: &RgbaImage, region: &Region) -> Result<RgbaImage, AppError> {
    let (source_width, source_height) = source.dimensions();
    if !region.fits_within(source_width, source_height) {
        return Err(AppError::OutOfBounds {
            x: region.x,
            y: region.y,
            width: region.width,
            height: region.height,
            source_width,
            source_height,
        });
    }

    Ok(image::imageops::crop_imm(source, region.x, region.y, region.width, region.height)
        .to_image())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient_page(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 0, 255])
        })
    }

    #[test]
    fn crop_has_exact_region_dimensions() {
        let page = gradient_page(200, 120);
        let region = Region {
            x: 10,
            y: 10,
            width: 100,
            height: 30,
        };
        let crop = extract(&page, &region).unwrap();
        assert_eq!(crop.dimensions(), (100, 30));
    }

    #[test]
    fn crop_pixels_come_from_region_origin() {
        let page = gradient_page(64, 64);
        let region = Region {
            x: 20,
            y: 12,
            width: 16,
            height: 16,
        };
        let crop = extract(&page, &region).unwrap();
        assert_eq!(crop.get_pixel(0, 0), page.get_pixel(20, 12));
        assert_eq!(crop.get_pixel(15, 15), page.get_pixel(35, 27));
    }

    #[test]
    fn region_past_right_edge_is_rejected() {
        let page = gradient_page(100, 100);
        let region = Region {
            x: 95,
            y: 0,
            width: 10,
            height: 10,
        };
        let err = extract(&page, &region).unwrap_err();
        assert!(matches!(err, AppError::OutOfBounds { .. }));
    }

    #[test]
    fn region_past_bottom_edge_is_rejected() {
        let page = gradient_page(100, 100);
        let region = Region {
            x: 0,
            y: 95,
            width: 10,
            height: 10,
        };
        assert!(extract(&page, &region).is_err());
    }

    #[test]
    fn region_filling_whole_page_is_accepted() {
        let page = gradient_page(100, 100);
        let region = Region {
            x: 0,
            y: 0,
            width: 100,
            height: 100,
        };
        let crop = extract(&page, &region).unwrap();
        assert_eq!(crop.dimensions(), (100, 100));
    }
}
