//! Raster images: a solid background with random rectangles and circles.
//!
//! Icons are square and capped at 256 pixels, the largest size an ICO
//! directory entry can describe.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use pandora_core::BodyKind;

use super::BuildError;
use crate::faker::Faker;

pub(super) fn render(fake: &mut Faker, extension: &str) -> Result<Vec<u8>, BuildError> {
    let format = match extension {
        "jpg" | "jpeg" => ImageFormat::Jpeg,
        "gif" => ImageFormat::Gif,
        "ico" => ImageFormat::Ico,
        _ => ImageFormat::Png,
    };
    let (width, height) = match format {
        ImageFormat::Ico => {
            let side = [16, 32, 48, 64, 128, 256][fake.range(0, 5)];
            (side, side)
        }
        // GIF quantisation is slow; keep those small.
        ImageFormat::Gif => (fake.range(96, 320) as u32, fake.range(96, 320) as u32),
        _ => (fake.range(200, 640) as u32, fake.range(200, 640) as u32),
    };

    let mut img = RgbImage::from_pixel(width, height, Rgb(fake.rgb()));
    for _ in 0..fake.range(5, 15) {
        let color = Rgb(fake.rgb());
        let x = fake.range(0, width as usize - 1) as u32;
        let y = fake.range(0, height as usize - 1) as u32;
        if fake.chance(50) {
            let r = fake.range(10, 100) as u32;
            fill_circle(&mut img, x, y, r, color);
        } else {
            let x2 = fake.range(x as usize + 1, width as usize) as u32;
            let y2 = fake.range(y as usize + 1, height as usize) as u32;
            fill_rect(&mut img, x, y, x2, y2, color);
        }
    }

    let image = match format {
        ImageFormat::Ico => DynamicImage::ImageRgba8(DynamicImage::ImageRgb8(img).to_rgba8()),
        _ => DynamicImage::ImageRgb8(img),
    };
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), format)
        .map_err(|e| BuildError::Encode {
            kind: BodyKind::Image,
            message: e.to_string(),
        })?;
    Ok(buf)
}

fn fill_rect(img: &mut RgbImage, x1: u32, y1: u32, x2: u32, y2: u32, color: Rgb<u8>) {
    for y in y1..y2.min(img.height()) {
        for x in x1..x2.min(img.width()) {
            img.put_pixel(x, y, color);
        }
    }
}

fn fill_circle(img: &mut RgbImage, cx: u32, cy: u32, r: u32, color: Rgb<u8>) {
    let r2 = (r * r) as i64;
    let x0 = cx.saturating_sub(r);
    let y0 = cy.saturating_sub(r);
    let x1 = (cx + r).min(img.width().saturating_sub(1));
    let y1 = (cy + r).min(img.height().saturating_sub(1));
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as i64 - cx as i64;
            let dy = y as i64 - cy as i64;
            if dx * dx + dy * dy <= r2 {
                img.put_pixel(x, y, color);
            }
        }
    }
}
