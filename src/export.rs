//! PNG export of a generated layout.

use crate::constants::{COLOR_BACKGROUND, COLOR_OUTLINE};
use crate::draw::DrawEvent;
use crate::leaf::BspTree;
use glam::Vec3;
use image::{ImageBuffer, Rgb, RgbImage};
use std::path::Path;

fn to_rgb(color: Vec3) -> Rgb<u8> {
    Rgb([
        (color.x * 255.0) as u8,
        (color.y * 255.0) as u8,
        (color.z * 255.0) as u8,
    ])
}

fn fill_block(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    for py in y0..y1.min(img.height()) {
        for px in x0..x1.min(img.width()) {
            img.put_pixel(px, py, color);
        }
    }
}

fn draw_border(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    for px in x0..x1.min(img.width()) {
        img.put_pixel(px, y0, color);
        img.put_pixel(px, y1 - 1, color);
    }
    for py in y0..y1.min(img.height()) {
        img.put_pixel(x0, py, color);
        img.put_pixel(x1 - 1, py, color);
    }
}

/// Rasterize a generated layout at `cell_px` pixels per cell: draw events
/// over the background, then partition outlines on top.
pub fn rasterize(tree: &BspTree, events: &[DrawEvent], cell_px: u32) -> RgbImage {
    let config = tree.config();
    let width_px = config.width as u32 * cell_px;
    let height_px = config.height as u32 * cell_px;

    let mut img = ImageBuffer::from_pixel(width_px, height_px, to_rgb(COLOR_BACKGROUND));

    for event in events {
        let x0 = event.rect.x as u32 * cell_px;
        let y0 = event.rect.y as u32 * cell_px;
        let x1 = event.rect.right() as u32 * cell_px;
        let y1 = event.rect.bottom() as u32 * cell_px;

        if event.filled {
            fill_block(&mut img, x0, y0, x1, y1, to_rgb(event.color));
        } else {
            draw_border(&mut img, x0, y0, x1, y1, to_rgb(event.color));
        }
    }

    for node in tree.nodes() {
        let x0 = node.bounds.x as u32 * cell_px;
        let y0 = node.bounds.y as u32 * cell_px;
        let x1 = node.bounds.right() as u32 * cell_px;
        let y1 = node.bounds.bottom() as u32 * cell_px;
        draw_border(&mut img, x0, y0, x1, y1, to_rgb(COLOR_OUTLINE));
    }

    img
}

/// Rasterize and save the layout as a PNG.
pub fn export_png(
    path: &Path,
    tree: &BspTree,
    events: &[DrawEvent],
    cell_px: u32,
) -> Result<(), image::ImageError> {
    let img = rasterize(tree, events, cell_px);
    img.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TreeBuilder;
    use crate::config::DungeonConfig;
    use crate::draw::DrawQueue;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_rasterized_cells_match_events() {
        let config = DungeonConfig::new(40, 30);
        let builder = TreeBuilder::new(config).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut queue = DrawQueue::new();
        let tree = builder.build(&mut rng, &mut queue);
        let events: Vec<DrawEvent> = queue.drain().collect();

        let cell_px = 4;
        let img = rasterize(&tree, &events, cell_px);
        assert_eq!(img.width(), 40 * cell_px);
        assert_eq!(img.height(), 30 * cell_px);

        // Outline lines land on pixel rows/columns congruent to 0 or
        // cell_px-1, so probing at +1 inside a cell never hits one.
        for y in 0..config.height {
            for x in 0..config.width {
                let covered = events
                    .iter()
                    .any(|event| event.filled && event.rect.contains(x, y));
                let px = x as u32 * cell_px + 1;
                let py = y as u32 * cell_px + 1;
                let expected = if covered {
                    Rgb([255, 255, 255])
                } else {
                    Rgb([0, 0, 0])
                };
                assert_eq!(*img.get_pixel(px, py), expected, "cell ({x}, {y})");
            }
        }

        // The root outline covers the image corner
        assert_eq!(*img.get_pixel(0, 0), Rgb([127, 127, 127]));
    }
}
