use image::{ImageFormat, Rgb as Pixel, RgbImage};
use minemap_common::types::SECTOR_SIZE;
use minemap_common::{MapperError, Result, Rgb, SectorCoord};
use std::path::Path;

/// Sector range covered by the image, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapBounds {
    pub minx: i32,
    pub maxx: i32,
    pub minz: i32,
    pub maxz: i32,
}

impl MapBounds {
    pub fn from_sectors(sectors: &[SectorCoord]) -> Option<Self> {
        let first = sectors.first()?;
        let mut bounds = Self {
            minx: first.x as i32,
            maxx: first.x as i32,
            minz: first.z as i32,
            maxz: first.z as i32,
        };
        for sector in &sectors[1..] {
            bounds.minx = bounds.minx.min(sector.x as i32);
            bounds.maxx = bounds.maxx.max(sector.x as i32);
            bounds.minz = bounds.minz.min(sector.z as i32);
            bounds.maxz = bounds.maxz.max(sector.z as i32);
        }
        Some(bounds)
    }

    /// Map width in nodes, without border.
    pub fn width(&self) -> u32 {
        ((self.maxx - self.minx) * SECTOR_SIZE + SECTOR_SIZE) as u32
    }

    pub fn height(&self) -> u32 {
        ((self.maxz - self.minz) * SECTOR_SIZE + SECTOR_SIZE) as u32
    }
}

/// The output image. North is up, so world z grows towards the top row.
/// A border on the left and top edge leaves room for the scale.
pub struct Canvas {
    image: RgbImage,
    bounds: MapBounds,
    border: u32,
}

impl Canvas {
    pub fn new(bounds: MapBounds, border: u32, background: Rgb) -> Self {
        let image = RgbImage::from_pixel(
            bounds.width() + border,
            bounds.height() + border,
            to_pixel(background),
        );
        Self {
            image,
            bounds,
            border,
        }
    }

    pub fn bounds(&self) -> MapBounds {
        self.bounds
    }

    pub fn border(&self) -> u32 {
        self.border
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Image position of world node (x, z). May fall outside the image.
    pub fn node_pixel(&self, x: i32, z: i32) -> (i64, i64) {
        let border = self.border as i64;
        let h = self.bounds.height() as i64;
        let px = x as i64 - self.bounds.minx as i64 * SECTOR_SIZE as i64 + border;
        let py = h - 1 - (z as i64 - self.bounds.minz as i64 * SECTOR_SIZE as i64) + border;
        (px, py)
    }

    /// Colours world node (x, z).
    pub fn put(&mut self, x: i32, z: i32, color: Rgb) {
        let (px, py) = self.node_pixel(x, z);
        self.set_pixel(px, py, color);
    }

    /// Sets an image pixel, ignoring positions outside the image.
    pub fn set_pixel(&mut self, px: i64, py: i64, color: Rgb) {
        if px < 0 || py < 0 || px >= self.width() as i64 || py >= self.height() as i64 {
            return;
        }
        self.image.put_pixel(px as u32, py as u32, to_pixel(color));
    }

    pub fn pixel(&self, px: u32, py: u32) -> Option<Rgb> {
        if px >= self.width() || py >= self.height() {
            return None;
        }
        let Pixel([r, g, b]) = *self.image.get_pixel(px, py);
        Some(Rgb::new(r, g, b))
    }

    pub fn pixel_of(&self, x: i32, z: i32) -> Option<Rgb> {
        let (px, py) = self.node_pixel(x, z);
        if px < 0 || py < 0 {
            return None;
        }
        self.pixel(px as u32, py as u32)
    }

    /// Writes the image as PNG, whatever the file extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|err| MapperError::OutputError(format!("{}: {}", path.display(), err)))
    }
}

fn to_pixel(color: Rgb) -> Pixel<u8> {
    Pixel([color.r, color.g, color.b])
}
