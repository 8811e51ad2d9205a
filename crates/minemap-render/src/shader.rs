use crate::columns::{ColumnRecord, WorldColumns};
use crate::palette::Palette;
use minemap_common::content::content_is_water;
use minemap_common::Rgb;

/// Height difference to brightness factor.
const SLOPE_FACTOR: i32 = 12;
/// Brightest a slope may make a node.
const MAX_HIGHLIGHT: i32 = 36;
/// Darkening applied to columns that do not see daylight.
const UNLIT_DARKENING: i32 = -69;

const WATER_SURFACE_WEIGHT: f64 = 0.85;

/// Turns column records into pixel colours.
pub struct HeightShader<'a> {
    palette: &'a Palette,
    draw_underground: bool,
}

impl<'a> HeightShader<'a> {
    pub fn new(palette: &'a Palette, draw_underground: bool) -> Self {
        Self {
            palette,
            draw_underground,
        }
    }

    /// Colour of the column at world (x, z), or `None` if it is not drawn.
    pub fn shade(&self, columns: &WorldColumns, x: i32, z: i32) -> Option<Rgb> {
        let record = columns.get(x, z)?;
        let water = self.palette.water();

        let mut color = if content_is_water(record.content) {
            water?
        } else {
            self.palette.get(record.content)?
        };

        if !record.day_night_differs && !self.draw_underground {
            if record.water_depth == 0 {
                return None;
            }
            color = water?;
        }

        // Only the west and north neighbours light a slope
        let west = columns.get(x - 1, z);
        let north = columns.get(x, z + 1);
        let delta = slope_delta(record, west, north);
        color = Rgb::new(
            brighten(color.r, delta),
            brighten(color.g, delta),
            brighten(color.b, delta),
        );

        if record.water_depth > 0 {
            let water = water?;
            color = Rgb::new(
                blend(color.r, water.r),
                blend(color.g, water.g),
                blend(color.b, water.b),
            );
        }

        Some(color)
    }

    /// Every drawn column with its colour, in (x, z) order.
    pub fn render(&self, columns: &WorldColumns) -> Vec<(i32, i32, Rgb)> {
        columns
            .sorted_keys()
            .into_iter()
            .filter_map(|(x, z)| self.shade(columns, x, z).map(|color| (x, z, color)))
            .collect()
    }
}

/// Brightness change from comparing a column with two neighbours. A missing
/// or unlit neighbour counts as level with the column.
pub fn slope_delta(
    record: &ColumnRecord,
    west: Option<&ColumnRecord>,
    north: Option<&ColumnRecord>,
) -> i32 {
    if !record.day_night_differs {
        return UNLIT_DARKENING;
    }
    let touches_water = content_is_water(record.content)
        || west.is_some_and(|r| content_is_water(r.content))
        || north.is_some_and(|r| content_is_water(r.content));
    if touches_water {
        return 0;
    }

    let neighbour_height = |neighbour: Option<&ColumnRecord>| match neighbour {
        Some(n) if n.day_night_differs => n.height,
        _ => record.height,
    };
    let delta = ((record.height - neighbour_height(west))
        + (record.height - neighbour_height(north)))
        * SLOPE_FACTOR;
    delta.min(MAX_HIGHLIGHT)
}

fn brighten(channel: u8, delta: i32) -> u8 {
    (channel as i32 + delta).clamp(0, 255) as u8
}

// Rounded to nearest so that (200, 200, 200) under water (0, 0, 255) gives
// (30, 30, 247); plain truncation would give (30, 30, 246).
fn blend(channel: u8, water: u8) -> u8 {
    let mixed = channel as f64 * (1.0 - WATER_SURFACE_WEIGHT) + water as f64 * WATER_SURFACE_WEIGHT;
    mixed.round().clamp(0.0, 255.0) as u8
}
