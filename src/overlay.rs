use crate::canvas::Canvas;
use crate::font::draw_text;
use minemap_common::types::SECTOR_SIZE;
use minemap_common::Rgb;

/// Scale ticks are drawn every this many sectors.
const SCALE_STEP: i32 = 4;
const ORIGIN_RADIUS: i64 = 5;

/// Outline of a circle, midpoint algorithm.
pub fn draw_circle(canvas: &mut Canvas, cx: i64, cy: i64, radius: i64, color: Rgb) {
    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;
    while x >= y {
        for (dx, dy) in [
            (x, y),
            (y, x),
            (-y, x),
            (-x, y),
            (-x, -y),
            (-y, -x),
            (y, -x),
            (x, -y),
        ] {
            canvas.set_pixel(cx + dx, cy + dy, color);
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

pub fn draw_origin(canvas: &mut Canvas, color: Rgb) {
    let (px, py) = canvas.node_pixel(0, 0);
    draw_circle(canvas, px, py, ORIGIN_RADIUS, color);
}

/// Tick marks with node coordinates along the top border for x and the left
/// border for z. Ticks sit on multiples of four sectors inside the map.
pub fn draw_scale(canvas: &mut Canvas, color: Rgb) {
    let border = canvas.border() as i64;
    if border == 0 {
        return;
    }
    let bounds = canvas.bounds();
    let h = bounds.height() as i64;
    let step = SECTOR_SIZE as i64;

    draw_text(canvas, 24, 0, "X", color);
    draw_text(canvas, 2, 24, "Z", color);

    // first multiple of the step at or east of minx
    let mut n = -(-bounds.minx).div_euclid(SCALE_STEP) * SCALE_STEP;
    while n < bounds.maxx {
        let px = (n - bounds.minx) as i64 * step + border;
        for py in 0..border {
            canvas.set_pixel(px, py, color);
        }
        draw_text(canvas, px + 2, 0, &(n * SECTOR_SIZE).to_string(), color);
        n += SCALE_STEP;
    }

    // last multiple of the step at or south of maxz
    let mut n = bounds.maxz.div_euclid(SCALE_STEP) * SCALE_STEP;
    while n > bounds.minz {
        let py = h - 1 - (n - bounds.minz) as i64 * step + border;
        for px in 0..border {
            canvas.set_pixel(px, py, color);
        }
        draw_text(canvas, 2, py, &(n * SECTOR_SIZE).to_string(), color);
        n -= SCALE_STEP;
    }
}
