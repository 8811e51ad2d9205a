//! Encodings of block positions used by the storage layouts.
//!
//! Directory layouts name sectors and blocks with fixed-width lowercase hex,
//! negative values wrapping around the field width. The SQLite layout packs a
//! whole block position into one integer key.

const AXIS_RANGE: i64 = 4096;
const AXIS_MAX_POSITIVE: i64 = 2048;

fn is_hex(h: &str, width: usize) -> bool {
    h.len() == width && h.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Parses a 3-digit hex field; values above 2047 are negative.
pub fn hex3_to_int(h: &str) -> Option<i16> {
    if !is_hex(h, 3) {
        return None;
    }
    let i = i16::from_str_radix(h, 16).ok()?;
    Some(if i > 2047 { i - 4096 } else { i })
}

/// Parses a 4-digit hex field; values above 32767 are negative.
pub fn hex4_to_int(h: &str) -> Option<i16> {
    if !is_hex(h, 4) {
        return None;
    }
    u16::from_str_radix(h, 16).ok().map(|i| i as i16)
}

pub fn int_to_hex3(i: i16) -> String {
    format!("{:03x}", (i as i32).rem_euclid(AXIS_RANGE as i32))
}

pub fn int_to_hex4(i: i16) -> String {
    format!("{:04x}", i as u16)
}

/// Packs a block position into the integer key of the `blocks` table.
pub fn pack_position(x: i16, y: i16, z: i16) -> i64 {
    z as i64 * AXIS_RANGE * AXIS_RANGE + y as i64 * AXIS_RANGE + x as i64
}

fn unsigned_to_signed(i: i64, max_positive: i64) -> i64 {
    if i < max_positive {
        i
    } else {
        i - 2 * max_positive
    }
}

/// Inverse of [`pack_position`] for axes in [-2048, 2047].
pub fn unpack_position(mut i: i64) -> (i16, i16, i16) {
    let x = unsigned_to_signed(i.rem_euclid(AXIS_RANGE), AXIS_MAX_POSITIVE);
    i = (i - x) / AXIS_RANGE;
    let y = unsigned_to_signed(i.rem_euclid(AXIS_RANGE), AXIS_MAX_POSITIVE);
    i = (i - y) / AXIS_RANGE;
    let z = unsigned_to_signed(i.rem_euclid(AXIS_RANGE), AXIS_MAX_POSITIVE);
    (x as i16, y as i16, z as i16)
}
