/// Canonical numeric material identifier of a node.
pub type ContentId = u16;

/// Palette key holding the colour used for water surfaces.
pub const CONTENT_WATER: ContentId = 2;

const AIR_CONTENT: [ContentId; 3] = [126, 127, 254];
const WATER_CONTENT: [ContentId; 2] = [2, 9];

pub fn content_is_air(content: ContentId) -> bool {
    AIR_CONTENT.contains(&content)
}

pub fn content_is_water(content: ContentId) -> bool {
    WATER_CONTENT.contains(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels() {
        for id in [126, 127, 254] {
            assert!(content_is_air(id));
            assert!(!content_is_water(id));
        }
        for id in [2, 9] {
            assert!(content_is_water(id));
            assert!(!content_is_air(id));
        }
        assert!(!content_is_air(0x800));
        assert!(!content_is_water(0x800));
    }
}
