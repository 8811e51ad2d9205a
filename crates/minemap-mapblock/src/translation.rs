use minemap_common::content::ContentId;

/// Maps a content byte of a pre-20 map block to its canonical id.
///
/// Twenty-one legacy node types moved into the 0x800 range when the content
/// id space was widened; every other byte is already canonical.
pub const fn legacy_translate(raw: u8) -> ContentId {
    match raw {
        1 => 0x800,  // grass
        4 => 0x801,  // tree
        5 => 0x802,  // leaves
        6 => 0x803,  // grass_footsteps
        7 => 0x804,  // mese
        8 => 0x805,  // mud
        10 => 0x806, // cloud
        11 => 0x807, // coalstone
        12 => 0x808, // wood
        13 => 0x809, // sand
        18 => 0x80a, // cobble
        19 => 0x80b, // steel
        20 => 0x80c, // glass
        22 => 0x80d, // mossycobble
        23 => 0x80e, // gravel
        24 => 0x80f, // sandstone
        25 => 0x810, // cactus
        26 => 0x811, // brick
        27 => 0x812, // clay
        28 => 0x813, // papyrus
        29 => 0x814, // bookshelf
        other => other as ContentId,
    }
}
