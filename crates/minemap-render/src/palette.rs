use minemap_common::content::{ContentId, CONTENT_WATER};
use minemap_common::{MapperError, Result, Rgb};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Display colour of every content id the map knows how to draw.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    colors: HashMap<ContentId, Rgb>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a `colors.txt` file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|err| {
            MapperError::PaletteError(format!("{}: {}", path.display(), err))
        })?;
        Self::read(BufReader::new(file))
    }

    /// Parses lines of `<hex content id> <r> <g> <b>`. Blank lines and lines
    /// starting with `#` are ignored, as is anything after the blue value.
    pub fn read<R: BufRead>(reader: R) -> Result<Self> {
        let mut palette = Self::new();
        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (id, color) = parse_line(line).ok_or_else(|| {
                MapperError::PaletteError(format!("line {}: cannot parse {:?}", number + 1, line))
            })?;
            palette.insert(id, color);
        }
        Ok(palette)
    }

    pub fn insert(&mut self, id: ContentId, color: Rgb) {
        self.colors.insert(id, color);
    }

    pub fn get(&self, id: ContentId) -> Option<Rgb> {
        self.colors.get(&id).copied()
    }

    pub fn contains(&self, id: ContentId) -> bool {
        self.colors.contains_key(&id)
    }

    /// Colour drawn for water surfaces.
    pub fn water(&self) -> Option<Rgb> {
        self.get(CONTENT_WATER)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

fn parse_line(line: &str) -> Option<(ContentId, Rgb)> {
    let mut fields = line.split_whitespace();
    let id = ContentId::from_str_radix(fields.next()?, 16).ok()?;
    let r = fields.next()?.parse().ok()?;
    let g = fields.next()?.parse().ok()?;
    let b = fields.next()?.parse().ok()?;
    Some((id, Rgb::new(r, g, b)))
}
