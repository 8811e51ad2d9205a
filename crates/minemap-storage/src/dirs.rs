use crate::position::hex4_to_int;
use bytes::Bytes;
use minemap_common::Result;
use std::fs;
use std::io;
use std::path::Path;

/// Names of the entries of `dir`, or `None` if the directory does not exist.
pub fn read_dir_names(dir: &Path) -> Result<Option<Vec<String>>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_owned());
        }
    }
    Ok(Some(names))
}

/// Vertical block indices stored as files in a sector directory.
/// The `meta` file and anything that is not a 4-digit hex name is skipped.
pub fn read_slot_names(sector_dir: &Path) -> Result<Vec<i16>> {
    let names = read_dir_names(sector_dir)?.unwrap_or_default();
    Ok(names
        .iter()
        .filter(|name| name.as_str() != "meta")
        .filter_map(|name| hex4_to_int(name))
        .collect())
}

pub fn read_block_file(path: &Path) -> Result<Option<Bytes>> {
    match fs::read(path) {
        Ok(data) => Ok(Some(Bytes::from(data))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}
