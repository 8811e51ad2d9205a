use crate::canvas::Canvas;
use crate::font::draw_text;
use crate::overlay::draw_circle;
use minemap_common::types::SECTOR_SIZE;
use minemap_common::{Result, Rgb};
use minemap_logger::{log, LogSeverity::*};
use std::fs;
use std::io;
use std::path::Path;

const PLAYER_RADIUS: i64 = 2;

/// A player read from `<world>/players/`. Positions are stored in tenths of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub name: String,
    pub position: (f64, f64, f64),
}

impl Player {
    /// Parses `key = value` lines, keeping `name` and `position`.
    pub fn parse(text: &str) -> Option<Self> {
        let mut name = None;
        let mut position = None;
        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            match key.trim() {
                "name" => name = Some(value.trim().to_owned()),
                "position" => position = parse_position(value.trim()),
                _ => {}
            }
        }
        let name = name.filter(|n| !n.is_empty())?;
        Some(Self {
            name,
            position: position?,
        })
    }
}

fn parse_position(value: &str) -> Option<(f64, f64, f64)> {
    let inner = value.strip_prefix('(')?.strip_suffix(')')?;
    let parts: Vec<f64> = inner
        .split(',')
        .map(|part| part.trim().parse().ok())
        .collect::<Option<_>>()?;
    let &[x, y, z] = parts.as_slice() else {
        return None;
    };
    Some((x, y, z))
}

/// Reads every player file. A world without a players directory has no players.
pub fn load_players(world: &Path) -> Result<Vec<Player>> {
    let dir = world.join("players");
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut players = Vec::new();
    for path in paths {
        let text = match fs::read(&path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                log(format!("cannot read player file {}: {}", path.display(), err), Warning);
                continue;
            }
        };
        match Player::parse(&text) {
            Some(player) => players.push(player),
            None => log(format!("no player in {}", path.display()), Debug),
        }
    }
    Ok(players)
}

/// Marks each player with a small circle and its name.
pub fn draw_players(canvas: &mut Canvas, players: &[Player], color: Rgb) {
    let bounds = canvas.bounds();
    let border = canvas.border() as i64;
    let h = bounds.height() as f64;
    let step = SECTOR_SIZE as f64;

    for player in players {
        let (px, py, pz) = player.position;
        let x = (px / 10.0 - bounds.minx as f64 * step) as i64;
        let z = (h - (pz / 10.0 - bounds.minz as f64 * step)) as i64;
        log(
            format!(
                "player {} at ({:.1}, {:.1}, {:.1})",
                player.name,
                px / 10.0,
                py / 10.0,
                pz / 10.0
            ),
            Info,
        );
        draw_circle(canvas, x + border, z + border, PLAYER_RADIUS, color);
        draw_text(canvas, x + 2 + border, z + 2 + border, &player.name, color);
    }
}
