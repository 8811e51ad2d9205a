use crate::canvas::{Canvas, MapBounds};
use crate::config::MapperConfig;
use crate::overlay::{draw_origin, draw_scale};
use crate::players::{draw_players, load_players};
use crate::progress::Progress;
use futures::future::join_all;
use minemap_common::{MapperError, Result, SectorCoord};
use minemap_logger::{log, LogSeverity::*};
use minemap_render::{composite_sector, HeightShader, Palette, WorldColumns};
use minemap_storage::{enumerate_sectors, WorldStorage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};

const PALETTE_FILE: &str = "colors.txt";

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    pub sectors: usize,
    pub columns: usize,
    pub pixels: usize,
    pub width: u32,
    pub height: u32,
}

/// Renders the world named by `config` to its output image.
pub async fn run(config: &MapperConfig) -> Result<RenderSummary> {
    let colors = config.colors()?;

    let palette_path = find_palette(config.colors.as_deref())?;
    let palette = Arc::new(Palette::load(&palette_path)?);
    log(
        format!("Loaded {} colours from {}", palette.len(), palette_path.display()),
        Debug,
    );

    let storage = Arc::new(WorldStorage::open(&config.input)?);
    let sectors = enumerate_sectors(&storage, &config.geometry)?;
    let bounds = MapBounds::from_sectors(&sectors).ok_or(MapperError::NoData)?;
    log(
        format!(
            "{} sectors, w={} h={}",
            sectors.len(),
            bounds.width(),
            bounds.height()
        ),
        Info,
    );

    let sector_count = sectors.len();
    let columns = composite_all(
        Arc::clone(&storage),
        Arc::clone(&palette),
        sectors,
        config.workers,
    )
    .await;

    log("Drawing image".to_owned(), Info);
    let mut canvas = Canvas::new(bounds, config.border(), colors.background);
    let shader = HeightShader::new(&palette, config.drawunderground);
    let shaded = shader.render(&columns);
    let mut progress = Progress::pixels(shaded.len());
    for &(x, z, color) in &shaded {
        progress.tick();
        canvas.put(x, z, color);
    }

    if config.draworigin {
        draw_origin(&mut canvas, colors.origin);
    }
    if config.drawscale {
        draw_scale(&mut canvas, colors.scale);
    }
    if config.drawplayers {
        match load_players(&config.input) {
            Ok(players) => draw_players(&mut canvas, &players, colors.player),
            Err(err) => log(format!("Failed to read players: {}", err), Warning),
        }
    }

    log(format!("Saving {}", config.output.display()), Info);
    canvas.save(&config.output)?;

    Ok(RenderSummary {
        sectors: sector_count,
        columns: columns.len(),
        pixels: shaded.len(),
        width: canvas.width(),
        height: canvas.height(),
    })
}

/// Composites every sector on the blocking pool, at most `workers` at a time.
/// A sector that fails is reported and left blank.
async fn composite_all(
    storage: Arc<WorldStorage>,
    palette: Arc<Palette>,
    sectors: Vec<SectorCoord>,
    workers: usize,
) -> WorldColumns {
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let columns = Arc::new(Mutex::new(WorldColumns::new()));
    let mut progress = Progress::sectors(sectors.len());
    let mut handles = Vec::with_capacity(sectors.len());

    for sector in sectors {
        progress.tick();
        let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
            break;
        };
        let storage = Arc::clone(&storage);
        let palette = Arc::clone(&palette);
        let columns = Arc::clone(&columns);
        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            match composite_sector(&storage, sector, &palette) {
                Ok(Some(records)) => columns.blocking_lock().merge(records),
                Ok(None) => log(
                    format!("sector {},{} has no blocks", sector.x, sector.z),
                    Debug,
                ),
                Err(err) => log(
                    format!("Failed to read sector {},{}: {}", sector.x, sector.z, err),
                    Error,
                ),
            }
        }));
    }

    for joined in join_all(handles).await {
        if let Err(err) = joined {
            log(format!("Sector task failed: {}", err), Error);
        }
    }

    match Arc::try_unwrap(columns) {
        Ok(columns) => columns.into_inner(),
        Err(shared) => {
            let mut guard = shared.lock().await;
            std::mem::take(&mut *guard)
        }
    }
}

/// Palette file to load: the one given, else `colors.txt` in the working
/// directory, else next to the executable.
pub fn find_palette(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let mut candidates = vec![PathBuf::from(PALETTE_FILE)];
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(dir.join(PALETTE_FILE));
    }

    candidates
        .into_iter()
        .find(|path| path.is_file())
        .ok_or_else(|| MapperError::PaletteError(format!("{} not found", PALETTE_FILE)))
}
