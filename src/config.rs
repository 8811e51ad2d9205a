use minemap_common::{MapperError, Result, Rgb, SectorBox};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const USAGE: &str = "\
Usage: minemap [options]
  -h, --help                 show this help
  -i, --input <world>        world directory (default ../world/)
  -o, --output <png>         output image (default map.png)
      --config <json>        read options from a JSON file; flags override it
      --colors <file>        palette file (default colors.txt)
      --bgcolor <color>      background colour (default white)
      --scalecolor <color>   scale colour (default black)
      --origincolor <color>  origin marker colour (default red)
      --playercolor <color>  player marker colour (default red)
      --draworigin           mark the world origin
      --drawplayers          mark player positions
      --drawscale            draw a scale in a 40 pixel border
      --drawunderground      draw columns that never see daylight
      --geometry <xmin:xmax:zmin:zmax>
                             sector range to draw (default -94:93:-94:93)
      --workers <n>          sectors decoded in parallel
      --verbose              log debug messages
Colors are #rrggbb, #rgb or one of white, black, red, green, blue, yellow, gray.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub colors: Option<PathBuf>,
    pub bgcolor: String,
    pub scalecolor: String,
    pub origincolor: String,
    pub playercolor: String,
    pub draworigin: bool,
    pub drawplayers: bool,
    pub drawscale: bool,
    pub drawunderground: bool,
    pub geometry: SectorBox,
    pub workers: usize,
    pub verbose: bool,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("../world/"),
            output: PathBuf::from("map.png"),
            colors: None,
            bgcolor: "white".to_owned(),
            scalecolor: "black".to_owned(),
            origincolor: "red".to_owned(),
            playercolor: "red".to_owned(),
            draworigin: false,
            drawplayers: false,
            drawscale: false,
            drawunderground: false,
            geometry: SectorBox::default(),
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            verbose: false,
        }
    }
}

impl MapperConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|err| MapperError::ConfigError(format!("{}: {}", path.display(), err)))?;
        serde_json::from_str(&text)
            .map_err(|err| MapperError::ConfigError(format!("{}: {}", path.display(), err)))
    }

    /// Width of the border around the map, room for the scale.
    pub fn border(&self) -> u32 {
        if self.drawscale {
            40
        } else {
            0
        }
    }

    /// Resolves every colour option, failing on the first one that does not parse.
    pub fn colors(&self) -> Result<ColorScheme> {
        Ok(ColorScheme {
            background: parse_color(&self.bgcolor)?,
            scale: parse_color(&self.scalecolor)?,
            origin: parse_color(&self.origincolor)?,
            player: parse_color(&self.playercolor)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    pub background: Rgb,
    pub scale: Rgb,
    pub origin: Rgb,
    pub player: Rgb,
}

#[derive(Debug, PartialEq)]
pub enum Command {
    Render(MapperConfig),
    Help,
}

/// Parses command line arguments (without the program name).
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command> {
    let args = split_long_values(args);

    let mut config = match config_file_arg(&args)? {
        Some(path) => MapperConfig::load(Path::new(path))?,
        None => MapperConfig::default(),
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let name = arg.as_str();
        let mut value = |name: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| MapperError::ConfigError(format!("option {} requires a value", name)))
        };
        match name {
            "-h" | "--help" => return Ok(Command::Help),
            "-i" | "--input" => config.input = PathBuf::from(value(name)?),
            "-o" | "--output" => config.output = PathBuf::from(value(name)?),
            "--config" => {
                value(name)?;
            }
            "--colors" => config.colors = Some(PathBuf::from(value(name)?)),
            "--bgcolor" => config.bgcolor = value(name)?,
            "--scalecolor" => config.scalecolor = value(name)?,
            "--origincolor" => config.origincolor = value(name)?,
            "--playercolor" => config.playercolor = value(name)?,
            "--draworigin" => config.draworigin = true,
            "--drawplayers" => config.drawplayers = true,
            "--drawscale" => config.drawscale = true,
            "--drawunderground" => config.drawunderground = true,
            "--geometry" => config.geometry = parse_geometry(&value(name)?)?,
            "--workers" => {
                let raw = value(name)?;
                config.workers = raw
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| MapperError::ConfigError(format!("invalid worker count {:?}", raw)))?;
            }
            "--verbose" => config.verbose = true,
            other => {
                return Err(MapperError::ConfigError(format!(
                    "option {} not recognized",
                    other
                )))
            }
        }
    }

    config.colors()?;
    Ok(Command::Render(config))
}

// "--input=path" becomes "--input", "path"
fn split_long_values<I: IntoIterator<Item = String>>(args: I) -> Vec<String> {
    let mut out = Vec::new();
    for arg in args {
        match arg.split_once('=') {
            Some((name, value)) if name.starts_with("--") => {
                out.push(name.to_owned());
                out.push(value.to_owned());
            }
            _ => out.push(arg),
        }
    }
    out
}

fn config_file_arg(args: &[String]) -> Result<Option<&str>> {
    match args.iter().position(|arg| arg == "--config") {
        Some(i) => args
            .get(i + 1)
            .map(|path| Some(path.as_str()))
            .ok_or_else(|| MapperError::ConfigError("option --config requires a value".to_owned())),
        None => Ok(None),
    }
}

pub fn parse_geometry(text: &str) -> Result<SectorBox> {
    let invalid = || MapperError::ConfigError(format!("invalid geometry {:?}", text));
    let parts: Vec<i16> = text
        .split(':')
        .map(|part| part.trim().parse::<i16>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| invalid())?;
    let &[xmin, xmax, zmin, zmax] = parts.as_slice() else {
        return Err(invalid());
    };
    if xmin > xmax || zmin > zmax {
        return Err(invalid());
    }
    Ok(SectorBox {
        xmin,
        xmax,
        zmin,
        zmax,
    })
}

pub fn parse_color(text: &str) -> Result<Rgb> {
    let invalid = || MapperError::ConfigError(format!("unknown color {:?}", text));
    let text = text.trim();

    if let Some(hex) = text.strip_prefix('#') {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        return match hex.len() {
            6 => Ok(Rgb::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Rgb::new(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(invalid()),
        };
    }

    match text.to_ascii_lowercase().as_str() {
        "white" => Ok(Rgb::new(255, 255, 255)),
        "black" => Ok(Rgb::new(0, 0, 0)),
        "red" => Ok(Rgb::new(255, 0, 0)),
        "green" => Ok(Rgb::new(0, 128, 0)),
        "blue" => Ok(Rgb::new(0, 0, 255)),
        "yellow" => Ok(Rgb::new(255, 255, 0)),
        "gray" | "grey" => Ok(Rgb::new(128, 128, 128)),
        _ => Err(invalid()),
    }
}
