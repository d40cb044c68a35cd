use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::{
    Report,
    eyre::{WrapErr, eyre},
};
use glyphfield_core::{FieldConfig, SizeTable, SizeTier};

const DEFAULT_COLS: u16 = 80;
const DEFAULT_ROWS: u16 = 24;
/// Frame rate of the playback loop when neither flag nor file sets one.
const FALLBACK_FPS: f64 = 30.0;
/// Slowest accepted playback rate.
const MIN_FPS: f64 = 1.0;
/// Ceiling for a frame rate taken from the configuration file.
const MAX_FILE_FPS: f64 = 60.0;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    name = "glyphfield-preview",
    about = "Terminal preview for the glyphfield plasma background",
    long_about = "Renders the glyph plasma field into the terminal as text frames, \
                  for tuning renderer configurations without a browser"
)]
pub struct Cli {
    /// Grid width in cells (defaults to $COLUMNS or 80)
    #[arg(long, value_name = "CELLS")]
    pub cols: Option<u16>,

    /// Grid height in cells (defaults to $LINES or 24)
    #[arg(long, value_name = "CELLS")]
    pub rows: Option<u16>,

    /// CSS pixels per cell used to size the virtual container
    #[arg(long, default_value = "10.0", value_name = "PX")]
    pub cell_size: f64,

    /// Number of frames to play; 0 plays until interrupted
    #[arg(long, default_value = "0")]
    pub frames: u64,

    /// Playback frame rate
    #[arg(long)]
    pub fps: Option<f64>,

    /// Animation speed multiplier
    #[arg(long)]
    pub speed: Option<f64>,

    /// Phase offset; each unit shifts the animation by 1000 seconds
    #[arg(long)]
    pub seed: Option<f64>,

    /// Trail strength in [0, 1]; 0 clears every frame
    #[arg(long, value_name = "STRENGTH")]
    pub trail: Option<f64>,

    /// Glyph ramp from sparse to dense
    #[arg(long, value_name = "RAMP")]
    pub glyphs: Option<String>,

    /// Weight of the slow blob component
    #[arg(long, value_name = "STRENGTH")]
    pub blob_strength: Option<f64>,

    /// Weight of the per-cell shimmer
    #[arg(long, value_name = "STRENGTH")]
    pub shimmer_strength: Option<f64>,

    /// JSON file with renderer options (camelCase, as in the browser component)
    #[arg(long, value_name = "PATH", value_parser = validate_file_exists)]
    pub config: Option<PathBuf>,

    /// Print a single frame and exit
    #[arg(long)]
    pub snapshot: bool,

    /// Animation time of the snapshot frame, in milliseconds
    #[arg(long, default_value = "0.0", value_name = "MS", requires = "snapshot")]
    pub time_ms: f64,
}

fn validate_file_exists(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("File not found: {s}"))
    }
}

impl Cli {
    /// Validates the arguments clap cannot check on its own.
    pub fn validate(&self) -> Result<(), Report> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(eyre!("Cell size must be positive, got {}", self.cell_size));
        }

        let (cols, rows) = self.grid_size();
        if cols == 0 || rows == 0 {
            return Err(eyre!("Grid must have at least one cell, got {cols}x{rows}"));
        }

        if let Some(fps) = self.fps
            && !(fps.is_finite() && fps >= MIN_FPS)
        {
            return Err(eyre!("Frame rate must be at least {MIN_FPS}, got {fps}"));
        }

        Ok(())
    }

    /// Grid size in cells, falling back to the terminal size variables.
    pub fn grid_size(&self) -> (u16, u16) {
        resolve_grid_size(
            self.cols,
            self.rows,
            std::env::var("COLUMNS").ok().as_deref(),
            std::env::var("LINES").ok().as_deref(),
        )
    }

    /// Builds the renderer configuration: file values first, flags on top.
    ///
    /// Every size tier uses the preview cell size so one grid cell maps onto
    /// one character. Frame pacing is left to the playback loop.
    pub fn field_config(&self) -> Result<FieldConfig, Report> {
        let base = match &self.config {
            Some(path) => load_config(path)?,
            None => FieldConfig::default(),
        };

        let config = self.apply_overrides(base);
        config.validate().wrap_err("Invalid renderer configuration")?;
        Ok(config)
    }

    /// Frame rate of the playback loop. A rate from the file is clamped to
    /// `[MIN_FPS, MAX_FILE_FPS]`.
    pub fn playback_fps(&self, file_config: &FieldConfig) -> f64 {
        match self.fps {
            Some(fps) => fps,
            None if file_config.fps > 0.0 => file_config.fps.clamp(MIN_FPS, MAX_FILE_FPS),
            None => FALLBACK_FPS,
        }
    }

    fn apply_overrides(&self, mut config: FieldConfig) -> FieldConfig {
        if let Some(speed) = self.speed {
            config = config.speed(speed);
        }
        if let Some(seed) = self.seed {
            config = config.seed(seed);
        }
        if let Some(trail) = self.trail {
            config = config.trail_strength(trail);
        }
        if let Some(glyphs) = &self.glyphs {
            config = config.glyphs(glyphs);
        }
        if let Some(strength) = self.blob_strength {
            config = config.blob_strength(strength);
        }
        if let Some(strength) = self.shimmer_strength {
            config = config.shimmer_strength(strength);
        }

        let tier = SizeTier::new(self.cell_size, self.cell_size);
        config.sizes(SizeTable {
            base: Some(tier),
            mobile: None,
            tablet: None,
            desktop: None,
        })
    }

    /// Prints the effective settings to stderr.
    pub fn print_summary(&self, config: &FieldConfig, fps: f64) {
        let (cols, rows) = self.grid_size();
        eprintln!("glyphfield preview");
        eprintln!("==================");
        eprintln!("Grid:      {cols}x{rows} cells @ {}px", self.cell_size);
        eprintln!("Glyphs:    {:?}", config.glyphs.as_str());
        eprintln!("Speed:     {}", config.speed);
        eprintln!("Trail:     {}", config.trail_strength);
        if self.snapshot {
            eprintln!("Snapshot:  t={}ms", self.time_ms);
        } else {
            eprintln!("Playback:  {fps} fps");
        }
        eprintln!();
    }
}

fn load_config(path: &Path) -> Result<FieldConfig, Report> {
    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).wrap_err_with(|| format!("Failed to parse {}", path.display()))
}

fn resolve_grid_size(
    cols: Option<u16>,
    rows: Option<u16>,
    env_cols: Option<&str>,
    env_lines: Option<&str>,
) -> (u16, u16) {
    let from_env = |value: Option<&str>| value.and_then(|v| v.trim().parse::<u16>().ok());

    let cols = cols.or_else(|| from_env(env_cols)).unwrap_or(DEFAULT_COLS);
    // one line stays free for the cursor
    let rows = rows
        .or_else(|| from_env(env_lines).map(|l| l.saturating_sub(1)))
        .unwrap_or(DEFAULT_ROWS);

    (cols, rows)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["glyphfield-preview"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = cli(&["--cols", "40", "--rows", "10"]);

        assert_eq!(cli.cell_size, 10.0);
        assert_eq!(cli.frames, 0);
        assert!(!cli.snapshot);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_grid_size_fallbacks() {
        assert_eq!(resolve_grid_size(None, None, None, None), (80, 24));
        assert_eq!(resolve_grid_size(None, None, Some("120"), Some("40")), (120, 39));
        assert_eq!(resolve_grid_size(Some(10), None, Some("120"), Some("junk")), (10, 24));
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = cli(&["--speed", "2.5", "--trail", "0", "--glyphs", " .#", "--cell-size", "8"]);
        let config = cli.field_config().unwrap();

        assert_eq!(config.speed, 2.5);
        assert_eq!(config.trail_strength, 0.0);
        assert_eq!(config.glyphs.as_str(), " .#");
        assert_eq!(config.sizes.base, Some(SizeTier::new(8.0, 8.0)));
        assert_eq!(config.sizes.desktop, None);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let cli = cli(&["--trail", "1.5"]);
        assert!(cli.field_config().is_err());
    }

    #[test]
    fn test_invalid_cell_size() {
        let cli = cli(&["--cols", "10", "--rows", "10", "--cell-size", "0"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_time_requires_snapshot() {
        let argv = ["glyphfield-preview", "--time-ms", "500"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_playback_fps() {
        let defaults = cli(&[]);
        assert_eq!(defaults.playback_fps(&FieldConfig::default()), 60.0);
        assert_eq!(defaults.playback_fps(&FieldConfig::default().fps(24.0)), 24.0);
        assert_eq!(defaults.playback_fps(&FieldConfig::default().fps(0.0)), FALLBACK_FPS);

        let explicit = cli(&["--fps", "12"]);
        assert_eq!(explicit.playback_fps(&FieldConfig::default()), 12.0);
    }

    #[test]
    fn test_tiny_fps_flag_is_rejected() {
        let tiny = cli(&["--cols", "10", "--rows", "10", "--fps", "1e-300"]);
        assert!(tiny.validate().is_err());

        let slow = cli(&["--cols", "10", "--rows", "10", "--fps", "1"]);
        assert!(slow.validate().is_ok());
    }

    #[test]
    fn test_tiny_file_fps_is_clamped() {
        let defaults = cli(&[]);
        let fps = defaults.playback_fps(&FieldConfig::default().fps(1e-300));

        assert_eq!(fps, MIN_FPS);
        assert!(Duration::try_from_secs_f64(1.0 / fps).is_ok());
    }
}
