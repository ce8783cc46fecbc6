//! Project file I/O, PNG export and the host bridge.
//!
//! Projects are `.pix` files: JSON with string-keyed sparse pixel maps per
//! layer. Loading is all-or-nothing — a malformed file never half-applies.
//! Export composites the layer stack bottom-to-top into RGBA and encodes PNG,
//! either whole-canvas or sliced into a cell grid.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbaImage};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::canvas::{Background, Color, Coord, Layer, PixelGrid, Sprite, MAX_SPRITE_DIM, MIN_SPRITE_DIM};
use crate::{log_info, log_warn, logger};

// ============================================================================
// ERRORS
// ============================================================================

/// Error type for .pix project file operations.
#[derive(Debug)]
pub enum PixError {
    Io(std::io::Error),
    Json(String),
    InvalidFormat(String),
}

impl std::fmt::Display for PixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PixError::Io(e) => write!(f, "I/O error: {}", e),
            PixError::Json(e) => write!(f, "JSON error: {}", e),
            PixError::InvalidFormat(e) => write!(f, "Invalid project file: {}", e),
        }
    }
}

impl std::error::Error for PixError {}

impl From<std::io::Error> for PixError {
    fn from(e: std::io::Error) -> Self {
        PixError::Io(e)
    }
}

impl From<serde_json::Error> for PixError {
    fn from(e: serde_json::Error) -> Self {
        PixError::Json(e.to_string())
    }
}

/// Error type for PNG export.
#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Encode(String),
    BadSettings(String),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "I/O error: {}", e),
            ExportError::Encode(e) => write!(f, "PNG encode error: {}", e),
            ExportError::BadSettings(e) => write!(f, "Bad export settings: {}", e),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

impl From<image::ImageError> for ExportError {
    fn from(e: image::ImageError) -> Self {
        ExportError::Encode(e.to_string())
    }
}

// ============================================================================
// PROJECT FILE (.pix)
// ============================================================================

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectFile {
    name: String,
    width: u32,
    height: u32,
    background_color: String,
    #[serde(default)]
    color_palette: Vec<String>,
    layers: Vec<LayerData>,
}

#[derive(Serialize, Deserialize)]
struct LayerData {
    id: String,
    name: String,
    visible: bool,
    opacity: u8,
    locked: bool,
    /// `"x,y"` → color string. BTreeMap keeps saved files diffable.
    pixels: BTreeMap<String, String>,
}

/// Serialize a sprite and palette to a `.pix` project file.
pub fn save_project(sprite: &Sprite, palette: &[Color], path: &Path) -> Result<(), PixError> {
    let file = ProjectFile {
        name: sprite.name.clone(),
        width: sprite.width,
        height: sprite.height,
        background_color: sprite.background.to_string(),
        color_palette: palette.iter().map(Color::to_string).collect(),
        layers: sprite
            .layers
            .iter()
            .map(|l| LayerData {
                id: l.id.to_string(),
                name: l.name.clone(),
                visible: l.visible,
                opacity: l.opacity,
                locked: l.locked,
                pixels: l
                    .pixels
                    .iter()
                    .map(|(c, color)| (c.key(), color.to_string()))
                    .collect(),
            })
            .collect(),
    };
    let json = serde_json::to_string_pretty(&file)?;
    fs::write(path, json)?;
    log_info!("saved project '{}' to {}", sprite.name, path.display());
    Ok(())
}

/// Load a `.pix` project file. Reconstructs the exact grids, layer order and
/// attributes; only the sprite's in-memory id is regenerated. Any malformed
/// coordinate, color or id fails the whole load.
pub fn load_project(path: &Path) -> Result<(Sprite, Vec<Color>), PixError> {
    let json = fs::read_to_string(path)?;
    let file: ProjectFile = serde_json::from_str(&json)?;

    if file.width < MIN_SPRITE_DIM
        || file.width > MAX_SPRITE_DIM
        || file.height < MIN_SPRITE_DIM
        || file.height > MAX_SPRITE_DIM
    {
        return Err(PixError::InvalidFormat(format!(
            "unsupported canvas size {}x{}",
            file.width, file.height
        )));
    }
    if file.layers.is_empty() {
        return Err(PixError::InvalidFormat("project has no layers".into()));
    }

    let background: Background = file
        .background_color
        .parse()
        .map_err(|e: crate::canvas::ParseColorError| PixError::InvalidFormat(e.to_string()))?;

    let mut palette = Vec::with_capacity(file.color_palette.len());
    for s in &file.color_palette {
        let color: Color = s
            .parse()
            .map_err(|e: crate::canvas::ParseColorError| PixError::InvalidFormat(e.to_string()))?;
        palette.push(color);
    }

    let mut layers = Vec::with_capacity(file.layers.len());
    for data in &file.layers {
        let id = Uuid::parse_str(&data.id)
            .map_err(|_| PixError::InvalidFormat(format!("bad layer id '{}'", data.id)))?;
        let mut pixels = PixelGrid::new();
        for (key, value) in &data.pixels {
            let coord = Coord::from_key(key)
                .ok_or_else(|| PixError::InvalidFormat(format!("bad pixel key '{}'", key)))?;
            let color: Color = value.parse().map_err(|e: crate::canvas::ParseColorError| {
                PixError::InvalidFormat(e.to_string())
            })?;
            pixels.set(coord, color);
        }
        layers.push(Layer {
            id,
            name: data.name.clone(),
            visible: data.visible,
            opacity: data.opacity.min(100),
            locked: data.locked,
            pixels,
        });
    }

    let active_layer_id = layers[0].id;
    let sprite = Sprite {
        id: Uuid::new_v4(),
        name: file.name,
        width: file.width,
        height: file.height,
        background,
        layers,
        active_layer_id,
    };
    log_info!(
        "loaded project '{}' ({} layers) from {}",
        sprite.name,
        sprite.layers.len(),
        path.display()
    );
    Ok((sprite, palette))
}

// ============================================================================
// COMPOSITING + PNG EXPORT
// ============================================================================

/// Which layers an export renders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayerFilter {
    /// The active layer only.
    Selected,
    /// Every layer, hidden ones included.
    All,
    /// Layers currently marked visible.
    #[default]
    Visible,
}

impl std::str::FromStr for LayerFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "selected" => Ok(LayerFilter::Selected),
            "all" => Ok(LayerFilter::All),
            "visible" => Ok(LayerFilter::Visible),
            other => Err(format!(
                "unknown layer filter '{}' (expected selected|all|visible)",
                other
            )),
        }
    }
}

/// Flatten the layer stack into one straight-alpha RGBA image: background
/// fill first, then source-over composition bottom-to-top with each layer's
/// opacity applied uniformly. Rows are filled in parallel.
pub fn composite(sprite: &Sprite, filter: LayerFilter) -> RgbaImage {
    let (w, h) = (sprite.width, sprite.height);
    let layers: Vec<&Layer> = match filter {
        LayerFilter::Selected => sprite.active_layer().into_iter().collect(),
        LayerFilter::All => sprite.layers.iter().collect(),
        LayerFilter::Visible => sprite.layers.iter().filter(|l| l.visible).collect(),
    };
    let bg = match sprite.background {
        Background::Solid(c) => [c.r, c.g, c.b, c.a],
        Background::Transparent => [0, 0, 0, 0],
    };

    let mut buf = vec![0u8; (w * h * 4) as usize];
    buf.par_chunks_mut((w * 4) as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..w as usize {
                let mut acc = [
                    bg[0] as f32 / 255.0,
                    bg[1] as f32 / 255.0,
                    bg[2] as f32 / 255.0,
                    bg[3] as f32 / 255.0,
                ];
                for layer in &layers {
                    let Some(c) = layer.pixels.get(Coord::new(x as i32, y as i32)) else {
                        continue;
                    };
                    let sa = c.alpha_f32() * (layer.opacity as f32 / 100.0);
                    if sa <= 0.0 {
                        continue;
                    }
                    let src = [c.r as f32 / 255.0, c.g as f32 / 255.0, c.b as f32 / 255.0];
                    let da = acc[3];
                    let out_a = sa + da * (1.0 - sa);
                    for i in 0..3 {
                        acc[i] = (src[i] * sa + acc[i] * da * (1.0 - sa)) / out_a;
                    }
                    acc[3] = out_a;
                }
                let px = &mut row[x * 4..x * 4 + 4];
                px[0] = (acc[0] * 255.0).round() as u8;
                px[1] = (acc[1] * 255.0).round() as u8;
                px[2] = (acc[2] * 255.0).round() as u8;
                px[3] = (acc[3] * 255.0).round() as u8;
            }
        });

    RgbaImage::from_raw(w, h, buf).unwrap_or_else(|| RgbaImage::new(w, h))
}

/// Encode an RGBA image as PNG bytes.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        img.as_raw(),
        img.width(),
        img.height(),
        ColorType::Rgba8,
    )?;
    Ok(bytes)
}

/// Render the whole canvas and write it as one PNG.
pub fn export_whole(sprite: &Sprite, filter: LayerFilter, path: &Path) -> Result<(), ExportError> {
    let img = composite(sprite, filter);
    fs::write(path, encode_png(&img)?)?;
    log_info!("exported {} to {}", sprite.name, path.display());
    Ok(())
}

/// Cell grid for sliced export.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SliceSettings {
    pub cell_width: u32,
    pub cell_height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

/// Partition the composited canvas into cells and write one PNG per cell,
/// named `{stem}_{row}_{col}.png` under `dir`. Trailing cells that run past
/// the canvas edge are cropped, not padded. Returns the written paths in
/// row-major order.
pub fn export_slices(
    sprite: &Sprite,
    filter: LayerFilter,
    settings: SliceSettings,
    dir: &Path,
    stem: &str,
) -> Result<Vec<PathBuf>, ExportError> {
    if settings.cell_width == 0 || settings.cell_height == 0 {
        return Err(ExportError::BadSettings("cell size must be positive".into()));
    }
    if settings.offset_x >= sprite.width || settings.offset_y >= sprite.height {
        return Err(ExportError::BadSettings(format!(
            "offset ({}, {}) lies outside the {}x{} canvas",
            settings.offset_x, settings.offset_y, sprite.width, sprite.height
        )));
    }

    let img = composite(sprite, filter);
    let mut written = Vec::new();
    let mut row = 0u32;
    let mut y = settings.offset_y;
    while y < sprite.height {
        let cell_h = settings.cell_height.min(sprite.height - y);
        let mut col = 0u32;
        let mut x = settings.offset_x;
        while x < sprite.width {
            let cell_w = settings.cell_width.min(sprite.width - x);
            let cell = image::imageops::crop_imm(&img, x, y, cell_w, cell_h).to_image();
            let path = dir.join(format!("{}_{}_{}.png", stem, row, col));
            fs::write(&path, encode_png(&cell)?)?;
            written.push(path);
            col += 1;
            x += settings.cell_width;
        }
        row += 1;
        y += settings.cell_height;
    }
    log_info!("exported {} slices of {} to {}", written.len(), sprite.name, dir.display());
    Ok(written)
}

// ============================================================================
// HOST BRIDGE
// ============================================================================

/// Error type for host (dialog / filesystem) interactions.
#[derive(Debug)]
pub enum HostError {
    Io(std::io::Error),
    Unavailable(String),
}

impl std::fmt::Display for HostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostError::Io(e) => write!(f, "I/O error: {}", e),
            HostError::Unavailable(e) => write!(f, "Host unavailable: {}", e),
        }
    }
}

impl std::error::Error for HostError {}

impl From<std::io::Error> for HostError {
    fn from(e: std::io::Error) -> Self {
        HostError::Io(e)
    }
}

/// The platform services the editor needs but does not own: file dialogs,
/// raw file access and the recent-files list. Shells provide an
/// implementation; the core degrades (disables save/open) when none is
/// available. Dialog methods return `Ok(None)` when the user cancels.
pub trait HostBridge {
    fn choose_save_target(&self, suggested_name: &str) -> Result<Option<PathBuf>, HostError>;
    fn choose_open_target(&self) -> Result<Option<PathBuf>, HostError>;
    fn read_text(&self, path: &Path) -> Result<String, HostError>;
    fn write_text(&self, path: &Path, content: &str) -> Result<(), HostError>;
    fn read_binary(&self, path: &Path) -> Result<Vec<u8>, HostError>;
    fn write_binary(&self, path: &Path, bytes: &[u8]) -> Result<(), HostError>;
    fn recent_files(&self) -> Vec<PathBuf>;
    fn record_recent(&self, path: &Path);
}

/// Most recent paths kept in the recents list.
const RECENT_LIMIT: usize = 10;

/// Host bridge backed by native dialogs (`rfd`) and `std::fs`, with the
/// recents list persisted as JSON next to the session log.
#[derive(Debug, Default)]
pub struct DiskHost;

impl DiskHost {
    pub fn new() -> Self {
        Self
    }

    fn recents_path() -> PathBuf {
        logger::data_dir().join("Pixo").join("recent.json")
    }

    fn load_recents() -> Vec<PathBuf> {
        let Ok(json) = fs::read_to_string(Self::recents_path()) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<PathBuf>>(&json) {
            Ok(list) => list,
            Err(e) => {
                log_warn!("ignoring corrupt recents list: {}", e);
                Vec::new()
            }
        }
    }

    fn store_recents(list: &[PathBuf]) {
        let path = Self::recents_path();
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(list) {
            Ok(json) => {
                if let Err(e) = fs::write(&path, json) {
                    log_warn!("failed to write recents list: {}", e);
                }
            }
            Err(e) => log_warn!("failed to serialize recents list: {}", e),
        }
    }
}

impl HostBridge for DiskHost {
    fn choose_save_target(&self, suggested_name: &str) -> Result<Option<PathBuf>, HostError> {
        Ok(rfd::FileDialog::new()
            .add_filter("Pixo project", &["pix"])
            .add_filter("PNG image", &["png"])
            .set_file_name(suggested_name)
            .save_file())
    }

    fn choose_open_target(&self) -> Result<Option<PathBuf>, HostError> {
        Ok(rfd::FileDialog::new()
            .add_filter("Pixo project", &["pix"])
            .pick_file())
    }

    fn read_text(&self, path: &Path) -> Result<String, HostError> {
        Ok(fs::read_to_string(path)?)
    }

    fn write_text(&self, path: &Path, content: &str) -> Result<(), HostError> {
        Ok(fs::write(path, content)?)
    }

    fn read_binary(&self, path: &Path) -> Result<Vec<u8>, HostError> {
        Ok(fs::read(path)?)
    }

    fn write_binary(&self, path: &Path, bytes: &[u8]) -> Result<(), HostError> {
        Ok(fs::write(path, bytes)?)
    }

    fn recent_files(&self) -> Vec<PathBuf> {
        Self::load_recents()
    }

    fn record_recent(&self, path: &Path) {
        let mut list = Self::load_recents();
        list.retain(|p| p != path);
        list.insert(0, path.to_path_buf());
        list.truncate(RECENT_LIMIT);
        Self::store_recents(&list);
    }
}
