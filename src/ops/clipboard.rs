//! OS clipboard copy/paste of pixel data via `arboard`.

use std::borrow::Cow;

use arboard::{Clipboard, ImageData};
use image::RgbaImage;
use uuid::Uuid;

use crate::canvas::{Color, Coord, Layer, SelectionSet, Sprite};
use crate::io::{composite, LayerFilter};
use crate::ops::transform;
use crate::log_info;

/// Error type for clipboard operations.
#[derive(Debug)]
pub enum ClipboardError {
    Unavailable(String),
    /// The clipboard holds no image.
    Empty,
}

impl std::fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipboardError::Unavailable(e) => write!(f, "Clipboard unavailable: {}", e),
            ClipboardError::Empty => write!(f, "No image on the clipboard"),
        }
    }
}

impl std::error::Error for ClipboardError {}

impl From<arboard::Error> for ClipboardError {
    fn from(e: arboard::Error) -> Self {
        match e {
            arboard::Error::ContentNotAvailable => ClipboardError::Empty,
            other => ClipboardError::Unavailable(other.to_string()),
        }
    }
}

/// What happens when a pasted image is larger than the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PasteMode {
    /// Keep the canvas size; overhanging pixels are dropped.
    Crop,
    /// Grow the canvas to contain the image.
    ResizeCanvas,
}

/// Place an RGBA bitmap on a new top layer anchored at the origin. The new
/// layer becomes active and the written pixels become the selection, ready to
/// be dragged into place. Alpha-0 pixels are skipped. Returns the layer id.
pub fn paste_image(
    sprite: &mut Sprite,
    selection: &mut SelectionSet,
    img: &RgbaImage,
    mode: PasteMode,
) -> Uuid {
    let (iw, ih) = img.dimensions();
    if mode == PasteMode::ResizeCanvas && (iw > sprite.width || ih > sprite.height) {
        transform::resize_canvas(sprite, sprite.width.max(iw), sprite.height.max(ih));
    }

    let mut layer = Layer::new("Pasted Image");
    let mut pasted = Vec::new();
    for (x, y, px) in img.enumerate_pixels() {
        if x >= sprite.width || y >= sprite.height {
            continue;
        }
        let [r, g, b, a] = px.0;
        if a == 0 {
            continue;
        }
        let pos = Coord::new(x as i32, y as i32);
        layer.pixels.set(pos, Color::rgba(r, g, b, a));
        pasted.push(pos);
    }
    let id = layer.id;
    sprite.layers.push(layer);
    sprite.active_layer_id = id;
    if !pasted.is_empty() {
        selection.replace(pasted);
    }
    id
}

/// Read an image off the OS clipboard and paste it as a new layer.
pub fn paste_from_clipboard(
    sprite: &mut Sprite,
    selection: &mut SelectionSet,
    mode: PasteMode,
) -> Result<Uuid, ClipboardError> {
    let mut clipboard = Clipboard::new().map_err(ClipboardError::from)?;
    let data = clipboard.get_image()?;
    let img = RgbaImage::from_raw(
        data.width as u32,
        data.height as u32,
        data.bytes.into_owned(),
    )
    .ok_or(ClipboardError::Empty)?;
    log_info!("pasting {}x{} clipboard image", img.width(), img.height());
    Ok(paste_image(sprite, selection, &img, mode))
}

/// Copy the composited selection to the OS clipboard, cropped to the
/// selection bounds; unselected cells within the bounds go out transparent.
/// No-op `Ok` when the selection is empty.
pub fn copy_selection(
    sprite: &Sprite,
    selection: &SelectionSet,
) -> Result<(), ClipboardError> {
    let Some(bounds) = selection.bounds() else {
        return Ok(());
    };
    let flat = composite(sprite, LayerFilter::Visible);
    let (w, h) = (bounds.width as u32, bounds.height as u32);
    let mut out = RgbaImage::new(w, h);
    for c in selection.iter() {
        let (sx, sy) = (c.x, c.y);
        if sx < 0 || sy < 0 || sx as u32 >= flat.width() || sy as u32 >= flat.height() {
            continue;
        }
        let px = *flat.get_pixel(sx as u32, sy as u32);
        out.put_pixel((c.x - bounds.x) as u32, (c.y - bounds.y) as u32, px);
    }

    let mut clipboard = Clipboard::new().map_err(ClipboardError::from)?;
    clipboard.set_image(ImageData {
        width: w as usize,
        height: h as usize,
        bytes: Cow::Owned(out.into_raw()),
    })?;
    Ok(())
}
