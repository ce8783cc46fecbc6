//! AI-assisted layer fill.
//!
//! The network call lives behind [`ImageGenerator`]; the core only handles
//! what comes back — fit the bitmap to the canvas, center it, and composite
//! it onto a fresh layer.

use image::imageops::{self, FilterType};
use image::RgbaImage;
use uuid::Uuid;

use crate::canvas::{Color, Coord, Layer, Sprite};
use crate::log_info;

/// Error type for image generation.
#[derive(Debug)]
pub enum GenerateError {
    /// Bad or missing credential; the message feeds the key-entry dialog.
    Unauthorized(String),
    Generic(String),
}

impl std::fmt::Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateError::Unauthorized(e) => write!(f, "Unauthorized: {}", e),
            GenerateError::Generic(e) => write!(f, "Generation failed: {}", e),
        }
    }
}

impl std::error::Error for GenerateError {}

/// Produces an RGBA bitmap for a prompt, or fails. Implementations own the
/// network call and credential handling; the editor never retries on its own.
pub trait ImageGenerator {
    fn generate(
        &self,
        prompt: &str,
        target_width: u32,
        target_height: u32,
    ) -> Result<RgbaImage, GenerateError>;
}

/// Scale `img` to fit inside `width`×`height` preserving aspect ratio,
/// nearest-neighbour so pixel edges stay crisp. Never upscales past the
/// canvas; a bitmap already fitting is returned at its own size.
pub fn fit_to_canvas(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let (iw, ih) = img.dimensions();
    if iw == 0 || ih == 0 {
        return img.clone();
    }
    let scale = (width as f64 / iw as f64).min(height as f64 / ih as f64);
    if scale >= 1.0 {
        return img.clone();
    }
    let new_w = ((iw as f64 * scale).floor() as u32).max(1);
    let new_h = ((ih as f64 * scale).floor() as u32).max(1);
    imageops::resize(img, new_w, new_h, FilterType::Nearest)
}

/// Composite a bitmap onto a new top layer, centered on the canvas. Pixels
/// with alpha 0 are skipped, never stored as transparent entries. The new
/// layer becomes active. Returns its id.
pub fn paste_bitmap_as_layer(sprite: &mut Sprite, img: &RgbaImage, name: &str) -> Uuid {
    let fitted = fit_to_canvas(img, sprite.width, sprite.height);
    let (fw, fh) = fitted.dimensions();
    let ox = (sprite.width.saturating_sub(fw) / 2) as i32;
    let oy = (sprite.height.saturating_sub(fh) / 2) as i32;

    let mut layer = Layer::new(name);
    for (x, y, px) in fitted.enumerate_pixels() {
        let [r, g, b, a] = px.0;
        if a == 0 {
            continue;
        }
        layer
            .pixels
            .set(Coord::new(ox + x as i32, oy + y as i32), Color::rgba(r, g, b, a));
    }
    let id = layer.id;
    sprite.layers.push(layer);
    sprite.active_layer_id = id;
    id
}

/// Run the generator at the sprite's dimensions and land the result on a new
/// layer. Failures propagate untouched for the shell to present.
pub fn generate_onto_new_layer<G: ImageGenerator>(
    sprite: &mut Sprite,
    generator: &G,
    prompt: &str,
) -> Result<Uuid, GenerateError> {
    let img = generator.generate(prompt, sprite.width, sprite.height)?;
    log_info!(
        "generated {}x{} bitmap for prompt ({} chars)",
        img.width(),
        img.height(),
        prompt.len()
    );
    Ok(paste_bitmap_as_layer(sprite, &img, "AI Layer"))
}
