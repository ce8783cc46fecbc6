//! Shape rasterization — pure geometry-to-coordinate functions.
//!
//! Nothing here touches a grid or a layer: every function returns the set of
//! coordinates a tool should stamp, and the caller routes them through
//! `Sprite::set_pixel` / `clear_pixel` (which absorb out-of-bounds points).

use std::collections::HashSet;

use crate::canvas::Coord;

// ============================================================================
// BRUSH MASK
// ============================================================================

/// Footprint shape of a brush stamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrushShape {
    Circle,
    Square,
}

/// Admits exact boundary points of the circular mask against floating-point
/// error.
const CIRCLE_EPS: f64 = 1e-4;

/// Offsets of the brush footprint stamped at `center` for brush size `size`.
///
/// Offsets range over `[-floor((size-1)/2), floor((size-1)/2)]` on both axes.
/// `Circle` keeps only offsets whose Euclidean distance from the center is at
/// most `(size-1)/2` (exact, unfloored). These are the fixed conventions of
/// the brush; changing either would alter visual output for existing tools.
pub fn brush_mask(center: Coord, size: u32, shape: BrushShape) -> Vec<Coord> {
    let half = (size.saturating_sub(1) / 2) as i32;
    let radius = (size.saturating_sub(1)) as f64 / 2.0;
    let mut out = Vec::new();
    for dy in -half..=half {
        for dx in -half..=half {
            if shape == BrushShape::Circle {
                let dist = ((dx * dx + dy * dy) as f64).sqrt();
                if dist > radius + CIRCLE_EPS {
                    continue;
                }
            }
            out.push(Coord::new(center.x + dx, center.y + dy));
        }
    }
    out
}

// ============================================================================
// LINE — Bresenham
// ============================================================================

/// All coordinates on the Bresenham line from `p0` to `p1`, inclusive.
///
/// Endpoints are canonicalized first so the result is a direction-independent
/// set: `line_points(a, b)` and `line_points(b, a)` agree exactly.
pub fn line_points(p0: Coord, p1: Coord) -> Vec<Coord> {
    let (a, b) = if (p1.x, p1.y) < (p0.x, p0.y) {
        (p1, p0)
    } else {
        (p0, p1)
    };

    let dx = (b.x - a.x).abs();
    let dy = (b.y - a.y).abs();
    let sx = if a.x < b.x { 1 } else { -1 };
    let sy = if a.y < b.y { 1 } else { -1 };
    let mut err = dx - dy;
    let (mut x, mut y) = (a.x, a.y);

    let mut out = Vec::new();
    loop {
        out.push(Coord::new(x, y));
        if x == b.x && y == b.y {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
    out
}

// ============================================================================
// RECTANGLE
// ============================================================================

/// Coordinates of the axis-aligned rectangle spanned by `p0` and `p1`
/// (inclusive corners). `fill` paints every interior cell, `outline` the
/// 1-pixel border; both at once produce each coordinate only once.
pub fn rectangle_points(p0: Coord, p1: Coord, fill: bool, outline: bool) -> Vec<Coord> {
    let min_x = p0.x.min(p1.x);
    let max_x = p0.x.max(p1.x);
    let min_y = p0.y.min(p1.y);
    let max_y = p0.y.max(p1.y);

    let mut out = Vec::new();
    let mut seen = HashSet::new();
    let mut emit = |c: Coord| {
        if seen.insert(c) {
            out.push(c);
        }
    };

    if fill {
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                emit(Coord::new(x, y));
            }
        }
    }
    if outline {
        for x in min_x..=max_x {
            emit(Coord::new(x, min_y));
            emit(Coord::new(x, max_y));
        }
        for y in min_y..=max_y {
            emit(Coord::new(min_x, y));
            emit(Coord::new(max_x, y));
        }
    }
    out
}

// ============================================================================
// ELLIPSE — midpoint algorithm
// ============================================================================

/// Coordinates of the ellipse inscribed in the box spanned by `p0` and `p1`.
///
/// Center is the floored average of the corners, radii the floored half
/// deltas. When both radii collapse to zero the single center pixel is
/// produced. The fill test substitutes radius 1 for a zero radius rather than
/// modelling a true degenerate ellipse, which yields a filled line; that is
/// the established behavior and stays.
pub fn ellipse_points(p0: Coord, p1: Coord, fill: bool, outline: bool) -> Vec<Coord> {
    let cx = (p0.x + p1.x).div_euclid(2);
    let cy = (p0.y + p1.y).div_euclid(2);
    let rx = (p1.x - p0.x).abs() / 2;
    let ry = (p1.y - p0.y).abs() / 2;

    if rx == 0 && ry == 0 {
        return vec![Coord::new(cx, cy)];
    }

    let mut out = Vec::new();
    let mut seen = HashSet::new();
    let mut emit = |c: Coord| {
        if seen.insert(c) {
            out.push(c);
        }
    };

    if fill {
        let rx_div = if rx == 0 { 1.0 } else { rx as f64 };
        let ry_div = if ry == 0 { 1.0 } else { ry as f64 };
        for y in -ry..=ry {
            for x in -rx..=rx {
                let nx = x as f64 / rx_div;
                let ny = y as f64 / ry_div;
                if nx * nx + ny * ny <= 1.0 {
                    emit(Coord::new(cx + x, cy + y));
                }
            }
        }
    }

    if outline {
        let rx2 = (rx * rx) as f64;
        let ry2 = (ry * ry) as f64;
        let two_rx2 = 2.0 * rx2;
        let two_ry2 = 2.0 * ry2;

        let mut x: i32 = 0;
        let mut y: i32 = ry;
        let mut px = 0.0;
        let mut py = two_rx2 * y as f64;

        let mut plot4 = |x: i32, y: i32, emit: &mut dyn FnMut(Coord)| {
            emit(Coord::new(cx + x, cy + y));
            emit(Coord::new(cx - x, cy + y));
            emit(Coord::new(cx + x, cy - y));
            emit(Coord::new(cx - x, cy - y));
        };

        plot4(x, y, &mut emit);

        // Region 1: slope magnitude below 1.
        let mut p = (ry2 - rx2 * ry as f64 + 0.25 * rx2).round();
        while px < py {
            x += 1;
            px += two_ry2;
            if p < 0.0 {
                p += ry2 + px;
            } else {
                y -= 1;
                py -= two_rx2;
                p += ry2 + px - py;
            }
            plot4(x, y, &mut emit);
        }

        // Region 2: slope magnitude at least 1.
        p = (ry2 * (x as f64 + 0.5) * (x as f64 + 0.5) + rx2 * (y as f64 - 1.0) * (y as f64 - 1.0)
            - rx2 * ry2)
            .round();
        while y > 0 {
            y -= 1;
            py -= two_rx2;
            if p > 0.0 {
                p += rx2 - py;
            } else {
                x += 1;
                px += two_ry2;
                p += rx2 - py + px;
            }
            plot4(x, y, &mut emit);
        }
    }

    out
}
