//! Software rasterization onto an RGBA surface buffer.
//!
//! Pixel `(x, y)` is sampled at the integer coordinate `(x, y)`. Coverage is
//! binary (no anti-aliasing) so two renders of the same gesture are
//! bit-identical and no-op edits compare equal.

use std::f32::consts::PI;

use egui::{Pos2, Rect, Vec2};
use image::{Rgba, RgbaImage};

use crate::tools::style::{CapStyle, JoinStyle, StrokeStyle};

/// Slack on outline distance so points exactly half a width away are not
/// lost to rounding
const EDGE_EPSILON: f32 = 1e-3;
const ELLIPSE_ITERATIONS: usize = 6;

/// A closed outline the shape tool can fill and stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Rectangle(Rect),
    /// Rectangle whose corners are quarter ellipses with radii `rx`, `ry`
    RoundedRectangle { rect: Rect, rx: f32, ry: f32 },
    /// Ellipse inscribed in the rectangle
    Ellipse(Rect),
}

impl Shape {
    /// Rounded rectangle with corner radii given as a percentage (0..=100)
    /// of half the rectangle's width and height
    pub fn rounded(rect: Rect, curve: u32) -> Self {
        let factor = curve.min(100) as f32 / 100.0;
        Shape::RoundedRectangle {
            rect,
            rx: rect.width() / 2.0 * factor,
            ry: rect.height() / 2.0 * factor,
        }
    }

    pub fn bounds(&self) -> Rect {
        match *self {
            Shape::Rectangle(rect) | Shape::Ellipse(rect) => rect,
            Shape::RoundedRectangle { rect, .. } => rect,
        }
    }

    /// Whether `q` lies inside the outline, points on it included
    fn contains(&self, q: Pos2) -> bool {
        match *self {
            Shape::Rectangle(rect) => within_box(rect, q, false),
            Shape::RoundedRectangle { rect, rx, ry } => {
                if rx <= 0.0 || ry <= 0.0 {
                    return within_box(rect, q, false);
                }
                let (core_min, core_max) = rounded_core(rect, rx, ry);
                let clamped = Pos2::new(q.x.clamp(core_min.x, core_max.x), q.y.clamp(core_min.y, core_max.y));
                let e = q - clamped;
                (e.x / rx).powi(2) + (e.y / ry).powi(2) <= 1.0
            }
            Shape::Ellipse(rect) => {
                let (a, b) = (rect.width() / 2.0, rect.height() / 2.0);
                if a <= 0.0 || b <= 0.0 {
                    return within_box(rect, q, false);
                }
                let d = q - rect.center();
                (d.x / a).powi(2) + (d.y / b).powi(2) <= 1.0
            }
        }
    }

    /// Whether `q` belongs to an outline stroked with half width `r`
    fn on_outline(&self, q: Pos2, r: f32, join: JoinStyle) -> bool {
        match *self {
            Shape::Rectangle(rect) => rect_ring(rect, q, r, join),
            Shape::RoundedRectangle { rect, rx, ry } if rx <= 0.0 || ry <= 0.0 => rect_ring(rect, q, r, join),
            Shape::RoundedRectangle { rect, rx, ry } => rounded_distance(rect, rx, ry, q, r) <= r + EDGE_EPSILON,
            Shape::Ellipse(rect) => {
                ellipse_distance(q - rect.center(), rect.width() / 2.0, rect.height() / 2.0, r) <= r + EDGE_EPSILON
            }
        }
    }

    /// Approximate arc-length position of `q` along the outline, used to
    /// phase dash patterns
    fn perimeter_position(&self, q: Pos2) -> f32 {
        match *self {
            Shape::Rectangle(rect) => {
                let (w, h) = (rect.width(), rect.height());
                let d_top = (q.y - rect.min.y).abs();
                let d_right = (q.x - rect.max.x).abs();
                let d_bottom = (q.y - rect.max.y).abs();
                let d_left = (q.x - rect.min.x).abs();
                let nearest = d_top.min(d_right).min(d_bottom).min(d_left);
                if nearest == d_top {
                    q.x - rect.min.x
                } else if nearest == d_right {
                    w + (q.y - rect.min.y)
                } else if nearest == d_bottom {
                    w + h + (rect.max.x - q.x)
                } else {
                    2.0 * w + h + (rect.max.y - q.y)
                }
            }
            Shape::RoundedRectangle { rect, .. } | Shape::Ellipse(rect) => {
                let d = q - rect.center();
                let mean_radius = (rect.width() + rect.height()) / 4.0;
                (d.y.atan2(d.x) + PI) * mean_radius
            }
        }
    }
}

fn within_box(rect: Rect, q: Pos2, strict: bool) -> bool {
    if strict {
        q.x > rect.min.x && q.x < rect.max.x && q.y > rect.min.y && q.y < rect.max.y
    } else {
        q.x >= rect.min.x && q.x <= rect.max.x && q.y >= rect.min.y && q.y <= rect.max.y
    }
}

/// Ring between the rectangle grown by `r` (outer corners shaped by `join`)
/// and the rectangle shrunk by `r`
fn rect_ring(rect: Rect, q: Pos2, r: f32, join: JoinStyle) -> bool {
    // distance outside the rectangle along each axis
    let dx = (rect.min.x - q.x).max(q.x - rect.max.x).max(0.0);
    let dy = (rect.min.y - q.y).max(q.y - rect.max.y).max(0.0);
    let outer = match join {
        JoinStyle::Miter => dx <= r && dy <= r,
        JoinStyle::Bevel => dx <= r && dy <= r && dx + dy <= r,
        JoinStyle::Round => dx.hypot(dy) <= r,
    };
    let inner = rect.shrink(r);
    let inside_inner = inner.min.x <= inner.max.x && inner.min.y <= inner.max.y && within_box(inner, q, true);
    outer && !inside_inner
}

/// Rectangle spanned by the centers of the corner arcs
fn rounded_core(rect: Rect, rx: f32, ry: f32) -> (Pos2, Pos2) {
    let rx = rx.min(rect.width() / 2.0);
    let ry = ry.min(rect.height() / 2.0);
    (
        Pos2::new(rect.min.x + rx, rect.min.y + ry),
        Pos2::new(rect.max.x - rx, rect.max.y - ry),
    )
}

fn segment_distance(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq == 0.0 {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

/// Distance from `p` to the outline of a rounded rectangle: four straight
/// edges plus a quarter ellipse at each corner. Like [`ellipse_distance`],
/// points farther than `limit` may get a lower bound.
fn rounded_distance(rect: Rect, rx: f32, ry: f32, p: Pos2, limit: f32) -> f32 {
    let (c0, c1) = rounded_core(rect, rx, ry);
    let (rx, ry) = (c0.x - rect.min.x, c0.y - rect.min.y);
    let edges = [
        (Pos2::new(c0.x, rect.min.y), Pos2::new(c1.x, rect.min.y)),
        (Pos2::new(c0.x, rect.max.y), Pos2::new(c1.x, rect.max.y)),
        (Pos2::new(rect.min.x, c0.y), Pos2::new(rect.min.x, c1.y)),
        (Pos2::new(rect.max.x, c0.y), Pos2::new(rect.max.x, c1.y)),
    ];
    let mut distance = edges
        .iter()
        .map(|&(a, b)| segment_distance(p, a, b))
        .fold(f32::INFINITY, f32::min);

    let corners = [
        (c0, Vec2::new(-1.0, -1.0)),
        (Pos2::new(c1.x, c0.y), Vec2::new(1.0, -1.0)),
        (Pos2::new(c0.x, c1.y), Vec2::new(-1.0, 1.0)),
        (c1, Vec2::new(1.0, 1.0)),
    ];
    for (center, outward) in corners {
        let local = (p - center) * outward;
        // outside its quadrant the nearest arc point is an arc end, which
        // the edges already cover
        if local.x >= 0.0 && local.y >= 0.0 {
            distance = distance.min(ellipse_distance(local, rx, ry, limit));
        }
    }
    distance
}

/// Distance from `p`, relative to the center, to the ellipse with semi-axes
/// `a` and `b`.
///
/// Points provably farther than `limit` return a lower bound instead of the
/// exact value.
fn ellipse_distance(p: Vec2, a: f32, b: f32, limit: f32) -> f32 {
    if a <= 0.0 || b <= 0.0 {
        return segment_distance(Pos2::ZERO + p, Pos2::new(-a.max(0.0), -b.max(0.0)), Pos2::new(a.max(0.0), b.max(0.0)));
    }
    let (px, py) = (p.x.abs(), p.y.abs());

    // the ellipse scaled by k lies at least |k - 1| * min(a, b) away
    let k = ((px / a).powi(2) + (py / b).powi(2)).sqrt();
    let bound = (k - 1.0).abs() * a.min(b);
    if bound > limit + 1.0 {
        return bound;
    }

    let (mut tx, mut ty) = (std::f32::consts::FRAC_1_SQRT_2, std::f32::consts::FRAC_1_SQRT_2);
    for _ in 0..ELLIPSE_ITERATIONS {
        let ex = (a * a - b * b) * tx.powi(3) / a;
        let ey = (b * b - a * a) * ty.powi(3) / b;
        let (rx, ry) = (a * tx - ex, b * ty - ey);
        let (qx, qy) = (px - ex, py - ey);
        let q = qx.hypot(qy);
        if q == 0.0 {
            break;
        }
        let r = rx.hypot(ry);
        tx = ((qx * r / q + ex) / a).clamp(0.0, 1.0);
        ty = ((qy * r / q + ey) / b).clamp(0.0, 1.0);
        let t = tx.hypot(ty);
        if t == 0.0 {
            break;
        }
        tx /= t;
        ty /= t;
    }
    (px - a * tx).hypot(py - b * ty)
}

pub fn put_pixel(img: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>) {
    if x < 0 || y < 0 || x as u32 >= img.width() || y as u32 >= img.height() {
        return;
    }
    img.put_pixel(x as u32, y as u32, color);
}

/// Integer pixel range covering `rect`, clipped to the image
fn pixel_span(img: &RgbaImage, rect: Rect) -> Option<(i32, i32, i32, i32)> {
    let x0 = rect.min.x.floor().max(0.0) as i32;
    let y0 = rect.min.y.floor().max(0.0) as i32;
    let x1 = rect.max.x.ceil().min(img.width() as f32 - 1.0) as i32;
    let y1 = rect.max.y.ceil().min(img.height() as f32 - 1.0) as i32;
    (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
}

/// Stroke a straight segment. A zero-length segment draws nothing.
pub fn stroke_segment(img: &mut RgbaImage, from: Pos2, to: Pos2, style: &StrokeStyle, color: Rgba<u8>) {
    let delta = to - from;
    let len = delta.length();
    if len == 0.0 {
        return;
    }
    let r = style.half_width();
    let dir = delta / len;
    let Some((x0, y0, x1, y1)) = pixel_span(img, Rect::from_two_pos(from, to).expand(r)) else {
        return;
    };

    for y in y0..=y1 {
        for x in x0..=x1 {
            let p = Pos2::new(x as f32, y as f32) - from;
            let along = p.dot(dir);
            let perp = (p.x * dir.y - p.y * dir.x).abs();
            let covered = match style.cap {
                CapStyle::Flat => along >= 0.0 && along <= len && perp <= r,
                CapStyle::Square => along >= -r && along <= len + r && perp <= r,
                CapStyle::Round => (p - dir * along.clamp(0.0, len)).length() <= r,
            };
            if covered && style.line.is_on(along.max(0.0), style.width as f32) {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Fill the interior of a shape, outline included
pub fn fill_shape(img: &mut RgbaImage, shape: &Shape, color: Rgba<u8>) {
    let Some((x0, y0, x1, y1)) = pixel_span(img, shape.bounds()) else {
        return;
    };
    for y in y0..=y1 {
        for x in x0..=x1 {
            if shape.contains(Pos2::new(x as f32, y as f32)) {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Stroke the outline of a shape: every pixel within half the stroke width
/// of it. Rectangle corners follow the join style.
pub fn stroke_shape(img: &mut RgbaImage, shape: &Shape, style: &StrokeStyle, color: Rgba<u8>) {
    let r = style.half_width();
    let Some((x0, y0, x1, y1)) = pixel_span(img, shape.bounds().expand(r)) else {
        return;
    };
    for y in y0..=y1 {
        for x in x0..=x1 {
            let q = Pos2::new(x as f32, y as f32);
            if shape.on_outline(q, r, style.join) && style.line.is_on(shape.perimeter_position(q), style.width as f32) {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Copy `src` onto `dst` with its top-left corner at `(x, y)`, clipped to `dst`
pub fn blit(dst: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    for (sx, sy, pixel) in src.enumerate_pixels() {
        put_pixel(dst, x + sx as i32, y + sy as i32, *pixel);
    }
}
