// The drawing surface the starfield paints on, plus a software implementation
// over `FrameBuffer` (source-over alpha blending, no external crate).
// Visual outcomes:
// - Soft radial glows that fade to transparent at their rim.
// - Small solid discs with a one-pixel antialiased edge.
// - Hairline segments whose brightness scales with their width.

use crate::types::{FrameBuffer, Rgba};

/// One color stop of a radial gradient; `offset` in [0,1] from center to rim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgba,
}

/// What the renderer needs from a 2D drawing target.
pub trait Surface {
    /// Current size in pixels (width, height).
    fn size(&self) -> (usize, usize);
    /// Wipe everything drawn so far.
    fn clear(&mut self);
    /// Stroke a straight segment.
    fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, color: Rgba);
    /// Fill a disc with a radial gradient from its center outwards.
    fn fill_radial_glow(&mut self, cx: f32, cy: f32, radius: f32, stops: &[GradientStop]);
    /// Fill a disc with one color.
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba);
}

// ----------------------------- pixel blending ------------------------------------------

/// Source-over blend one color at (x,y).
/// Visual: the pixel moves towards `color` by its alpha; alpha 1 replaces it.
#[inline]
fn blend_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: Rgba) {
    if x < 0 || y < 0 { return; }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height { return; }

    let a = color.a.clamp(0.0, 1.0);
    if a <= 0.0 { return; }

    let idx = y * fb.width + x;
    let old = fb.pixels[idx];

    let or = ((old >> 16) & 0xFF) as f32;
    let og = ((old >> 8)  & 0xFF) as f32;
    let ob = ( old        & 0xFF) as f32;

    let mix = |src: u8, dst: f32| -> u32 {
        (src as f32 * a + dst * (1.0 - a)).round().clamp(0.0, 255.0) as u32
    };

    fb.pixels[idx] = (mix(color.r, or) << 16) | (mix(color.g, og) << 8) | mix(color.b, ob);
}

/// Color of a gradient at `t` in [0,1]; linear between neighbouring stops.
fn sample_gradient(stops: &[GradientStop], t: f32) -> Rgba {
    let Some(first) = stops.first() else { return Rgba::new(0, 0, 0, 0.0) };
    if t <= first.offset { return first.color; }

    for pair in stops.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if t <= hi.offset {
            let span = (hi.offset - lo.offset).max(f32::EPSILON);
            let k = (t - lo.offset) / span;
            let lerp_u8 = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * k).round() as u8;
            return Rgba {
                r: lerp_u8(lo.color.r, hi.color.r),
                g: lerp_u8(lo.color.g, hi.color.g),
                b: lerp_u8(lo.color.b, hi.color.b),
                a: lo.color.a + (hi.color.a - lo.color.a) * k,
            };
        }
    }
    stops[stops.len() - 1].color
}

/// Pixel bounding box of a disc, as inclusive integer ranges.
fn disc_bounds(cx: f32, cy: f32, radius: f32) -> (i32, i32, i32, i32) {
    (
        (cx - radius).floor() as i32,
        (cx + radius).ceil() as i32,
        (cy - radius).floor() as i32,
        (cy + radius).ceil() as i32,
    )
}

impl Surface for FrameBuffer {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        for p in &mut self.pixels { *p = 0; }
    }

    /// DDA walk along the segment, one blended dot per step.
    fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, color: Rgba) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as i32;
        // Sub-pixel widths light a pixel only partially.
        let color = color.with_alpha(color.a * width.clamp(0.0, 1.0));

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = (x0 + dx * t).round() as i32;
            let y = (y0 + dy * t).round() as i32;
            blend_pixel(self, x, y, color);
        }
    }

    fn fill_radial_glow(&mut self, cx: f32, cy: f32, radius: f32, stops: &[GradientStop]) {
        if radius <= 0.0 || stops.is_empty() { return; }
        let (x_min, x_max, y_min, y_max) = disc_bounds(cx, cy, radius);

        for y in y_min..=y_max {
            for x in x_min..=x_max {
                // Sample at the pixel center
                let d = (x as f32 + 0.5 - cx).hypot(y as f32 + 0.5 - cy);
                if d > radius { continue; }
                blend_pixel(self, x, y, sample_gradient(stops, d / radius));
            }
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba) {
        if radius <= 0.0 { return; }
        let (x_min, x_max, y_min, y_max) = disc_bounds(cx, cy, radius + 0.5);

        for y in y_min..=y_max {
            for x in x_min..=x_max {
                let d = (x as f32 + 0.5 - cx).hypot(y as f32 + 0.5 - cy);
                // 1px antialiased rim; tiny discs still light their center pixel
                let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
                if coverage <= 0.0 { continue; }
                blend_pixel(self, x, y, color.with_alpha(color.a * coverage));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(px: u32, shift: u32) -> u32 {
        (px >> shift) & 0xFF
    }

    #[test]
    fn opaque_circle_replaces_center_pixel() {
        let mut fb = FrameBuffer::new(10, 10);
        fb.fill_circle(5.0, 5.0, 2.0, Rgba::new(255, 245, 220, 1.0));
        assert_eq!(fb.pixels[5 * 10 + 5], 0x00FF_F5DC);
    }

    #[test]
    fn half_alpha_blends_over_black() {
        let mut fb = FrameBuffer::new(4, 4);
        blend_pixel(&mut fb, 1, 1, Rgba::new(200, 100, 50, 0.5));
        let px = fb.pixels[4 + 1];
        assert_eq!(channel(px, 16), 100);
        assert_eq!(channel(px, 8), 50);
        assert_eq!(channel(px, 0), 25);
    }

    #[test]
    fn out_of_bounds_drawing_is_ignored() {
        let mut fb = FrameBuffer::new(8, 8);
        fb.fill_circle(-50.0, -50.0, 3.0, Rgba::new(255, 255, 255, 1.0));
        fb.stroke_line(-20.0, -20.0, -5.0, -1.0, 1.0, Rgba::new(255, 255, 255, 1.0));
        assert!(fb.pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn glow_fades_towards_rim() {
        let stops = [
            GradientStop { offset: 0.0, color: Rgba::new(212, 175, 55, 1.0) },
            GradientStop { offset: 1.0, color: Rgba::new(180, 140, 40, 0.0) },
        ];
        let mut fb = FrameBuffer::new(41, 41);
        fb.fill_radial_glow(20.5, 20.5, 20.0, &stops);
        let center = channel(fb.pixels[20 * 41 + 20], 16);
        let near_rim = channel(fb.pixels[20 * 41 + 38], 16);
        assert!(center > near_rim);
        assert_eq!(fb.pixels[0], 0, "corner lies outside the disc");
    }

    #[test]
    fn gradient_sampling_interpolates_between_stops() {
        let stops = [
            GradientStop { offset: 0.0, color: Rgba::new(0, 0, 0, 1.0) },
            GradientStop { offset: 0.5, color: Rgba::new(100, 200, 50, 0.5) },
            GradientStop { offset: 1.0, color: Rgba::new(100, 200, 50, 0.0) },
        ];
        let mid = sample_gradient(&stops, 0.25);
        assert_eq!((mid.r, mid.g, mid.b), (50, 100, 25));
        assert!((mid.a - 0.75).abs() < 1e-6);
        assert_eq!(sample_gradient(&stops, 1.0).a, 0.0);
    }

    #[test]
    fn hairline_is_dimmer_than_full_width_line() {
        let gold = Rgba::new(212, 175, 55, 1.0);
        let mut thin = FrameBuffer::new(10, 3);
        let mut thick = FrameBuffer::new(10, 3);
        thin.stroke_line(0.0, 1.0, 9.0, 1.0, 0.5, gold);
        thick.stroke_line(0.0, 1.0, 9.0, 1.0, 1.0, gold);
        assert!(channel(thin.pixels[10 + 4], 16) < channel(thick.pixels[10 + 4], 16));
        assert_eq!(channel(thick.pixels[10 + 4], 16), 212);
    }

    #[test]
    fn clear_wipes_all_pixels() {
        let mut fb = FrameBuffer::new(5, 5);
        fb.fill_circle(2.5, 2.5, 2.0, Rgba::new(255, 255, 255, 1.0));
        fb.clear();
        assert!(fb.pixels.iter().all(|&p| p == 0));
    }
}
