// The ambient starfield: 200 warm-gold stars that drift away from the pointer,
// relax back to their anchors, and link up with faint lines near the pointer.
// Visual outcomes:
// - Moving the pointer through the field pushes stars aside; they ease home.
// - Stars near the pointer glow brighter and larger.
// - On narrow windows every star breathes (pulses) at its own pace.

use crate::surface::{GradientStop, Surface};
use crate::types::{Pointer, Rgba, Star, ViewportMode};
use rand::Rng;
use std::f32::consts::TAU;

pub const STAR_COUNT: usize = 200;
/// Pointer range for repulsion and line eligibility (px).
pub const INTERACTION_RADIUS: f32 = 150.0;
pub const REPEL_STRENGTH: f32 = 0.15;
/// Fraction of the gap to the anchor closed every frame.
pub const RETURN_SPEED: f32 = 0.05;
/// Max separation of two linked stars (px).
pub const CONNECTION_DISTANCE: f32 = 80.0;
/// Pointer range of the brightness boost (px).
pub const PROXIMITY_RADIUS: f32 = 120.0;

const GOLD: Rgba = Rgba::new(212, 175, 55, 1.0);
const DEEP_GOLD: Rgba = Rgba::new(180, 140, 40, 1.0);
const CORE: Rgba = Rgba::new(255, 245, 220, 1.0);
const LINE_WIDTH: f32 = 0.5;

/// Uniform in [lo, hi); collapses to `lo` for an empty range (zero-sized viewport).
fn uniform<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.gen_range(lo..hi) } else { lo }
}

/// Owns the stars, the pointer and the random source. One per drawing surface.
pub struct Starfield<R: Rng> {
    rng: R,
    stars: Vec<Star>,
    pointer: Pointer,
    mode: ViewportMode,
}

impl<R: Rng> Starfield<R> {
    /// Empty field; call `resize` before the first frame.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            stars: Vec::with_capacity(STAR_COUNT),
            pointer: Pointer::AWAY,
            mode: ViewportMode::Desktop,
        }
    }

    /// Throw away every star and scatter a fresh set over `width` x `height`.
    /// Visual: the whole sky is re-seeded; stars start at rest on their anchors.
    pub fn resize(&mut self, width: usize, height: usize) {
        let (w, h) = (width as f32, height as f32);
        self.stars.clear();
        for _ in 0..STAR_COUNT {
            let x = uniform(&mut self.rng, 0.0, w);
            let y = uniform(&mut self.rng, 0.0, h);
            let star = Star {
                x,
                y,
                base_x: x,
                base_y: y,
                size: uniform(&mut self.rng, 0.5, 2.5),
                opacity: uniform(&mut self.rng, 0.3, 0.8),
                twinkle_speed: uniform(&mut self.rng, 0.01, 0.03),
                twinkle_offset: uniform(&mut self.rng, 0.0, TAU),
            };
            self.stars.push(star);
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    #[cfg(test)]
    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    pub fn mode(&self) -> ViewportMode {
        self.mode
    }

    /// Pointer moved to (x,y) in surface pixels.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer = Pointer { x, y };
    }

    /// Pointer left the surface; nothing reacts until it comes back.
    pub fn clear_pointer(&mut self) {
        self.pointer = Pointer::AWAY;
    }

    /// Advance one animation tick: move, then paint.
    pub fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S, time_ms: f64) {
        self.update();
        self.render(surface, time_ms);
    }

    /// Position step for every star: repulsion inside the interaction radius,
    /// then relaxation toward the anchor (always, after repulsion).
    pub fn update(&mut self) {
        let pointer = self.pointer;
        for star in &mut self.stars {
            let dx = star.x - pointer.x;
            let dy = star.y - pointer.y;
            let distance = dx.hypot(dy);

            if distance > 0.0 && distance < INTERACTION_RADIUS {
                let force = (INTERACTION_RADIUS - distance) / INTERACTION_RADIUS;
                let angle = dy.atan2(dx);
                star.x += angle.cos() * force * REPEL_STRENGTH * 10.0;
                star.y += angle.sin() * force * REPEL_STRENGTH * 10.0;
            }

            star.x += (star.base_x - star.x) * RETURN_SPEED;
            star.y += (star.base_y - star.y) * RETURN_SPEED;
        }
    }

    /// Paint the current state. The viewport mode is re-read from the surface
    /// width on every call so orientation changes take effect immediately.
    pub fn render<S: Surface + ?Sized>(&mut self, surface: &mut S, time_ms: f64) {
        let (width, _) = surface.size();
        self.mode = ViewportMode::for_width(width);

        surface.clear();
        self.draw_connections(surface);
        for star in &self.stars {
            self.draw_star(surface, star, time_ms);
        }
    }

    /// Every linked pair: both ends near the pointer and close to each other.
    /// Returned as (i, j, opacity) with i < j.
    pub fn connections(&self) -> Vec<(usize, usize, f32)> {
        let pointer = self.pointer;
        let mut out = Vec::new();

        for (i, star) in self.stars.iter().enumerate() {
            let dist_to_pointer = pointer.distance_to(star.x, star.y);
            if dist_to_pointer >= INTERACTION_RADIUS { continue; }

            for (j, other) in self.stars.iter().enumerate().skip(i + 1) {
                let dist_between = (star.x - other.x).hypot(star.y - other.y);
                if dist_between >= CONNECTION_DISTANCE { continue; }
                if pointer.distance_to(other.x, other.y) >= INTERACTION_RADIUS { continue; }

                let opacity = (1.0 - dist_between / CONNECTION_DISTANCE)
                    * (1.0 - dist_to_pointer / INTERACTION_RADIUS)
                    * 0.4;
                out.push((i, j, opacity));
            }
        }
        out
    }

    fn draw_connections<S: Surface + ?Sized>(&self, surface: &mut S) {
        for (i, j, opacity) in self.connections() {
            let (a, b) = (&self.stars[i], &self.stars[j]);
            surface.stroke_line(a.x, a.y, b.x, b.y, LINE_WIDTH, GOLD.with_alpha(opacity));
        }
    }

    fn draw_star<S: Surface + ?Sized>(&self, surface: &mut S, star: &Star, time_ms: f64) {
        let look = star_appearance(star, self.pointer, self.mode, time_ms);
        let g = look.glow_opacity;

        let stops = [
            GradientStop { offset: 0.0, color: GOLD.with_alpha((g * 0.8).min(1.0)) },
            GradientStop { offset: 0.3, color: GOLD.with_alpha((g * 0.4).min(0.8)) },
            GradientStop { offset: 0.6, color: DEEP_GOLD.with_alpha((g * 0.2).min(0.5)) },
            GradientStop { offset: 1.0, color: DEEP_GOLD.with_alpha(0.0) },
        ];
        surface.fill_radial_glow(star.x, star.y, look.glow_size, &stops);
        surface.fill_circle(star.x, star.y, star.size, CORE.with_alpha((g + 0.2).min(1.0)));
    }
}

/// How brightly and how wide one star glows this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    pub glow_opacity: f32,
    pub glow_size: f32,
}

/// Brightness boost from pointer proximity: 0 beyond 120px, up to 0.8 on top.
pub fn proximity_boost(distance: f32) -> f32 {
    if distance < PROXIMITY_RADIUS {
        (1.0 - distance / PROXIMITY_RADIUS) * 0.8
    } else {
        0.0
    }
}

/// Breathing multipliers (opacity, glow size) for compact viewports.
/// Opacity swings 0.4..1.2, size 0.7..1.3, each star on its own phase.
pub fn breathing(star: &Star, time_ms: f64) -> (f32, f32) {
    let speed = 0.002 + star.twinkle_speed as f64 * 0.003;
    let cycle = (time_ms * speed + star.twinkle_offset as f64).sin() as f32;
    (0.8 + cycle * 0.4, 1.0 + cycle * 0.3)
}

pub fn star_appearance(star: &Star, pointer: Pointer, mode: ViewportMode, time_ms: f64) -> Appearance {
    let boost = proximity_boost(pointer.distance_to(star.x, star.y));
    let (breath, size_mul) = match mode {
        ViewportMode::Compact => breathing(star, time_ms),
        ViewportMode::Desktop => (1.0, 1.0),
    };

    Appearance {
        glow_opacity: (star.opacity * 0.6 + boost) * breath,
        glow_size: star.size * (4.0 + boost * 2.0) * size_mul,
    }
}
