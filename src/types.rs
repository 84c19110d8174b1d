// Core types shared by the starfield, the drawing surface and the window host.

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the surface is on screen (pixels)
    pub height: usize,     // how tall the surface is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A black surface of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Resize in place; the content is discarded (black).
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, 0);
    }
}

/// Straight (non-premultiplied) color with alpha in [0,1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// One particle of the ambient field.
/// Visual: a warm-gold glow with a near-white core.
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub base_x: f32,        // rest anchor, fixed until the next resize
    pub base_y: f32,
    pub size: f32,          // core radius in pixels
    pub opacity: f32,       // base brightness
    pub twinkle_speed: f32,
    pub twinkle_offset: f32,
}

/// Last known pointer location, or far away when it left the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
}

impl Pointer {
    /// Far enough off-surface that no star is ever in range.
    pub const AWAY: Pointer = Pointer { x: -1000.0, y: -1000.0 };

    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        (x - self.x).hypot(y - self.y)
    }
}

/// Rendering mode, recomputed every frame from the surface width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportMode {
    Desktop,
    /// Narrow layouts: stars breathe on their own.
    Compact,
}

impl ViewportMode {
    pub const COMPACT_BREAKPOINT: usize = 768;

    pub fn for_width(width: usize) -> Self {
        if width < Self::COMPACT_BREAKPOINT { ViewportMode::Compact } else { ViewportMode::Desktop }
    }
}
