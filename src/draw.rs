// The desktop window host.
// Visual effects provided here:
// 1) A resizable window that shows the starfield frames.
// 2) Pointer/resize changes turned into events for the starfield.
// 3) Frames paced to the display (minifb's frame limiter).

use crate::backdrop::{Host, HostEvent};
use crate::error::Error;
use crate::types::FrameBuffer;
use minifb::{Key, MouseMode, Window, WindowOptions};

pub struct WindowHost {
    window: Window,                   // the on-screen window you see
    last_size: (usize, usize),
    last_pointer: Option<(f32, f32)>,
}

impl WindowHost {
    /// Open a resizable window.
    /// Visual: a new black window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize, target_fps: usize) -> Result<Self, Error> {
        let options = WindowOptions { resize: true, ..WindowOptions::default() };
        let mut window = Window::new(title, width, height, options)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(target_fps);
        let last_size = window.get_size();
        Ok(Self { window, last_size, last_pointer: None })
    }

    /// Pointer position in window pixels; None while it is outside the window.
    fn pointer(&self) -> Option<(f32, f32)> {
        self.window.get_mouse_pos(MouseMode::Discard)
    }
}

/// What changed between two pointer samples (None = outside the window).
fn pointer_event(last: Option<(f32, f32)>, now: Option<(f32, f32)>) -> Option<HostEvent> {
    match (last, now) {
        (_, Some((x, y))) if last != now => Some(HostEvent::PointerMove { x, y }),
        (Some(_), None) => Some(HostEvent::PointerLeave),
        _ => None,
    }
}

impl Host for WindowHost {
    fn viewport(&self) -> Option<(usize, usize)> {
        Some(self.window.get_size())
    }

    /// False when the user closes the window or holds ESC.
    fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    fn poll_events(&mut self, out: &mut Vec<HostEvent>) {
        let size = self.window.get_size();
        if size != self.last_size && size.0 > 0 && size.1 > 0 {
            self.last_size = size;
            out.push(HostEvent::Resize { width: size.0, height: size.1 });
        }

        let pointer = self.pointer();
        out.extend(pointer_event(self.last_pointer, pointer));
        self.last_pointer = pointer;
    }

    /// Push the pixels for this frame to the screen.
    /// Visual: the window immediately displays the new sky.
    fn present(&mut self, frame: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&frame.pixels, frame.width, frame.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }
}
