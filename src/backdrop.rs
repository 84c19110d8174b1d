// Lifecycle around the starfield: mount on a host surface, run one frame per
// display refresh, react to pointer/resize events, and tear everything down.
// Visual: the sky appears when mounted and freezes (no further frames) once
// torn down.

use crate::error::Error;
use crate::starfield::Starfield;
use crate::types::FrameBuffer;
use rand::Rng;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Input the host reports between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    PointerMove { x: f32, y: f32 },
    PointerLeave,
    Resize { width: usize, height: usize },
}

/// Where the sky is shown: a window, or a test double.
pub trait Host {
    /// Size of the drawable surface, or None when none could be acquired.
    fn viewport(&self) -> Option<(usize, usize)>;
    /// False once the user closed the surface.
    fn is_open(&self) -> bool;
    /// Drain everything that happened since the last call.
    fn poll_events(&mut self, out: &mut Vec<HostEvent>);
    /// Show a finished frame. Blocks until the next display refresh.
    fn present(&mut self, frame: &FrameBuffer) -> Result<(), Error>;
}

/// Handle for one requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRequest(u64);

/// At most one outstanding frame; cancelling invalidates it.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    next_id: u64,
    pending: Option<FrameRequest>,
}

impl FrameScheduler {
    pub fn request(&mut self) -> FrameRequest {
        self.next_id += 1;
        let req = FrameRequest(self.next_id);
        self.pending = Some(req);
        req
    }

    /// Consume the pending request so the frame can run.
    pub fn take(&mut self) -> Option<FrameRequest> {
        self.pending.take()
    }

    /// Returns whether a request was actually pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Which event kinds are currently delivered to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Listeners {
    pointer_move: bool,
    pointer_leave: bool,
    resize: bool,
}

impl Listeners {
    const ALL: Listeners = Listeners { pointer_move: true, pointer_leave: true, resize: true };
    const NONE: Listeners = Listeners { pointer_move: false, pointer_leave: false, resize: false };

    fn accepts(&self, event: &HostEvent) -> bool {
        match event {
            HostEvent::PointerMove { .. } => self.pointer_move,
            HostEvent::PointerLeave => self.pointer_leave,
            HostEvent::Resize { .. } => self.resize,
        }
    }
}

pub struct Backdrop<H: Host, R: Rng> {
    host: H,
    field: Starfield<R>,
    screen: FrameBuffer,
    frames: FrameScheduler,
    listeners: Listeners,
    events: Vec<HostEvent>,
    mounted_at: Instant,
    // FPS bookkeeping (debug log once per second)
    fps_window_start: Instant,
    frames_this_second: u32,
}

impl<H: Host, R: Rng> Backdrop<H, R> {
    /// Acquire the host surface and start animating.
    /// Returns None (and draws nothing) when the host has no usable surface.
    pub fn mount(host: H, rng: R) -> Option<Self> {
        let Some((width, height)) = host.viewport().filter(|&(w, h)| w > 0 && h > 0) else {
            debug!("no drawing surface available; starfield disabled");
            return None;
        };

        let mut field = Starfield::new(rng);
        field.resize(width, height);

        let now = Instant::now();
        let mut backdrop = Self {
            host,
            field,
            screen: FrameBuffer::new(width, height),
            frames: FrameScheduler::default(),
            listeners: Listeners::ALL,
            events: Vec::new(),
            mounted_at: now,
            fps_window_start: now,
            frames_this_second: 0,
        };
        backdrop.frames.request();
        info!(width, height, "starfield mounted");
        Some(backdrop)
    }

    pub fn field(&self) -> &Starfield<R> {
        &self.field
    }

    #[cfg(test)]
    pub fn screen(&self) -> &FrameBuffer {
        &self.screen
    }

    #[cfg(test)]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn is_running(&self) -> bool {
        self.frames.is_pending()
    }

    /// Run the pending frame, if any, and schedule the next one.
    /// Returns false once the loop has stopped.
    pub fn tick(&mut self) -> bool {
        if self.frames.take().is_none() {
            return false;
        }
        if !self.host.is_open() {
            self.teardown();
            return false;
        }

        self.dispatch_events();

        let time_ms = self.mounted_at.elapsed().as_secs_f64() * 1000.0;
        self.field.frame(&mut self.screen, time_ms);

        if let Err(e) = self.host.present(&self.screen) {
            warn!("stopping starfield: {e}");
            self.teardown();
            return false;
        }

        self.count_frame();
        self.frames.request();
        true
    }

    /// Keep ticking until the host closes or the loop is cancelled.
    pub fn run(&mut self) {
        while self.is_running() {
            self.tick();
        }
    }

    /// Cancel the pending frame and stop listening. Safe to call repeatedly;
    /// returns whether this call actually stopped anything.
    pub fn teardown(&mut self) -> bool {
        let was_listening = self.listeners != Listeners::NONE;
        let cancelled = self.frames.cancel();
        self.listeners = Listeners::NONE;
        self.events.clear();

        if was_listening {
            debug!(cancelled, "starfield torn down");
        }
        was_listening || cancelled
    }

    fn dispatch_events(&mut self) {
        self.host.poll_events(&mut self.events);
        for event in self.events.drain(..) {
            if !self.listeners.accepts(&event) {
                continue;
            }
            match event {
                HostEvent::PointerMove { x, y } => self.field.set_pointer(x, y),
                HostEvent::PointerLeave => self.field.clear_pointer(),
                HostEvent::Resize { width, height } => {
                    debug!(width, height, "viewport resized; regenerating stars");
                    self.screen.resize(width, height);
                    self.field.resize(width, height);
                }
            }
        }
    }

    fn count_frame(&mut self) {
        self.frames_this_second += 1;
        let elapsed = self.fps_window_start.elapsed();
        if elapsed >= Duration::from_secs(1) {
            let fps = self.frames_this_second as f32 / elapsed.as_secs_f32();
            debug!("FPS: {:.1}", fps);
            self.frames_this_second = 0;
            self.fps_window_start = Instant::now();
        }
    }
}

impl<H: Host, R: Rng> Drop for Backdrop<H, R> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::starfield::STAR_COUNT;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::VecDeque;

    /// Scripted host: a queue of events per frame and a present counter.
    struct FakeHost {
        size: Option<(usize, usize)>,
        open: bool,
        script: VecDeque<Vec<HostEvent>>,
        presented: usize,
        fail_present_at: Option<usize>,
        close_after: Option<usize>,
    }

    impl FakeHost {
        fn new(width: usize, height: usize) -> Self {
            Self {
                size: Some((width, height)),
                open: true,
                script: VecDeque::new(),
                presented: 0,
                fail_present_at: None,
                close_after: None,
            }
        }
    }

    impl Host for FakeHost {
        fn viewport(&self) -> Option<(usize, usize)> {
            self.size
        }
        fn is_open(&self) -> bool {
            self.open
        }
        fn poll_events(&mut self, out: &mut Vec<HostEvent>) {
            if let Some(batch) = self.script.pop_front() {
                out.extend(batch);
            }
        }
        fn present(&mut self, _frame: &FrameBuffer) -> Result<(), Error> {
            if self.fail_present_at == Some(self.presented) {
                return Err(Error::WindowUpdate("surface lost".into()));
            }
            self.presented += 1;
            if self.close_after == Some(self.presented) {
                self.open = false;
            }
            Ok(())
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn mount_declines_without_surface() {
        let mut host = FakeHost::new(0, 0);
        host.size = None;
        assert!(Backdrop::mount(host, rng()).is_none());
        assert!(Backdrop::mount(FakeHost::new(0, 600), rng()).is_none());
    }

    #[test]
    fn mount_sizes_field_and_schedules_first_frame() {
        let backdrop = Backdrop::mount(FakeHost::new(640, 480), rng()).unwrap();
        assert!(backdrop.is_running());
        assert_eq!(backdrop.field().stars().len(), STAR_COUNT);
        assert_eq!((backdrop.screen().width, backdrop.screen().height), (640, 480));
    }

    #[test]
    fn tick_presents_and_reschedules() {
        let mut backdrop = Backdrop::mount(FakeHost::new(320, 240), rng()).unwrap();
        assert!(backdrop.tick());
        assert!(backdrop.tick());
        assert_eq!(backdrop.host().presented, 2);
        assert!(backdrop.is_running());
    }

    #[test]
    fn pointer_events_reach_the_field() {
        let mut host = FakeHost::new(320, 240);
        host.script.push_back(vec![HostEvent::PointerMove { x: 10.0, y: 20.0 }]);
        host.script.push_back(vec![HostEvent::PointerLeave]);
        let mut backdrop = Backdrop::mount(host, rng()).unwrap();

        backdrop.tick();
        assert_eq!((backdrop.field().pointer().x, backdrop.field().pointer().y), (10.0, 20.0));
        backdrop.tick();
        assert_eq!(backdrop.field().pointer(), crate::types::Pointer::AWAY);
    }

    #[test]
    fn resize_event_regenerates_stars_and_buffer() {
        let mut host = FakeHost::new(320, 240);
        host.script.push_back(vec![HostEvent::Resize { width: 100, height: 50 }]);
        let mut backdrop = Backdrop::mount(host, rng()).unwrap();

        backdrop.tick();
        assert_eq!(backdrop.screen().pixels.len(), 100 * 50);
        assert_eq!(backdrop.field().stars().len(), STAR_COUNT);
        assert!(backdrop.field().stars().iter().all(|s| s.base_x < 100.0 && s.base_y < 50.0));
    }

    #[test]
    fn run_stops_when_host_closes() {
        let mut host = FakeHost::new(64, 64);
        host.close_after = Some(3);
        let mut backdrop = Backdrop::mount(host, rng()).unwrap();
        backdrop.run();
        assert_eq!(backdrop.host().presented, 3);
        assert!(!backdrop.is_running());
    }

    #[test]
    fn present_failure_stops_the_loop() {
        let mut host = FakeHost::new(64, 64);
        host.fail_present_at = Some(1);
        let mut backdrop = Backdrop::mount(host, rng()).unwrap();
        assert!(backdrop.tick());
        assert!(!backdrop.tick());
        assert!(!backdrop.is_running());
        assert!(!backdrop.tick());
    }

    #[test]
    fn teardown_is_idempotent() {
        let mut backdrop = Backdrop::mount(FakeHost::new(64, 64), rng()).unwrap();
        assert!(backdrop.teardown());
        assert!(!backdrop.teardown());
        assert!(!backdrop.is_running());
        assert!(!backdrop.tick());
        assert_eq!(backdrop.host().presented, 0);
    }

    #[test]
    fn events_after_teardown_are_ignored() {
        let mut backdrop = Backdrop::mount(FakeHost::new(64, 64), rng()).unwrap();
        backdrop.teardown();
        backdrop.frames.request();
        backdrop.host.script.push_back(vec![HostEvent::PointerMove { x: 5.0, y: 5.0 }]);
        backdrop.tick();
        assert_eq!(backdrop.field().pointer(), crate::types::Pointer::AWAY);
    }

    #[test]
    fn scheduler_cancel_reports_pending_state() {
        let mut frames = FrameScheduler::default();
        assert!(!frames.cancel());
        let first = frames.request();
        let second = frames.request();
        assert_ne!(first, second);
        assert!(frames.cancel());
        assert!(!frames.cancel());
        assert!(frames.take().is_none());
    }
}
