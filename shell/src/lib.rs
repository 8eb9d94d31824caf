//! Fullscreen presentation shell for the kioskshow playback engine.
//!
//! Wraps one [`Slideshow`] in a blocking, non-dismissible fullscreen overlay
//! supplied by the host, forwards the host lifecycle into the engine and
//! turns a single tap anywhere on the overlay into stop-plus-close-callback.

use std::time::Instant;

use kioskshow_engine::{OverlaySettings, RenderSurface, Slideshow};

/// Host-side fullscreen overlay the shell presents the slideshow in.
///
/// `present` must show a blocking overlay that the platform back control
/// cannot dismiss; `dismiss` tears it down. Both are driven only by the
/// shell.
pub trait OverlayWindow {
    fn present(&mut self, width: u32, height: u32);
    fn dismiss(&mut self);
}

type CloseCallback = Box<dyn FnMut()>;

/// Fullscreen shell around one playback engine.
///
/// Thin compositional wrapper: all playback decisions stay in the engine,
/// the shell only sizes and shows the overlay and guards start/stop.
pub struct FullscreenShell<S: RenderSurface, O: OverlayWindow> {
    slideshow: Slideshow<S>,
    overlay: O,
    settings: OverlaySettings,
    running: bool,
    on_close: Option<CloseCallback>,
}

impl<S: RenderSurface, O: OverlayWindow> FullscreenShell<S, O> {
    /// Wrap an engine and an overlay with the given dimensions
    /// (1920x1080 by default)
    pub fn new(slideshow: Slideshow<S>, overlay: O, settings: OverlaySettings) -> Self {
        Self {
            slideshow,
            overlay,
            settings,
            running: false,
            on_close: None,
        }
    }

    /// Install the callback fired when the user dismisses the overlay
    pub fn set_on_close(&mut self, callback: impl FnMut() + 'static) {
        self.on_close = Some(Box::new(callback));
    }

    /// Present the overlay and begin playback.
    ///
    /// No-op while already running or with an empty media list.
    pub fn start(&mut self) {
        if !self.is_ready_to_start() {
            log::debug!("shell start ignored: not ready");
            return;
        }
        self.running = true;

        self.overlay
            .present(self.settings.width, self.settings.height);
        self.slideshow.start();
    }

    /// Stop playback and dismiss the overlay. Idempotent.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;

        self.slideshow.stop();
        self.overlay.dismiss();
    }

    /// Stop, then start again from the current cursor
    pub fn restart(&mut self) {
        self.stop();
        self.start();
    }

    /// Whether `start` would actually run
    pub fn is_ready_to_start(&self) -> bool {
        !self.running && !self.slideshow.is_empty_media_list()
    }

    /// Single tap anywhere on the overlay: stop and notify the host
    pub fn tapped(&mut self) {
        self.stop();
        if let Some(callback) = self.on_close.as_mut() {
            callback();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_empty_media_list(&self) -> bool {
        self.slideshow.is_empty_media_list()
    }

    /* ---------- host lifecycle ---------- */

    pub fn on_resume(&mut self) {
        self.slideshow.on_resume();
    }

    pub fn on_pause(&mut self) {
        self.slideshow.on_pause();
    }

    /// Forward one event-loop turn to the engine
    pub fn pump(&mut self, now: Instant) {
        self.slideshow.pump(now);
    }

    /// Tear everything down: engine resources, callbacks, overlay
    pub fn destroy(&mut self) {
        self.stop();
        self.slideshow.destroy();
        self.on_close = None;
    }

    /* ---------- engine access ---------- */

    pub fn slideshow(&self) -> &Slideshow<S> {
        &self.slideshow
    }

    pub fn slideshow_mut(&mut self) -> &mut Slideshow<S> {
        &mut self.slideshow
    }
}
