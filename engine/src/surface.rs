use std::path::Path;
use std::sync::mpsc::Sender;

use anyhow::Result;

use crate::media::MediaKind;

/// Abstract display target driven by the engine.
///
/// A surface shows exactly one active content kind at a time; the engine
/// hides the others before activating one. Implemented by the host on top
/// of its UI toolkit, never by the core.
pub trait RenderSurface {
    /// Show a still image from its raw file bytes (decoding is the
    /// platform's job)
    fn show_image(&mut self, bytes: &[u8]) -> Result<()>;

    /// Render HTML markup on the animated-image surface
    fn show_animated(&mut self, markup: &str) -> Result<()>;

    /// Start video playback asynchronously.
    ///
    /// `volume` already has the mute flag folded in. The surface must report
    /// exactly one of completed/error per playback through [`SurfaceEvents`].
    fn play_video(&mut self, path: &Path, volume: f32) -> Result<()>;

    /// Hide the surface for one content kind. Hiding the video surface must
    /// halt an active playback.
    fn hide(&mut self, kind: MediaKind);
}

/// Event pushed by the render surface back into the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// Video playback reached the end of the clip
    VideoCompleted,

    /// Platform decoder or renderer reported a playback error
    VideoError(String),
}

/// Handle the host wires into its surface implementation.
///
/// The surface pushes completion events here; the engine drains them
/// synchronously on its own turn, so surface callbacks never mutate engine
/// state from outside the engine's call stack.
#[derive(Debug, Clone)]
pub struct SurfaceEvents {
    tx: Sender<SurfaceEvent>,
}

impl SurfaceEvents {
    pub(crate) fn new(tx: Sender<SurfaceEvent>) -> Self {
        Self { tx }
    }

    /// Report that the current video played to completion
    pub fn video_completed(&self) {
        // Send only fails when the engine is gone; nothing left to notify.
        let _ = self.tx.send(SurfaceEvent::VideoCompleted);
    }

    /// Report a video playback error
    pub fn video_failed(&self, reason: impl Into<String>) {
        let _ = self.tx.send(SurfaceEvent::VideoError(reason.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_events_reach_receiver() {
        let (tx, rx) = mpsc::channel();
        let events = SurfaceEvents::new(tx);

        events.video_completed();
        events.video_failed("bad stream");

        assert_eq!(rx.try_recv().unwrap(), SurfaceEvent::VideoCompleted);
        assert_eq!(
            rx.try_recv().unwrap(),
            SurfaceEvent::VideoError("bad stream".to_string())
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_send_after_engine_drop_is_silent() {
        let (tx, rx) = mpsc::channel();
        let events = SurfaceEvents::new(tx);
        drop(rx);

        events.video_completed();
        events.video_failed("late error");
    }
}
