//! Playback engine for local-media slideshows.
//!
//! Drives an on-screen rotation of still images, animated images (GIF) and
//! video clips through three abstract render surfaces supplied by the host.
//! The engine owns the media list and cursor, decides what to show next and
//! for how long, and recovers from unplayable items (skip-forward) and video
//! playback errors (delayed cycle restart).
//!
//! # Concurrency model
//!
//! Single-threaded and event-driven. Delayed work (photo countdowns, restart
//! backoff, deferred video starts) lives in a cancellable task queue the host
//! drains by calling [`Slideshow::pump`] on its event loop; the surface
//! reports video completion through an event channel consumed on the same
//! turn. Nothing is shared across engine instances.
//!
//! # Examples
//!
//! ```no_run
//! use kioskshow_engine::{PlaybackSettings, Playlist, Slideshow};
//! # use kioskshow_engine::{MediaKind, RenderSurface};
//! # use std::path::Path;
//! # struct MySurface;
//! # impl RenderSurface for MySurface {
//! #     fn show_image(&mut self, _: &[u8]) -> anyhow::Result<()> { Ok(()) }
//! #     fn show_animated(&mut self, _: &str) -> anyhow::Result<()> { Ok(()) }
//! #     fn play_video(&mut self, _: &Path, _: f32) -> anyhow::Result<()> { Ok(()) }
//! #     fn hide(&mut self, _: MediaKind) {}
//! # }
//!
//! let playlist = Playlist::new(["/media/a.jpg", "/media/b.mp4"]);
//! let mut slideshow =
//!     Slideshow::with_playlist(MySurface, PlaybackSettings::default(), playlist);
//!
//! // Wire the completion-event handle into the surface implementation.
//! let events = slideshow.events();
//!
//! slideshow.start();
//! loop {
//!     let now = std::time::Instant::now();
//!     slideshow.pump(now);
//!     # break;
//!     // sleep until slideshow.time_until_next_task(now) ...
//! }
//! ```

mod config;
mod engine;
mod error;
mod media;
mod playlist;
mod surface;
mod timer;

pub use config::{Config, OverlaySettings, PlaybackSettings};
pub use engine::{Phase, RESTART_BACKOFF, SETTLE_DELAY, Slideshow, Status};
pub use error::PlaybackError;
pub use media::{MediaKind, animated_markup};
pub use playlist::Playlist;
pub use surface::{RenderSurface, SurfaceEvent, SurfaceEvents};
pub use timer::{Task, TaskKind, TaskQueue};
