use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use crate::config::PlaybackSettings;
use crate::error::PlaybackError;
use crate::media::{self, MediaKind};
use crate::playlist::Playlist;
use crate::surface::{RenderSurface, SurfaceEvent, SurfaceEvents};
use crate::timer::{Task, TaskKind, TaskQueue};

/// Backoff before the cycle-restart recovery kicks in after a video error
pub const RESTART_BACKOFF: Duration = Duration::from_secs(1);

/// Delay between surface teardown and re-dispatch on manual navigation,
/// so re-render never races the teardown
pub const SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Engine phase.
///
/// `Ended` is only reachable with repeat disabled, when the playlist is
/// exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    ShowingImage,
    ShowingAnimated,
    ShowingVideo,
    Ended,
}

impl Phase {
    /// Content kind currently on a surface, if any
    pub fn kind(self) -> Option<MediaKind> {
        match self {
            Self::ShowingImage => Some(MediaKind::Image),
            Self::ShowingAnimated => Some(MediaKind::AnimatedImage),
            Self::ShowingVideo => Some(MediaKind::Video),
            Self::Idle | Self::Ended => None,
        }
    }
}

/// Snapshot of the engine's playback state
#[derive(Debug, Clone)]
pub struct Status {
    pub cursor: usize,
    pub kind: Option<MediaKind>,
    pub is_playing: bool,
    pub is_repeating: bool,
}

type EventSink = Box<dyn FnMut(&str)>;
type EndedCallback = Box<dyn FnMut()>;

/// Playback engine: owns the playlist and drives the render surfaces.
///
/// Single-threaded and event-driven: every transition happens inside the
/// caller's turn, either directly through a control method or inside
/// [`Slideshow::pump`], which drains surface events and fires due scheduled
/// tasks. There is no locking because only one logical turn of the state
/// machine ever executes at a time.
pub struct Slideshow<S: RenderSurface> {
    surface: S,
    playlist: Playlist,
    settings: PlaybackSettings,
    phase: Phase,
    playing: bool,
    tasks: TaskQueue,
    events: Receiver<SurfaceEvent>,
    events_handle: SurfaceEvents,

    /// Raw bytes of the image currently on the surface; released
    /// unconditionally before the next acquisition and on teardown
    image_buf: Option<Vec<u8>>,

    end_fired: bool,
    destroyed: bool,
    event_sink: Option<EventSink>,
    on_playlist_ended: Option<EndedCallback>,
}

impl<S: RenderSurface> Slideshow<S> {
    /// Create an engine with an empty playlist
    pub fn new(surface: S, settings: PlaybackSettings) -> Self {
        let (tx, rx) = mpsc::channel();

        Self {
            surface,
            playlist: Playlist::default(),
            settings,
            phase: Phase::Idle,
            playing: false,
            tasks: TaskQueue::new(),
            events: rx,
            events_handle: SurfaceEvents::new(tx),
            image_buf: None,
            end_fired: false,
            destroyed: false,
            event_sink: None,
            on_playlist_ended: None,
        }
    }

    /// Create an engine with an initial playlist
    pub fn with_playlist(surface: S, settings: PlaybackSettings, playlist: Playlist) -> Self {
        let mut engine = Self::new(surface, settings);
        engine.playlist = playlist;
        engine
    }

    /// Handle the host wires into the surface so it can report
    /// video completion and errors
    pub fn events(&self) -> SurfaceEvents {
        self.events_handle.clone()
    }

    /* ---------- control ---------- */

    /// Begin playback at the current cursor.
    ///
    /// No-op while already playing (duplicate-start guard) and silently
    /// refuses on an empty playlist.
    pub fn start(&mut self) {
        if self.destroyed {
            log::debug!("start ignored: engine destroyed");
            return;
        }
        self.begin(Instant::now());
    }

    fn begin(&mut self, now: Instant) {
        if self.playing {
            log::debug!("start ignored: already playing");
            return;
        }
        if self.playlist.is_empty() {
            log::debug!("start refused: media list is empty");
            return;
        }

        self.playing = true;
        self.end_fired = false;
        self.phase = Phase::Idle;
        self.dispatch(now);
    }

    /// Halt playback: cancel all scheduled tasks, hide every surface,
    /// release the held image buffer. Idempotent.
    pub fn stop(&mut self) {
        if self.destroyed {
            return;
        }
        self.halt();
    }

    fn halt(&mut self) {
        if !self.playing && self.phase == Phase::Idle && self.tasks.is_empty() {
            return;
        }

        self.tasks.clear();
        self.hide_all();
        self.release_image();
        self.playing = false;
        self.phase = Phase::Idle;
    }

    /// Stop and start the whole playback cycle after a 1 second backoff
    pub fn restart(&mut self) {
        if self.destroyed {
            return;
        }
        self.trace("restarting playback in 1 second".to_string());
        self.tasks.schedule(Task::RestartCycle, RESTART_BACKOFF, Instant::now());
    }

    /// Manually advance to the next item.
    ///
    /// Follows the same end-of-playlist rules as automatic advancement.
    pub fn next(&mut self) {
        if self.destroyed || !self.playing {
            return;
        }
        self.advance(Instant::now());
    }

    /// Manually step back to the previous item.
    ///
    /// Like [`Slideshow::next`] this requires an engine that is playing.
    /// Tears the surfaces down first and re-dispatches after a short settle
    /// delay.
    pub fn back(&mut self) {
        if self.destroyed || !self.playing || self.playlist.is_empty() {
            return;
        }

        self.halt();
        self.playlist.retreat();
        self.playing = true;
        self.end_fired = false;
        self.tasks.schedule(Task::Redispatch, SETTLE_DELAY, Instant::now());
    }

    /// Run one turn of the state machine: drain surface events, then fire
    /// every scheduled task whose deadline has passed.
    pub fn pump(&mut self, now: Instant) {
        if self.destroyed {
            return;
        }

        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event, now);
        }

        while let Some(task) = self.tasks.pop_due(now) {
            self.handle_task(task, now);
        }
    }

    /// Time until the next scheduled task is due, for host loop pacing
    pub fn time_until_next_task(&self, now: Instant) -> Option<Duration> {
        self.tasks.time_until_next(now)
    }

    /* ---------- host lifecycle ---------- */

    /// Host came to the foreground; start if not already playing
    pub fn on_resume(&mut self) {
        if self.destroyed {
            return;
        }
        if !self.playing {
            self.begin(Instant::now());
        }
    }

    /// Host went to the background; stop if playing
    pub fn on_pause(&mut self) {
        if self.destroyed {
            return;
        }
        if self.playing {
            self.halt();
        }
    }

    /// Tear the engine down: cancel everything, hide surfaces, release the
    /// image buffer, drop host callbacks.
    ///
    /// Idempotent; every engine call after the first `destroy` is a no-op.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }

        self.halt();
        self.event_sink = None;
        self.on_playlist_ended = None;
        self.destroyed = true;
        log::debug!("engine destroyed");
    }

    /* ---------- playlist mutation ---------- */

    /// Append one media path; effective on the next dispatch
    pub fn add_media(&mut self, path: impl Into<PathBuf>) {
        if self.destroyed {
            return;
        }
        self.playlist.push(path);
    }

    /// Replace the playlist wholesale and reset the cursor to 0
    pub fn update_media(&mut self, paths: impl IntoIterator<Item = impl Into<PathBuf>>) {
        if self.destroyed {
            return;
        }
        self.playlist.replace(paths);
    }

    /// Drop every playlist item and reset the cursor
    pub fn clear_media(&mut self) {
        if self.destroyed {
            return;
        }
        self.playlist.clear();
    }

    pub fn is_empty_media_list(&self) -> bool {
        self.playlist.is_empty()
    }

    /* ---------- configuration ---------- */

    pub fn set_photo_delay(&mut self, secs: u64) {
        self.settings.photo_delay_secs = secs.max(1);
    }

    pub fn set_mute(&mut self, mute: bool) {
        self.settings.mute_video = mute;
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.settings.volume = volume.clamp(0.0, 1.0);
    }

    pub fn set_repeat(&mut self, repeat: bool) {
        self.settings.repeat = repeat;
    }

    /// Install a sink receiving the engine's human-readable trace lines
    pub fn set_event_sink(&mut self, sink: impl FnMut(&str) + 'static) {
        self.event_sink = Some(Box::new(sink));
    }

    /// Install the one-shot callback fired when the playlist ends
    /// (meaningful only with repeat disabled)
    pub fn set_on_playlist_ended(&mut self, callback: impl FnMut() + 'static) {
        self.on_playlist_ended = Some(Box::new(callback));
    }

    /* ---------- queries ---------- */

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn settings(&self) -> &PlaybackSettings {
        &self.settings
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Snapshot of the current playback state
    pub fn status(&self) -> Status {
        Status {
            cursor: self.playlist.cursor(),
            kind: self.phase.kind(),
            is_playing: self.playing,
            is_repeating: self.settings.repeat,
        }
    }

    /* ---------- internals ---------- */

    fn handle_event(&mut self, event: SurfaceEvent, now: Instant) {
        if !self.playing {
            // Late event from a surface that was already torn down
            log::debug!("surface event ignored while not playing: {:?}", event);
            return;
        }

        match event {
            SurfaceEvent::VideoCompleted => {
                if self.phase == Phase::ShowingVideo {
                    self.advance(now);
                }
            }
            SurfaceEvent::VideoError(reason) => {
                let err = PlaybackError::Playback(reason);
                log::warn!("{}", err);
                self.trace(format!("{err}; restarting in 1 second"));
                // Cycle-restart policy: recover the whole pipeline, not
                // just the failing item
                self.tasks.clear();
                self.tasks.schedule(Task::RestartCycle, RESTART_BACKOFF, now);
            }
        }
    }

    fn handle_task(&mut self, task: Task, now: Instant) {
        match task {
            Task::AdvanceSlide => {
                if self.playing {
                    self.advance(now);
                }
            }
            Task::StartVideo(path) => self.start_video(&path, now),
            Task::RestartCycle => {
                self.halt();
                self.begin(now);
            }
            Task::Redispatch => {
                if self.playing {
                    self.dispatch(now);
                }
            }
        }
    }

    /// Move past the current item, wrapping or ending depending on the
    /// repeat flag, then dispatch.
    fn advance(&mut self, now: Instant) {
        if self.playlist.is_empty() {
            self.halt();
            return;
        }

        self.tasks.cancel(TaskKind::AdvanceSlide);
        self.tasks.cancel(TaskKind::StartVideo);

        if self.playlist.is_last() && !self.settings.repeat {
            self.finish();
            return;
        }

        self.playlist.advance();
        self.dispatch(now);
    }

    /// Playlist exhausted with repeat disabled: enter the terminal phase and
    /// fire the end callback exactly once.
    fn finish(&mut self) {
        self.trace("playlist ended".to_string());

        self.tasks.clear();
        self.hide_all();
        self.release_image();
        self.playing = false;
        self.phase = Phase::Ended;

        if !self.end_fired {
            self.end_fired = true;
            if let Some(callback) = self.on_playlist_ended.as_mut() {
                callback();
            }
        }
    }

    /// Resolve the item under the cursor and activate the matching surface.
    ///
    /// Missing files and unsupported extensions are skipped forward, bounded
    /// to one full pass of the playlist.
    fn dispatch(&mut self, now: Instant) {
        let len = self.playlist.len();
        if len == 0 {
            self.halt();
            return;
        }

        for _ in 0..len {
            let Some(path) = self.playlist.current().map(Path::to_path_buf) else {
                return;
            };
            let cursor = self.playlist.cursor();

            if !path.is_file() {
                let err = PlaybackError::MissingFile(path);
                self.trace(format!("#{cursor} [SKIP] {err}"));
                if !self.skip_forward() {
                    return;
                }
                continue;
            }

            match MediaKind::of(&path) {
                MediaKind::Unsupported => {
                    let err = PlaybackError::UnsupportedFormat(path);
                    self.trace(format!("#{cursor} [SKIP] {err}"));
                    if !self.skip_forward() {
                        return;
                    }
                }
                MediaKind::Image => match fs::read(&path) {
                    Ok(bytes) => {
                        self.trace(format!("#{cursor} [PASS] {}", path.display()));
                        self.present_image(bytes, now);
                        return;
                    }
                    Err(e) => {
                        let err = PlaybackError::from(e);
                        self.trace(format!(
                            "#{cursor} [SKIP] {}: {err}",
                            path.display()
                        ));
                        if !self.skip_forward() {
                            return;
                        }
                    }
                },
                MediaKind::AnimatedImage => {
                    self.trace(format!("#{cursor} [PASS] {}", path.display()));
                    self.present_animated(&path, now);
                    return;
                }
                MediaKind::Video => {
                    self.trace(format!("#{cursor} [PASS] {}", path.display()));
                    self.queue_video(path, now);
                    return;
                }
            }
        }

        // Full pass without a single playable item. Stop cleanly so a later
        // start() can retry once media becomes available.
        log::warn!("No playable media in playlist, stopping");
        self.halt();
    }

    /// Advance the cursor past an unplayable item.
    ///
    /// Returns false when the playlist ended instead (repeat disabled).
    fn skip_forward(&mut self) -> bool {
        if self.playlist.is_last() && !self.settings.repeat {
            self.finish();
            return false;
        }

        self.playlist.advance();
        true
    }

    fn present_image(&mut self, bytes: Vec<u8>, now: Instant) {
        self.surface.hide(MediaKind::Video);
        self.surface.hide(MediaKind::AnimatedImage);
        self.release_image();

        if let Err(e) = self.surface.show_image(&bytes) {
            log::warn!("Surface failed to show image: {}", e);
        }
        self.image_buf = Some(bytes);
        self.phase = Phase::ShowingImage;

        self.arm_photo_timer(now);
    }

    fn present_animated(&mut self, path: &Path, now: Instant) {
        self.surface.hide(MediaKind::Video);
        self.surface.hide(MediaKind::Image);
        self.release_image();

        let markup = media::animated_markup(path);
        if let Err(e) = self.surface.show_animated(&markup) {
            log::warn!("Surface failed to show animated image: {}", e);
        }
        self.phase = Phase::ShowingAnimated;

        self.arm_photo_timer(now);
    }

    /// Arm the per-item display countdown.
    ///
    /// A single-item playlist displays indefinitely without re-triggering.
    fn arm_photo_timer(&mut self, now: Instant) {
        if self.playlist.len() <= 1 {
            return;
        }

        self.tasks.schedule(
            Task::AdvanceSlide,
            Duration::from_secs(self.settings.photo_delay_secs),
            now,
        );
    }

    fn queue_video(&mut self, path: PathBuf, now: Instant) {
        self.surface.hide(MediaKind::Image);
        self.surface.hide(MediaKind::AnimatedImage);
        self.release_image();
        self.phase = Phase::ShowingVideo;

        // Deferred by one task-queue turn so dispatch never blocks on
        // decoder preparation. A fresh playback is initiated per video item.
        self.tasks.schedule(Task::StartVideo(path), Duration::ZERO, now);
    }

    fn start_video(&mut self, path: &Path, now: Instant) {
        if !self.playing || self.phase != Phase::ShowingVideo {
            return;
        }

        let volume = self.settings.effective_volume();
        if let Err(e) = self.surface.play_video(path, volume) {
            let err = PlaybackError::Playback(e.to_string());
            log::warn!("{} ({})", err, path.display());
            self.trace(format!("{err}; restarting in 1 second"));
            self.tasks.clear();
            self.tasks.schedule(Task::RestartCycle, RESTART_BACKOFF, now);
        }
    }

    fn hide_all(&mut self) {
        self.surface.hide(MediaKind::Image);
        self.surface.hide(MediaKind::AnimatedImage);
        self.surface.hide(MediaKind::Video);
    }

    fn release_image(&mut self) {
        self.image_buf = None;
    }

    fn trace(&mut self, line: String) {
        log::debug!("{}", line);
        if let Some(sink) = self.event_sink.as_mut() {
            sink(&line);
        }
    }
}
