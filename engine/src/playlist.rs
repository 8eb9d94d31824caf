use anyhow::Result;
use glob::glob;
use std::path::{Path, PathBuf};

use crate::media::MediaKind;

/// Ordered media list with a play cursor.
///
/// Insertion order is the play order. The cursor always points at a valid
/// index while the playlist is non-empty and resets to 0 whenever the list
/// is replaced or cleared. Each playlist is owned by exactly one engine.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    /// Media paths in play order
    items: Vec<PathBuf>,

    /// Current position in the play order
    cursor: usize,
}

impl Playlist {
    /// Create a playlist from an ordered list of paths
    pub fn new(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            items: paths.into_iter().map(Into::into).collect(),
            cursor: 0,
        }
    }

    /// Build a playlist by scanning source paths (files, directories or
    /// glob patterns) for supported media files.
    pub fn from_sources(sources: &[String]) -> Result<Self> {
        let items = Self::scan_sources(sources)?;

        if items.is_empty() {
            anyhow::bail!("No media found in playlist sources");
        }

        log::info!("Created playlist with {} media files", items.len());

        Ok(Self { items, cursor: 0 })
    }

    /// Expand source paths into concrete media files.
    ///
    /// The result is sorted and deduplicated so overlapping sources (a
    /// directory plus a pattern inside it) never double-play an item.
    fn scan_sources(sources: &[String]) -> Result<Vec<PathBuf>> {
        let mut items: Vec<PathBuf> = sources
            .iter()
            .flat_map(|source| Self::expand_source(source))
            .collect();

        items.sort();
        items.dedup();

        Ok(items)
    }

    /// Resolve one source string into its playable files.
    ///
    /// A source is either a direct file path, a directory (every playable
    /// file in it, non-recursive) or a glob pattern. `~` expands to the
    /// home directory in all three forms.
    fn expand_source(source: &str) -> Vec<PathBuf> {
        let expanded = shellexpand::tilde(source);
        let path = Path::new(expanded.as_ref());

        let candidates: Vec<PathBuf> = if path.is_dir() {
            match std::fs::read_dir(path) {
                Ok(entries) => entries.flatten().map(|entry| entry.path()).collect(),
                Err(e) => {
                    log::warn!("Failed to read media directory '{}': {}", source, e);
                    Vec::new()
                }
            }
        } else if path.is_file() {
            vec![path.to_path_buf()]
        } else {
            match glob(&expanded) {
                Ok(entries) => entries.flatten().collect(),
                Err(e) => {
                    log::warn!("Failed to glob pattern '{}': {}", source, e);
                    Vec::new()
                }
            }
        };

        candidates
            .into_iter()
            .filter(|p| p.is_file() && MediaKind::of(p).is_playable())
            .collect()
    }

    /// Append a single media path
    pub fn push(&mut self, path: impl Into<PathBuf>) {
        self.items.push(path.into());
    }

    /// Replace the whole list, resetting the cursor to 0
    pub fn replace(&mut self, paths: impl IntoIterator<Item = impl Into<PathBuf>>) {
        self.clear();
        self.items.extend(paths.into_iter().map(Into::into));
    }

    /// Remove every item and reset the cursor
    pub fn clear(&mut self) {
        self.cursor = 0;
        self.items.clear();
    }

    /// Get the path under the cursor
    pub fn current(&self) -> Option<&Path> {
        self.items.get(self.cursor).map(|p| p.as_path())
    }

    /// Move the cursor forward, wrapping past the last item
    pub fn advance(&mut self) -> Option<&Path> {
        if self.items.is_empty() {
            return None;
        }

        self.cursor = (self.cursor + 1) % self.items.len();
        self.current()
    }

    /// Move the cursor backward, wrapping before the first item
    pub fn retreat(&mut self) -> Option<&Path> {
        if self.items.is_empty() {
            return None;
        }

        if self.cursor == 0 {
            self.cursor = self.items.len() - 1;
        } else {
            self.cursor -= 1;
        }

        self.current()
    }

    /// Whether the cursor sits on the last item
    pub fn is_last(&self) -> bool {
        !self.items.is_empty() && self.cursor == self.items.len() - 1
    }

    /// Number of items in the playlist
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the playlist holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current cursor position
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Playlist {
        Playlist::new(["/tmp/1.jpg", "/tmp/2.jpg", "/tmp/3.jpg"])
    }

    #[test]
    fn test_navigation() {
        let mut playlist = sample();

        assert_eq!(playlist.current(), Some(Path::new("/tmp/1.jpg")));

        playlist.advance();
        assert_eq!(playlist.current(), Some(Path::new("/tmp/2.jpg")));

        playlist.advance();
        assert_eq!(playlist.current(), Some(Path::new("/tmp/3.jpg")));

        playlist.advance();
        assert_eq!(playlist.current(), Some(Path::new("/tmp/1.jpg")));

        playlist.retreat();
        assert_eq!(playlist.current(), Some(Path::new("/tmp/3.jpg")));
    }

    #[test]
    fn test_advance_wraps_to_start_after_full_pass() {
        let mut playlist = sample();
        let start = playlist.cursor();

        for _ in 0..playlist.len() {
            playlist.advance();
        }

        assert_eq!(playlist.cursor(), start);
    }

    #[test]
    fn test_empty_playlist() {
        let mut playlist = Playlist::default();

        assert!(playlist.is_empty());
        assert_eq!(playlist.current(), None);
        assert_eq!(playlist.advance(), None);
        assert_eq!(playlist.retreat(), None);
        assert_eq!(playlist.cursor(), 0);
        assert!(!playlist.is_last());
    }

    #[test]
    fn test_replace_resets_cursor() {
        let mut playlist = sample();
        playlist.advance();
        assert_eq!(playlist.cursor(), 1);

        playlist.replace(["/tmp/a.mp4", "/tmp/b.mp4"]);
        assert_eq!(playlist.cursor(), 0);
        assert_eq!(playlist.len(), 2);
        assert_eq!(playlist.current(), Some(Path::new("/tmp/a.mp4")));
    }

    #[test]
    fn test_clear_resets_cursor() {
        let mut playlist = sample();
        playlist.advance();

        playlist.clear();
        assert!(playlist.is_empty());
        assert_eq!(playlist.cursor(), 0);
    }

    #[test]
    fn test_is_last() {
        let mut playlist = sample();
        assert!(!playlist.is_last());

        playlist.advance();
        playlist.advance();
        assert!(playlist.is_last());
    }

    #[test]
    fn test_from_sources_scans_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"x").unwrap();
        std::fs::write(dir.path().join("b.mp4"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let playlist =
            Playlist::from_sources(&[dir.path().to_string_lossy().to_string()]).unwrap();

        assert_eq!(playlist.len(), 2);
    }

    #[test]
    fn test_from_sources_mixes_files_and_patterns() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"x").unwrap();
        std::fs::write(dir.path().join("b.mp4"), b"x").unwrap();
        std::fs::write(dir.path().join("c.gif"), b"x").unwrap();

        let direct = dir.path().join("a.jpg").to_string_lossy().to_string();
        let pattern = format!("{}/*.mp4", dir.path().to_string_lossy());
        let playlist = Playlist::from_sources(&[direct, pattern]).unwrap();

        assert_eq!(playlist.len(), 2);
    }

    #[test]
    fn test_from_sources_classifies_uppercase_extensions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("shout.JPG"), b"x").unwrap();
        std::fs::write(dir.path().join("skip.TXT"), b"x").unwrap();

        let playlist =
            Playlist::from_sources(&[dir.path().to_string_lossy().to_string()]).unwrap();

        assert_eq!(playlist.len(), 1);
    }

    #[test]
    fn test_from_sources_deduplicates_overlapping_sources() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"x").unwrap();

        let as_dir = dir.path().to_string_lossy().to_string();
        let as_file = dir.path().join("a.jpg").to_string_lossy().to_string();
        let playlist = Playlist::from_sources(&[as_dir, as_file]).unwrap();

        assert_eq!(playlist.len(), 1);
    }

    #[test]
    fn test_from_sources_empty_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Playlist::from_sources(&[dir.path().to_string_lossy().to_string()]);
        assert!(result.is_err());
    }
}
