use std::path::Path;

/// Extensions rendered on the still-image surface
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Extensions rendered through the HTML-capable surface (platform animates them)
const ANIMATED_EXTENSIONS: &[&str] = &["gif"];

/// Extensions handed to the video surface
const VIDEO_EXTENSIONS: &[&str] = &["mp4"];

/// The kind of content a media path resolves to.
///
/// Derived lazily from the filename extension (case-insensitive); whether the
/// file actually exists is only checked when the item comes up for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Still image shown on the image surface
    Image,
    /// Animated image (GIF) shown via the HTML-capable surface
    AnimatedImage,
    /// Video clip played on the video surface
    Video,
    /// Extension not in any known set; skipped at dispatch time
    Unsupported,
}

impl MediaKind {
    /// Classify a path by its extension
    pub fn of(path: impl AsRef<Path>) -> Self {
        let Some(ext) = path.as_ref().extension().and_then(|e| e.to_str()) else {
            return Self::Unsupported;
        };

        if matches_extension(ext, IMAGE_EXTENSIONS) {
            Self::Image
        } else if matches_extension(ext, ANIMATED_EXTENSIONS) {
            Self::AnimatedImage
        } else if matches_extension(ext, VIDEO_EXTENSIONS) {
            Self::Video
        } else {
            Self::Unsupported
        }
    }

    /// Whether this kind can be put on a render surface
    pub fn is_playable(self) -> bool {
        !matches!(self, Self::Unsupported)
    }

    /// Human-readable kind name for logging
    pub fn name(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::AnimatedImage => "animated-image",
            Self::Video => "video",
            Self::Unsupported => "unsupported",
        }
    }
}

/// Check an extension against a known set, case-insensitively
fn matches_extension(ext: &str, set: &[&str]) -> bool {
    set.iter().any(|e| e.eq_ignore_ascii_case(ext))
}

/// Build the HTML document the animated-image surface renders.
///
/// Full-bleed markup: the image stretches to the surface width with no body
/// margins, so the platform renderer shows it edge to edge.
pub fn animated_markup(path: impl AsRef<Path>) -> String {
    format!(
        "<html>\n\
         <head>\n\
         <style type=\"text/css\">\n\
         html, body {{ padding: 0px; margin: 0px; }}\n\
         img {{ width: 100%; }}\n\
         </style>\n\
         </head>\n\
         <body>\n\
         <img src=\"file:///{}\">\n\
         </body>\n\
         </html>",
        path.as_ref().display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_images() {
        assert_eq!(MediaKind::of("photo.jpg"), MediaKind::Image);
        assert_eq!(MediaKind::of("photo.jpeg"), MediaKind::Image);
        assert_eq!(MediaKind::of("photo.png"), MediaKind::Image);
        assert_eq!(MediaKind::of("PHOTO.JPG"), MediaKind::Image);
    }

    #[test]
    fn test_classify_animated() {
        assert_eq!(MediaKind::of("anim.gif"), MediaKind::AnimatedImage);
        assert_eq!(MediaKind::of("ANIM.GIF"), MediaKind::AnimatedImage);
    }

    #[test]
    fn test_classify_video() {
        assert_eq!(MediaKind::of("clip.mp4"), MediaKind::Video);
        assert_eq!(MediaKind::of("clip.MP4"), MediaKind::Video);
    }

    #[test]
    fn test_classify_unsupported() {
        assert_eq!(MediaKind::of("doc.txt"), MediaKind::Unsupported);
        assert_eq!(MediaKind::of("movie.webm"), MediaKind::Unsupported);
        assert_eq!(MediaKind::of("no_extension"), MediaKind::Unsupported);
        assert_eq!(MediaKind::of(""), MediaKind::Unsupported);
    }

    #[test]
    fn test_is_playable() {
        assert!(MediaKind::Image.is_playable());
        assert!(MediaKind::AnimatedImage.is_playable());
        assert!(MediaKind::Video.is_playable());
        assert!(!MediaKind::Unsupported.is_playable());
    }

    #[test]
    fn test_animated_markup() {
        let html = animated_markup("/media/anim.gif");
        assert!(html.contains("<img src=\"file:////media/anim.gif\">"));
        assert!(html.contains("img { width: 100%; }"));
    }
}
