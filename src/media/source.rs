// source.rs - What a media URL is and where its poster lives
//
// The kind is decided once, from the file extension. One hosting
// convention is recognised: Cloudinary URLs can be rewritten to request an
// optimised rendition, and a video's poster is the same asset requested
// through the image pipeline as a jpg.

use url::Url;

const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "webm", "ogg", "mov"];
const CDN_HOST: &str = "res.cloudinary.com";
const CDN_AUTO: &str = "f_auto,q_auto";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Video by extension (case-insensitive, query ignored), image otherwise.
    pub fn detect(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let ext = match path.rsplit_once('.') {
            Some((_, ext)) if !ext.contains('/') => ext,
            _ => return Self::Image,
        };
        if VIDEO_EXTENSIONS.iter().any(|v| ext.eq_ignore_ascii_case(v)) {
            Self::Video
        } else {
            Self::Image
        }
    }
}

fn cdn_url(raw: &str) -> Option<Url> {
    let url = Url::parse(raw).ok()?;
    url.host_str().is_some_and(|h| h.contains(CDN_HOST)).then_some(url)
}

/// CDN video URLs get the auto format/quality segment after `upload`.
/// Anything else comes back untouched.
pub fn optimized_video_url(raw: &str) -> String {
    let Some(mut url) = cdn_url(raw) else { return raw.to_string() };
    let auto_segment = format!("/{CDN_AUTO}/");
    if url.path().contains(&auto_segment) {
        return url.to_string();
    }

    let mut parts: Vec<&str> = url.path().split('/').collect();
    let Some(idx) = parts.iter().position(|p| *p == "upload") else {
        return url.to_string();
    };
    parts.insert(idx + 1, CDN_AUTO);
    let path = parts.join("/");
    url.set_path(&path);
    url.to_string()
}

/// Still image to show before the real media is ready. `None` means no
/// poster can be derived and the plane stays on its placeholder.
pub fn derive_poster_url(raw: &str) -> Option<String> {
    let mut url = cdn_url(raw)?;

    let mut path = url.path().replacen("/video/upload/", "/image/upload/", 1);
    if !path.contains(&format!("/{CDN_AUTO}/")) {
        path = path.replacen("/upload/", &format!("/upload/{CDN_AUTO}/"), 1);
    }
    if let Some(stem) = path.strip_suffix(".mp4") {
        path = format!("{stem}.jpg");
    }
    url.set_path(&path);
    Some(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_kind_from_extension() {
        assert_eq!(MediaKind::detect("clip.mp4"), MediaKind::Video);
        assert_eq!(MediaKind::detect("https://x.io/a/b.WEBM?v=2"), MediaKind::Video);
        assert_eq!(MediaKind::detect("/media/reel.mov#t=3"), MediaKind::Video);
        assert_eq!(MediaKind::detect("song.ogg"), MediaKind::Video);
        assert_eq!(MediaKind::detect("https://picsum.photos/seed/1/800/600?grayscale"), MediaKind::Image);
        assert_eq!(MediaKind::detect("photo.jpg"), MediaKind::Image);
        assert_eq!(MediaKind::detect("https://cdn.mp4.example/still"), MediaKind::Image);
        assert_eq!(MediaKind::detect("mp4"), MediaKind::Image);
        assert_eq!(MediaKind::detect(""), MediaKind::Image);
    }

    #[test]
    fn injects_auto_segment_into_cdn_video() {
        assert_eq!(
            optimized_video_url("https://res.cloudinary.com/demo/video/upload/v17/reel.mp4"),
            "https://res.cloudinary.com/demo/video/upload/f_auto,q_auto/v17/reel.mp4"
        );
    }

    #[test]
    fn leaves_optimised_and_foreign_urls_alone() {
        let done = "https://res.cloudinary.com/demo/video/upload/f_auto,q_auto/v17/reel.mp4";
        assert_eq!(optimized_video_url(done), done);
        assert_eq!(optimized_video_url("https://example.com/upload/a.mp4"), "https://example.com/upload/a.mp4");
        assert_eq!(optimized_video_url("/local/a.mp4"), "/local/a.mp4");
    }

    #[test]
    fn derives_cdn_poster() {
        assert_eq!(
            derive_poster_url("https://res.cloudinary.com/demo/video/upload/v17/reel.mp4?x=1").as_deref(),
            Some("https://res.cloudinary.com/demo/image/upload/f_auto,q_auto/v17/reel.jpg?x=1")
        );
        assert_eq!(
            derive_poster_url("https://res.cloudinary.com/demo/video/upload/f_auto,q_auto/reel.mp4").as_deref(),
            Some("https://res.cloudinary.com/demo/image/upload/f_auto,q_auto/reel.jpg")
        );
    }

    #[test]
    fn no_poster_outside_the_cdn() {
        assert_eq!(derive_poster_url("https://example.com/video/upload/a.mp4"), None);
        assert_eq!(derive_poster_url("relative/a.mp4"), None);
    }
}
