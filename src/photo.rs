use base64::Engine;

/// Where a photo's pixels come from once printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoSource {
    Url(String),
    Inline { mime: String, data: Vec<u8> },
    Missing,
}

impl PhotoSource {
    /// `src` attribute value, `None` when there is nothing to load.
    pub fn to_src(&self) -> Option<String> {
        match self {
            PhotoSource::Url(url) => {
                let url = url.trim();
                if url.is_empty() {
                    None
                } else {
                    Some(url.to_string())
                }
            }
            PhotoSource::Inline { mime, data } => {
                if data.is_empty() {
                    return None;
                }
                let b64 = base64::engine::general_purpose::STANDARD.encode(data);
                Some(format!("data:{mime};base64,{b64}"))
            }
            PhotoSource::Missing => None,
        }
    }
}

/// Maps a photo identifier to a displayable source. Implementations must not
/// fail: an unknown id is `PhotoSource::Missing` (or an empty URL).
pub trait PhotoResolver {
    fn resolve(&self, photo_id: &str) -> PhotoSource;
}

impl<F> PhotoResolver for F
where
    F: Fn(&str) -> String,
{
    fn resolve(&self, photo_id: &str) -> PhotoSource {
        PhotoSource::Url(self(photo_id))
    }
}

/// Resolver for reports printed without pictures.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPhotos;

impl PhotoResolver for NoPhotos {
    fn resolve(&self, _photo_id: &str) -> PhotoSource {
        PhotoSource::Missing
    }
}

/// What the rendering boundary does when an image fails to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFallback {
    /// Suppress the element; never surfaced as an error.
    #[default]
    Hide,
    Keep,
}

impl ImageFallback {
    /// Inline `onerror` hook for engines that run load handlers.
    pub fn onerror_script(self) -> Option<&'static str> {
        match self {
            ImageFallback::Hide => Some("this.style.display='none'"),
            ImageFallback::Keep => None,
        }
    }
}
