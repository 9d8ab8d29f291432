// error.rs - Setup and configuration failures
//
// Media failures never show up here: a plane that can't load just keeps
// its placeholder. These are the errors that stop a gallery from mounting.

pub type GalleryResult<T> = Result<T, GalleryError>;

#[derive(thiserror::Error, Debug)]
pub enum GalleryError {
    #[error("config error: {0}")]
    Config(String),

    #[error("dom error: {0}")]
    Dom(String),

    #[error("webgl error: {0}")]
    Gl(String),

    #[error("media error: {0}")]
    Media(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl GalleryError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn dom(msg: impl Into<String>) -> Self {
        Self::Dom(msg.into())
    }

    pub fn gl(msg: impl Into<String>) -> Self {
        Self::Gl(msg.into())
    }

    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }
}

impl From<GalleryError> for wasm_bindgen::JsValue {
    fn from(err: GalleryError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(GalleryError::config("x").to_string().starts_with("config error:"));
        assert!(GalleryError::dom("x").to_string().starts_with("dom error:"));
        assert!(GalleryError::gl("x").to_string().starts_with("webgl error:"));
        assert!(GalleryError::media("x").to_string().starts_with("media error:"));
    }

    #[test]
    fn json_errors_convert() {
        let err: GalleryError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, GalleryError::Json(_)));
    }
}
