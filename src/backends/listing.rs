//! Object listing for the gallery endpoint.

use async_trait::async_trait;
use serde::Serialize;

use crate::backends::BackendError;

const IMAGE_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".webp"];

/// Lists object keys from an external bucket.
#[async_trait]
pub trait ObjectListing: Send + Sync {
    async fn list_keys(&self) -> Result<Vec<String>, BackendError>;
}

/// Listing over a fixed set of keys, taken from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticListing {
    keys: Vec<String>,
}

impl StaticListing {
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys }
    }
}

#[async_trait]
impl ObjectListing for StaticListing {
    async fn list_keys(&self) -> Result<Vec<String>, BackendError> {
        Ok(self.keys.clone())
    }
}

/// Response of `GET /gallery`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gallery {
    pub images: Vec<String>,
}

/// Keep image keys only and turn them into public URLs.
pub fn gallery_from_keys(keys: &[String], base_url: &str) -> Gallery {
    let base = base_url.trim_end_matches('/');
    let images = keys
        .iter()
        .filter(|key| is_image_key(key))
        .map(|key| format!("{base}/{key}"))
        .collect();
    Gallery { images }
}

fn is_image_key(key: &str) -> bool {
    if key.ends_with('/') {
        return false;
    }
    let lower = key.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gallery_filters_non_images() {
        let keys: Vec<String> = ["a.JPG", "album/", "notes.txt", "b.webp", "nested/c.png", "d.jpeg.bak"]
            .iter()
            .map(|k| k.to_string())
            .collect();

        let gallery = gallery_from_keys(&keys, "https://cdn.example.com/photos/");
        assert_eq!(
            gallery.images,
            vec![
                "https://cdn.example.com/photos/a.JPG",
                "https://cdn.example.com/photos/b.webp",
                "https://cdn.example.com/photos/nested/c.png",
            ]
        );
    }

    #[tokio::test]
    async fn test_static_listing() {
        let listing = StaticListing::new(vec!["x.png".into()]);
        assert_eq!(listing.list_keys().await.unwrap(), vec!["x.png".to_string()]);
    }
}
