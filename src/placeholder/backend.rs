//! Placeholder backend trait and shared error type.
//!
//! The [`PlaceholderBackend`] trait is the seam between the reveal state
//! machine (which decides *when* a placeholder is needed) and the pixel work
//! (which decides *what* it looks like). The production implementation is
//! [`BlurhashBackend`](super::blurhash_backend::BlurhashBackend); tests use a
//! recording mock.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaceholderError {
    #[error("invalid blurhash {hash:?}: {reason}")]
    InvalidHash { hash: String, reason: String },
    #[error("invalid raster size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("no raster has been decoded into this scratch buffer")]
    NothingDecoded,
    #[error("placeholder encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Turns a perceptual hash into an embeddable image reference.
///
/// Takes `&mut self` so implementations can keep reusable buffers; a backend
/// serves one decode at a time.
pub trait PlaceholderBackend {
    /// Render `hash` for an image whose intrinsic size is `width`x`height`.
    fn render(&mut self, hash: &str, width: u32, height: u32) -> Result<String, PlaceholderError>;
}

impl<B: PlaceholderBackend + ?Sized> PlaceholderBackend for &mut B {
    fn render(&mut self, hash: &str, width: u32, height: u32) -> Result<String, PlaceholderError> {
        (**self).render(hash, width, height)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Mock backend that records renders without decoding anything.
    ///
    /// Hashes listed in `invalid` fail with [`PlaceholderError::InvalidHash`];
    /// everything else renders as `data:mock,<hash>`.
    #[derive(Default)]
    pub struct MockBackend {
        pub invalid: Vec<String>,
        pub renders: Vec<RecordedRender>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedRender {
        pub hash: String,
        pub width: u32,
        pub height: u32,
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn rejecting(hashes: &[&str]) -> Self {
            Self {
                invalid: hashes.iter().map(|h| h.to_string()).collect(),
                renders: Vec::new(),
            }
        }

        pub fn render_count(&self) -> usize {
            self.renders.len()
        }

        pub fn uri_for(hash: &str) -> String {
            format!("data:mock,{hash}")
        }
    }

    impl PlaceholderBackend for MockBackend {
        fn render(
            &mut self,
            hash: &str,
            width: u32,
            height: u32,
        ) -> Result<String, PlaceholderError> {
            self.renders.push(RecordedRender {
                hash: hash.to_string(),
                width,
                height,
            });
            if self.invalid.iter().any(|h| h == hash) {
                return Err(PlaceholderError::InvalidHash {
                    hash: hash.to_string(),
                    reason: "rejected by mock".into(),
                });
            }
            Ok(Self::uri_for(hash))
        }
    }

    #[test]
    fn mock_records_renders() {
        let mut backend = MockBackend::new();
        let uri = backend.render("abc", 800, 600).unwrap();
        assert_eq!(uri, "data:mock,abc");
        assert_eq!(
            backend.renders,
            vec![RecordedRender {
                hash: "abc".into(),
                width: 800,
                height: 600
            }]
        );
    }

    #[test]
    fn mock_rejects_listed_hashes() {
        let mut backend = MockBackend::rejecting(&["bad"]);
        assert!(matches!(
            backend.render("bad", 1, 1),
            Err(PlaceholderError::InvalidHash { .. })
        ));
        assert_eq!(backend.render_count(), 1);
    }

    #[test]
    fn mutable_reference_is_a_backend() {
        fn render_twice(mut b: impl PlaceholderBackend) -> usize {
            b.render("a", 1, 1).unwrap();
            b.render("b", 1, 1).unwrap();
            2
        }
        let mut backend = MockBackend::new();
        render_twice(&mut backend);
        assert_eq!(backend.render_count(), 2);
    }
}
