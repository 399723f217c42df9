//! Replacing the thumbnail of a catalogued item with a user-supplied image.
//!
//! Replacement only ever replaces: when the item has no thumbnail on disk the
//! request is silently ignored. The new image is produced next to the old one
//! and renamed over it, so a failed transform leaves the old thumbnail intact.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use tracing::{debug, info, warn};

use crate::catalog::{CatalogItem, plain_file_name};
use crate::config::LibraryContext;
use crate::error::{Error, Result, ThumbnailError};
use crate::events::OutboundEvent;
use crate::fs::FileSystem;
use crate::host::EventSink;

/// JPEG quality used for replaced thumbnails.
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Turns an arbitrary image into a thumbnail file.
#[cfg_attr(test, mockall::automock)]
pub trait ImageTransformer: Send + Sync {
    /// Decode `source`, scale it to `target_height` pixels high and write a
    /// JPEG to `destination`.
    ///
    /// `Ok(false)` means the routine declined the image.
    fn transform(&self, source: &Path, destination: &Path, target_height: u32) -> Result<bool>;
}

/// Resizes with Lanczos3, keeping the aspect ratio, and encodes JPEG.
#[derive(Debug, Clone, Copy)]
pub struct JpegResizer {
    quality: u8,
}

impl Default for JpegResizer {
    fn default() -> Self {
        Self {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl JpegResizer {
    /// Resizer with the given JPEG quality (1-100).
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }
}

impl ImageTransformer for JpegResizer {
    fn transform(&self, source: &Path, destination: &Path, target_height: u32) -> Result<bool> {
        let decode_failed = |reason: String| ThumbnailError::DecodeFailed {
            path: source.to_path_buf(),
            reason,
        };
        let image = ImageReader::open(source)
            .map_err(|e| decode_failed(e.to_string()))?
            .with_guessed_format()
            .map_err(|e| decode_failed(e.to_string()))?
            .decode()
            .map_err(|e| decode_failed(e.to_string()))?;

        if image.height() == 0 || target_height == 0 {
            return Ok(false);
        }

        let scale = f64::from(target_height) / f64::from(image.height());
        let width = (f64::from(image.width()) * scale).round().max(1.0) as u32;
        let resized = image.resize_exact(width, target_height, FilterType::Lanczos3);

        let encode_failed = |reason: String| ThumbnailError::EncodeFailed {
            path: destination.to_path_buf(),
            reason,
        };
        let file = File::create(destination).map_err(|e| encode_failed(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        let encoder = JpegEncoder::new_with_quality(&mut writer, self.quality);
        DynamicImage::ImageRgb8(resized.to_rgb8())
            .write_with_encoder(encoder)
            .map_err(|e| encode_failed(e.to_string()))?;
        writer.flush().map_err(|e| encode_failed(e.to_string()))?;

        debug!(
            "Encoded {}x{} thumbnail to {}",
            width,
            target_height,
            destination.display()
        );
        Ok(true)
    }
}

/// What happened to a replacement request.
#[derive(Debug)]
pub enum ReplaceOutcome {
    /// The item has no thumbnail on disk; nothing was done.
    Skipped,
    /// The thumbnail now holds the new image.
    Replaced,
    /// The transform declined the image.
    Rejected,
    /// The transform or the swap failed.
    Failed(Error),
}

/// Swaps item thumbnails.
pub struct ThumbnailPipeline {
    fs: Arc<dyn FileSystem>,
    transformer: Arc<dyn ImageTransformer>,
}

impl ThumbnailPipeline {
    /// Create a pipeline.
    pub fn new(fs: Arc<dyn FileSystem>, transformer: Arc<dyn ImageTransformer>) -> Self {
        Self { fs, transformer }
    }

    /// Replace the thumbnail of `item` with the image at `incoming`.
    ///
    /// Emits `thumbnail-replaced` only on success.
    pub async fn replace(
        &self,
        ctx: &LibraryContext,
        incoming: &Path,
        item: &CatalogItem,
        sink: &dyn EventSink,
    ) -> ReplaceOutcome {
        let target = match plain_file_name(&item.hash) {
            Ok(hash) => ctx.thumbnail_path(hash),
            Err(e) => {
                warn!("Thumbnail replacement for {} refused: {}", item.file_name, e);
                return ReplaceOutcome::Failed(e);
            }
        };
        if !self.fs.exists(&target) {
            debug!("No thumbnail at {}, nothing to replace", target.display());
            return ReplaceOutcome::Skipped;
        }

        let staging = staging_path(&target);
        let transformer = Arc::clone(&self.transformer);
        let source = incoming.to_path_buf();
        let destination = staging.clone();
        let height = ctx.screenshot_height;
        let transformed = tokio::task::spawn_blocking(move || {
            transformer.transform(&source, &destination, height)
        })
        .await
        .unwrap_or_else(|e| Err(ThumbnailError::Interrupted(e.to_string()).into()));

        let outcome = match transformed {
            Ok(true) => match self.fs.rename(&staging, &target) {
                Ok(()) => ReplaceOutcome::Replaced,
                Err(e) => ReplaceOutcome::Failed(e),
            },
            Ok(false) => ReplaceOutcome::Rejected,
            Err(e) => ReplaceOutcome::Failed(e),
        };

        match &outcome {
            ReplaceOutcome::Replaced => {
                info!("Replaced thumbnail {}", target.display());
                sink.emit(OutboundEvent::ThumbnailReplaced);
            }
            ReplaceOutcome::Rejected => {
                warn!("Image {} was rejected as thumbnail", incoming.display());
                self.discard(&staging);
            }
            ReplaceOutcome::Failed(e) => {
                warn!("Thumbnail replacement for {} failed: {}", item.hash, e);
                self.discard(&staging);
            }
            ReplaceOutcome::Skipped => {}
        }
        outcome
    }

    fn discard(&self, staging: &Path) {
        if self.fs.exists(staging)
            && let Err(e) = self.fs.remove_file(staging)
        {
            warn!("Could not remove {}: {}", staging.display(), e);
        }
    }
}

/// `<hash>.jpg` -> `<hash>.jpg.tmp` in the same directory.
fn staging_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    target.with_file_name(name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::fs::RealFileSystem;
    use crate::host::MockEventSink;
    use std::fs;
    use tempfile::TempDir;

    struct Hub {
        _temp_dir: TempDir,
        ctx: LibraryContext,
        incoming: PathBuf,
    }

    fn hub(with_thumbnail: bool) -> Hub {
        let temp_dir = TempDir::new().expect("Should create temp dir");
        let ctx = LibraryContext {
            output_folder: temp_dir.path().to_path_buf(),
            hub_name: "movies".to_string(),
            screenshot_height: 10,
            ..Default::default()
        };
        let target = ctx.thumbnail_path("h1");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        if with_thumbnail {
            fs::write(&target, "old thumbnail").unwrap();
        }
        let incoming = temp_dir.path().join("incoming.png");
        image::RgbImage::from_pixel(40, 20, image::Rgb([200, 30, 30]))
            .save(&incoming)
            .unwrap();
        Hub {
            _temp_dir: temp_dir,
            ctx,
            incoming,
        }
    }

    fn item() -> CatalogItem {
        CatalogItem {
            file_name: "clip.mp4".to_string(),
            hash: "h1".to_string(),
            ..Default::default()
        }
    }

    fn expect_replaced(times: usize) -> MockEventSink {
        let mut sink = MockEventSink::new();
        sink.expect_emit()
            .withf(|event| *event == OutboundEvent::ThumbnailReplaced)
            .times(times)
            .return_const(());
        sink
    }

    fn pipeline(transformer: impl ImageTransformer + 'static) -> ThumbnailPipeline {
        ThumbnailPipeline::new(Arc::new(RealFileSystem::new()), Arc::new(transformer))
    }

    #[tokio::test]
    async fn test_missing_thumbnail_is_noop() {
        let hub = hub(false);
        let mut transformer = MockImageTransformer::new();
        transformer.expect_transform().never();

        let outcome = pipeline(transformer)
            .replace(&hub.ctx, &hub.incoming, &item(), &expect_replaced(0))
            .await;

        assert!(matches!(outcome, ReplaceOutcome::Skipped));
        assert!(!hub.ctx.thumbnail_path("h1").exists());
    }

    #[tokio::test]
    async fn test_hash_with_path_segments_is_refused() {
        let hub = hub(true);
        let mut transformer = MockImageTransformer::new();
        transformer.expect_transform().never();
        let escaping = CatalogItem {
            hash: "../../h1".to_string(),
            ..item()
        };

        let outcome = pipeline(transformer)
            .replace(&hub.ctx, &hub.incoming, &escaping, &expect_replaced(0))
            .await;

        assert!(matches!(outcome, ReplaceOutcome::Failed(_)));
        assert_eq!(
            fs::read_to_string(hub.ctx.thumbnail_path("h1")).unwrap(),
            "old thumbnail"
        );
    }

    #[tokio::test]
    async fn test_successful_transform_swaps_and_notifies_once() {
        let hub = hub(true);
        let mut transformer = MockImageTransformer::new();
        transformer
            .expect_transform()
            .withf(|_, destination, height| {
                destination.to_string_lossy().ends_with("h1.jpg.tmp") && *height == 10
            })
            .times(1)
            .returning(|_, destination, _| {
                fs::write(destination, "new thumbnail").unwrap();
                Ok(true)
            });

        let outcome = pipeline(transformer)
            .replace(&hub.ctx, &hub.incoming, &item(), &expect_replaced(1))
            .await;

        let target = hub.ctx.thumbnail_path("h1");
        assert!(matches!(outcome, ReplaceOutcome::Replaced));
        assert_eq!(fs::read_to_string(&target).unwrap(), "new thumbnail");
        assert!(!staging_path(&target).exists());
    }

    #[tokio::test]
    async fn test_rejected_transform_keeps_old_thumbnail() {
        let hub = hub(true);
        let mut transformer = MockImageTransformer::new();
        transformer.expect_transform().times(1).returning(|_, destination, _| {
            fs::write(destination, "partial").unwrap();
            Ok(false)
        });

        let outcome = pipeline(transformer)
            .replace(&hub.ctx, &hub.incoming, &item(), &expect_replaced(0))
            .await;

        let target = hub.ctx.thumbnail_path("h1");
        assert!(matches!(outcome, ReplaceOutcome::Rejected));
        assert_eq!(fs::read_to_string(&target).unwrap(), "old thumbnail");
        assert!(!staging_path(&target).exists());
    }

    #[tokio::test]
    async fn test_failed_transform_sends_nothing() {
        let hub = hub(true);
        let mut transformer = MockImageTransformer::new();
        transformer.expect_transform().times(1).returning(|source, _, _| {
            Err(ThumbnailError::DecodeFailed {
                path: source.to_path_buf(),
                reason: "not an image".to_string(),
            }
            .into())
        });

        let outcome = pipeline(transformer)
            .replace(&hub.ctx, &hub.incoming, &item(), &expect_replaced(0))
            .await;

        assert!(matches!(outcome, ReplaceOutcome::Failed(Error::Thumbnail(_))));
        assert_eq!(
            fs::read_to_string(hub.ctx.thumbnail_path("h1")).unwrap(),
            "old thumbnail"
        );
    }

    #[tokio::test]
    async fn test_jpeg_resizer_end_to_end() {
        let hub = hub(true);
        let outcome = pipeline(JpegResizer::default())
            .replace(&hub.ctx, &hub.incoming, &item(), &expect_replaced(1))
            .await;

        assert!(matches!(outcome, ReplaceOutcome::Replaced));
        let (width, height) = image::image_dimensions(hub.ctx.thumbnail_path("h1")).unwrap();
        assert_eq!((width, height), (20, 10));
    }

    #[test]
    fn test_jpeg_resizer_rejects_garbage() {
        let temp_dir = TempDir::new().expect("Should create temp dir");
        let source = temp_dir.path().join("notes.txt");
        fs::write(&source, "definitely not pixels").unwrap();

        let result =
            JpegResizer::with_quality(90).transform(&source, &temp_dir.path().join("out.jpg"), 10);
        assert!(matches!(
            result,
            Err(Error::Thumbnail(ThumbnailError::DecodeFailed { .. }))
        ));
    }

    #[test]
    fn test_staging_path() {
        assert_eq!(
            staging_path(Path::new("/hub/thumbnails/h1.jpg")),
            PathBuf::from("/hub/thumbnails/h1.jpg.tmp")
        );
    }
}
