//! Frame capture sources

mod frame;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

pub use frame::{Frame, ImageFormat};

/// Something that can hand out the current camera frame
pub trait CaptureSource: Send + Sync {
    /// Whether a frame can be captured right now
    fn is_ready(&self) -> bool;

    /// The current frame, or `None` when the source is not ready
    fn capture(&self) -> Option<Frame>;
}

/// Reads the latest frame from an image file that an external camera tool
/// keeps overwriting (e.g. `ffmpeg -update 1 frame.jpg`).
pub struct FileCapture {
    path: PathBuf,
}

impl FileCapture {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CaptureSource for FileCapture {
    fn is_ready(&self) -> bool {
        self.path.is_file()
    }

    fn capture(&self) -> Option<Frame> {
        match std::fs::read(&self.path) {
            Ok(data) if !data.is_empty() => {
                let frame = Frame::new(data);
                debug!("Captured {:?} from {}", frame, self.path.display());
                Some(frame)
            }
            Ok(_) => {
                debug!("Frame file {} is empty", self.path.display());
                None
            }
            Err(e) => {
                warn!("Failed to read frame {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_formats() {
        assert_eq!(Frame::new(vec![0xff, 0xd8, 0xff, 0xe0]).mime_type(), "image/jpeg");
        assert_eq!(
            Frame::new(vec![0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a]).mime_type(),
            "image/png"
        );
        let webp = b"RIFF\x00\x00\x00\x00WEBPVP8 ".to_vec();
        assert_eq!(Frame::new(webp).mime_type(), "image/webp");
        assert_eq!(Frame::new(vec![1, 2, 3]).mime_type(), "image/jpeg");
    }

    #[test]
    fn test_from_data_url_strips_prefix() {
        let frame = Frame::from_data_url("data:image/jpeg;base64,/9j/AA==").unwrap();
        assert_eq!(frame.data().to_vec(), vec![0xffu8, 0xd8, 0xff, 0x00]);

        let bare = Frame::from_data_url("/9j/AA==").unwrap();
        assert_eq!(bare, frame);

        assert!(Frame::from_data_url("data:image/png;base64,***").is_err());
    }

    #[test]
    fn test_file_capture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.jpg");
        let source = FileCapture::new(&path);

        assert!(!source.is_ready());
        assert!(source.capture().is_none());

        std::fs::write(&path, [0xff, 0xd8, 0xff, 0x01]).unwrap();
        assert!(source.is_ready());
        assert_eq!(source.capture().unwrap().len(), 4);

        std::fs::write(&path, b"").unwrap();
        assert!(source.capture().is_none());
    }
}
