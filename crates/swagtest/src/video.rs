//! Failure video.
//!
//! [`VideoRecorder`] keeps one frame per page-changing driver call and
//! encodes them as an animated GIF. Each frame is shown for as long as the
//! page stayed in that state, with a floor so quick steps stay readable.

use crate::config::Viewport;
use crate::driver::PageDriver;
use crate::result::{SwagError, SwagResult};
use gif::{Encoder, Frame, Repeat};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::collections::VecDeque;
use std::fmt;
use std::path::Path;
use std::time::Instant;
use tokio::sync::Mutex;

/// File name of the video inside an attempt directory
pub const VIDEO_FILE: &str = "video.gif";

/// Encoding settings for a recording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoConfig {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Shortest time a frame stays on screen, in centiseconds
    pub min_frame_delay_cs: u16,
    /// How long the final frame is held, in centiseconds
    pub final_frame_delay_cs: u16,
    /// Frames kept; older frames are dropped first
    pub max_frames: usize,
    /// GIF quantizer speed, 1 (best) to 30 (fastest)
    pub speed: i32,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            min_frame_delay_cs: 40,
            final_frame_delay_cs: 200,
            max_frames: 300,
            speed: 10,
        }
    }
}

impl VideoConfig {
    /// Scale the viewport down to at most 640 pixels wide, keeping its aspect
    #[must_use]
    pub fn for_viewport(viewport: &Viewport) -> Self {
        let defaults = Self::default();
        if viewport.width == 0 || viewport.height == 0 {
            return defaults;
        }
        let width = viewport.width.min(defaults.width);
        let height = (u64::from(viewport.height) * u64::from(width) / u64::from(viewport.width))
            .clamp(1, u64::from(u16::MAX));
        Self {
            width,
            height: height as u32,
            ..defaults
        }
    }
}

/// One captured frame
#[derive(Clone)]
pub struct VideoFrame {
    /// Pixels, already scaled to the recording size
    pub image: RgbaImage,
    /// Time since the recording started
    pub timestamp_ms: u64,
    /// Driver call that produced this state
    pub action: String,
}

impl fmt::Debug for VideoFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoFrame")
            .field("dimensions", &self.image.dimensions())
            .field("timestamp_ms", &self.timestamp_ms)
            .field("action", &self.action)
            .finish()
    }
}

/// Frame recorder for one session
#[derive(Debug)]
pub struct VideoRecorder {
    config: VideoConfig,
    started: Instant,
    frames: Mutex<VecDeque<VideoFrame>>,
}

impl VideoRecorder {
    /// Start an empty recording
    #[must_use]
    pub fn new(config: VideoConfig) -> Self {
        Self {
            config,
            started: Instant::now(),
            frames: Mutex::new(VecDeque::new()),
        }
    }

    /// Encoding settings
    #[must_use]
    pub const fn config(&self) -> &VideoConfig {
        &self.config
    }

    /// Number of frames currently held
    pub async fn frame_count(&self) -> usize {
        self.frames.lock().await.len()
    }

    /// Copy of the held frames, oldest first
    pub async fn frames(&self) -> Vec<VideoFrame> {
        self.frames.lock().await.iter().cloned().collect()
    }

    /// Grab the driver's current frame
    ///
    /// # Errors
    ///
    /// Returns an error if the driver cannot produce a frame
    pub async fn capture(&self, driver: &dyn PageDriver, action: &str) -> SwagResult<()> {
        let image = driver.frame().await?;
        self.add_frame(image, action).await;
        Ok(())
    }

    /// Append a frame, scaling it to the recording size
    pub async fn add_frame(&self, image: RgbaImage, action: &str) {
        let image = if image.dimensions() == (self.config.width, self.config.height) {
            image
        } else {
            imageops::resize(&image, self.config.width, self.config.height, FilterType::Triangle)
        };
        let timestamp_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let mut frames = self.frames.lock().await;
        if frames.len() >= self.config.max_frames.max(1) {
            frames.pop_front();
        }
        frames.push_back(VideoFrame {
            image,
            timestamp_ms,
            action: action.to_string(),
        });
    }

    /// Encode the held frames as an animated GIF
    ///
    /// # Errors
    ///
    /// Returns `VideoRecording` when no frame was captured or encoding fails
    pub async fn encode(&self) -> SwagResult<Vec<u8>> {
        let frames = self.frames().await;
        let config = self.config;
        tokio::task::spawn_blocking(move || encode_gif(&config, &frames))
            .await
            .map_err(video_error)?
    }

    /// Encode and write the recording
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the write fails
    pub async fn save(&self, path: &Path) -> SwagResult<()> {
        let data = self.encode().await?;
        tokio::fs::write(path, data).await?;
        Ok(())
    }
}

fn video_error(e: impl fmt::Display) -> SwagError {
    SwagError::VideoRecording {
        message: e.to_string(),
    }
}

fn encode_gif(config: &VideoConfig, frames: &[VideoFrame]) -> SwagResult<Vec<u8>> {
    if frames.is_empty() {
        return Err(video_error("no frames captured"));
    }
    let width = u16::try_from(config.width).map_err(video_error)?;
    let height = u16::try_from(config.height).map_err(video_error)?;
    let speed = config.speed.clamp(1, 30);

    let mut output = Vec::new();
    {
        let mut encoder = Encoder::new(&mut output, width, height, &[]).map_err(video_error)?;
        encoder.set_repeat(Repeat::Infinite).map_err(video_error)?;

        for (i, frame) in frames.iter().enumerate() {
            let mut rgba = frame.image.as_raw().clone();
            let mut gif_frame = Frame::from_rgba_speed(width, height, &mut rgba, speed);
            gif_frame.delay = frames.get(i + 1).map_or(config.final_frame_delay_cs, |next| {
                let shown_cs = next.timestamp_ms.saturating_sub(frame.timestamp_ms) / 10;
                u16::try_from(shown_cs)
                    .unwrap_or(u16::MAX)
                    .max(config.min_frame_delay_cs)
            });
            encoder.write_frame(&gif_frame).map_err(video_error)?;
        }
    }
    Ok(output)
}
