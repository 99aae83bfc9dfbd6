//! Decoded animated image with a time-driven frame selector.

use std::io::Cursor;

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, ImageDecoder, RgbaImage};

use crate::render::Surface;

/// Error type for decoding operations.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The image library rejected the data
    #[error("failed to decode animation: {0}")]
    Image(#[from] image::ImageError),
    /// The resource could not be read
    #[error("failed to read animation resource: {0}")]
    Io(#[from] std::io::Error),
    /// The stream decoded but contained no frames
    #[error("animation contains no frames")]
    Empty,
}

/// One frame of a movie and the time it becomes visible.
#[derive(Clone, Debug)]
pub struct MovieFrame {
    /// Fully composited frame at the movie's intrinsic size
    pub image: RgbaImage,
    /// Offset in milliseconds at which this frame starts
    pub start_ms: u32,
    /// Display time in milliseconds
    pub delay_ms: u32,
}

/// A decoded animation.
///
/// Frames are decoded up front. [`Movie::set_time`] selects which one
/// [`Movie::draw`] paints.
///
/// ## Example
///
/// ```rust
/// use gif_movie_view::{Movie, RecordingSurface};
/// use image::{Rgba, RgbaImage};
///
/// let red = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
/// let blue = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255]));
/// let mut movie = Movie::from_frames(2, 2, vec![(red, 100), (blue, 100)]).unwrap();
///
/// assert_eq!(movie.duration(), 200);
/// movie.set_time(150);
/// assert_eq!(movie.current_frame_index(), 1);
///
/// let mut surface = RecordingSurface::new();
/// movie.draw(&mut surface, 0.0, 0.0);
/// assert_eq!(surface.images().count(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct Movie {
    width: u32,
    height: u32,
    duration_ms: u32,
    frames: Vec<MovieFrame>,
    time_ms: i32,
    current: usize,
}

impl Movie {
    /// Decode a GIF byte stream.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let decoder = GifDecoder::new(Cursor::new(bytes))?;
        let (width, height) = decoder.dimensions();
        let frames = decoder
            .into_frames()
            .collect_frames()?
            .into_iter()
            .map(|frame| {
                let (numer, denom) = frame.delay().numer_denom_ms();
                let delay_ms = if denom == 0 { 0 } else { numer / denom };
                (frame.into_buffer(), delay_ms)
            })
            .collect();

        let movie = Self::from_frames(width, height, frames)?;
        tracing::debug!(
            width = movie.width,
            height = movie.height,
            frames = movie.frames.len(),
            duration_ms = movie.duration_ms,
            "decoded animation"
        );
        Ok(movie)
    }

    /// Build a movie from already decoded `(image, delay_ms)` pairs.
    pub fn from_frames(width: u32, height: u32, frames: Vec<(RgbaImage, u32)>) -> Result<Self, DecodeError> {
        if frames.is_empty() {
            return Err(DecodeError::Empty);
        }

        let mut start_ms = 0u32;
        let frames = frames
            .into_iter()
            .map(|(image, delay_ms)| {
                let frame = MovieFrame {
                    image,
                    start_ms,
                    delay_ms,
                };
                start_ms = start_ms.saturating_add(delay_ms);
                frame
            })
            .collect();

        Ok(Self {
            width,
            height,
            duration_ms: start_ms,
            frames,
            time_ms: 0,
            current: 0,
        })
    }

    /// Intrinsic width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Intrinsic height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total loop duration in milliseconds. Zero means undefined.
    #[inline]
    pub fn duration(&self) -> u32 {
        self.duration_ms
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn frames(&self) -> &[MovieFrame] {
        &self.frames
    }

    /// Time last passed to [`Movie::set_time`].
    #[inline]
    pub fn time(&self) -> i32 {
        self.time_ms
    }

    /// Select the frame visible at `time_ms`.
    ///
    /// Negative times select the first frame, times at or past the end select
    /// the last one. Returns `true` if the selected frame changed.
    pub fn set_time(&mut self, time_ms: i32) -> bool {
        self.time_ms = time_ms;
        let index = self.frame_index_at(time_ms);
        let changed = index != self.current;
        self.current = index;
        changed
    }

    /// Index of the frame visible at `time_ms`.
    pub fn frame_index_at(&self, time_ms: i32) -> usize {
        if self.duration_ms == 0 || time_ms <= 0 {
            return 0;
        }
        let t = time_ms as u32;
        if t >= self.duration_ms {
            return self.frames.len() - 1;
        }
        // Last frame that starts at or before t; zero-delay frames are skipped over
        self.frames
            .partition_point(|f| f.start_ms <= t)
            .saturating_sub(1)
    }

    #[inline]
    pub fn current_frame_index(&self) -> usize {
        self.current
    }

    #[inline]
    pub fn current_frame(&self) -> &MovieFrame {
        &self.frames[self.current]
    }

    /// Paint the selected frame with its top-left corner at `(x, y)`.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, x: f32, y: f32) {
        surface.draw_image(&self.current_frame().image, x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{encode_gif, solid, BLUE, GREEN, RED};
    use crate::RecordingSurface;

    #[test]
    fn test_decode_gif() {
        let bytes = encode_gif(4, 3, &[(RED, 100), (GREEN, 200), (BLUE, 300)]);
        let movie = Movie::decode(&bytes).unwrap();

        assert_eq!((movie.width(), movie.height()), (4, 3));
        assert_eq!(movie.frame_count(), 3);
        assert_eq!(movie.duration(), 600);
        assert_eq!(movie.frames()[1].start_ms, 100);
        assert_eq!(movie.frames()[2].start_ms, 300);
        assert_eq!(movie.frames()[1].image.get_pixel(0, 0), &GREEN);
    }

    #[test]
    fn test_decode_garbage() {
        let err = Movie::decode(b"definitely not a gif").unwrap_err();
        assert!(matches!(err, DecodeError::Image(_)));
    }

    #[test]
    fn test_from_frames_empty() {
        assert!(matches!(Movie::from_frames(1, 1, Vec::new()), Err(DecodeError::Empty)));
    }

    #[test]
    fn test_frame_selection() {
        let movie = Movie::from_frames(
            1,
            1,
            vec![(solid(1, 1, RED), 100), (solid(1, 1, GREEN), 200), (solid(1, 1, BLUE), 300)],
        )
        .unwrap();

        assert_eq!(movie.frame_index_at(0), 0);
        assert_eq!(movie.frame_index_at(99), 0);
        assert_eq!(movie.frame_index_at(100), 1);
        assert_eq!(movie.frame_index_at(299), 1);
        assert_eq!(movie.frame_index_at(300), 2);
        assert_eq!(movie.frame_index_at(599), 2);
    }

    #[test]
    fn test_out_of_range_times_clamp() {
        let movie = Movie::from_frames(1, 1, vec![(solid(1, 1, RED), 100), (solid(1, 1, GREEN), 100)]).unwrap();
        assert_eq!(movie.frame_index_at(-50), 0);
        assert_eq!(movie.frame_index_at(200), 1);
        assert_eq!(movie.frame_index_at(i32::MAX), 1);
    }

    #[test]
    fn test_zero_duration_shows_first_frame() {
        let mut movie = Movie::from_frames(1, 1, vec![(solid(1, 1, RED), 0), (solid(1, 1, GREEN), 0)]).unwrap();
        assert_eq!(movie.duration(), 0);
        movie.set_time(700);
        assert_eq!(movie.current_frame_index(), 0);
    }

    #[test]
    fn test_zero_delay_frame_is_skipped() {
        let movie = Movie::from_frames(
            1,
            1,
            vec![(solid(1, 1, RED), 100), (solid(1, 1, GREEN), 0), (solid(1, 1, BLUE), 100)],
        )
        .unwrap();
        assert_eq!(movie.frame_index_at(100), 2);
    }

    #[test]
    fn test_set_time_reports_change() {
        let mut movie = Movie::from_frames(1, 1, vec![(solid(1, 1, RED), 100), (solid(1, 1, GREEN), 100)]).unwrap();
        assert!(!movie.set_time(50));
        assert!(movie.set_time(150));
        assert!(!movie.set_time(160));
        assert_eq!(movie.time(), 160);
    }

    #[test]
    fn test_draw_selected_frame() {
        let mut movie = Movie::from_frames(2, 1, vec![(solid(2, 1, RED), 100), (solid(2, 1, BLUE), 100)]).unwrap();
        movie.set_time(120);

        let mut surface = RecordingSurface::new();
        movie.draw(&mut surface, 3.0, 4.0);

        let (image, x, y, _) = surface.images().next().unwrap();
        assert_eq!(image.get_pixel(1, 0), &BLUE);
        assert_eq!((x, y), (3.0, 4.0));
    }
}
