//! Playback timing: maps wall-clock time onto an offset inside the loop.

/// Loop length used when a movie reports no duration.
pub const DEFAULT_DURATION_MS: i32 = 1000;

/// Loop length used for time wrapping.
///
/// Falls back to [`DEFAULT_DURATION_MS`] when `duration` is not positive.
#[inline]
pub fn effective_duration(duration: i32) -> i32 {
    if duration > 0 {
        duration
    } else {
        DEFAULT_DURATION_MS
    }
}

/// Offset within the loop for wall-clock time `now` of an epoch that began at `start`.
///
/// The result is always in `[0, effective_duration(duration))`, including when
/// `start` lies after `now`.
pub fn offset_at(now: i64, start: i64, duration: i32) -> i32 {
    let duration = effective_duration(duration) as i64;
    (now - start).rem_euclid(duration) as i32
}

/// Platform-agnostic playback state for a looping animation.
///
/// Like a frame controller, this does not read a clock itself. The caller
/// passes the current time in on every paint pass and on resume.
///
/// ## Example
///
/// ```rust
/// use gif_movie_view::Playback;
///
/// let mut playback = Playback::new(false);
/// assert_eq!(playback.advance(10_000, 1000), 0);
/// assert_eq!(playback.advance(10_250, 1000), 250);
///
/// playback.set_paused(true, 10_250);
/// assert_eq!(playback.advance(99_999, 1000), 250);
///
/// playback.set_paused(false, 20_000);
/// assert_eq!(playback.advance(20_000, 1000), 250);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Playback {
    paused: bool,
    /// Start of the current playback epoch, set on the first unpaused advance
    start: Option<i64>,
    /// Last computed or seeked offset
    offset_ms: i32,
}

impl Playback {
    /// Create playback state, optionally starting paused.
    pub fn new(paused: bool) -> Self {
        Self {
            paused,
            start: None,
            offset_ms: 0,
        }
    }

    /// Compute the offset to display at time `now`.
    ///
    /// While paused the stored offset is returned unchanged.
    pub fn advance(&mut self, now: i64, duration: i32) -> i32 {
        if !self.paused {
            let start = *self.start.get_or_insert(now);
            self.offset_ms = offset_at(now, start, duration);
        }
        self.offset_ms
    }

    /// Set the offset directly. The value is stored verbatim.
    pub fn seek(&mut self, offset_ms: i32) {
        self.offset_ms = offset_ms;
    }

    /// Pause or resume.
    ///
    /// Resuming moves the epoch start so the next advance continues from the
    /// current offset instead of skipping the time spent paused.
    pub fn set_paused(&mut self, paused: bool, now: i64) {
        if self.paused && !paused {
            self.start = Some(now - self.offset_ms as i64);
        }
        self.paused = paused;
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn offset(&self) -> i32 {
        self.offset_ms
    }

    #[inline]
    pub fn start(&self) -> Option<i64> {
        self.start
    }

    /// Forget the epoch and offset, keeping the pause flag.
    pub fn reset(&mut self) {
        self.start = None;
        self.offset_ms = 0;
    }
}
