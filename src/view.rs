//! The animated GIF view and the host-facing view interface.

use crate::attributes::ViewAttributes;
use crate::clock::{Clock, SystemClock};
use crate::movie::{DecodeError, Movie};
use crate::playback::Playback;
use crate::render::Surface;
use crate::resources::{ResourceId, ResourceProvider};
use crate::sizing::{self, MeasureSpec, Padding, Size};

/// Capabilities a host layout/paint loop drives.
pub trait View {
    /// Report the desired size for the given constraints.
    fn measure(&mut self, width_spec: MeasureSpec, height_spec: MeasureSpec) -> Size;
    /// Assign the final box. May differ from the measured size.
    fn layout(&mut self, width: u32, height: u32);
    /// Paint onto `surface`.
    fn draw(&mut self, surface: &mut dyn Surface);
    /// The view joined the host tree.
    fn attach(&mut self);
    /// The view left the host tree.
    fn detach(&mut self);
}

/// Compositing path the host should use for this view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayerType {
    /// Host default, possibly hardware accelerated
    #[default]
    Hardware,
    /// Software-rendered surface
    Software,
}

/// Pending work the view asked the host to schedule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Invalidation {
    pub paint: bool,
    pub layout: bool,
}

impl Invalidation {
    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.paint && !self.layout
    }
}

/// A view that plays an animated GIF, stretched to fill its layout box.
///
/// The movie is decoded once when a resource is assigned. Every paint pass
/// picks the frame from elapsed clock time modulo the movie duration and asks
/// for another paint, so the animation runs for as long as the host keeps
/// honouring [`GifMovieView::take_invalidation`].
///
/// ## Example
///
/// ```rust
/// use gif_movie_view::{
///     GifMovieView, ManualClock, MeasureSpec, MemoryResources, RecordingSurface, View,
///     ViewAttributes,
/// };
///
/// let clock = ManualClock::new(0);
/// let mut view = GifMovieView::with_clock(MemoryResources::new(), clock, &ViewAttributes::default());
/// view.attach();
///
/// // Nothing configured: measuring works, drawing is a no-op
/// let size = view.measure(MeasureSpec::exactly(64), MeasureSpec::exactly(32));
/// assert_eq!((size.width, size.height), (64, 32));
///
/// let mut surface = RecordingSurface::new();
/// view.draw(&mut surface);
/// assert!(surface.ops().is_empty());
/// ```
#[derive(Debug)]
pub struct GifMovieView<R, C = SystemClock> {
    resources: R,
    clock: C,
    resource_id: Option<ResourceId>,
    movie: Option<Movie>,
    playback: Playback,
    intrinsic: Size,
    layout: Size,
    padding: Padding,
    layer_type: LayerType,
    attached: bool,
    pending: Invalidation,
}

impl<R: ResourceProvider> GifMovieView<R> {
    /// Create a view using the system monotonic clock.
    pub fn new(resources: R, attrs: &ViewAttributes) -> Self {
        Self::with_clock(resources, SystemClock::new(), attrs)
    }
}

impl<R: ResourceProvider, C: Clock> GifMovieView<R, C> {
    /// Create a view with an explicit clock.
    pub fn with_clock(resources: R, clock: C, attrs: &ViewAttributes) -> Self {
        let mut view = Self {
            resources,
            clock,
            resource_id: None,
            movie: None,
            playback: Playback::default(),
            intrinsic: Size::default(),
            layout: Size::default(),
            padding: Padding::default(),
            layer_type: LayerType::default(),
            attached: false,
            pending: Invalidation::default(),
        };
        view.configure(attrs);
        view
    }

    /// Apply configuration attributes.
    ///
    /// Always switches the view to a software layer: frames are blitted through
    /// plain surface operations that hardware compositing paths do not honour.
    pub fn configure(&mut self, attrs: &ViewAttributes) {
        self.layer_type = LayerType::Software;
        self.playback = Playback::new(attrs.paused);
        self.resource_id = attrs.resource_id();
        self.movie = None;
        self.intrinsic = Size::default();
        if let Some(id) = self.resource_id {
            self.load(id);
        }
    }

    /// Replace the movie with one decoded from `id` and request a new layout.
    ///
    /// On failure the view keeps no movie and draws nothing until another
    /// resource is assigned.
    pub fn set_movie_resource(&mut self, id: ResourceId) {
        tracing::debug!(resource = %id, "replacing movie resource");
        self.resource_id = Some(id);
        self.movie = None;
        self.playback.reset();
        self.load(id);
        self.request_layout();
    }

    /// Seek to `time_ms` within the loop and request a repaint.
    ///
    /// The value is not clamped. Frame selection treats negative values as the
    /// first frame and values past the end as the last frame, and playback
    /// wraps back into range on the next unpaused paint.
    pub fn set_movie_time(&mut self, time_ms: i32) {
        self.playback.seek(time_ms);
        self.invalidate();
    }

    /// Pause or resume. Resuming continues from the current offset.
    pub fn set_paused(&mut self, paused: bool) {
        if paused != self.playback.is_paused() {
            tracing::debug!(paused, offset_ms = self.playback.offset(), "playback state changed");
        }
        let now = self.now();
        self.playback.set_paused(paused, now);
        self.invalidate();
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.playback.is_paused()
    }

    /// Set the padding insets used by the measure pass.
    pub fn set_padding(&mut self, padding: Padding) {
        if self.padding != padding {
            self.padding = padding;
            self.request_layout();
        }
    }

    #[inline]
    pub fn padding(&self) -> Padding {
        self.padding
    }

    #[inline]
    pub fn movie(&self) -> Option<&Movie> {
        self.movie.as_ref()
    }

    #[inline]
    pub fn resource_id(&self) -> Option<ResourceId> {
        self.resource_id
    }

    /// Current offset within the loop in milliseconds.
    #[inline]
    pub fn movie_time(&self) -> i32 {
        self.playback.offset()
    }

    /// Pixel size of the decoded movie, zero when none is loaded.
    #[inline]
    pub fn intrinsic_size(&self) -> Size {
        self.intrinsic
    }

    #[inline]
    pub fn layout_size(&self) -> Size {
        self.layout
    }

    /// Scale factors the next paint pass will apply.
    #[inline]
    pub fn scale_factors(&self) -> (f32, f32) {
        sizing::scale_factors(self.layout, self.intrinsic)
    }

    #[inline]
    pub fn layer_type(&self) -> LayerType {
        self.layer_type
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Whether the host should keep delivering frame ticks.
    ///
    /// True while attached with a movie loaded, regardless of pause state.
    #[inline]
    pub fn wants_frame_ticks(&self) -> bool {
        self.attached && self.movie.is_some()
    }

    /// Collect and clear pending repaint/relayout requests.
    pub fn take_invalidation(&mut self) -> Invalidation {
        std::mem::take(&mut self.pending)
    }

    fn now(&self) -> i64 {
        self.clock.uptime_millis() as i64
    }

    fn load(&mut self, id: ResourceId) {
        match self.decode(id) {
            Ok(movie) => {
                self.intrinsic = Size::new(movie.width(), movie.height());
                self.movie = Some(movie);
            }
            Err(err) => {
                tracing::warn!(resource = %id, error = %err, "failed to load movie");
                self.intrinsic = Size::default();
            }
        }
    }

    fn decode(&self, id: ResourceId) -> Result<Movie, DecodeError> {
        let bytes = self.resources.open_raw_resource(id)?;
        Movie::decode(&bytes)
    }

    fn invalidate(&mut self) {
        if self.attached {
            self.pending.paint = true;
        }
    }

    fn request_layout(&mut self) {
        if self.attached {
            self.pending.layout = true;
            self.pending.paint = true;
        }
    }
}

impl<R: ResourceProvider, C: Clock> View for GifMovieView<R, C> {
    fn measure(&mut self, width_spec: MeasureSpec, height_spec: MeasureSpec) -> Size {
        let size = sizing::measure(width_spec, height_spec, self.intrinsic, self.padding);
        self.layout = size;
        size
    }

    fn layout(&mut self, width: u32, height: u32) {
        self.layout = Size::new(width, height);
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        let now = self.now();
        let Some(movie) = self.movie.as_mut() else {
            return;
        };

        let duration = i32::try_from(movie.duration()).unwrap_or(i32::MAX);
        let offset = self.playback.advance(now, duration);
        movie.set_time(offset);

        let (sx, sy) = sizing::scale_factors(self.layout, self.intrinsic);
        surface.save();
        surface.scale(sx, sy);
        movie.draw(surface, 0.0, 0.0);
        self.invalidate();
        surface.restore();
    }

    fn attach(&mut self) {
        self.attached = true;
        if self.movie.is_some() {
            self.pending.paint = true;
        }
    }

    fn detach(&mut self) {
        self.attached = false;
        self.pending = Invalidation::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::render::RecordingSurface;
    use crate::resources::MemoryResources;
    use crate::test_support::{encode_gif, BLUE, GREEN, RED};

    const FOUR_FRAMES: ResourceId = ResourceId(1);
    const TALL: ResourceId = ResourceId(2);
    const BROKEN: ResourceId = ResourceId(3);

    /// 100x50, four 250ms frames, plus a 10x40 two-frame movie and a corrupt entry.
    fn resources() -> MemoryResources {
        let mut resources = MemoryResources::new();
        resources.insert(
            FOUR_FRAMES,
            encode_gif(100, 50, &[(RED, 250), (GREEN, 250), (BLUE, 250), (RED, 250)]),
        );
        resources.insert(TALL, encode_gif(10, 40, &[(GREEN, 100), (BLUE, 100)]));
        resources.insert(BROKEN, b"GIF89a but not really".to_vec());
        resources
    }

    fn view_with(id: Option<ResourceId>, paused: bool) -> (GifMovieView<MemoryResources, ManualClock>, ManualClock) {
        let clock = ManualClock::new(0);
        let attrs = ViewAttributes::new(id, paused);
        let mut view = GifMovieView::with_clock(resources(), clock.clone(), &attrs);
        view.attach();
        (view, clock)
    }

    fn paint(view: &mut GifMovieView<MemoryResources, ManualClock>) -> RecordingSurface {
        let mut surface = RecordingSurface::new();
        view.draw(&mut surface);
        surface
    }

    #[test]
    fn test_configure_decodes_and_forces_software_layer() {
        let (view, _) = view_with(Some(FOUR_FRAMES), false);
        assert_eq!(view.intrinsic_size(), Size::new(100, 50));
        assert_eq!(view.movie().unwrap().duration(), 1000);
        assert_eq!(view.layer_type(), LayerType::Software);
        assert!(!view.is_paused());

        let (unset, _) = view_with(None, true);
        assert!(unset.movie().is_none());
        assert_eq!(unset.layer_type(), LayerType::Software);
        assert!(unset.is_paused());
    }

    #[test]
    fn test_draw_without_movie_is_noop() {
        let (mut view, _) = view_with(None, false);
        view.take_invalidation();
        let surface = paint(&mut view);
        assert!(surface.ops().is_empty());
        assert!(view.take_invalidation().is_empty());
    }

    #[test]
    fn test_broken_resource_is_silent() {
        let (mut view, _) = view_with(Some(BROKEN), false);
        assert_eq!(view.resource_id(), Some(BROKEN));
        assert!(view.movie().is_none());
        assert_eq!(view.intrinsic_size(), Size::default());
        assert!(paint(&mut view).ops().is_empty());

        view.set_movie_resource(ResourceId(99));
        assert!(view.movie().is_none());
    }

    #[test]
    fn test_measure() {
        let (mut view, _) = view_with(Some(FOUR_FRAMES), false);
        view.set_padding(Padding {
            left: 2,
            top: 1,
            right: 3,
            bottom: 4,
        });

        let exact = view.measure(MeasureSpec::exactly(640), MeasureSpec::exactly(20));
        assert_eq!(exact, Size::new(640, 20));

        let wrap = view.measure(MeasureSpec::unspecified(), MeasureSpec::at_most(10));
        assert_eq!(wrap, Size::new(105, 55));
        assert_eq!(view.layout_size(), wrap);
    }

    #[test]
    fn test_playback_scenario() {
        let (mut view, clock) = view_with(Some(FOUR_FRAMES), false);
        view.measure(MeasureSpec::exactly(200), MeasureSpec::exactly(50));

        let mut offsets = Vec::new();
        for t in [0, 250, 1000, 1250] {
            clock.set(t);
            let surface = paint(&mut view);
            offsets.push(view.movie_time());

            let (_, x, y, scale) = surface.images().next().unwrap();
            assert_eq!((x, y), (0.0, 0.0));
            assert_eq!(scale, (2.0, 1.0));
        }
        assert_eq!(offsets, vec![0, 250, 0, 250]);
    }

    #[test]
    fn test_frame_follows_clock() {
        let (mut view, clock) = view_with(Some(FOUR_FRAMES), false);
        view.measure(MeasureSpec::unspecified(), MeasureSpec::unspecified());

        clock.set(10_000);
        paint(&mut view);
        clock.advance(260);
        let surface = paint(&mut view);

        assert_eq!(view.movie().unwrap().current_frame_index(), 1);
        let (image, _, _, _) = surface.images().next().unwrap();
        assert_eq!(image.get_pixel(0, 0), &GREEN);
    }

    #[test]
    fn test_paint_balances_surface_and_requests_repaint() {
        let (mut view, _) = view_with(Some(FOUR_FRAMES), false);
        view.take_invalidation();

        let surface = paint(&mut view);
        assert_eq!(surface.save_depth(), 0);
        assert_eq!(surface.current_scale(), (1.0, 1.0));
        assert_eq!(
            view.take_invalidation(),
            Invalidation {
                paint: true,
                layout: false
            }
        );
    }

    #[test]
    fn test_paused_keeps_repainting_same_frame() {
        let (mut view, clock) = view_with(Some(FOUR_FRAMES), true);
        view.take_invalidation();

        clock.set(700);
        paint(&mut view);
        assert_eq!(view.movie_time(), 0);
        assert!(view.take_invalidation().paint);
    }

    #[test]
    fn test_seek_while_paused() {
        let (mut view, clock) = view_with(Some(FOUR_FRAMES), true);
        view.take_invalidation();

        view.set_movie_time(620);
        assert!(view.take_invalidation().paint);
        assert!(view.is_paused());

        clock.advance(3_000);
        paint(&mut view);
        assert_eq!(view.movie().unwrap().time(), 620);
        assert_eq!(view.movie().unwrap().current_frame_index(), 2);
    }

    #[test]
    fn test_pause_and_resume_keeps_offset() {
        let (mut view, clock) = view_with(Some(FOUR_FRAMES), false);

        paint(&mut view);
        clock.set(300);
        paint(&mut view);
        assert_eq!(view.movie_time(), 300);

        view.set_paused(true);
        clock.advance(5_000);
        paint(&mut view);
        assert_eq!(view.movie_time(), 300);

        view.set_paused(false);
        assert_eq!(view.movie_time(), 300);
        paint(&mut view);
        assert_eq!(view.movie_time(), 300);

        clock.advance(100);
        paint(&mut view);
        assert_eq!(view.movie_time(), 400);
    }

    #[test]
    fn test_set_movie_resource_replaces_and_relayouts() {
        let (mut view, clock) = view_with(Some(FOUR_FRAMES), false);
        clock.set(400);
        paint(&mut view);
        view.take_invalidation();

        view.set_movie_resource(TALL);
        assert_eq!(view.resource_id(), Some(TALL));
        assert_eq!(view.intrinsic_size(), Size::new(10, 40));
        assert_eq!(view.movie_time(), 0);
        assert_eq!(
            view.take_invalidation(),
            Invalidation {
                paint: true,
                layout: true
            }
        );

        let size = view.measure(MeasureSpec::unspecified(), MeasureSpec::unspecified());
        assert_eq!(size, Size::new(10, 40));
        view.layout(20, 20);
        assert_eq!(view.scale_factors(), (2.0, 0.5));
    }

    #[test]
    fn test_detached_view_records_nothing() {
        let (mut view, _) = view_with(Some(FOUR_FRAMES), false);
        assert!(view.wants_frame_ticks());

        view.detach();
        assert!(!view.wants_frame_ticks());
        assert!(view.take_invalidation().is_empty());

        paint(&mut view);
        view.set_movie_time(10);
        assert!(view.take_invalidation().is_empty());

        view.attach();
        assert!(view.take_invalidation().paint);
    }

    #[test]
    fn test_layout_overrides_measured_size() {
        let (mut view, _) = view_with(Some(FOUR_FRAMES), false);
        view.measure(MeasureSpec::unspecified(), MeasureSpec::unspecified());
        assert_eq!(view.scale_factors(), (1.0, 1.0));

        view.layout(50, 150);
        let surface = paint(&mut view);
        let (_, _, _, scale) = surface.images().next().unwrap();
        assert_eq!(scale, (0.5, 3.0));
    }
}
