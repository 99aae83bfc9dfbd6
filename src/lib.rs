//! # gif-movie-view
//!
//! An animated GIF view that any host layout/paint loop can drive.
//!
//! This crate provides platform-agnostic data structures and logic for:
//! - Decoding an animated GIF once per resource assignment
//! - Selecting the frame to show from elapsed clock time modulo the loop duration
//! - Measuring against host constraints and stretching frames to fit the layout box
//! - Pausing, resuming without skipping time, and seeking
//! - Painting onto a command recorder, a software raster, or an HTML canvas
//!
//! ## Features
//!
//! - `raster` (default) - `tiny-skia` pixmap surface
//! - `web` - HTML canvas surface for WASM hosts
//! - `serde` - Serialization for configuration types
//! - `toml` - Parse [`ViewAttributes`] from TOML
//!
//! ## Example
//!
//! ```rust,ignore
//! use gif_movie_view::{GifMovieView, MeasureSpec, MemoryResources, ResourceId, View, ViewAttributes};
//!
//! let mut resources = MemoryResources::new();
//! resources.insert_file(ResourceId(1), "spinner.gif")?;
//!
//! let attrs = ViewAttributes::new(Some(ResourceId(1)), false);
//! let mut view = GifMovieView::new(resources, &attrs);
//! view.attach();
//! view.measure(MeasureSpec::exactly(320), MeasureSpec::exactly(240));
//!
//! // Host loop: paint whenever the view asks for it
//! loop {
//!     if view.take_invalidation().paint {
//!         view.draw(&mut surface);
//!     }
//! }
//! ```

mod attributes;
mod clock;
mod movie;
mod playback;
pub mod render;
mod resources;
pub mod sizing;
mod view;

pub use attributes::ViewAttributes;
pub use clock::{Clock, ManualClock, SystemClock};
pub use movie::{DecodeError, Movie, MovieFrame};
pub use playback::{effective_duration, offset_at, Playback, DEFAULT_DURATION_MS};
pub use render::{DrawOp, RecordingSurface, Surface};
pub use resources::{MemoryResources, ResourceId, ResourceProvider};
pub use sizing::{MeasureMode, MeasureSpec, Padding, Size};
pub use view::{GifMovieView, Invalidation, LayerType, View};

#[cfg(feature = "raster")]
pub use render::raster::PixmapSurface;
#[cfg(feature = "web")]
pub use render::web::CanvasSurface;
