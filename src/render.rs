//! Drawing surfaces a movie frame can be painted onto.

use image::RgbaImage;

/// A 2D drawing target with a save/restore transform stack.
///
/// This is the minimal set of canvas operations the view needs. Each back-end
/// (command recorder, software rasteriser, HTML canvas) implements it.
pub trait Surface {
    /// Push the current transform.
    fn save(&mut self);
    /// Post-multiply the current transform by a scale.
    fn scale(&mut self, sx: f32, sy: f32);
    /// Draw an RGBA image with its top-left corner at `(x, y)` in the current
    /// transform's coordinate space.
    fn draw_image(&mut self, image: &RgbaImage, x: f32, y: f32);
    /// Pop the transform pushed by the matching [`Surface::save`].
    fn restore(&mut self);
}

/// A single recorded surface operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Save,
    Scale { sx: f32, sy: f32 },
    Image {
        image: RgbaImage,
        x: f32,
        y: f32,
        /// Accumulated scale in effect when the image was drawn
        scale: (f32, f32),
    },
    Restore,
}

/// Surface that records draw commands instead of rasterising them.
///
/// This is a platform-agnostic representation of what needs to be drawn.
/// Each consumer can replay the commands on its own rendering backend.
///
/// ## Example
///
/// ```rust
/// use gif_movie_view::{RecordingSurface, Surface};
/// use image::RgbaImage;
///
/// let mut surface = RecordingSurface::new();
/// surface.save();
/// surface.scale(2.0, 0.5);
/// surface.draw_image(&RgbaImage::new(4, 4), 0.0, 0.0);
/// surface.restore();
///
/// assert_eq!(surface.images().count(), 1);
/// assert_eq!(surface.current_scale(), (1.0, 1.0));
/// ```
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    scale: (f32, f32),
    stack: Vec<(f32, f32)>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            scale: (1.0, 1.0),
            stack: Vec::new(),
        }
    }

    /// All recorded operations in order.
    #[inline]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Only the image draws, as `(image, x, y, scale)`.
    pub fn images(&self) -> impl Iterator<Item = (&RgbaImage, f32, f32, (f32, f32))> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Image { image, x, y, scale } => Some((image, *x, *y, *scale)),
            _ => None,
        })
    }

    /// Scale currently in effect.
    #[inline]
    pub fn current_scale(&self) -> (f32, f32) {
        self.scale
    }

    /// Depth of the save stack. Zero when every save was restored.
    #[inline]
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    /// Drop recorded operations, keeping the transform state.
    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Surface for RecordingSurface {
    fn save(&mut self) {
        self.stack.push(self.scale);
        self.ops.push(DrawOp::Save);
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.scale = (self.scale.0 * sx, self.scale.1 * sy);
        self.ops.push(DrawOp::Scale { sx, sy });
    }

    fn draw_image(&mut self, image: &RgbaImage, x: f32, y: f32) {
        self.ops.push(DrawOp::Image {
            image: image.clone(),
            x,
            y,
            scale: self.scale,
        });
    }

    fn restore(&mut self) {
        if let Some(scale) = self.stack.pop() {
            self.scale = scale;
        }
        self.ops.push(DrawOp::Restore);
    }
}

/// Software rasteriser surface.
#[cfg(feature = "raster")]
pub mod raster {
    use super::*;
    use tiny_skia::{Color, IntSize, Pixmap, PixmapPaint, Transform};

    /// A [`Surface`] that paints into an owned `tiny_skia::Pixmap`.
    #[derive(Clone, Debug)]
    pub struct PixmapSurface {
        pixmap: Pixmap,
        transform: Transform,
        stack: Vec<Transform>,
    }

    impl PixmapSurface {
        /// Create a transparent surface. Returns `None` for zero dimensions.
        pub fn new(width: u32, height: u32) -> Option<Self> {
            Some(Self {
                pixmap: Pixmap::new(width, height)?,
                transform: Transform::identity(),
                stack: Vec::new(),
            })
        }

        #[inline]
        pub fn pixmap(&self) -> &Pixmap {
            &self.pixmap
        }

        pub fn into_pixmap(self) -> Pixmap {
            self.pixmap
        }

        /// Fill the whole surface, ignoring the transform.
        pub fn clear(&mut self, color: Color) {
            self.pixmap.fill(color);
        }
    }

    /// Convert straight-alpha RGBA into the premultiplied layout tiny-skia expects.
    fn to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
        let size = IntSize::from_wh(image.width(), image.height())?;
        let mut data = image.as_raw().clone();
        for px in data.chunks_exact_mut(4) {
            let a = px[3] as u16;
            for c in &mut px[..3] {
                *c = ((*c as u16 * a + 127) / 255) as u8;
            }
        }
        Pixmap::from_vec(data, size)
    }

    impl Surface for PixmapSurface {
        fn save(&mut self) {
            self.stack.push(self.transform);
        }

        fn scale(&mut self, sx: f32, sy: f32) {
            self.transform = self.transform.pre_scale(sx, sy);
        }

        fn draw_image(&mut self, image: &RgbaImage, x: f32, y: f32) {
            let Some(src) = to_pixmap(image) else {
                tracing::warn!(
                    width = image.width(),
                    height = image.height(),
                    "skipping frame that cannot be converted to a pixmap"
                );
                return;
            };
            self.pixmap.draw_pixmap(
                x as i32,
                y as i32,
                src.as_ref(),
                &PixmapPaint::default(),
                self.transform,
                None,
            );
        }

        fn restore(&mut self) {
            if let Some(transform) = self.stack.pop() {
                self.transform = transform;
            }
        }
    }

}

/// Web-specific rendering implementation.
#[cfg(feature = "web")]
pub mod web {
    use super::*;
    use wasm_bindgen::{Clamped, JsCast};
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

    fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, String> {
        canvas
            .get_context("2d")
            .map_err(|_| "Failed to get 2d context")?
            .ok_or("No 2d context available")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "Failed to cast to CanvasRenderingContext2d".to_string())
    }

    /// A [`Surface`] over an HTML canvas 2D context.
    ///
    /// `putImageData` ignores the context transform, so each frame is staged
    /// on an offscreen canvas and then drawn with `drawImage`.
    #[derive(Clone, Debug)]
    pub struct CanvasSurface {
        ctx: CanvasRenderingContext2d,
        scratch: HtmlCanvasElement,
        scratch_ctx: CanvasRenderingContext2d,
    }

    impl CanvasSurface {
        /// Wrap a visible canvas element.
        pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, String> {
            let ctx = context_2d(canvas)?;
            let window = web_sys::window().ok_or("No window available")?;
            let document = window.document().ok_or("No document available")?;
            let scratch = document
                .create_element("canvas")
                .map_err(|_| "Failed to create canvas element")?
                .dyn_into::<HtmlCanvasElement>()
                .map_err(|_| "Failed to cast element to HtmlCanvasElement")?;
            let scratch_ctx = context_2d(&scratch)?;
            Ok(Self {
                ctx,
                scratch,
                scratch_ctx,
            })
        }

        /// Clear the visible canvas with an identity transform.
        pub fn clear(&self, width: f64, height: f64) {
            self.ctx.save();
            if let Err(err) = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0) {
                tracing::warn!(?err, "failed to reset transform");
            }
            self.ctx.clear_rect(0.0, 0.0, width, height);
            self.ctx.restore();
        }

        fn stage(&self, image: &RgbaImage) -> Result<(), String> {
            if self.scratch.width() != image.width() || self.scratch.height() != image.height() {
                self.scratch.set_width(image.width());
                self.scratch.set_height(image.height());
            }
            let data = ImageData::new_with_u8_clamped_array_and_sh(
                Clamped(image.as_raw().as_slice()),
                image.width(),
                image.height(),
            )
            .map_err(|_| "Failed to create ImageData")?;
            self.scratch_ctx
                .put_image_data(&data, 0.0, 0.0)
                .map_err(|_| "Failed to put image data".to_string())
        }
    }

    impl Surface for CanvasSurface {
        fn save(&mut self) {
            self.ctx.save();
        }

        fn scale(&mut self, sx: f32, sy: f32) {
            if let Err(err) = self.ctx.scale(sx as f64, sy as f64) {
                tracing::warn!(?err, "failed to scale canvas context");
            }
        }

        fn draw_image(&mut self, image: &RgbaImage, x: f32, y: f32) {
            if let Err(err) = self.stage(image) {
                tracing::warn!(%err, "failed to stage frame");
                return;
            }
            if let Err(err) = self
                .ctx
                .draw_image_with_html_canvas_element(&self.scratch, x as f64, y as f64)
            {
                tracing::warn!(?err, "failed to draw frame");
            }
        }

        fn restore(&mut self) {
            self.ctx.restore();
        }
    }
}
