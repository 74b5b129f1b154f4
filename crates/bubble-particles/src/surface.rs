//! Drawing-surface port and a recording implementation

/// The canvas a bubble engine paints onto.
///
/// Rasterization, DPI handling and invalidation belong to the host; the
/// engine only describes what to draw.
pub trait DrawSurface {
    /// Image handle. Each bubble keeps its own clone of the image that was
    /// current when it spawned.
    type Image: Clone;

    /// Draw `image` with its top-left corner at `(x, y)`, scaled to `width`x`height`.
    fn draw(&mut self, image: &Self::Image, x: i32, y: i32, width: i32, height: i32, alpha: u8);

    /// Ask the host to run a draw pass soon
    fn request_redraw(&mut self);
}

/// One recorded `draw` call
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall<I> {
    pub image: I,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub alpha: u8,
}

/// A surface that records what it was asked to do instead of rendering
#[derive(Debug)]
pub struct RecordingSurface<I = String> {
    draws: Vec<DrawCall<I>>,
    redraw_requests: usize,
}

impl<I> RecordingSurface<I> {
    pub fn new() -> Self {
        Self {
            draws: Vec::new(),
            redraw_requests: 0,
        }
    }

    pub fn draws(&self) -> &[DrawCall<I>] {
        &self.draws
    }

    /// Drain recorded draw calls
    pub fn take_draws(&mut self) -> Vec<DrawCall<I>> {
        std::mem::take(&mut self.draws)
    }

    pub fn redraw_requests(&self) -> usize {
        self.redraw_requests
    }
}

impl<I> Default for RecordingSurface<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Clone> DrawSurface for RecordingSurface<I> {
    type Image = I;

    fn draw(&mut self, image: &I, x: i32, y: i32, width: i32, height: i32, alpha: u8) {
        self.draws.push(DrawCall {
            image: image.clone(),
            x,
            y,
            width,
            height,
            alpha,
        });
    }

    fn request_redraw(&mut self) {
        self.redraw_requests += 1;
    }
}
