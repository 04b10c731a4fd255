use crate::report::surface::Surface;

/// Vertical position and page number threaded through every renderer.
///
/// `y` is measured in points from the top edge of the current page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCursor {
    pub y: f64,
    page: usize,
}

impl LayoutCursor {
    /// Cursor on page 1 at `top`.
    pub fn new(top: f64) -> Self {
        Self { y: top, page: 1 }
    }

    /// 1-based page number.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Moves down; negative steps are ignored so `y` never goes back up.
    pub fn advance(&mut self, dy: f64) {
        self.y += dy.max(0.0);
    }

    pub fn start_page(&mut self, top: f64) {
        self.page += 1;
        self.y = top;
    }
}

/// Starts a new page when `needed` points no longer fit below the cursor.
///
/// A cursor still at the top of its page is left alone: content taller than
/// a whole page would not fit on the next one either.
pub fn ensure_space<S: Surface + ?Sized>(surface: &mut S, cursor: &mut LayoutCursor, needed: f64) -> bool {
    let geometry = surface.geometry();
    if cursor.y + needed <= geometry.bottom() || cursor.y <= geometry.top() {
        return false;
    }

    surface.new_page();
    cursor.start_page(geometry.top());
    tracing::debug!(page = cursor.page(), needed, "page break");
    true
}
