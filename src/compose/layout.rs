use crate::config::PageGeometry;
use crate::error::Error;
use crate::surface::{PageHandle, Surface};

/// Vertical layout cursor for one document build.
///
/// The cursor only moves down the current page or onto a fresh one; content
/// already placed is never revisited.
#[derive(Debug)]
pub struct Pager {
    geometry: PageGeometry,
    page: PageHandle,
    y: f32,
    pages: usize,
}

impl Pager {
    /// Open the first page with the cursor at the top margin.
    pub fn start(surface: &mut impl Surface, geometry: PageGeometry) -> Self {
        let page = surface.add_page(geometry.width, geometry.height);
        Self {
            geometry,
            page,
            y: geometry.top,
            pages: 1,
        }
    }

    pub fn page(&self) -> PageHandle {
        self.page
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Start a new page when the cursor has dropped below `min_remaining`.
    /// Returns whether a page was added.
    pub fn ensure_space(&mut self, surface: &mut impl Surface, min_remaining: f32) -> bool {
        if self.y >= min_remaining {
            return false;
        }
        self.new_page(surface);
        true
    }

    pub fn new_page(&mut self, surface: &mut impl Surface) {
        self.page = surface.add_page(self.geometry.width, self.geometry.height);
        self.y = self.geometry.top;
        self.pages += 1;
        log::debug!("PAGER new page #{}", self.pages);
    }

    pub fn advance(&mut self, delta: f32) {
        self.y -= delta;
    }

    /// Move the cursor down to `y`, typically the value returned by
    /// [`draw_table`](super::table::draw_table).
    pub fn advance_to(&mut self, y: f32) -> Result<(), Error> {
        if y > self.y {
            return Err(Error::Surface(format!(
                "cursor cannot move up the page ({:.2} -> {:.2})",
                self.y, y
            )));
        }
        self.y = y;
        Ok(())
    }

    /// Clamp the cursor to no higher than `floor`.
    pub fn pin_to(&mut self, floor: f32) {
        self.y = self.y.min(floor);
    }
}
