//! The drawing capability the composer renders through.
//!
//! Coordinates are PDF points with the origin at the bottom-left corner of
//! the page, so a cursor moving down the page decreases `y`.

use serde::Deserialize;

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);

    pub const fn gray(level: f32) -> Rgb {
        Rgb(level, level, level)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PageHandle(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FontHandle(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// The regular/bold pair embedded once per document.
#[derive(Clone, Copy, Debug)]
pub struct Fonts {
    pub regular: FontHandle,
    pub bold: FontHandle,
}

impl Fonts {
    pub fn embed(surface: &mut impl Surface) -> Result<Self, Error> {
        Ok(Self {
            regular: surface.embed_font(FontWeight::Regular)?,
            bold: surface.embed_font(FontWeight::Bold)?,
        })
    }

    pub fn get(&self, weight: FontWeight) -> FontHandle {
        match weight {
            FontWeight::Regular => self.regular,
            FontWeight::Bold => self.bold,
        }
    }
}

/// A single line of text; `y` is the baseline.
#[derive(Clone, Copy, Debug)]
pub struct TextStyle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub font: FontHandle,
    pub color: Rgb,
}

/// An axis-aligned rectangle; `y` is its bottom edge. `fill` and `border`
/// are independent, either may be absent.
#[derive(Clone, Copy, Debug)]
pub struct RectStyle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub fill: Option<Rgb>,
    pub border: Option<Border>,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Border {
    pub color: Rgb,
    pub width: f32,
}

pub trait Surface {
    fn add_page(&mut self, width: f32, height: f32) -> PageHandle;

    fn embed_font(&mut self, weight: FontWeight) -> Result<FontHandle, Error>;

    fn draw_text(&mut self, page: PageHandle, text: &str, style: TextStyle) -> Result<(), Error>;

    fn draw_rect(&mut self, page: PageHandle, rect: RectStyle) -> Result<(), Error>;

    fn page_count(&self) -> usize;

    /// Serialize every page into the finished document.
    fn save(self) -> Result<Vec<u8>, Error>
    where
        Self: Sized;
}
