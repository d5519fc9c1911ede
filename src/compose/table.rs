use serde::Deserialize;

use crate::error::Error;
use crate::surface::{Border, Fonts, PageHandle, RectStyle, Rgb, Surface, TextStyle};

/// Fixed grid styling. Row 0 is the header; row 1 is left unfilled so the
/// primary result stands out; later rows are striped.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct TableStyle {
    pub row_height: f32,
    pub cell_padding: f32,
    /// Text baseline offset above the row cursor.
    pub text_rise: f32,
    /// Cell rectangles start this far below the row cursor.
    pub cell_drop: f32,
    pub font_size: f32,
    /// Space left below the last row.
    pub gap_after: f32,
    pub header_fill: Rgb,
    pub header_text: Rgb,
    pub stripe_fill: Rgb,
    pub body_text: Rgb,
    pub border: Border,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            row_height: 18.0,
            cell_padding: 4.0,
            text_rise: 2.0,
            cell_drop: 4.0,
            font_size: 7.0,
            gap_after: 10.0,
            header_fill: Rgb(0.122, 0.306, 0.475), // #1F4E79
            header_text: Rgb::WHITE,
            stripe_fill: Rgb(0.91, 0.956, 0.992), // #E8F4FD
            body_text: Rgb::gray(0.2),
            border: Border {
                color: Rgb::gray(0.8),
                width: 0.5,
            },
        }
    }
}

/// Header row plus data rows, all cells pre-formatted.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    pub col_widths: Vec<f32>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(col_widths: &[f32], header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            col_widths: col_widths.to_vec(),
            rows: vec![header.into_iter().map(Into::into).collect()],
        }
    }

    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    pub fn width(&self) -> f32 {
        self.col_widths.iter().sum()
    }

    /// Vertical space consumed by [`draw_table`], including the trailing gap.
    pub fn height(&self, style: &TableStyle) -> f32 {
        self.rows.len() as f32 * style.row_height + style.gap_after
    }
}

/// Draw `table` with its first row's cursor at `(x, y)` and return the cursor
/// below it. Cells are neither wrapped nor clipped.
pub fn draw_table(
    surface: &mut impl Surface,
    page: PageHandle,
    table: &Table,
    x: f32,
    y: f32,
    style: &TableStyle,
    fonts: &Fonts,
) -> Result<f32, Error> {
    let mut row_y = y;

    for (ri, row) in table.rows.iter().enumerate() {
        if row.len() != table.col_widths.len() {
            log::warn!(
                "TABLE row={} has {} cells for {} columns",
                ri,
                row.len(),
                table.col_widths.len()
            );
        }
        log::debug!("TABLE row={} cells={} row_y={:.2}", ri, row.len(), row_y);

        let fill = match ri {
            0 => Some(style.header_fill),
            1 => None,
            _ => Some(style.stripe_fill),
        };
        let (font, color) = if ri == 0 {
            (fonts.bold, style.header_text)
        } else {
            (fonts.regular, style.body_text)
        };

        let mut cell_x = x;
        for (text, &cell_w) in row.iter().zip(table.col_widths.iter()) {
            let cell = RectStyle {
                x: cell_x,
                y: row_y - style.cell_drop,
                width: cell_w,
                height: style.row_height,
                fill: None,
                border: None,
            };
            if fill.is_some() {
                surface.draw_rect(page, RectStyle { fill, ..cell })?;
            }
            surface.draw_rect(
                page,
                RectStyle {
                    border: Some(style.border),
                    ..cell
                },
            )?;
            surface.draw_text(
                page,
                text,
                TextStyle {
                    x: cell_x + style.cell_padding,
                    y: row_y + style.text_rise,
                    size: style.font_size,
                    font,
                    color,
                },
            )?;
            cell_x += cell_w;
        }

        row_y -= style.row_height;
    }

    Ok(row_y - style.gap_after)
}
