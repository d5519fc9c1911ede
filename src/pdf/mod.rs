//! [`Surface`] backed by `pdf-writer`.
//!
//! Drawing calls are recorded per page and only turned into PDF objects in
//! [`PdfSurface::save`]: fonts are subset to the characters actually drawn,
//! which are not known until the last page is laid out.

use std::collections::HashSet;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};

use crate::config::FontSources;
use crate::error::Error;
use crate::fonts::{FontEntry, register_font};
use crate::surface::{FontHandle, FontWeight, PageHandle, RectStyle, Rgb, Surface, TextStyle};

enum Op {
    Text { text: String, style: TextStyle },
    Rect(RectStyle),
}

struct PageOps {
    width: f32,
    height: f32,
    ops: Vec<Op>,
}

#[derive(Default)]
pub struct PdfSurface {
    sources: FontSources,
    fonts: Vec<FontWeight>,
    pages: Vec<PageOps>,
}

impl PdfSurface {
    /// Surface using the standard Helvetica faces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface embedding the configured TrueType files where given.
    pub fn with_fonts(sources: FontSources) -> Self {
        Self {
            sources,
            ..Self::default()
        }
    }

    fn page_mut(&mut self, page: PageHandle) -> Result<&mut PageOps, Error> {
        self.pages
            .get_mut(page.0)
            .ok_or_else(|| Error::Surface(format!("unknown page #{}", page.0)))
    }
}

impl Surface for PdfSurface {
    fn add_page(&mut self, width: f32, height: f32) -> PageHandle {
        self.pages.push(PageOps {
            width,
            height,
            ops: Vec::new(),
        });
        PageHandle(self.pages.len() - 1)
    }

    fn embed_font(&mut self, weight: FontWeight) -> Result<FontHandle, Error> {
        if let Some(i) = self.fonts.iter().position(|&w| w == weight) {
            return Ok(FontHandle(i));
        }
        // Missing files fail here, before anything is drawn.
        if let Some(path) = self.sources.path(weight) {
            if !path.is_file() {
                return Err(Error::Font(format!(
                    "{weight:?} font not found: {}",
                    path.display()
                )));
            }
        }
        self.fonts.push(weight);
        Ok(FontHandle(self.fonts.len() - 1))
    }

    fn draw_text(&mut self, page: PageHandle, text: &str, style: TextStyle) -> Result<(), Error> {
        if style.font.0 >= self.fonts.len() {
            return Err(Error::Surface(format!("unknown font #{}", style.font.0)));
        }
        self.page_mut(page)?.ops.push(Op::Text {
            text: text.to_string(),
            style,
        });
        Ok(())
    }

    fn draw_rect(&mut self, page: PageHandle, rect: RectStyle) -> Result<(), Error> {
        self.page_mut(page)?.ops.push(Op::Rect(rect));
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn save(self) -> Result<Vec<u8>, Error> {
        let t0 = std::time::Instant::now();
        if self.pages.is_empty() {
            return Err(Error::Surface("document has no pages".into()));
        }

        let mut pdf = Pdf::new();
        let mut next_id = 1i32;
        let mut alloc = || {
            let r = Ref::new(next_id);
            next_id += 1;
            r
        };

        let catalog_id = alloc();
        let pages_id = alloc();

        // Phase 1: characters drawn with each font
        let mut used_chars: Vec<HashSet<char>> = vec![HashSet::new(); self.fonts.len()];
        for page in &self.pages {
            for op in &page.ops {
                if let Op::Text { text, style } = op {
                    used_chars[style.font.0].extend(text.chars());
                }
            }
        }
        let t_collect = t0.elapsed();

        // Phase 2: font objects, subset where a file is embedded
        let mut entries: Vec<FontEntry> = Vec::with_capacity(self.fonts.len());
        for (i, &weight) in self.fonts.iter().enumerate() {
            entries.push(register_font(
                &mut pdf,
                weight,
                self.sources.path(weight),
                format!("F{}", i + 1),
                &mut alloc,
                &used_chars[i],
            )?);
        }
        let t_fonts = t0.elapsed();

        // Phase 3: compressed content stream per page
        let contents: Vec<Vec<u8>> = self
            .pages
            .iter()
            .map(|page| render_page(&page.ops, &entries))
            .collect();
        let t_content = t0.elapsed();

        // Phase 4: page tree
        let n = self.pages.len();
        let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
        let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

        for (id, data) in content_ids.iter().zip(&contents) {
            pdf.stream(*id, data).filter(Filter::FlateDecode);
        }

        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id)
            .kids(page_ids.iter().copied())
            .count(n as i32);

        for (i, ops) in self.pages.iter().enumerate() {
            let mut page = pdf.page(page_ids[i]);
            page.media_box(Rect::new(0.0, 0.0, ops.width, ops.height))
                .parent(pages_id)
                .contents(content_ids[i]);
            let mut resources = page.resources();
            let mut fonts = resources.fonts();
            for entry in &entries {
                fonts.pair(Name(entry.pdf_name.as_bytes()), entry.font_ref);
            }
        }

        let t_assembly = t0.elapsed();

        log::info!(
            "Render phases: collect_chars={:.1}ms, font_embed={:.1}ms, content={:.1}ms, assembly={:.1}ms ({} pages)",
            t_collect.as_secs_f64() * 1000.0,
            (t_fonts - t_collect).as_secs_f64() * 1000.0,
            (t_content - t_fonts).as_secs_f64() * 1000.0,
            (t_assembly - t_content).as_secs_f64() * 1000.0,
            n,
        );

        Ok(pdf.finish())
    }
}

fn render_page(ops: &[Op], fonts: &[FontEntry]) -> Vec<u8> {
    let mut content = Content::new();

    for op in ops {
        match op {
            Op::Rect(rect) => {
                content.save_state();
                if let Some(Rgb(r, g, b)) = rect.fill {
                    content.set_fill_rgb(r, g, b);
                    content
                        .rect(rect.x, rect.y, rect.width, rect.height)
                        .fill_nonzero();
                }
                if let Some(border) = rect.border {
                    let Rgb(r, g, b) = border.color;
                    content.set_line_width(border.width);
                    content.set_stroke_rgb(r, g, b);
                    content
                        .rect(rect.x, rect.y, rect.width, rect.height)
                        .stroke();
                }
                content.restore_state();
            }
            Op::Text { text, style } => {
                let entry = &fonts[style.font.0];
                let Rgb(r, g, b) = style.color;
                let text_bytes = entry.encode(text);
                content.set_fill_rgb(r, g, b);
                content
                    .begin_text()
                    .set_font(Name(entry.pdf_name.as_bytes()), style.size)
                    .next_line(style.x, style.y)
                    .show(Str(&text_bytes))
                    .end_text();
            }
        }
    }

    let raw = content.finish();
    miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6)
}
