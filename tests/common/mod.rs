#![allow(dead_code)]

use pension_report::config::ReportConfig;
use pension_report::format::NumberFormat;
use pension_report::model::{ReportRequest, ScenarioResult};
use pension_report::surface::{
    FontHandle, FontWeight, PageHandle, RectStyle, Rgb, Surface, TextStyle,
};
use pension_report::{Composition, Error};
use serde_json::{Value, json};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Clone, Debug)]
pub struct DrawnText {
    pub page: usize,
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub weight: FontWeight,
    pub color: Rgb,
}

#[derive(Clone, Debug)]
pub struct DrawnRect {
    pub page: usize,
    pub rect: RectStyle,
}

/// Surface that keeps every drawing call for inspection.
#[derive(Default)]
pub struct RecordingSurface {
    pub pages: Vec<(f32, f32)>,
    pub fonts: Vec<FontWeight>,
    pub texts: Vec<DrawnText>,
    pub rects: Vec<DrawnRect>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// First text containing `needle`.
    pub fn find(&self, needle: &str) -> Option<&DrawnText> {
        self.texts.iter().find(|t| t.text.contains(needle))
    }

    pub fn exact(&self, text: &str) -> Option<&DrawnText> {
        self.texts.iter().find(|t| t.text == text)
    }

    pub fn has(&self, needle: &str) -> bool {
        self.find(needle).is_some()
    }

    /// Drawing order of the first text containing `needle`.
    pub fn position(&self, needle: &str) -> Option<usize> {
        self.texts.iter().position(|t| t.text.contains(needle))
    }

    /// Section headings, in drawing order.
    pub fn headings(&self) -> Vec<&str> {
        self.texts
            .iter()
            .filter(|t| t.size == 11.0 && t.weight == FontWeight::Bold)
            .map(|t| t.text.as_str())
            .collect()
    }

    pub fn texts_on(&self, page: usize) -> impl Iterator<Item = &DrawnText> {
        self.texts.iter().filter(move |t| t.page == page)
    }
}

impl Surface for RecordingSurface {
    fn add_page(&mut self, width: f32, height: f32) -> PageHandle {
        self.pages.push((width, height));
        PageHandle(self.pages.len() - 1)
    }

    fn embed_font(&mut self, weight: FontWeight) -> Result<FontHandle, Error> {
        self.fonts.push(weight);
        Ok(FontHandle(self.fonts.len() - 1))
    }

    fn draw_text(&mut self, page: PageHandle, text: &str, style: TextStyle) -> Result<(), Error> {
        self.texts.push(DrawnText {
            page: page.0,
            text: text.to_string(),
            x: style.x,
            y: style.y,
            size: style.size,
            weight: self.fonts[style.font.0],
            color: style.color,
        });
        Ok(())
    }

    fn draw_rect(&mut self, page: PageHandle, rect: RectStyle) -> Result<(), Error> {
        self.rects.push(DrawnRect { page: page.0, rect });
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn save(self) -> Result<Vec<u8>, Error> {
        Ok(Vec::new())
    }
}

pub fn comma_config() -> ReportConfig {
    ReportConfig {
        number_format: NumberFormat::with_separator(','),
        ..ReportConfig::default()
    }
}

pub fn affiliate(tipo: &str) -> Value {
    json!({
        "nombre": "Juan Perez",
        "sexo": "M",
        "edad": 65,
        "fondosAcumulados": 38_500_000.0,
        "anosCotizados": 40,
        "tipoPension": tipo,
    })
}

pub fn parameters() -> Value {
    json!({ "uf": 38_500.0, "tasaRP": 0.0391, "tasaRV": 0.0325 })
}

pub fn scenario(nombre: &str, pension: f64) -> Value {
    json!({
        "nombre": nombre,
        "pensionMensual": pension,
        "pensionEnUF": pension / 38_500.0,
        "pensionAnual": pension * 12.0,
        "cnu": 180.5,
        "tasaInteres": 0.0325,
        "expectativaVida": 22.4,
    })
}

/// Shallow-merge the keys of `extra` into `base`.
pub fn with(mut base: Value, extra: Value) -> Value {
    if let (Some(b), Value::Object(e)) = (base.as_object_mut(), extra) {
        b.extend(e);
    }
    base
}

pub fn request_json(tipo: &str, results: Vec<Value>) -> Value {
    json!({
        "afiliado": affiliate(tipo),
        "parametros": parameters(),
        "resultados": results,
    })
}

pub fn request(value: Value) -> ReportRequest {
    serde_json::from_value(value).expect("fixture request parses")
}

pub fn results(values: Vec<Value>) -> Vec<ScenarioResult> {
    serde_json::from_value(Value::Array(values)).expect("fixture results parse")
}

pub fn compose_json(value: Value, config: &ReportConfig) -> (RecordingSurface, Composition) {
    let request = request(value);
    let mut surface = RecordingSurface::new();
    let composition =
        pension_report::compose(&request, config, &mut surface).expect("compose succeeds");
    (surface, composition)
}

fn find_bytes(hay: &[u8], needle: &[u8]) -> Option<usize> {
    hay.windows(needle.len()).position(|w| w == needle)
}

/// Inflated text of every FlateDecode stream in `pdf`, concatenated.
pub fn content_text(pdf: &[u8]) -> String {
    let mut out = String::new();
    let mut pos = 0;
    while let Some(start) = find_bytes(&pdf[pos..], b"stream\n") {
        let data_start = pos + start + b"stream\n".len();
        let Some(len) = find_bytes(&pdf[data_start..], b"endstream") else {
            break;
        };
        let data = &pdf[data_start..data_start + len];
        let data = data.strip_suffix(b"\n").unwrap_or(data);
        if let Ok(raw) = miniz_oxide::inflate::decompress_to_vec_zlib(data) {
            out.push_str(&String::from_utf8_lossy(&raw));
            out.push('\n');
        }
        pos = data_start + len + b"endstream".len();
    }
    out
}

/// Number of page objects (`/Type /Page`, not `/Type /Pages`).
pub fn count_pages(pdf: &[u8]) -> usize {
    let needle = b"/Type /Page";
    pdf.windows(needle.len() + 1)
        .filter(|w| &w[..needle.len()] == needle && w[needle.len()] != b's')
        .count()
}
