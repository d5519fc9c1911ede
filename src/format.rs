use serde::Deserialize;

/// Thousands-grouped integer rendering. The default separator is the `es-CL`
/// one (`1.234.567`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    pub thousands_separator: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            thousands_separator: '.',
        }
    }
}

impl NumberFormat {
    pub const fn with_separator(thousands_separator: char) -> Self {
        Self {
            thousands_separator,
        }
    }

    /// Round to the nearest integer (halves away from zero) and group digits.
    pub fn integer(&self, n: f64) -> String {
        if !n.is_finite() {
            return n.to_string();
        }
        let rounded = n.round();
        // `{:.0}` prints every integer digit of the f64, past the i64 range too.
        let digits = format!("{:.0}", rounded.abs());
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        if rounded < 0.0 {
            out.push('-');
        }
        let lead = digits.len() % 3;
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (i + 3 - lead) % 3 == 0 {
                out.push(self.thousands_separator);
            }
            out.push(ch);
        }
        out
    }

    /// `$224.004`
    pub fn currency(&self, n: f64) -> String {
        format!("${}", self.integer(n))
    }

    /// `-$4.750`, for amounts subtracted from the gross pension.
    pub fn deduction(&self, n: f64) -> String {
        format!("-${}", self.integer(n))
    }
}

/// [`NumberFormat::integer`] with the default `es-CL` separator.
pub fn format_integer(n: f64) -> String {
    NumberFormat::default().integer(n)
}

/// `12.3456 → "12.35"`. Halves round away from zero: `10.125 → "10.13"`.
pub fn fixed(n: f64, decimals: usize) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    let scale = 10f64.powi(decimals as i32);
    let rounded = (n * scale).round() / scale;
    // avoid printing `-0.00`
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.decimals$}")
}

/// Interest rate fraction as a two-decimal percentage number: `0.0325 → "3.25"`.
pub fn rate_percent(rate: f64) -> String {
    fixed(rate * 100.0, 2)
}

/// Share fraction as a whole percentage: `0.6 → "60%"`.
pub fn whole_percent(fraction: f64) -> String {
    format!("{}%", fixed(fraction * 100.0, 0))
}

/// Percentage value without trailing zeros: `50.0 → "50"`, `12.5 → "12.5"`.
pub fn trimmed_percent(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded}")
}

/// Increase percentages arrive either as fractions or as whole numbers;
/// anything above 1 is already a percentage.
pub fn increase_percent(percentage: f64) -> String {
    if percentage > 1.0 {
        trimmed_percent(percentage)
    } else {
        trimmed_percent(percentage * 100.0)
    }
}

/// Month count as years and months: `240 → "20 anos"`, `30 → "2a 6m"`.
pub fn period_text(months: u32) -> String {
    let years = months / 12;
    let rest = months % 12;
    if rest > 0 {
        format!("{years}a {rest}m")
    } else {
        format!("{years} anos")
    }
}
