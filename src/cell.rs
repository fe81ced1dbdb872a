//! Cell values as they arrive from a tabular source.
//!
//! Workbook formats carry typed cells while delimited text only ever yields
//! text. [`CellValue`] keeps that distinction at the loader boundary so the
//! rest of the crate only deals with the rendered strings produced by
//! [`CellValue::to_field_string`].

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Boolean(bool),
    /// Formula source text without the leading `=`. The cached result is not kept.
    Formula(String),
}

impl CellValue {
    pub fn to_field_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Boolean(b) => b.to_string(),
            CellValue::Formula(f) => f.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) | CellValue::Formula(s) => s.is_empty(),
            CellValue::Number(_) | CellValue::Boolean(_) => false,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

/// Integral values keep a trailing `.0`, so `1` and `"1"` never compare equal.
fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_render_as_decimal_strings() {
        assert_eq!(CellValue::Number(1.0).to_field_string(), "1.0");
        assert_eq!(CellValue::Number(-3.0).to_field_string(), "-3.0");
        assert_eq!(CellValue::Number(42.5).to_field_string(), "42.5");
        assert_eq!(CellValue::Number(0.125).to_field_string(), "0.125");
    }

    #[test]
    fn large_integral_numbers_keep_the_decimal_suffix() {
        assert_eq!(CellValue::Number(999_999_999_999_999.0).to_field_string(), "999999999999999.0");
        assert_eq!(CellValue::Number(1e15).to_field_string(), "1000000000000000.0");
        assert_eq!(
            CellValue::Number(1_234_567_890_123_456.0).to_field_string(),
            "1234567890123456.0"
        );
        assert_eq!(CellValue::Number(f64::INFINITY).to_field_string(), "inf");
    }

    #[test]
    fn booleans_render_lowercase() {
        assert_eq!(CellValue::Boolean(true).to_field_string(), "true");
        assert_eq!(CellValue::Boolean(false).to_field_string(), "false");
    }

    #[test]
    fn formulas_render_their_source_text() {
        let cell = CellValue::Formula("SUM(A1:A3)".to_string());
        assert_eq!(cell.to_field_string(), "SUM(A1:A3)");
        assert!(!cell.is_empty());
    }

    #[test]
    fn empty_text_converts_to_empty_cell() {
        assert_eq!(CellValue::from(""), CellValue::Empty);
        assert_eq!(CellValue::from("x"), CellValue::Text("x".to_string()));
        assert_eq!(CellValue::Empty.to_field_string(), "");
    }
}
