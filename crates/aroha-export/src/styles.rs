use serde::{Deserialize, Serialize};

/// Document styling for the DOCX report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStyles {
    /// Font for body text and table cells.
    pub body_font: String,

    pub heading_font: String,

    /// Sizes in points.
    pub body_size: usize,
    pub note_size: usize,
    pub heading1_size: usize,
    pub heading2_size: usize,

    /// Page margin in millimetres, applied on all sides.
    pub margin_mm: f64,
}

impl DocumentStyles {
    pub fn margin_twips(&self) -> i32 {
        (self.margin_mm / 25.4 * 1440.0).round() as i32
    }
}

impl Default for DocumentStyles {
    fn default() -> Self {
        Self {
            body_font: "Helvetica".to_string(),
            heading_font: "Helvetica".to_string(),
            body_size: 10,
            note_size: 8,
            heading1_size: 20,
            heading2_size: 11,
            margin_mm: 20.0,
        }
    }
}
