use crate::core::physics;
use crate::domain::ports::Storage;
use crate::utils::error::{GearError, Result};
use crate::utils::validation::{validate_non_negative, validate_tooth_counts};
use serde::Serialize;
use std::fmt::Write as _;

pub const DEFAULT_TABLE_CHAINRINGS: std::ops::RangeInclusive<u32> = 48..=52;
pub const DEFAULT_TABLE_SPROCKETS: std::ops::RangeInclusive<u32> = 10..=19;
pub const DEFAULT_MIN_RATIO: f64 = 2.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GearTableCell {
    pub chainring_teeth: u32,
    pub gear_ratio: f64,
    pub meets_min: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GearTableRow {
    pub sprocket_teeth: u32,
    pub cells: Vec<GearTableCell>,
}

/// Ratio grid with one row per sprocket and one column per chainring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GearTable {
    pub chainrings: Vec<u32>,
    pub sprockets: Vec<u32>,
    pub min_ratio: f64,
    pub rows: Vec<GearTableRow>,
}

impl GearTable {
    pub fn build(chainrings: &[u32], sprockets: &[u32], min_ratio: f64) -> Result<Self> {
        validate_tooth_counts("chainrings", chainrings)?;
        validate_tooth_counts("sprockets", sprockets)?;
        validate_non_negative("min_ratio", min_ratio)?;

        Ok(Self::assemble(chainrings, sprockets, min_ratio))
    }

    fn assemble(chainrings: &[u32], sprockets: &[u32], min_ratio: f64) -> Self {
        let rows = sprockets
            .iter()
            .map(|&sprocket| GearTableRow {
                sprocket_teeth: sprocket,
                cells: chainrings
                    .iter()
                    .map(|&chainring| {
                        let gear_ratio = round_2dp(physics::gear_ratio(chainring, sprocket));
                        GearTableCell {
                            chainring_teeth: chainring,
                            gear_ratio,
                            meets_min: gear_ratio >= min_ratio,
                        }
                    })
                    .collect(),
            })
            .collect();

        Self {
            chainrings: chainrings.to_vec(),
            sprockets: sprockets.to_vec(),
            min_ratio,
            rows,
        }
    }

    pub fn cell(&self, chainring_teeth: u32, sprocket_teeth: u32) -> Option<&GearTableCell> {
        self.rows
            .iter()
            .find(|row| row.sprocket_teeth == sprocket_teeth)?
            .cells
            .iter()
            .find(|cell| cell.chainring_teeth == chainring_teeth)
    }

    pub fn count_meeting_min(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .filter(|cell| cell.meets_min)
            .count()
    }

    fn to_delimited(&self, delimiter: u8) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(Vec::new());

        let mut header = vec!["sprocket".to_string()];
        header.extend(self.chainrings.iter().map(|c| c.to_string()));
        writer.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![row.sprocket_teeth.to_string()];
            record.extend(row.cells.iter().map(|cell| format!("{:.2}", cell.gear_ratio)));
            writer.write_record(&record)?;
        }

        writer.into_inner().map_err(|e| GearError::IoError(e.into_error()))
    }

    pub fn to_csv(&self) -> Result<Vec<u8>> {
        self.to_delimited(b',')
    }

    pub fn to_tsv(&self) -> Result<Vec<u8>> {
        self.to_delimited(b'\t')
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn render(&self, format: &str) -> Result<Vec<u8>> {
        match format {
            "csv" => self.to_csv(),
            "tsv" => self.to_tsv(),
            "json" => self.to_json(),
            other => Err(GearError::invalid_input(
                "output.formats",
                other,
                "Unsupported format. Valid formats: csv, tsv, json",
            )),
        }
    }

    /// Terminal grid; ratios at or above `min_ratio` are marked with `*`.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "{:>8}", "");
        for chainring in &self.chainrings {
            let _ = write!(out, "{:>8}", format!("{}T", chainring));
        }
        out.push('\n');

        for row in &self.rows {
            let _ = write!(out, "{:>8}", format!("{}T", row.sprocket_teeth));
            for cell in &row.cells {
                let marker = if cell.meets_min { "*" } else { " " };
                let _ = write!(out, "{:>7.2}{}", cell.gear_ratio, marker);
            }
            out.push('\n');
        }
        out
    }
}

impl Default for GearTable {
    fn default() -> Self {
        let chainrings: Vec<u32> = DEFAULT_TABLE_CHAINRINGS.collect();
        let sprockets: Vec<u32> = DEFAULT_TABLE_SPROCKETS.collect();
        Self::assemble(&chainrings, &sprockets, DEFAULT_MIN_RATIO)
    }
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Writes the table once per format as `<base_name>.<format>` and returns the written paths.
pub fn export_table<S: Storage>(
    storage: &S,
    table: &GearTable,
    formats: &[String],
    base_name: &str,
) -> Result<Vec<String>> {
    let mut written = Vec::with_capacity(formats.len());

    for format in formats {
        let data = table.render(format)?;
        let path = format!("{}.{}", base_name, format);
        storage.write_file(&path, &data)?;
        tracing::debug!("Wrote gear table to {} ({} bytes)", path, data.len());
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shape_and_rounding() {
        let table = GearTable::build(&[48, 50], &[11, 12, 13], 4.0).unwrap();

        assert_eq!(table.rows.len(), 3);
        assert!(table.rows.iter().all(|row| row.cells.len() == 2));
        assert_eq!(table.cell(50, 11).unwrap().gear_ratio, 4.55);
        assert_eq!(table.cell(48, 13).unwrap().gear_ratio, 3.69);
    }

    #[test]
    fn test_min_ratio_flags() {
        let table = GearTable::build(&[48, 50], &[12, 16], 3.0).unwrap();

        assert!(table.cell(48, 12).unwrap().meets_min);
        assert!(table.cell(48, 16).unwrap().meets_min); // exactly 3.00
        assert!(table.cell(50, 16).unwrap().meets_min);
        assert_eq!(table.count_meeting_min(), 4);

        let strict = GearTable::build(&[48, 50], &[12, 16], 3.5).unwrap();
        assert_eq!(strict.count_meeting_min(), 2);
    }

    #[test]
    fn test_default_table_matches_build() {
        let chainrings: Vec<u32> = DEFAULT_TABLE_CHAINRINGS.collect();
        let sprockets: Vec<u32> = DEFAULT_TABLE_SPROCKETS.collect();
        let built = GearTable::build(&chainrings, &sprockets, DEFAULT_MIN_RATIO).unwrap();

        assert_eq!(GearTable::default(), built);
    }

    #[test]
    fn test_csv_and_tsv_rendering() {
        let table = GearTable::build(&[50], &[10, 20], 2.5).unwrap();

        let csv = String::from_utf8(table.to_csv().unwrap()).unwrap();
        assert_eq!(csv, "sprocket,50\n10,5.00\n20,2.50\n");

        let tsv = String::from_utf8(table.to_tsv().unwrap()).unwrap();
        assert_eq!(tsv, "sprocket\t50\n10\t5.00\n20\t2.50\n");
    }

    #[test]
    fn test_json_rendering_keeps_flags() {
        let table = GearTable::build(&[34], &[17], 2.5).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&table.to_json().unwrap()).unwrap();

        assert_eq!(value["rows"][0]["sprocket_teeth"], 17);
        assert_eq!(value["rows"][0]["cells"][0]["gear_ratio"], 2.0);
        assert_eq!(value["rows"][0]["cells"][0]["meets_min"], false);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let table = GearTable::default();
        assert!(table.render("xlsx").is_err());
    }

    #[test]
    fn test_render_text_marks_high_ratios() {
        let table = GearTable::build(&[50], &[10, 25], 2.5).unwrap();
        let text = table.render_text();

        assert!(text.contains("5.00*"));
        assert!(text.contains("2.00 "));
    }
}
