//! # File I/O Module
//!
//! Writes the session ledger out as data:
//! - **CSV**: one row per record, for spreadsheets and bid software
//! - **JSON snapshot**: the full ledger including metadata
//!
//! Both file writers are atomic: write to `.tmp`, fsync, rename over the
//! target, so an interrupted export never leaves a half-written file.
//!
//! ## Example
//!
//! ```rust,no_run
//! use takeoff_core::file_io::export_csv;
//! use takeoff_core::ledger::ProjectLedger;
//! use std::path::Path;
//!
//! let ledger = ProjectLedger::new("Smith Residence", "R. Lee");
//! export_csv(&ledger, Path::new("takeoff_dataset.csv"))?;
//! # Ok::<(), takeoff_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::calculations::ResultRecord;
use crate::errors::{CalcError, CalcResult};
use crate::ledger::ProjectLedger;

/// CSV column headers, in output order
pub const CSV_HEADERS: [&str; 34] = [
    "Project",
    "Estimator",
    "Label",
    "Component",
    "Length_ft",
    "Height_ft",
    "Thickness_in",
    "Area_SF",
    "Quantity",
    "Overage",
    "Include_XPS",
    "Concrete_Zone",
    "Rebar_Size",
    "Rebar_Spacing_In",
    "Bar_Count",
    "Vapor_Type",
    "XPS_R_Value",
    "Finish_Rate_SF",
    "Markup_Pct",
    "Concrete_CY",
    "Rebar_LF",
    "XPS_SF",
    "Drain_Rock_CY",
    "Fabric_LF",
    "Pipe_LF",
    "XPS_Cost",
    "Drain_Cost",
    "Vapor_Cost",
    "Finish_Cost",
    "Concrete_Cost",
    "Rebar_Cost",
    "Total_Cost",
    "Sale_Price",
    "Margin",
];

fn fixed2(value: f64) -> String {
    format!("{:.2}", value)
}

fn csv_row(record: &ResultRecord) -> [String; 34] {
    [
        record.project_name.clone(),
        record.estimator_name.clone(),
        record.label.clone(),
        record.component.display_name().to_string(),
        fixed2(record.length_ft),
        fixed2(record.height_ft),
        fixed2(record.thickness_in),
        fixed2(record.area_sf),
        record.quantity.to_string(),
        record.include_overage.to_string(),
        record.include_xps.to_string(),
        record.concrete_zone.to_string(),
        record.rebar_size.to_string(),
        record.rebar_spacing_in.map(fixed2).unwrap_or_default(),
        record.bar_count.map(|n| n.to_string()).unwrap_or_default(),
        record.vapor_type.to_string(),
        record.xps_r_value.to_string(),
        fixed2(record.finish_rate_sf),
        fixed2(record.markup_pct),
        fixed2(record.concrete_cy),
        fixed2(record.rebar_lf),
        fixed2(record.xps_area_sf),
        fixed2(record.drain_rock_cy),
        fixed2(record.fabric_lf),
        fixed2(record.pipe_lf),
        fixed2(record.xps_cost),
        fixed2(record.drain_cost),
        fixed2(record.vapor_cost),
        fixed2(record.finish_cost),
        fixed2(record.concrete_cost),
        fixed2(record.rebar_cost),
        fixed2(record.total_cost),
        fixed2(record.sale_price),
        fixed2(record.margin()),
    ]
}

/// Write the ledger as CSV to any writer.
///
/// Values are rounded to two decimals here and nowhere else; the ledger
/// itself keeps full precision.
pub fn write_csv<W: Write>(ledger: &ProjectLedger, writer: W) -> CalcResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADERS)?;
    for record in ledger.records() {
        wtr.write_record(csv_row(record))?;
    }
    wtr.flush()
        .map_err(|e| CalcError::file_error("flush csv", "<writer>", e.to_string()))?;
    Ok(())
}

/// Render the ledger as a CSV string
pub fn to_csv_string(ledger: &ProjectLedger) -> CalcResult<String> {
    let mut buffer = Vec::new();
    write_csv(ledger, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| CalcError::serialization(e.to_string()))
}

/// Export the ledger to a CSV file with atomic write semantics.
pub fn export_csv(ledger: &ProjectLedger, path: &Path) -> CalcResult<()> {
    let csv = to_csv_string(ledger)?;
    write_atomic(path, csv.as_bytes())?;
    info!(path = %path.display(), records = ledger.len(), "exported ledger CSV");
    Ok(())
}

/// Save the full ledger (metadata and records) as pretty JSON.
pub fn save_ledger_json(ledger: &ProjectLedger, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(ledger)?;
    write_atomic(path, json.as_bytes())?;
    info!(path = %path.display(), records = ledger.len(), "saved ledger snapshot");
    Ok(())
}

/// Write `contents` to `path` via a sibling `.tmp` file and rename.
fn write_atomic(path: &Path, contents: &[u8]) -> CalcResult<()> {
    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).ok_or_else(|| {
        CalcError::file_error("resolve", path.display().to_string(), "Path has no file name")
    })?;
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(contents).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{calculate, ComponentSpec, ComponentType, RebarOptions};
    use crate::rates::RateTable;
    use std::env::temp_dir;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        temp_dir().join(format!("takeoff_test_{}_{}", std::process::id(), name))
    }

    fn sample_ledger() -> ProjectLedger {
        let mut ledger = ProjectLedger::new("Smith, Residence", "R. Lee");
        let wall = ComponentSpec::new(ComponentType::FoundationWall)
            .with_label("W-1")
            .with_dimensions(10.0, 8.0, 8.0);
        let pad = ComponentSpec::new(ComponentType::SpreadFooting)
            .with_label("F-1")
            .with_dimensions(3.0, 3.0, 12.0)
            .with_quantity(4);
        ledger.add(calculate(ledger.job(), &wall, RateTable::builtin()).unwrap());
        ledger.add(calculate(ledger.job(), &pad, RateTable::builtin()).unwrap());
        ledger
    }

    #[test]
    fn test_csv_header_and_rows() {
        let csv = to_csv_string(&sample_ledger()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Project,Estimator,Label,Component,"));
        assert!(lines[0].ends_with("Total_Cost,Sale_Price,Margin"));

        // Comma in the project name is quoted
        assert!(lines[1].starts_with("\"Smith, Residence\",R. Lee,W-1,Foundation Wall,10.00,8.00,8.00,"));
        assert!(lines[1].contains(",2.17,172.00,"));
        assert!(lines[2].contains("Spread Footing"));
        assert!(lines[2].contains(",1.47,0.00,"));
    }

    #[test]
    fn test_csv_echoes_rebar_and_xps_inputs() {
        let mut ledger = ProjectLedger::new("P", "E");
        let slab = ComponentSpec::new(ComponentType::InteriorSlab)
            .with_dimensions(20.0, 20.0, 4.0)
            .with_xps(true)
            .with_rebar(RebarOptions {
                spacing_in: Some(16.0),
                ..RebarOptions::default()
            });
        let footing = ComponentSpec::new(ComponentType::LinearFooting)
            .with_dimensions(40.0, 2.0, 10.0)
            .with_rebar(RebarOptions {
                bar_count: Some(3),
                ..RebarOptions::default()
            });
        ledger.add(calculate(ledger.job(), &slab, RateTable::builtin()).unwrap());
        ledger.add(calculate(ledger.job(), &footing, RateTable::builtin()).unwrap());
        assert_eq!(ledger.records()[1].bar_count, Some(3));

        let csv = to_csv_string(&ledger).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers = reader.headers().unwrap().clone();
        let column = |name: &str| headers.iter().position(|h| h == name).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        assert_eq!(&rows[0][column("Include_XPS")], "true");
        assert_eq!(&rows[0][column("Rebar_Spacing_In")], "16.00");
        assert_eq!(&rows[0][column("Bar_Count")], "");
        assert_eq!(&rows[1][column("Include_XPS")], "false");
        assert_eq!(&rows[1][column("Rebar_Spacing_In")], "");
        assert_eq!(&rows[1][column("Bar_Count")], "3");
    }

    #[test]
    fn test_empty_ledger_csv_has_header_only() {
        let csv = to_csv_string(&ProjectLedger::new("P", "E")).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_export_csv_file() {
        let path = temp_path("export.csv");
        export_csv(&sample_ledger(), &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 3);

        let mut tmp_name = path.file_name().unwrap().to_os_string();
        tmp_name.push(".tmp");
        assert!(!path.with_file_name(tmp_name).exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_ledger_json() {
        let path = temp_path("ledger.json");
        let ledger = sample_ledger();
        save_ledger_json(&ledger, &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let roundtrip: ProjectLedger = serde_json::from_str(&contents).unwrap();
        assert_eq!(roundtrip.records(), ledger.records());
        // 172 LF x 0.55 is not exactly 94.6; the snapshot keeps every bit
        let wall_cost = ledger.records()[0].rebar_cost;
        assert_eq!(roundtrip.records()[0].rebar_cost.to_bits(), wall_cost.to_bits());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let path = temp_dir().join("takeoff_no_such_dir").join("out.csv");
        let err = export_csv(&sample_ledger(), &path).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }
}
