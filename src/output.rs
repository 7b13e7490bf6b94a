use std::fs;
use std::path::{Path, PathBuf};
use csv::Writer;

use crate::errors::Result;
use crate::report::AnalysisReport;

/// Write the full report as pretty JSON to `<output>/reports/<filename>_analysis.json`
pub fn write_report_json<P: AsRef<Path>>(
    report: &AnalysisReport,
    output_dir: P,
    filename: &str,
) -> Result<PathBuf> {
    let output_path = output_dir
        .as_ref()
        .join("reports")
        .join(format!("{}_analysis.json", filename));

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(report)?;
    fs::write(&output_path, json)?;

    Ok(output_path)
}

/// Load a previously written report
pub fn read_report_json<P: AsRef<Path>>(path: P) -> Result<AnalysisReport> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write one row per region to `<output>/csv/<filename>_regions.csv`
pub fn write_regions_csv<P: AsRef<Path>>(
    report: &AnalysisReport,
    output_dir: P,
    filename: &str,
) -> Result<PathBuf> {
    let output_path = output_dir
        .as_ref()
        .join("csv")
        .join(format!("{}_regions.csv", filename));

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = Writer::from_path(&output_path)?;

    writer.write_record([
        "Region_Key",
        "Region_Name",
        "Pixel_Count",
        "Average_Temp",
        "Max_Temp",
        "Min_Temp",
        "Temp_Stddev",
        "Risk_Level",
        "Temp_Difference",
        "Confidence",
    ])?;

    for region in &report.regions {
        let obs = &region.observation;
        let risk = &region.injury_risk;
        writer.write_record(&[
            obs.region_key.clone(),
            obs.name.clone(),
            obs.pixel_count.to_string(),
            format!("{:.6}", obs.average_temperature),
            format!("{:.6}", obs.max_temperature),
            format!("{:.6}", obs.min_temperature),
            format!("{:.6}", obs.temperature_stddev),
            risk.level.to_string(),
            format!("{:.6}", risk.temperature_difference),
            format!("{:.2}", risk.confidence),
        ])?;
    }

    writer.flush()?;

    Ok(output_path)
}
