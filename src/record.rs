//! @ai:module:intent Per-trial measurement records and CSV persistence
//! @ai:module:layer domain
//! @ai:module:public_api TrialRecord, write_csv, read_csv
//! @ai:module:stateless true

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// @ai:intent One completed API call: budget, reply, grading, usage, timing
///
/// Column order matches the CSV layout consumed downstream:
/// max_tokens, response, is_correct, input_tokens, output_tokens,
/// reasoning_tokens, total_tokens, latency. Latency is fractional seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub max_tokens: u32,
    pub response: String,
    pub is_correct: bool,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub reasoning_tokens: u32,
    pub total_tokens: u32,
    pub latency: f64,
}

/// @ai:intent Write trial records to a CSV file with a header row
/// @ai:effects fs:write
pub fn write_csv(records: &[TrialRecord], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    for record in records {
        writer.serialize(record)?;
    }

    writer.flush()?;
    Ok(())
}

/// @ai:intent Read trial records back from a CSV file
/// @ai:effects fs:read
pub fn read_csv(path: &Path) -> Result<Vec<TrialRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let mut records = Vec::new();

    for row in reader.deserialize() {
        let record: TrialRecord =
            row.with_context(|| format!("Malformed row in {}", path.display()))?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_record(max_tokens: u32, correct: bool) -> TrialRecord {
        TrialRecord {
            max_tokens,
            response: "9.8".to_string(),
            is_correct: correct,
            input_tokens: 35,
            output_tokens: 210,
            reasoning_tokens: 192,
            total_tokens: 245,
            latency: 3.72,
        }
    }

    #[test]
    fn test_csv_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("results.csv");

        let records = vec![sample_record(100, false), sample_record(200, true)];
        write_csv(&records, &path).unwrap();

        let loaded = read_csv(&path).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_csv_header_layout() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("results.csv");

        write_csv(&[sample_record(100, true)], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(
            header,
            "max_tokens,response,is_correct,input_tokens,output_tokens,reasoning_tokens,total_tokens,latency"
        );
    }

    #[test]
    fn test_response_with_commas_survives_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("results.csv");

        let mut record = sample_record(300, true);
        record.response = "Step by step: 9.8 > 9.11, so the answer is 9.8".to_string();

        write_csv(std::slice::from_ref(&record), &path).unwrap();
        let loaded = read_csv(&path).unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].response, record.response);
    }

    #[test]
    fn test_read_missing_file_is_error() {
        let temp = TempDir::new().unwrap();
        let result = read_csv(&temp.path().join("nope.csv"));
        assert!(result.is_err());
    }
}
