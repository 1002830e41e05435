use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::StringRecord;
use serde_json::Value as JsonValue;

use super::model::{GroupKey, TimingDataset, TimingRecord};
use crate::error::PlotError;

/// Columns every input must provide.
pub const REQUIRED_COLUMNS: [&str; 3] = ["n", "m", "time"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a timing dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json` – `[{ "n": 1, "m": 10, "time": 0.5 }, ...]`
/// * `.tsv`  – tab-separated table with an `n`, `m`, `time` header
/// * anything else (`.txt`, `.csv`, ...) – delimited table, delimiter sniffed
///   from the header line
pub fn load_file(path: &Path) -> Result<TimingDataset, PlotError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "json" => load_json(path),
        "tsv" => load_delimited(path, Some(b'\t')),
        _ => load_delimited(path, None),
    }
    .map_err(|e| PlotError::data_format(path, e))?;

    let dataset = promote_n(rows);
    log::info!(
        "Loaded {} timing records ({} distinct n) from {}",
        dataset.len(),
        dataset.distinct_n().len(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Raw rows before the `n` column type is settled
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum RawN {
    Int(i64),
    Float(f64),
}

#[derive(Debug)]
struct RawRow {
    n: RawN,
    m: f64,
    time: f64,
}

/// If any `n` is fractional the whole column becomes float, otherwise every
/// key stays an integer.
fn promote_n(rows: Vec<RawRow>) -> TimingDataset {
    let all_int = rows.iter().all(|r| matches!(r.n, RawN::Int(_)));
    let records = rows
        .into_iter()
        .map(|r| {
            let n = match (r.n, all_int) {
                (RawN::Int(i), true) => GroupKey::Integer(i),
                (RawN::Int(i), false) => GroupKey::float(i as f64),
                (RawN::Float(v), _) => GroupKey::float(v),
            };
            TimingRecord { n, m: r.m, time: r.time }
        })
        .collect();
    TimingDataset::new(records)
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Header row with at least `n`, `m`, `time`; extra columns are ignored.
fn load_delimited(path: &Path, delimiter: Option<u8>) -> Result<Vec<RawRow>> {
    let delimiter = match delimiter {
        Some(d) => d,
        None => sniff_delimiter(path)?,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening timing table")?;

    let headers = reader.headers().context("reading header row")?.clone();
    let [n_idx, m_idx, time_idx] = column_indices(&headers)?;

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row_no = i + 1;
        let record = result.with_context(|| format!("row {row_no}"))?;

        let n = parse_n(cell(&record, n_idx), row_no)?;
        let m = parse_f64(cell(&record, m_idx), row_no, "m")?;
        let time = parse_f64(cell(&record, time_idx), row_no, "time")?;
        rows.push(RawRow { n, m, time });
    }
    Ok(rows)
}

/// Tab if the header is tab-only, semicolon if semicolon-only, else comma.
fn sniff_delimiter(path: &Path) -> Result<u8> {
    let file = File::open(path).context("opening timing table")?;
    let mut first = String::new();
    BufReader::new(file)
        .read_line(&mut first)
        .context("reading header row")?;

    let delimiter = if first.contains(',') {
        b','
    } else if first.contains('\t') {
        b'\t'
    } else if first.contains(';') {
        b';'
    } else {
        b','
    };
    Ok(delimiter)
}

fn column_indices(headers: &StringRecord) -> Result<[usize; 3]> {
    let names: Vec<&str> = headers.iter().map(str::trim).collect();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !names.contains(c))
        .collect();
    if !missing.is_empty() {
        bail!(
            "missing required column(s) {} (found: {})",
            missing.join(", "),
            names.join(", ")
        );
    }

    let idx = |col: &str| names.iter().position(|h| *h == col).unwrap_or_default();
    Ok([idx("n"), idx("m"), idx("time")])
}

fn cell(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}

fn parse_n(s: &str, row: usize) -> Result<RawN> {
    if let Ok(i) = s.parse::<i64>() {
        return Ok(RawN::Int(i));
    }
    parse_f64(s, row, "n").map(RawN::Float)
}

fn parse_f64(s: &str, row: usize, col: &str) -> Result<f64> {
    if s.is_empty() {
        bail!("row {row}: empty '{col}' value");
    }
    s.parse::<f64>()
        .with_context(|| format!("row {row}: '{col}' value '{s}' is not a number"))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "n": 1, "m": 10,  "time": 0.5 },
///   { "n": 1, "m": 100, "time": 4.0 }
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<RawRow>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("expected top-level JSON array")?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let row_no = i + 1;
            let obj = rec
                .as_object()
                .with_context(|| format!("record {row_no} is not a JSON object"))?;

            let field = |col: &str| {
                obj.get(col)
                    .with_context(|| format!("record {row_no}: missing required column '{col}'"))
            };

            let n = json_to_n(field("n")?, row_no)?;
            let m = json_to_f64(field("m")?, row_no, "m")?;
            let time = json_to_f64(field("time")?, row_no, "time")?;
            Ok(RawRow { n, m, time })
        })
        .collect()
}

fn json_to_n(val: &JsonValue, row: usize) -> Result<RawN> {
    match val {
        JsonValue::Number(num) => {
            if let Some(i) = num.as_i64() {
                Ok(RawN::Int(i))
            } else {
                json_to_f64(val, row, "n").map(RawN::Float)
            }
        }
        JsonValue::String(s) => parse_n(s.trim(), row),
        other => bail!("record {row}: 'n' value {other} is not a number"),
    }
}

fn json_to_f64(val: &JsonValue, row: usize, col: &str) -> Result<f64> {
    match val {
        JsonValue::Number(num) => num
            .as_f64()
            .with_context(|| format!("record {row}: '{col}' value {num} is out of range")),
        JsonValue::String(s) => parse_f64(s.trim(), row, col),
        other => bail!("record {row}: '{col}' value {other} is not a number"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_comma_separated_txt() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "timing.txt", "n,m,time\n1,10,0.5\n1,100,4.0\n2,10,0.2\n");

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.records[1],
            TimingRecord { n: GroupKey::Integer(1), m: 100.0, time: 4.0 }
        );
    }

    #[test]
    fn ignores_extra_columns_and_whitespace() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "timing.csv",
            "run, time , m, n\n0, 0.25 , 1000, 8\n1, 0.5, 2000, 8\n",
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].n, GroupKey::Integer(8));
        assert_eq!(ds.records[0].m, 1000.0);
        assert_eq!(ds.records[0].time, 0.25);
    }

    #[test]
    fn sniffs_tab_delimiter() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "timing.txt", "n\tm\ttime\n3\t10\t0.1\n");

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.records[0].n, GroupKey::Integer(3));
    }

    #[test]
    fn fractional_n_promotes_whole_column() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "timing.txt", "n,m,time\n1,10,0.5\n1.5,10,0.7\n1.0,20,0.9\n");

        let ds = load_file(&path).unwrap();
        let keys: Vec<_> = ds.distinct_n().into_iter().collect();
        assert_eq!(keys, vec![GroupKey::Float(1.0), GroupKey::Float(1.5)]);
    }

    #[test]
    fn signed_zero_n_values_share_a_key() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "timing.txt", "n,m,time\n0.0,10,0.5\n-0.0,100,4.0\n1.5,10,0.2\n");

        let ds = load_file(&path).unwrap();
        let labels: Vec<String> = ds.distinct_n().iter().map(|k| k.to_string()).collect();
        assert_eq!(labels, vec!["0.0", "1.5"]);
    }

    #[test]
    fn missing_time_column_is_data_format_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "timing.txt", "n,m\n1,10\n");

        let err = load_file(&path).unwrap_err();
        match err {
            PlotError::DataFormat { reason, .. } => {
                assert!(reason.contains("time"), "{reason}");
            }
            other => panic!("expected DataFormat, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_data_format_error() {
        let dir = TempDir::new().unwrap();
        let err = load_file(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, PlotError::DataFormat { .. }));
    }

    #[test]
    fn non_numeric_cell_names_row_and_column() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "timing.txt", "n,m,time\n1,10,0.5\n1,ten,0.6\n");

        let err = load_file(&path).unwrap_err().to_string();
        assert!(err.contains("row 2"), "{err}");
        assert!(err.contains("'m'"), "{err}");
    }

    #[test]
    fn header_only_gives_empty_dataset() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "timing.txt", "n,m,time\n");

        let ds = load_file(&path).unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn loads_json_records() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "timing.json",
            r#"[{"n": 2, "m": 10, "time": 0.2}, {"n": 1, "m": 100, "time": 4.0}]"#,
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].n, GroupKey::Integer(2));
        assert_eq!(ds.records[1].time, 4.0);
    }

    #[test]
    fn json_record_without_time_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "timing.json", r#"[{"n": 2, "m": 10}]"#);

        let err = load_file(&path).unwrap_err().to_string();
        assert!(err.contains("'time'"), "{err}");
    }
}
