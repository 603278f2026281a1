use crate::data::series::PerifusionData;
use crate::error::TraitError;
use std::io::Read;
use std::path::Path;

/// Placeholders that denote a missing sample in exported sheets
const MISSING_MARKERS: [&str; 4] = ["", ".", "NA", "-"];

/// Read a perifusion CSV file into [PerifusionData]
///
/// The file must have a header row. Exactly one header must contain "time"
/// (case-insensitive); every other column is one donor.
///
/// # Example
///
/// ```rust,no_run
/// use perifusion::data::parser::read_perifusion;
///
/// let data = read_perifusion("path/to/ins_ieq.csv").unwrap();
/// println!("Number of donors: {}", data.len());
/// ```
///
/// # Format details
///
/// Cells are coerced to numbers: empty cells, `.`, `NA`, `-`, `NaN` and any other
/// non-numeric text become missing samples. A short row leaves the trailing
/// columns missing. Lines starting with `#` are comments.
pub fn read_perifusion(path: impl AsRef<Path>) -> Result<PerifusionData, TraitError> {
    let reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    parse(reader)
}

/// Read perifusion CSV data from any reader
///
/// See [read_perifusion] for the expected layout.
pub fn from_reader<R: Read>(reader: R) -> Result<PerifusionData, TraitError> {
    let reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    parse(reader)
}

fn parse<R: Read>(mut reader: csv::Reader<R>) -> Result<PerifusionData, TraitError> {
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (idx, column) in columns.iter_mut().enumerate() {
            column.push(record.get(idx).and_then(coerce_number));
        }
    }

    let data = PerifusionData::from_optional_columns(headers.into_iter().zip(columns).collect())?;
    tracing::debug!(
        donors = data.len(),
        samples = data.times().len(),
        time_column = data.time_column(),
        "read perifusion table"
    );
    Ok(data)
}

/// Coerce a cell to a number, treating anything non-numeric as missing
fn coerce_number(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if MISSING_MARKERS.contains(&cell) {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| !v.is_nan())
}
