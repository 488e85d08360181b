//! Decode instrument output into data maps

use crate::{DataMap, IngestError};
use plateflow_domain::{MeasurementKey, WellAddress};
use tracing::debug;

/// Parse a numeric cell; surrounding whitespace is ignored
fn parse_value(location: &str, raw: &str) -> Result<f64, IngestError> {
    let invalid = || IngestError::InvalidValue {
        location: location.to_string(),
        value: raw.to_string(),
    };
    let value: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }
    Ok(value)
}

/// Build a data map from `(label, value)` pairs such as `("C4", "61.2")`
pub fn parse_labelled<L, V>(key: MeasurementKey, rows: &[(L, V)]) -> Result<DataMap, IngestError>
where
    L: AsRef<str>,
    V: AsRef<str>,
{
    let mut map = DataMap::new(key);
    for (label, raw) in rows {
        let label = label.as_ref();
        let address = WellAddress::parse(label)?;
        map.insert(address, parse_value(label, raw.as_ref())?)?;
    }
    Ok(map)
}

/// Build a data map from zero-based `(row, column, value)` triples
pub fn parse_indexed(
    key: MeasurementKey,
    rows: &[(usize, usize, f64)],
) -> Result<DataMap, IngestError> {
    let mut map = DataMap::new(key);
    for &(row, column, value) in rows {
        map.insert(WellAddress::new(row, column), value)?;
    }
    Ok(map)
}

/// Build a data map from a header-indexed table
///
/// The first row is the header. `location_header` names the column holding
/// well labels and `data_header` the column holding values; the measurement
/// key is resolved from `data_header`. Rows with a blank location are
/// skipped, which tolerates the trailing lines instrument exports add.
///
/// # Examples
///
/// ```
/// use plateflow_domain::{MeasurementKey, WellAddress};
/// use plateflow_ingest::parse_table;
///
/// let table = vec![
///     vec!["Well", "Sample", "Avg. Size"],
///     vec!["A1", "s-1", "312"],
///     vec!["B1", "s-2", "298.5"],
/// ];
/// let map = parse_table(&table, "Well", "Avg. Size").unwrap();
/// assert_eq!(map.key(), MeasurementKey::AverageSize);
/// assert_eq!(map.get(WellAddress::new(1, 0)), Some(298.5));
/// ```
pub fn parse_table<S: AsRef<str>>(
    rows: &[Vec<S>],
    location_header: &str,
    data_header: &str,
) -> Result<DataMap, IngestError> {
    let key = MeasurementKey::parse(data_header)
        .ok_or_else(|| IngestError::UnknownKey(data_header.to_string()))?;

    let (header, body) = rows
        .split_first()
        .ok_or_else(|| IngestError::MissingHeader(location_header.to_string()))?;
    let location_idx = header_index(header, location_header)?;
    let data_idx = header_index(header, data_header)?;

    let mut map = DataMap::new(key);
    for (i, row) in body.iter().enumerate() {
        let line = i + 2;
        let label = row.get(location_idx).map(|cell| cell.as_ref().trim()).unwrap_or("");
        if label.is_empty() {
            debug!(line, "skipping row without a location");
            continue;
        }

        let address = WellAddress::parse(label)?;
        let raw = row.get(data_idx).map(|cell| cell.as_ref()).unwrap_or("");
        let value = parse_value(&format!("line {} ({})", line, label), raw)?;
        map.insert(address, value)?;
    }

    debug!(key = %key, entries = map.len(), "table parsed");
    Ok(map)
}

/// Build a data map from a plate-shaped grid of readings
///
/// Cell `[r][c]` belongs to the well at row `r`, column `c`. Blank cells are
/// wells that were not read.
pub fn parse_grid<S: AsRef<str>>(key: MeasurementKey, rows: &[Vec<S>]) -> Result<DataMap, IngestError> {
    let mut map = DataMap::new(key);
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let raw = cell.as_ref();
            if raw.trim().is_empty() {
                continue;
            }
            let address = WellAddress::new(r, c);
            map.insert(address, parse_value(&address.to_string(), raw)?)?;
        }
    }
    Ok(map)
}

fn header_index<S: AsRef<str>>(header: &[S], name: &str) -> Result<usize, IngestError> {
    header
        .iter()
        .position(|cell| cell.as_ref().trim().eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| IngestError::MissingHeader(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use plateflow_domain::AddressError;

    #[test]
    fn test_parse_labelled() {
        let map = parse_labelled(
            MeasurementKey::Concentration,
            &[("A1", "55.5"), ("c4", " 61 ")],
        )
        .unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(WellAddress::new(2, 3)), Some(61.0));
    }

    #[test]
    fn test_parse_labelled_bad_label() {
        let result = parse_labelled(MeasurementKey::Concentration, &[("AA1", "1")]);
        assert!(matches!(
            result,
            Err(IngestError::Address(AddressError::MalformedLabel { .. }))
        ));
    }

    #[test]
    fn test_parse_labelled_bad_value() {
        let result = parse_labelled(MeasurementKey::Concentration, &[("A1", "n/a")]);
        assert_eq!(
            result,
            Err(IngestError::InvalidValue {
                location: "A1".to_string(),
                value: "n/a".to_string(),
            })
        );
        assert!(parse_labelled(MeasurementKey::Concentration, &[("A1", "inf")]).is_err());
    }

    #[test]
    fn test_parse_indexed() {
        let map = parse_indexed(MeasurementKey::DilutionFactor, &[(0, 0, 100.0), (7, 11, 50.0)])
            .unwrap();
        assert_eq!(map.get(WellAddress::new(7, 11)), Some(50.0));
        assert!(parse_indexed(MeasurementKey::DilutionFactor, &[(0, 0, f64::NAN)]).is_err());
    }

    #[test]
    fn test_parse_table_uses_header_positions() {
        let table = vec![
            vec!["Stock Conc (ng/ul)", "Location"],
            vec!["72.1", "A1"],
            vec!["18", "H12"],
            vec!["", ""],
        ];
        let map = parse_table(&table, "location", "Stock Conc (ng/ul)").unwrap();
        assert_eq!(map.key(), MeasurementKey::Concentration);
        assert_eq!(
            map.entries(),
            &[(WellAddress::new(0, 0), 72.1), (WellAddress::new(7, 11), 18.0)]
        );
    }

    #[test]
    fn test_parse_table_missing_header() {
        let table = vec![vec!["Well", "ng/ul"], vec!["A1", "3"]];
        assert_eq!(
            parse_table(&table, "Location", "ng/ul"),
            Err(IngestError::MissingHeader("Location".to_string()))
        );
        let empty: Vec<Vec<&str>> = Vec::new();
        assert!(matches!(
            parse_table(&empty, "Well", "ng/ul"),
            Err(IngestError::MissingHeader(_))
        ));
    }

    #[test]
    fn test_parse_table_unknown_key() {
        let table = vec![vec!["Well", "Colour"]];
        assert_eq!(
            parse_table(&table, "Well", "Colour"),
            Err(IngestError::UnknownKey("Colour".to_string()))
        );
    }

    #[test]
    fn test_parse_table_reports_line() {
        let table = vec![vec!["Well", "ng/ul"], vec!["A1", "3"], vec!["B1", "x"]];
        let err = parse_table(&table, "Well", "ng/ul").unwrap_err();
        assert_eq!(
            err,
            IngestError::InvalidValue {
                location: "line 3 (B1)".to_string(),
                value: "x".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_grid_skips_blank_cells() {
        let grid = vec![vec!["100", "", "300"], vec!["", "250", ""]];
        let map = parse_grid(MeasurementKey::Fluorescence, &grid).unwrap();
        assert_eq!(
            map.entries(),
            &[
                (WellAddress::new(0, 0), 100.0),
                (WellAddress::new(0, 2), 300.0),
                (WellAddress::new(1, 1), 250.0),
            ]
        );
    }
}
