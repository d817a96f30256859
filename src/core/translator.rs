use crate::config::FieldMapping;
use crate::core::timestamp::canonical;
use crate::domain::model::{NormalizedRecord, Position};
use crate::utils::error::TranslationError;

type Translated<T> = std::result::Result<T, TranslationError>;

/// Maps one raw row onto a trip document.
///
/// Pure: the same row and mapping always give the same record or the same
/// error. A row narrower than the mapping fails with `MalformedRowError`
/// before any column is read.
pub fn translate(row: &[String], mapping: &FieldMapping) -> Translated<NormalizedRecord> {
    let columns = &mapping.columns;
    if row.len() <= columns.max_index() {
        return Err(TranslationError::MalformedRowError {
            required: columns.required_columns(),
            actual: row.len(),
        });
    }

    let dropoff_time = parse_time(row, columns.dropoff_time, "dropoff time", mapping)?;
    let pickup_time = parse_time(row, columns.pickup_time, "pickup time", mapping)?;

    let start_coords = Position {
        latitude: parse_coordinate(row, columns.start_lat, "start latitude")?,
        longitude: parse_coordinate(row, columns.start_lon, "start longitude")?,
    };
    let end_coords = Position {
        latitude: parse_coordinate(row, columns.end_lat, "end latitude")?,
        longitude: parse_coordinate(row, columns.end_lon, "end longitude")?,
    };

    Ok(NormalizedRecord {
        dropoff_time,
        pickup_time,
        start_block: column(row, columns.start_block)?.to_string(),
        start_tract: column(row, columns.start_tract)?.to_string(),
        start_county: column(row, columns.start_county)?.to_string(),
        end_block: column(row, columns.end_block)?.to_string(),
        end_tract: column(row, columns.end_tract)?.to_string(),
        end_county: column(row, columns.end_county)?.to_string(),
        start_coords,
        end_coords,
    })
}

fn column(row: &[String], index: usize) -> Translated<&str> {
    row.get(index)
        .map(String::as_str)
        .ok_or_else(|| TranslationError::MalformedRowError {
            required: index.saturating_add(1),
            actual: row.len(),
        })
}

fn parse_time(
    row: &[String],
    index: usize,
    field: &'static str,
    mapping: &FieldMapping,
) -> Translated<String> {
    let value = column(row, index)?;
    mapping
        .time_format
        .parse(value)
        .map(|instant| canonical(&instant))
        .map_err(|source| TranslationError::TimeParseError {
            field,
            value: value.to_string(),
            source,
        })
}

fn parse_coordinate(row: &[String], index: usize, field: &'static str) -> Translated<f64> {
    let value = column(row, index)?;
    let parsed = value
        .trim()
        .parse::<f64>()
        .map_err(|e| TranslationError::CoordinateParseError {
            field,
            value: value.to_string(),
            reason: e.to_string(),
        })?;

    // JSON has no representation for NaN or infinity.
    if !parsed.is_finite() {
        return Err(TranslationError::CoordinateParseError {
            field,
            value: value.to_string(),
            reason: "coordinate must be finite".to_string(),
        });
    }
    Ok(parsed)
}
