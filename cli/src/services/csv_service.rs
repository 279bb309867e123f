use crate::{
    error::{AnalysisError, Result},
    models::{PropertyRecord, RawPropertyRow, REQUIRED_COLUMNS},
    utils::{Logger, Timer},
};

/// Parse assessor CSV text into property records.
///
/// Rows without an address or an owner are dropped. Input order is kept.
/// A malformed file fails as a whole; a well-formed file with no usable
/// rows fails with [`AnalysisError::EmptyResult`].
pub fn parse_property_csv(content: &str, source_label: &str) -> Result<Vec<PropertyRecord>> {
    let logger = Logger::new("CSV_SERVICE");
    let timer = Timer::start(&format!("{} parse", source_label));

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AnalysisError::parse(source_label, describe_csv_error(&e)))?
        .clone();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(AnalysisError::parse(
            source_label,
            format!("missing required columns: {}", missing.join(", ")),
        ));
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for row in reader.deserialize::<RawPropertyRow>() {
        let row = row.map_err(|e| AnalysisError::parse(source_label, describe_csv_error(&e)))?;
        match row.into_record() {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        logger.debug(&format!("Skipped {} rows without address or owner in {}", skipped, source_label));
    }

    if records.is_empty() {
        logger.warn(&format!("No valid property data found in {}", source_label));
        return Err(AnalysisError::EmptyResult(source_label.to_string()));
    }

    logger.info(&format!("Parsed {} properties from {}", records.len(), source_label));
    timer.log_elapsed("CSV_SERVICE");
    Ok(records)
}

fn describe_csv_error(error: &csv::Error) -> String {
    let detail = match error.kind() {
        csv::ErrorKind::UnequalLengths { expected_len, len, .. } => {
            format!("expected {} fields, found {}", expected_len, len)
        }
        csv::ErrorKind::Utf8 { .. } => "invalid UTF-8".to_string(),
        _ => error.to_string(),
    };

    match error.position() {
        Some(position) => format!("line {}: {}", position.line(), detail),
        None => detail,
    }
}
