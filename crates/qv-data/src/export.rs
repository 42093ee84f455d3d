//! CSV export of the records currently shown

use std::io::Write;
use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use qv_core::Record;

use crate::DataError;

/// Default file name offered by the save dialog
pub const EXPORT_FILE_NAME: &str = "earthquake_data.csv";

const EXPORT_HEADER: [&str; 6] = ["Time", "Place", "Magnitude", "Depth", "Latitude", "Longitude"];

/// Write records with the fixed export columns, every value double-quoted
pub fn write_csv<'a, W, I>(writer: W, records: I) -> Result<(), DataError>
where
    W: Write,
    I: IntoIterator<Item = &'a Record>,
{
    let mut csv_writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(EXPORT_HEADER)?;
    for record in records {
        csv_writer.write_record([
            record.time.clone(),
            record.place.clone(),
            record.magnitude.to_string(),
            record.depth.to_string(),
            record.latitude.to_string(),
            record.longitude.to_string(),
        ])?;
    }
    csv_writer.flush()?;

    Ok(())
}

/// Render the export into a string
pub fn to_csv_string<'a, I>(records: I) -> Result<String, DataError>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut buffer = Vec::new();
    write_csv(&mut buffer, records)?;
    String::from_utf8(buffer).map_err(|e| DataError::Csv(e.to_string()))
}

/// Write the export to `path`
pub fn export_to_file<'a, I>(path: &Path, records: I) -> Result<(), DataError>
where
    I: IntoIterator<Item = &'a Record>,
{
    let file = std::fs::File::create(path)?;
    write_csv(std::io::BufWriter::new(file), records)?;
    tracing::info!("Exported records to {:?}", path);
    Ok(())
}
