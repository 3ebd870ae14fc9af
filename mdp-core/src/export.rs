//! CSV export of a record set.
//!
//! The header is the key list of the first record, in that record's order.
//! Later records are read by those same keys: a key they lack becomes an
//! empty cell and keys the first record does not have are dropped.

use crate::record::{scalar_text, RawRecord};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use log::{info, warn};

/// Default download name for exported PFZ data.
pub const DEFAULT_FILENAME: &str = "pfz_clean.csv";

/// MIME type of the exported bytes.
pub const MIME_TYPE: &str = "text/csv";

/// Serialize records as UTF-8 CSV. Empty input yields empty output.
///
/// Fields containing a comma, a double quote or a line break are quoted
/// with inner quotes doubled. Rows are separated by `\n` with no trailing
/// newline.
///
/// A row whose only cell is empty is written as `""` so readers do not take
/// it for a blank line and skip it.
pub fn to_delimited<'a, I>(records: I) -> Vec<u8>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut records = records.into_iter().peekable();
    let columns: Vec<String> = match records.peek() {
        Some(first) => first.keys().map(str::to_string).collect(),
        None => return Vec::new(),
    };

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(vec![]);

    if writer.write_record(&columns).is_err() {
        warn!("failed to write CSV header");
        return Vec::new();
    }
    let mut rows = 0usize;
    for record in records {
        let cells = columns.iter().map(|key| {
            record
                .get(key)
                .and_then(scalar_text)
                .map(|text| text.into_owned())
                .unwrap_or_default()
        });
        if let Err(e) = writer.write_record(cells) {
            warn!("skipping row {} in CSV export: {}", rows, e);
            continue;
        }
        rows += 1;
    }

    let mut bytes = match writer.into_inner() {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("failed to flush CSV export: {}", e);
            return Vec::new();
        }
    };
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }
    info!("exported {} rows x {} columns", rows, columns.len());
    bytes
}
