//! CSV export of transaction lists

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{CoreError, CoreResult};
use crate::models::Transaction;

/// Column order of exported files
pub const CSV_HEADER: [&str; 9] = [
    "id",
    "hash",
    "fromAddress",
    "toAddress",
    "amount",
    "status",
    "gasLimit",
    "gasPrice",
    "timestamp",
];

/// Download filename for an export taken on `date`
pub fn export_filename(date: NaiveDate) -> String {
    format!("transactions-{}.csv", date.format("%Y-%m-%d"))
}

/// Serialize transactions to CSV, header first.
///
/// Fields are quoted only when they contain a delimiter, quote or newline.
pub fn to_csv<'a, I>(transactions: I) -> CoreResult<String>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;

    let mut rows = 0usize;
    for tx in transactions {
        writer.write_record([
            tx.id.as_str(),
            tx.hash.as_str(),
            tx.from_address.as_str(),
            tx.to_address.as_str(),
            tx.amount.as_str(),
            tx.status.as_str(),
            tx.gas_limit.as_deref().unwrap_or(""),
            tx.gas_price.as_deref().unwrap_or(""),
            tx.timestamp.as_str(),
        ])?;
        rows += 1;
    }

    let bytes = writer.into_inner().map_err(|e| CoreError::Export {
        message: e.to_string(),
    })?;

    log::debug!("Exported {} transactions to CSV", rows);

    String::from_utf8(bytes).map_err(|e| CoreError::Export {
        message: e.to_string(),
    })
}
