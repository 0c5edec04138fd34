use std::fs::File;
use std::path::Path;

use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use tracing::info;

use crate::error::Result;
use crate::store::batch_builder::RecordBatchBuilder;
use crate::store::scenario::Transaction;
use crate::store::schema::sales_schema;

pub const DEFAULT_BATCH_SIZE: usize = 4096;

/// Writes the transactions to a SNAPPY-compressed parquet file.
/// An empty slice still produces a valid file carrying the full schema.
pub fn write_parquet<P: AsRef<Path>>(path: P, transactions: &[Transaction]) -> Result<usize> {
    let schema = sales_schema();
    let file = File::create(path.as_ref())?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

    let mut builder = RecordBatchBuilder::new(DEFAULT_BATCH_SIZE, schema);
    for tx in transactions {
        builder.append(tx);
        if builder.len() == DEFAULT_BATCH_SIZE {
            writer.write(&builder.build_record_batch()?)?;
        }
    }
    if !builder.is_empty() {
        writer.write(&builder.build_record_batch()?)?;
    }
    writer.close()?;

    info!(
        "wrote {} rows to {}",
        transactions.len(),
        path.as_ref().display()
    );
    Ok(transactions.len())
}
