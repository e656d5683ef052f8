use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Float64Array, Float64Builder, ListBuilder, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use crate::dataset::{Merged, Signal};

// ---------------------------------------------------------------------------
// Merged-trial Parquet export
// ---------------------------------------------------------------------------

/// Write a merged columnar record as Parquet: one row per trial, `id` as a
/// string column, scalar fields as `Float64`, series fields as
/// `List<Float64>`. Frame grids and nested location mappings have no flat
/// columnar shape and are skipped with a log note.
pub fn write_merged_parquet(merged: &Merged, path: &Path) -> Result<()> {
    let n = merged.ids.len();

    let mut fields = vec![Field::new("id", DataType::Utf8, false)];
    let mut columns: Vec<ArrayRef> = vec![Arc::new(StringArray::from(
        merged.ids.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
    ))];

    for (name, values) in &merged.columns {
        if values.len() != n {
            bail!("column '{name}' has {} entries for {n} trials", values.len());
        }
        match values.first() {
            Some(Signal::Scalar(_)) => {
                let mut cells = Vec::with_capacity(n);
                for value in values {
                    match value.as_scalar() {
                        Some(v) => cells.push(v),
                        None => bail!("column '{name}' mixes scalar and non-scalar values"),
                    }
                }
                fields.push(Field::new(name.as_str(), DataType::Float64, false));
                columns.push(Arc::new(Float64Array::from(cells)));
            }
            Some(Signal::Series(_)) => {
                let mut builder = ListBuilder::new(Float64Builder::new());
                for value in values {
                    let Some(series) = value.as_series() else {
                        bail!("column '{name}' mixes series and non-series values");
                    };
                    let cells = builder.values();
                    for &v in series {
                        cells.append_value(v);
                    }
                    builder.append(true);
                }
                fields.push(Field::new(
                    name.as_str(),
                    DataType::List(Arc::new(Field::new("item", DataType::Float64, true))),
                    false,
                ));
                columns.push(Arc::new(builder.finish()));
            }
            Some(Signal::Frames(_)) | Some(Signal::Nested(_)) => {
                log::info!("skipping column '{name}': no flat columnar shape");
            }
            None => {}
        }
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
