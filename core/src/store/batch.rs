use crate::{batch_writer::ColumnBatch, error::ImaraResult};
use rusqlite::{params_from_iter, Connection};

/// SQLite's default bound-parameter ceiling for older builds.
const MAX_BOUND_PARAMS: usize = 999;

/// Multi-row INSERT, chunked so no statement exceeds the
/// bound-parameter limit.
pub(super) fn append_batch(conn: &Connection, batch: &ColumnBatch) -> ImaraResult<usize> {
    if batch.is_empty() {
        return Ok(0);
    }
    let width = batch.columns().len();
    let rows_per_statement = (MAX_BOUND_PARAMS / width).max(1);
    let column_list = batch.columns().join(", ");
    let row_placeholder = format!("({})", vec!["?"; width].join(", "));

    let mut written = 0;
    for chunk in batch.rows().chunks(rows_per_statement) {
        let sql = format!(
            "INSERT INTO {} ({column_list}) VALUES {}",
            batch.table().name(),
            vec![row_placeholder.as_str(); chunk.len()].join(", ")
        );
        written += conn.execute(&sql, params_from_iter(chunk.iter().flatten()))?;
    }
    log::debug!("store: appended {written} rows to {}", batch.table().name());
    Ok(written)
}
