use crate::domain::model::{ResultSet, Table, TableRecord};
use crate::utils::error::{DashboardError, Result};

/// `SELECT <columns> FROM <relation>` for a record type.
pub fn projection_sql<T: TableRecord>() -> String {
    format!("SELECT {} FROM {}", T::COLUMNS.join(", "), T::RELATION)
}

/// Index of each of `T::COLUMNS` within `available`, matched case-insensitively.
pub fn column_positions<T, S>(available: &[S]) -> Result<Vec<usize>>
where
    T: TableRecord,
    S: AsRef<str>,
{
    T::COLUMNS
        .iter()
        .map(|column| {
            available
                .iter()
                .position(|name| name.as_ref().trim().eq_ignore_ascii_case(column))
                .ok_or_else(|| DashboardError::MissingColumn {
                    table: T::RELATION.to_string(),
                    column: column.to_string(),
                })
        })
        .collect()
}

/// Keeps only the projected columns of a raw result, in declared order.
/// SQL NULL becomes an empty cell, the same as an empty CSV field.
pub fn project<T: TableRecord>(result: ResultSet) -> Result<Table<T>> {
    let positions = column_positions::<T, _>(&result.columns)?;

    let rows = result
        .rows
        .into_iter()
        .enumerate()
        .map(|(index, mut row)| {
            if row.len() != result.columns.len() {
                return Err(DashboardError::DataError {
                    table: T::RELATION.to_string(),
                    message: format!(
                        "row {} has {} cells but the result has {} columns",
                        index + 1,
                        row.len(),
                        result.columns.len()
                    ),
                });
            }
            let cells = positions
                .iter()
                .map(|&i| row[i].take().unwrap_or_default())
                .collect();
            Ok(T::from_cells(cells))
        })
        .collect::<Result<Vec<T>>>()?;

    Ok(Table::new(rows))
}
