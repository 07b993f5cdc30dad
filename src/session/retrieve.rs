use serde_json::Value as JsonValue;

use crate::error::SqlSessionError;
use crate::records::{Record, RecordCollection};
use crate::session::{ExecuteOptions, Executed, Session};
use crate::types::{ColumnMap, SqlValue};

/// Output representation for row-returning helpers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowShape {
    /// The [`Record`] itself.
    #[default]
    Record,
    /// An ordered name-to-value mapping.
    Map,
    /// The values alone, in column order.
    Values,
    /// A JSON object, for attribute-style access.
    Object,
}

/// One row, re-shaped per [`RowShape`].
#[derive(Debug, Clone, PartialEq)]
pub enum RowShaped {
    Record(Record),
    Map(ColumnMap),
    Values(Vec<SqlValue>),
    Object(JsonValue),
}

fn shape_row(record: &Record, shape: RowShape) -> RowShaped {
    match shape {
        RowShape::Record => RowShaped::Record(record.clone()),
        RowShape::Map => RowShaped::Map(record.as_map()),
        RowShape::Values => RowShaped::Values(record.values().to_vec()),
        RowShape::Object => RowShaped::Object(record.as_object()),
    }
}

impl Session {
    fn collection(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Option<RecordCollection>, SqlSessionError> {
        match self.execute(sql, params, ExecuteOptions::default())? {
            Executed::Collection(rows) => Ok(Some(rows)),
            _ => Ok(None),
        }
    }

    /// One value from the result, addressed by column and row offset.
    ///
    /// `None` when the statement returned no result set, too few rows, or
    /// too few columns.
    ///
    /// # Errors
    /// Propagates backend failures unchanged.
    #[track_caller]
    pub fn scalar(
        &mut self,
        sql: &str,
        params: &[SqlValue],
        column_offset: usize,
        row_offset: usize,
    ) -> Result<Option<SqlValue>, SqlSessionError> {
        let Some(mut rows) = self.collection(sql, params)? else {
            return Ok(None);
        };
        Ok(rows
            .get(row_offset)?
            .and_then(|record| record.get_by_index(column_offset))
            .cloned())
    }

    /// One row from the result in the requested shape, or `None` when the
    /// result has no row at `row_offset`.
    ///
    /// # Errors
    /// Propagates backend failures unchanged.
    #[track_caller]
    pub fn row(
        &mut self,
        sql: &str,
        params: &[SqlValue],
        shape: RowShape,
        row_offset: usize,
    ) -> Result<Option<RowShaped>, SqlSessionError> {
        let Some(mut rows) = self.collection(sql, params)? else {
            return Ok(None);
        };
        Ok(rows.get(row_offset)?.map(|record| shape_row(record, shape)))
    }

    /// One column of the result as an ordered value list.
    ///
    /// # Errors
    /// `ExecutionError` when `column_offset` is out of range for the
    /// result; backend failures otherwise.
    #[track_caller]
    pub fn column(
        &mut self,
        sql: &str,
        params: &[SqlValue],
        column_offset: usize,
    ) -> Result<Vec<SqlValue>, SqlSessionError> {
        let Some(mut rows) = self.collection(sql, params)? else {
            return Ok(Vec::new());
        };
        let mut column = Vec::new();
        for record in rows.all()? {
            let Some(value) = record.get_by_index(column_offset) else {
                return Err(SqlSessionError::ExecutionError(format!(
                    "column offset {column_offset} out of range for {}-column result",
                    record.len()
                )));
            };
            column.push(value.clone());
        }
        Ok(column)
    }

    /// The entire result set, one [`RowShaped`] per row.
    ///
    /// # Errors
    /// Propagates backend failures unchanged.
    #[track_caller]
    pub fn rows(
        &mut self,
        sql: &str,
        params: &[SqlValue],
        shape: RowShape,
    ) -> Result<Vec<RowShaped>, SqlSessionError> {
        let Some(mut rows) = self.collection(sql, params)? else {
            return Ok(Vec::new());
        };
        Ok(rows
            .all()?
            .iter()
            .map(|record| shape_row(record, shape))
            .collect())
    }
}
