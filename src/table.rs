//! In-memory trip record table.
//!
//! The table is column-oriented: each [`Column`] owns its name, inferred
//! [`ColumnType`], and one optional cell per row. All columns always hold the
//! same number of cells.

use std::collections::HashSet;

use anyhow::{Context, Result, ensure};

use crate::data::{
    ColumnType, Value, ValueKey, infer_column_type, is_missing_token, parse_cell,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub datatype: ColumnType,
    pub cells: Vec<Option<Value>>,
}

impl Column {
    pub fn new(name: impl Into<String>, datatype: ColumnType, cells: Vec<Option<Value>>) -> Self {
        Self {
            name: name.into(),
            datatype,
            cells,
        }
    }

    /// Builds a typed column from raw text fields, inferring its type.
    pub fn from_raw(name: &str, raw: &[String]) -> Result<Self> {
        let datatype = infer_column_type(
            raw.iter()
                .map(|value| (!is_missing_token(value)).then_some(value.as_str())),
        );
        let cells = raw
            .iter()
            .enumerate()
            .map(|(idx, value)| {
                parse_cell(value, &datatype)
                    .with_context(|| format!("Row {} column '{name}'", idx + 2))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(name, datatype, cells))
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    pub fn non_missing_count(&self) -> usize {
        self.cells.len() - self.missing_count()
    }

    /// Changes the column type, converting existing cells to match.
    pub fn retype(&mut self, datatype: ColumnType) {
        if self.datatype == datatype {
            return;
        }
        for cell in &mut self.cells {
            if let Some(value) = cell.take() {
                *cell = Some(value.cast(&datatype));
            }
        }
        self.datatype = datatype;
    }

    /// Replaces every missing cell with `value`, widening the column type when
    /// the fill value does not fit it. Returns the number of cells filled.
    pub fn fill_missing(&mut self, value: Value) -> usize {
        let missing = self.missing_count();
        if missing == 0 {
            return 0;
        }
        let target = if self.non_missing_count() == 0 {
            value.column_type()
        } else {
            self.datatype.unify(value.column_type())
        };
        self.retype(target);
        let fill = value.cast(&target);
        for cell in self.cells.iter_mut().filter(|cell| cell.is_none()) {
            *cell = Some(fill.clone());
        }
        missing
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripTable {
    columns: Vec<Column>,
    row_count: usize,
}

impl TripTable {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map_or(0, |column| column.cells.len());
        for column in &columns {
            ensure!(
                column.cells.len() == row_count,
                "Column '{}' holds {} cell(s) but the table has {} row(s)",
                column.name,
                column.cells.len(),
                row_count
            );
        }
        Ok(Self { columns, row_count })
    }

    /// Builds a table from a header row and raw text records. Records shorter
    /// than the header are padded with missing cells.
    pub fn from_records(headers: &[String], records: &[Vec<String>]) -> Result<Self> {
        let mut raw_columns = vec![Vec::with_capacity(records.len()); headers.len()];
        for (row_idx, record) in records.iter().enumerate() {
            ensure!(
                record.len() <= headers.len(),
                "Row {} has {} field(s) but the header declares {}",
                row_idx + 2,
                record.len(),
                headers.len()
            );
            for (col_idx, raw) in raw_columns.iter_mut().enumerate() {
                raw.push(record.get(col_idx).cloned().unwrap_or_default());
            }
        }
        let columns = headers
            .iter()
            .zip(raw_columns.iter())
            .map(|(name, raw)| Column::from_raw(name, raw))
            .collect::<Result<Vec<_>>>()?;
        let mut table = Self::new(columns)?;
        table.row_count = records.len();
        Ok(table)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|column| column.name.clone()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|column| column.name == name)
    }

    /// Cells of one row, in column order.
    pub fn row(&self, row: usize) -> Vec<Option<&Value>> {
        self.columns
            .iter()
            .map(|column| column.cells.get(row).and_then(Option::as_ref))
            .collect()
    }

    /// Appends the rows of `other`, which must carry the same column names in
    /// the same order. Column types are unified per column.
    pub fn append(&mut self, other: TripTable) -> Result<()> {
        ensure!(
            self.headers() == other.headers(),
            "Cannot append tables with different columns"
        );
        for (column, incoming) in self.columns.iter_mut().zip(other.columns) {
            let target = match (column.non_missing_count(), incoming.non_missing_count()) {
                (0, _) => incoming.datatype,
                (_, 0) => column.datatype,
                _ => column.datatype.unify(incoming.datatype),
            };
            column.retype(target);
            column
                .cells
                .extend(incoming.cells.into_iter().map(|cell| cell.map(|v| v.cast(&target))));
        }
        self.row_count += other.row_count;
        Ok(())
    }

    /// Removes rows identical to an earlier row across every column, keeping
    /// the first occurrence. Returns the number of rows removed.
    pub fn drop_duplicate_rows(&mut self) -> usize {
        let mut seen = HashSet::with_capacity(self.row_count);
        let keep = (0..self.row_count)
            .map(|row| seen.insert(self.row_key(row)))
            .collect::<Vec<_>>();
        let removed = keep.iter().filter(|kept| !**kept).count();
        if removed == 0 {
            return 0;
        }
        for column in &mut self.columns {
            let mut flags = keep.iter();
            column
                .cells
                .retain(|_| flags.next().copied().unwrap_or(true));
        }
        self.row_count -= removed;
        removed
    }

    fn row_key(&self, row: usize) -> Vec<Option<ValueKey<'_>>> {
        self.row(row)
            .into_iter()
            .map(|cell| cell.map(Value::key))
            .collect()
    }

    /// Rows rendered as text, missing cells as empty strings.
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        (0..self.row_count)
            .map(|row| {
                self.row(row)
                    .into_iter()
                    .map(|cell| cell.map(Value::as_display).unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}
