//! Row-oriented phase-indexed dataset, as handed over by the conversion layer.

use serde::{Deserialize, Serialize};

/// One declared value column: variable name plus its declared unit symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDecl {
    pub name: String,
    pub unit: String,
}

impl ColumnDecl {
    pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
        }
    }
}

/// One sample row: one phase of one cycle, one value per declared column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRow {
    pub subject: String,
    pub task: String,
    pub cycle: String,
    pub phase_percent: f64,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PhaseIndexedDataset {
    pub columns: Vec<ColumnDecl>,
    pub rows: Vec<DatasetRow>,
}

impl PhaseIndexedDataset {
    pub fn new(columns: Vec<ColumnDecl>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: DatasetRow) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
