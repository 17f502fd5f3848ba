//! A named collection of result tables.

use crate::errors::{RunError, RunResult};
use crate::table::ResultTable;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ResultItem {
    pub name: String,
    pub table: ResultTable,
}

/// Result tables of a finalized run, accessible by name.
///
/// Names are unique and iteration follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct SimulationResults {
    items: Vec<ResultItem>,
}

impl SimulationResults {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add a new table to the collection
    ///
    /// Fails if a table with the same name already exists
    pub fn add(&mut self, name: impl Into<String>, table: ResultTable) -> RunResult<()> {
        let name = name.into();
        if self.get_by_name(&name).is_some() {
            return Err(RunError::Error(format!("result {} already exists", name)));
        }
        self.items.push(ResultItem { name, table });
        Ok(())
    }

    pub fn get_by_name(&self, name: &str) -> Option<&ResultItem> {
        self.items.iter().find(|x| x.name == name)
    }

    /// Look up a table by name.
    pub fn get(&self, name: &str) -> RunResult<&ResultTable> {
        self.get_by_name(name)
            .map(|item| &item.table)
            .ok_or_else(|| RunError::MissingResult {
                key: name.to_string(),
                available: self.names(),
            })
    }

    pub fn names(&self) -> Vec<String> {
        self.items.iter().map(|x| x.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResultItem> {
        self.items.iter()
    }

    /// Write every table to `<dir>/<name>.csv`, creating `dir` if needed.
    ///
    /// Returns the paths written, in collection order.
    pub fn write_csv_dir(&self, dir: &Path) -> RunResult<Vec<PathBuf>> {
        fs::create_dir_all(dir).map_err(|e| RunError::io(dir.display(), e))?;

        let mut written = Vec::with_capacity(self.items.len());
        for item in &self.items {
            let path = dir.join(format!("{}.csv", item.name));
            let file = fs::File::create(&path).map_err(|e| RunError::io(path.display(), e))?;
            item.table.write_csv(file)?;
            log::info!(
                "Wrote {} ({} rows) to {}",
                item.name,
                item.table.n_rows(),
                path.display()
            );
            written.push(path);
        }
        Ok(written)
    }
}
