//! Client-side data table over loaded catalog rows.
//!
//! Filtering, sorting and selection never touch the network; they work on
//! whatever the last fetch loaded.

use std::collections::BTreeSet;

use crate::catalog::entity::CatalogEntity;
use crate::error::{AdminError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub column: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone)]
pub struct DataTable<E: CatalogEntity> {
    rows: Vec<E>,
    search: String,
    sort: Option<SortOrder>,
    selected: BTreeSet<i64>,
}

impl<E: CatalogEntity> Default for DataTable<E> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            search: String::new(),
            sort: None,
            selected: BTreeSet::new(),
        }
    }
}

impl<E: CatalogEntity> DataTable<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the loaded rows. Selections of rows that disappeared are dropped.
    pub fn set_rows(&mut self, rows: Vec<E>) {
        self.rows = rows;
        let present: BTreeSet<i64> = self.rows.iter().map(|row| row.id()).collect();
        self.selected.retain(|id| present.contains(id));
    }

    pub fn rows(&self) -> &[E] {
        &self.rows
    }

    pub fn find(&self, id: i64) -> Option<&E> {
        self.rows.iter().find(|row| row.id() == id)
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Filters rows whose name contains `text` (case-insensitive).
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn sort(&self) -> Option<&SortOrder> {
        self.sort.as_ref()
    }

    /// Sorts by one of the entity's columns.
    pub fn sort_by(&mut self, column: &str, direction: SortDirection) -> Result<()> {
        let known = E::columns()
            .iter()
            .find(|c| c.eq_ignore_ascii_case(column))
            .ok_or_else(|| AdminError::not_found("column", column))?;
        self.sort = Some(SortOrder {
            column: known.to_string(),
            direction,
        });
        Ok(())
    }

    /// Cycles a column through ascending, descending and unsorted.
    pub fn toggle_sort(&mut self, column: &str) -> Result<()> {
        match self.sort.take() {
            Some(order) if order.column.eq_ignore_ascii_case(column) => {
                if order.direction == SortDirection::Ascending {
                    self.sort_by(column, SortDirection::Descending)?;
                }
                Ok(())
            }
            _ => self.sort_by(column, SortDirection::Ascending),
        }
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    /// Rows after search and sort, in display order.
    pub fn visible(&self) -> Vec<&E> {
        let needle = self.search.trim().to_lowercase();
        let mut rows: Vec<&E> = self
            .rows
            .iter()
            .filter(|row| needle.is_empty() || row.name().to_lowercase().contains(&needle))
            .collect();

        if let Some(order) = &self.sort {
            rows.sort_by(|a, b| {
                let ordering = match (a.cell(&order.column), b.cell(&order.column)) {
                    (Some(x), Some(y)) => x.compare(&y),
                    _ => std::cmp::Ordering::Equal,
                };
                match order.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }
        rows
    }

    /// Toggles the selection of a loaded row. Returns the new state.
    pub fn toggle_selected(&mut self, id: i64) -> Result<bool> {
        if self.find(id).is_none() {
            return Err(AdminError::not_found(E::LABEL, id.to_string()));
        }
        if self.selected.remove(&id) {
            Ok(false)
        } else {
            self.selected.insert(id);
            Ok(true)
        }
    }

    /// Selects (or deselects) every visible row.
    pub fn select_all_visible(&mut self, selected: bool) {
        let ids: Vec<i64> = self.visible().iter().map(|row| row.id()).collect();
        for id in ids {
            if selected {
                self.selected.insert(id);
            } else {
                self.selected.remove(&id);
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.selected.contains(&id)
    }

    pub fn selected_rows(&self) -> Vec<&E> {
        self.rows
            .iter()
            .filter(|row| self.selected.contains(&row.id()))
            .collect()
    }
}
