//! Laundry service catalog entries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::entity::{CatalogEntity, CellValue};
use crate::catalog::soft_delete::SoftDelete;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub unit: String,
    pub price: f64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub deleted_at: SoftDelete,
}

/// Editable fields of a service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceForm {
    pub name: String,
    pub description: String,
    pub unit: String,
    pub price: f64,
}

impl Default for ServiceForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            unit: "kg".to_string(),
            price: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ServiceStats {
    pub total: usize,
    pub active: usize,
    pub archived: usize,
    pub average_price: f64,
}

impl fmt::Display for ServiceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {}  Active: {}  Archived: {}  Avg price: {:.0}",
            self.total, self.active, self.archived, self.average_price
        )
    }
}

impl CatalogEntity for Service {
    type Form = ServiceForm;
    type Stats = ServiceStats;

    const RESOURCE: &'static str = "services";
    const LABEL: &'static str = "service";
    const SHEET_NAME: &'static str = "Services";

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn deleted_at(&self) -> &SoftDelete {
        &self.deleted_at
    }

    fn to_form(&self) -> ServiceForm {
        ServiceForm {
            name: self.name.clone(),
            description: self.description.clone(),
            unit: self.unit.clone(),
            price: self.price,
        }
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Name", "Description", "Unit", "Price", "Status"]
    }

    fn cell(&self, column: &str) -> Option<CellValue> {
        let value = match column.to_ascii_lowercase().as_str() {
            "id" => CellValue::Int(self.id),
            "name" => CellValue::from(self.name.as_str()),
            "description" => CellValue::from(self.description.as_str()),
            "unit" => CellValue::from(self.unit.as_str()),
            "price" => CellValue::Number(self.price),
            "status" => CellValue::from(self.deleted_at.status_label()),
            _ => return None,
        };
        Some(value)
    }

    fn stats(items: &[Self]) -> ServiceStats {
        let archived = items.iter().filter(|s| s.is_archived()).count();
        let average_price = if items.is_empty() {
            0.0
        } else {
            items.iter().map(|s| s.price).sum::<f64>() / items.len() as f64
        };
        ServiceStats {
            total: items.len(),
            active: items.len() - archived,
            archived,
            average_price,
        }
    }
}
