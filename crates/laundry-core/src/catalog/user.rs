//! User records managed from the Users screen.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::catalog::entity::{CatalogEntity, CellValue, format_timestamp};
use crate::catalog::soft_delete::SoftDelete;

/// Role of an account.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Admin,
    #[default]
    Customer,
    Employee,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub deleted_at: SoftDelete,
}

/// Editable fields of a user. Defaults match a blank "Add User" dialog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct UserStats {
    pub total: usize,
    pub admins: usize,
    pub customers: usize,
    pub archived: usize,
}

impl fmt::Display for UserStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {}  Admins: {}  Customers: {}  Archived: {}",
            self.total, self.admins, self.customers, self.archived
        )
    }
}

impl CatalogEntity for User {
    type Form = UserForm;
    type Stats = UserStats;

    const RESOURCE: &'static str = "users";
    const LABEL: &'static str = "user";
    const SHEET_NAME: &'static str = "Users";

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn deleted_at(&self) -> &SoftDelete {
        &self.deleted_at
    }

    fn to_form(&self) -> UserForm {
        UserForm {
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Name", "Email", "Role", "Status", "Created"]
    }

    fn cell(&self, column: &str) -> Option<CellValue> {
        let value = match column.to_ascii_lowercase().as_str() {
            "id" => CellValue::Int(self.id),
            "name" => CellValue::from(self.name.as_str()),
            "email" => CellValue::from(self.email.as_str()),
            "role" => CellValue::from(self.role.to_string()),
            "status" => CellValue::from(self.deleted_at.status_label()),
            "created" => CellValue::from(format_timestamp(&self.created_at)),
            _ => return None,
        };
        Some(value)
    }

    fn stats(items: &[Self]) -> UserStats {
        UserStats {
            total: items.len(),
            admins: items.iter().filter(|u| u.role == Role::Admin).count(),
            customers: items.iter().filter(|u| u.role == Role::Customer).count(),
            archived: items.iter().filter(|u| u.is_archived()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> User {
        serde_json::from_value(json!({
            "id": 7,
            "name": "Siti",
            "email": "siti@example.com",
            "role": "employee",
            "created_at": "2024-02-10 09:15:00",
            "updated_at": "2024-02-10T09:15:00Z",
            "deleted_at": null
        }))
        .unwrap()
    }

    #[test]
    fn test_deserialize_user() {
        let user = sample();
        assert_eq!(user.role, Role::Employee);
        assert!(!user.is_archived());
    }

    #[test]
    fn test_form_defaults_to_customer() {
        let form = UserForm::default();
        assert_eq!(form.role, Role::Customer);
        assert!(form.name.is_empty());
    }

    #[test]
    fn test_row_follows_columns() {
        let row = sample().row();
        assert_eq!(row.len(), User::columns().len());
        assert_eq!(row[0], CellValue::Int(7));
        assert_eq!(row[3], CellValue::from("employee"));
        assert_eq!(row[4], CellValue::from("Active"));
        assert_eq!(row[5], CellValue::from("2024-02-10 09:15"));
    }

    #[test]
    fn test_stats() {
        let mut admin = sample();
        admin.id = 1;
        admin.role = Role::Admin;
        let mut archived = sample();
        archived.id = 2;
        archived.role = Role::Customer;
        archived.deleted_at = SoftDelete::ArchivedAt("2024-03-01".into());

        let stats = User::stats(&[admin, archived, sample()]);
        assert_eq!(
            stats,
            UserStats {
                total: 3,
                admins: 1,
                customers: 1,
                archived: 1
            }
        );
    }
}
