//! `users` and `services` subcommands.
//!
//! Both resources share one runner; only the form fields differ.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use colored::Colorize;
use laundry_application::{CrudController, Outcome};
use laundry_core::catalog::{
    CatalogEntity, Role, ServiceForm, SortDirection, StatusFilter, UserForm,
};
use laundry_core::export::ExportFormat;
use laundry_infrastructure::export::write_artifact;

use crate::context::AppContext;
use crate::render;

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// all, active or archived
    #[arg(long, default_value_t = StatusFilter::All)]
    pub status: StatusFilter,
    /// Case-insensitive name filter
    #[arg(long)]
    pub search: Option<String>,
    /// Column to sort by
    #[arg(long)]
    pub sort: Option<String>,
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// csv, xlsx or pdf
    #[arg(long, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,
    /// Output directory
    #[arg(long)]
    pub output: Option<PathBuf>,
    #[command(flatten)]
    pub list: ListArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct UserFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    /// admin, customer or employee
    #[arg(long)]
    pub role: Option<Role>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServiceFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Pricing unit, e.g. kg or pcs
    #[arg(long)]
    pub unit: Option<String>,
    #[arg(long)]
    pub price: Option<f64>,
}

/// Fields given on the command line, applied over a dialog form.
pub trait FormPatch<F> {
    fn apply(&self, form: &mut F);

    /// Name of the first required field left empty.
    fn missing(form: &F) -> Option<&'static str>;
}

impl FormPatch<UserForm> for UserFields {
    fn apply(&self, form: &mut UserForm) {
        if let Some(name) = &self.name {
            form.name = name.clone();
        }
        if let Some(email) = &self.email {
            form.email = email.clone();
        }
        if let Some(role) = self.role {
            form.role = role;
        }
    }

    fn missing(form: &UserForm) -> Option<&'static str> {
        if form.name.trim().is_empty() {
            Some("name")
        } else if form.email.trim().is_empty() {
            Some("email")
        } else {
            None
        }
    }
}

impl FormPatch<ServiceForm> for ServiceFields {
    fn apply(&self, form: &mut ServiceForm) {
        if let Some(name) = &self.name {
            form.name = name.clone();
        }
        if let Some(description) = &self.description {
            form.description = description.clone();
        }
        if let Some(unit) = &self.unit {
            form.unit = unit.clone();
        }
        if let Some(price) = self.price {
            form.price = price;
        }
    }

    fn missing(form: &ServiceForm) -> Option<&'static str> {
        if form.name.trim().is_empty() {
            Some("name")
        } else if form.unit.trim().is_empty() {
            Some("unit")
        } else {
            None
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum UserAction {
    /// List users
    List(ListArgs),
    /// Show one user
    Show { id: i64 },
    /// Add a user
    Create(UserFields),
    /// Edit a user; omitted fields keep their value
    Update {
        id: i64,
        #[command(flatten)]
        fields: UserFields,
    },
    /// Archive (soft delete) a user
    Archive { id: i64 },
    /// Restore an archived user
    Restore { id: i64 },
    /// Delete a user permanently
    Delete { id: i64 },
    /// Export the list to a file
    Export(ExportArgs),
    /// Show summary figures
    Stats,
}

#[derive(Subcommand, Debug)]
pub enum ServiceAction {
    /// List services
    List(ListArgs),
    /// Show one service
    Show { id: i64 },
    /// Add a service
    Create(ServiceFields),
    /// Edit a service; omitted fields keep their value
    Update {
        id: i64,
        #[command(flatten)]
        fields: ServiceFields,
    },
    /// Archive (soft delete) a service
    Archive { id: i64 },
    /// Restore an archived service
    Restore { id: i64 },
    /// Delete a service permanently
    Delete { id: i64 },
    /// Export the list to a file
    Export(ExportArgs),
    /// Show summary figures
    Stats,
}

/// Resource-independent form of the two action enums.
pub enum CatalogOp<P> {
    List(ListArgs),
    Show(i64),
    Create(P),
    Update(i64, P),
    Archive(i64),
    Restore(i64),
    Delete(i64),
    Export(ExportArgs),
    Stats,
}

impl From<UserAction> for CatalogOp<UserFields> {
    fn from(action: UserAction) -> Self {
        match action {
            UserAction::List(args) => CatalogOp::List(args),
            UserAction::Show { id } => CatalogOp::Show(id),
            UserAction::Create(fields) => CatalogOp::Create(fields),
            UserAction::Update { id, fields } => CatalogOp::Update(id, fields),
            UserAction::Archive { id } => CatalogOp::Archive(id),
            UserAction::Restore { id } => CatalogOp::Restore(id),
            UserAction::Delete { id } => CatalogOp::Delete(id),
            UserAction::Export(args) => CatalogOp::Export(args),
            UserAction::Stats => CatalogOp::Stats,
        }
    }
}

impl From<ServiceAction> for CatalogOp<ServiceFields> {
    fn from(action: ServiceAction) -> Self {
        match action {
            ServiceAction::List(args) => CatalogOp::List(args),
            ServiceAction::Show { id } => CatalogOp::Show(id),
            ServiceAction::Create(fields) => CatalogOp::Create(fields),
            ServiceAction::Update { id, fields } => CatalogOp::Update(id, fields),
            ServiceAction::Archive { id } => CatalogOp::Archive(id),
            ServiceAction::Restore { id } => CatalogOp::Restore(id),
            ServiceAction::Delete { id } => CatalogOp::Delete(id),
            ServiceAction::Export(args) => CatalogOp::Export(args),
            ServiceAction::Stats => CatalogOp::Stats,
        }
    }
}

/// Fetches with the given filter and applies search and sort to the table.
async fn load<E: CatalogEntity>(controller: &CrudController<E>, args: &ListArgs) -> Result<()> {
    controller.set_status_filter(args.status).await;
    controller.fetch().await?;

    let search = args.search.clone().unwrap_or_default();
    let sort = args.sort.clone();
    let direction = if args.desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    controller
        .with_table(|table| {
            table.set_search(search);
            match sort {
                Some(column) => table.sort_by(&column, direction),
                None => {
                    table.clear_sort();
                    Ok(())
                }
            }
        })
        .await?;
    Ok(())
}

pub fn print_outcome(outcome: Outcome, done: String) {
    match outcome {
        Outcome::Done => println!("{}", done.bright_green()),
        Outcome::Declined => println!("{}", "Cancelled.".bright_black()),
    }
}

pub async fn print_visible<E: CatalogEntity>(controller: &CrudController<E>) {
    let table = controller.table().await;
    render::print_rows(&table.visible(), |id| table.is_selected(id));
}

pub async fn run<E, P>(ctx: &AppContext, controller: &CrudController<E>, op: CatalogOp<P>) -> Result<()>
where
    E: CatalogEntity,
    P: FormPatch<E::Form>,
{
    match op {
        CatalogOp::List(args) => {
            load(controller, &args).await?;
            print_visible(controller).await;
        }
        CatalogOp::Show(id) => {
            render::print_record(&controller.load_one(id).await?);
        }
        CatalogOp::Create(fields) => {
            let mut form = controller.open_create().await;
            fields.apply(&mut form);
            if let Some(field) = P::missing(&form) {
                bail!("--{} is required", field);
            }
            let created = controller.save(form).await?;
            println!(
                "{}",
                format!("Created {} #{}", E::LABEL, created.id()).bright_green()
            );
        }
        CatalogOp::Update(id, fields) => {
            controller.fetch().await?;
            let mut form = controller.open_edit(id).await?;
            fields.apply(&mut form);
            if let Some(field) = P::missing(&form) {
                bail!("{} must not be empty", field);
            }
            controller.save(form).await?;
            println!("{}", format!("Updated {} #{}", E::LABEL, id).bright_green());
        }
        CatalogOp::Archive(id) => {
            let outcome = controller.archive(id).await?;
            print_outcome(outcome, format!("Archived {} #{}", E::LABEL, id));
        }
        CatalogOp::Restore(id) => {
            controller.restore(id).await?;
            println!("{}", format!("Restored {} #{}", E::LABEL, id).bright_green());
        }
        CatalogOp::Delete(id) => {
            let outcome = controller.delete_permanently(id).await?;
            print_outcome(outcome, format!("Deleted {} #{}", E::LABEL, id));
        }
        CatalogOp::Export(args) => {
            load(controller, &args.list).await?;
            let artifact = controller
                .export(args.format, chrono::Local::now().date_naive())
                .await?;
            let path = write_artifact(&ctx.export_dir(args.output), &artifact)?;
            println!("{}", format!("Exported to {}", path.display()).bright_green());
        }
        CatalogOp::Stats => {
            controller.fetch().await?;
            println!("{}", controller.stats().await);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_patch_keeps_unset_fields() {
        let mut form = UserForm {
            name: "Budi".into(),
            email: "budi@example.com".into(),
            role: Role::Employee,
        };
        UserFields {
            email: Some("budi@laundry.com".into()),
            ..UserFields::default()
        }
        .apply(&mut form);

        assert_eq!(form.name, "Budi");
        assert_eq!(form.email, "budi@laundry.com");
        assert_eq!(form.role, Role::Employee);
    }

    #[test]
    fn test_service_required_fields() {
        let mut form = ServiceForm::default();
        assert_eq!(ServiceFields::missing(&form), Some("name"));
        ServiceFields {
            name: Some("Cuci Kering".into()),
            ..ServiceFields::default()
        }
        .apply(&mut form);
        assert_eq!(ServiceFields::missing(&form), None);
        assert_eq!(form.unit, "kg");
    }

    #[test]
    fn test_user_required_fields() {
        let form = UserForm {
            name: "Dewi".into(),
            ..UserForm::default()
        };
        assert_eq!(UserFields::missing(&form), Some("email"));
    }
}
