//! Controller behind the Users and Services screens.
//!
//! Holds the loaded rows, the edit dialog and the load phase of one catalog
//! resource. Every mutation is followed by a full refetch; the cache is
//! never patched locally.
//!
//! # Stale responses
//!
//! Each `fetch` takes a generation number. A fetch that completes after a
//! newer one has already been applied is discarded with
//! [`AdminError::Cancelled`], so a slow early response can never overwrite
//! fresher rows.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use laundry_core::catalog::{CatalogApi, CatalogEntity, DataTable, ListQuery, StatusFilter};
use laundry_core::error::{AdminError, Result};
use laundry_core::export::{ExportArtifact, ExportFormat, ExportTable, export_file_name};
use laundry_infrastructure::export::serializer_for;
use tokio::sync::RwLock;

use crate::confirm::ConfirmPrompt;

/// Question asked before a permanent delete.
pub const DELETE_PERMANENTLY_PROMPT: &str = "This action is permanent. Are you sure?";

/// Default page size requested while following pagination.
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Question asked before archiving a record of kind `label`.
pub fn archive_prompt(label: &str) -> String {
    format!("Are you sure you want to archive this {}?", label)
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// State of the add/edit dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum Dialog<F> {
    Closed,
    Create(F),
    Edit { id: i64, form: F },
}

impl<F> Dialog<F> {
    pub fn is_open(&self) -> bool {
        !matches!(self, Dialog::Closed)
    }

    /// Id of the record being edited, if any.
    pub fn editing(&self) -> Option<i64> {
        match self {
            Dialog::Edit { id, .. } => Some(*id),
            _ => None,
        }
    }
}

/// Result of an action that may ask for confirmation first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The operator said no; nothing was sent.
    Declined,
}

struct ScreenState<E: CatalogEntity> {
    phase: LoadPhase,
    table: DataTable<E>,
    dialog: Dialog<E::Form>,
    status: StatusFilter,
    applied_generation: u64,
}

pub struct CrudController<E: CatalogEntity> {
    api: Arc<dyn CatalogApi<E>>,
    confirm: Arc<dyn ConfirmPrompt>,
    page_limit: u32,
    generation: AtomicU64,
    state: RwLock<ScreenState<E>>,
}

impl<E: CatalogEntity> CrudController<E> {
    pub fn new(api: Arc<dyn CatalogApi<E>>, confirm: Arc<dyn ConfirmPrompt>) -> Self {
        Self {
            api,
            confirm,
            page_limit: DEFAULT_PAGE_LIMIT,
            generation: AtomicU64::new(0),
            state: RwLock::new(ScreenState {
                phase: LoadPhase::Idle,
                table: DataTable::new(),
                dialog: Dialog::Closed,
                status: StatusFilter::All,
                applied_generation: 0,
            }),
        }
    }

    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.page_limit = limit.max(1);
        self
    }

    pub async fn phase(&self) -> LoadPhase {
        self.state.read().await.phase.clone()
    }

    pub async fn dialog(&self) -> Dialog<E::Form> {
        self.state.read().await.dialog.clone()
    }

    pub async fn status_filter(&self) -> StatusFilter {
        self.state.read().await.status
    }

    /// Changes the server-side filter used by the next fetch.
    pub async fn set_status_filter(&self, status: StatusFilter) {
        self.state.write().await.status = status;
    }

    /// Snapshot of the table.
    pub async fn table(&self) -> DataTable<E> {
        self.state.read().await.table.clone()
    }

    /// Runs `f` against the live table (search, sort, selection).
    pub async fn with_table<R>(&self, f: impl FnOnce(&mut DataTable<E>) -> R) -> R {
        f(&mut self.state.write().await.table)
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Reloads every page of the resource and replaces the cached rows.
    ///
    /// Returns the number of rows loaded.
    pub async fn fetch(&self) -> Result<usize> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let status = {
            let mut state = self.state.write().await;
            state.phase = LoadPhase::Loading;
            state.status
        };

        let loaded = self.load_all_pages(status, generation).await;

        let mut state = self.state.write().await;
        if generation < state.applied_generation {
            tracing::debug!(
                "[{}] Discarding stale fetch #{} (applied #{})",
                E::RESOURCE,
                generation,
                state.applied_generation
            );
            return Err(AdminError::Cancelled(format!(
                "{} fetch #{} superseded",
                E::RESOURCE,
                generation
            )));
        }
        state.applied_generation = generation;

        match loaded {
            Ok(rows) => {
                let count = rows.len();
                state.table.set_rows(rows);
                state.phase = LoadPhase::Loaded;
                tracing::info!("[{}] Loaded {} rows", E::RESOURCE, count);
                Ok(count)
            }
            Err(e) => {
                tracing::error!("[{}] Failed to load: {}", E::RESOURCE, e);
                state.phase = LoadPhase::Failed(e.user_message());
                Err(e)
            }
        }
    }

    async fn load_all_pages(&self, status: StatusFilter, generation: u64) -> Result<Vec<E>> {
        let mut rows = Vec::new();
        let mut page = 1;
        loop {
            let query = ListQuery::new(status)
                .with_page(page)
                .with_limit(self.page_limit);
            let result = self.api.list(&query).await?;
            let empty = result.items.is_empty();
            rows.extend(result.items);

            if empty || page >= result.meta.last_page {
                return Ok(rows);
            }
            if self.state.read().await.applied_generation > generation {
                return Err(AdminError::Cancelled(format!(
                    "{} fetch #{} superseded",
                    E::RESOURCE,
                    generation
                )));
            }
            page += 1;
        }
    }

    /// Refetch after a mutation. A failed or superseded refetch does not
    /// undo the mutation, so it is only logged.
    async fn refresh(&self) {
        match self.fetch().await {
            Err(e) if !e.is_cancelled() => {
                tracing::warn!("[{}] Refetch after change failed: {}", E::RESOURCE, e);
            }
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Dialog
    // ------------------------------------------------------------------

    /// Opens an empty add dialog.
    pub async fn open_create(&self) -> E::Form {
        let form = E::Form::default();
        self.state.write().await.dialog = Dialog::Create(form.clone());
        form
    }

    /// Opens the edit dialog prefilled from the cached record.
    pub async fn open_edit(&self, id: i64) -> Result<E::Form> {
        let mut state = self.state.write().await;
        let form = state
            .table
            .find(id)
            .map(|record| record.to_form())
            .ok_or_else(|| AdminError::not_found(E::LABEL, id.to_string()))?;
        state.dialog = Dialog::Edit {
            id,
            form: form.clone(),
        };
        Ok(form)
    }

    pub async fn close_dialog(&self) {
        self.state.write().await.dialog = Dialog::Closed;
    }

    /// Submits the dialog: update when editing a record, create otherwise.
    ///
    /// On failure the dialog stays open and the cached rows are untouched.
    pub async fn save(&self, form: E::Form) -> Result<E> {
        let editing = self.state.read().await.dialog.editing();

        let result = match editing {
            Some(id) => self.api.update(id, &form).await,
            None => self.api.create(&form).await,
        };

        match result {
            Ok(saved) => {
                self.state.write().await.dialog = Dialog::Closed;
                self.refresh().await;
                Ok(saved)
            }
            Err(e) => {
                tracing::error!("[{}] Failed to save {}: {}", E::RESOURCE, E::LABEL, e);
                let mut state = self.state.write().await;
                state.dialog = match editing {
                    Some(id) => Dialog::Edit { id, form },
                    None => Dialog::Create(form),
                };
                Err(e)
            }
        }
    }

    // ------------------------------------------------------------------
    // Row actions
    // ------------------------------------------------------------------

    /// Soft-deletes a record after confirmation.
    pub async fn archive(&self, id: i64) -> Result<Outcome> {
        if !self.confirm.confirm(&archive_prompt(E::LABEL)) {
            return Ok(Outcome::Declined);
        }
        self.api.archive(id).await.inspect_err(|e| {
            tracing::error!("[{}] Failed to archive {}: {}", E::RESOURCE, id, e);
        })?;
        self.refresh().await;
        Ok(Outcome::Done)
    }

    /// Brings an archived record back. Asks nothing.
    pub async fn restore(&self, id: i64) -> Result<()> {
        self.api.restore(id).await.inspect_err(|e| {
            tracing::error!("[{}] Failed to restore {}: {}", E::RESOURCE, id, e);
        })?;
        self.refresh().await;
        Ok(())
    }

    /// Deletes a record for good after confirmation.
    pub async fn delete_permanently(&self, id: i64) -> Result<Outcome> {
        if !self.confirm.confirm(DELETE_PERMANENTLY_PROMPT) {
            return Ok(Outcome::Declined);
        }
        self.api.delete_permanently(id).await.inspect_err(|e| {
            tracing::error!("[{}] Failed to delete {}: {}", E::RESOURCE, id, e);
        })?;
        self.refresh().await;
        Ok(Outcome::Done)
    }

    /// Read-only detail of a cached record.
    pub async fn view(&self, id: i64) -> Result<E> {
        self.state
            .read()
            .await
            .table
            .find(id)
            .cloned()
            .ok_or_else(|| AdminError::not_found(E::LABEL, id.to_string()))
    }

    /// Fetches one record straight from the API. The cached rows are left
    /// as they are.
    pub async fn load_one(&self, id: i64) -> Result<E> {
        self.api.get(id).await.inspect_err(|e| {
            tracing::error!("[{}] Failed to load {}: {}", E::RESOURCE, id, e);
        })
    }

    // ------------------------------------------------------------------
    // Export and summary
    // ------------------------------------------------------------------

    /// Serializes the currently visible rows. No network access.
    pub async fn export(&self, format: ExportFormat, date: NaiveDate) -> Result<ExportArtifact> {
        let table = {
            let state = self.state.read().await;
            ExportTable::from_records(state.table.visible())
        };
        let bytes = serializer_for(format).serialize(&table)?;
        tracing::info!(
            "[{}] Exported {} rows as {}",
            E::RESOURCE,
            table.rows.len(),
            format
        );
        Ok(ExportArtifact {
            file_name: export_file_name(E::RESOURCE, date, format),
            format,
            bytes,
        })
    }

    /// Summary over every loaded row.
    pub async fn stats(&self) -> E::Stats {
        E::stats(self.state.read().await.table.rows())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockCatalogApi, ScriptedConfirm, ScriptedPage, user};
    use laundry_core::catalog::{Role, Service, ServiceForm, SoftDelete, User, UserForm};

    fn controller<E: crate::test_support::FromForm>(
        api: Arc<MockCatalogApi<E>>,
        confirm: Arc<ScriptedConfirm>,
    ) -> CrudController<E> {
        CrudController::new(api, confirm)
    }

    fn users() -> Vec<User> {
        vec![
            user(1, "Budi", Role::Admin),
            user(2, "Andi", Role::Customer),
            user(3, "Citra", Role::Employee),
        ]
    }

    #[tokio::test]
    async fn test_fetch_requests_all_statuses_and_replaces_rows() {
        let api = Arc::new(MockCatalogApi::new(vec![ScriptedPage::ok(users(), 1, 1)]));
        let crud = controller(api.clone(), Arc::new(ScriptedConfirm::answering(true)));

        assert_eq!(crud.phase().await, LoadPhase::Idle);
        assert_eq!(crud.fetch().await.unwrap(), 3);
        assert_eq!(crud.phase().await, LoadPhase::Loaded);

        let queries = api.queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].status, StatusFilter::All);
        assert_eq!(queries[0].page, Some(1));
    }

    #[tokio::test]
    async fn test_fetch_follows_pages() {
        let api = Arc::new(MockCatalogApi::new(vec![
            ScriptedPage::ok(vec![user(1, "A", Role::Admin)], 1, 3),
            ScriptedPage::ok(vec![user(2, "B", Role::Customer)], 2, 3),
            ScriptedPage::ok(vec![user(3, "C", Role::Customer)], 3, 3),
        ]));
        let crud = controller(api.clone(), Arc::new(ScriptedConfirm::answering(true)));

        assert_eq!(crud.fetch().await.unwrap(), 3);
        let pages: Vec<Option<u32>> = api.queries().iter().map(|q| q.page).collect();
        assert_eq!(pages, vec![Some(1), Some(2), Some(3)]);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_previous_rows() {
        let api = Arc::new(MockCatalogApi::new(vec![
            ScriptedPage::ok(users(), 1, 1),
            ScriptedPage::err(AdminError::api(500, "Database down")),
        ]));
        let crud = controller(api, Arc::new(ScriptedConfirm::answering(true)));

        crud.fetch().await.unwrap();
        assert!(crud.fetch().await.is_err());
        assert_eq!(crud.phase().await, LoadPhase::Failed("Database down".into()));
        assert_eq!(crud.table().await.rows().len(), 3);
    }

    #[tokio::test]
    async fn test_stale_fetch_is_discarded() {
        let api = Arc::new(MockCatalogApi::new(vec![
            ScriptedPage::ok(vec![user(1, "Old", Role::Admin)], 1, 1).delayed(50),
            ScriptedPage::ok(vec![user(2, "New", Role::Admin)], 1, 1),
        ]));
        let crud = controller(api, Arc::new(ScriptedConfirm::answering(true)));

        let (slow, fast) = tokio::join!(crud.fetch(), crud.fetch());
        assert!(slow.unwrap_err().is_cancelled());
        assert_eq!(fast.unwrap(), 1);

        let table = crud.table().await;
        assert_eq!(table.rows()[0].name, "New");
        assert_eq!(crud.phase().await, LoadPhase::Loaded);
    }

    #[tokio::test]
    async fn test_create_and_edit_flow() {
        let api = Arc::new(MockCatalogApi::new(vec![ScriptedPage::ok(users(), 1, 1)]));
        let crud = controller(api.clone(), Arc::new(ScriptedConfirm::answering(true)));
        crud.fetch().await.unwrap();

        let form = crud.open_create().await;
        assert_eq!(form, UserForm::default());
        assert_eq!(form.role, Role::Customer);

        api.push_page(ScriptedPage::ok(users(), 1, 1));
        crud.save(UserForm {
            name: "Dewi".into(),
            email: "dewi@example.com".into(),
            role: Role::Customer,
        })
        .await
        .unwrap();
        assert_eq!(crud.dialog().await, Dialog::Closed);

        let form = crud.open_edit(2).await.unwrap();
        assert_eq!(form.name, "Andi");
        api.push_page(ScriptedPage::ok(users(), 1, 1));
        crud.save(form).await.unwrap();

        assert_eq!(api.calls(), vec!["create".to_string(), "update 2".to_string()]);
        // initial fetch plus one refetch per save
        assert_eq!(api.queries().len(), 3);
    }

    #[tokio::test]
    async fn test_open_edit_unknown_id() {
        let crud = controller::<User>(
            Arc::new(MockCatalogApi::new(vec![])),
            Arc::new(ScriptedConfirm::answering(true)),
        );
        assert!(crud.open_edit(9).await.unwrap_err().is_not_found());
        assert!(!crud.dialog().await.is_open());
    }

    #[tokio::test]
    async fn test_failed_save_keeps_dialog_open() {
        let api = Arc::new(
            MockCatalogApi::new(vec![ScriptedPage::ok(users(), 1, 1)])
                .failing_writes(AdminError::api(422, "Email already used")),
        );
        let crud = controller(api.clone(), Arc::new(ScriptedConfirm::answering(true)));
        crud.fetch().await.unwrap();
        crud.open_edit(1).await.unwrap();

        let mut form = crud.open_edit(1).await.unwrap();
        form.email = "andi@example.com".into();
        let err = crud.save(form.clone()).await.unwrap_err();

        assert_eq!(err.user_message(), "Email already used");
        assert_eq!(crud.dialog().await, Dialog::Edit { id: 1, form });
        assert_eq!(crud.table().await.rows().len(), 3);
        assert_eq!(api.queries().len(), 1);
    }

    #[tokio::test]
    async fn test_archive_asks_with_label() {
        let api = Arc::new(MockCatalogApi::<Service>::new(vec![]));
        let confirm = Arc::new(ScriptedConfirm::answering(true));
        let crud = controller(api.clone(), confirm.clone());

        assert_eq!(crud.archive(4).await.unwrap(), Outcome::Done);
        assert_eq!(
            confirm.asked(),
            vec!["Are you sure you want to archive this service?".to_string()]
        );
        assert_eq!(api.calls(), vec!["archive 4".to_string()]);
        assert_eq!(api.queries().len(), 1);
    }

    #[tokio::test]
    async fn test_declined_actions_send_nothing() {
        let api = Arc::new(MockCatalogApi::<User>::new(vec![]));
        let confirm = Arc::new(ScriptedConfirm::answering(false));
        let crud = controller(api.clone(), confirm.clone());

        assert_eq!(crud.archive(1).await.unwrap(), Outcome::Declined);
        assert_eq!(crud.delete_permanently(1).await.unwrap(), Outcome::Declined);
        assert_eq!(confirm.asked()[1], DELETE_PERMANENTLY_PROMPT);
        assert!(api.calls().is_empty());
        assert!(api.queries().is_empty());
    }

    #[tokio::test]
    async fn test_restore_does_not_confirm() {
        let api = Arc::new(MockCatalogApi::<User>::new(vec![]));
        let confirm = Arc::new(ScriptedConfirm::answering(false));
        let crud = controller(api.clone(), confirm.clone());

        crud.restore(5).await.unwrap();
        assert!(confirm.asked().is_empty());
        assert_eq!(api.calls(), vec!["restore 5".to_string()]);
    }

    #[tokio::test]
    async fn test_view_reads_cache() {
        let api = Arc::new(MockCatalogApi::new(vec![ScriptedPage::ok(users(), 1, 1)]));
        let crud = controller(api, Arc::new(ScriptedConfirm::answering(true)));
        crud.fetch().await.unwrap();

        assert_eq!(crud.view(3).await.unwrap().name, "Citra");
        assert!(crud.view(30).await.is_err());
    }

    #[tokio::test]
    async fn test_load_one_asks_the_api() {
        let api = Arc::new(MockCatalogApi::new(vec![]).with_record(user(8, "Dewi", Role::Customer)));
        let crud = controller(api.clone(), Arc::new(ScriptedConfirm::answering(true)));

        assert_eq!(crud.load_one(8).await.unwrap().name, "Dewi");
        assert!(crud.load_one(9).await.unwrap_err().is_not_found());
        assert_eq!(api.calls(), vec!["get 8".to_string(), "get 9".to_string()]);
        assert!(api.queries().is_empty());
        assert_eq!(crud.phase().await, LoadPhase::Idle);
    }

    #[tokio::test]
    async fn test_export_uses_visible_rows() {
        let api = Arc::new(MockCatalogApi::new(vec![ScriptedPage::ok(users(), 1, 1)]));
        let crud = controller(api, Arc::new(ScriptedConfirm::answering(true)));
        crud.fetch().await.unwrap();
        crud.with_table(|table| table.set_search("citra")).await;

        let date = NaiveDate::from_ymd_opt(2024, 7, 3).unwrap();
        let artifact = crud.export(ExportFormat::Csv, date).await.unwrap();

        assert_eq!(artifact.file_name, "users_export_20240703.csv");
        let text = String::from_utf8(artifact.bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ID,Name,Email,Role,Status,Created");
        assert_eq!(
            lines[1],
            "3,Citra,citra@example.com,employee,Active,2024-03-01 10:00"
        );
        assert_eq!(lines.len(), 2);
    }

    #[tokio::test]
    async fn test_service_stats() {
        let mut archived = ServiceForm {
            name: "Express".into(),
            price: 9000.0,
            ..ServiceForm::default()
        };
        archived.description = "Same day".into();
        let mut gone = <Service as crate::test_support::FromForm>::from_form(2, &archived);
        gone.deleted_at = SoftDelete::ArchivedAt("2024-04-04".into());
        let live = <Service as crate::test_support::FromForm>::from_form(
            1,
            &ServiceForm {
                price: 5000.0,
                ..ServiceForm::default()
            },
        );

        let api = Arc::new(MockCatalogApi::new(vec![ScriptedPage::ok(
            vec![live, gone],
            1,
            1,
        )]));
        let crud = controller(api, Arc::new(ScriptedConfirm::answering(true)));
        crud.fetch().await.unwrap();

        let stats = crud.stats().await;
        assert_eq!(stats.total, 2);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.archived, 1);
        assert_eq!(stats.average_price, 7000.0);
    }
}
