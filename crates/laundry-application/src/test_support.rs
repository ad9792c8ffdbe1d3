//! In-memory doubles for the repository and API traits.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use laundry_core::auth::{AuthApi, Credentials};
use laundry_core::catalog::{
    CatalogApi, ListQuery, Page, PageMeta, Role, Service, ServiceForm, SoftDelete, User, UserForm,
};
use laundry_core::error::{AdminError, Result};
use laundry_core::session::{Session, SessionRepository};

use crate::confirm::ConfirmPrompt;

#[derive(Default)]
pub struct MemorySessionRepository {
    session: Mutex<Session>,
    saves: AtomicUsize,
    clears: AtomicUsize,
}

impl MemorySessionRepository {
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(session),
            ..Self::default()
        }
    }

    pub fn stored(&self) -> Session {
        self.session.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn load(&self) -> Result<Session> {
        Ok(self.stored())
    }

    async fn save(&self, session: Session) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.session.lock().unwrap() = session;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        *self.session.lock().unwrap() = Session::default();
        Ok(())
    }
}

pub struct MockAuthApi {
    answer: std::result::Result<String, String>,
    attached: Mutex<Option<String>>,
}

impl MockAuthApi {
    pub fn accepting(token: &str) -> Self {
        Self {
            answer: Ok(token.to_string()),
            attached: Mutex::new(None),
        }
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            answer: Err(message.to_string()),
            attached: Mutex::new(None),
        }
    }

    pub fn attached(&self) -> Option<String> {
        self.attached.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn login(&self, _credentials: &Credentials) -> Result<String> {
        self.answer.clone().map_err(AdminError::Unauthorized)
    }

    fn attach_token(&self, token: Option<String>) {
        *self.attached.lock().unwrap() = token;
    }
}

/// Answers every confirmation with a fixed value and records the questions.
pub struct ScriptedConfirm {
    answer: bool,
    asked: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

impl ConfirmPrompt for ScriptedConfirm {
    fn confirm(&self, message: &str) -> bool {
        self.asked.lock().unwrap().push(message.to_string());
        self.answer
    }
}

/// A scripted list answer: optional delay, then a page or an error.
pub struct ScriptedPage<E> {
    pub delay: Option<Duration>,
    pub result: Result<Page<E>>,
}

impl<E> ScriptedPage<E> {
    pub fn ok(items: Vec<E>, page: u32, last_page: u32) -> Self {
        let total = items.len() as u64;
        Self {
            delay: None,
            result: Ok(Page {
                items,
                meta: PageMeta {
                    total,
                    page,
                    limit: 10,
                    last_page,
                },
            }),
        }
    }

    pub fn err(err: AdminError) -> Self {
        Self {
            delay: None,
            result: Err(err),
        }
    }

    pub fn delayed(mut self, millis: u64) -> Self {
        self.delay = Some(Duration::from_millis(millis));
        self
    }
}

/// Catalog API double. List answers are consumed in order; `get` reads
/// from `records`; other calls are recorded as `"<op> <id>"`.
pub struct MockCatalogApi<E> {
    pages: Mutex<VecDeque<ScriptedPage<E>>>,
    records: Vec<E>,
    queries: Mutex<Vec<ListQuery>>,
    calls: Mutex<Vec<String>>,
    fail_writes: Option<AdminError>,
}

impl<E> MockCatalogApi<E> {
    pub fn new(pages: Vec<ScriptedPage<E>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            records: Vec::new(),
            queries: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            fail_writes: None,
        }
    }

    pub fn with_record(mut self, record: E) -> Self {
        self.records.push(record);
        self
    }

    pub fn failing_writes(mut self, err: AdminError) -> Self {
        self.fail_writes = Some(err);
        self
    }

    pub fn push_page(&self, page: ScriptedPage<E>) {
        self.pages.lock().unwrap().push_back(page);
    }

    pub fn queries(&self) -> Vec<ListQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match &self.fail_writes {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// Builds records from forms the way the server would.
pub trait FromForm: laundry_core::catalog::CatalogEntity {
    fn from_form(id: i64, form: &Self::Form) -> Self;
}

impl FromForm for User {
    fn from_form(id: i64, form: &UserForm) -> Self {
        User {
            id,
            name: form.name.clone(),
            email: form.email.clone(),
            role: form.role,
            created_at: "2024-01-01T00:00:00Z".into(),
            updated_at: "2024-01-01T00:00:00Z".into(),
            deleted_at: SoftDelete::Active,
        }
    }
}

impl FromForm for Service {
    fn from_form(id: i64, form: &ServiceForm) -> Self {
        Service {
            id,
            name: form.name.clone(),
            description: form.description.clone(),
            unit: form.unit.clone(),
            price: form.price,
            created_at: String::new(),
            updated_at: String::new(),
            deleted_at: SoftDelete::Active,
        }
    }
}

#[async_trait]
impl<E: FromForm> CatalogApi<E> for MockCatalogApi<E> {
    async fn list(&self, query: &ListQuery) -> Result<Page<E>> {
        self.queries.lock().unwrap().push(query.clone());
        let scripted = self.pages.lock().unwrap().pop_front();
        let Some(scripted) = scripted else {
            return Ok(Page {
                items: Vec::new(),
                meta: PageMeta::default(),
            });
        };
        if let Some(delay) = scripted.delay {
            tokio::time::sleep(delay).await;
        }
        scripted.result
    }

    async fn get(&self, id: i64) -> Result<E> {
        self.calls.lock().unwrap().push(format!("get {}", id));
        self.records
            .iter()
            .find(|record| record.id() == id)
            .cloned()
            .ok_or_else(|| AdminError::not_found(E::LABEL, id.to_string()))
    }

    async fn create(&self, form: &E::Form) -> Result<E> {
        self.record("create".to_string())?;
        Ok(E::from_form(100, form))
    }

    async fn update(&self, id: i64, form: &E::Form) -> Result<E> {
        self.record(format!("update {}", id))?;
        Ok(E::from_form(id, form))
    }

    async fn archive(&self, id: i64) -> Result<()> {
        self.record(format!("archive {}", id))
    }

    async fn restore(&self, id: i64) -> Result<()> {
        self.record(format!("restore {}", id))
    }

    async fn delete_permanently(&self, id: i64) -> Result<()> {
        self.record(format!("delete {}", id))
    }
}

pub fn user(id: i64, name: &str, role: Role) -> User {
    User {
        id,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        role,
        created_at: "2024-03-01 10:00:00".into(),
        updated_at: "2024-03-01T10:00:00Z".into(),
        deleted_at: SoftDelete::Active,
    }
}
