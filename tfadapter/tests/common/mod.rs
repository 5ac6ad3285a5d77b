//! Scriptable in-memory adapter shared by the integration tests

#![allow(dead_code)]
#![allow(clippy::disallowed_methods)]

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tfadapter::{
    ConversionError, CreateMode, DeclarativeModel, EntityAdapter, EntityIdentity, IdentityKind,
    RemoteError, SecretField,
};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Widget {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub parent_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub token: SecretField<String>,
}

impl Widget {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = SecretField::new(token.to_string());
        self
    }
}

impl DeclarativeModel for Widget {
    fn merge_secrets(&mut self, prior: &Self) {
        self.token.overlay(&prior.token);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WidgetObject {
    pub id: String,
    pub parent_id: String,
    pub name: String,
    pub token: Option<String>,
}

impl WidgetObject {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct CallRecord {
    pub op: &'static str,
    pub started: Instant,
    pub finished: Instant,
}

/// Adapter whose remote calls are recorded, optionally slowed down and
/// optionally failed per operation
pub struct MockAdapter {
    delay: Duration,
    identity_kind: IdentityKind,
    create_mode: CreateMode,
    updatable: bool,
    assigned_id: String,
    failures: Mutex<HashMap<&'static str, RemoteError>>,
    read_response: Mutex<Option<WidgetObject>>,
    echo_name: Mutex<Option<String>>,
    calls: Mutex<Vec<CallRecord>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl Default for MockAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAdapter {
    pub fn new() -> Self {
        Self {
            delay: Duration::ZERO,
            identity_kind: IdentityKind::Bare,
            create_mode: CreateMode::Create,
            updatable: true,
            assigned_id: "1".to_string(),
            failures: Mutex::new(HashMap::new()),
            read_response: Mutex::new(None),
            echo_name: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, millis: u64) -> Self {
        self.delay = Duration::from_millis(millis);
        self
    }

    pub fn composite(mut self) -> Self {
        self.identity_kind = IdentityKind::Composite;
        self
    }

    pub fn created_by_update(mut self) -> Self {
        self.create_mode = CreateMode::Update;
        self
    }

    pub fn without_update(mut self) -> Self {
        self.updatable = false;
        self
    }

    pub fn fail(&self, op: &'static str, error: RemoteError) {
        self.failures.lock().unwrap().insert(op, error);
    }

    /// Object returned by the next reads instead of an echo of the identity
    pub fn respond_to_read(&self, object: WidgetObject) {
        *self.read_response.lock().unwrap() = Some(object);
    }

    /// Name put into every mutation response, e.g. "" for an unusable body
    pub fn echo_name(&self, name: &str) {
        *self.echo_name.lock().unwrap() = Some(name.to_string());
    }

    pub fn calls(&self) -> Vec<CallRecord> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.op == op).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn track(&self, op: &'static str) -> Result<(), RemoteError> {
        let started = Instant::now();
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(CallRecord {
            op,
            started,
            finished: Instant::now(),
        });

        match self.failures.lock().unwrap().get(op) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn respond(&self, mut obj: WidgetObject) -> WidgetObject {
        if obj.id.is_empty() {
            obj.id = self.assigned_id.clone();
        }
        if let Some(name) = self.echo_name.lock().unwrap().clone() {
            obj.name = name;
        }
        // the API never echoes the token
        obj.token = None;
        obj
    }
}

#[async_trait]
impl EntityAdapter for MockAdapter {
    type Model = Widget;
    type Wire = WidgetObject;

    fn type_name(&self) -> &'static str {
        "test_widget"
    }

    fn identity_kind(&self) -> IdentityKind {
        self.identity_kind
    }

    fn create_mode(&self) -> CreateMode {
        self.create_mode
    }

    fn supports_update(&self) -> bool {
        self.updatable
    }

    async fn create(&self, obj: WidgetObject) -> Result<WidgetObject, RemoteError> {
        self.track("create").await?;
        Ok(self.respond(obj))
    }

    async fn read(&self, identity: &EntityIdentity) -> Result<WidgetObject, RemoteError> {
        self.track("read").await?;
        if let Some(object) = self.read_response.lock().unwrap().clone() {
            return Ok(object);
        }
        Ok(WidgetObject {
            id: identity.entity_id().to_string(),
            parent_id: identity.parent_id().unwrap_or_default().to_string(),
            name: "remote".to_string(),
            token: None,
        })
    }

    async fn update(&self, obj: WidgetObject) -> Result<WidgetObject, RemoteError> {
        self.track("update").await?;
        Ok(self.respond(obj))
    }

    async fn delete(&self, _identity: &EntityIdentity) -> Result<(), RemoteError> {
        self.track("delete").await
    }

    fn get_id(&self, model: &Widget) -> EntityIdentity {
        match self.identity_kind {
            IdentityKind::Bare => EntityIdentity::id(&model.id),
            IdentityKind::Composite => EntityIdentity::scoped(&model.parent_id, &model.id),
        }
    }

    fn resource_to_obj(&self, model: &Widget) -> Result<WidgetObject, ConversionError> {
        if model.name.contains(char::is_whitespace) {
            return Err(ConversionError::attribute(
                "name",
                "must not contain whitespace",
            ));
        }
        Ok(WidgetObject {
            id: model.id.clone(),
            parent_id: model.parent_id.clone(),
            name: model.name.clone(),
            token: model.token.get().cloned(),
        })
    }

    fn obj_to_resource(&self, obj: WidgetObject) -> Result<Widget, ConversionError> {
        if obj.name.is_empty() {
            return Err(ConversionError::attribute("name", "missing from response"));
        }
        Ok(Widget {
            id: obj.id,
            parent_id: obj.parent_id,
            name: obj.name,
            token: obj.token.into(),
        })
    }

    fn model_from_identity(&self, identity: &EntityIdentity) -> Widget {
        Widget {
            id: identity.entity_id().to_string(),
            parent_id: identity.parent_id().unwrap_or_default().to_string(),
            ..Default::default()
        }
    }

    fn adopt_identity(&self, submitted: &Widget, obj: &WidgetObject) -> Widget {
        Widget {
            id: obj.id.clone(),
            parent_id: obj.parent_id.clone(),
            ..submitted.clone()
        }
    }
}

/// True when no two recorded calls overlap in time
pub fn pairwise_disjoint(calls: &[CallRecord]) -> bool {
    let mut sorted = calls.to_vec();
    sorted.sort_by_key(|c| c.started);
    sorted.windows(2).all(|w| w[0].finished <= w[1].started)
}
