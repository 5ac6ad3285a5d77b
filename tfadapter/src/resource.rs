//! Resource trait and the generic managed resource
//!
//! [`Resource`] is the engine-facing surface: requests and responses carry
//! untyped [`DynamicValue`]s and accumulate [`Diagnostics`]. [`ManagedResource`]
//! implements it for any [`EntityAdapter`] by decoding engine values into the
//! adapter's model and handing the work to the [`LifecycleCoordinator`].

use crate::adapter::EntityAdapter;
use crate::coordinator::{LifecycleCoordinator, ReadOutcome};
use crate::error::{LifecycleError, Phase};
use crate::schema::Schema;
use crate::types::{AttributePath, Diagnostic, Diagnostics, DynamicValue};
use async_trait::async_trait;

/// Base trait for resources - CRUD plus import and validation
#[async_trait]
pub trait Resource: Send + Sync {
    /// Type name, e.g. "cdn_service"
    /// MUST match the name the provider registers the resource under
    fn type_name(&self) -> &str;

    fn schema(&self) -> &Schema;

    /// Called during plan to validate configuration
    async fn validate(&self, request: ValidateResourceConfigRequest) -> ValidateResourceConfigResponse;

    /// Called during plan, after the engine's diff; reports the attributes
    /// whose change forces replacement
    async fn modify_plan(&self, request: ModifyPlanRequest) -> ModifyPlanResponse;

    /// MUST populate all attributes in response.new_state (including computed)
    async fn create(&self, request: CreateResourceRequest) -> CreateResourceResponse;

    /// MUST return accurate current state or None if the resource doesn't exist
    async fn read(&self, request: ReadResourceRequest) -> ReadResourceResponse;

    async fn update(&self, request: UpdateResourceRequest) -> UpdateResourceResponse;

    async fn delete(&self, request: DeleteResourceRequest) -> DeleteResourceResponse;

    /// Called during import; parse the ID and populate full resource state
    async fn import_state(&self, request: ImportResourceStateRequest) -> ImportResourceStateResponse;
}

pub struct ValidateResourceConfigRequest {
    pub type_name: String,
    pub config: DynamicValue,
}

pub struct ValidateResourceConfigResponse {
    pub diagnostics: Diagnostics,
}

pub struct ModifyPlanRequest {
    pub type_name: String,
    pub config: DynamicValue,
    pub prior_state: DynamicValue,
    pub proposed_new_state: DynamicValue,
}

pub struct ModifyPlanResponse {
    pub planned_state: DynamicValue,
    pub requires_replace: Vec<AttributePath>,
    pub diagnostics: Diagnostics,
}

pub struct CreateResourceRequest {
    pub type_name: String,
    pub planned_state: DynamicValue,
    pub config: DynamicValue,
}

pub struct CreateResourceResponse {
    pub new_state: DynamicValue,
    pub diagnostics: Diagnostics,
}

pub struct ReadResourceRequest {
    pub type_name: String,
    pub current_state: DynamicValue,
}

pub struct ReadResourceResponse {
    pub new_state: Option<DynamicValue>,
    pub diagnostics: Diagnostics,
}

pub struct UpdateResourceRequest {
    pub type_name: String,
    pub prior_state: DynamicValue,
    pub planned_state: DynamicValue,
    pub config: DynamicValue,
}

pub struct UpdateResourceResponse {
    pub new_state: DynamicValue,
    pub diagnostics: Diagnostics,
}

pub struct DeleteResourceRequest {
    pub type_name: String,
    pub prior_state: DynamicValue,
}

pub struct DeleteResourceResponse {
    pub diagnostics: Diagnostics,
}

pub struct ImportResourceStateRequest {
    pub type_name: String,
    pub id: String,
}

pub struct ImportResourceStateResponse {
    pub imported_resources: Vec<ImportedResource>,
    pub diagnostics: Diagnostics,
}

pub struct ImportedResource {
    pub type_name: String,
    pub state: DynamicValue,
}

/// A [`Resource`] backed by an [`EntityAdapter`]
pub struct ManagedResource<A: EntityAdapter> {
    adapter: A,
    coordinator: LifecycleCoordinator,
    schema: Schema,
}

impl<A: EntityAdapter> ManagedResource<A> {
    pub fn new(adapter: A, coordinator: LifecycleCoordinator, schema: Schema) -> Self {
        Self {
            adapter,
            coordinator,
            schema,
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    fn decode(&self, value: &DynamicValue, what: &str, diagnostics: &mut Diagnostics) -> Option<A::Model> {
        match value.to_model::<A::Model>() {
            Ok(model) => Some(model),
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    format!("Invalid {} for {}", what, self.adapter.type_name()),
                    e.to_string(),
                ));
                None
            }
        }
    }

    fn encode(&self, model: &A::Model, diagnostics: &mut Diagnostics) -> Option<DynamicValue> {
        match DynamicValue::from_model(model) {
            Ok(value) => Some(value),
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    format!("Failed to encode {} state", self.adapter.type_name()),
                    e.to_string(),
                ));
                None
            }
        }
    }

    // State to record after a failed mutation. An unreconciled entity exists
    // remotely, so it stays in state (tainted) under the identity the remote
    // assigned; any other failure leaves nothing new to record.
    fn kept_state(
        &self,
        error: LifecycleError,
        submitted: &A::Model,
        diagnostics: &mut Diagnostics,
    ) -> Option<DynamicValue> {
        match error {
            LifecycleError::Unreconciled { state: Some(state), .. } => Some(state),
            LifecycleError::Unreconciled { state: None, .. } => self.encode(submitted, diagnostics),
            _ => None,
        }
    }

    fn report(&self, phase: Phase, error: &LifecycleError, diagnostics: &mut Diagnostics) {
        let mut diagnostic = Diagnostic::error(
            format!("Failed to {} {}", phase, self.adapter.type_name()),
            error.to_string(),
        );
        if let LifecycleError::Conversion { source, .. } | LifecycleError::Unreconciled { source, .. } = error {
            if let Some(attribute) = &source.attribute {
                diagnostic = diagnostic.with_attribute(AttributePath::new(attribute));
            }
        }
        diagnostics.push(diagnostic);
    }
}

#[async_trait]
impl<A: EntityAdapter> Resource for ManagedResource<A> {
    fn type_name(&self) -> &str {
        self.adapter.type_name()
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn validate(&self, request: ValidateResourceConfigRequest) -> ValidateResourceConfigResponse {
        ValidateResourceConfigResponse {
            diagnostics: self.schema.validate(&request.config),
        }
    }

    async fn modify_plan(&self, request: ModifyPlanRequest) -> ModifyPlanResponse {
        let requires_replace = self
            .schema
            .replacement_paths(&request.prior_state, &request.proposed_new_state);

        ModifyPlanResponse {
            planned_state: request.proposed_new_state,
            requires_replace,
            diagnostics: Diagnostics::new(),
        }
    }

    async fn create(&self, request: CreateResourceRequest) -> CreateResourceResponse {
        let mut diagnostics = Diagnostics::new();

        // A decode failure is recorded upstream of the coordinator and stops here
        let Some(model) = self.decode(&request.planned_state, "planned state", &mut diagnostics) else {
            return CreateResourceResponse {
                new_state: DynamicValue::null(),
                diagnostics,
            };
        };

        let new_state = match self.coordinator.create(&self.adapter, &model).await {
            Ok(created) => self.encode(&created, &mut diagnostics),
            Err(e) => {
                self.report(Phase::Create, &e, &mut diagnostics);
                self.kept_state(e, &model, &mut diagnostics)
            }
        };

        CreateResourceResponse {
            new_state: new_state.unwrap_or_else(DynamicValue::null),
            diagnostics,
        }
    }

    async fn read(&self, request: ReadResourceRequest) -> ReadResourceResponse {
        let mut diagnostics = Diagnostics::new();

        let Some(model) = self.decode(&request.current_state, "state", &mut diagnostics) else {
            return ReadResourceResponse {
                new_state: Some(request.current_state),
                diagnostics,
            };
        };

        let new_state = match self.coordinator.read(&self.adapter, &model).await {
            Ok(ReadOutcome::Found(observed)) => self
                .encode(&observed, &mut diagnostics)
                .or(Some(request.current_state)),
            Ok(ReadOutcome::Absent) => None,
            Ok(ReadOutcome::Stale { reason, .. }) => {
                diagnostics.push(Diagnostic::warning(
                    format!("Could not refresh {}", self.adapter.type_name()),
                    format!("Keeping prior state: {}", reason),
                ));
                Some(request.current_state)
            }
            Err(e) => {
                self.report(Phase::Read, &e, &mut diagnostics);
                Some(request.current_state)
            }
        };

        ReadResourceResponse {
            new_state,
            diagnostics,
        }
    }

    async fn update(&self, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let mut diagnostics = Diagnostics::new();

        // Replace-only attributes must never reach the remote update call
        let replaced = self
            .schema
            .replacement_paths(&request.prior_state, &request.planned_state);
        if !replaced.is_empty() {
            for path in replaced {
                diagnostics.push(
                    Diagnostic::error(
                        format!("Cannot update {} in place", self.adapter.type_name()),
                        format!("changing '{}' requires replacing the resource", path),
                    )
                    .with_attribute(path),
                );
            }
            return UpdateResourceResponse {
                new_state: request.prior_state,
                diagnostics,
            };
        }

        // Computed attributes may be unknown in the plan; carry them from prior state
        let planned = request.planned_state.with_unknowns_from(&request.prior_state);
        let Some(model) = self.decode(&planned, "planned state", &mut diagnostics) else {
            return UpdateResourceResponse {
                new_state: request.prior_state,
                diagnostics,
            };
        };

        let new_state = match self.coordinator.update(&self.adapter, &model).await {
            Ok(updated) => self.encode(&updated, &mut diagnostics),
            Err(e) => {
                self.report(Phase::Update, &e, &mut diagnostics);
                self.kept_state(e, &model, &mut diagnostics)
            }
        };

        UpdateResourceResponse {
            new_state: new_state.unwrap_or(request.prior_state),
            diagnostics,
        }
    }

    async fn delete(&self, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let mut diagnostics = Diagnostics::new();

        let Some(model) = self.decode(&request.prior_state, "state", &mut diagnostics) else {
            return DeleteResourceResponse { diagnostics };
        };

        if let Err(e) = self.coordinator.delete(&self.adapter, &model).await {
            self.report(Phase::Delete, &e, &mut diagnostics);
        }

        DeleteResourceResponse { diagnostics }
    }

    async fn import_state(&self, request: ImportResourceStateRequest) -> ImportResourceStateResponse {
        let mut diagnostics = Diagnostics::new();
        let mut imported_resources = Vec::new();

        match self.coordinator.import(&self.adapter, &request.id).await {
            Ok(model) => {
                if let Some(state) = self.encode(&model, &mut diagnostics) {
                    imported_resources.push(ImportedResource {
                        type_name: request.type_name,
                        state,
                    });
                }
            }
            Err(e) => self.report(Phase::Import, &e, &mut diagnostics),
        }

        ImportResourceStateResponse {
            imported_resources,
            diagnostics,
        }
    }
}
