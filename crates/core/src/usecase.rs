//! Generic CRUD and list use cases.
//!
//! Every entity shares one pipeline: validate, authorize, enrich, then run
//! the repository call (inside a transaction for writes).

use std::sync::Arc;

use chrono::Utc;

use crate::auth::{Action, Authorizer, Permission};
use crate::context::RequestContext;
use crate::entity::Entity;
use crate::error::CoreError;
use crate::listdata::{ListDataProcessor, ListPageData, ListPageRequest};
use crate::messages::display_name;
use crate::repository::Repository;
use crate::transaction::TransactionRunner;
use crate::types::new_id;
use crate::validation::{validate_fields, validate_id};

pub struct EntityUseCases<E: Entity> {
    repository: Arc<dyn Repository<E>>,
    authorizer: Arc<dyn Authorizer>,
    runner: TransactionRunner,
    processor: ListDataProcessor,
}

impl<E: Entity> Clone for EntityUseCases<E> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            authorizer: Arc::clone(&self.authorizer),
            runner: self.runner.clone(),
            processor: self.processor.clone(),
        }
    }
}

impl<E: Entity> EntityUseCases<E> {
    pub fn new(
        repository: Arc<dyn Repository<E>>,
        authorizer: Arc<dyn Authorizer>,
        runner: TransactionRunner,
    ) -> Self {
        Self {
            repository,
            authorizer,
            runner,
            processor: ListDataProcessor::for_entity::<E>(),
        }
    }

    /// Replace the list-data processor (e.g. to change default search fields).
    pub fn with_processor(mut self, processor: ListDataProcessor) -> Self {
        self.processor = processor;
        self
    }

    pub async fn create(&self, ctx: &RequestContext, mut entity: E) -> Result<E, CoreError> {
        validate_fields(E::KIND, &entity)?;
        if !entity.id().trim().is_empty() {
            validate_id(E::KIND, entity.id())?;
        }
        self.authorize(ctx, Action::Create).await?;

        if entity.id().trim().is_empty() {
            entity.set_id(new_id());
        }
        let now = Utc::now();
        entity.set_active(true);
        entity.set_date_created(now);
        entity.set_date_modified(now);

        let repository = Arc::clone(&self.repository);
        let created = self
            .runner
            .execute(|| {
                let repository = Arc::clone(&repository);
                let entity = entity.clone();
                async move { repository.create(entity).await.map_err(CoreError::from) }
            })
            .await?;

        tracing::info!(
            entity = E::KIND,
            id = %created.id(),
            tenant_id = %ctx.tenant_id,
            request_id = ?ctx.request_id,
            "Entity created"
        );
        Ok(created)
    }

    pub async fn read(&self, ctx: &RequestContext, id: &str) -> Result<E, CoreError> {
        validate_id(E::KIND, id)?;
        self.authorize(ctx, Action::Read).await?;

        let entity = self
            .repository
            .read(id)
            .await?
            .ok_or_else(|| not_found::<E>(id))?;

        tracing::debug!(entity = E::KIND, id, tenant_id = %ctx.tenant_id, "Entity read");
        Ok(entity)
    }

    /// Replace a record. `date_created` and the active flag are kept from
    /// the stored record; `date_modified` is stamped.
    pub async fn update(&self, ctx: &RequestContext, entity: E) -> Result<E, CoreError> {
        validate_id(E::KIND, entity.id())?;
        validate_fields(E::KIND, &entity)?;
        self.authorize(ctx, Action::Update).await?;

        let repository = Arc::clone(&self.repository);
        let updated = self
            .runner
            .execute(|| {
                let repository = Arc::clone(&repository);
                let mut entity = entity.clone();
                async move {
                    let existing = repository
                        .read(entity.id())
                        .await?
                        .ok_or_else(|| not_found::<E>(entity.id()))?;

                    if let Some(created) = existing.date_created() {
                        entity.set_date_created(created);
                    }
                    entity.set_active(existing.is_active());
                    entity.set_date_modified(Utc::now());

                    let id = entity.id().to_string();
                    repository
                        .update(entity)
                        .await?
                        .ok_or_else(|| not_found::<E>(&id))
                }
            })
            .await?;

        tracing::info!(
            entity = E::KIND,
            id = %updated.id(),
            tenant_id = %ctx.tenant_id,
            request_id = ?ctx.request_id,
            "Entity updated"
        );
        Ok(updated)
    }

    /// Soft delete: the record stays readable but leaves default listings.
    pub async fn delete(&self, ctx: &RequestContext, id: &str) -> Result<(), CoreError> {
        validate_id(E::KIND, id)?;
        self.authorize(ctx, Action::Delete).await?;

        let repository = Arc::clone(&self.repository);
        let id_owned = id.to_string();
        self.runner
            .execute(|| {
                let repository = Arc::clone(&repository);
                let id = id_owned.clone();
                async move {
                    if repository.soft_delete(&id).await? {
                        Ok(())
                    } else {
                        Err(not_found::<E>(&id))
                    }
                }
            })
            .await?;

        tracing::info!(
            entity = E::KIND,
            id,
            tenant_id = %ctx.tenant_id,
            request_id = ?ctx.request_id,
            "Entity deleted"
        );
        Ok(())
    }

    /// Active records, oldest first.
    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<E>, CoreError> {
        self.authorize(ctx, Action::List).await?;
        let items = self.repository.list(false).await?;
        tracing::debug!(entity = E::KIND, count = items.len(), tenant_id = %ctx.tenant_id, "Entities listed");
        Ok(items)
    }

    pub async fn get_list_page_data(
        &self,
        ctx: &RequestContext,
        request: &ListPageRequest,
    ) -> Result<ListPageData<E>, CoreError> {
        self.authorize(ctx, Action::List).await?;

        let items = self.repository.list(request.include_inactive).await?;
        let page = self
            .processor
            .process(items, request)
            .map_err(|e| e.into_core(E::KIND))?;

        tracing::debug!(
            entity = E::KIND,
            total = page.pagination.total_items,
            returned = page.items.len(),
            tenant_id = %ctx.tenant_id,
            "List page data computed"
        );
        Ok(page)
    }

    async fn authorize(&self, ctx: &RequestContext, action: Action) -> Result<(), CoreError> {
        let permission = Permission::new(E::KIND, action);
        if self.authorizer.check(ctx, &permission).await? {
            return Ok(());
        }

        tracing::warn!(
            permission = %permission,
            authorizer = self.authorizer.name(),
            user_id = ?ctx.user_id,
            tenant_id = %ctx.tenant_id,
            "Authorization denied"
        );
        Err(CoreError::forbidden(
            format!("{}.errors.authorization_failed", E::KIND),
            &[("action", action.as_str()), ("entity", &display_name(E::KIND))],
        ))
    }
}

fn not_found<E: Entity>(id: &str) -> CoreError {
    CoreError::NotFound {
        entity: E::KIND,
        id: id.to_string(),
    }
}
