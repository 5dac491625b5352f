//! Generic operation handlers, one set per entity type.
//!
//! Every entity exposes the same six operations; the route tree mounts
//! these handlers once per entity under `/api/{domain}/{resource}`.

use axum::extract::{FromRequest, State};
use axum::http::StatusCode;
use axum::Json;
use espyna_core::entity::Entity;
use espyna_core::listdata::{ListPageData, ListPageRequest};

use crate::error::{AppError, AppResult};
use crate::middleware::context::Ctx;
use crate::response::{DataRequest, DataResponse, DeleteResult, IdPayload};
use crate::services::{Services, UseCasesFor};
use crate::state::AppState;

/// `Json` with rejections rendered as the standard error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// POST /api/{domain}/{resource}/create
pub async fn create<E>(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    AppJson(input): AppJson<DataRequest<E>>,
) -> AppResult<(StatusCode, Json<DataResponse<E>>)>
where
    E: Entity,
    Services: UseCasesFor<E>,
{
    let created = UseCasesFor::<E>::use_cases(&*state.services)
        .create(&ctx, input.data)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// POST /api/{domain}/{resource}/read
pub async fn read<E>(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    AppJson(input): AppJson<DataRequest<IdPayload>>,
) -> AppResult<Json<DataResponse<E>>>
where
    E: Entity,
    Services: UseCasesFor<E>,
{
    let entity = UseCasesFor::<E>::use_cases(&*state.services)
        .read(&ctx, &input.data.id)
        .await?;
    Ok(Json(DataResponse { data: entity }))
}

/// POST /api/{domain}/{resource}/update
pub async fn update<E>(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    AppJson(input): AppJson<DataRequest<E>>,
) -> AppResult<Json<DataResponse<E>>>
where
    E: Entity,
    Services: UseCasesFor<E>,
{
    let updated = UseCasesFor::<E>::use_cases(&*state.services)
        .update(&ctx, input.data)
        .await?;
    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/{domain}/{resource}/delete
pub async fn delete<E>(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    AppJson(input): AppJson<DataRequest<IdPayload>>,
) -> AppResult<Json<DataResponse<DeleteResult>>>
where
    E: Entity,
    Services: UseCasesFor<E>,
{
    UseCasesFor::<E>::use_cases(&*state.services)
        .delete(&ctx, &input.data.id)
        .await?;
    Ok(Json(DataResponse {
        data: DeleteResult { success: true },
    }))
}

/// POST /api/{domain}/{resource}/list
pub async fn list<E>(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
) -> AppResult<Json<DataResponse<Vec<E>>>>
where
    E: Entity,
    Services: UseCasesFor<E>,
{
    let items = UseCasesFor::<E>::use_cases(&*state.services)
        .list(&ctx)
        .await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/{domain}/{resource}/get-list-page-data
pub async fn get_list_page_data<E>(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    AppJson(request): AppJson<ListPageRequest>,
) -> AppResult<Json<DataResponse<ListPageData<E>>>>
where
    E: Entity,
    Services: UseCasesFor<E>,
{
    let page = UseCasesFor::<E>::use_cases(&*state.services)
        .get_list_page_data(&ctx, &request)
        .await?;
    Ok(Json(DataResponse { data: page }))
}
