//! List, create and count handlers shared by every record type.
//!
//! Each handler performs exactly one storage call and renders the result in
//! the deployment's [`RenderMode`](crate::render::RenderMode).

use axum::{extract::State, response::Response};
use tracing::info;

use crate::db::{NewRecord, Record};
use crate::error::ClinicError;
use crate::middleware::binding::Bound;
use crate::render::{Render, render_created, render_list};
use crate::router::ClinicState;
use crate::types::forms::CreateForm;

/// GET /{entity}: every stored record.
pub async fn list_records<R>(State(state): State<ClinicState>) -> Result<Response, ClinicError>
where
    R: Record + Render,
{
    let records = state.storage.find_all::<R>().await?;
    Ok(render_list(state.render_mode, &records))
}

/// POST /{entity}: bind, insert, answer 201 with the stored record.
pub async fn create_record<F>(
    State(state): State<ClinicState>,
    Bound(record): Bound<F>,
) -> Result<Response, ClinicError>
where
    F: CreateForm,
    <F::Record as NewRecord>::Stored: Render,
{
    let stored = state.storage.create(record).await?;
    info!(
        entity = <F::Record as NewRecord>::Stored::ENTITY,
        "stored new record"
    );
    Ok(render_created(state.render_mode, &stored))
}

/// GET /{entity}/count: row count as plain text.
pub async fn count_records<R: Record>(
    State(state): State<ClinicState>,
) -> Result<String, ClinicError> {
    Ok(state.storage.count::<R>().await?.to_string())
}
