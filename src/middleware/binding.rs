use axum::{
    Form, Json,
    body::{Body, Bytes},
    extract::{FromRequest, Request},
    http::{HeaderMap, HeaderValue, Method, header::CONTENT_TYPE},
};
use tracing::debug;

use crate::db::{NewRecord, Record};
use crate::error::{BindError, ClinicError};
use crate::types::forms::CreateForm;

const FORM_MIME: &str = "application/x-www-form-urlencoded";

/// A validated create body, accepted as JSON or as a URL-encoded form.
///
/// Bodies without a form content type are parsed as JSON whatever their
/// declared type.
pub struct Bound<F: CreateForm>(pub F::Record);

impl<S, F> FromRequest<S> for Bound<F>
where
    S: Send + Sync,
    F: CreateForm,
{
    type Rejection = ClinicError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = has_form_content_type(req.headers());

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| BindError::Malformed(rejection.body_text()))?;

        debug!(
            entity = <F::Record as NewRecord>::Stored::ENTITY,
            payload = %String::from_utf8_lossy(&bytes),
            "raw create payload"
        );

        let form = if is_form {
            ensure_utf8_form(&bytes)?;
            let Form(form) = Form::<F>::from_request(replay_as_form(bytes), state)
                .await
                .map_err(|rejection| BindError::Malformed(rejection.body_text()))?;
            form
        } else {
            let Json(form) = Json::<F>::from_bytes(&bytes)
                .map_err(|rejection| BindError::Malformed(rejection.body_text()))?;
            form
        };

        Ok(Bound(form.validate()?))
    }
}

fn has_form_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.trim_start().starts_with(FORM_MIME))
}

/// Form values are percent-decoded leniently by the `Form` extractor, so
/// invalid UTF-8 would otherwise be stored as U+FFFD.
fn ensure_utf8_form(bytes: &[u8]) -> Result<(), BindError> {
    let body = std::str::from_utf8(bytes)
        .map_err(|e| BindError::Malformed(format!("form body is not UTF-8: {e}")))?;
    for part in body.split(['&', '=']) {
        urlencoding::decode(part).map_err(|_| {
            BindError::Malformed(format!("form value `{part}` does not decode to UTF-8"))
        })?;
    }
    Ok(())
}

fn replay_as_form(bytes: Bytes) -> Request {
    let mut req = Request::new(Body::from(bytes));
    *req.method_mut() = Method::POST;
    req.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(FORM_MIME));
    req
}
