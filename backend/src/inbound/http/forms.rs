//! Form body extraction for post and comment submissions.
//!
//! Browsers submit the post form as `multipart/form-data` (it carries an
//! optional image) and the comment form as
//! `application/x-www-form-urlencoded`; both encodings are accepted on every
//! form route. Field names are `text`, `group` and `image`.

use actix_multipart::{Field, Multipart};
use actix_web::http::header::{self, HeaderMap};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::TryStreamExt;
use futures_util::future::LocalBoxFuture;
use serde::Deserialize;
use tracing::debug;

use crate::domain::{CommentForm, Error, PostForm, UploadedImage};

/// Largest accepted uploaded file.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
/// Largest accepted plain text field.
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// Fields of a submitted post or comment form.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SubmittedForm {
    pub text: Option<String>,
    pub group: Option<String>,
    pub image: Option<UploadedImage>,
}

impl SubmittedForm {
    pub fn into_post_form(self) -> PostForm {
        PostForm {
            text: self.text,
            group: self.group,
            image: self.image,
        }
    }

    pub fn into_comment_form(self) -> CommentForm {
        CommentForm { text: self.text }
    }
}

#[derive(Debug, Default, Deserialize)]
struct UrlEncodedFields {
    text: Option<String>,
    group: Option<String>,
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim_start().starts_with("multipart/form-data"))
}

fn bad_form(error: impl std::fmt::Display) -> Error {
    debug!(%error, "malformed form submission");
    Error::invalid_request("malformed form submission")
}

async fn read_field(field: &mut Field, limit: usize) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(bad_form)? {
        if bytes.len() + chunk.len() > limit {
            return Err(Error::invalid_request(format!(
                "form field exceeds {limit} bytes"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn into_text(bytes: Vec<u8>) -> Result<String, Error> {
    String::from_utf8(bytes).map_err(bad_form)
}

async fn read_multipart(mut multipart: Multipart) -> Result<SubmittedForm, Error> {
    let mut form = SubmittedForm::default();
    while let Some(mut field) = multipart.try_next().await.map_err(bad_form)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("text") => {
                form.text = Some(into_text(read_field(&mut field, MAX_TEXT_FIELD_BYTES).await?)?);
            }
            Some("group") => {
                form.group = Some(into_text(
                    read_field(&mut field, MAX_TEXT_FIELD_BYTES).await?,
                )?);
            }
            Some("image") => {
                let file_name = field
                    .content_disposition()
                    .and_then(|disposition| disposition.get_filename())
                    .map(str::to_owned)
                    .unwrap_or_default();
                let content_type = field.content_type().map(ToString::to_string);
                let bytes = read_field(&mut field, MAX_UPLOAD_BYTES).await?;
                // An untouched file input arrives as a part with no file name.
                if !file_name.is_empty() {
                    form.image = Some(UploadedImage {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
            }
            _ => {
                read_field(&mut field, MAX_UPLOAD_BYTES).await?;
            }
        }
    }
    Ok(form)
}

impl FromRequest for SubmittedForm {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        if is_multipart(req.headers()) {
            let multipart = Multipart::new(req.headers(), payload.take());
            Box::pin(read_multipart(multipart))
        } else {
            let fut = web::Form::<UrlEncodedFields>::from_request(req, payload);
            Box::pin(async move {
                let fields = fut.await.map_err(bad_form)?.into_inner();
                Ok(SubmittedForm {
                    text: fields.text,
                    group: fields.group,
                    image: None,
                })
            })
        }
    }
}
