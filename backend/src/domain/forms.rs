//! Typed form input and pure validation.
//!
//! Validation never fails loudly: it returns either a normalised record or
//! the field-level messages to show beside the re-rendered form.

use std::collections::BTreeMap;

use file_format::FileFormat;
use serde::Serialize;

use super::{CommentText, GroupId, PostText};

/// Message for a missing or blank required field.
pub const REQUIRED_MESSAGE: &str = "This field is required.";
/// Message for a group that is not one of the offered choices.
pub const INVALID_CHOICE_MESSAGE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
/// Message for an upload with no content.
pub const EMPTY_FILE_MESSAGE: &str = "The submitted file is empty.";
/// Message for an upload that is not a recognised image.
pub const INVALID_IMAGE_MESSAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

/// Field-level validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    /// Record a message against `field`.
    pub fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.to_owned());
    }

    /// Messages recorded for `field`.
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result<T>(self, value: impl FnOnce() -> Option<T>) -> Result<T, Self> {
        match (self.is_empty(), value()) {
            (true, Some(valid)) => Ok(valid),
            _ => Err(self),
        }
    }
}

/// An uploaded file as received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// An upload whose content was recognised as a raster image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidImage {
    file_name: String,
    media_type: String,
    bytes: Vec<u8>,
}

impl ValidImage {
    /// Original file name as submitted.
    pub fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    /// Media type detected from the content.
    pub fn media_type(&self) -> &str {
        self.media_type.as_str()
    }

    pub fn bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }
}

/// Raw post form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    pub text: Option<String>,
    /// Group id as submitted; an empty string means "no group".
    pub group: Option<String>,
    pub image: Option<UploadedImage>,
}

/// Values echoed back into a re-rendered post form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PostFormValues {
    pub text: String,
    pub group: String,
}

impl PostForm {
    /// Values to pre-fill when the form is shown again.
    pub fn values(&self) -> PostFormValues {
        PostFormValues {
            text: self.text.clone().unwrap_or_default(),
            group: self.group.clone().unwrap_or_default(),
        }
    }
}

/// A post submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPost {
    pub text: PostText,
    pub group: Option<GroupId>,
    pub image: Option<ValidImage>,
}

/// Raw comment form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentForm {
    pub text: Option<String>,
}

/// A comment submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidComment {
    pub text: CommentText,
}

/// Validate a post submission against the groups that may be chosen.
///
/// # Examples
/// ```
/// use yatube::domain::{GroupId, PostForm, validate_post};
///
/// let form = PostForm {
///     text: Some(" hello ".into()),
///     group: Some("1".into()),
///     image: None,
/// };
/// let valid = validate_post(&form, &[GroupId::new(1)]).expect("valid form");
/// assert_eq!(valid.text.as_ref(), "hello");
/// assert_eq!(valid.group, Some(GroupId::new(1)));
/// ```
pub fn validate_post(form: &PostForm, known_groups: &[GroupId]) -> Result<ValidPost, FormErrors> {
    let mut errors = FormErrors::default();

    let text = form.text.as_deref().and_then(|raw| PostText::new(raw).ok());
    if text.is_none() {
        errors.add("text", REQUIRED_MESSAGE);
    }

    let group = match parse_group(form.group.as_deref(), known_groups) {
        Ok(group) => group,
        Err(message) => {
            errors.add("group", message);
            None
        }
    };

    let image = match form.image.as_ref().map(validate_image).transpose() {
        Ok(image) => image,
        Err(message) => {
            errors.add("image", message);
            None
        }
    };

    errors.into_result(|| text.map(|text| ValidPost { text, group, image }))
}

/// Validate a comment submission.
pub fn validate_comment(form: &CommentForm) -> Result<ValidComment, FormErrors> {
    let mut errors = FormErrors::default();
    let text = form.text.as_deref().and_then(|raw| CommentText::new(raw).ok());
    if text.is_none() {
        errors.add("text", REQUIRED_MESSAGE);
    }
    errors.into_result(|| text.map(|text| ValidComment { text }))
}

fn parse_group(
    raw: Option<&str>,
    known_groups: &[GroupId],
) -> Result<Option<GroupId>, &'static str> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    let id = raw
        .parse::<i64>()
        .map(GroupId::new)
        .map_err(|_| INVALID_CHOICE_MESSAGE)?;
    if known_groups.contains(&id) {
        Ok(Some(id))
    } else {
        Err(INVALID_CHOICE_MESSAGE)
    }
}

fn validate_image(upload: &UploadedImage) -> Result<ValidImage, &'static str> {
    if upload.bytes.is_empty() {
        return Err(EMPTY_FILE_MESSAGE);
    }
    let format = FileFormat::from_bytes(&upload.bytes);
    if !is_raster_image(format) {
        return Err(INVALID_IMAGE_MESSAGE);
    }
    Ok(ValidImage {
        file_name: upload.file_name.clone(),
        media_type: format.media_type().to_owned(),
        bytes: upload.bytes.clone(),
    })
}

fn is_raster_image(format: FileFormat) -> bool {
    matches!(
        format,
        FileFormat::GraphicsInterchangeFormat
            | FileFormat::PortableNetworkGraphics
            | FileFormat::AnimatedPortableNetworkGraphics
            | FileFormat::JointPhotographicExpertsGroup
            | FileFormat::Webp
            | FileFormat::WindowsBitmap
            | FileFormat::Av1ImageFileFormat
    )
}
