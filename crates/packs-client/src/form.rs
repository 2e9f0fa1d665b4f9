//! [`FormPart`] → [`reqwest::multipart::Form`].

use packs_core::draft::{FileUpload, FormPart};
use reqwest::multipart::{Form, Part};

use crate::{Error, Result};

/// Build the multipart body in part order. Repeated names (classification
/// lists) become repeated parts.
pub(crate) fn multipart_form(parts: Vec<FormPart>) -> Result<Form> {
  let mut form = Form::new();
  for part in parts {
    form = match part {
      FormPart::Text { name, value } => form.text(name, value),
      FormPart::File { name, upload } => {
        let FileUpload {
          file_name,
          content_type,
          bytes,
        } = upload;
        let file = Part::bytes(bytes)
          .file_name(file_name)
          .mime_str(&content_type)
          .map_err(|source| Error::ContentType {
            content_type,
            source,
          })?;
        form.part(name, file)
      }
    };
  }
  Ok(form)
}
