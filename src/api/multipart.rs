use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::Multipart;

use crate::catalog::requests::FileUpload;
use crate::error::CatalogError;

/// Content types accepted for uploaded images.
fn allowed_content_types() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("image/jpeg", "jpg"),
        ("image/png", "png"),
        ("image/webp", "webp"),
    ])
}

/// Text fields and files of one multipart request.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, FileUpload>,
}

impl MultipartForm {
    /// Drains `multipart`, rejecting files that are too large or not images.
    pub async fn read(mut multipart: Multipart, size_limit: usize) -> Result<Self, CatalogError> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|err| CatalogError::Validation(err.body_text()))?
        {
            let Some(name) = field.name().map(str::to_owned) else {
                return Err(CatalogError::Validation("Field name is not set.".to_owned()));
            };

            match field.file_name().map(str::to_owned) {
                Some(file_name) => {
                    let content_type = match field.content_type() {
                        Some(content_type) => content_type.to_owned(),
                        None => {
                            return Err(CatalogError::Validation(
                                "Content type is not set.".to_owned(),
                            ))
                        }
                    };
                    let Some(extension) = allowed_content_types().get(content_type.as_str()).copied()
                    else {
                        return Err(CatalogError::Validation(
                            "Unsupported content type.".to_owned(),
                        ));
                    };

                    let data = field
                        .bytes()
                        .await
                        .map_err(|err| CatalogError::Validation(err.body_text()))?;
                    if data.len() > size_limit {
                        return Err(CatalogError::PayloadTooLarge(size_limit));
                    }
                    if data.is_empty() {
                        continue;
                    }

                    // Name the upload after its content type so the stored
                    // extension matches what is served back.
                    let stem = std::path::Path::new(&file_name)
                        .file_stem()
                        .and_then(|stem| stem.to_str())
                        .unwrap_or("upload");
                    form.files
                        .insert(name, FileUpload::new(format!("{stem}.{extension}"), data));
                }
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(|err| CatalogError::Validation(err.body_text()))?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
    }

    pub fn required(&self, name: &str) -> Result<String, CatalogError> {
        self.text(name)
            .ok_or_else(|| CatalogError::Validation(format!("Field {name} is required")))
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> Result<T, CatalogError> {
        let value = self.required(name)?;
        value
            .parse::<T>()
            .map_err(|_| CatalogError::Validation(format!("Field {name} is invalid: {value}")))
    }

    pub fn parse_or<T: FromStr>(&self, name: &str, default: T) -> Result<T, CatalogError> {
        match self.text(name) {
            Some(_) => self.parse(name),
            None => Ok(default),
        }
    }

    pub fn take_file(&mut self, name: &str) -> Option<FileUpload> {
        self.files.remove(name)
    }
}
