//! Upload namespaces for file references.
//!
//! File contents live in an external store; entities only keep a relative
//! path such as `property_images/tower-a.jpg`.

use crate::db::{DbError, DbResult};

/// Directory a file field's uploads are placed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadNamespace {
    PropertyUnitImages,
    PropertyImages,
    RentalAgreements,
    TransactionDocuments,
}

impl UploadNamespace {
    pub const ALL: [UploadNamespace; 4] = [
        UploadNamespace::PropertyUnitImages,
        UploadNamespace::PropertyImages,
        UploadNamespace::RentalAgreements,
        UploadNamespace::TransactionDocuments,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            UploadNamespace::PropertyUnitImages => "property_unit_images/",
            UploadNamespace::PropertyImages => "property_images/",
            UploadNamespace::RentalAgreements => "rental_agreements/",
            UploadNamespace::TransactionDocuments => "transaction_documents/",
        }
    }
}

/// Normalize a file reference for `field`.
///
/// Bare names are placed under `namespace`. References already under any
/// known namespace are kept, so a unit image can be shared with its property.
pub fn normalize_file_ref(
    field: &str,
    namespace: UploadNamespace,
    raw: Option<&str>,
) -> DbResult<Option<String>> {
    let Some(raw) = raw.map(str::trim) else {
        return Ok(None);
    };

    if raw.is_empty() {
        return Err(DbError::validation(field, "file reference must not be empty"));
    }
    if raw.starts_with('/') || raw.starts_with('\\') {
        return Err(DbError::validation(field, "file reference must be relative"));
    }
    if raw.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(DbError::validation(
            field,
            "file reference must not contain '..'",
        ));
    }

    if UploadNamespace::ALL
        .iter()
        .any(|ns| raw.starts_with(ns.prefix()))
    {
        return Ok(Some(raw.to_string()));
    }

    Ok(Some(format!("{}{}", namespace.prefix(), raw)))
}
