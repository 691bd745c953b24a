//! Document export pass-through. The backend renders the document; this
//! module only downloads the bytes and derives a filename.

use std::fmt;
use std::str::FromStr;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{Id, PlanKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Excel,
}

impl ExportFormat {
    fn endpoint(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "excel",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "xlsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(Self::Pdf),
            "excel" | "xlsx" => Ok(Self::Excel),
            other => Err(format!("invalid export format: {other:?} (expected pdf or excel)")),
        }
    }
}

pub async fn download(
    client: &ApiClient,
    kind: PlanKind,
    id: Id,
    format: ExportFormat,
) -> Result<Vec<u8>, ApiError> {
    client
        .get_bytes(&format!("/{}/{id}/{}", kind.collection(), format.endpoint()))
        .await
}

/// Derive a filesystem-safe filename such as `rutina_fuerza_4_dias.pdf`.
pub fn export_filename(kind: PlanKind, plan_name: &str, format: ExportFormat) -> String {
    let prefix = match kind {
        PlanKind::Routine => "rutina",
        PlanKind::Diet => "dieta",
    };
    let mut slug = String::with_capacity(plan_name.len());
    for c in plan_name.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        format!("{prefix}.{}", format.extension())
    } else {
        format!("{prefix}_{slug}.{}", format.extension())
    }
}
