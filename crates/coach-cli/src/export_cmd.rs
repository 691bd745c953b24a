use std::path::PathBuf;

use anyhow::Context;

use coach_api::ApiClient;
use coach_api::endpoints::export::{self, ExportFormat};
use coach_api::models::PlanKind;
use coach_core::plan::load_plan;

use crate::resolve::resolve_plan_id;

/// Download a plan document rendered by the backend and write it to disk.
/// Returns the path written.
pub async fn export_to_file(
    api: &ApiClient,
    kind: PlanKind,
    plan: &str,
    format: ExportFormat,
    output: Option<&str>,
) -> anyhow::Result<PathBuf> {
    let plan_id = resolve_plan_id(plan)?;
    let path = match output {
        Some(path) => PathBuf::from(path),
        None => {
            let loaded = load_plan(api, kind, plan_id).await?;
            PathBuf::from(export::export_filename(kind, loaded.name(), format))
        }
    };

    let bytes = export::download(api, kind, plan_id, format).await?;
    std::fs::write(&path, &bytes)
        .with_context(|| format!("cannot write output file: {}", path.display()))?;
    tracing::info!(%kind, plan_id, %format, bytes = bytes.len(), path = %path.display(), "plan exported");
    Ok(path)
}

pub async fn cmd_export(
    api: &ApiClient,
    kind: PlanKind,
    plan: &str,
    format: ExportFormat,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let path = export_to_file(api, kind, plan, format, output).await?;
    println!("Exported {kind} to {}", path.display());
    Ok(())
}
