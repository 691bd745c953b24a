//! Plan id resolution and TOML write-back.
//!
//! - [`resolve_plan_id`] accepts either a numeric id or a path to a plan
//!   file. If given a file, it reads the `[plan].id` field.
//! - [`write_plan_id_to_file`] uses `toml_edit` to insert `id = <n>` into
//!   the `[plan]` table without disturbing comments or formatting.

use std::path::Path;

use anyhow::{Context, Result, bail};

use coach_api::models::Id;
use coach_core::plan::PlanFile;

/// Determine whether `input` refers to a plan file or a bare id, and
/// return the backend id.
pub fn resolve_plan_id(input: &str) -> Result<Id> {
    if looks_like_file_path(input) {
        return read_plan_id_from_file(input);
    }
    match input.trim().parse::<Id>() {
        Ok(id) if id > 0 => Ok(id),
        Ok(id) => bail!("invalid plan id: {id} (ids are positive)"),
        Err(parse_err) => {
            if Path::new(input).is_file() {
                read_plan_id_from_file(input)
            } else {
                Err(parse_err).with_context(|| {
                    format!("invalid plan id: {input:?} (not a number and not a file)")
                })
            }
        }
    }
}

fn looks_like_file_path(input: &str) -> bool {
    input.ends_with(".toml") || input.contains('/')
}

fn read_plan_id_from_file(path: &str) -> Result<Id> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read plan file: {path}"))?;

    let plan: PlanFile =
        toml::from_str(&content).with_context(|| format!("failed to parse TOML from {path}"))?;

    match plan.plan.id {
        Some(id) => Ok(id),
        None => bail!(
            "plan file {path:?} has no id field in [plan] section.\n\
             Run `coach {} create {path}` first to create it.",
            plan.plan.kind
        ),
    }
}

/// Insert `id = <plan_id>` as the first key of the `[plan]` table,
/// preserving everything else in the file.
pub fn write_plan_id_to_file(path: &str, plan_id: Id) -> Result<()> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;

    let mut doc: toml_edit::DocumentMut = content
        .parse::<toml_edit::DocumentMut>()
        .with_context(|| format!("failed to parse {path} as TOML document"))?;

    let plan_table = doc
        .get_mut("plan")
        .and_then(|v| v.as_table_mut())
        .with_context(|| format!("{path} has no [plan] table"))?;

    let entries: Vec<(String, toml_edit::Item)> = plan_table
        .iter()
        .filter(|(k, _)| *k != "id")
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();

    plan_table.clear();
    plan_table.insert("id", toml_edit::value(plan_id));
    for (key, value) in entries {
        plan_table.insert(&key, value);
    }

    std::fs::write(path, doc.to_string()).with_context(|| format!("failed to write {path}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTINE: &str = "# Bloque de fuerza\n[plan]\nkind = \"routine\"\nname = \"Fuerza\"\n\
        # day_count = 4\n\n[[exercises]]\nday = 1\nexercise = \"Sentadilla\"\nsets = 4\nreps = 8\n";

    #[test]
    fn resolve_numeric_id() {
        assert_eq!(resolve_plan_id("42").unwrap(), 42);
        assert_eq!(resolve_plan_id(" 7 ").unwrap(), 7);
    }

    #[test]
    fn resolve_rejects_garbage_and_non_positive() {
        assert!(resolve_plan_id("fuerza").is_err());
        assert!(resolve_plan_id("0").is_err());
        assert!(resolve_plan_id("-3").is_err());
    }

    #[test]
    fn resolve_from_file_with_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fuerza.toml");
        std::fs::write(&path, ROUTINE.replace("[plan]\n", "[plan]\nid = 31\n")).unwrap();
        assert_eq!(resolve_plan_id(path.to_str().unwrap()).unwrap(), 31);
    }

    #[test]
    fn resolve_from_file_without_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fuerza.toml");
        std::fs::write(&path, ROUTINE).unwrap();
        let err = resolve_plan_id(path.to_str().unwrap()).unwrap_err().to_string();
        assert!(err.contains("no id field"), "{err}");
        assert!(err.contains("coach routine create"), "{err}");
    }

    #[test]
    fn resolve_nonexistent_file() {
        assert!(resolve_plan_id("/tmp/nonexistent_coach_plan_xyz.toml").is_err());
    }

    #[test]
    fn write_plan_id_preserves_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fuerza.toml");
        std::fs::write(&path, ROUTINE).unwrap();

        write_plan_id_to_file(path.to_str().unwrap(), 55).unwrap();

        let result = std::fs::read_to_string(&path).unwrap();
        assert!(result.contains("# Bloque de fuerza"));
        assert!(result.contains("# day_count = 4"));
        let parsed: PlanFile = toml::from_str(&result).unwrap();
        assert_eq!(parsed.plan.id, Some(55));
        assert_eq!(parsed.plan.name, "Fuerza");
        assert_eq!(parsed.exercises.len(), 1);
    }

    #[test]
    fn write_plan_id_replaces_existing_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fuerza.toml");
        std::fs::write(&path, ROUTINE.replace("[plan]\n", "[plan]\nid = 1\n")).unwrap();

        write_plan_id_to_file(path.to_str().unwrap(), 2).unwrap();
        let parsed: PlanFile = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.plan.id, Some(2));
    }

    #[test]
    fn looks_like_file_path_tests() {
        assert!(looks_like_file_path("plan.toml"));
        assert!(looks_like_file_path("./plan.toml"));
        assert!(looks_like_file_path("plans/fuerza.toml"));
        assert!(!looks_like_file_path("123"));
    }
}
