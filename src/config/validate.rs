// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{ModuleConfigEntry, ProjectFile, RawProjectFile};
use crate::config::settings::DevtoolsSettings;
use crate::errors::{DevsyncError, Result};
use crate::module::{ModuleConfig, ModuleId, ModuleRegistry};

impl TryFrom<RawProjectFile> for ProjectFile {
    type Error = DevsyncError;

    fn try_from(raw: RawProjectFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_project(&raw)?;
        let settings = build_settings(&raw)?;
        Ok(ProjectFile::new_unchecked(
            raw.project,
            settings,
            raw.module,
            raw.dependencies,
            raw.steps,
        ))
    }
}

fn validate_raw_project(cfg: &RawProjectFile) -> Result<()> {
    validate_trigger_file(&cfg.devtools.trigger_file)?;
    validate_group(cfg, "restart", &cfg.dependencies.restart)?;
    validate_group(cfg, "reload", &cfg.dependencies.reload)?;
    validate_modules(cfg)?;
    validate_steps(cfg)?;
    Ok(())
}

fn validate_trigger_file(name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(DevsyncError::ConfigError(format!(
            "[devtools].trigger_file must be a plain file name (got '{name}')"
        )));
    }
    Ok(())
}

fn validate_group(cfg: &RawProjectFile, group: &str, entries: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for name in entries {
        if !cfg.module.contains_key(name) {
            return Err(DevsyncError::ConfigError(format!(
                "dependency group '{group}' refers to unknown module '{name}'"
            )));
        }
        // Operation names derive from module names, so a repeat would collide.
        if !seen.insert(name.as_str()) {
            return Err(DevsyncError::ConfigError(format!(
                "module '{name}' is listed twice in dependency group '{group}'"
            )));
        }
    }
    Ok(())
}

fn validate_modules(cfg: &RawProjectFile) -> Result<()> {
    for (name, module) in cfg.module.iter() {
        if let Some(artifacts) = &module.artifacts {
            if artifacts.is_empty() {
                return Err(DevsyncError::ConfigError(format!(
                    "[module.{name}].artifacts must not be empty when given"
                )));
            }
        }
    }
    Ok(())
}

fn validate_steps(cfg: &RawProjectFile) -> Result<()> {
    for (step, cmd) in cfg.steps.iter() {
        if step.trim().is_empty() {
            return Err(DevsyncError::ConfigError(
                "[steps] contains an empty step name".to_string(),
            ));
        }
        if cmd.trim().is_empty() {
            return Err(DevsyncError::ConfigError(format!(
                "[steps].\"{step}\" has an empty command"
            )));
        }
    }
    Ok(())
}

fn build_settings(cfg: &RawProjectFile) -> Result<DevtoolsSettings> {
    let configs = cfg
        .devtools
        .modules
        .iter()
        .map(module_config_from_entry)
        .collect::<Result<Vec<_>>>()?;
    let registry = ModuleRegistry::new(configs)?;
    Ok(DevtoolsSettings::new(
        cfg.devtools.trigger_file.trim(),
        registry,
    ))
}

fn module_config_from_entry(entry: &ModuleConfigEntry) -> Result<ModuleConfig> {
    let dependency: ModuleId = entry.dependency.parse()?;
    Ok(ModuleConfig {
        name: entry
            .name
            .clone()
            .unwrap_or_else(|| entry.dependency.trim().to_string()),
        dependency,
        classes_task: non_blank(&entry.classes_task),
        resources_task: non_blank(&entry.resources_task),
        reload_task: non_blank(&entry.reload_task),
    })
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
