use crate::domain::{ServiceCategory, ServiceDefinition};
use crate::services::ServiceCatalog;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub fn default_config_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".config/takeout")
}

pub fn services_path(config_dir: &Path) -> PathBuf {
    config_dir.join("services.yml")
}

/// User-defined service entry. Prompts are not configurable; user services
/// get the shared tag/port/volume prompts only.
#[derive(Deserialize)]
struct UserService {
    short_name: String,
    organization: String,
    port: u16,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    category: Option<ServiceCategory>,
    #[serde(default)]
    env: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ServicesDocument {
    Root { services: Vec<UserService> },
    List(Vec<UserService>),
}

/// The built-in catalog plus whatever services.yml declares. A user entry
/// may not reuse a builtin shortname.
pub fn load_catalog(config_dir: &Path) -> Result<ServiceCatalog> {
    let mut catalog = ServiceCatalog::builtin();

    let path = services_path(config_dir);
    if !path.exists() {
        return Ok(catalog);
    }

    let content = fs::read_to_string(&path).with_context(|| format!("reading {:?}", path))?;
    if content.trim().is_empty() {
        return Ok(catalog);
    }

    for definition in parse_user_services(&content, &path)? {
        catalog
            .register(definition)
            .with_context(|| format!("merging user services from {:?}", path))?;
    }

    Ok(catalog)
}

fn parse_user_services(content: &str, path: &Path) -> Result<Vec<ServiceDefinition>> {
    let doc: ServicesDocument =
        serde_yml::from_str(content).with_context(|| format!("parsing {:?}", path))?;

    let entries = match doc {
        ServicesDocument::Root { services } => services,
        ServicesDocument::List(list) => list,
    };

    let mut definitions = Vec::with_capacity(entries.len());

    for (idx, entry) in entries.into_iter().enumerate() {
        if entry.short_name.trim().is_empty() {
            bail!("entry {} in {:?} is missing 'short_name'", idx + 1, path);
        }
        if entry.organization.trim().is_empty() {
            bail!("entry {} in {:?} is missing 'organization'", idx + 1, path);
        }

        definitions.push(ServiceDefinition {
            display_name: entry
                .display_name
                .unwrap_or_else(|| entry.short_name.clone()),
            category: entry.category.unwrap_or(ServiceCategory::Database),
            short_name: entry.short_name,
            organization: entry.organization,
            default_port: entry.port,
            env: entry.env,
            prompts: Vec::new(),
        });
    }

    Ok(definitions)
}
