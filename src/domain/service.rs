use anyhow::{Result, bail};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Answer names shared by every service's default prompt set
pub const ANSWER_TAG: &str = "tag";
pub const ANSWER_PORT: &str = "port";
pub const ANSWER_VOLUME: &str = "volume";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Database,
    Cache,
    Search,
    Queue,
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database => write!(f, "Database"),
            Self::Cache => write!(f, "Cache"),
            Self::Search => write!(f, "Search"),
            Self::Queue => write!(f, "Queue"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Text,
    Port,
}

/// A single question asked before enabling a service. Validation is owned
/// by the kind, so collectors only need to loop until `validate` passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSchema {
    pub name: String,
    pub message: String,
    pub kind: PromptKind,
    pub default: String,
}

impl PromptSchema {
    pub fn text(name: &str, message: &str, default: &str) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            kind: PromptKind::Text,
            default: default.into(),
        }
    }

    pub fn port(name: &str, message: &str, default: u16) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            kind: PromptKind::Port,
            default: default.to_string(),
        }
    }

    pub fn validate(&self, value: &str) -> Result<()> {
        match self.kind {
            PromptKind::Text => {
                if value.trim().is_empty() {
                    bail!("'{}' must not be empty", self.name);
                }
                Ok(())
            }
            PromptKind::Port => match value.parse::<u16>() {
                Ok(port) if port != 0 => Ok(()),
                _ => bail!("'{value}' is not a valid TCP port"),
            },
        }
    }
}

/// A catalog entry. Immutable once registered; the enable flow only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDefinition {
    pub short_name: String,
    pub display_name: String,
    pub category: ServiceCategory,
    /// Image namespace on the registry, e.g. "bitnami"
    pub organization: String,
    pub default_port: u16,
    /// KEY=VALUE templates; `{name}` placeholders refer to answer values
    pub env: Vec<String>,
    /// Service-specific prompts, asked after the default ones
    pub prompts: Vec<PromptSchema>,
}

impl ServiceDefinition {
    pub fn image_name(&self, tag: &str) -> String {
        format!("{}/{}:{}", self.organization, self.short_name, tag)
    }

    /// Prompts shared by every service: tag, host port, volume name
    pub fn default_prompts(&self) -> Vec<PromptSchema> {
        vec![
            PromptSchema::text(
                ANSWER_TAG,
                "Which tag (version) of this service would you like to use?",
                "latest",
            ),
            PromptSchema::port(
                ANSWER_PORT,
                "Which host port would you like this service to use?",
                self.default_port,
            ),
            PromptSchema::text(
                ANSWER_VOLUME,
                "What is the Docker volume name?",
                &format!("takeout-{}-data", self.short_name),
            ),
        ]
    }

    pub fn all_prompts(&self) -> Vec<PromptSchema> {
        let mut prompts = self.default_prompts();
        prompts.extend(self.prompts.iter().cloned());
        prompts
    }

    /// Label shown by the interactive picker, e.g. "Database: PostgreSQL"
    pub fn menu_label(&self) -> String {
        format!("{}: {}", self.category, self.display_name)
    }
}

/// Collected answers for one service, keyed by prompt name. Ordered so that
/// everything derived from it serializes deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet {
    values: BTreeMap<String, String>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_defaults(schemas: &[PromptSchema]) -> Self {
        let mut answers = Self::new();
        for schema in schemas {
            answers.insert(schema.name.clone(), schema.default.clone());
        }
        answers
    }

    pub fn insert(&mut self, name: String, value: String) {
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, String, String> {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition() -> ServiceDefinition {
        ServiceDefinition {
            short_name: "postgresql".into(),
            display_name: "PostgreSQL".into(),
            category: ServiceCategory::Database,
            organization: "bitnami".into(),
            default_port: 5432,
            env: vec!["POSTGRESQL_PASSWORD={password}".into()],
            prompts: vec![PromptSchema::text("password", "Password?", "password")],
        }
    }

    #[test]
    fn image_name_follows_org_short_tag_template() {
        assert_eq!(definition().image_name("15"), "bitnami/postgresql:15");
    }

    #[test]
    fn default_prompts_cover_tag_port_and_volume() {
        let prompts = definition().default_prompts();
        let names: Vec<&str> = prompts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec![ANSWER_TAG, ANSWER_PORT, ANSWER_VOLUME]);
        assert_eq!(prompts[1].default, "5432");
        assert_eq!(prompts[2].default, "takeout-postgresql-data");
    }

    #[test]
    fn all_prompts_appends_service_specific_ones() {
        let prompts = definition().all_prompts();
        assert_eq!(prompts.len(), 4);
        assert_eq!(prompts[3].name, "password");
    }

    #[test]
    fn menu_label_includes_category() {
        assert_eq!(definition().menu_label(), "Database: PostgreSQL");
    }

    #[test]
    fn port_prompts_reject_non_ports() {
        let prompt = PromptSchema::port(ANSWER_PORT, "Port?", 5432);
        assert!(prompt.validate("5432").is_ok());
        assert!(prompt.validate("0").is_err());
        assert!(prompt.validate("70000").is_err());
        assert!(prompt.validate("abc").is_err());
    }

    #[test]
    fn text_prompts_reject_blank_values() {
        let prompt = PromptSchema::text(ANSWER_TAG, "Tag?", "latest");
        assert!(prompt.validate("latest").is_ok());
        assert!(prompt.validate("   ").is_err());
    }

    #[test]
    fn answer_set_from_defaults_takes_every_schema_default() {
        let answers = AnswerSet::from_defaults(&definition().all_prompts());
        assert_eq!(answers.get(ANSWER_TAG), Some("latest"));
        assert_eq!(answers.get(ANSWER_PORT), Some("5432"));
        assert_eq!(answers.get("password"), Some("password"));
    }
}
