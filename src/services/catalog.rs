use crate::domain::{PromptSchema, ServiceCategory, ServiceDefinition};
use anyhow::{Result, bail};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Static registry of enableable services, keyed by shortname. Populated at
/// startup: the built-in entries below, plus whatever the user declares in
/// services.yml (see infra::config). Lookup is exact-match only; fuzzy
/// matching belongs to the interactive picker.
#[derive(Debug)]
pub struct ServiceCatalog {
    services: BTreeMap<String, ServiceDefinition>,
}

impl ServiceCatalog {
    pub fn builtin() -> Self {
        let mut catalog = Self {
            services: BTreeMap::new(),
        };
        for definition in builtin_definitions() {
            // Builtins carry distinct shortnames; register cannot fail here
            catalog
                .services
                .insert(definition.short_name.clone(), definition);
        }
        catalog
    }

    pub fn get(&self, short_name: &str) -> Option<&ServiceDefinition> {
        self.services.get(short_name)
    }

    /// Definitions in stable (shortname-sorted) order
    pub fn all(&self) -> impl Iterator<Item = &ServiceDefinition> {
        self.services.values()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Add a user-defined service. Rejects shortnames that are already
    /// taken, whether by a builtin or an earlier user entry.
    pub fn register(&mut self, definition: ServiceDefinition) -> Result<()> {
        match self.services.entry(definition.short_name.clone()) {
            Entry::Occupied(_) => bail!("service '{}' is already registered", definition.short_name),
            Entry::Vacant(slot) => {
                slot.insert(definition);
                Ok(())
            }
        }
    }
}

fn builtin_definitions() -> Vec<ServiceDefinition> {
    use ServiceCategory::{Cache, Database, Queue, Search};

    vec![
        ServiceDefinition {
            short_name: "postgresql".into(),
            display_name: "PostgreSQL".into(),
            category: Database,
            organization: "bitnami".into(),
            default_port: 5432,
            env: vec!["POSTGRESQL_PASSWORD={password}".into()],
            prompts: vec![PromptSchema::text(
                "password",
                "What password for the default user?",
                "password",
            )],
        },
        ServiceDefinition {
            short_name: "mysql".into(),
            display_name: "MySQL".into(),
            category: Database,
            organization: "bitnami".into(),
            default_port: 3306,
            env: vec!["MYSQL_ROOT_PASSWORD={root_password}".into()],
            prompts: vec![PromptSchema::text(
                "root_password",
                "What password for the root user?",
                "password",
            )],
        },
        ServiceDefinition {
            short_name: "mongodb".into(),
            display_name: "MongoDB".into(),
            category: Database,
            organization: "bitnami".into(),
            default_port: 27017,
            env: vec!["ALLOW_EMPTY_PASSWORD=yes".into()],
            prompts: Vec::new(),
        },
        ServiceDefinition {
            short_name: "redis".into(),
            display_name: "Redis".into(),
            category: Cache,
            organization: "bitnami".into(),
            default_port: 6379,
            env: vec!["ALLOW_EMPTY_PASSWORD=yes".into()],
            prompts: Vec::new(),
        },
        ServiceDefinition {
            short_name: "memcached".into(),
            display_name: "Memcached".into(),
            category: Cache,
            organization: "bitnami".into(),
            default_port: 11211,
            env: Vec::new(),
            prompts: Vec::new(),
        },
        ServiceDefinition {
            short_name: "meilisearch".into(),
            display_name: "MeiliSearch".into(),
            category: Search,
            organization: "getmeili".into(),
            default_port: 7700,
            env: vec!["MEILI_MASTER_KEY={master_key}".into()],
            prompts: vec![PromptSchema::text(
                "master_key",
                "What master key?",
                "masterKey",
            )],
        },
        ServiceDefinition {
            short_name: "elasticsearch".into(),
            display_name: "ElasticSearch".into(),
            category: Search,
            organization: "bitnami".into(),
            default_port: 9200,
            env: vec!["discovery.type=single-node".into()],
            prompts: Vec::new(),
        },
        ServiceDefinition {
            short_name: "rabbitmq".into(),
            display_name: "RabbitMQ".into(),
            category: Queue,
            organization: "bitnami".into(),
            default_port: 5672,
            env: Vec::new(),
            prompts: Vec::new(),
        },
    ]
}
