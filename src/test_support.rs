use crate::domain::{
    AnswerSet, ContainerConfig, DockerClient, PromptCollector, PromptSchema, ServiceDefinition,
};
use anyhow::{Result, bail};
use std::collections::{BTreeMap, HashSet};
use std::sync::RwLock;

/// In-memory DockerClient that records every call as a command string.
/// `set_fail_on` / `set_panic_on` match recorded commands by prefix, so
/// "create" trips every creation while "create:TO--redis--latest--6379"
/// trips only that one.
#[derive(Debug)]
pub struct MockDocker {
    installed: RwLock<bool>,
    service_running: RwLock<bool>,
    downloaded_images: RwLock<HashSet<String>>,
    created: RwLock<Vec<(ContainerConfig, Vec<String>)>>,
    commands: RwLock<Vec<String>>,
    fail_on: RwLock<Option<String>>,
    panic_on: RwLock<Option<String>>,
}

impl MockDocker {
    pub fn new() -> Self {
        Self {
            installed: RwLock::new(true),
            service_running: RwLock::new(true),
            downloaded_images: RwLock::new(HashSet::new()),
            created: RwLock::new(Vec::new()),
            commands: RwLock::new(Vec::new()),
            fail_on: RwLock::new(None),
            panic_on: RwLock::new(None),
        }
    }

    pub fn set_installed(&self, installed: bool) {
        *self.installed.write().unwrap() = installed;
    }

    pub fn set_service_running(&self, running: bool) {
        *self.service_running.write().unwrap() = running;
    }

    pub fn mark_image_downloaded(&self, image: &str) {
        self.downloaded_images
            .write()
            .unwrap()
            .insert(image.to_string());
    }

    pub fn set_fail_on(&self, prefix: &str) {
        *self.fail_on.write().unwrap() = Some(prefix.to_string());
    }

    pub fn set_panic_on(&self, prefix: &str) {
        *self.panic_on.write().unwrap() = Some(prefix.to_string());
    }

    pub fn get_commands(&self) -> Vec<String> {
        self.commands.read().unwrap().clone()
    }

    pub fn created_containers(&self) -> Vec<(ContainerConfig, Vec<String>)> {
        self.created.read().unwrap().clone()
    }

    fn record(&self, command: &str) {
        self.commands.write().unwrap().push(command.to_string());
    }

    fn check_panic(&self, command: &str) {
        if let Some(ref prefix) = *self.panic_on.read().unwrap() {
            if command.starts_with(prefix.as_str()) {
                panic!("mock panic on: {command}");
            }
        }
    }

    fn check_fail(&self, command: &str) -> Result<()> {
        if let Some(ref prefix) = *self.fail_on.read().unwrap() {
            if command.starts_with(prefix.as_str()) {
                bail!("mock failure on: {command}");
            }
        }
        Ok(())
    }
}

impl Default for MockDocker {
    fn default() -> Self {
        Self::new()
    }
}

impl DockerClient for MockDocker {
    fn is_installed(&self) -> bool {
        self.record("is_installed");
        *self.installed.read().unwrap()
    }

    fn is_docker_service_running(&self) -> bool {
        self.record("is_docker_service_running");
        *self.service_running.read().unwrap()
    }

    fn image_is_downloaded(&self, definition: &ServiceDefinition, tag: &str) -> Result<bool> {
        let command = format!("image_is_downloaded:{}", definition.image_name(tag));
        self.record(&command);
        self.check_panic(&command);
        self.check_fail(&command)?;

        Ok(self
            .downloaded_images
            .read()
            .unwrap()
            .contains(&definition.image_name(tag)))
    }

    fn download_image(&self, definition: &ServiceDefinition, tag: &str) -> Result<()> {
        let image = definition.image_name(tag);
        let command = format!("download_image:{image}");
        self.record(&command);
        self.check_panic(&command);
        self.check_fail(&command)?;

        self.downloaded_images.write().unwrap().insert(image);
        Ok(())
    }

    fn create_and_start_container(
        &self,
        config: &ContainerConfig,
        passthrough: &[String],
    ) -> Result<()> {
        let command = format!("create:{}", config.name);
        self.record(&command);
        self.check_panic(&command);
        self.check_fail(&command)?;

        self.created
            .write()
            .unwrap()
            .push((config.clone(), passthrough.to_vec()));
        Ok(())
    }
}

/// PromptCollector with canned behavior: selections are returned as-is and
/// collect() answers every schema with its default, except where an
/// override was scripted.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    selections: Vec<String>,
    overrides: BTreeMap<String, String>,
    collect_calls: RwLock<usize>,
}

impl ScriptedPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selections(names: &[&str]) -> Self {
        Self {
            selections: names.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_answer(mut self, name: &str, value: &str) -> Self {
        self.overrides.insert(name.to_string(), value.to_string());
        self
    }

    pub fn collect_calls(&self) -> usize {
        *self.collect_calls.read().unwrap()
    }
}

impl PromptCollector for ScriptedPrompt {
    fn collect(&self, schemas: &[PromptSchema]) -> Result<AnswerSet> {
        *self.collect_calls.write().unwrap() += 1;

        let mut answers = AnswerSet::from_defaults(schemas);
        for schema in schemas {
            if let Some(value) = self.overrides.get(&schema.name) {
                schema.validate(value)?;
                answers.insert(schema.name.clone(), value.clone());
            }
        }
        Ok(answers)
    }

    fn select_services(&self, _choices: &[ServiceDefinition]) -> Result<Vec<String>> {
        Ok(self.selections.clone())
    }
}
