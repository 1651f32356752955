use crate::domain::{
    ANSWER_PORT, ANSWER_TAG, ANSWER_VOLUME, AnswerSet, ContainerConfig, HostConfig,
    NetworkingConfig, PortBinding, SHORTNAME_LABEL, ServiceDefinition,
};
use crate::services::EnableRequest;
use anyhow::{Context, Result};
use std::collections::BTreeMap;

/// Pure transform of a definition plus collected answers into the engine
/// configuration. Deterministic: identical inputs serialize byte-identically
/// (ordered maps throughout), so it unit-tests without a live engine.
pub fn build_container_config(
    definition: &ServiceDefinition,
    answers: &AnswerSet,
) -> Result<ContainerConfig> {
    let tag = required_answer(answers, ANSWER_TAG)?;
    let port = required_answer(answers, ANSWER_PORT)?;
    let volume = required_answer(answers, ANSWER_VOLUME)?;
    let volume = shellexpand::tilde(volume).into_owned();

    let env = definition
        .env
        .iter()
        .map(|template| substitute_answers(template, answers))
        .collect();

    let mut labels = BTreeMap::new();
    labels.insert(SHORTNAME_LABEL.to_string(), definition.short_name.clone());

    // The container side of the binding always uses the service's default
    // port; the answer only moves the host side
    let mut port_bindings = BTreeMap::new();
    port_bindings.insert(
        format!("{}/tcp", definition.default_port),
        vec![PortBinding {
            host_port: port.to_string(),
        }],
    );

    Ok(ContainerConfig {
        image: definition.image_name(tag),
        name: format!("TO--{}--{}--{}", definition.short_name, tag, port),
        env,
        labels,
        host_config: HostConfig {
            binds: vec![format!("{volume}:/data")],
            port_bindings,
            network_mode: "bridge".into(),
            devices: Vec::new(),
        },
        networking_config: NetworkingConfig::default(),
    })
}

/// Bundle the configuration with everything the orchestrator needs for one
/// service. Passthrough tokens are carried alongside, never parsed.
pub fn build_enable_request(
    definition: ServiceDefinition,
    answers: &AnswerSet,
    passthrough: &[String],
) -> Result<EnableRequest> {
    let config = build_container_config(&definition, answers)?;
    let tag = required_answer(answers, ANSWER_TAG)?.to_string();

    Ok(EnableRequest {
        definition,
        tag,
        config,
        passthrough: passthrough.to_vec(),
    })
}

fn required_answer<'a>(answers: &'a AnswerSet, name: &str) -> Result<&'a str> {
    answers
        .get(name)
        .with_context(|| format!("missing answer '{name}'"))
}

fn substitute_answers(template: &str, answers: &AnswerSet) -> String {
    let mut value = template.to_string();
    for (name, answer) in answers.iter() {
        value = value.replace(&format!("{{{name}}}"), answer);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ServiceCatalog;

    fn meilisearch_with_defaults() -> (ServiceDefinition, AnswerSet) {
        let definition = ServiceCatalog::builtin().get("meilisearch").unwrap().clone();
        let answers = AnswerSet::from_defaults(&definition.all_prompts());
        (definition, answers)
    }

    #[test]
    fn applies_the_image_name_and_container_name_templates() {
        let (definition, answers) = meilisearch_with_defaults();
        let config = build_container_config(&definition, &answers).unwrap();

        assert_eq!(config.image, "getmeili/meilisearch:latest");
        assert_eq!(config.name, "TO--meilisearch--latest--7700");
        assert_eq!(
            config.labels.get(SHORTNAME_LABEL).map(String::as_str),
            Some("meilisearch")
        );
        assert_eq!(
            config.host_config.binds,
            vec!["takeout-meilisearch-data:/data".to_string()]
        );
        assert_eq!(config.host_config.network_mode, "bridge");
        assert!(config.host_config.devices.is_empty());
    }

    #[test]
    fn binding_key_uses_default_port_and_value_uses_answered_port() {
        let (definition, mut answers) = meilisearch_with_defaults();
        answers.insert(ANSWER_PORT.into(), "7800".into());

        let config = build_container_config(&definition, &answers).unwrap();

        let bindings = config.host_config.port_bindings.get("7700/tcp").unwrap();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].host_port, "7800");
        assert_eq!(config.name, "TO--meilisearch--latest--7800");
    }

    #[test]
    fn env_templates_are_filled_from_answers() {
        let (definition, mut answers) = meilisearch_with_defaults();
        answers.insert("master_key".into(), "abc".into());

        let config = build_container_config(&definition, &answers).unwrap();
        assert_eq!(config.env, vec!["MEILI_MASTER_KEY=abc".to_string()]);
    }

    #[test]
    fn identical_inputs_serialize_byte_identically() {
        let (definition, answers) = meilisearch_with_defaults();

        let first = build_container_config(&definition, &answers).unwrap();
        let second = build_container_config(&definition, &answers).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn serializes_with_engine_api_field_names() {
        let (definition, answers) = meilisearch_with_defaults();
        let config = build_container_config(&definition, &answers).unwrap();

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["Image"], "getmeili/meilisearch:latest");
        assert_eq!(json["HostConfig"]["NetworkMode"], "bridge");
        assert_eq!(
            json["HostConfig"]["PortBindings"]["7700/tcp"][0]["HostPort"],
            "7700"
        );
        assert!(json["NetworkingConfig"].as_object().unwrap().is_empty());
    }

    #[test]
    fn tilde_volumes_are_expanded() {
        if std::env::var("HOME").is_err() {
            return;
        }
        let (definition, mut answers) = meilisearch_with_defaults();
        answers.insert(ANSWER_VOLUME.into(), "~/meili-data".into());

        let config = build_container_config(&definition, &answers).unwrap();
        assert!(!config.host_config.binds[0].starts_with('~'));
        assert!(config.host_config.binds[0].ends_with("/meili-data:/data"));
    }

    #[test]
    fn missing_answer_is_an_error() {
        let (definition, _) = meilisearch_with_defaults();
        let err = build_container_config(&definition, &AnswerSet::new()).unwrap_err();
        assert!(err.to_string().contains("missing answer"));
    }

    #[test]
    fn request_carries_passthrough_verbatim() {
        let (definition, answers) = meilisearch_with_defaults();
        let passthrough = vec!["-e".to_string(), "MEILI_MASTER_KEY='abc'".to_string()];

        let request = build_enable_request(definition, &answers, &passthrough).unwrap();

        assert_eq!(request.tag, "latest");
        assert_eq!(request.passthrough, passthrough);
    }
}
