use serde::Serialize;
use std::collections::BTreeMap;

/// Label applied to every container so other commands can find it again
pub const SHORTNAME_LABEL: &str = "com.tighten.takeout.shortname";

/// Everything the engine needs to create and start one container.
/// Built fresh per enable call and never mutated afterwards; fields
/// serialize with Docker Engine API casing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerConfig {
    pub image: String,
    pub name: String,
    pub env: Vec<String>,
    pub labels: BTreeMap<String, String>,
    pub host_config: HostConfig,
    pub networking_config: NetworkingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostConfig {
    pub binds: Vec<String>,
    pub port_bindings: BTreeMap<String, Vec<PortBinding>>,
    pub network_mode: String,
    pub devices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PortBinding {
    pub host_port: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkingConfig {}
