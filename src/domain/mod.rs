mod container;
mod error;
mod service;
pub mod traits;

pub use container::{ContainerConfig, HostConfig, NetworkingConfig, PortBinding, SHORTNAME_LABEL};
pub use error::EnableError;
pub use service::{
    ANSWER_PORT, ANSWER_TAG, ANSWER_VOLUME, AnswerSet, PromptKind, PromptSchema, ServiceCategory,
    ServiceDefinition,
};
pub use traits::{DockerClient, PromptCollector};
