use super::{AnswerSet, ContainerConfig, PromptSchema, ServiceDefinition};
use anyhow::Result;
use std::fmt::Debug;

/// Trait for the container engine boundary. The three image/container
/// operations may block (the download in particular is network-bound).
pub trait DockerClient: Send + Sync + Debug {
    /// Check whether the docker binary is available at all
    fn is_installed(&self) -> bool;

    /// Check whether the docker daemon is up and answering
    fn is_docker_service_running(&self) -> bool;

    /// Check whether the image for this definition and tag is present locally
    fn image_is_downloaded(&self, definition: &ServiceDefinition, tag: &str) -> Result<bool>;

    /// Pull the image for this definition and tag
    fn download_image(&self, definition: &ServiceDefinition, tag: &str) -> Result<()>;

    /// Create and start a container; passthrough tokens are forwarded to the
    /// engine invocation verbatim, before the image name
    fn create_and_start_container(
        &self,
        config: &ContainerConfig,
        passthrough: &[String],
    ) -> Result<()>;
}

/// Trait for acquiring answers from the user. Passed in explicitly so tests
/// can supply canned answers instead of real interactive input.
pub trait PromptCollector {
    /// Ask every schema in order and return the validated answers
    fn collect(&self, schemas: &[PromptSchema]) -> Result<AnswerSet>;

    /// Checkbox-style selection used when no service names were given on the
    /// command line. An empty result means the user cancelled.
    fn select_services(&self, choices: &[ServiceDefinition]) -> Result<Vec<String>>;
}
