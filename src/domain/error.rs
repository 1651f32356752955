use thiserror::Error;

/// Failures the enable flow can surface. Preflight and resolution variants
/// abort the whole command; the per-service variants are collected into the
/// final summary without stopping sibling pipelines.
#[derive(Debug, Error)]
pub enum EnableError {
    #[error("Docker is not installed. Install Docker and try again.")]
    DockerNotInstalled,

    #[error("the Docker service is not running. Start it and try again.")]
    DockerServiceNotRunning,

    #[error("unable to find a service matching shortname '{0}'")]
    InvalidServiceShortname(String),

    #[error("downloading image '{image}' failed: {reason}")]
    ImageDownloadFailure {
        image: String,
        reason: anyhow::Error,
    },

    #[error("creating container '{name}' failed: {reason}")]
    ContainerCreationFailure {
        name: String,
        reason: anyhow::Error,
    },

    #[error("the enable task for '{0}' ended without reporting an outcome")]
    TaskLost(String),
}
