use crate::domain::{ContainerConfig, DockerClient, EnableError, ServiceDefinition};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info};

/// Everything one service's pipeline needs: the resolved definition, the
/// tag the image check and download key on, the built configuration, and
/// the verbatim passthrough tokens for the engine invocation.
#[derive(Debug, Clone)]
pub struct EnableRequest {
    pub definition: ServiceDefinition,
    pub tag: String,
    pub config: ContainerConfig,
    pub passthrough: Vec<String>,
}

#[derive(Debug)]
pub struct EnableOutcome {
    pub short_name: String,
    pub result: Result<(), EnableError>,
}

impl EnableOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Drives one check → download → create pipeline per requested service.
/// Pipelines run on their own scoped threads and share no mutable state;
/// every thread is joined before this returns, so no outcome can be lost.
pub struct EnableOrchestrator {
    docker: Arc<dyn DockerClient>,
}

impl EnableOrchestrator {
    pub fn new(docker: Arc<dyn DockerClient>) -> Self {
        Self { docker }
    }

    pub fn enable_all(&self, requests: &[EnableRequest]) -> Vec<EnableOutcome> {
        if requests.is_empty() {
            return Vec::new();
        }

        thread::scope(|scope| {
            let handles: Vec<_> = requests
                .iter()
                .map(|request| {
                    let short_name = request.definition.short_name.clone();
                    let handle = scope.spawn(move || self.enable_one(request));
                    (short_name, handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(short_name, handle)| match handle.join() {
                    Ok(result) => EnableOutcome { short_name, result },
                    Err(_) => {
                        let result = Err(EnableError::TaskLost(short_name.clone()));
                        EnableOutcome { short_name, result }
                    }
                })
                .collect()
        })
    }

    fn enable_one(&self, request: &EnableRequest) -> Result<(), EnableError> {
        let image = request.definition.image_name(&request.tag);

        let downloaded = self
            .docker
            .image_is_downloaded(&request.definition, &request.tag)
            .map_err(|reason| EnableError::ImageDownloadFailure {
                image: image.clone(),
                reason,
            })?;

        if downloaded {
            debug!("image {image} already present");
        } else {
            info!("Downloading {image}...");
            self.docker
                .download_image(&request.definition, &request.tag)
                .map_err(|reason| EnableError::ImageDownloadFailure {
                    image: image.clone(),
                    reason,
                })?;
        }

        info!("Starting container {}...", request.config.name);
        self.docker
            .create_and_start_container(&request.config, &request.passthrough)
            .map_err(|reason| EnableError::ContainerCreationFailure {
                name: request.config.name.clone(),
                reason,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AnswerSet;
    use crate::services::{ServiceCatalog, build_enable_request};
    use crate::test_support::MockDocker;

    fn request_for(short_name: &str) -> EnableRequest {
        let definition = ServiceCatalog::builtin().get(short_name).unwrap().clone();
        let answers = AnswerSet::from_defaults(&definition.all_prompts());
        build_enable_request(definition, &answers, &[]).unwrap()
    }

    #[test]
    fn empty_input_yields_no_outcomes() {
        let docker = Arc::new(MockDocker::new());
        let orchestrator = EnableOrchestrator::new(docker.clone());

        assert!(orchestrator.enable_all(&[]).is_empty());
        assert!(docker.get_commands().is_empty());
    }

    #[test]
    fn downloads_then_creates_when_image_is_missing() {
        let docker = Arc::new(MockDocker::new());
        let orchestrator = EnableOrchestrator::new(docker.clone());

        let outcomes = orchestrator.enable_all(&[request_for("redis")]);
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].is_success());

        let commands = docker.get_commands();
        let check = commands
            .iter()
            .position(|c| c == "image_is_downloaded:bitnami/redis:latest")
            .unwrap();
        let download = commands
            .iter()
            .position(|c| c == "download_image:bitnami/redis:latest")
            .unwrap();
        let create = commands
            .iter()
            .position(|c| c == "create:TO--redis--latest--6379")
            .unwrap();
        assert!(check < download);
        assert!(download < create);
    }

    #[test]
    fn never_downloads_when_image_is_already_present() {
        let docker = Arc::new(MockDocker::new());
        docker.mark_image_downloaded("bitnami/redis:latest");
        let orchestrator = EnableOrchestrator::new(docker.clone());

        let outcomes = orchestrator.enable_all(&[request_for("redis")]);
        assert!(outcomes[0].is_success());

        let commands = docker.get_commands();
        assert!(!commands.iter().any(|c| c.starts_with("download_image:")));
        assert!(commands.contains(&"create:TO--redis--latest--6379".to_string()));
    }

    #[test]
    fn each_pipeline_runs_exactly_once() {
        let docker = Arc::new(MockDocker::new());
        let orchestrator = EnableOrchestrator::new(docker.clone());

        let requests = vec![request_for("meilisearch"), request_for("postgresql")];
        let outcomes = orchestrator.enable_all(&requests);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(EnableOutcome::is_success));

        let commands = docker.get_commands();
        for image in ["getmeili/meilisearch:latest", "bitnami/postgresql:latest"] {
            let downloads = commands
                .iter()
                .filter(|c| **c == format!("download_image:{image}"))
                .count();
            assert_eq!(downloads, 1, "expected one download of {image}");
        }
        let creates = commands.iter().filter(|c| c.starts_with("create:")).count();
        assert_eq!(creates, 2);
    }

    #[test]
    fn a_failing_service_does_not_stop_its_siblings() {
        let docker = Arc::new(MockDocker::new());
        docker.set_fail_on("create:TO--postgresql--latest--5432");
        let orchestrator = EnableOrchestrator::new(docker.clone());

        let requests = vec![request_for("postgresql"), request_for("redis")];
        let outcomes = orchestrator.enable_all(&requests);

        let postgres = outcomes
            .iter()
            .find(|o| o.short_name == "postgresql")
            .unwrap();
        let redis = outcomes.iter().find(|o| o.short_name == "redis").unwrap();

        assert!(matches!(
            postgres.result,
            Err(EnableError::ContainerCreationFailure { .. })
        ));
        assert!(redis.is_success());
        assert!(
            docker
                .get_commands()
                .contains(&"create:TO--redis--latest--6379".to_string())
        );
    }

    #[test]
    fn a_failed_download_skips_creation_for_that_service_only() {
        let docker = Arc::new(MockDocker::new());
        docker.mark_image_downloaded("getmeili/meilisearch:latest");
        docker.set_fail_on("download_image");
        let orchestrator = EnableOrchestrator::new(docker.clone());

        let requests = vec![request_for("meilisearch"), request_for("postgresql")];
        let outcomes = orchestrator.enable_all(&requests);

        let meili = outcomes
            .iter()
            .find(|o| o.short_name == "meilisearch")
            .unwrap();
        let postgres = outcomes
            .iter()
            .find(|o| o.short_name == "postgresql")
            .unwrap();

        assert!(meili.is_success());
        assert!(matches!(
            postgres.result,
            Err(EnableError::ImageDownloadFailure { .. })
        ));

        let commands = docker.get_commands();
        assert!(commands.contains(&"create:TO--meilisearch--latest--7700".to_string()));
        assert!(!commands.contains(&"create:TO--postgresql--latest--5432".to_string()));
    }
}
