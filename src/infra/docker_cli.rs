use crate::domain::{ContainerConfig, DockerClient, ServiceDefinition};
use anyhow::{Context, Result, bail};
use std::ffi::OsStr;
use std::process::{Command, ExitStatus, Stdio};
use tracing::debug;

/// Engine adapter that shells out to the `docker` binary.
#[derive(Debug, Default)]
pub struct DockerCli;

impl DockerCli {
    pub fn new() -> Self {
        Self
    }
}

impl DockerClient for DockerCli {
    fn is_installed(&self) -> bool {
        Command::new("docker")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn is_docker_service_running(&self) -> bool {
        Command::new("docker")
            .arg("info")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn image_is_downloaded(&self, definition: &ServiceDefinition, tag: &str) -> Result<bool> {
        let image = definition.image_name(tag);
        let status = Command::new("docker")
            .args(["image", "inspect", &image])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .with_context(|| format!("checking for image {image}"))?;

        Ok(status.success())
    }

    fn download_image(&self, definition: &ServiceDefinition, tag: &str) -> Result<()> {
        let image = definition.image_name(tag);
        docker(["pull", &image], &format!("pulling image {image}"))
    }

    fn create_and_start_container(
        &self,
        config: &ContainerConfig,
        passthrough: &[String],
    ) -> Result<()> {
        let mut args: Vec<String> = vec![
            "run".into(),
            "-d".into(),
            "--name".into(),
            config.name.clone(),
            "--network".into(),
            config.host_config.network_mode.clone(),
        ];

        for (key, value) in &config.labels {
            args.push("--label".into());
            args.push(format!("{key}={value}"));
        }

        for env in &config.env {
            args.push("-e".into());
            args.push(env.clone());
        }

        for bind in &config.host_config.binds {
            args.push("-v".into());
            args.push(bind.clone());
        }

        for (container_port, bindings) in &config.host_config.port_bindings {
            let container_port = container_port
                .strip_suffix("/tcp")
                .unwrap_or(container_port);
            for binding in bindings {
                args.push("-p".into());
                args.push(format!("{}:{container_port}", binding.host_port));
            }
        }

        // Passthrough tokens go in verbatim, before the image name
        args.extend(passthrough.iter().cloned());
        args.push(config.image.clone());

        debug!("docker {}", args.join(" "));
        docker(args, &format!("creating container {}", config.name))
    }
}

fn docker<I, S>(args: I, context: &str) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let status = docker_status(args, context)?;
    ensure_success(status, context)
}

fn docker_status<I, S>(args: I, context: &str) -> Result<ExitStatus>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new("docker")
        .args(args.into_iter().map(|item| item.as_ref().to_os_string()))
        .status()
        .with_context(|| context.to_string())
}

fn ensure_success(status: ExitStatus, context: &str) -> Result<()> {
    if status.success() {
        return Ok(());
    }

    bail!("docker returned status {:?} ({context})", status)
}
