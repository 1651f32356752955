pub mod config;
mod docker_cli;
mod terminal;

pub use docker_cli::DockerCli;
pub use terminal::TerminalPrompt;
