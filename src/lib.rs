pub mod cli;
pub mod domain;
pub mod infra;
pub mod services;

// Available to integration tests; a production build could hide this
// behind a "test-utils" feature
pub mod test_support;

pub use domain::{
    AnswerSet, ContainerConfig, DockerClient, EnableError, PromptCollector, PromptSchema,
    ServiceDefinition,
};
pub use infra::{DockerCli, TerminalPrompt};
pub use services::{EnableOrchestrator, EnableOutcome, EnableRequest, ServiceCatalog};
