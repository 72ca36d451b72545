// ABOUTME: Container runtime discovery, selection and connection setup for Docker and Podman.
// ABOUTME: Produces the DOCKER_HOST overlay and flags pack needs to reach the runtime.

mod configure;
mod detection;
mod error;
mod podman;
mod target;
mod types;

pub use configure::{
    ConfigurationResult, Configurator, DOCKER_HOST_ENV, DOCKER_HOST_FLAG, DOCKER_HOST_INHERIT,
    Strategy, strategy_for,
};
pub use detection::{discover_installed, discover_installed_in, select_preferred};
pub use error::{ConfigureError, ConfigureErrorKind};
pub use podman::{ConnectionParseError, MachineConnection, parse_root_connection};
pub use target::{Arch, Os, Target};
pub use types::{RuntimeType, runtime_priority};
