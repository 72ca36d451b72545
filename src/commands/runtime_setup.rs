// ABOUTME: Shared helper for choosing and configuring the container runtime.
// ABOUTME: Used by build, the only command that needs a runtime connection.

use paicku::diagnostics::Diagnostics;
use paicku::error::{Error, Result};
use paicku::output::Output;
use paicku::process::CommandRunner;
use paicku::runtime::{
    ConfigurationResult, Configurator, RuntimeType, Target, discover_installed, runtime_priority,
    select_preferred,
};
use paicku::ssh::HostTrust;

/// Resolve which runtime to use and prepare pack's connection to it.
///
/// An explicit choice must be installed. Without one, the highest-priority
/// installed runtime is used and a warning names it.
pub async fn prepare_runtime(
    requested: Option<RuntimeType>,
    target: &Target,
    runner: &dyn CommandRunner,
    trust: &dyn HostTrust,
    output: &Output,
    diag: &mut Diagnostics,
) -> Result<(RuntimeType, ConfigurationResult)> {
    let runtime = match requested {
        Some(runtime) => {
            let installed = discover_installed(&[runtime], target.os, runner).await;
            if installed.is_empty() {
                return Err(Error::RuntimeNotInstalled(runtime));
            }
            runtime
        }
        None => {
            let priority: Vec<RuntimeType> = runtime_priority().into();
            let installed = discover_installed(&priority, target.os, runner).await;
            let Some(&runtime) = select_preferred(&installed, &priority).first() else {
                return Err(Error::NoRuntimeInstalled);
            };
            output.warning(&format!(
                "You haven't specified a container runtime, using the: {runtime}"
            ));
            runtime
        }
    };

    tracing::info!(%runtime, %target, "using container runtime");

    let configuration = Configurator::new(runner, trust, output)
        .configure(runtime, target, diag)
        .await?;

    Ok((runtime, configuration))
}
