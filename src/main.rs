use std::io::IsTerminal;

use anyhow::Context;
use dexec::args::{OptionKind, ParsedOptions};
use dexec::config::Config;
use dexec::container::{host_directory, DockerCli};
use dexec::help::{render_help, render_version};
use dexec::runner::{requested_action, Action, HostContext, Runner};

/// Exit status for command-line errors.
const USAGE_STATUS_CODE: i32 = 2;

fn main() {
    dexec::logging::init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let options = match ParsedOptions::from_os_args(&args) {
        Ok(options) => options,
        Err(failure) => {
            tracing::debug!(partial = ?failure.partial, "argument parsing stopped early");
            eprintln!("{}", failure);
            std::process::exit(USAGE_STATUS_CODE);
        }
    };

    match requested_action(&options) {
        Action::ShowVersion => println!("{}", render_version(options.program())),
        Action::ShowHelp => print!("{}", render_help(options.program())),
        Action::Execute => {
            let code = match run(options) {
                Ok(code) => code,
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    1
                }
            };
            std::process::exit(code);
        }
    }
}

fn run(options: ParsedOptions) -> anyhow::Result<i32> {
    let config = Config::load()
        .context("failed to load configuration")?
        .with_env_overrides(|key| std::env::var(key).ok())?;

    let host = HostContext {
        host_dir: host_directory(options.first(OptionKind::TargetDir))
            .context("failed to resolve source directory")?,
        interactive: std::io::stdin().is_terminal(),
    };

    let runner = Runner::new(
        DockerCli::new(config.defaults.docker_bin.clone()),
        config.registry(),
    )
    .with_timeout(config.timeout())
    .with_ping_timeout(config.ping_timeout());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let code = runtime.block_on(async {
        let mut stdin = tokio::io::stdin();
        runner.run(options, &host, &mut stdin).await
    })?;
    Ok(code)
}
