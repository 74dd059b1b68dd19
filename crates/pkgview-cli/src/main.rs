use std::path::PathBuf;

use browse::{browse, download_package, list_packages, open_session, DownloadOptions};
use clap::Parser;
use cli::{Args, Commands};
use error::{CliError, CliResult};
use logging::setup_logging;
use pkgview_config::{
    config::{default_config_path, generate_default_config, Config},
    paths::{absolute, expand_path},
};
use pkgview_dl::http_client::configure_http_client;
use pkgview_registry::HttpSource;
use tracing::debug;
use ureq::Proxy;
use utils::{parse_headers, set_flag, COLOR, PROGRESS};

mod browse;
mod cli;
mod error;
mod logging;
mod progress;
mod utils;

fn resolve_dir(path: &str) -> CliResult<PathBuf> {
    Ok(absolute(&expand_path(path)?)?)
}

fn config_path(args: &Args) -> CliResult<PathBuf> {
    match args.config.as_deref() {
        Some(path) => resolve_dir(path),
        None => Ok(default_config_path()),
    }
}

fn load_config(args: &Args) -> CliResult<Config> {
    let mut config = Config::load(Some(&config_path(args)?))?;

    if let Some(branch) = &args.branch {
        config.branch = branch.clone();
        config.resolve()?;
    }

    Ok(config)
}

/// Applies proxy, headers, user agent and timeout to the shared HTTP agent.
fn configure_network(args: &Args, config: &Config) -> CliResult<()> {
    let proxy = args
        .proxy
        .as_deref()
        .map(|proxy| {
            Proxy::new(proxy).map_err(|source| {
                CliError::InvalidProxy {
                    proxy: proxy.to_string(),
                    source,
                }
            })
        })
        .transpose()?;
    let headers = args.header.as_deref().map(parse_headers).transpose()?;
    let user_agent = args.user_agent.clone().or_else(|| config.user_agent.clone());
    let timeout = config.timeout();

    configure_http_client(|client| {
        if let Some(proxy) = proxy {
            client.proxy = Some(proxy);
        }

        if let Some(user_agent) = user_agent {
            client.user_agent = Some(user_agent);
        }

        if let Some(headers) = headers {
            client.headers = Some(headers);
        }

        client.timeout = timeout;
    });

    Ok(())
}

fn download_options(yes: bool, output: Option<String>) -> CliResult<DownloadOptions> {
    Ok(DownloadOptions {
        yes,
        output: output.as_deref().map(resolve_dir).transpose()?,
    })
}

fn handle_cli() -> CliResult<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        set_flag(&COLOR, false);
    }

    if args.no_progress {
        set_flag(&PROGRESS, false);
    }

    let command = args.command.clone().unwrap_or(Commands::Browse {
        yes: false,
        output: None,
    });

    match command {
        Commands::DefConfig => generate_default_config(&config_path(&args)?)?,
        Commands::Config => {
            let config = load_config(&args)?;
            println!("{}", config.to_toml()?.trim_end());
        }
        Commands::List => {
            let config = load_config(&args)?;
            configure_network(&args, &config)?;

            let session = open_session(&HttpSource, &config)?;
            list_packages(&session, &mut std::io::stdout().lock())?;
        }
        Commands::Download {
            package,
            yes,
            output,
        } => {
            let config = load_config(&args)?;
            configure_network(&args, &config)?;

            let session = open_session(&HttpSource, &config)?;
            download_package(
                &HttpSource,
                &config,
                &session,
                &package,
                download_options(yes, output)?,
            )?;
        }
        Commands::Browse {
            yes,
            output,
        } => {
            let config = load_config(&args)?;
            configure_network(&args, &config)?;
            debug!("Repository list: {}", config.repo_list_url);

            browse(&config, download_options(yes, output)?)?;
        }
    }

    progress::stop();

    Ok(())
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        progress::stop();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
