// This file is part of the Folio site server.
// SPDX-FileCopyrightText: 2025-2026 Folio contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use actix_web::rt::System;
use actix_web::{App, HttpServer, middleware::Logger};
use folio::app_state::AppState;
use folio::config::ValidatedConfig;
use folio::portfolio::PortfolioData;
use folio::runtime_paths::RuntimePaths;
use folio::{bootstrap, configure_app, headers};
use log::{LevelFilter, info};
use std::io::Write;
use std::sync::Arc;

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let parsed_args = match parse_args() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("Invalid command line arguments: {}", error);
            eprintln!("Use -C <root> to set the runtime directory.");
            return 1;
        }
    };

    if parsed_args.show_help {
        print!("{}", help_text());
        return 0;
    }

    let bootstrap = match bootstrap::bootstrap_runtime(&parsed_args.runtime_root) {
        Ok(result) => result,
        Err(error) => {
            eprintln!("Bootstrap error: {}", error);
            eprintln!("Application cannot start with invalid configuration.");
            return 1;
        }
    };

    match System::new().block_on(run_server(bootstrap)) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("Server failed to start: {}", error);
            1
        }
    }
}

async fn run_server(bootstrap: bootstrap::BootstrapResult) -> std::io::Result<()> {
    let validated_config = Arc::new(bootstrap.validated_config);
    let runtime_paths = bootstrap.runtime_paths;

    // Parse log level from config
    let log_level = match validated_config.logging.level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    };

    // Configure logging with a stable format
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let portfolio = match PortfolioData::load(&runtime_paths.data_dir) {
        Ok(data) => data,
        Err(error) => {
            eprintln!("Failed to load portfolio data: {}", error);
            return Err(std::io::Error::other(error.to_string()));
        }
    };

    let app_state = Arc::new(AppState::new(
        &validated_config.app.name,
        runtime_paths.clone(),
        portfolio,
    ));

    log_startup_info(&validated_config, &runtime_paths);

    let host = validated_config.server.host.clone();
    let port = validated_config.server.port;
    let workers = validated_config.server.workers;

    let factory = {
        let config = validated_config.clone();
        let app_state = app_state.clone();

        move || {
            let config_for_app = config.clone();
            let config_for_headers = config.clone();
            let app_state = app_state.clone();

            App::new()
                .wrap(Logger::new(
                    r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T"#,
                ))
                .wrap(headers::Headers::new(config_for_headers))
                .configure(move |cfg| configure_app(cfg, config_for_app, app_state))
        }
    };

    HttpServer::new(factory)
        .workers(workers)
        .bind((host, port))?
        .run()
        .await
}

fn log_startup_info(config: &ValidatedConfig, runtime_paths: &RuntimePaths) {
    info!("Starting {} - {}", config.app.name, config.app.description);
    info!("Workers: {}", config.server.workers);
    info!(
        "Listening on http://{}:{}",
        config.server.host, config.server.port
    );
    info!(
        "Admin dashboard available at: http://{}:{}{}",
        config.server.host, config.server.port, config.admin.path
    );

    info!(
        "Posts directory (canonical): {}",
        runtime_paths.posts_dir.display()
    );
    info!(
        "Data directory (canonical): {}",
        runtime_paths.data_dir.display()
    );
    info!("Config file: {}", runtime_paths.config_file.display());
    info!("Runtime root: {}", runtime_paths.root.display());
}

struct ParsedArgs {
    runtime_root: std::path::PathBuf,
    show_help: bool,
}

fn parse_args() -> Result<ParsedArgs, String> {
    parse_args_from(std::env::args().skip(1))
}

fn parse_args_from<I>(args: I) -> Result<ParsedArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut runtime_root = std::path::PathBuf::from(".");
    let mut show_help = false;

    while let Some(arg) = args.next() {
        if arg == "-h" || arg == "--help" {
            show_help = true;
        } else if arg == "-C" {
            let value = args
                .next()
                .ok_or_else(|| "Missing value for -C".to_string())?;
            runtime_root = std::path::PathBuf::from(value);
        } else {
            return Err(format!("Unknown argument: {}", arg));
        }
    }

    let runtime_root = make_runtime_root_absolute(runtime_root)?;
    Ok(ParsedArgs {
        runtime_root,
        show_help,
    })
}

fn make_runtime_root_absolute(
    runtime_root: std::path::PathBuf,
) -> Result<std::path::PathBuf, String> {
    if runtime_root.is_absolute() {
        return Ok(runtime_root);
    }

    let current_dir = std::env::current_dir()
        .map_err(|error| format!("Failed to resolve current directory: {}", error))?;
    Ok(current_dir.join(runtime_root))
}

fn help_text() -> &'static str {
    "folio - personal portfolio, resume and blog server\n\
     \n\
     Usage: folio [-C <root>] [-h|--help]\n\
     \n\
     Options:\n\
       -C <root>    Runtime directory (default: current directory)\n\
       -h, --help   Show this help\n"
}
