// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Floorgrid CLI entrypoint.
//!
//! Runs the interactive grid editor. Service calls go to the configured HTTP backend, or to an
//! in-memory store with `--offline`.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use floorgrid::config::Config;
use floorgrid::service::{Backend, HttpBackend, MemoryBackend};
use floorgrid::tui::RunOptions;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--config <file>] [--server <url> | --offline] [--grid <id>]\n  {program} [--rows <n> --columns <n>] [--log-file <file>] [--log-level <level>]\n  {program} --demo [--offline]\n\n--server overrides service.base_url from the config file (http:// only).\n--offline keeps grids, images and products in memory; pathfinding is unavailable.\n--grid loads a stored grid on startup; --demo starts from a sample warehouse floor.\n--rows/--columns start with a blank grid of that size (both are required)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    config: Option<PathBuf>,
    server: Option<String>,
    offline: bool,
    grid_id: Option<String>,
    rows: Option<usize>,
    columns: Option<usize>,
    log_file: Option<PathBuf>,
    log_level: Option<String>,
    demo: bool,
}

impl CliOptions {
    fn grid_size(&self) -> Option<(usize, usize)> {
        self.rows.zip(self.columns)
    }

    fn apply(&self, config: &mut Config) {
        if let Some(server) = &self.server {
            config.service.base_url.clone_from(server);
        }
        if self.offline {
            config.service.offline = true;
        }
        if let Some(file) = &self.log_file {
            config.logging.file.clone_from(file);
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T) -> Result<(), ()> {
    if slot.is_some() {
        return Err(());
    }
    *slot = Some(value);
    Ok(())
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => set_once(&mut options.config, PathBuf::from(args.next().ok_or(())?))?,
            "--server" => set_once(&mut options.server, args.next().ok_or(())?)?,
            "--grid" => set_once(&mut options.grid_id, args.next().ok_or(())?)?,
            "--rows" => {
                let raw = args.next().ok_or(())?;
                set_once(&mut options.rows, raw.parse().map_err(|_| ())?)?;
            }
            "--columns" => {
                let raw = args.next().ok_or(())?;
                set_once(&mut options.columns, raw.parse().map_err(|_| ())?)?;
            }
            "--log-file" => {
                set_once(&mut options.log_file, PathBuf::from(args.next().ok_or(())?))?;
            }
            "--log-level" => set_once(&mut options.log_level, args.next().ok_or(())?)?,
            "--offline" => {
                if options.offline {
                    return Err(());
                }
                options.offline = true;
            }
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            _ => return Err(()),
        }
    }

    if options.rows.is_some() != options.columns.is_some() {
        return Err(());
    }
    if options.offline && options.server.is_some() {
        return Err(());
    }
    if options.demo && (options.grid_id.is_some() || options.rows.is_some()) {
        return Err(());
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "floorgrid".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let mut config = Config::load(options.config.as_deref())?;
        options.apply(&mut config);
        config.validate()?;
        floorgrid::logging::init(&config.logging)?;

        let backend: Arc<dyn Backend> = if config.service.offline {
            Arc::new(MemoryBackend::new())
        } else {
            Arc::new(HttpBackend::from_config(&config.service)?)
        };
        tracing::info!(backend = %backend.describe(), "starting floorgrid");

        let run_options = RunOptions {
            config,
            backend,
            grid_id: options.grid_id.clone(),
            grid_size: options.grid_size(),
            demo: options.demo,
        };

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        runtime.block_on(async move {
            let handle = tokio::runtime::Handle::current();
            let tui_join = tokio::task::spawn_blocking(move || {
                floorgrid::tui::run(run_options, handle).map_err(|err| err.to_string())
            })
            .await;

            let tui_result = tui_join.map_err(|err| -> Box<dyn Error> { Box::new(err) })?;
            tui_result.map_err(|err| {
                Box::new(std::io::Error::new(std::io::ErrorKind::Other, err)) as Box<dyn Error>
            })?;
            Ok::<(), Box<dyn Error>>(())
        })?;

        tracing::info!("floorgrid exited");
        Ok(())
    })();

    if let Err(err) = result {
        tracing::error!(error = %err, "floorgrid failed");
        eprintln!("floorgrid: {err}");
        std::process::exit(1);
    }
}
