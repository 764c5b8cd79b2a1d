// Copyright 2022 Matthew Ingwersen.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you
// may not use this file except in compliance with the License. You may
// obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied. See the License for the specific language governing
// permissions and limitations under the License.

//! Implements the `render` and `install` commands.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::process;

use anyhow::{Context, Result};
use env_logger::Env;
use log::{error, info};

use zonegen::install;
use zonegen::metadata::ZoneFiles;
use zonegen::observer::{DebugDir, NoopObserver, Observer};

use crate::args::{Args, Command, InstallArgs, RenderArgs};
use crate::config;

/// Runs the command given on the command line.
pub fn run(args: Args) {
    env_logger::init_from_env(Env::new().default_filter_or("warn"));

    let result = match args.command {
        Command::Render(render_args) => try_rendering(render_args),
        Command::Install(install_args) => try_installing(install_args),
    };
    if let Err(e) = result {
        let mut message = String::from("Failed to run:");
        for (i, cause) in e.chain().enumerate() {
            write!(message, "\n[{}] {}", i + 1, cause).unwrap();
        }
        message.push_str("\nExiting with failure.");
        error!("{}", message);
        process::exit(1);
    }
    info!("Exiting with success.");
}

fn try_rendering(args: RenderArgs) -> Result<()> {
    info!(
        "zonegen v{}.{}.{} rendering.",
        env!("CARGO_PKG_VERSION_MAJOR"),
        env!("CARGO_PKG_VERSION_MINOR"),
        env!("CARGO_PKG_VERSION_PATCH"),
    );

    let config = config::load(&args)?;
    let mut observer: Box<dyn Observer> = match args.debug_dir {
        Some(ref dir) => Box::new(
            DebugDir::create(dir, &config.name).context("failed to set up debug output")?,
        ),
        None => Box::new(NoopObserver),
    };

    let output = config
        .job()
        .run(observer.as_mut())
        .context("failed to generate the zones")?;
    if output.files.len() == 1 {
        info!("Generated 1 zone file for {}.", config.name);
    } else {
        info!(
            "Generated {} zone files for {}.",
            output.files.len(),
            config.name,
        );
    }

    match args.output {
        Some(ref path) => fs::write(path, &output.blob)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout()
            .write_all(&output.blob)
            .context("failed to write to standard output")?,
    }
    Ok(())
}

fn try_installing(args: InstallArgs) -> Result<()> {
    let blob = fs::read(&args.metadata)
        .with_context(|| format!("failed to read {}", args.metadata.display()))?;
    let files = ZoneFiles::unpack(&blob)
        .with_context(|| format!("failed to unpack {}", args.metadata.display()))?;
    install::install(&files, &args.zone_dir, &args.conf, &args.named_conf)
        .context("failed to install the zones")?;
    info!(
        "Installed {} zones into {}; the name server must be restarted to load them.",
        files.len(),
        args.zone_dir.display(),
    );
    Ok(())
}
