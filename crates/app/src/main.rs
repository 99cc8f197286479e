mod config;
mod orchestrator;
mod providers;
mod sink;
mod units;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::FixedOffset;
use clap::Parser;

use config::{Args, Config};
use orchestrator::{HttpProbe, HttpSource, Orchestrator, SystemClock};
use sink::{FileSink, LogPanel, PanelSink, Sink};

fn main() -> Result<()> {
    env_logger::init();

    let cfg = Config::load(Args::parse())?;
    let offset = FixedOffset::east_opt(cfg.utc_offset).context("invalid utc offset")?;

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            log::info!("interrupt received");
            shutdown.store(true, Ordering::SeqCst);
        })
        .context("unable to register the interrupt handler")?;
    }

    let sink: Box<dyn Sink> = match &cfg.out {
        Some(path) => Box::new(FileSink::new(path.clone())),
        None => Box::new(PanelSink::new(LogPanel)),
    };

    let mut orchestrator = Orchestrator::new(
        cfg.clone(),
        sink,
        SystemClock::new(offset),
        HttpSource::new(cfg.clone()),
        HttpProbe,
        shutdown,
    );

    if cfg.once {
        orchestrator.run_once();
    } else {
        orchestrator.run();
    }

    Ok(())
}
