//! `suggest`: a line-driven typeahead.
//!
//! Loads a JSON scope, builds a typeahead controller from a specification
//! string, then treats every stdin line as input text or a command (see
//! [`session`]).

mod cli;
mod session;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use suggest_typeahead::{JsonHost, TypeaheadController, TypeaheadOptions};

use crate::cli::Cli;
use crate::session::Command;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	let data = std::fs::read_to_string(&cli.data)
		.with_context(|| format!("reading {}", cli.data.display()))?;
	let scope: serde_json::Value =
		serde_json::from_str(&data).with_context(|| format!("parsing {}", cli.data.display()))?;

	let options = match &cli.config {
		Some(path) => TypeaheadOptions::load(path)?,
		None => TypeaheadOptions::default(),
	};

	let host = Arc::new(JsonHost::new(scope).with_latency(Duration::from_millis(cli.latency_ms)));
	let mut ctrl = TypeaheadController::builder(cli.spec.as_str(), host)
		.options(options)
		.on_select(|model, m| info!(%model, label = %m.label_text(), "selected"))
		.build()?;

	info!(item = %ctrl.spec().item_name, "ready");

	let mut lines = BufReader::new(tokio::io::stdin()).lines();
	while let Some(line) = lines.next_line().await? {
		let command = match Command::parse(line.trim_end()) {
			Ok(command) => command,
			Err(message) => {
				eprintln!("{message}");
				continue;
			}
		};
		match session::apply(&mut ctrl, command).await {
			Some(out) => print!("{out}"),
			None => break,
		}
	}

	Ok(())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::prelude::*;

	let filter = EnvFilter::try_from_env("SUGGEST_LOG")
		.or_else(|_| EnvFilter::try_from_default_env())
		.unwrap_or_else(|_| {
			if verbose {
				EnvFilter::new("suggest_typeahead=trace,suggest=debug,info")
			} else {
				EnvFilter::new("warn")
			}
		});

	tracing_subscriber::registry()
		.with(filter)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();
}
