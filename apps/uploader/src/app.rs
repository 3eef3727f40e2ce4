//! Upload run: reads files, feeds the engine, waits for every chain.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chunkup_client::{HttpClientOptions, HttpTransferClient};
use chunkup_engine::{EngineConfig, FileState, UploadEngine};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::{error, info, warn};

use crate::config::Config;

/// Terminal-state tally for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub completed: usize,
    pub failed: usize,
    pub aborted: usize,
}

impl Summary {
    fn record(&mut self, state: FileState) {
        match state {
            FileState::Completed => self.completed += 1,
            FileState::Aborted => self.aborted += 1,
            _ => self.failed += 1,
        }
    }

    pub fn all_completed(&self) -> bool {
        self.failed == 0 && self.aborted == 0
    }
}

/// Uploads `files` in argument order and waits for all of them.
///
/// Every file is read before the first request goes out, so an unreadable
/// path fails the run without starting anything.
pub async fn run(config: Config, files: Vec<PathBuf>) -> anyhow::Result<Summary> {
    let mut inputs = Vec::with_capacity(files.len());
    for path in &files {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        inputs.push((display_name(path), bytes));
    }

    let client = HttpTransferClient::new(HttpClientOptions {
        base_url: (!config.base_url.is_empty()).then(|| config.base_url.clone()),
        timeout: config.timeout(),
    })?;

    let blocks = config.clone();
    let engine_config = EngineConfig::new()
        .url(config.url.clone())
        .on_blocksize(move |total| blocks.block_size(total))
        .filename_encoder(|name| utf8_percent_encode(name, NON_ALPHANUMERIC).to_string())
        .on_progress(|index, percent, name| {
            info!(index, file = %name, percent, "chunk accepted");
        })
        .on_error(|index, percent, name| {
            error!(index, file = %name, percent, "upload failed");
        });
    let engine = Arc::new(UploadEngine::new(engine_config, Arc::new(client)));

    let indices: Vec<usize> = inputs
        .into_iter()
        .map(|(name, bytes)| engine.register_and_start(name, bytes))
        .collect::<Result<_, _>>()?;

    let interrupt = {
        let engine = Arc::clone(&engine);
        let indices = indices.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, aborting uploads");
                for index in indices {
                    engine.abort(index);
                }
            }
        })
    };

    let mut summary = Summary::default();
    for index in indices {
        let state = engine.join(index).await?;
        summary.record(state);
    }
    interrupt.abort();

    Ok(summary)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
