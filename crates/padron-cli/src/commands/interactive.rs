use crate::output::OutputWriter;
use crate::render::Renderer;
use anyhow::{Context, Result};
use padron_core::config::LayeredConfig;
use padron_core::{Applied, Completion};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Search loop over stdin lines.
///
/// Fetches run on spawned tasks so input stays responsive while a request
/// is in flight; a new line supersedes the pending search and its late
/// response is dropped when it arrives.
pub async fn execute(output: &OutputWriter, config: &LayeredConfig) -> Result<bool> {
    let mut controller = super::build_controller(config)?;
    let presenter = config.presenter();
    let mut renderer = Renderer::new(output);

    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    renderer.show(&presenter.select_view(controller.state()))?;

    // Keep going until input is exhausted and the latest search has landed
    while stdin_open || controller.is_loading() {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                match line.context("Failed to read from stdin")? {
                    Some(line) => {
                        controller.set_query(line);
                        if let Some(pending) = controller.submit() {
                            let tx = tx.clone();
                            tokio::spawn(async move {
                                // The receiver only goes away when the loop has ended
                                let _ = tx.send(pending.run().await);
                            });
                            renderer.show(&presenter.select_view(controller.state()))?;
                        }
                    }
                    None => stdin_open = false,
                }
            }
            Some(completion) = rx.recv() => {
                let query = completion.query().clone();
                match controller.apply(completion) {
                    Applied::Current => renderer.show(&presenter.select_view(controller.state()))?,
                    Applied::Stale => {
                        output.warning(format!("Discarded superseded response for '{}'", query))
                    }
                }
            }
        }
    }

    Ok(true)
}
