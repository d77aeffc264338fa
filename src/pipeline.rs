//! Three-stage pipeline: fetch, reduce, present.
//!
//! The fetcher and reducer run as separate tasks joined by single-slot
//! handoffs; ownership of the data moves wholesale across each channel, so
//! no state is ever shared between stages. The main task is the presenter
//! and the only consumer of the final groups.

use anyhow::{Context, Result};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::client::AqlClient;
use crate::config::Config;
use crate::rank::{self, RankGroup};
use crate::report;

pub async fn run(config: Config) -> Result<()> {
    let output = config.output;

    let (set_tx, set_rx) = oneshot::channel();
    let (group_tx, mut group_rx) = mpsc::channel::<RankGroup>(1);

    let client = AqlClient::new(&config);
    let fetcher = tokio::spawn(async move {
        let results = client.search().await.context("artifactory query failed")?;
        set_tx
            .send(results)
            .map_err(|_| anyhow::anyhow!("reducer stage went away"))?;
        Ok::<_, anyhow::Error>(())
    });

    let reducer = tokio::spawn(async move {
        let results = set_rx.await.context("fetcher stage went away")?;
        debug!(items = results.results.len(), "reducing result set");

        let (top1, top2) = rank::top_two(results.results);

        // fixed order: top1 first, then top2
        group_tx.send(top1).await.context("presenter went away")?;
        group_tx.send(top2).await.context("presenter went away")?;
        Ok::<_, anyhow::Error>(())
    });

    let top1 = group_rx.recv().await;
    let top2 = group_rx.recv().await;

    // stage errors must surface before the bare channel-closed one
    fetcher.await.context("fetcher task panicked")??;
    reducer.await.context("reducer task panicked")??;

    let (top1, top2) = top1
        .zip(top2)
        .context("pipeline closed before producing both rank groups")?;

    report::print_report(top1, top2, output)
}
