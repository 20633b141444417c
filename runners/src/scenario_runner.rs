use anyhow::{Context, Result};
use lib_common::connections::RedisPublisher;
use lib_common::core::{CancellationToken, CentralEngine, DiscardSink, RunOutcome};

mod runner_logic;
use runner_logic::config::{self, SinkTarget};
use runner_logic::{logger, signals};

#[tokio::main]
async fn main() -> Result<()> {
    config::load_dotenv();
    let config = config::load_config();
    logger::setup_logging(&config.diag_log_dir(), config.diag_log_level())?;

    let plan = config.plan().context("invalid configuration")?;
    let mut setup = plan
        .scenario
        .build(&plan.assets_dir)
        .with_context(|| format!("preparing {}", plan.scenario))?;
    let rate = plan.rate.unwrap_or(setup.rate);
    let recurrence = plan.recurrence.unwrap_or(setup.recurrence);
    log::info!("Scenario {}: {}", setup.kind, setup.kind.description());

    let shutdown = CancellationToken::new();
    let watcher = tokio::spawn(signals::watch_signals(shutdown.clone()));

    let mut engine = CentralEngine::new(plan.print, plan.log.clone());
    let result = match &plan.sink {
        SinkTarget::Discard => {
            log::info!("Dry run: payloads are discarded.");
            let mut sink = DiscardSink::new();
            engine
                .run(rate, recurrence, &mut setup.producer, &mut sink, &shutdown)
                .await
        }
        SinkTarget::Redis { url, channel } => {
            // Avoid logging credentials embedded in the URL
            let host = url.split('@').next_back().unwrap_or(url);
            let mut sink = RedisPublisher::connect(url, channel)
                .await
                .with_context(|| format!("connecting to Redis at {}", host))?;
            let result = engine
                .run(rate, recurrence, &mut setup.producer, &mut sink, &shutdown)
                .await;
            log::info!("{} payloads published.", sink.published());
            result
        }
    };
    watcher.abort();

    let outcome = result.with_context(|| format!("{} run failed", setup.kind))?;
    report(&outcome);
    Ok(())
}

fn report(outcome: &RunOutcome) {
    log::info!(
        "{} after {} ticks in {:.3}s ({:.2} Hz effective), {} journaled.",
        if outcome.interrupted { "Interrupted" } else { "Completed" },
        outcome.ticks,
        outcome.elapsed.as_secs_f64(),
        outcome.effective_hz(),
        outcome.journaled
    );
}
