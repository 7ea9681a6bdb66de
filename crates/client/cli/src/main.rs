//! Console client: a hot-seat duel between two players sharing one terminal.
mod config;
mod console;
mod logging;
mod spell;

use std::sync::Arc;

use anyhow::Result;
use duel_core::{ChannelId, Combatant, UserId};
use duel_runtime::{
    BattleSession, Event, EventBus, InMemoryUserRepo, MatchEvent, StdRewardRng, Topic,
};
use tokio::sync::broadcast::error::RecvError;
use tracing::info;

use config::CliConfig;
use console::ConsoleTransport;
use spell::EmberSpell;

const CHANNEL: ChannelId = ChannelId(1);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env();
    logging::setup_logging();

    let alpha = Combatant::new(UserId(1), "@alpha");
    let beta = Combatant::new(UserId(2), "@beta");

    let transport = Arc::new(ConsoleTransport::new(
        CHANNEL,
        [alpha.clone(), beta.clone()],
    ));
    let rng = match config.rng_seed {
        Some(seed) => StdRewardRng::seeded(seed),
        None => StdRewardRng::from_entropy(),
    };

    let session = BattleSession::builder()
        .config(config.session.clone())
        .transport(transport.clone())
        .repository(Arc::new(InMemoryUserRepo::with_starting_record(
            config.starting_record,
        )))
        .spell_factory(EmberSpell::boxed)
        .rng(Arc::new(rng))
        .build()?;

    print_help(&session);
    spawn_observer(session.event_bus());
    transport.spawn_stdin_reader();

    let report = session.start(alpha, beta, CHANNEL).await?;

    match report.outcome {
        Some(outcome) => info!(?outcome, rounds = report.rounds, "duel over"),
        None => info!(rounds = report.rounds, "duel abandoned"),
    }
    println!(
        "Final pools after {} round(s): alpha {}/{}, beta {}/{}",
        report.rounds, report.alpha.hp, report.alpha.mp, report.beta.hp, report.beta.mp
    );

    Ok(())
}

fn print_help(session: &BattleSession) {
    let duel = session.config();
    eprintln!("Prefix every line with `a` or `b` to speak for that caster.");
    eprintln!(
        "Cast: `{}`, then `{}` ({} MP), then `ignite`/`barrier`, then `{}` ({} MP).",
        duel.trigger_token,
        duel.generate_token,
        duel.generate_cost,
        duel.execute_token,
        duel.execute_cost
    );
    eprintln!("Ctrl-D ends input.");
}

/// Log rounds and rewards as they are published.
fn spawn_observer(bus: &EventBus) {
    let mut rounds = bus.subscribe(Topic::Round);
    let mut matches = bus.subscribe(Topic::Match);

    tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                event = rounds.recv() => event,
                event = matches.recv() => event,
            };
            match event {
                Ok(Event::Round(round)) => {
                    info!(
                        round = round.round,
                        alpha_to_beta = round.exchange.alpha_to_beta,
                        beta_to_alpha = round.exchange.beta_to_alpha,
                        "round observed"
                    );
                }
                Ok(Event::Match(MatchEvent::RewardSettled(settlement))) => {
                    info!(
                        winner = %settlement.winner,
                        axis = %settlement.plan.axis,
                        gain = settlement.plan.gain,
                        loss = settlement.plan.loss,
                        "reward observed"
                    );
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("observer lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}
