mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{ALPHA, BETA, CHANNEL, alpha, beta, cast, drain, scripted_factory};
use duel_core::{DuelConfig, FixedRewardRng, MatchOutcome, ResourceAxis, ResourcePool, Side};
use duel_runtime::{
    BattleSession, CastEvent, DuelError, Event, InMemoryUserRepo, LoopExit, MatchEvent,
    MemoryTransport, SessionConfig, Topic,
};

struct Fixture {
    transport: Arc<MemoryTransport>,
    repository: Arc<InMemoryUserRepo>,
    session: BattleSession,
}

fn fixture(alpha_record: ResourcePool, beta_record: ResourcePool) -> Fixture {
    let transport = Arc::new(MemoryTransport::new());
    let repository = Arc::new(
        InMemoryUserRepo::new()
            .with_user(ALPHA, alpha_record)
            .with_user(BETA, beta_record),
    );
    let session = BattleSession::builder()
        .config(SessionConfig {
            duel: DuelConfig::default(),
            event_buffer_size: 64,
        })
        .transport(transport.clone())
        .repository(repository.clone())
        .spell_factory(scripted_factory)
        .rng(Arc::new(FixedRewardRng::new(ResourceAxis::Mp, 0.5)))
        .build()
        .expect("session should build");

    Fixture {
        transport,
        repository,
        session,
    }
}

/// Alpha casts once, Beta never does: the hit lands, nobody is defeated, and
/// the match is abandoned once both casters go quiet.
#[tokio::test(start_paused = true)]
async fn test_one_sided_cast_then_silence() {
    let fx = fixture(ResourcePool::STARTING, ResourcePool::STARTING);
    cast(&fx.transport, ALPHA, &["power 30"]);

    let report = fx
        .session
        .start(alpha(), beta(), CHANNEL)
        .await
        .expect("match should run");

    assert!(report.is_abandoned());
    assert_eq!(report.rounds, 1);
    assert_eq!(report.pool(Side::Beta), ResourcePool::new(70, 100));
    assert_eq!(report.pool(Side::Alpha), ResourcePool::new(100, 92));

    let texts = fx.transport.sent_texts();
    assert_eq!(texts.first().map(String::as_str), Some("Game start!"));
    assert!(texts.contains(&"@alpha deals 30 damage to @beta!".to_owned()));
    assert!(texts.contains(&"@beta\n HP: 70\n MP: 100".to_owned()));

    // In-battle damage never reaches the store.
    assert_eq!(fx.repository.record(BETA), Some(ResourcePool::STARTING));
}

#[tokio::test(start_paused = true)]
async fn test_mutual_knockout_is_a_draw() {
    let fx = fixture(ResourcePool::new(20, 100), ResourcePool::new(20, 100));
    let mut matches = fx.session.subscribe(Topic::Match);
    cast(&fx.transport, ALPHA, &["power 50"]);
    cast(&fx.transport, BETA, &["power 50"]);

    let report = fx
        .session
        .start(alpha(), beta(), CHANNEL)
        .await
        .expect("match should run");

    assert_eq!(report.outcome, Some(MatchOutcome::Draw));
    assert_eq!(report.rounds, 1);
    assert_eq!(report.alpha.hp, -30);
    assert_eq!(report.beta.hp, -30);

    let finished = drain(&mut matches)
        .into_iter()
        .filter(|event| matches!(event, Event::Match(MatchEvent::Finished { .. })))
        .count();
    assert_eq!(finished, 1);

    assert_eq!(fx.repository.record(ALPHA), Some(ResourcePool::new(20, 100)));
    assert_eq!(fx.repository.record(BETA), Some(ResourcePool::new(20, 100)));
}

#[tokio::test(start_paused = true)]
async fn test_victory_transfers_reward() {
    let fx = fixture(ResourcePool::STARTING, ResourcePool::new(30, 100));
    let mut matches = fx.session.subscribe(Topic::Match);
    cast(&fx.transport, ALPHA, &["power 40"]);

    let report = fx
        .session
        .start(alpha(), beta(), CHANNEL)
        .await
        .expect("match should run");

    assert_eq!(
        report.outcome,
        Some(MatchOutcome::Victory {
            winner: Side::Alpha
        })
    );
    assert_eq!(report.beta.hp, -10);

    // 200 / 130 lands in the 5% bracket; MP 100 gives +7 / -5.
    assert_eq!(fx.repository.record(ALPHA), Some(ResourcePool::new(100, 107)));
    assert_eq!(fx.repository.record(BETA), Some(ResourcePool::new(30, 95)));

    let texts = fx.transport.sent_texts();
    assert!(texts.contains(&"@alpha wins!".to_owned()));
    assert!(texts.contains(&"@beta, MP: 100 -> 95".to_owned()));

    let settled = drain(&mut matches).into_iter().find_map(|event| match event {
        Event::Match(MatchEvent::RewardSettled(settlement)) => Some(settlement),
        _ => None,
    });
    let settlement = settled.expect("reward should be published");
    assert_eq!(settlement.plan.gain, 7);
    assert_eq!(settlement.plan.loss, 5);
}

#[tokio::test(start_paused = true)]
async fn test_multi_round_match() {
    let fx = fixture(ResourcePool::STARTING, ResourcePool::STARTING);
    for _ in 0..4 {
        cast(&fx.transport, ALPHA, &["power 30"]);
    }
    cast(&fx.transport, BETA, &["guard 10", "power 5"]);

    let report = fx
        .session
        .start(alpha(), beta(), CHANNEL)
        .await
        .expect("match should run");

    // Round 1: 30 - 10 guard = 20 to Beta, 5 to Alpha. Rounds 2-4: 30 each.
    assert_eq!(report.rounds, 4);
    assert_eq!(report.beta.hp, -10);
    assert_eq!(report.alpha.hp, 95);
    assert_eq!(
        report.outcome,
        Some(MatchOutcome::Victory {
            winner: Side::Alpha
        })
    );
}

#[tokio::test(start_paused = true)]
async fn test_closed_transport_abandons_match() {
    let fx = fixture(ResourcePool::STARTING, ResourcePool::STARTING);
    let mut casts = fx.session.subscribe(Topic::Cast);

    let closer = async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        fx.transport.close();
    };
    let (report, ()) = tokio::join!(fx.session.start(alpha(), beta(), CHANNEL), closer);
    let report = report.expect("match should run");

    assert!(report.is_abandoned());
    assert_eq!(report.rounds, 0);

    let exits: Vec<_> = drain(&mut casts)
        .into_iter()
        .filter_map(|event| match event {
            Event::Cast(CastEvent::LoopExited { exit, .. }) => Some(exit),
            _ => None,
        })
        .collect();
    assert_eq!(exits, [LoopExit::TransportClosed, LoopExit::TransportClosed]);
}

#[tokio::test(start_paused = true)]
async fn test_panicking_loop_cancels_its_opponent() {
    let fx = fixture(ResourcePool::STARTING, ResourcePool::STARTING);
    let config = DuelConfig::default();
    fx.transport.deliver(CHANNEL, ALPHA, config.trigger_token.as_str());
    fx.transport.deliver(CHANNEL, ALPHA, config.generate_token.as_str());
    fx.transport.deliver(CHANNEL, ALPHA, "boom");

    let result = fx.session.start(alpha(), beta(), CHANNEL).await;
    assert!(matches!(result, Err(DuelError::WorkerJoin(ref err)) if err.is_panic()));

    // Beta's loop is gone: nothing reads or answers its cast.
    let posted = fx.transport.sent_texts().len();
    cast(&fx.transport, BETA, &["power 10"]);
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(fx.transport.sent_texts().len(), posted);
    assert_eq!(fx.transport.pending(), 4);
}

#[tokio::test]
async fn test_start_fails_when_store_rejects_user() {
    let transport = Arc::new(MemoryTransport::new());
    let session = BattleSession::builder()
        .transport(transport.clone())
        .repository(Arc::new(
            InMemoryUserRepo::strict().with_user(ALPHA, ResourcePool::STARTING),
        ))
        .spell_factory(scripted_factory)
        .build()
        .expect("session should build");

    let result = session.start(alpha(), beta(), CHANNEL).await;
    assert!(matches!(result, Err(DuelError::Repository(_))));
    // Both records load before the match is announced.
    assert!(transport.sent_texts().is_empty());
}
