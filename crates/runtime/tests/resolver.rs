mod common;

use std::time::Duration;

use common::{ALPHA, Arena, BETA, drain, spell};
use duel_core::{MatchOutcome, ResourcePool, Side};
use duel_runtime::{Event, MatchEvent, RoundEvent, Submission, Topic};
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_simultaneous_submissions_share_one_round() {
    let arena = Arena::new(ResourcePool::STARTING, ResourcePool::STARTING);
    let mut rounds = arena.event_bus.subscribe(Topic::Round);

    let alpha = {
        let resolver = arena.resolver.clone();
        tokio::spawn(async move { resolver.submit(Side::Alpha, spell(30, 0)).await })
    };
    let beta = {
        let resolver = arena.resolver.clone();
        tokio::spawn(async move { resolver.submit(Side::Beta, spell(10, 0)).await })
    };

    let alpha = alpha.await.expect("alpha submit should not panic");
    let beta = beta.await.expect("beta submit should not panic");

    assert!(
        matches!(
            (alpha, beta),
            (Submission::Opened { round: 1 }, Submission::Joined { round: 1 })
                | (Submission::Joined { round: 1 }, Submission::Opened { round: 1 })
        ),
        "exactly one side opens the window: {alpha:?} / {beta:?}"
    );
    assert_eq!(arena.resolver.rounds_resolved(), 1);

    let pools = arena.resolver.pools().await;
    assert_eq!(pools[Side::Alpha.index()].hp, 90);
    assert_eq!(pools[Side::Beta.index()].hp, 70);

    let events = drain(&mut rounds);
    assert_eq!(events.len(), 1, "one round resolved");
    assert!(matches!(
        events[0],
        Event::Round(RoundEvent { round: 1, .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_submission_within_delay_joins_round() {
    let arena = Arena::new(ResourcePool::STARTING, ResourcePool::STARTING);
    let started = Instant::now();

    let alpha = {
        let resolver = arena.resolver.clone();
        tokio::spawn(async move { resolver.submit(Side::Alpha, spell(25, 0)).await })
    };

    tokio::time::sleep(Duration::from_secs(4)).await;
    let beta = arena.resolver.submit(Side::Beta, spell(15, 5)).await;

    assert_eq!(beta, Submission::Joined { round: 1 });
    assert_eq!(
        alpha.await.expect("alpha submit should not panic"),
        Submission::Opened { round: 1 }
    );
    // The window is timed from the opener, not the joiner.
    assert_eq!(started.elapsed(), Duration::from_secs(5));

    let pools = arena.resolver.pools().await;
    assert_eq!(pools[Side::Beta.index()].hp, 80, "25 dealt minus 5 defence");
    assert_eq!(pools[Side::Alpha.index()].hp, 85);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_opener_still_counts() {
    let arena = Arena::new(ResourcePool::STARTING, ResourcePool::STARTING);

    let alpha = {
        let resolver = arena.resolver.clone();
        tokio::spawn(async move { resolver.submit(Side::Alpha, spell(30, 0)).await })
    };
    tokio::time::sleep(Duration::from_secs(2)).await;
    alpha.abort();

    let beta = arena.resolver.submit(Side::Beta, spell(10, 0)).await;
    assert_eq!(beta, Submission::Joined { round: 1 });

    let err = alpha.await.unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(arena.resolver.rounds_resolved(), 1);

    // The opener's spell was recorded before it was cancelled.
    let pools = arena.resolver.pools().await;
    assert_eq!(pools[Side::Beta.index()].hp, 70);
    assert_eq!(pools[Side::Alpha.index()].hp, 90);
}

#[tokio::test(start_paused = true)]
async fn test_late_submission_opens_next_round() {
    let arena = Arena::new(ResourcePool::STARTING, ResourcePool::STARTING);

    let alpha = {
        let resolver = arena.resolver.clone();
        tokio::spawn(async move { resolver.submit(Side::Alpha, spell(30, 0)).await })
    };

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(arena.resolver.rounds_resolved(), 1);

    let beta = arena.resolver.submit(Side::Beta, spell(20, 0)).await;
    assert_eq!(beta, Submission::Opened { round: 2 });
    assert_eq!(
        alpha.await.expect("alpha submit should not panic"),
        Submission::Opened { round: 1 }
    );

    let pools = arena.resolver.pools().await;
    assert_eq!(pools[Side::Beta.index()].hp, 70);
    assert_eq!(pools[Side::Alpha.index()].hp, 80);
    assert_eq!(arena.resolver.rounds_resolved(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_one_sided_round_reports_status_quietly() {
    let arena = Arena::new(ResourcePool::STARTING, ResourcePool::STARTING);

    arena.resolver.submit(Side::Alpha, spell(30, 0)).await;

    let sent = arena.transport.sent();
    let texts: Vec<_> = sent.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(
        texts,
        [
            "@alpha deals 30 damage to @beta!",
            "@beta deals 0 damage to @alpha!",
            "@alpha\n HP: 100\n MP: 100",
            "@beta\n HP: 70\n MP: 100",
        ]
    );
    assert!(sent[0].options.notify_mentions);
    assert!(!sent[2].options.notify_mentions);
    assert!(!sent[3].options.notify_mentions);
    assert!(!arena.resolver.is_finished().await);
}

#[tokio::test(start_paused = true)]
async fn test_simultaneous_defeat_is_a_draw_without_reward() {
    let arena = Arena::new(ResourcePool::new(20, 100), ResourcePool::new(20, 100));
    let mut matches = arena.event_bus.subscribe(Topic::Match);
    let mut match_done = arena.resolver.subscribe_match_done();

    let alpha = {
        let resolver = arena.resolver.clone();
        tokio::spawn(async move { resolver.submit(Side::Alpha, spell(50, 0)).await })
    };
    arena.resolver.submit(Side::Beta, spell(50, 0)).await;
    alpha.await.expect("alpha submit should not panic");

    assert!(match_done.has_changed().expect("resolver alive"));
    assert_eq!(*match_done.borrow_and_update(), Some(MatchOutcome::Draw));
    assert_eq!(arena.resolver.outcome(), Some(MatchOutcome::Draw));

    let events = drain(&mut matches);
    assert_eq!(events.len(), 1, "only the finish is published: {events:?}");
    assert!(matches!(
        events[0],
        Event::Match(MatchEvent::Finished {
            outcome: MatchOutcome::Draw,
            rounds: 1
        })
    ));

    assert_eq!(arena.repository.record(ALPHA), Some(ResourcePool::STARTING));
    assert_eq!(arena.repository.record(BETA), Some(ResourcePool::STARTING));
    assert!(
        arena
            .transport
            .sent_texts()
            .iter()
            .any(|text| text.contains("draw"))
    );
}

#[tokio::test(start_paused = true)]
async fn test_submission_after_finish_is_ignored() {
    let arena = Arena::new(ResourcePool::STARTING, ResourcePool::new(10, 100));

    arena.resolver.submit(Side::Alpha, spell(10, 0)).await;
    assert!(arena.resolver.is_finished().await);

    let started = Instant::now();
    let late = arena.resolver.submit(Side::Beta, spell(99, 0)).await;

    assert_eq!(late, Submission::Ignored);
    assert_eq!(started.elapsed(), Duration::ZERO, "returns without waiting");
    assert_eq!(arena.resolver.rounds_resolved(), 1);
    assert_eq!(arena.resolver.pools().await[Side::Alpha.index()].hp, 100);
}

#[tokio::test(start_paused = true)]
async fn test_victory_pays_reward_before_match_done() {
    let arena = Arena::new(ResourcePool::STARTING, ResourcePool::new(10, 100));
    let mut matches = arena.event_bus.subscribe(Topic::Match);

    arena.resolver.submit(Side::Alpha, spell(30, 0)).await;

    assert_eq!(
        arena.resolver.outcome(),
        Some(MatchOutcome::Victory {
            winner: Side::Alpha
        })
    );

    // Persisted 100/100 on both sides: ratio 1.0, 5% bracket on MP.
    assert_eq!(arena.repository.record(ALPHA), Some(ResourcePool::new(100, 107)));
    assert_eq!(arena.repository.record(BETA), Some(ResourcePool::new(100, 95)));

    let texts = arena.transport.sent_texts();
    let tail: Vec<_> = texts.iter().rev().take(3).rev().map(String::as_str).collect();
    assert_eq!(
        tail,
        ["@alpha wins!", "@alpha, MP: 100 -> 107", "@beta, MP: 100 -> 95"]
    );

    let events = drain(&mut matches);
    assert_eq!(events.len(), 2);
    assert!(matches!(
        events[0],
        Event::Match(MatchEvent::RewardSettled(_))
    ));
    assert!(matches!(
        events[1],
        Event::Match(MatchEvent::Finished { rounds: 1, .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_mp_spending_clamps_at_zero() {
    let arena = Arena::new(ResourcePool::new(100, 3), ResourcePool::STARTING);

    assert!(arena.resolver.spend_mp(Side::Alpha, 3).await);
    assert!(!arena.resolver.spend_mp(Side::Alpha, 1).await);

    let pools = arena.resolver.pools().await;
    assert_eq!(pools[Side::Alpha.index()].mp, 0);
    assert_eq!(pools[Side::Beta.index()].mp, 100);
}
