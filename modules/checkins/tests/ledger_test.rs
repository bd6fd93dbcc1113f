mod common;

use std::sync::Arc;

use anyhow::Result;
use common::{create_test_repo, d, seed_user, service_on, RecordingPublisher};

use checkins::contract::model::{CheckIn, Identity, PowerTier, TimelineDay, UserId, UserStats};
use checkins::domain::error::DomainError;
use checkins::domain::events::CheckInDomainEvent;
use checkins::domain::ports::FixedClock;
use checkins::domain::repo::CheckInsRepository;
use checkins::domain::service::Service;

#[tokio::test]
async fn first_check_in_starts_streak_and_power() -> Result<()> {
    let repo = create_test_repo().await;
    seed_user(&repo, "u-1", "2024-01-01").await?;
    let service = service_on(repo.clone(), "2024-01-01");
    let id = UserId::from("u-1");

    assert!(!service.has_checked_in_today(&id).await?);

    let outcome = service.create_check_in(&id).await?;
    assert_eq!(outcome.check_in.date, d("2024-01-01"));
    assert!(outcome.check_in.completed);
    assert_eq!(outcome.user.stats.current_streak, 1);
    assert_eq!(outcome.user.stats.max_streak, 1);
    assert_eq!(outcome.user.stats.power, 1);
    assert_eq!(outcome.user.stats.last_check_in_date, Some(d("2024-01-01")));

    assert!(service.has_checked_in_today(&id).await?);
    let stored = service.get_user(&id).await?;
    assert_eq!(stored.stats, outcome.user.stats);
    Ok(())
}

#[tokio::test]
async fn second_check_in_same_day_is_rejected_without_side_effects() -> Result<()> {
    let repo = create_test_repo().await;
    seed_user(&repo, "u-1", "2024-01-01").await?;
    let service = service_on(repo.clone(), "2024-01-02");
    let id = UserId::from("u-1");

    let first = service.create_check_in(&id).await?;

    match service.create_check_in(&id).await {
        Err(DomainError::DuplicateCheckIn { user_id, date }) => {
            assert_eq!(user_id, id);
            assert_eq!(date, d("2024-01-02"));
        }
        other => panic!("expected DuplicateCheckIn, got {other:?}"),
    }

    let after = service.get_user(&id).await?;
    assert_eq!(after.stats, first.user.stats);
    assert_eq!(repo.list_check_in_dates(&id).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn missing_user_fails_and_writes_nothing() -> Result<()> {
    let repo = create_test_repo().await;
    let service = service_on(repo.clone(), "2024-01-02");
    let id = UserId::from("ghost");

    match service.create_check_in(&id).await {
        Err(DomainError::UserNotFound { user_id }) => assert_eq!(user_id, id),
        other => panic!("expected UserNotFound, got {other:?}"),
    }

    assert!(repo.find_check_in(&id, d("2024-01-02")).await?.is_none());
    assert!(repo.list_check_in_dates(&id).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn consecutive_days_extend_and_gaps_reset() -> Result<()> {
    let repo = create_test_repo().await;
    seed_user(&repo, "u-1", "2024-01-01").await?;
    let id = UserId::from("u-1");

    let days = [
        ("2024-01-01", 1, 1),
        ("2024-01-02", 2, 2),
        ("2024-01-03", 3, 3),
        // two-day gap
        ("2024-01-06", 1, 3),
        ("2024-01-07", 2, 3),
    ];

    for (power, (today, streak, max)) in days.into_iter().enumerate() {
        let outcome = service_on(repo.clone(), today).create_check_in(&id).await?;
        let stats = outcome.user.stats;
        assert_eq!(stats.current_streak, streak, "streak on {today}");
        assert_eq!(stats.max_streak, max, "max streak on {today}");
        assert_eq!(stats.power as usize, power + 1, "power on {today}");
        assert!(stats.current_streak <= stats.max_streak);
    }

    // power always matches the number of stored check-ins
    let user = service_on(repo.clone(), "2024-01-07").get_user(&id).await?;
    let records = repo.list_check_in_dates(&id).await?;
    assert_eq!(user.stats.power as usize, records.len());
    Ok(())
}

#[tokio::test]
async fn timeline_marks_missed_and_completed_days() -> Result<()> {
    let repo = create_test_repo().await;
    seed_user(&repo, "u-1", "2024-01-01").await?;
    let id = UserId::from("u-1");

    let empty = service_on(repo.clone(), "2024-01-03").timeline(&id).await?;
    assert_eq!(
        empty,
        vec![
            TimelineDay { date: d("2024-01-03"), completed: false },
            TimelineDay { date: d("2024-01-02"), completed: false },
            TimelineDay { date: d("2024-01-01"), completed: false },
        ]
    );

    service_on(repo.clone(), "2024-01-02").create_check_in(&id).await?;
    let timeline = service_on(repo.clone(), "2024-01-03").timeline(&id).await?;
    let completed: Vec<bool> = timeline.iter().map(|t| t.completed).collect();
    assert_eq!(completed, vec![false, true, false]);
    Ok(())
}

#[tokio::test]
async fn status_reports_today_and_tier() -> Result<()> {
    let repo = create_test_repo().await;
    seed_user(&repo, "u-1", "2024-01-01").await?;
    let id = UserId::from("u-1");

    let before = service_on(repo.clone(), "2024-01-01").status(&id).await?;
    assert!(!before.checked_in_today);
    assert_eq!(before.today, d("2024-01-01"));
    assert_eq!(before.tier, PowerTier::Beginner);

    service_on(repo.clone(), "2024-01-01").create_check_in(&id).await?;
    let after = service_on(repo.clone(), "2024-01-01").status(&id).await?;
    assert!(after.checked_in_today);
    assert_eq!(after.user.stats.power, 1);

    let next_day = service_on(repo.clone(), "2024-01-02").status(&id).await?;
    assert!(!next_day.checked_in_today);
    Ok(())
}

#[tokio::test]
async fn ensure_user_creates_once_and_publishes_event() -> Result<()> {
    let repo = create_test_repo().await;
    let events = Arc::new(RecordingPublisher::default());
    let service = Service::new(
        repo.clone(),
        events.clone(),
        Arc::new(FixedClock::new(d("2024-01-01"))),
    );
    let identity = Identity {
        user_id: UserId::from("u-1"),
        email: Some("me@example.com".to_string()),
    };

    let created = service.ensure_user(identity.clone()).await?;
    assert_eq!(created.stats.power, 0);
    assert_eq!(created.stats.last_check_in_date, None);
    assert_eq!(created.email.as_deref(), Some("me@example.com"));

    let again = service.ensure_user(identity).await?;
    assert_eq!(again.id, created.id);
    assert_eq!(again.stats, created.stats);

    let events = events.events.lock();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], CheckInDomainEvent::UserCreated { .. }));
    Ok(())
}

#[tokio::test]
async fn check_in_publishes_event() -> Result<()> {
    let repo = create_test_repo().await;
    seed_user(&repo, "u-1", "2024-01-01").await?;
    let events = Arc::new(RecordingPublisher::default());
    let service = Service::new(
        repo.clone(),
        events.clone(),
        Arc::new(FixedClock::new(d("2024-01-01"))),
    );

    service.create_check_in(&UserId::from("u-1")).await?;

    let events = events.events.lock();
    match events.as_slice() {
        [CheckInDomainEvent::CheckedIn { date, current_streak, power, .. }] => {
            assert_eq!(*date, d("2024-01-01"));
            assert_eq!(*current_streak, 1);
            assert_eq!(*power, 1);
        }
        other => panic!("unexpected events: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn concurrent_check_ins_yield_exactly_one_record() -> Result<()> {
    let repo = create_test_repo().await;
    seed_user(&repo, "u-1", "2024-01-01").await?;
    let service = Arc::new(service_on(repo.clone(), "2024-01-05"));
    let id = UserId::from("u-1");

    let (a, b) = tokio::join!(service.create_check_in(&id), service.create_check_in(&id));

    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "results: {a:?} / {b:?}");
    assert!(
        matches!(a, Err(DomainError::DuplicateCheckIn { .. }))
            || matches!(b, Err(DomainError::DuplicateCheckIn { .. }))
    );

    let user = service.get_user(&id).await?;
    assert_eq!(user.stats.power, 1);
    assert_eq!(user.stats.current_streak, 1);
    assert_eq!(repo.list_check_in_dates(&id).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn repository_insert_collision_leaves_counters_untouched() -> Result<()> {
    let repo = create_test_repo().await;
    let user = seed_user(&repo, "u-1", "2024-01-01").await?;
    let check_in = CheckIn {
        user_id: user.id.clone(),
        date: d("2024-01-01"),
        completed: true,
        created_at: user.created_at,
    };
    let first = UserStats::default().after_check_in(d("2024-01-01"));
    let bogus = UserStats {
        current_streak: 9,
        max_streak: 9,
        power: 9,
        last_check_in_date: Some(d("2024-01-01")),
    };

    assert!(repo.record_check_in(&check_in, &first).await?);
    assert!(!repo.record_check_in(&check_in, &bogus).await?);
    assert!(!repo.insert_check_in(&check_in).await?);

    let stored = repo.find_user(&user.id).await?.expect("seeded user");
    assert_eq!(stored.stats, first);
    assert_eq!(repo.list_check_in_dates(&user.id).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn user_created_through_service_gets_full_timeline() -> Result<()> {
    let repo = create_test_repo().await;
    let identity = Identity {
        user_id: UserId::from("u-1"),
        email: None,
    };

    let created = service_on(repo.clone(), "2024-01-01").ensure_user(identity).await?;
    assert_eq!(created.created_at.date_naive(), d("2024-01-01"));

    service_on(repo.clone(), "2024-01-03").create_check_in(&created.id).await?;
    let timeline = service_on(repo.clone(), "2024-01-04").timeline(&created.id).await?;

    let dates: Vec<_> = timeline.iter().map(|t| (t.date, t.completed)).collect();
    assert_eq!(
        dates,
        vec![
            (d("2024-01-04"), false),
            (d("2024-01-03"), true),
            (d("2024-01-02"), false),
            (d("2024-01-01"), false),
        ]
    );
    Ok(())
}
