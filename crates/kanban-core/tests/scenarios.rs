//! End-to-end scenarios for the game session.
//!
//! Each test drives a [`Session`] through its public API only: creating
//! cards, assigning work and advancing days, the way a classroom would.

#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::too_many_lines)]

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use kanban_board::columns::{
    ANALYSIS_1, BACKLOG, DELIVERED, DEVELOPMENT, READY_FOR_DEVELOPMENT, WAITING,
};
use kanban_core::{
    KanbanConfig, NewFeature, NewWorker, Session, SessionEvent, SessionHandle,
};
use kanban_ledger::ReconcileResult;
use kanban_rules::{DecompositionConfig, LifecycleConfig, RulesConfig, TaskBounds};
use kanban_types::{BoardType, FeatureId, Priority, Role, Seniority, WorkerId, WorkerStatus};
use rust_decimal::Decimal;
use tokio::sync::broadcast;
use uuid::Uuid;

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
}

fn instant_hire_session() -> Session {
    let rules = RulesConfig {
        lifecycle: LifecycleConfig {
            onboarding_days: 0,
            ..LifecycleConfig::default()
        },
        ..RulesConfig::default()
    };
    Session::new(rules, Decimal::new(10_000, 0), start_date())
}

fn hire(s: &mut Session, name: &str, column: &str, role: Role) -> WorkerId {
    s.create_worker(NewWorker {
        name: name.to_owned(),
        email: String::new(),
        board: kanban_board::topology::board_of(column).unwrap(),
        column_id: column.to_owned(),
        learned_roles: BTreeSet::from([role]),
        learnable_roles: BTreeSet::new(),
        seniority: Some(Seniority::Mid),
    })
    .unwrap()
}

fn staff_every_column(s: &mut Session) {
    hire(s, "Alex Turner", ANALYSIS_1, Role::Analyst);
    hire(s, "Ivy Rodriguez", "analysis2", Role::HighLevelAnalyst);
    for board in ["backend", "frontend"] {
        hire(s, "Analyst", &format!("{board}-analysis"), Role::Analyst);
        hire(s, "Developer", &format!("{board}-dev-doing"), Role::Developer);
        hire(s, "Tester", &format!("{board}-test-doing"), Role::Tester);
    }
}

/// Give every idle worker the first item it may legally take.
fn assign_idle_workers(s: &mut Session) {
    let idle: Vec<WorkerId> = s
        .workers()
        .filter(|w| w.status == WorkerStatus::Active && w.assignment.is_none())
        .map(|w| w.id)
        .collect();
    for worker in idle {
        let mut candidates: Vec<Uuid> = s
            .tasks()
            .filter(|t| t.assignee.is_none())
            .map(|t| t.id.into_inner())
            .collect();
        candidates.extend(
            s.features()
                .filter(|f| f.assignee.is_none())
                .map(|f| f.id.into_inner()),
        );
        for item in candidates {
            if s.assign(item, worker).unwrap() {
                break;
            }
        }
    }
}

fn new_feature(s: &mut Session, title: &str, points: u32, due: Option<NaiveDate>) -> FeatureId {
    s.create_feature(NewFeature {
        title: title.to_owned(),
        description: String::new(),
        column_id: None,
        priority: Priority::High,
        labor_intensity: None,
        due_date: due,
        story_points: points,
        profit: None,
    })
    .unwrap()
}

#[test]
fn feature_travels_from_backlog_to_delivered() {
    let mut s = instant_hire_session();
    staff_every_column(&mut s);
    let feature = new_feature(&mut s, "Search Functionality", 5, None);

    let mut delivered_on = None;
    for _ in 0..40 {
        assign_idle_workers(&mut s);
        if s.feature(feature).unwrap().card.column_id == READY_FOR_DEVELOPMENT {
            let tasks = s.send_to_development(feature).unwrap();
            assert_eq!(tasks.len(), 3);
            continue;
        }
        let summary = s.advance_day().unwrap();
        assert!(summary.errors.is_empty(), "{:?}", summary.errors);
        if summary.features_delivered.contains(&feature) {
            delivered_on = Some(summary.day);
            break;
        }
    }

    assert!(delivered_on.is_some());
    let f = s.feature(feature).unwrap();
    assert_eq!(f.card.column_id, DELIVERED);
    assert!(f.generated_task_ids.is_empty());
    assert_eq!(s.tasks().count(), 0);
    assert_eq!(s.balance(), Decimal::new(12_500, 0));
    assert_eq!(s.ledger().len(), 1);
    assert_eq!(s.ledger().reconcile(), ReconcileResult::Balanced);
    assert_eq!(s.achievements().count(), 2);
    assert!(s.workers().all(|w| w.assignment.is_none()));
}

#[test]
fn one_unit_of_labor_finishes_a_stage() {
    let mut s = instant_hire_session();
    let worker = hire(&mut s, "Emma Davis", ANALYSIS_1, Role::Analyst);
    let feature = new_feature(&mut s, "Real-time Chat", 13, None);

    assert!(s.assign(feature.into_inner(), worker).unwrap());
    let summary = s.advance_day().unwrap();

    assert_eq!(summary.stages_completed, 1);
    let f = s.feature(feature).unwrap();
    assert_eq!(f.card.column_id, WAITING);
    assert_eq!(f.labor_left, f.labor_intensity);
    assert!(s.worker(worker).unwrap().assignment.is_none());
}

#[test]
fn rejected_moves_change_nothing() {
    let mut s = instant_hire_session();
    let worker = hire(&mut s, "Jack Thompson", ANALYSIS_1, Role::Analyst);
    let feature = new_feature(&mut s, "Mobile App", 34, None);
    let _ = s.drain_events();

    // Analyst cannot work the high-level column and cannot learn it.
    assert!(
        !s.relocate(worker.into_inner(), BoardType::Analysis, "analysis2")
            .unwrap()
    );
    // Work items never move forward by drag.
    assert!(
        !s.relocate(feature.into_inner(), BoardType::Analysis, WAITING)
            .unwrap()
    );
    // Nothing moves on the read-only board.
    assert!(
        !s.relocate(feature.into_inner(), BoardType::Summary, DEVELOPMENT)
            .unwrap()
    );

    assert!(s.drain_events().is_empty());
    assert_eq!(s.feature(feature).unwrap().card.column_id, BACKLOG);
    assert_eq!(s.worker(worker).unwrap().card.column_id, ANALYSIS_1);
}

#[test]
fn cross_board_learning_takes_the_configured_days() {
    let mut s = instant_hire_session();
    let worker = s
        .create_worker(NewWorker {
            name: "Beth Cooper".to_owned(),
            email: String::new(),
            board: BoardType::Analysis,
            column_id: ANALYSIS_1.to_owned(),
            learned_roles: BTreeSet::from([Role::Analyst]),
            learnable_roles: BTreeSet::from([Role::Developer]),
            seniority: Some(Seniority::Senior),
        })
        .unwrap();

    assert!(
        s.relocate(worker.into_inner(), BoardType::Backend, "backend-dev-doing")
            .unwrap()
    );
    let w = s.worker(worker).unwrap();
    assert_eq!(w.status, WorkerStatus::IsLearningInOtherTeam);
    assert_eq!(w.previous_board, Some(BoardType::Analysis));

    for _ in 0..7 {
        s.advance_day().unwrap();
    }
    assert_eq!(s.worker(worker).unwrap().status, WorkerStatus::IsLearningInOtherTeam);
    let summary = s.advance_day().unwrap();
    assert_eq!(summary.roles_learned.len(), 1);

    let w = s.worker(worker).unwrap();
    assert_eq!(w.status, WorkerStatus::Active);
    assert!(w.learned_roles.contains(&Role::Developer));
    assert!(w.learnable_roles.is_empty());
    assert_eq!(w.previous_board, None);
}

#[test]
fn missed_deadline_discards_feature_and_releases_worker() {
    let mut s = instant_hire_session();
    let due = NaiveDate::from_ymd_opt(2026, 9, 3);
    let feature = new_feature(&mut s, "Payment Integration", 21, due);
    let analyst = hire(&mut s, "Alex Turner", ANALYSIS_1, Role::Analyst);
    let senior = hire(&mut s, "Ivy Rodriguez", "analysis2", Role::HighLevelAnalyst);

    assert!(s.assign(feature.into_inner(), analyst).unwrap());
    s.advance_day().unwrap();
    assert_eq!(s.feature(feature).unwrap().card.column_id, WAITING);
    assert!(s.assign(feature.into_inner(), senior).unwrap());

    // Deadlines are checked before anyone works.
    let summary = s.advance_day().unwrap();
    assert_eq!(summary.features_expired, vec![feature]);
    assert_eq!(summary.stages_completed, 0);
    assert!(s.feature(feature).is_err());
    assert_eq!(s.balance(), Decimal::new(10_000, 0));
    assert!(s.worker(senior).unwrap().assignment.is_none());
}

#[test]
fn expiring_in_development_removes_generated_tasks() {
    let mut s = instant_hire_session();
    let due = NaiveDate::from_ymd_opt(2026, 9, 2);
    let feature = s
        .create_feature(NewFeature {
            title: "File Upload System".to_owned(),
            description: String::new(),
            column_id: Some(READY_FOR_DEVELOPMENT.to_owned()),
            priority: Priority::Medium,
            labor_intensity: None,
            due_date: due,
            story_points: 8,
            profit: None,
        })
        .unwrap();
    let tasks = s.send_to_development(feature).unwrap();
    let dev = hire(&mut s, "Kevin O'Brien", "backend-analysis", Role::Analyst);
    assert!(s.assign(tasks[0].into_inner(), dev).unwrap());

    let summary = s.advance_day().unwrap();
    assert_eq!(summary.features_expired, vec![feature]);
    assert_eq!(s.tasks().count(), 0);
    assert!(s.worker(dev).unwrap().assignment.is_none());
}

#[test]
fn zero_point_feature_still_reaches_delivered() {
    let rules = RulesConfig {
        lifecycle: LifecycleConfig {
            onboarding_days: 0,
            ..LifecycleConfig::default()
        },
        decomposition: DecompositionConfig {
            points_per_task: 5,
            backend: TaskBounds { min: 0, max: 6 },
            frontend: TaskBounds { min: 0, max: 4 },
        },
        ..RulesConfig::default()
    };
    let mut s = Session::new(rules, Decimal::new(10_000, 0), start_date());
    staff_every_column(&mut s);
    let feature = s
        .create_feature(NewFeature {
            title: "Dark Mode".to_owned(),
            description: String::new(),
            column_id: Some(READY_FOR_DEVELOPMENT.to_owned()),
            priority: Priority::Low,
            labor_intensity: None,
            due_date: None,
            story_points: 0,
            profit: None,
        })
        .unwrap();

    let tasks = s.send_to_development(feature).unwrap();
    assert_eq!(tasks.len(), 1);

    let mut delivered = false;
    for _ in 0..20 {
        assign_idle_workers(&mut s);
        if s.advance_day().unwrap().features_delivered.contains(&feature) {
            delivered = true;
            break;
        }
    }
    assert!(delivered);
    assert_eq!(s.feature(feature).unwrap().card.column_id, DELIVERED);
}

#[test]
fn seeded_game_plays_a_day() {
    let mut s = Session::new(RulesConfig::default(), Decimal::new(10_000, 0), start_date());
    s.seed().unwrap();
    let alex = s
        .workers()
        .find(|w| w.card.title == "Alex Turner")
        .map(|w| w.id)
        .unwrap();
    let auth = s
        .features()
        .find(|f| f.card.title == "User Authentication")
        .map(|f| f.id)
        .unwrap();

    assert!(s.assign(auth.into_inner(), alex).unwrap());
    let summary = s.advance_day().unwrap();
    assert!(summary.errors.is_empty());
    assert_eq!(s.feature(auth).unwrap().card.column_id, WAITING);
}

#[test]
fn config_drives_a_new_session() {
    let yaml = r#"
game:
  starting_money: 2500
  start_date: "2026-01-05"
lifecycle:
  onboarding_days: 0
"#;
    let config = KanbanConfig::parse(yaml).unwrap();
    let mut s = Session::from_config(&config, start_date());
    assert_eq!(s.balance(), Decimal::new(2_500, 0));
    assert_eq!(s.current_date().unwrap(), NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());

    let worker = hire(&mut s, "Grace Lee", "frontend-test-doing", Role::Tester);
    assert_eq!(s.worker(worker).unwrap().status, WorkerStatus::Active);
}

#[tokio::test]
async fn handle_broadcasts_committed_events() {
    let (tx, mut rx) = broadcast::channel::<SessionEvent>(256);
    let handle = SessionHandle::new(instant_hire_session(), Arc::new(tx));

    handle.with(Session::restart).await.unwrap();
    let mut saw_restart = false;
    while let Ok(event) = rx.try_recv() {
        if matches!(event, SessionEvent::GameRestarted { day: 1 }) {
            saw_restart = true;
        }
    }
    assert!(saw_restart);

    let summary = handle.with(Session::advance_day).await.unwrap();
    assert_eq!(summary.day, 2);
    assert!(matches!(
        rx.try_recv(),
        Ok(SessionEvent::DayAdvanced { day: 2, .. })
    ));
    assert_eq!(handle.read(|s| s.workers().count()).await, 16);
}
