//! Starting cards and game restart.
//!
//! Seeded workers skip onboarding: a new game starts with a fully staffed
//! company.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use kanban_board::columns::{ANALYSIS_1, ANALYSIS_2, BACKEND_DONE, BACKLOG};
use kanban_board::topology;
use kanban_types::{Priority, Role, Seniority, WorkerStatus};
use rust_decimal::Decimal;
use tracing::info;

use crate::cards::{NewFeature, NewTask, NewWorker, default_profit};
use crate::error::SessionError;
use crate::events::SessionEvent;
use crate::session::{Session, Settings};

struct SeedWorker {
    name: &'static str,
    column: &'static str,
    seniority: Seniority,
}

struct SeedFeature {
    title: &'static str,
    description: &'static str,
    priority: Priority,
    story_points: u32,
    due_in_days: i64,
}

struct SeedTask {
    title: &'static str,
    description: &'static str,
    column: &'static str,
    priority: Priority,
    estimated_hours: u32,
    due_in_days: i64,
}

const fn worker(name: &'static str, column: &'static str, seniority: Seniority) -> SeedWorker {
    SeedWorker {
        name,
        column,
        seniority,
    }
}

const WORKERS: [SeedWorker; 16] = [
    worker("Alex Turner", ANALYSIS_1, Seniority::Senior),
    worker("Emma Davis", ANALYSIS_1, Seniority::Mid),
    worker("Ivy Rodriguez", ANALYSIS_2, Seniority::Senior),
    worker("Jack Thompson", ANALYSIS_2, Seniority::Junior),
    worker("Beth Cooper", "backend-analysis", Seniority::Senior),
    worker("Kevin O'Brien", "backend-analysis", Seniority::Mid),
    worker("Liam Anderson", "backend-dev-doing", Seniority::Senior),
    worker("Mark Taylor", "backend-dev-doing", Seniority::Junior),
    worker("David Brown", "backend-test-doing", Seniority::Mid),
    worker("Nathan Garcia", "backend-test-doing", Seniority::Junior),
    worker("Claire Bennett", "frontend-analysis", Seniority::Mid),
    worker("Oliver Martinez", "frontend-analysis", Seniority::Junior),
    worker("Frank Miller", "frontend-dev-doing", Seniority::Senior),
    worker("Paul Robinson", "frontend-dev-doing", Seniority::Mid),
    worker("Grace Lee", "frontend-test-doing", Seniority::Senior),
    worker("Quentin White", "frontend-test-doing", Seniority::Junior),
];

const FEATURES: [SeedFeature; 8] = [
    SeedFeature {
        title: "User Authentication",
        description: "Implement secure user authentication system",
        priority: Priority::High,
        story_points: 8,
        due_in_days: 7,
    },
    SeedFeature {
        title: "Dashboard Analytics",
        description: "Create analytics dashboard with charts and metrics",
        priority: Priority::Medium,
        story_points: 13,
        due_in_days: 14,
    },
    SeedFeature {
        title: "Payment Integration",
        description: "Integrate payment gateway for subscription management",
        priority: Priority::High,
        story_points: 21,
        due_in_days: 10,
    },
    SeedFeature {
        title: "Mobile App",
        description: "Develop mobile application for iOS and Android",
        priority: Priority::Medium,
        story_points: 34,
        due_in_days: 30,
    },
    SeedFeature {
        title: "Real-time Chat",
        description: "Implement real-time messaging system",
        priority: Priority::High,
        story_points: 13,
        due_in_days: 12,
    },
    SeedFeature {
        title: "File Upload System",
        description: "Create secure file upload and storage system",
        priority: Priority::Medium,
        story_points: 8,
        due_in_days: 8,
    },
    SeedFeature {
        title: "Email Notifications",
        description: "Add email notification system for important events",
        priority: Priority::Low,
        story_points: 5,
        due_in_days: 5,
    },
    SeedFeature {
        title: "Search Functionality",
        description: "Implement advanced search with filters",
        priority: Priority::Medium,
        story_points: 13,
        due_in_days: 15,
    },
];

const TASKS: [SeedTask; 5] = [
    SeedTask {
        title: "Setup Database Schema",
        description: "Create initial database tables and relationships",
        column: "backend-dev-doing",
        priority: Priority::High,
        estimated_hours: 8,
        due_in_days: 3,
    },
    SeedTask {
        title: "Implement API Endpoints",
        description: "Create REST API endpoints for user management",
        column: "backend-dev-waiting",
        priority: Priority::High,
        estimated_hours: 12,
        due_in_days: 5,
    },
    SeedTask {
        title: "Design User Interface",
        description: "Create wireframes and mockups for the main dashboard",
        column: "frontend-dev-doing",
        priority: Priority::Medium,
        estimated_hours: 6,
        due_in_days: 7,
    },
    SeedTask {
        title: "Write Unit Tests",
        description: "Create comprehensive unit tests for backend services",
        column: "backend-test-waiting",
        priority: Priority::Medium,
        estimated_hours: 10,
        due_in_days: 4,
    },
    SeedTask {
        title: "Performance Testing",
        description: "Conduct load testing and performance optimization",
        column: BACKEND_DONE,
        priority: Priority::Low,
        estimated_hours: 4,
        due_in_days: -1,
    },
];

/// The role a worker standing in a column of `required` role may pick up
/// next.
const fn cross_training(required: Role) -> Role {
    match required {
        Role::Analyst => Role::HighLevelAnalyst,
        Role::HighLevelAnalyst | Role::Tester => Role::Developer,
        Role::Developer => Role::Tester,
    }
}

fn offset(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let magnitude = Days::new(days.unsigned_abs());
    if days < 0 {
        date.checked_sub_days(magnitude)
    } else {
        date.checked_add_days(magnitude)
    }
}

impl Session {
    /// Populate the board with the starting company: sixteen workers,
    /// eight features in the backlog and five loose tasks.
    ///
    /// # Errors
    ///
    /// Propagates creation errors; none occur with the compiled-in tables.
    pub fn seed(&mut self) -> Result<(), SessionError> {
        let today = self.current_date()?;

        for entry in &WORKERS {
            let board = topology::board_of(entry.column)
                .ok_or_else(|| SessionError::InvalidRequest(format!("unknown column {}", entry.column)))?;
            let required = topology::required_role(entry.column);
            let id = self.create_worker(NewWorker {
                name: entry.name.to_owned(),
                email: email_for(entry.name),
                board,
                column_id: entry.column.to_owned(),
                learned_roles: required.into_iter().collect::<BTreeSet<_>>(),
                learnable_roles: required.map(cross_training).into_iter().collect::<BTreeSet<_>>(),
                seniority: Some(entry.seniority),
            })?;
            if let Some(w) = self.workers.get_mut(&id) {
                w.status = WorkerStatus::Active;
                w.onboarding_days_left = 0;
            }
        }

        for entry in &FEATURES {
            self.create_feature(NewFeature {
                title: entry.title.to_owned(),
                description: entry.description.to_owned(),
                column_id: Some(BACKLOG.to_owned()),
                priority: entry.priority,
                labor_intensity: Some(Decimal::ONE),
                due_date: offset(today, entry.due_in_days),
                story_points: entry.story_points,
                profit: Some(default_profit(entry.story_points)),
            })?;
        }

        for entry in &TASKS {
            self.create_task(NewTask {
                title: entry.title.to_owned(),
                description: entry.description.to_owned(),
                column_id: entry.column.to_owned(),
                priority: entry.priority,
                labor_intensity: Some(Decimal::ONE),
                due_date: offset(today, entry.due_in_days),
                estimated_hours: entry.estimated_hours,
            })?;
        }

        info!(
            workers = self.workers.len(),
            features = self.features.len(),
            tasks = self.tasks.len(),
            "Board seeded"
        );
        Ok(())
    }

    /// Start over: day 1, starting money, no transactions or achievements,
    /// default settings and freshly seeded cards.
    ///
    /// # Errors
    ///
    /// Propagates [`Session::seed`] errors.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        self.clock.reset();
        self.ledger.reset(self.starting_money);
        self.achievements.clear();
        self.workers.clear();
        self.tasks.clear();
        self.features.clear();
        self.settings = Settings::default();
        self.seed()?;

        // Per-card creation events are superseded by the restart notice.
        let _ = self.drain_events();
        info!(day = self.day(), money = %self.balance(), "Game restarted");
        self.emit(SessionEvent::GameRestarted { day: self.day() });
        Ok(())
    }
}

fn email_for(name: &str) -> String {
    let local: String = name
        .split_whitespace()
        .map(|part| {
            part.chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .collect::<Vec<_>>()
        .join(".");
    format!("{local}@company.com")
}

#[cfg(test)]
mod tests {
    use kanban_board::columns::DEVELOPMENT;
    use kanban_rules::RulesConfig;
    use kanban_types::BoardType;

    use super::*;

    fn session() -> Session {
        Session::new(
            RulesConfig::default(),
            Decimal::new(10_000, 0),
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap_or_default(),
        )
    }

    #[test]
    fn seed_populates_every_worker_column() {
        let mut s = session();
        assert!(s.seed().is_ok());
        assert_eq!(s.workers().count(), 16);
        assert_eq!(s.features().count(), 8);
        assert_eq!(s.tasks().count(), 5);

        for board in [BoardType::Analysis, BoardType::Backend, BoardType::Frontend] {
            for column in topology::worker_columns(board) {
                assert_eq!(s.workers_in(column.id).len(), 2, "{}", column.id);
            }
        }
        assert!(s.workers().all(|w| w.status == WorkerStatus::Active));
    }

    #[test]
    fn seeded_workers_hold_their_column_role() {
        let mut s = session();
        let _ = s.seed();
        for worker in s.workers() {
            let required = topology::required_role(&worker.card.column_id);
            assert!(required.is_some_and(|r| worker.holds_role(r)), "{}", worker.card.title);
            assert!(!worker.learnable_roles.is_empty());
        }
        assert!(
            s.workers_in(ANALYSIS_2)
                .iter()
                .all(|w| w.learnable_roles.contains(&Role::Developer))
        );
    }

    #[test]
    fn seeded_features_carry_profit_and_deadlines() {
        let mut s = session();
        let _ = s.seed();
        let auth = s.features().find(|f| f.card.title == "User Authentication");
        assert_eq!(auth.map(|f| f.profit), Some(Decimal::new(4_000, 0)));
        assert_eq!(auth.and_then(|f| f.due_date), NaiveDate::from_ymd_opt(2026, 9, 8));
        assert_eq!(s.features_in(BACKLOG).len(), 8);
        assert!(s.features_in(DEVELOPMENT).is_empty());
    }

    #[test]
    fn emails_follow_the_company_scheme() {
        assert_eq!(email_for("Kevin O'Brien"), "kevin.obrien@company.com");
        assert_eq!(email_for("Alex Turner"), "alex.turner@company.com");
    }

    #[test]
    fn restart_resets_everything() {
        let mut s = session();
        let _ = s.seed();
        let _ = s.advance_day();
        let _ = s.add_money(Decimal::new(500, 0), None);
        s.settings.summary_board_visible = false;

        assert!(s.restart().is_ok());
        assert_eq!(s.day(), 1);
        assert_eq!(s.balance(), Decimal::new(10_000, 0));
        assert!(s.ledger().is_empty());
        assert_eq!(s.achievements().count(), 0);
        assert_eq!(s.settings(), &Settings::default());
        assert_eq!(s.workers().count(), 16);
        assert_eq!(s.drain_events(), vec![SessionEvent::GameRestarted { day: 1 }]);
    }
}
