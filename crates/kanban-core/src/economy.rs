//! Money operations and achievements.

use chrono::Utc;
use kanban_types::{Achievement, AchievementType, MoneyTransaction};
use rust_decimal::Decimal;
use tracing::info;

use crate::error::SessionError;
use crate::events::SessionEvent;
use crate::session::Session;

impl Session {
    /// Apply a signed adjustment to the balance and record it.
    ///
    /// # Errors
    ///
    /// [`SessionError::Ledger`] for a zero amount or an overflowing balance.
    pub fn add_money(&mut self, amount: Decimal, description: Option<&str>) -> Result<MoneyTransaction, SessionError> {
        let day = self.day();
        let entry = self.ledger.add_money(day, amount, description)?.clone();
        self.emit(SessionEvent::MoneyChanged {
            balance: self.ledger.balance(),
        });
        Ok(entry)
    }

    /// Overwrite the balance without recording a transaction.
    pub fn set_money(&mut self, amount: Decimal) -> Decimal {
        self.ledger.set_money(amount);
        self.emit(SessionEvent::MoneyChanged { balance: amount });
        amount
    }

    /// Unlock an achievement. Returns `false` if one with this id is
    /// already unlocked.
    pub(crate) fn unlock_achievement(
        &mut self,
        id: String,
        name: String,
        description: String,
        achievement_type: AchievementType,
    ) -> bool {
        if self.achievements.contains_key(&id) {
            return false;
        }
        let achievement = Achievement {
            id: id.clone(),
            name,
            description,
            icon: icon_for(achievement_type).to_owned(),
            achievement_type,
            unlocked_day: self.day(),
            unlocked_at: Utc::now(),
        };
        info!(achievement = %id, "Achievement unlocked");
        self.emit(SessionEvent::AchievementUnlocked {
            achievement: achievement.clone(),
        });
        self.achievements.insert(id, achievement);
        true
    }
}

const fn icon_for(kind: AchievementType) -> &'static str {
    match kind {
        AchievementType::Daily => "calendar",
        AchievementType::Milestone => "trophy",
        AchievementType::Special => "star",
    }
}
