//! Explicit lifecycle commands: vacation, firing and rehiring.

use kanban_rules::{RulesError, StatusChange, lifecycle};
use kanban_types::{Worker, WorkerId};
use tracing::info;

use crate::error::SessionError;
use crate::events::SessionEvent;
use crate::session::Session;

impl Session {
    /// Send an Active worker on vacation for `days` days from today.
    pub fn start_vacation(&mut self, id: WorkerId, days: u32) -> Result<&Worker, SessionError> {
        let today = self.current_date()?;
        self.apply_command(id, |w| lifecycle::start_vacation(w, today, days))
    }

    /// Bring a worker back from vacation early.
    pub fn end_vacation(&mut self, id: WorkerId) -> Result<&Worker, SessionError> {
        self.apply_command(id, lifecycle::end_vacation)
    }

    /// Fire a worker, releasing its work item.
    pub fn fire_worker(&mut self, id: WorkerId) -> Result<&Worker, SessionError> {
        self.apply_command(id, lifecycle::fire)
    }

    /// Rehire a fired worker.
    pub fn rehire_worker(&mut self, id: WorkerId) -> Result<&Worker, SessionError> {
        self.apply_command(id, lifecycle::rehire)
    }

    fn apply_command<F>(&mut self, id: WorkerId, command: F) -> Result<&Worker, SessionError>
    where
        F: FnOnce(&mut Worker) -> Result<StatusChange, RulesError>,
    {
        let worker = self.workers.get_mut(&id).ok_or(SessionError::WorkerNotFound(id))?;
        let change = command(worker)?;
        worker.card.touch();

        if let Some(item) = change.released {
            self.detach_item(item, id);
        }
        info!(worker = %id, from = ?change.from, to = ?change.to, "Worker status changed");
        self.emit(SessionEvent::WorkerStatusChanged {
            worker: id,
            from: change.from,
            to: change.to,
        });
        self.worker(id)
    }
}
