use super::actions::Action;
use crate::api::ApiError;
use crate::list::{PageReset, PenaltyFilter, RequestTicket};
use crate::service::DashboardService;
use crate::utils::datetime::DateRange;
use std::collections::HashMap;
use std::future::Future;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub type TaskId = u64;

#[derive(Debug)]
pub struct BackgroundTask {
    pub id: TaskId,
    pub handle: JoinHandle<()>,
    pub description: String,
    pub started_at: std::time::Instant,
}

impl BackgroundTask {
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }
}

/// Runs API calls off the UI loop; every task reports back with exactly one
/// [`Action`] on the channel returned by [`TaskManager::new`].
pub struct TaskManager {
    tasks: HashMap<TaskId, BackgroundTask>,
    next_task_id: TaskId,
    action_sender: mpsc::UnboundedSender<Action>,
}

impl TaskManager {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();

        (
            Self {
                tasks: HashMap::new(),
                next_task_id: 1,
                action_sender: tx,
            },
            rx,
        )
    }

    /// Spawn `future` and send the action it resolves to
    pub fn spawn<Fut>(&mut self, description: impl Into<String>, future: Fut) -> TaskId
    where
        Fut: Future<Output = Action> + Send + 'static,
    {
        let task_id = self.next_task_id;
        self.next_task_id += 1;

        let action_sender = self.action_sender.clone();
        let handle = tokio::spawn(async move {
            let action = future.await;
            // The receiver is gone only while shutting down
            let _ = action_sender.send(action);
        });

        let task = BackgroundTask {
            id: task_id,
            handle,
            description: description.into(),
            started_at: std::time::Instant::now(),
        };

        self.tasks.insert(task_id, task);
        task_id
    }

    pub fn spawn_vehicle_load(&mut self, service: DashboardService, ticket: RequestTicket, reset: PageReset) -> TaskId {
        self.spawn(format!("Load vehicles #{}", ticket.sequence()), async move {
            Action::VehiclesLoaded {
                ticket,
                result: service.fetch_all_vehicles().await,
                reset,
            }
        })
    }

    pub fn spawn_alert_load(&mut self, service: DashboardService, ticket: RequestTicket, reset: PageReset) -> TaskId {
        self.spawn(format!("Load alerts #{}", ticket.sequence()), async move {
            Action::AlertsLoaded {
                ticket,
                result: service.fetch_alerts().await,
                reset,
            }
        })
    }

    pub fn spawn_penalty_load(
        &mut self,
        service: DashboardService,
        filter: PenaltyFilter,
        ticket: RequestTicket,
        reset: PageReset,
    ) -> TaskId {
        self.spawn(format!("Load penalties #{}", ticket.sequence()), async move {
            Action::PenaltiesLoaded {
                ticket,
                result: service.fetch_penalties(&filter).await,
                reset,
            }
        })
    }

    pub fn spawn_report_load(&mut self, service: DashboardService, range: DateRange, ticket: RequestTicket) -> TaskId {
        self.spawn(format!("Load report {} #{}", range, ticket.sequence()), async move {
            Action::ReportLoaded {
                ticket,
                result: service.fetch_report(range).await,
            }
        })
    }

    pub fn spawn_dashboard_load(&mut self, service: DashboardService, ticket: RequestTicket) -> TaskId {
        self.spawn(format!("Load dashboard #{}", ticket.sequence()), async move {
            Action::DashboardLoaded {
                ticket,
                result: service.fetch_dashboard().await,
            }
        })
    }

    pub fn spawn_rate_load(&mut self, service: DashboardService) -> TaskId {
        self.spawn("Load penalty rate", async move {
            Action::PenaltyRateLoaded(service.penalty_rate().await)
        })
    }

    /// Spawn a create/update/delete call; the outcome comes back as `MutationCompleted`
    pub fn spawn_mutation<Fut>(
        &mut self,
        description: impl Into<String>,
        success: &'static str,
        failure: &'static str,
        operation: Fut,
    ) -> TaskId
    where
        Fut: Future<Output = Result<(), ApiError>> + Send + 'static,
    {
        self.spawn(description, async move {
            Action::MutationCompleted {
                success,
                failure,
                result: operation.await,
            }
        })
    }

    /// Drop finished tasks; returns how many were removed
    pub fn cleanup_finished_tasks(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|_, task| !task.handle.is_finished());
        before - self.tasks.len()
    }

    pub fn cancel_all_tasks(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.handle.abort();
        }
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Descriptions of tasks running longer than `threshold`
    pub fn long_running(&self, threshold: std::time::Duration) -> Vec<&str> {
        self.tasks
            .values()
            .filter(|task| task.elapsed() > threshold)
            .map(|task| task.description.as_str())
            .collect()
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        self.cancel_all_tasks();
    }
}
