use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior, sleep};

use crate::api::{
    ApiError, RechargeApi, RechargeRequest, StatusResponse, SubmitResponse, TaskId, TaskStatus,
};
use crate::config::Timings;
use crate::error::FailureKind;
use crate::state_machine::{CycleOutcome, CycleState, PollHandle, TaskHandle};
use crate::ui::{Collapse, Container, Settled, UiBinding, collapse, hide, show};
use crate::visibility::{FieldGroup, VisibilitySet};

pub type EventSender = mpsc::UnboundedSender<Event>;

/// Everything that can move the orchestrator: user input, network results
/// and timers. Results carry the cycle number they belong to.
#[derive(Debug)]
pub enum Event {
    /// Any input/change on the method, name, card or amount fields.
    FieldChanged,
    Submit,
    Submitted {
        cycle: u64,
        result: Result<SubmitResponse, ApiError>,
    },
    StatusChecked {
        cycle: u64,
        result: Result<StatusResponse, ApiError>,
    },
    /// A collapse finished and `reveal` may now be shown.
    Collapsed {
        cycle: u64,
        reveal: Container,
        settled: Settled,
    },
    PulseElapsed {
        cycle: u64,
    },
    ResetDue {
        cycle: u64,
    },
    Shutdown,
}

/// Drives the form through submission, status polling and reset.
///
/// All state lives here and is only touched from the task that calls
/// [`handle`](Orchestrator::handle)/[`step`](Orchestrator::step). Network
/// calls and timers run as spawned tasks that report back through the
/// event channel.
pub struct Orchestrator<A, U> {
    api: Arc<A>,
    ui: U,
    timings: Timings,
    state: CycleState,
    cycle: u64,
    task_id: Option<TaskId>,
    outcome: Option<CycleOutcome>,
    poll: PollHandle,
    reveal_timer: TaskHandle,
    pulse_timer: TaskHandle,
    reset_timer: TaskHandle,
    tx: EventSender,
    rx: mpsc::UnboundedReceiver<Event>,
}

impl<A: RechargeApi, U: UiBinding> Orchestrator<A, U> {
    pub fn new(api: Arc<A>, ui: U, timings: Timings) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            ui,
            timings,
            state: CycleState::Idle,
            cycle: 0,
            task_id: None,
            outcome: None,
            poll: PollHandle::default(),
            reveal_timer: TaskHandle::default(),
            pulse_timer: TaskHandle::default(),
            reset_timer: TaskHandle::default(),
            tx,
            rx,
        }
    }

    /// Channel the environment uses to post input events.
    pub fn sender(&self) -> EventSender {
        self.tx.clone()
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    /// Recovers visibility from whatever values the fields already hold.
    pub fn initialize(&mut self) {
        self.update_visibility();
    }

    /// Recomputes every field group from the current form values.
    pub fn update_visibility(&mut self) {
        let set = VisibilitySet::compute(&self.ui.read_form());
        self.apply_visibility(set);
    }

    /// Processes one event. Returns `false` once the orchestrator shut down.
    pub fn handle(&mut self, event: Event) -> bool {
        match event {
            Event::FieldChanged => {
                if self.state.accepts_field_input() {
                    self.update_visibility();
                } else {
                    tracing::debug!(state = %self.state, "field change ignored");
                }
            }
            Event::Submit => self.submit(),
            Event::Submitted { cycle, result } => self.on_submitted(cycle, result),
            Event::StatusChecked { cycle, result } => self.on_status(cycle, result),
            Event::Collapsed {
                cycle,
                reveal,
                settled,
            } => self.on_collapsed(cycle, reveal, settled),
            Event::PulseElapsed { cycle } => {
                if cycle == self.cycle && self.state == CycleState::Failed {
                    self.ui.set_error_pulse(false);
                }
            }
            Event::ResetDue { cycle } => {
                if cycle == self.cycle && self.state.is_terminal() {
                    self.reset();
                } else {
                    tracing::debug!(cycle, current = self.cycle, "stale reset ignored");
                }
            }
            Event::Shutdown => {
                self.shutdown();
                return false;
            }
        }
        true
    }

    /// Waits for the next event and processes it.
    pub async fn step(&mut self) -> bool {
        match self.rx.recv().await {
            Some(event) => self.handle(event),
            None => false,
        }
    }

    /// Submits the form and drives events until the cycle resets.
    ///
    /// Returns `None` if the submit was not accepted (a cycle was already
    /// running) or the orchestrator shut down mid-cycle.
    pub async fn run_cycle(&mut self) -> Option<CycleOutcome> {
        let before = self.cycle;
        self.handle(Event::Submit);
        if self.cycle == before {
            return None;
        }

        loop {
            if !self.step().await {
                return None;
            }
            if self.state == CycleState::Idle {
                return self.outcome.clone();
            }
        }
    }

    /// Cancels the poll and every pending timer.
    pub fn shutdown(&mut self) {
        tracing::debug!(state = %self.state, polling = self.poll.is_active(), "orchestrator shut down");
        self.cancel_pending();
    }

    fn enter(&mut self, next: CycleState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {next}",
            self.state
        );
        tracing::debug!(cycle = self.cycle, from = %self.state, to = %next, "transition");
        self.state = next;
    }

    fn is_current(&self, cycle: u64, state: CycleState) -> bool {
        cycle == self.cycle && self.state == state
    }

    fn submit(&mut self) {
        if self.state != CycleState::Idle {
            tracing::debug!(state = %self.state, "submit ignored, cycle in progress");
            return;
        }

        let request = RechargeRequest::from(&self.ui.read_form());
        let csrf_token = self.ui.csrf_token();

        self.cycle += 1;
        self.outcome = None;
        self.enter(CycleState::Submitting);
        self.ui.set_submit_enabled(false);
        tracing::info!(
            cycle = self.cycle,
            method = %request.forma_pagamento,
            card = %request.numero_cartao,
            "submitting recharge"
        );

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let cycle = self.cycle;
        tokio::spawn(async move {
            let result = api.submit(&request, &csrf_token).await;
            let _ = tx.send(Event::Submitted { cycle, result });
        });
    }

    fn on_submitted(&mut self, cycle: u64, result: Result<SubmitResponse, ApiError>) {
        if !self.is_current(cycle, CycleState::Submitting) {
            tracing::debug!(cycle, "late submission response ignored");
            return;
        }

        match result {
            Ok(SubmitResponse {
                success: true,
                task_id: Some(task_id),
                ..
            }) => self.start_polling(task_id),
            Ok(resp) => {
                if resp.success {
                    tracing::warn!("submission accepted without a task id");
                }
                self.fail(FailureKind::SubmissionRejected, resp.message.as_deref());
            }
            Err(err) => {
                tracing::warn!(error = %err, "submission request failed");
                self.fail(FailureKind::SubmissionTransport, None);
            }
        }
    }

    fn start_polling(&mut self, task_id: TaskId) {
        self.enter(CycleState::Polling);
        tracing::info!(cycle = self.cycle, %task_id, "recharge accepted, polling status");
        self.ui.set_busy(true);

        for group in FieldGroup::ALL {
            hide(&mut self.ui, group);
        }
        hide(&mut self.ui, Container::Success);
        hide(&mut self.ui, Container::Error);

        // Loading must not appear before the form has finished collapsing.
        let form = collapse(&mut self.ui, Container::Form);
        self.reveal_after(form, Container::Loading);

        let handle = tokio::spawn(poll_status(
            Arc::clone(&self.api),
            task_id.clone(),
            self.timings.poll_interval,
            self.cycle,
            self.tx.clone(),
        ));
        self.poll.start(handle);
        self.task_id = Some(task_id);
    }

    fn on_status(&mut self, cycle: u64, result: Result<StatusResponse, ApiError>) {
        if !self.is_current(cycle, CycleState::Polling) {
            tracing::debug!(cycle, "late status response ignored");
            return;
        }

        match result {
            Ok(resp) => match resp.status {
                TaskStatus::Completed => {
                    self.poll.cancel();
                    self.succeed();
                }
                TaskStatus::Failed => {
                    self.poll.cancel();
                    self.fail(FailureKind::TaskFailed, resp.message.as_deref());
                }
                TaskStatus::Pending => {
                    tracing::debug!(cycle, task = ?self.task_id, "task still pending");
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "status check failed");
                self.poll.cancel();
                self.fail(FailureKind::StatusTransport, None);
            }
        }
    }

    fn succeed(&mut self) {
        self.enter(CycleState::Succeeded);
        tracing::info!(cycle = self.cycle, "recharge completed");
        self.outcome = Some(CycleOutcome::Succeeded);

        let loading = collapse(&mut self.ui, Container::Loading);
        self.reveal_after(loading, Container::Success);

        let handle = self.spawn_after(
            self.timings.success_reset,
            Event::ResetDue { cycle: self.cycle },
        );
        self.reset_timer.replace(handle);
    }

    fn fail(&mut self, kind: FailureKind, server_message: Option<&str>) {
        self.poll.cancel();
        self.reveal_timer.cancel();

        let message = kind.message(server_message);
        self.enter(CycleState::Failed);
        tracing::warn!(cycle = self.cycle, %kind, %message, "recharge failed");
        self.outcome = Some(CycleOutcome::Failed {
            kind,
            message: message.clone(),
        });

        hide(&mut self.ui, Container::Form);
        hide(&mut self.ui, Container::Loading);
        hide(&mut self.ui, Container::Success);
        self.ui.set_error_message(&message);
        show(&mut self.ui, Container::Error);

        self.ui.set_error_pulse(true);
        let pulse = self.spawn_after(
            self.timings.error_pulse,
            Event::PulseElapsed { cycle: self.cycle },
        );
        self.pulse_timer.replace(pulse);

        let reset = self.spawn_after(
            self.timings.error_reset,
            Event::ResetDue { cycle: self.cycle },
        );
        self.reset_timer.replace(reset);
    }

    fn on_collapsed(&mut self, cycle: u64, reveal: Container, settled: Settled) {
        let expected = match reveal {
            Container::Loading => CycleState::Polling,
            Container::Success => CycleState::Succeeded,
            Container::Form | Container::Error => return,
        };
        if !self.is_current(cycle, expected) {
            tracing::debug!(cycle, %reveal, "reveal no longer wanted");
            return;
        }
        if settled == Settled::TimedOut {
            tracing::debug!(%reveal, "transition end never signalled, revealing anyway");
        }
        show(&mut self.ui, reveal);
    }

    fn reset(&mut self) {
        self.cancel_pending();
        self.enter(CycleState::Idle);
        self.task_id = None;

        self.ui.set_busy(false);
        self.ui.clear_fields();

        show(&mut self.ui, Container::Form);
        hide(&mut self.ui, Container::Loading);
        hide(&mut self.ui, Container::Success);
        hide(&mut self.ui, Container::Error);
        self.apply_visibility(VisibilitySet::initial());

        self.ui.set_error_pulse(false);
        self.ui.set_submit_enabled(true);
        tracing::info!(cycle = self.cycle, "form reset");
    }

    fn apply_visibility(&mut self, set: VisibilitySet) {
        for (group, visible) in set.iter() {
            if visible {
                show(&mut self.ui, group);
            } else {
                hide(&mut self.ui, group);
            }
        }
    }

    // Shows `container` once `pending` completes; right away if it already has.
    fn reveal_after(&mut self, pending: Collapse, container: Container) {
        if pending.is_done() {
            show(&mut self.ui, container);
            return;
        }

        let tx = self.tx.clone();
        let cycle = self.cycle;
        let fallback = self.timings.transition_fallback;
        self.reveal_timer.replace(tokio::spawn(async move {
            let settled = pending.settle(fallback).await;
            let _ = tx.send(Event::Collapsed {
                cycle,
                reveal: container,
                settled,
            });
        }));
    }

    fn spawn_after(&self, delay: Duration, event: Event) -> JoinHandle<()> {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(event);
        })
    }

    fn cancel_pending(&mut self) {
        self.poll.cancel();
        self.reveal_timer.cancel();
        self.pulse_timer.cancel();
        self.reset_timer.cancel();
    }
}

/// Checks the task status every `period` until a terminal answer or a
/// transport failure, reporting each result back to the orchestrator.
async fn poll_status<A: RechargeApi>(
    api: Arc<A>,
    task_id: TaskId,
    period: Duration,
    cycle: u64,
    tx: EventSender,
) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let result = api.status(&task_id).await;
        let terminal = result.as_ref().map_or(true, StatusResponse::is_terminal);
        if tx.send(Event::StatusChecked { cycle, result }).is_err() || terminal {
            break;
        }
    }
}
