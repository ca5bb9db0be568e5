//! Battle worker that owns the authoritative [`BattleState`].
//!
//! Receives commands from [`BattleHandle`], plays turns through the
//! [`TurnController`] on a spawned task, and commits the result only if the
//! battle is still where the turn started. One turn may be in flight at a time.
//! A turn task that panics is reaped like any other, so the worker never stays
//! busy on a turn that will not finish.

use crate::battle::state::BattleState;
use crate::battle::turn_orchestrator::{IgnoreReason, TurnController, TurnOutcome, TurnRequest};
use crate::errors::{BattleEngineError, BattleResult};
use crate::side::Side;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{AbortHandle, JoinError, JoinHandle, JoinSet};
use tracing::{debug, info, warn};

/// Commands that can be sent to the battle worker
pub enum Command {
    /// Play the turn of the requested side.
    RunTurn {
        request: TurnRequest,
        reply: oneshot::Sender<BattleResult<TurnOutcome>>,
    },
    /// Query the current battle state (read-only).
    Snapshot { reply: oneshot::Sender<BattleState> },
    /// Abort the turn in flight, if any. Replies whether something was cancelled.
    Cancel { reply: oneshot::Sender<bool> },
}

struct InFlightTurn {
    id: u64,
    task: AbortHandle,
    reply: oneshot::Sender<BattleResult<TurnOutcome>>,
    launched_turn: Side,
}

type TurnCompletion = (u64, BattleResult<TurnOutcome>);

pub struct BattleWorker {
    state: BattleState,
    controller: TurnController,
    rng: StdRng,
    command_rx: mpsc::Receiver<Command>,
    turn_tasks: JoinSet<TurnCompletion>,
    in_flight: Option<InFlightTurn>,
    next_turn_id: u64,
}

impl BattleWorker {
    pub fn new(
        state: BattleState,
        controller: TurnController,
        rng: StdRng,
        command_rx: mpsc::Receiver<Command>,
    ) -> Self {
        Self {
            state,
            controller,
            rng,
            command_rx,
            turn_tasks: JoinSet::new(),
            in_flight: None,
            next_turn_id: 0,
        }
    }

    /// Main worker loop. Ends once every handle has been dropped.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                Some(joined) = self.turn_tasks.join_next() => {
                    self.reap_turn_task(joined);
                }
            }
        }
        self.turn_tasks.abort_all();
        debug!("battle worker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::RunTurn { request, reply } => {
                if let Some(outcome) = self.reject_reason(request) {
                    if reply.send(Ok(TurnOutcome::Ignored(outcome))).is_err() {
                        debug!("RunTurn reply channel closed (caller dropped)");
                    }
                    return;
                }
                self.launch_turn(request, reply);
            }
            Command::Snapshot { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!("Snapshot reply channel closed (caller dropped)");
                }
            }
            Command::Cancel { reply } => {
                let cancelled = self.cancel_in_flight();
                if reply.send(cancelled).is_err() {
                    debug!("Cancel reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn reject_reason(&self, request: TurnRequest) -> Option<IgnoreReason> {
        if self.in_flight.is_some() {
            Some(IgnoreReason::Busy)
        } else if self.state.is_finished() {
            Some(IgnoreReason::Finished)
        } else if self.state.turn != request.side {
            Some(IgnoreReason::WrongTurn)
        } else {
            None
        }
    }

    fn launch_turn(
        &mut self,
        request: TurnRequest,
        reply: oneshot::Sender<BattleResult<TurnOutcome>>,
    ) {
        let id = self.next_turn_id;
        self.next_turn_id += 1;

        let controller = self.controller.clone();
        let snapshot = self.state.clone();
        let turn_rng = StdRng::from_rng(&mut self.rng);
        debug!(id, side = %request.side, "turn launched");

        let task = self.turn_tasks.spawn(async move {
            let result = controller.play_turn(&snapshot, request, turn_rng).await;
            (id, result)
        });

        self.in_flight = Some(InFlightTurn {
            id,
            task,
            reply,
            launched_turn: request.side,
        });
    }

    fn reap_turn_task(&mut self, joined: Result<TurnCompletion, JoinError>) {
        match joined {
            Ok((id, result)) => self.finish_turn(id, result),
            Err(err) if err.is_cancelled() => debug!("cancelled turn task reaped"),
            Err(err) => {
                let task_id = err.id();
                let matching = self.in_flight.take_if(|turn| turn.task.id() == task_id);
                let Some(turn) = matching else {
                    warn!(error = %err, "stale turn task failed");
                    return;
                };
                warn!(id = turn.id, error = %err, "turn task panicked; state left unchanged");
                if turn.reply.send(Err(BattleEngineError::WorkerJoin(err))).is_err() {
                    debug!("RunTurn reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn finish_turn(&mut self, id: u64, result: BattleResult<TurnOutcome>) {
        let Some(turn) = self.in_flight.take_if(|turn| turn.id == id) else {
            debug!(id, "discarding result of a cancelled turn");
            return;
        };

        let reply = match result {
            Ok(TurnOutcome::Resolved(next)) => {
                if self.state.is_finished() || self.state.turn != turn.launched_turn {
                    Ok(TurnOutcome::Ignored(IgnoreReason::Cancelled))
                } else {
                    self.state = (*next).clone();
                    if self.state.is_finished() {
                        info!(winner = ?self.state.winner, "battle over");
                    }
                    Ok(TurnOutcome::Resolved(next))
                }
            }
            Ok(ignored) => Ok(ignored),
            Err(err) => {
                warn!(error = %err, "turn failed; state left unchanged");
                Err(err)
            }
        };

        if turn.reply.send(reply).is_err() {
            debug!("RunTurn reply channel closed (caller dropped)");
        }
    }

    fn cancel_in_flight(&mut self) -> bool {
        let Some(turn) = self.in_flight.take() else {
            return false;
        };
        turn.task.abort();
        debug!(id = turn.id, "turn cancelled");
        let _ = turn
            .reply
            .send(Ok(TurnOutcome::Ignored(IgnoreReason::Cancelled)));
        true
    }
}

/// Client-facing handle to interact with a battle worker
#[derive(Clone)]
pub struct BattleHandle {
    command_tx: mpsc::Sender<Command>,
}

impl BattleHandle {
    /// Play the turn of `side`. Requests made while a turn is in flight, for
    /// the wrong side, or after the battle ended come back as
    /// [`TurnOutcome::Ignored`].
    pub async fn run_turn(&self, side: Side, forced_slot: Option<u8>) -> BattleResult<TurnOutcome> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::RunTurn {
                request: TurnRequest { side, forced_slot },
                reply: reply_tx,
            })
            .await
            .map_err(|_| BattleEngineError::CommandChannelClosed)?;

        reply_rx
            .await
            .map_err(|_| BattleEngineError::ReplyChannelClosed)?
    }

    pub async fn snapshot(&self) -> BattleResult<BattleState> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| BattleEngineError::CommandChannelClosed)?;

        reply_rx
            .await
            .map_err(|_| BattleEngineError::ReplyChannelClosed)
    }

    /// Abort the turn in flight. Returns whether a turn was cancelled.
    pub async fn cancel(&self) -> BattleResult<bool> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::Cancel { reply: reply_tx })
            .await
            .map_err(|_| BattleEngineError::CommandChannelClosed)?;

        reply_rx
            .await
            .map_err(|_| BattleEngineError::ReplyChannelClosed)
    }
}

/// Spawn a worker for `state` and return a handle to it.
pub fn spawn_battle(
    state: BattleState,
    controller: TurnController,
    rng: StdRng,
    command_buffer: usize,
) -> (BattleHandle, JoinHandle<()>) {
    let (command_tx, command_rx) = mpsc::channel(command_buffer.max(1));
    let worker = BattleWorker::new(state, controller, rng, command_rx);
    let join = tokio::spawn(worker.run());
    (BattleHandle { command_tx }, join)
}
