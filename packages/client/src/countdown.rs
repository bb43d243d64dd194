//! Instruction countdown and game-over status.
//!
//! The projector runs next to the frame dispatcher and writes into the same
//! last-write-wins cells. A fixed-cadence tick keeps `time_remaining` moving
//! between `player_board` frames; every new board recomputes it at once.

use std::{sync::Arc, time::Duration};

use rogueai_shared::time::Clock;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

use crate::{
    domain::{GameState, GameStatus, Instruction, PlayerBoard},
    session::Publisher,
};

/// Milliseconds left on `instruction` at `now_millis`, never negative.
///
/// No instruction means nothing to count down. Client/server clock skew is not
/// compensated.
pub fn remaining_millis(instruction: Option<&Instruction>, now_millis: i64) -> i64 {
    instruction.map_or(0, |instruction| {
        let elapsed = now_millis.saturating_sub(instruction.timestamp_creation);
        instruction.timeout.saturating_sub(elapsed).max(0)
    })
}

/// Periodic producer of `time_remaining` and `game_status`
pub(crate) struct CountdownProjector {
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
}

impl CountdownProjector {
    pub(crate) fn new(clock: Arc<dyn Clock>, tick_interval: Duration) -> Self {
        Self {
            clock,
            tick_interval,
        }
    }

    /// Start the tick loop for one connection.
    ///
    /// The loop runs until the returned handle is aborted.
    pub(crate) fn spawn(self, publisher: Publisher) -> JoinHandle<()> {
        let boards = publisher.projections().player_board.subscribe();
        let states = publisher.projections().game_state.subscribe();
        let status = *publisher.projections().game_status.borrow();
        tokio::spawn(self.run(publisher, boards, states, status))
    }

    async fn run(
        self,
        publisher: Publisher,
        mut boards: watch::Receiver<Option<PlayerBoard>>,
        mut states: watch::Receiver<Option<GameState>>,
        mut status: GameStatus,
    ) {
        let mut ticker = time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.publish_remaining(&publisher, &boards);
                }
                changed = boards.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    self.publish_remaining(&publisher, &boards);
                }
                changed = states.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let next = states
                        .borrow_and_update()
                        .as_ref()
                        .map_or(status, |state| status.apply(state));
                    if next != status {
                        tracing::debug!("Game status changed: {:?} -> {:?}", status, next);
                        status = next;
                        publisher.set_game_status(status);
                    }
                }
            }
        }
        tracing::debug!("Countdown stopped");
    }

    fn publish_remaining(
        &self,
        publisher: &Publisher,
        boards: &watch::Receiver<Option<PlayerBoard>>,
    ) {
        let now = self.clock.now_millis();
        let remaining = {
            let board = boards.borrow();
            remaining_millis(board.as_ref().map(|b| &b.instruction), now)
        };
        publisher.set_time_remaining(remaining);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Projections;
    use rogueai_shared::time::{FixedClock, SystemClock};

    fn instruction(timeout: i64, created: i64) -> Instruction {
        Instruction {
            command_id: "cmd-1".to_string(),
            timeout,
            timestamp_creation: created,
            ..Default::default()
        }
    }

    #[test]
    fn test_remaining_without_instruction_is_zero() {
        // テスト項目: 指示が無い場合の残り時間は 0
        // given (前提条件):
        let now = 1_000;

        // when (操作):
        let remaining = remaining_millis(None, now);

        // then (期待する結果):
        assert_eq!(remaining, 0);
    }

    #[test]
    fn test_remaining_counts_down_and_clamps_at_zero() {
        // テスト項目: 残り時間は経過に応じて減り、負にならない
        // given (前提条件):
        let instr = instruction(5_000, 10_000);

        // when (操作):
        let samples: Vec<i64> = (0..80)
            .map(|step| remaining_millis(Some(&instr), 10_000 + step * 100))
            .collect();

        // then (期待する結果):
        assert_eq!(samples[0], 5_000);
        assert_eq!(samples[10], 4_000);
        assert!(samples.windows(2).all(|w| w[1] <= w[0]));
        assert!(samples.iter().all(|&s| s >= 0));
        assert_eq!(*samples.last().unwrap(), 0);
    }

    #[test]
    fn test_remaining_with_client_clock_behind() {
        // テスト項目: クライアント時刻がサーバーより遅れている場合は補正しない
        // given (前提条件):
        let instr = instruction(5_000, 10_000);

        // when (操作):
        let remaining = remaining_millis(Some(&instr), 9_000);

        // then (期待する結果):
        assert_eq!(remaining, 6_000);
    }

    #[tokio::test]
    async fn test_new_board_recomputes_immediately() {
        // テスト項目: 新しいボードを受け取ると即座に残り時間が再計算される
        // given (前提条件):
        let projections = Arc::new(Projections::new());
        let publisher = Publisher::new(projections.clone(), projections.retire());
        let clock = Arc::new(FixedClock::new(20_000));
        let handle = CountdownProjector::new(clock, Duration::from_secs(3600)).spawn(publisher);
        let mut remaining = projections.time_remaining.subscribe();

        // when (操作):
        projections.player_board.send_replace(Some(PlayerBoard {
            commands: vec![],
            instruction: instruction(8_000, 19_000),
            threat: 10,
        }));

        // then (期待する結果):
        let value = time::timeout(Duration::from_secs(2), remaining.wait_for(|&v| v == 7_000))
            .await
            .expect("countdown should publish")
            .map(|v| *v);
        assert_eq!(value.ok(), Some(7_000));
        handle.abort();
    }

    #[tokio::test]
    async fn test_ticks_are_non_increasing() {
        // テスト項目: 新しいボードが無い間、100ms ごとのサンプルは単調非増加で負にならない
        // given (前提条件):
        let projections = Arc::new(Projections::new());
        let publisher = Publisher::new(projections.clone(), projections.retire());
        let now = rogueai_shared::time::now_millis();
        projections.player_board.send_replace(Some(PlayerBoard {
            commands: vec![],
            instruction: instruction(300, now),
            threat: 0,
        }));
        let handle = CountdownProjector::new(Arc::new(SystemClock), Duration::from_millis(100))
            .spawn(publisher);

        // when (操作):
        let mut samples = Vec::new();
        for _ in 0..6 {
            time::sleep(Duration::from_millis(100)).await;
            samples.push(*projections.time_remaining.borrow());
        }

        // then (期待する結果):
        assert!(samples.windows(2).all(|w| w[1] <= w[0]), "{samples:?}");
        assert!(samples.iter().all(|&s| (0..=300).contains(&s)), "{samples:?}");
        assert_eq!(*samples.last().unwrap(), 0);
        handle.abort();
    }

    #[tokio::test]
    async fn test_end_state_sets_game_over() {
        // テスト項目: end_state(win=true) でゲームオーバーかつ勝利になる
        // given (前提条件):
        let projections = Arc::new(Projections::new());
        let publisher = Publisher::new(projections.clone(), projections.retire());
        let handle = CountdownProjector::new(Arc::new(FixedClock::new(0)), Duration::from_secs(3600))
            .spawn(publisher);
        let mut status = projections.game_status.subscribe();

        // when (操作):
        projections.game_state.send_replace(Some(GameState {
            state: "end_state".to_string(),
            win: Some(true),
            ..Default::default()
        }));

        // then (期待する結果):
        let reached = time::timeout(Duration::from_secs(2), status.wait_for(|s| s.game_over))
            .await
            .expect("status should change")
            .map(|s| *s);
        assert_eq!(
            reached.ok(),
            Some(GameStatus {
                game_over: true,
                victory: true
            })
        );
        handle.abort();
    }
}
