use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::time::Duration;

use core_events::{CHANNEL_SEND_FAILURES, Event};
use tokio::runtime::{Handle, TryCurrentError};
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::{Scheduler, TimerFired, TimerHandle, TimerKind};

/// Real-time scheduler delivering firings as `Event::Timer` on the host channel.
pub struct TokioScheduler {
    tx: Sender<Event>,
    runtime: Handle,
    next_id: u64,
    tasks: HashMap<TimerHandle, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new(tx: Sender<Event>, runtime: Handle) -> Self {
        Self {
            tx,
            runtime,
            next_id: 0,
            tasks: HashMap::new(),
        }
    }

    /// Bind to the runtime the caller is running on.
    pub fn current(tx: Sender<Event>) -> Result<Self, TryCurrentError> {
        Ok(Self::new(tx, Handle::try_current()?))
    }

    /// Timers armed and not yet finished or cancelled.
    pub fn live_count(&self) -> usize {
        self.tasks.values().filter(|t| !t.is_finished()).count()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration, kind: TimerKind) -> TimerHandle {
        self.tasks.retain(|_, task| !task.is_finished());
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        let tx = self.tx.clone();
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if tx
                .send(Event::Timer(TimerFired { handle, kind }))
                .await
                .is_err()
            {
                CHANNEL_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
                trace!(target: "timer", %handle, "fire_send_failed_channel_closed");
            }
        });
        trace!(target: "timer", %handle, ?kind, delay_ms = delay.as_millis() as u64, "tokio_schedule");
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
            trace!(target: "timer", %handle, "tokio_cancel");
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn fired_timer_reaches_channel() {
        let (tx, mut rx) = mpsc::channel::<Event>(8);
        let mut sched = TokioScheduler::current(tx).expect("inside runtime");
        let handle = sched.schedule(Duration::from_millis(10), TimerKind::Highlight);
        let ev = tokio::time::timeout(Duration::from_millis(500), rx.recv())
            .await
            .expect("timer should fire");
        assert_eq!(
            ev,
            Some(Event::Timer(TimerFired {
                handle,
                kind: TimerKind::Highlight
            }))
        );
    }

    #[tokio::test]
    async fn cancelled_timer_stays_silent() {
        let (tx, mut rx) = mpsc::channel::<Event>(8);
        let mut sched = TokioScheduler::current(tx).expect("inside runtime");
        let handle = sched.schedule(Duration::from_millis(30), TimerKind::ChordExpiry);
        sched.cancel(handle);
        assert_eq!(sched.live_count(), 0);
        let res = tokio::time::timeout(Duration::from_millis(120), rx.recv()).await;
        assert!(res.is_err(), "no event expected after cancel, got {res:?}");
    }

    #[test]
    fn current_outside_runtime_is_an_error() {
        let (tx, _rx) = mpsc::channel::<Event>(1);
        assert!(TokioScheduler::current(tx).is_err());
    }
}
