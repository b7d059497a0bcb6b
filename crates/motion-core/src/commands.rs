//! Requests from other execution contexts into the tick loop.
//!
//! The button collaborator runs in interrupt (or another thread's) context and
//! must never touch session state directly. It posts a [`MotionCommand`] into
//! a [`CommandChannel`]; the tick loop drains the channel between ticks and
//! performs the work on its own context.
//!
//! ```rust,ignore
//! static COMMANDS: CommandChannel = CommandChannel::new();
//!
//! // button release handler
//! RecalibrationTrigger::new(&COMMANDS).request();
//!
//! // tick loop
//! runtime.service(now_ms, &mut source, &mut delay, &COMMANDS);
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use log::{info, warn};

/// Channel capacity for pending commands.
/// Recalibration requests coalesce, so a handful of slots is plenty.
pub const COMMAND_QUEUE_DEPTH: usize = 4;

/// Work the tick loop should perform before its next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionCommand {
    /// Re-estimate the sensor bias and reset all derived state.
    Recalibrate,
}

/// Queue shared between edge handlers and the tick loop.
pub type CommandChannel = Channel<CriticalSectionRawMutex, MotionCommand, COMMAND_QUEUE_DEPTH>;

/// Handle given to the button collaborator.
#[derive(Clone, Copy)]
pub struct RecalibrationTrigger<'a> {
    channel: &'a CommandChannel,
}

impl<'a> RecalibrationTrigger<'a> {
    pub const fn new(channel: &'a CommandChannel) -> Self {
        Self { channel }
    }

    /// Ask the tick loop to recalibrate. Never blocks, safe from interrupt
    /// context.
    ///
    /// Returns `false` when the queue is already full; a recalibration is
    /// pending in that case, so nothing is lost.
    pub fn request(&self) -> bool {
        match self.channel.try_send(MotionCommand::Recalibrate) {
            Ok(()) => {
                info!("Recalibration requested");
                true
            }
            Err(TrySendError::Full(_)) => {
                warn!("Command queue full, recalibration request dropped");
                false
            }
        }
    }
}

/// Commands collected from one drain of the channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingCommands {
    pub recalibrate: bool,
}

/// Empty the channel, folding duplicate requests together.
pub fn drain(channel: &CommandChannel) -> PendingCommands {
    let mut pending = PendingCommands::default();
    while let Ok(command) = channel.try_receive() {
        match command {
            MotionCommand::Recalibrate => pending.recalibrate = true,
        }
    }
    pending
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_coalesce() {
        let channel = CommandChannel::new();
        let trigger = RecalibrationTrigger::new(&channel);

        assert!(trigger.request());
        assert!(trigger.request());

        assert_eq!(drain(&channel), PendingCommands { recalibrate: true });
        assert_eq!(drain(&channel), PendingCommands::default());
    }

    #[test]
    fn test_full_queue_drops_extra_requests() {
        let channel = CommandChannel::new();
        let trigger = RecalibrationTrigger::new(&channel);

        for _ in 0..COMMAND_QUEUE_DEPTH {
            assert!(trigger.request());
        }
        assert!(!trigger.request());
        assert!(drain(&channel).recalibrate);
    }

    #[test]
    fn test_trigger_from_another_thread() {
        extern crate std;

        static CHANNEL: CommandChannel = CommandChannel::new();

        std::thread::spawn(|| RecalibrationTrigger::new(&CHANNEL).request())
            .join()
            .unwrap();

        assert!(drain(&CHANNEL).recalibrate);
    }
}
