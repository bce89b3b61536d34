//! Allows to listen to gasometer events.

use super::Snapshot;

#[cfg(feature = "tracing")]
environmental::environmental!(hook: dyn EventListener + 'static);

#[cfg(feature = "tracing")]
pub trait EventListener {
	fn event(
		&mut self,
		event: Event
	);
}

#[derive(Debug, Copy, Clone)]
pub enum Event {
	RecordCost {
		cost: u32,
		snapshot: Snapshot,
	},
	LimitExceeded {
		cost: u32,
		snapshot: Snapshot,
	},
}

impl Event {
	#[cfg(feature = "tracing")]
	pub(crate) fn emit(self) {
		hook::with(|hook| hook.event(self));
	}

	#[cfg(not(feature = "tracing"))]
	pub(crate) fn emit(self) {
		// no op.
	}
}

/// Run closure with provided listener.
#[cfg(feature = "tracing")]
pub fn using<R, F: FnOnce() -> R>(
	listener: &mut (dyn EventListener + 'static),
	f: F
) -> R {
	hook::using(listener, f)
}
