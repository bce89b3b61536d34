//! Allows to listen to runtime events.

use ride_core::Value;
use crate::Step;

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
pub enum Event<'a> {
	Step(Step<'a>),
	StateRead {
		key: &'a str,
		value: Option<&'a Value>,
	},
	Invoke {
		function: &'a str,
	},
}

impl<'a> Event<'a> {
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
