//! Allows to listen to executor events.

use ride_core::Address;

environmental::environmental!(listener: dyn EventListener + 'static);

pub trait EventListener {
	fn event(
		&mut self,
		event: Event
	);
}

#[derive(Debug, Copy, Clone)]
pub enum Event<'a> {
	Call {
		dapp: &'a Address,
		function: &'a str,
		depth: usize,
	},
	Verify {
		this: &'a Address,
	},
	Exit {
		dapp: &'a Address,
		complexity: u32,
		succeed: bool,
	},
}

/// Run closure with provided listener.
pub fn using<R, F: FnOnce() -> R>(
	new: &mut (dyn EventListener + 'static),
	f: F
) -> R {
	listener::using(new, f)
}

pub(crate) fn with<F: FnOnce(&mut (dyn EventListener + 'static))>(
	f: F
) {
	listener::with(f);
}
