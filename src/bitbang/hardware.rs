use std::hint;
use std::time::{
	Duration,
	Instant,
};

// hold time after releasing ACK; well below a 400 kHz bit
pub const ACK_SETTLE: Duration = Duration::from_nanos(250);

// spin instead of sleeping: the scheduler can't give us sub-microsecond delays
pub fn busy_wait(duration: Duration) {
	let start = Instant::now();
	while start.elapsed() < duration {
		hint::spin_loop();
	}
}

/// Instantaneous levels of SCL and SDA
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct LineState {
	pub clock: bool,
	pub data: bool,
}

impl LineState {
	pub const IDLE: LineState = LineState { clock: true, data: true };

	pub fn new(clock: bool, data: bool) -> Self {
		LineState { clock, data }
	}
}

pub trait Lines {
	// current levels; every call is a fresh read of the bus
	fn sample(&mut self) -> LineState;

	// `true` pulls SDA low, `false` floats it (input mode)
	fn drive_data_low(&mut self, enable: bool);

	// short fixed delay for ACK timing
	fn delay(&mut self) {
		busy_wait(ACK_SETTLE);
	}
}

impl<'a, L: ?Sized + Lines> Lines for &'a mut L {
	fn sample(&mut self) -> LineState {
		L::sample(*self)
	}
	fn drive_data_low(&mut self, enable: bool) {
		L::drive_data_low(*self, enable)
	}
	fn delay(&mut self) {
		L::delay(*self)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn busy_wait_waits() {
		let start = Instant::now();
		busy_wait(Duration::from_micros(50));
		assert!(start.elapsed() >= Duration::from_micros(50));
	}
}
