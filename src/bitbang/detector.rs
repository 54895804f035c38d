use super::{
	LineState,
	Lines,
};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum DetectorState {
	Idle,
	// both lines seen high; waiting for SDA to drop while SCL stays high
	DataFallingSeen,
	StartConfirmed,
}

impl Default for DetectorState {
	fn default() -> Self {
		DetectorState::Idle
	}
}

/// Recognizes a START condition (SDA falling while SCL is high) from raw
/// line samples.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct StartDetector {
	state: DetectorState,
}

impl StartDetector {
	pub fn new() -> Self {
		StartDetector::default()
	}

	pub fn state(&self) -> DetectorState {
		self.state
	}

	pub fn reset(&mut self) {
		self.state = DetectorState::Idle;
	}

	/// feed one sample; returns true exactly when it completes a START
	pub fn step(&mut self, sample: LineState) -> bool {
		self.state = match (self.state, sample.clock, sample.data) {
			(DetectorState::Idle, true, true) => DetectorState::DataFallingSeen,
			(DetectorState::Idle, _, _) => DetectorState::Idle,
			(DetectorState::DataFallingSeen, true, false) => DetectorState::StartConfirmed,
			(DetectorState::DataFallingSeen, true, true) => DetectorState::DataFallingSeen,
			(DetectorState::DataFallingSeen, false, _) => DetectorState::Idle,
			// a confirmed START is consumed by whoever saw `true`
			(DetectorState::StartConfirmed, true, true) => DetectorState::DataFallingSeen,
			(DetectorState::StartConfirmed, _, _) => DetectorState::Idle,
		};
		self.state == DetectorState::StartConfirmed
	}

	/// busy-polls until a START was seen. Never times out: a slave without a
	/// master simply waits.
	pub fn wait_for_start<L: Lines + ?Sized>(&mut self, lines: &mut L) {
		self.reset();
		// SDA as input
		lines.drive_data_low(false);
		while !self.step(lines.sample()) {}
		trace!("START");
		self.reset();
	}
}
