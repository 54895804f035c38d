/// Software I2C slave on raw SCL/SDA access.
///
/// Lines:
/// - SCL, SDA: sampled as inputs
/// - SDA output-enable: when set the data line is pulled low (ACK, 0 bits);
///   otherwise it floats and the pull-up (or the master) decides
///
/// Everything is busy-polling; there are no timeouts. A master violating the
/// bit timing gives wrong bits, not errors.
///
/// Frame:
/// - START: SDA falls while SCL is high
/// - 8 data bits, MSB first, sampled on rising SCL; SDA only changes while
///   SCL is low
/// - ninth clock: receiver pulls SDA low to ACK
/// - STOP: SDA rises while SCL is high

mod detector;
mod hardware;
mod low_level;
mod slave;

pub use self::detector::{
	DetectorState,
	StartDetector,
};

pub use self::hardware::{
	ACK_SETTLE,
	LineState,
	Lines,
	busy_wait,
};

pub use self::low_level::{
	Direction,
	LowLevel,
	Received,
};

pub use self::slave::BitBangSlave;
