use crate::bus::{
	SlaveBus,
	StatusFlag,
};

use super::{
	Direction,
	Lines,
	LowLevel,
	Received,
};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
enum Phase {
	AwaitStart,
	// master writes, we receive
	Receiving,
	// master reads, we transmit
	Transmitting,
}

/// Software emulation of the shift register interface.
///
/// `status` blocks on the lines until something byte sized happened:
/// - `ShiftRegisterFull` after a byte of a master write addressed to us
/// - `ShiftRegisterEmpty` after the staged byte went out on a master read
/// - `Ready` for everything else (START/STOP handling, foreign addresses)
pub struct BitBangSlave<L: Lines> {
	lines: L,
	device_address: u8,
	phase: Phase,
	shift_register: u8,
	status: StatusFlag,
}

impl<L: Lines> BitBangSlave<L> {
	pub fn new(lines: L) -> Self {
		BitBangSlave {
			lines,
			device_address: 0,
			phase: Phase::AwaitStart,
			shift_register: 0xff,
			status: StatusFlag::Ready,
		}
	}

	pub fn lines(&self) -> &L {
		&self.lines
	}

	pub fn lines_mut(&mut self) -> &mut L {
		&mut self.lines
	}

	pub fn into_inner(self) -> L {
		self.lines
	}

	fn await_start(&mut self) {
		self.lines.wait_for_start();
		let (address, direction) = self.lines.read_address_and_direction();
		if address != self.device_address {
			trace!("address 0x{:02x} {} not for us", address, direction);
			return;
		}
		self.lines.ack();
		debug!("addressed: {}", direction);
		self.phase = match direction {
			Direction::MasterWrite => Phase::Receiving,
			Direction::MasterRead => Phase::Transmitting,
		};
	}

	fn receive(&mut self) {
		match self.lines.receive() {
			Received::Byte(data) => {
				self.shift_register = data;
				self.status = StatusFlag::ShiftRegisterFull;
			},
			Received::Stop => {
				trace!("STOP");
				self.phase = Phase::AwaitStart;
			},
			Received::Start => {
				// no repeated START support: the START itself is gone, so the
				// transaction following it is missed
				debug!("repeated START, waiting for the next one");
				self.phase = Phase::AwaitStart;
			},
		}
	}

	fn transmit(&mut self) {
		let data = self.shift_register;
		if !self.lines.write_byte(data) {
			// NACK: master is done, STOP (or a new START) follows
			self.phase = Phase::AwaitStart;
		}
		self.status = StatusFlag::ShiftRegisterEmpty;
	}
}

impl<L: Lines> SlaveBus for BitBangSlave<L> {
	fn set_device_address(&mut self, address: u8) {
		self.device_address = address & 0x7f;
	}

	fn status(&mut self) -> StatusFlag {
		if self.status != StatusFlag::Ready {
			// previous event wasn't serviced yet
			return self.status;
		}
		match self.phase {
			Phase::AwaitStart => self.await_start(),
			Phase::Receiving => self.receive(),
			Phase::Transmitting => self.transmit(),
		}
		self.status
	}

	fn read_shift_register(&mut self) -> u8 {
		self.shift_register
	}

	fn write_shift_register(&mut self, data: u8) {
		self.shift_register = data;
	}

	fn reset_status(&mut self) {
		self.status = StatusFlag::Ready;
	}
}
