use std::fmt;

use super::{
	LineState,
	Lines,
	StartDetector,
};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Direction {
	// R/W bit 0: master writes, slave receives
	MasterWrite,
	// R/W bit 1: master reads, slave transmits
	MasterRead,
}

impl From<u8> for Direction {
	fn from(address_byte: u8) -> Self {
		if 0 != address_byte & 0x1 {
			Direction::MasterRead
		} else {
			Direction::MasterWrite
		}
	}
}

impl fmt::Display for Direction {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(match *self {
			Direction::MasterWrite => "W",
			Direction::MasterRead => "R",
		})
	}
}

/// what showed up where the next byte of a master write was expected
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Received {
	Byte(u8),
	Stop,
	Start,
}

trait InternalLowLevel: Lines {
	// spin while SCL is high; returns the first sample with SCL low
	fn _wait_clock_low(&mut self) -> LineState {
		loop {
			let sample = self.sample();
			if !sample.clock {
				return sample;
			}
		}
	}

	// spin while SCL is low; returns the first sample with SCL high
	fn _wait_clock_high(&mut self) -> LineState {
		loop {
			let sample = self.sample();
			if sample.clock {
				return sample;
			}
		}
	}

	// falling edge (end of previous bit), rising edge (data stable), sample
	fn _read_bit(&mut self) -> bool {
		self._wait_clock_low();
		self._wait_clock_high().data
	}
}

impl<L: Lines + ?Sized> InternalLowLevel for L {
}

/// Bit level I2C slave primitives on top of raw line access.
///
/// Every operation leaves the bus with SCL low (or, after `read_bits`, in the
/// high phase of the 8th bit), so they can be chained without losing a clock.
pub trait LowLevel: Lines {
	fn wait_for_start(&mut self) {
		StartDetector::new().wait_for_start(self);
	}

	/// 8 bits, MSB first, without acknowledging
	fn read_bits(&mut self) -> u8 {
		let mut byte = 0u8;
		for _ in 0..8 {
			byte = (byte << 1) | (self._read_bit() as u8);
		}
		byte
	}

	/// pull SDA low for the ninth clock pulse
	fn ack(&mut self) {
		self._wait_clock_low();
		self.drive_data_low(true);
		self._wait_clock_high();
		self._wait_clock_low();
		self.delay();
		// SDA as input
		self.drive_data_low(false);
	}

	fn read_byte(&mut self) -> u8 {
		let byte = self.read_bits();
		self.ack();
		trace!("read byte 0x{:02x}", byte);
		byte
	}

	/// 7-bit device address from the first byte after START; the R/W bit is
	/// dropped
	fn read_address(&mut self) -> u8 {
		self.read_byte() >> 1
	}

	/// first byte after START split into address and R/W bit. Doesn't ACK:
	/// only the addressed device may answer.
	fn read_address_and_direction(&mut self) -> (u8, Direction) {
		let byte = self.read_bits();
		(byte >> 1, Direction::from(byte))
	}

	/// next byte of a master write, or the STOP / repeated START ending it.
	///
	/// STOP and START can only show up in the first bit slot: the master
	/// moves SDA while SCL is high instead of clocking data.
	fn receive(&mut self) -> Received {
		self._wait_clock_low();
		let first = self._wait_clock_high().data;
		loop {
			let sample = self.sample();
			if !sample.clock {
				break;
			}
			if sample.data != first {
				return if sample.data { Received::Stop } else { Received::Start };
			}
		}

		let mut byte = first as u8;
		for _ in 1..8 {
			byte = (byte << 1) | (self._read_bit() as u8);
		}
		self.ack();
		trace!("received byte 0x{:02x}", byte);
		Received::Byte(byte)
	}

	/// transmit one byte for a master read, MSB first; SCL must be low.
	///
	/// Returns whether the master acknowledged (wants another byte).
	fn write_byte(&mut self, byte: u8) -> bool {
		for bit in (0..8).rev() {
			let one = 0 != byte & (1u8 << bit);
			// change SDA only while SCL is low
			self.drive_data_low(!one);
			self._wait_clock_high();
			self._wait_clock_low();
		}
		self.drive_data_low(false);
		let acked = !self._wait_clock_high().data;
		self._wait_clock_low();
		trace!("wrote byte 0x{:02x} ({})", byte, if acked { "ACK" } else { "NACK" });
		acked
	}
}

impl<L: Lines + ?Sized> LowLevel for L {
}
