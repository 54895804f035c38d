use std::fmt;

// raw status register values
pub const STATUS_READY: u8 = 0x00;
pub const STATUS_SHIFT_REG_EMPTY: u8 = 0x01; // master READ consumed the staged byte
pub const STATUS_SHIFT_REG_FULL: u8 = 0x02; // master WRITE left a byte in the shift register

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum StatusFlag {
	Ready,
	ShiftRegisterEmpty,
	ShiftRegisterFull,
	Other(u8),
}

impl StatusFlag {
	pub fn bits(self) -> u8 {
		match self {
			StatusFlag::Ready => STATUS_READY,
			StatusFlag::ShiftRegisterEmpty => STATUS_SHIFT_REG_EMPTY,
			StatusFlag::ShiftRegisterFull => STATUS_SHIFT_REG_FULL,
			StatusFlag::Other(v) => v,
		}
	}
}

impl From<u8> for StatusFlag {
	fn from(v: u8) -> Self {
		match v {
			STATUS_READY => StatusFlag::Ready,
			STATUS_SHIFT_REG_EMPTY => StatusFlag::ShiftRegisterEmpty,
			STATUS_SHIFT_REG_FULL => StatusFlag::ShiftRegisterFull,
			v => StatusFlag::Other(v),
		}
	}
}

impl fmt::Display for StatusFlag {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "0x{:02x}", self.bits())
	}
}

/// Byte-granularity view of an I2C slave, modelled after the shift register
/// + status flag interface of the hardware slave.
///
/// The controller only talks to this trait; the hardware-assisted variant
/// maps it 1:1 to registers, the bit-bang variant emulates it on the lines.
///
/// All calls may have side effects on the bus and must happen in program
/// order.
pub trait SlaveBus {
	fn set_device_address(&mut self, address: u8);

	// may block (bit-bang) until something happened on the bus
	fn status(&mut self) -> StatusFlag;

	// only meaningful after `ShiftRegisterFull`
	fn read_shift_register(&mut self) -> u8;

	// byte to send on the next master read
	fn write_shift_register(&mut self, data: u8);

	// back to `Ready` after an event was serviced
	fn reset_status(&mut self);
}

impl<'a, B: ?Sized + SlaveBus> SlaveBus for &'a mut B {
	fn set_device_address(&mut self, address: u8) {
		B::set_device_address(*self, address)
	}
	fn status(&mut self) -> StatusFlag {
		B::status(*self)
	}
	fn read_shift_register(&mut self) -> u8 {
		B::read_shift_register(*self)
	}
	fn write_shift_register(&mut self, data: u8) {
		B::write_shift_register(*self, data)
	}
	fn reset_status(&mut self) {
		B::reset_status(*self)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_from_raw() {
		assert_eq!(StatusFlag::from(0), StatusFlag::Ready);
		assert_eq!(StatusFlag::from(1), StatusFlag::ShiftRegisterEmpty);
		assert_eq!(StatusFlag::from(2), StatusFlag::ShiftRegisterFull);
		assert_eq!(StatusFlag::from(0x42), StatusFlag::Other(0x42));
		assert_eq!(StatusFlag::Other(0x42).bits(), 0x42);
		assert_eq!(format!("{}", StatusFlag::ShiftRegisterFull), "0x02");
	}
}
