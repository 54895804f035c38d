/// Hardware-assisted slave: the gateware does START detection, bit timing,
/// address match and ACK; software only sees whole bytes through three
/// registers:
///
/// - slave_addr (7-bit, written once at startup)
/// - shift_reg (byte written by the master / byte to send on master read)
/// - status (`Ready`, `ShiftRegisterEmpty` after a master read,
///   `ShiftRegisterFull` after a master write; writing resets)

use crate::bus::{
	SlaveBus,
	StatusFlag,
};

pub trait Registers {
	fn write_slave_address(&mut self, address: u8);
	fn read_shift_register(&mut self) -> u8;
	fn write_shift_register(&mut self, data: u8);
	fn read_status(&mut self) -> u8;
	fn write_status(&mut self, status: u8);
}

impl<'a, R: ?Sized + Registers> Registers for &'a mut R {
	fn write_slave_address(&mut self, address: u8) {
		R::write_slave_address(*self, address)
	}
	fn read_shift_register(&mut self) -> u8 {
		R::read_shift_register(*self)
	}
	fn write_shift_register(&mut self, data: u8) {
		R::write_shift_register(*self, data)
	}
	fn read_status(&mut self) -> u8 {
		R::read_status(*self)
	}
	fn write_status(&mut self, status: u8) {
		R::write_status(*self, status)
	}
}

pub struct ShiftRegisterBus<R: Registers> {
	registers: R,
}

impl<R: Registers> ShiftRegisterBus<R> {
	pub fn new(registers: R) -> Self {
		ShiftRegisterBus { registers }
	}

	pub fn registers(&self) -> &R {
		&self.registers
	}

	pub fn registers_mut(&mut self) -> &mut R {
		&mut self.registers
	}

	pub fn into_inner(self) -> R {
		self.registers
	}
}

impl<R: Registers> SlaveBus for ShiftRegisterBus<R> {
	fn set_device_address(&mut self, address: u8) {
		self.registers.write_slave_address(address);
	}

	fn status(&mut self) -> StatusFlag {
		StatusFlag::from(self.registers.read_status())
	}

	fn read_shift_register(&mut self) -> u8 {
		self.registers.read_shift_register()
	}

	fn write_shift_register(&mut self, data: u8) {
		self.registers.write_shift_register(data);
	}

	fn reset_status(&mut self) {
		self.registers.write_status(StatusFlag::Ready.bits());
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::sim::RegisterFile;

	#[test]
	fn maps_registers() {
		let mut bus = ShiftRegisterBus::new(RegisterFile::new());
		bus.set_device_address(0x40);
		assert_eq!(bus.registers().slave_address(), 0x40);
		assert_eq!(bus.status(), StatusFlag::Ready);

		bus.registers_mut().master_write(0x99);
		assert_eq!(bus.status(), StatusFlag::ShiftRegisterFull);
		assert_eq!(bus.read_shift_register(), 0x99);
		bus.reset_status();
		assert_eq!(bus.status(), StatusFlag::Ready);

		bus.write_shift_register(0x12);
		assert_eq!(bus.registers_mut().master_read(), 0x12);
		assert_eq!(bus.status(), StatusFlag::ShiftRegisterEmpty);

		bus.registers_mut().force_status(0x80);
		assert_eq!(bus.status(), StatusFlag::Other(0x80));
	}
}
