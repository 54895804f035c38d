/// CSR bank of the I2C slave core, MiSoC style: every 8-bit register sits
/// in the low byte of its own 32-bit word.
///
/// - w: bit-bang output (SDA output-enable, SDA out)
/// - r: bit-bang input (SDA in, SCL in)
/// - slave_addr, shift_reg, status: hardware-assisted slave

mod mapped;

use std::path::Path;

use crate::bitbang::{
	LineState,
	Lines,
};
use crate::shift_register::Registers;

pub use self::mapped::Mapped;

// bit-bang register bits
pub const I2C_SDAOE: u8 = 0x01;
pub const I2C_SDAOUT: u8 = 0x02;
pub const I2C_SDAIN: u8 = 0x01;
pub const I2C_SCLIN: u8 = 0x02;

pub const CSR_BANK_LEN: usize = 0x14;

pub trait RegisterWindow {
	fn read_dword(&self, offset: usize) -> u32;
	fn write_dword(&mut self, offset: usize, data: u32);

	fn read_csr(&self, offset: usize) -> u8 {
		self.read_dword(offset) as u8
	}

	fn write_csr(&mut self, offset: usize, data: u8) {
		self.write_dword(offset, data as u32)
	}
}

impl<'a, W: ?Sized + RegisterWindow> RegisterWindow for &'a mut W {
	fn read_dword(&self, offset: usize) -> u32 {
		W::read_dword(*self, offset)
	}
	fn write_dword(&mut self, offset: usize, data: u32) {
		W::write_dword(*self, offset, data)
	}
}

/// register offsets inside the bank
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CsrLayout {
	pub w: usize,
	pub r: usize,
	pub slave_addr: usize,
	pub shift_reg: usize,
	pub status: usize,
}

impl Default for CsrLayout {
	fn default() -> Self {
		CsrLayout {
			w: 0x00,
			r: 0x04,
			slave_addr: 0x08,
			shift_reg: 0x0c,
			status: 0x10,
		}
	}
}

pub struct CsrBank<W: RegisterWindow> {
	window: W,
	layout: CsrLayout,
}

impl<W: RegisterWindow> CsrBank<W> {
	pub fn new(window: W, layout: CsrLayout) -> Self {
		CsrBank { window, layout }
	}

	pub fn window(&self) -> &W {
		&self.window
	}
}

impl CsrBank<Mapped> {
	pub fn open(path: &Path, base: u64) -> crate::AResult<Self> {
		let window = with_context!(("couldn't map CSR bank at 0x{:08x} from {}", base, path.display()), {
			Mapped::open(path, base, CSR_BANK_LEN).map_err(|e| e.into())
		})?;
		debug!("mapped CSR bank at 0x{:08x}", base);
		Ok(CsrBank::new(window, CsrLayout::default()))
	}
}

impl<W: RegisterWindow> Lines for CsrBank<W> {
	fn sample(&mut self) -> LineState {
		let r = self.window.read_csr(self.layout.r);
		LineState {
			clock: 0 != r & I2C_SCLIN,
			data: 0 != r & I2C_SDAIN,
		}
	}

	fn drive_data_low(&mut self, enable: bool) {
		// SDAOUT stays 0: enabling the output always means "pull low"
		self.window.write_csr(self.layout.w, if enable { I2C_SDAOE } else { 0 });
	}
}

impl<W: RegisterWindow> Registers for CsrBank<W> {
	fn write_slave_address(&mut self, address: u8) {
		self.window.write_csr(self.layout.slave_addr, address);
	}
	fn read_shift_register(&mut self) -> u8 {
		self.window.read_csr(self.layout.shift_reg)
	}
	fn write_shift_register(&mut self, data: u8) {
		self.window.write_csr(self.layout.shift_reg, data);
	}
	fn read_status(&mut self) -> u8 {
		self.window.read_csr(self.layout.status)
	}
	fn write_status(&mut self, status: u8) {
		self.window.write_csr(self.layout.status, status);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::bus::SlaveBus;
	use crate::shift_register::ShiftRegisterBus;

	// plain memory standing in for the bank; records writes in order
	struct Memory {
		words: [u32; CSR_BANK_LEN / 4],
		writes: Vec<(usize, u32)>,
	}

	impl Memory {
		fn new() -> Self {
			Memory {
				words: [0; CSR_BANK_LEN / 4],
				writes: Vec::new(),
			}
		}
	}

	impl RegisterWindow for Memory {
		fn read_dword(&self, offset: usize) -> u32 {
			self.words[offset / 4]
		}
		fn write_dword(&mut self, offset: usize, data: u32) {
			self.words[offset / 4] = data;
			self.writes.push((offset, data));
		}
	}

	#[test]
	fn line_bits() {
		let mut memory = Memory::new();
		memory.words[1] = (I2C_SCLIN | I2C_SDAIN) as u32;
		let mut bank = CsrBank::new(&mut memory, CsrLayout::default());
		assert_eq!(bank.sample(), LineState::IDLE);
		bank.drive_data_low(true);
		bank.drive_data_low(false);
		assert_eq!(memory.writes, vec![(0x00, I2C_SDAOE as u32), (0x00, 0)]);
	}

	#[test]
	fn sda_low_with_clock_high() {
		let mut memory = Memory::new();
		memory.words[1] = I2C_SCLIN as u32;
		let mut bank = CsrBank::new(&mut memory, CsrLayout::default());
		assert_eq!(bank.sample(), LineState::new(true, false));
		assert_eq!(bank.window().words[1], I2C_SCLIN as u32);
	}

	#[test]
	fn shift_register_through_bank() {
		let mut memory = Memory::new();
		{
			let mut bus = ShiftRegisterBus::new(CsrBank::new(&mut memory, CsrLayout::default()));
			bus.set_device_address(0x40);
			bus.write_shift_register(0xab);
			bus.reset_status();
		}
		assert_eq!(memory.writes, vec![(0x08, 0x40), (0x0c, 0xab), (0x10, 0)]);

		memory.words[4] = 2;
		memory.words[3] = 0x5a;
		let mut bus = ShiftRegisterBus::new(CsrBank::new(&mut memory, CsrLayout::default()));
		assert_eq!(bus.status(), crate::bus::StatusFlag::ShiftRegisterFull);
		assert_eq!(bus.read_shift_register(), 0x5a);
	}
}
