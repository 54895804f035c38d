/// Emulates an I2C EEPROM on top of a `SlaveBus`.
///
/// 16-bit addressing: the master writes the address high byte then low byte;
/// every following master read streams one byte and advances the address,
/// wrapping at the end of the image. With 8-bit addressing a single written
/// byte is the whole address.
///
/// The byte for the next master read must already sit in the shift register
/// when the master clocks it out, so a byte is always staged ahead: after
/// startup, after an address was latched and after each read.

use std::fmt;

use crate::bus::{
	SlaveBus,
	StatusFlag,
};
use crate::config::{
	AddressWidth,
	Config,
};
use crate::memory::MemoryImage;

/// What a single `service` call did
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum State {
	// status was `Ready`: nothing touched
	AwaitingEvent,
	// master read: address advanced, next byte staged
	ServicingRead,
	// address high byte latched (16-bit only)
	ServicingWriteHigh,
	// address complete (low byte, or the single byte in 8-bit mode); byte staged
	ServicingWriteLow,
	// status value we don't know; logged and left alone
	Unexpected(u8),
}

impl fmt::Display for State {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			State::AwaitingEvent => f.write_str("awaiting event"),
			State::ServicingRead => f.write_str("read"),
			State::ServicingWriteHigh => f.write_str("write high"),
			State::ServicingWriteLow => f.write_str("write low"),
			State::Unexpected(status) => write!(f, "unexpected status 0x{:02x}", status),
		}
	}
}

/// Read pointer plus the half-latched state of a two byte address.
///
/// `value` always is a valid index into the image.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AddressCounter {
	value: usize,
	high: u8,
	loading_low: bool,
	modulus: usize,
}

impl AddressCounter {
	pub fn new(modulus: usize) -> Self {
		assert!(modulus > 0);
		AddressCounter {
			value: 0,
			high: 0,
			loading_low: false,
			modulus,
		}
	}

	pub fn value(&self) -> usize {
		self.value
	}

	pub fn is_loading_low(&self) -> bool {
		self.loading_low
	}

	pub fn advance(&mut self) {
		self.value = (self.value + 1) % self.modulus;
	}

	pub fn load(&mut self, address: usize) {
		self.value = address % self.modulus;
	}

	/// first half of a 16-bit address; only the upper bits are known
	pub fn load_high(&mut self, byte: u8) {
		self.high = byte;
		self.load((byte as usize) << 8);
		self.loading_low = true;
	}

	/// second half; returns the complete address
	pub fn load_low(&mut self, byte: u8) -> usize {
		let address = ((self.high as usize) << 8) | (byte as usize);
		self.load(address);
		self.loading_low = false;
		address
	}
}

pub struct Controller<B: SlaveBus> {
	bus: B,
	memory: MemoryImage,
	config: Config,
	address: AddressCounter,
}

impl<B: SlaveBus> Controller<B> {
	pub fn new(bus: B, memory: MemoryImage, config: Config) -> Self {
		let address = AddressCounter::new(memory.len());
		Controller {
			bus,
			memory,
			config,
			address,
		}
	}

	pub fn bus(&self) -> &B {
		&self.bus
	}

	pub fn bus_mut(&mut self) -> &mut B {
		&mut self.bus
	}

	pub fn memory(&self) -> &MemoryImage {
		&self.memory
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn address(&self) -> &AddressCounter {
		&self.address
	}

	pub fn into_bus(self) -> B {
		self.bus
	}

	fn stage(&mut self) {
		let data = self.memory.get(self.address.value());
		trace!("staging [0x{:04x}] = 0x{:02x}", self.address.value(), data);
		self.bus.write_shift_register(data);
	}

	/// program the slave address, stage the first byte, clear the status
	pub fn start(&mut self) {
		info!(
			"I2C slave {} at address 0x{:02x}: {} byte image, {}-bit addressing",
			env!("CARGO_PKG_VERSION"),
			self.config.device_address,
			self.memory.len(),
			self.config.address_width,
		);

		self.bus.set_device_address(self.config.device_address);
		self.stage();
		self.bus.reset_status();
		info!("Started!");
	}

	/// poll the status once and react to it
	pub fn service(&mut self) -> State {
		match self.bus.status() {
			StatusFlag::Ready => State::AwaitingEvent,
			StatusFlag::ShiftRegisterEmpty => {
				// master READ took the staged byte
				self.address.advance();
				self.stage();
				self.bus.reset_status();
				State::ServicingRead
			},
			StatusFlag::ShiftRegisterFull => {
				// master WRITE
				let data = self.bus.read_shift_register();
				let state = match self.config.address_width {
					AddressWidth::Eight => {
						self.address.load(data as usize);
						debug!("address 0x{:02x}", data);
						self.stage();
						State::ServicingWriteLow
					},
					AddressWidth::Sixteen if self.address.is_loading_low() => {
						let address = self.address.load_low(data);
						debug!("address 0x{:04x}", address);
						self.stage();
						State::ServicingWriteLow
					},
					AddressWidth::Sixteen => {
						self.address.load_high(data);
						State::ServicingWriteHigh
					},
				};
				self.bus.reset_status();
				state
			},
			StatusFlag::Other(status) => {
				warn!("unexpected status 0x{:02x}", status);
				State::Unexpected(status)
			},
		}
	}

	pub fn run(&mut self) -> ! {
		self.start();
		loop {
			self.service();
		}
	}
}
