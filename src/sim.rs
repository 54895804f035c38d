/// Simulated hardware for running the slave without a bus: a register file
/// behaving like the hardware slave, and a scripted master driving SCL/SDA
/// for the bit-bang slave.

use std::collections::VecDeque;

use crate::bitbang::{
	Direction,
	LineState,
	Lines,
};
use crate::bus::{
	STATUS_READY,
	STATUS_SHIFT_REG_EMPTY,
	STATUS_SHIFT_REG_FULL,
};
use crate::config::{
	AddressWidth,
	Config,
};
use crate::controller::Controller;
use crate::memory::MemoryImage;
use crate::shift_register::{
	Registers,
	ShiftRegisterBus,
};

/// Registers of the hardware slave, with the master side operated by hand.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RegisterFile {
	slave_address: u8,
	shift_register: u8,
	status: u8,
}

impl Default for RegisterFile {
	fn default() -> Self {
		RegisterFile {
			slave_address: 0,
			shift_register: 0,
			status: STATUS_READY,
		}
	}
}

impl RegisterFile {
	pub fn new() -> Self {
		RegisterFile::default()
	}

	pub fn slave_address(&self) -> u8 {
		self.slave_address
	}

	pub fn shift_register(&self) -> u8 {
		self.shift_register
	}

	pub fn status(&self) -> u8 {
		self.status
	}

	// a byte of a master write arrived
	pub fn master_write(&mut self, data: u8) {
		self.shift_register = data;
		self.status = STATUS_SHIFT_REG_FULL;
	}

	// master clocked out the staged byte
	pub fn master_read(&mut self) -> u8 {
		self.status = STATUS_SHIFT_REG_EMPTY;
		self.shift_register
	}

	pub fn force_status(&mut self, status: u8) {
		self.status = status;
	}
}

impl Registers for RegisterFile {
	fn write_slave_address(&mut self, address: u8) {
		self.slave_address = address;
	}
	fn read_shift_register(&mut self) -> u8 {
		self.shift_register
	}
	fn write_shift_register(&mut self, data: u8) {
		self.shift_register = data;
	}
	fn read_status(&mut self) -> u8 {
		self.status
	}
	fn write_status(&mut self, status: u8) {
		self.status = status;
	}
}

pub type SimulatedController = Controller<ShiftRegisterBus<RegisterFile>>;

/// started controller on a fresh register file
pub fn simulated_controller(memory: MemoryImage, config: Config) -> SimulatedController {
	let mut controller = Controller::new(ShiftRegisterBus::new(RegisterFile::new()), memory, config);
	controller.start();
	controller
}

/// master write of the address bytes the configured address width needs
pub fn write_address(controller: &mut SimulatedController, address: u16) {
	let bytes = address.to_be_bytes();
	let bytes = match controller.config().address_width {
		AddressWidth::Eight => &bytes[1..],
		AddressWidth::Sixteen => &bytes[..],
	};
	for &b in bytes {
		controller.bus_mut().registers_mut().master_write(b);
		controller.service();
	}
}

/// `count` master reads
pub fn read(controller: &mut SimulatedController, count: usize) -> Vec<u8> {
	(0..count).map(|_| {
		let data = controller.bus_mut().registers_mut().master_read();
		controller.service();
		data
	}).collect()
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Probe {
	// slave ACK slot
	Ack,
	// data bit driven by the slave
	Bit,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Step {
	line: LineState,
	probe: Option<Probe>,
}

// each clock phase lasts this many samples
const PHASE_SAMPLES: usize = 2;

/// Waveform of an I2C master, one entry per slave sample.
///
/// SDA levels are what the master drives; where the slave is expected to
/// answer the master leaves SDA high.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct MasterScript {
	steps: Vec<Step>,
}

impl MasterScript {
	pub fn new() -> Self {
		MasterScript::default()
	}

	pub fn len(&self) -> usize {
		self.steps.len()
	}

	pub fn is_empty(&self) -> bool {
		self.steps.is_empty()
	}

	fn phase(mut self, clock: bool, data: bool, probe: Option<Probe>) -> Self {
		let line = LineState::new(clock, data);
		self.steps.push(Step { line, probe });
		for _ in 1..PHASE_SAMPLES {
			self.steps.push(Step { line, probe: None });
		}
		self
	}

	fn clock_bit(self, data: bool, probe: Option<Probe>) -> Self {
		self.phase(false, data, None).phase(true, data, probe)
	}

	pub fn idle(mut self, samples: usize) -> Self {
		for _ in 0..samples {
			self.steps.push(Step { line: LineState::IDLE, probe: None });
		}
		self
	}

	/// also usable as repeated START
	pub fn start(self) -> Self {
		self.phase(false, true, None)
			.phase(true, true, None)
			.phase(true, false, None)
			.phase(false, false, None)
	}

	pub fn stop(self) -> Self {
		self.phase(false, false, None)
			.phase(true, false, None)
			.phase(true, true, None)
	}

	/// 8 bits plus a released ACK slot
	pub fn write_byte(mut self, byte: u8) -> Self {
		for bit in (0..8).rev() {
			self = self.clock_bit(0 != byte & (1u8 << bit), None);
		}
		self.clock_bit(true, Some(Probe::Ack))
	}

	pub fn address(self, address: u8, direction: Direction) -> Self {
		let rw = match direction {
			Direction::MasterWrite => 0,
			Direction::MasterRead => 1,
		};
		self.write_byte(address << 1 | rw)
	}

	/// 8 released bit slots, then ACK (more please) or NACK (done)
	pub fn read_byte(mut self, ack: bool) -> Self {
		for _ in 0..8 {
			self = self.clock_bit(true, Some(Probe::Bit));
		}
		self.clock_bit(!ack, None)
	}
}

/// Plays a `MasterScript`, one step per `sample`, with SDA as wired-AND of
/// master and slave.
///
/// After the script the master parks SCL low for one phase; sampling past
/// that panics, since a real slave would spin forever there.
#[derive(Clone, Debug)]
pub struct ScriptedLines {
	steps: VecDeque<Step>,
	driving: bool,
	pulses: usize,
	observed: Vec<(Probe, bool)>,
}

impl ScriptedLines {
	pub fn new(script: MasterScript) -> Self {
		let last_data = script.steps.last().map_or(true, |s| s.line.data);
		let script = script.phase(false, last_data, None);
		ScriptedLines {
			steps: script.steps.into_iter().collect(),
			driving: false,
			pulses: 0,
			observed: Vec::new(),
		}
	}

	pub fn remaining(&self) -> usize {
		self.steps.len()
	}

	pub fn is_driving(&self) -> bool {
		self.driving
	}

	// how often the slave started pulling SDA low
	pub fn drive_pulses(&self) -> usize {
		self.pulses
	}

	/// per ACK slot seen so far: did the slave pull SDA low
	pub fn observed_acks(&self) -> Vec<bool> {
		self.observed.iter()
			.filter(|&&(probe, _)| probe == Probe::Ack)
			.map(|&(_, data)| !data)
			.collect()
	}

	/// bytes the slave transmitted (only complete ones)
	pub fn observed_bytes(&self) -> Vec<u8> {
		let bits: Vec<bool> = self.observed.iter()
			.filter(|&&(probe, _)| probe == Probe::Bit)
			.map(|&(_, data)| data)
			.collect();
		bits.chunks(8)
			.filter(|chunk| chunk.len() == 8)
			.map(|chunk| chunk.iter().fold(0u8, |byte, &bit| (byte << 1) | bit as u8))
			.collect()
	}
}

impl Lines for ScriptedLines {
	fn sample(&mut self) -> LineState {
		let step = match self.steps.pop_front() {
			Some(step) => step,
			None => panic!("master script exhausted: slave is waiting for a bus event that never comes"),
		};
		let data = step.line.data && !self.driving;
		if let Some(probe) = step.probe {
			self.observed.push((probe, data));
		}
		LineState::new(step.line.clock, data)
	}

	fn drive_data_low(&mut self, enable: bool) {
		if enable && !self.driving {
			self.pulses += 1;
		}
		self.driving = enable;
	}

	fn delay(&mut self) {
	}
}
