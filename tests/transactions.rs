extern crate i2cslave;

use i2cslave::bitbang::{
	BitBangSlave,
	Direction,
};
use i2cslave::sim::{
	self,
	MasterScript,
	ScriptedLines,
};
use i2cslave::*;

fn counting_image(len: usize) -> MemoryImage {
	MemoryImage::from_vec((0..len).map(|i| i as u8).collect()).unwrap()
}

fn slave_config(address_width: AddressWidth) -> Config {
	Config::new(address_width, config::DEFAULT_SLAVE_ADDRESS).unwrap()
}

#[test]
fn sixteen_bit_address_round_trip() {
	let memory = MemoryImage::from_vec((0..0x300).map(|i| (i ^ (i >> 8)) as u8).collect()).unwrap();
	let mut controller = sim::simulated_controller(memory.clone(), slave_config(AddressWidth::Sixteen));

	sim::write_address(&mut controller, 0x0102);
	let data = sim::read(&mut controller, 8);
	let expected: Vec<u8> = (0x0102..0x010a).map(|a| memory.get(a)).collect();
	assert_eq!(data, expected);
}

#[test]
fn reads_wrap_at_end_of_image() {
	let mut controller = sim::simulated_controller(counting_image(128), slave_config(AddressWidth::Sixteen));
	sim::write_address(&mut controller, 126);
	assert_eq!(sim::read(&mut controller, 4), vec![126, 127, 0, 1]);
}

#[test]
fn eight_bit_address_on_default_image() {
	let memory = MemoryImage::open(&MemorySource::StaticImage).unwrap();
	assert_eq!(memory.len(), 128);
	let mut controller = sim::simulated_controller(memory, slave_config(AddressWidth::Eight));
	sim::write_address(&mut controller, 0x7f);
	assert_eq!(controller.address().value(), 0x7f);
	assert_eq!(sim::read(&mut controller, 2), vec![0, 0]);
	assert_eq!(controller.address().value(), 1);
}

#[test]
fn ready_bus_is_left_alone() {
	let mut controller = sim::simulated_controller(counting_image(64), slave_config(AddressWidth::Sixteen));
	sim::write_address(&mut controller, 10);
	let registers = controller.bus().registers().clone();
	let address = *controller.address();
	for _ in 0..100 {
		assert_eq!(controller.service(), State::AwaitingEvent);
	}
	assert_eq!(*controller.bus().registers(), registers);
	assert_eq!(*controller.address(), address);
}

#[test]
fn later_address_write_restarts_stream() {
	let mut controller = sim::simulated_controller(counting_image(256), slave_config(AddressWidth::Sixteen));
	sim::write_address(&mut controller, 0x20);
	assert_eq!(sim::read(&mut controller, 3), vec![0x20, 0x21, 0x22]);
	sim::write_address(&mut controller, 0x40);
	assert_eq!(sim::read(&mut controller, 2), vec![0x40, 0x41]);
}

#[test]
fn fx2_boot_image_is_served_from_zero() {
	let image = fx2::build_c2_image(&[0x02, 0x01, 0x00], fx2::I2cSpeed::Fast).unwrap();
	let len = image.len();
	let mut controller = sim::simulated_controller(MemoryImage::from_vec(image).unwrap(), slave_config(AddressWidth::Sixteen));
	sim::write_address(&mut controller, 0);
	let data = sim::read(&mut controller, len);
	assert_eq!(&data[..8], &[0xC2, 0xAA, 0x55, 0x11, 0x22, 0x33, 0x44, 0x01]);
	assert_eq!(&data[len - 8..], &[0x80, 0x01, 0xE6, 0x00, 0x00, 0x00, 0x00, 0x00]);
}

fn bit_bang_controller(script: MasterScript, address_width: AddressWidth) -> Controller<BitBangSlave<ScriptedLines>> {
	let mut controller = Controller::new(
		BitBangSlave::new(ScriptedLines::new(script)),
		counting_image(256),
		slave_config(address_width),
	);
	controller.start();
	controller
}

#[test]
fn bit_bang_address_write_then_read() {
	let script = MasterScript::new()
		.idle(4)
		.start()
		.address(0x40, Direction::MasterWrite)
		.write_byte(0x00)
		.write_byte(0x05)
		.stop()
		.start()
		.address(0x40, Direction::MasterRead)
		.read_byte(true)
		.read_byte(true)
		.read_byte(false)
		.stop();
	let mut controller = bit_bang_controller(script, AddressWidth::Sixteen);

	let states: Vec<State> = (0..8).map(|_| controller.service()).collect();
	assert_eq!(states, vec![
		State::AwaitingEvent,      // START, our address, write
		State::ServicingWriteHigh, // 0x00
		State::ServicingWriteLow,  // 0x05
		State::AwaitingEvent,      // STOP
		State::AwaitingEvent,      // START, our address, read
		State::ServicingRead,
		State::ServicingRead,
		State::ServicingRead,      // NACKed by the master
	]);

	let lines = controller.bus().lines();
	assert_eq!(lines.observed_bytes(), vec![0x05, 0x06, 0x07]);
	assert_eq!(lines.observed_acks(), vec![true, true, true, true]);
	assert!(!lines.is_driving());
	assert_eq!(controller.address().value(), 0x08);
}

#[test]
fn bit_bang_eight_bit_address() {
	let script = MasterScript::new()
		.start()
		.address(0x40, Direction::MasterWrite)
		.write_byte(0x7f)
		.stop()
		.start()
		.address(0x40, Direction::MasterRead)
		.read_byte(true)
		.read_byte(false)
		.stop();
	let mut controller = bit_bang_controller(script, AddressWidth::Eight);

	let states: Vec<State> = (0..6).map(|_| controller.service()).collect();
	assert_eq!(states, vec![
		State::AwaitingEvent,
		State::ServicingWriteLow,
		State::AwaitingEvent,
		State::AwaitingEvent,
		State::ServicingRead,
		State::ServicingRead,
	]);
	assert_eq!(controller.bus().lines().observed_bytes(), vec![0x7f, 0x80]);
	assert_eq!(controller.address().value(), 0x81);
}

#[test]
fn bit_bang_ignores_other_devices() {
	let script = MasterScript::new()
		.start()
		.address(0x50, Direction::MasterRead)
		.read_byte(false)
		.stop();
	let mut controller = bit_bang_controller(script, AddressWidth::Sixteen);

	assert_eq!(controller.service(), State::AwaitingEvent);
	let lines = controller.bus().lines();
	// SDA never pulled: neither ACK nor data bits
	assert_eq!(lines.drive_pulses(), 0);
	assert!(lines.observed_bytes().is_empty());
	assert_eq!(controller.address().value(), 0);
}
