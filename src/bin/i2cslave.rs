#[macro_use]
extern crate clap;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

extern crate i2cslave;
use i2cslave::*;

use std::path::{
	Path,
	PathBuf,
};
use std::process::exit;

use i2cslave::bitbang::BitBangSlave;
use i2cslave::csr::CsrBank;
use i2cslave::fx2::I2cSpeed;
use i2cslave::shift_register::ShiftRegisterBus;

fn get_opt_param<T>(matches: &clap::ArgMatches, name: &str) -> AResult<Option<T>>
where
	T: std::str::FromStr,
	failure::Error: From<<T as std::str::FromStr>::Err>,
{
	let param = match matches.value_of(name) {
		Some(p) => p,
		None => return Ok(None),
	};
	param.parse::<T>().map(Some).map_err(|e| {
		let e = failure::Error::from(e);
		let msg = format!("invalid paramater {}: {}", name, e);
		e.context(msg).into()
	})
}

fn load_memory(matches: &clap::ArgMatches) -> AResult<MemoryImage> {
	let image = matches.value_of_os("image").map(PathBuf::from);
	if matches.is_present("fx2") {
		let path = match image {
			Some(p) => p,
			None => bail!("--fx2 needs a firmware --image"),
		};
		let speed: I2cSpeed = get_opt_param(matches, "speed")?.unwrap_or_default();
		return fx2::load_boot_image(&path, speed);
	}
	let source = match image {
		Some(p) => MemorySource::Buffer(p),
		None => MemorySource::StaticImage,
	};
	MemoryImage::open(&source)
}

fn main_app() -> AResult<()> {
	let matches = clap_app!(@app (app_from_crate!())
		(@arg address_width: -w --("address-width") +takes_value "EEPROM address width in bits: 8 or 16 (default 16)")
		(@arg slave_address: -a --("slave-address") +takes_value "7-bit I2C slave address (default 0x40)")
		(@arg image: -i --image +takes_value "file to serve instead of the built-in 128 zero bytes")
		(@arg fx2: --fx2 "wrap the image in an FX2 C2 boot record")
		(@arg speed: -s --speed +takes_value "FX2 boot I2C speed in kHz: 100 or 400 (default 400)")
		(@arg mode: -m --mode +takes_value "bus implementation: shift-register or bit-bang (default shift-register)")
		(@arg device: -d --device +takes_value "memory device to map the CSR bank from (default /dev/mem)")
		(@arg base: -b --base +takes_value +required "physical address of the I2C slave CSR bank")
	).get_matches();

	let address_width: AddressWidth = get_opt_param(&matches, "address_width")?.unwrap_or_default();
	let slave_address = match matches.value_of("slave_address") {
		Some(s) => config::parse_u8(s)?,
		None => config::DEFAULT_SLAVE_ADDRESS,
	};
	let config = Config::new(address_width, slave_address)?;
	let mode: Mode = get_opt_param(&matches, "mode")?.unwrap_or_default();

	let memory = load_memory(&matches)?;

	let device = matches.value_of_os("device").map_or(Path::new("/dev/mem"), Path::new);
	let base = match matches.value_of("base") {
		Some(s) => config::parse_u64(s)?,
		None => bail!("missing parameter base"),
	};
	let bank = CsrBank::open(device, base)?;

	info!("Using {} slave", mode);
	match mode {
		Mode::ShiftRegister => Controller::new(ShiftRegisterBus::new(bank), memory, config).run(),
		Mode::BitBang => Controller::new(BitBangSlave::new(bank), memory, config).run(),
	}
}

fn main() {
	env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();

	if let Err(e) = main_app() {
		error!("Error: {}", e);
		exit(1);
	}
}
