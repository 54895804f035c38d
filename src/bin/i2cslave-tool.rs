#[macro_use]
extern crate clap;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

extern crate i2cslave;
use i2cslave::*;

use std::io::{
	self,
	Write,
};
use std::path::PathBuf;
use std::process::exit;

use i2cslave::fx2::I2cSpeed;

fn get_param<T>(matches: &clap::ArgMatches, name: &str) -> AResult<T>
where
	T: std::str::FromStr,
	failure::Error: From<<T as std::str::FromStr>::Err>,
{
	let param = match matches.value_of(name) {
		Some(p) => p,
		None => bail!("missing parameter {}", name),
	};
	param.parse::<T>().map_err(|e| {
		let e = failure::Error::from(e);
		let msg = format!("invalid paramater {}: {}", name, e);
		e.context(msg).into()
	})
}

fn speed(matches: &clap::ArgMatches) -> AResult<I2cSpeed> {
	if matches.is_present("speed") {
		get_param(matches, "speed")
	} else {
		Ok(I2cSpeed::default())
	}
}

fn image_source(matches: &clap::ArgMatches) -> MemorySource {
	match matches.value_of_os("image") {
		Some(p) => MemorySource::Buffer(PathBuf::from(p)),
		None => MemorySource::StaticImage,
	}
}

fn print_hexdump(data: &[u8], base: usize) -> AResult<()> {
	let mut out = String::new();
	fx2::hexdump(&mut out, data, base)?;
	io::stdout().write_all(out.as_bytes())?;
	Ok(())
}

fn fx2_image(sub_m: &clap::ArgMatches) -> AResult<()> {
	let path = match sub_m.value_of_os("input") {
		Some(p) => PathBuf::from(p),
		None => bail!("missing parameter input"),
	};
	let speed = speed(sub_m)?;

	let firmware = fx2::load_firmware(&path)?;
	let image = fx2::build_c2_image(&firmware, speed)?;

	let stdout = io::stdout();
	let mut stdout = stdout.lock();
	if sub_m.is_present("c_header") {
		writeln!(stdout, "{}", fx2::render_c_array(&image))?;
	} else {
		stdout.write_all(&image)?;
	}

	Ok(())
}

fn simulate(sub_m: &clap::ArgMatches) -> AResult<()> {
	let address_width: AddressWidth = if sub_m.is_present("address_width") {
		get_param(sub_m, "address_width")?
	} else {
		AddressWidth::default()
	};
	let address = config::parse_u64(sub_m.value_of("ADDRESS").unwrap_or(""))?;
	let count: usize = get_param(sub_m, "COUNT")?;

	let max_address = match address_width {
		AddressWidth::Eight => 0xff,
		AddressWidth::Sixteen => 0xffff,
	};
	ensure!(address <= max_address, "address 0x{:x} doesn't fit in {} bits", address, address_width);

	let memory = MemoryImage::open(&image_source(sub_m))?;
	let config = Config::new(address_width, config::DEFAULT_SLAVE_ADDRESS)?;
	let mut controller = sim::simulated_controller(memory, config);
	sim::write_address(&mut controller, address as u16);
	let data = sim::read(&mut controller, count);

	print_hexdump(&data, address as usize)
}

fn dump(sub_m: &clap::ArgMatches) -> AResult<()> {
	let memory = if sub_m.is_present("fx2") {
		let path = match sub_m.value_of_os("image") {
			Some(p) => PathBuf::from(p),
			None => bail!("--fx2 needs a firmware --image"),
		};
		fx2::load_boot_image(&path, speed(sub_m)?)?
	} else {
		MemoryImage::open(&image_source(sub_m))?
	};

	print_hexdump(memory.as_bytes(), 0)
}

fn main_app() -> AResult<()> {
	let matches = clap_app!(@app (app_from_crate!())
		(@setting SubcommandRequiredElseHelp)
		(global_setting: clap::AppSettings::VersionlessSubcommands)
		(@subcommand fx2_image =>
			(about: "build FX2 C2 EEPROM boot image from firmware binary, write it to stdout")
			(@arg input: -i --input +takes_value +required "firmware binary (not Intel HEX)")
			(@arg speed: -s --speed +takes_value "I2C speed in kHz for the boot load: 100 or 400 (default 400)")
			(@arg c_header: --("c-header") "write a C array declaration instead of binary")
		)
		(@subcommand simulate =>
			(about: "write an address and read bytes from a simulated slave")
			(@arg image: -i --image +takes_value "file to serve instead of the built-in 128 zero bytes")
			(@arg address_width: -w --("address-width") +takes_value "EEPROM address width in bits: 8 or 16 (default 16)")
			(@arg ADDRESS: +required "address to start reading at")
			(@arg COUNT: +required "number of bytes to read")
		)
		(@subcommand dump =>
			(about: "hexdump the memory image the slave would serve")
			(@arg image: -i --image +takes_value "file to serve instead of the built-in 128 zero bytes")
			(@arg fx2: --fx2 "wrap the image in an FX2 C2 boot record")
			(@arg speed: -s --speed +takes_value "FX2 boot I2C speed in kHz: 100 or 400 (default 400)")
		)
	).get_matches();

	match matches.subcommand() {
		("fx2_image", Some(sub_m)) => {
			fx2_image(sub_m)
		},
		("simulate", Some(sub_m)) => {
			simulate(sub_m)
		},
		("dump", Some(sub_m)) => {
			dump(sub_m)
		},
		("", _) => bail!("no subcommand"),
		(cmd, _) => bail!("not implemented subcommand {:?}", cmd),
	}
}

fn main() {
	env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();

	if let Err(e) = main_app() {
		error!("Error: {}", e);
		exit(1);
	}
}
