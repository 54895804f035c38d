use std::fmt;
use std::path::PathBuf;
use std::str;

pub const DEFAULT_SLAVE_ADDRESS: u8 = 0x40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AddressWidth {
	// whole address from a single written byte (small EEPROMs)
	Eight,
	// high byte then low byte (firmware images up to 64k)
	Sixteen,
}

impl Default for AddressWidth {
	fn default() -> Self {
		AddressWidth::Sixteen
	}
}

impl fmt::Display for AddressWidth {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(match *self {
			AddressWidth::Eight => "8",
			AddressWidth::Sixteen => "16",
		})
	}
}

impl str::FromStr for AddressWidth {
	type Err = ::failure::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"8" => Ok(AddressWidth::Eight),
			"16" => Ok(AddressWidth::Sixteen),
			_ => bail!("invalid address width {:?} (expected 8 or 16)", s),
		}
	}
}

/// which slave implementation drives the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mode {
	ShiftRegister,
	BitBang,
}

impl Default for Mode {
	fn default() -> Self {
		Mode::ShiftRegister
	}
}

impl fmt::Display for Mode {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(match *self {
			Mode::ShiftRegister => "shift-register",
			Mode::BitBang => "bit-bang",
		})
	}
}

impl str::FromStr for Mode {
	type Err = ::failure::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"shift-register" => Ok(Mode::ShiftRegister),
			"bit-bang" => Ok(Mode::BitBang),
			_ => bail!("invalid mode {:?} (expected shift-register or bit-bang)", s),
		}
	}
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum MemorySource {
	// built into the binary
	StaticImage,
	// loaded at startup
	Buffer(PathBuf),
}

impl Default for MemorySource {
	fn default() -> Self {
		MemorySource::StaticImage
	}
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Config {
	pub address_width: AddressWidth,
	pub device_address: u8,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			address_width: AddressWidth::default(),
			device_address: DEFAULT_SLAVE_ADDRESS,
		}
	}
}

impl Config {
	pub fn new(address_width: AddressWidth, device_address: u8) -> crate::AResult<Self> {
		ensure!(device_address < 0x80, "slave address 0x{:02x} doesn't fit in 7 bits", device_address);
		if is_reserved_address(device_address) {
			warn!("slave address 0x{:02x} is in a reserved I2C address range", device_address);
		}
		Ok(Config {
			address_width,
			device_address,
		})
	}
}

/// 0x00-0x07 (general call, CBUS, HS-mode, ...) and 0x78-0x7f (10-bit
/// addressing, device ID) are reserved on every I2C bus.
pub fn is_reserved_address(address: u8) -> bool {
	match address {
		0x00..=0x07 | 0x78..=0x7f => true,
		_ => false,
	}
}

/// accepts hex ("0x40"), binary ("0b1000000") and decimal ("64")
pub fn parse_u8(s: &str) -> crate::AResult<u8> {
	with_context!(("invalid number {:?}", s), {
		if s.starts_with("0x") || s.starts_with("0X") {
			u8::from_str_radix(&s[2..], 16).map_err(|e| e.into())
		} else if s.starts_with("0b") {
			u8::from_str_radix(&s[2..], 2).map_err(|e| e.into())
		} else {
			s.parse::<u8>().map_err(|e| e.into())
		}
	})
}

pub fn parse_u64(s: &str) -> crate::AResult<u64> {
	with_context!(("invalid number {:?}", s), {
		if s.starts_with("0x") || s.starts_with("0X") {
			u64::from_str_radix(&s[2..], 16).map_err(|e| e.into())
		} else {
			s.parse::<u64>().map_err(|e| e.into())
		}
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn address_width_from_str() {
		assert_eq!("8".parse::<AddressWidth>().unwrap(), AddressWidth::Eight);
		assert_eq!("16".parse::<AddressWidth>().unwrap(), AddressWidth::Sixteen);
		assert!("10".parse::<AddressWidth>().is_err());
		assert_eq!(AddressWidth::Sixteen.to_string(), "16");
	}

	#[test]
	fn mode_from_str() {
		assert_eq!("bit-bang".parse::<Mode>().unwrap(), Mode::BitBang);
		assert_eq!("shift-register".parse::<Mode>().unwrap(), Mode::ShiftRegister);
		assert!("bitbang".parse::<Mode>().is_err());
		assert_eq!(Mode::default().to_string(), "shift-register");
	}

	#[test]
	fn numbers() {
		assert_eq!(parse_u8("0x40").unwrap(), 0x40);
		assert_eq!(parse_u8("64").unwrap(), 64);
		assert_eq!(parse_u8("0b1010000").unwrap(), 0x50);
		assert!(parse_u8("0x100").is_err());
		assert!(parse_u8("foo").is_err());
		assert_eq!(parse_u64("0xe0005000").unwrap(), 0xe000_5000);
	}

	#[test]
	fn slave_address_must_be_seven_bits() {
		assert!(Config::new(AddressWidth::Eight, 0x80).is_err());
		let config = Config::new(AddressWidth::Eight, 0x50).unwrap();
		assert_eq!(config.device_address, 0x50);
		// reserved ones only warn
		assert!(Config::new(AddressWidth::Sixteen, 0x03).is_ok());
		assert!(is_reserved_address(0x7f));
		assert!(!is_reserved_address(DEFAULT_SLAVE_ADDRESS));
	}
}
