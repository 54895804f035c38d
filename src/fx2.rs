/// EEPROM boot images for the Cypress EZ-USB FX2
///
/// On reset the FX2 reads the first byte of an I2C EEPROM; 0xC2 means "load
/// firmware from EEPROM". The layout:
/// - 0xC2
/// - VID, PID, DID (little endian words)
/// - config byte: bit 0 selects 400 kHz I2C for the rest of the load
/// - data records: length (big endian), load address (big endian), data
/// - final record writing 0x00 to CPUCS (0xE600) to take the 8051 out of reset
///
/// The emulated slave serves such an image to the FX2 at 16-bit addresses.

use std::fmt::{
	self,
	Write,
};
use std::fs;
use std::path::Path;
use std::str;

use crate::memory::MemoryImage;

const C2_MAGIC: u8 = 0xC2;
const VID_PID_DID: [u8; 6] = [0xAA, 0x55, 0x11, 0x22, 0x33, 0x44];
const LOAD_ADDRESS: u16 = 0x0000;
// "last record" flag + length 1, CPUCS address, value 0 (run), padding
const CPUCS_TRAILER: [u8; 8] = [0x80, 0x01, 0xE6, 0x00, 0x00, 0x00, 0x00, 0x00];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum I2cSpeed {
	Standard, // 100 kHz
	Fast,     // 400 kHz
}

impl I2cSpeed {
	pub fn config_byte(self) -> u8 {
		match self {
			I2cSpeed::Standard => 0x00,
			I2cSpeed::Fast => 0x01,
		}
	}
}

impl Default for I2cSpeed {
	fn default() -> Self {
		I2cSpeed::Fast
	}
}

impl fmt::Display for I2cSpeed {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(match *self {
			I2cSpeed::Standard => "100",
			I2cSpeed::Fast => "400",
		})
	}
}

impl str::FromStr for I2cSpeed {
	type Err = ::failure::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"100" => Ok(I2cSpeed::Standard),
			"400" => Ok(I2cSpeed::Fast),
			_ => bail!("invalid I2C boot speed {:?} kHz (expected 100 or 400)", s),
		}
	}
}

pub fn build_c2_image(firmware: &[u8], speed: I2cSpeed) -> crate::AResult<Vec<u8>> {
	ensure!(firmware.len() <= 0xffff, "firmware too large for a single record: {} bytes", firmware.len());

	let mut image = Vec::with_capacity(1 + VID_PID_DID.len() + 5 + firmware.len() + CPUCS_TRAILER.len());
	image.push(C2_MAGIC);
	image.extend_from_slice(&VID_PID_DID);
	image.push(speed.config_byte());
	image.extend_from_slice(&(firmware.len() as u16).to_be_bytes());
	image.extend_from_slice(&LOAD_ADDRESS.to_be_bytes());
	image.extend_from_slice(firmware);
	image.extend_from_slice(&CPUCS_TRAILER);

	debug!("C2 image: {} bytes firmware, {} bytes total, {} kHz", firmware.len(), image.len(), speed);
	Ok(image)
}

/// raw firmware binary; Intel HEX has to be converted first
pub fn load_firmware(path: &Path) -> crate::AResult<Vec<u8>> {
	match path.extension().and_then(|e| e.to_str()) {
		Some("hex") | Some("ihx") => bail!(
			"{} looks like Intel HEX; convert it with `objcopy -I ihex -O binary` first",
			path.display(),
		),
		_ => (),
	}
	let firmware = with_context!(("couldn't read firmware {}", path.display()), {
		fs::read(path).map_err(|e| e.into())
	})?;
	info!("Loaded {} bytes of firmware from {}", firmware.len(), path.display());
	Ok(firmware)
}

/// EEPROM content booting `path` on an FX2
pub fn load_boot_image(path: &Path, speed: I2cSpeed) -> crate::AResult<MemoryImage> {
	let firmware = load_firmware(path)?;
	MemoryImage::from_vec(build_c2_image(&firmware, speed)?)
}

/// `unsigned char fx2fw[N] = {0x..,...};`
pub fn render_c_array(image: &[u8]) -> String {
	let mut out = format!("unsigned char fx2fw[{}] = {{", image.len());
	for (i, b) in image.iter().enumerate() {
		if i != 0 {
			out.push(',');
		}
		// writing into a String can't fail
		let _ = write!(out, "0x{:02X}", b);
	}
	out.push_str("};");
	out
}

/// the usual 16 bytes per line dump, offset first
pub fn hexdump<W: Write>(out: &mut W, data: &[u8], base: usize) -> fmt::Result {
	for (i, b) in data.iter().enumerate() {
		if 0 == i % 16 {
			write!(out, "{:08x} ", base + i)?;
		} else if 0 == i % 8 {
			write!(out, " ")?;
		}
		write!(out, " {:02x}", b)?;
		if 15 == i % 16 {
			writeln!(out)?;
		}
	}
	if 0 != data.len() % 16 {
		writeln!(out)?;
	}
	writeln!(out, "{:08x}", base + data.len())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn c2_layout() {
		let image = build_c2_image(&[0xde, 0xad, 0xbe], I2cSpeed::Standard).unwrap();
		assert_eq!(image, vec![
			0xC2, 0xAA, 0x55, 0x11, 0x22, 0x33, 0x44, 0x00,
			0x00, 0x03, 0x00, 0x00,
			0xde, 0xad, 0xbe,
			0x80, 0x01, 0xE6, 0x00, 0x00, 0x00, 0x00, 0x00,
		]);
	}

	#[test]
	fn c2_speed_and_length() {
		let firmware = vec![0x5a; 0x1234];
		let image = build_c2_image(&firmware, I2cSpeed::Fast).unwrap();
		assert_eq!(image[7], 0x01);
		assert_eq!(&image[8..10], &[0x12, 0x34]);
		assert_eq!(image.len(), 12 + 0x1234 + 8);

		assert!(build_c2_image(&vec![0; 0x10000], I2cSpeed::Fast).is_err());
	}

	#[test]
	fn speed_from_str() {
		assert_eq!("100".parse::<I2cSpeed>().unwrap(), I2cSpeed::Standard);
		assert_eq!("400".parse::<I2cSpeed>().unwrap(), I2cSpeed::Fast);
		assert!("1000".parse::<I2cSpeed>().is_err());
	}

	#[test]
	fn intel_hex_is_rejected() {
		let err = load_firmware(Path::new("firmware.ihx")).unwrap_err();
		assert!(err.to_string().contains("objcopy"));
		assert!(load_firmware(Path::new("/nonexistent/firmware.hex")).is_err());
		assert!(load_firmware(Path::new("/nonexistent/firmware.bin")).is_err());
	}

	#[test]
	fn boot_image_from_file() {
		let path = std::env::temp_dir().join(format!("i2cslave-fx2-{}.bin", std::process::id()));
		fs::write(&path, &[0x02, 0x00, 0x06]).unwrap();
		let image = load_boot_image(&path, I2cSpeed::Standard);
		fs::remove_file(&path).unwrap();
		let image = image.unwrap();
		assert_eq!(image.len(), 12 + 3 + 8);
		assert_eq!(image.get(0), 0xC2);
		assert_eq!(&image.as_bytes()[12..15], &[0x02, 0x00, 0x06]);
	}

	#[test]
	fn c_array() {
		assert_eq!(render_c_array(&[0xC2, 0x01, 0xff]), "unsigned char fx2fw[3] = {0xC2,0x01,0xFF};");
	}

	#[test]
	fn hexdump_rows() {
		let data: Vec<u8> = (0..18).collect();
		let mut out = String::new();
		hexdump(&mut out, &data, 0x100).unwrap();
		let lines: Vec<&str> = out.lines().collect();
		assert_eq!(lines[0], "00000100  00 01 02 03 04 05 06 07  08 09 0a 0b 0c 0d 0e 0f");
		assert_eq!(lines[1], "00000110  10 11");
		assert_eq!(lines[2], "00000112");
	}
}
