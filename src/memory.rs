use std::borrow::Cow;
use std::fs;
use std::path::Path;

use crate::config::MemorySource;

/// Content served when no image is given: 128 zero bytes, like the EEPROM
/// block of the hardware slave.
pub static DEFAULT_IMAGE: [u8; 128] = [0u8; 128];

/// Fixed-size, read-only byte array served over I2C.
///
/// Never empty; its length is the modulus for all address arithmetic.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MemoryImage {
	bytes: Cow<'static, [u8]>,
}

impl MemoryImage {
	pub fn from_static(bytes: &'static [u8]) -> crate::AResult<Self> {
		ensure!(!bytes.is_empty(), "memory image must not be empty");
		Ok(MemoryImage { bytes: Cow::Borrowed(bytes) })
	}

	pub fn from_vec(bytes: Vec<u8>) -> crate::AResult<Self> {
		ensure!(!bytes.is_empty(), "memory image must not be empty");
		Ok(MemoryImage { bytes: Cow::Owned(bytes) })
	}

	pub fn load(path: &Path) -> crate::AResult<Self> {
		let bytes = with_context!(("couldn't read image {}", path.display()), {
			fs::read(path).map_err(|e| e.into())
		})?;
		info!("Loaded {} bytes from {}", bytes.len(), path.display());
		Self::from_vec(bytes)
	}

	pub fn open(source: &MemorySource) -> crate::AResult<Self> {
		match source {
			MemorySource::StaticImage => Self::from_static(&DEFAULT_IMAGE),
			MemorySource::Buffer(path) => Self::load(path),
		}
	}

	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.bytes
	}

	/// byte at `address`, wrapping around at the end of the image
	pub fn get(&self, address: usize) -> u8 {
		self.bytes[address % self.bytes.len()]
	}
}

impl AsRef<[u8]> for MemoryImage {
	fn as_ref(&self) -> &[u8] {
		&self.bytes
	}
}
