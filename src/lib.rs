#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

macro_rules! with_context {
	(( $fmt:tt $($t:tt)* ), $e:expr) => {{
		use failure::Error;

		match (|| { $e })() {
			Ok(v) => Ok(v),
			Err(e) => {
				let e: Error = e;
				let msg = format!(concat!($fmt, ": {}") $($t)*, e);
				Err(Error::from(e.context(msg)))
			}
		}
	}};

	($msg:expr, $e:expr) => {
		with_context!(("{}", $msg), $e)
	};
}

pub type AResult<T> = Result<T, failure::Error>;

pub mod bitbang;
pub mod bus;
pub mod config;
pub mod controller;
pub mod csr;
pub mod fx2;
pub mod memory;
pub mod shift_register;
pub mod sim;

pub use crate::bus::{
	SlaveBus,
	StatusFlag,
};
pub use crate::config::{
	AddressWidth,
	Config,
	MemorySource,
	Mode,
};
pub use crate::controller::{
	Controller,
	State,
};
pub use crate::memory::MemoryImage;
