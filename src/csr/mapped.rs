use std::ffi::CString;
use std::fs;
use std::io;
use std::os::unix::io::{
	FromRawFd,
};
use std::path::Path;
use std::ptr;

use libc::{
	MAP_SHARED,
	O_CLOEXEC,
	O_RDWR,
	O_SYNC,
	PROT_READ,
	PROT_WRITE,
	_SC_PAGESIZE,
	c_void,
	mmap,
	munmap,
	off_t,
	open,
	sysconf,
};

use super::RegisterWindow;

/// `len` bytes of physical address space at `base`, mapped uncached.
///
/// All accesses are volatile: CSR reads and writes have side effects on the
/// bus and must neither be merged nor reordered.
#[derive(Debug)]
pub struct Mapped {
	area: ptr::NonNull<u8>, // u8 instead of void for easier offset operations
	area_len: usize,
	// offset of `base` inside the page aligned area
	start: usize,
	len: usize,
}

impl Drop for Mapped {
	fn drop(&mut self) {
		unsafe {
			let res = munmap(
				self.area.as_ptr() as *mut c_void,
				self.area_len,
			);
			if 0 != res {
				panic!("munmap failed: {}", io::Error::last_os_error());
			}
		}
	}
}

impl Mapped {
	pub fn open(path: &Path, base: u64, len: usize) -> io::Result<Mapped> {
		let page_size = unsafe { sysconf(_SC_PAGESIZE) };
		let page_size = if page_size > 0 { page_size as u64 } else { 4096 };
		let aligned_base = base & !(page_size - 1);
		let start = (base - aligned_base) as usize;
		let area_len = start + len;

		let path = CString::new(path.to_string_lossy().into_owned())?;
		let fd = unsafe { open(path.as_ptr(), O_RDWR | O_SYNC | O_CLOEXEC) };
		if -1 == fd {
			return Err(io::Error::last_os_error());
		}
		// now get fd managed to prevent resource leak; the mapping stays valid
		// after close
		let _f = unsafe { fs::File::from_raw_fd(fd) };

		let area = unsafe {
			mmap(
				ptr::null_mut(),
				area_len,
				PROT_READ | PROT_WRITE,
				MAP_SHARED,
				fd,
				aligned_base as off_t,
			)
		};

		if area as usize == !0usize {
			return Err(io::Error::last_os_error());
		}
		match ptr::NonNull::new(area as *mut u8) {
			None => panic!("mmap shouldn't return NULL ever"),
			Some(area) => Ok(Mapped {
				area,
				area_len,
				start,
				len,
			}),
		}
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		0 == self.len
	}
}

impl RegisterWindow for Mapped {
	fn read_dword(&self, offset: usize) -> u32 {
		assert!(offset & 3 == 0);
		assert!(offset + 3 < self.len);
		u32::from_le(unsafe { ptr::read_volatile(self.area.as_ptr().add(self.start + offset) as *const u32) })
	}

	fn write_dword(&mut self, offset: usize, data: u32) {
		assert!(offset & 3 == 0);
		assert!(offset + 3 < self.len);
		unsafe { ptr::write_volatile(self.area.as_ptr().add(self.start + offset) as *mut u32, data.to_le()) }
	}
}
