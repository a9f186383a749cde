// SPDX-License-Identifier: Apache-2.0

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::mem;
use std::sync::{Arc, Mutex};
use cfg_if::cfg_if;

/// A handle supporting positioned reads: reads of an absolute byte range which
/// neither depend on nor move any shared cursor. Implementations must be safe to
/// call concurrently from many threads on the same handle, as many chunk readers
/// share one open file.
pub trait PositionedRead: Sync {
	/// Reads up to `buf.len()` bytes starting at `offset`, returning the number of
	/// bytes read. Zero means `offset` is at or past the end of the data.
	fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize>;

	/// Reads until `buf` is full or the end of the data is reached, returning the
	/// number of bytes read. Interrupted reads are retried.
	fn read_full_at(&self, mut buf: &mut [u8], mut offset: u64) -> io::Result<usize> {
		let mut count = 0;
		while !buf.is_empty() {
			match self.read_at(buf, offset) {
				Ok(0) => break,
				Ok(n) => {
					count += n;
					offset += n as u64;
					buf = &mut mem::take(&mut buf)[n..];
				}
				Err(err) if err.kind() == io::ErrorKind::Interrupted => { }
				Err(err) => return Err(err)
			}
		}
		Ok(count)
	}
}

cfg_if! {
	if #[cfg(unix)] {
		impl PositionedRead for File {
			/// Reads with `pread`.
			#[inline]
			fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
				std::os::unix::fs::FileExt::read_at(self, buf, offset)
			}
		}
	} else if #[cfg(windows)] {
		impl PositionedRead for File {
			/// Reads with an overlapped `ReadFile`. This updates the handle's cursor,
			/// but never reads from it.
			#[inline]
			fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
				std::os::windows::fs::FileExt::seek_read(self, buf, offset)
			}
		}
	}
}

impl PositionedRead for [u8] {
	fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
		let start = usize::try_from(offset).map_or(self.len(), |off| off.min(self.len()));
		let data = &self[start..];
		let count = data.len().min(buf.len());
		buf[..count].copy_from_slice(&data[..count]);
		Ok(count)
	}
}

impl PositionedRead for Vec<u8> {
	#[inline]
	fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
		self.as_slice().read_at(buf, offset)
	}
}

impl<R: PositionedRead + ?Sized> PositionedRead for &R {
	#[inline]
	fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
		R::read_at(self, buf, offset)
	}
}

impl<R: PositionedRead + ?Sized + Send> PositionedRead for Arc<R> {
	#[inline]
	fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
		R::read_at(self, buf, offset)
	}
}

impl<R: PositionedRead + ?Sized> PositionedRead for Box<R> {
	#[inline]
	fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
		R::read_at(self, buf, offset)
	}
}

/// Emulates positioned reads over a plain [`Read`] + [`Seek`] handle by holding a
/// lock across each seek-then-read pair. Concurrent readers are serialized.
#[derive(Debug)]
pub struct LockedReader<R>(Mutex<R>);

impl<R: Read + Seek + Send> LockedReader<R> {
	pub fn new(reader: R) -> Self {
		Self(Mutex::new(reader))
	}

	/// Returns the wrapped reader. Its cursor position is unspecified.
	pub fn into_inner(self) -> R {
		self.0
			.into_inner()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
	}
}

impl<R: Read + Seek + Send> From<R> for LockedReader<R> {
	fn from(value: R) -> Self { Self::new(value) }
}

impl<R: Read + Seek + Send> PositionedRead for LockedReader<R> {
	fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
		// A panic mid-read leaves the cursor somewhere arbitrary, which is harmless
		// since every read seeks first.
		let mut reader = self.0
							 .lock()
							 .unwrap_or_else(|poisoned| poisoned.into_inner());
		reader.seek(SeekFrom::Start(offset))?;
		reader.read(buf)
	}
}
