// SPDX-License-Identifier: Apache-2.0

use std::io;
use std::io::{Read, Seek, SeekFrom};
use log::{debug, trace};
use crate::positioned::PositionedRead;
use crate::tracker::ByteTracker;
use super::{ChunkRead, Error, OperationKind, ReadOutcome, Result, SeekOrigin};

/// A [`ChunkRead`]er loading its whole chunk with a single positioned read.
///
/// The loaded buffer is counted by a [`ByteTracker`] while held, and released as
/// soon as the last byte is read. A chunk read past its end is unlikely to be read
/// again; if it is, it's loaded again from the file. Closing or dropping the reader
/// also releases the buffer, so the tracker always returns to its original value.
///
/// The file is never closed by the reader.
pub struct FileChunkReader<F: PositionedRead, T: ByteTracker> {
	file: F,
	offset: u64,
	len: usize,
	pos: usize,
	buffer: Option<Box<[u8]>>,
	tracker: T,
}

impl<F: PositionedRead, T: ByteTracker> FileChunkReader<F, T> {
	/// Creates a reader of `len` bytes of `file`, starting at `offset`. The range
	/// must lie within the file. Nothing is read until the first read or prefetch.
	///
	/// # Panics
	///
	/// Panics if `len` is zero.
	pub fn new(file: F, offset: u64, len: usize, tracker: T) -> Self {
		assert!(len > 0, "chunk length must be greater than zero");
		Self {
			file,
			offset,
			len,
			pos: 0,
			buffer: None,
			tracker,
		}
	}

	/// Returns the offset of the chunk in the file.
	pub fn offset(&self) -> u64 { self.offset }

	/// Returns the chunk length.
	#[allow(clippy::len_without_is_empty)]
	pub fn len(&self) -> usize { self.len }

	/// Returns the current position within the chunk.
	pub fn position(&self) -> u64 { self.pos as u64 }

	/// Returns `true` if the chunk is currently loaded.
	pub fn is_prefetched(&self) -> bool { self.buffer.is_some() }

	/// Returns a reference to the file.
	pub fn file(&self) -> &F { &self.file }

	fn tracked_len(&self) -> i64 { self.len as i64 }

	fn load(&self) -> Result<Box<[u8]>> {
		let Self { file, offset, len, .. } = self;
		let mut buffer = vec![0; *len].into_boxed_slice();
		let read = file.read_full_at(&mut buffer, *offset)
					   .map_err(|err| Error::io(OperationKind::Prefetch, err))?;
		if read != *len {
			debug!("short read of chunk at offset {offset}: read {read} of {len} bytes");
			return Err(Error::short_read(*offset, *len, read))
		}
		Ok(buffer)
	}

	/// Returns the loaded buffer, loading it if necessary.
	fn materialize(&mut self) -> Result<&[u8]> {
		let buffer = match self.buffer.take() {
			Some(buffer) => buffer,
			None => {
				let buffer = self.load()?;
				self.tracker.add(self.tracked_len());
				trace!("prefetched {} bytes at offset {}", self.len, self.offset);
				buffer
			}
		};
		let buffer: &[u8] = self.buffer.insert(buffer);
		Ok(buffer)
	}

	fn discard(&mut self) {
		if self.buffer.take().is_some() {
			self.tracker.add(-self.tracked_len());
			trace!("discarded {} bytes at offset {}", self.len, self.offset);
		}
	}
}

impl<F: PositionedRead, T: ByteTracker> ChunkRead for FileChunkReader<F, T> {
	fn prefetch(&mut self) -> Result {
		self.materialize()?;
		Ok(())
	}

	fn read_chunk(&mut self, buf: &mut [u8]) -> Result<ReadOutcome> {
		// Checked before loading, otherwise reads past the end would load again.
		if self.pos >= self.len {
			return Ok(ReadOutcome::EOF)
		}

		let pos = self.pos;
		let count = {
			let data = &self.materialize()
							.map_err(|err| err.with_operation(OperationKind::Read))?[pos..];
			let count = data.len().min(buf.len());
			buf[..count].copy_from_slice(&data[..count]);
			count
		};
		self.pos += count;

		let eof = self.pos >= self.len;
		if eof {
			self.discard();
		}
		Ok(ReadOutcome { count, eof })
	}

	fn seek_chunk(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64> {
		let pos = origin.resolve(offset, self.pos as u64, self.len as u64)
						.ok_or_else(Error::negative_seek)?;
		// Clamped to the length, so this fits.
		self.pos = pos as usize;
		Ok(pos)
	}

	fn close(&mut self) -> Result {
		self.discard();
		Ok(())
	}
}

impl<F: PositionedRead, T: ByteTracker> Drop for FileChunkReader<F, T> {
	fn drop(&mut self) {
		self.discard();
	}
}

impl<F: PositionedRead, T: ByteTracker> Read for FileChunkReader<F, T> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		Ok(self.read_chunk(buf)?.count)
	}
}

/// Seeking follows [`ChunkRead::seek_chunk`]: seeks past the end are clamped, and
/// [`SeekFrom::End`] offsets are subtracted from the length.
impl<F: PositionedRead, T: ByteTracker> Seek for FileChunkReader<F, T> {
	fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
		let (offset, origin) = SeekOrigin::split(pos);
		Ok(self.seek_chunk(offset, origin)?)
	}
}
