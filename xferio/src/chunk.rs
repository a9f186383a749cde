// Copyright 2023 Strixpyrr
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Readers over a single fixed byte range, a *chunk*, of a shared file.

mod reader;
mod seeking;

use std::{io, result};
use amplify_derive::Display;
use crate::error;

pub use reader::FileChunkReader;
pub use seeking::SeekOrigin;

pub type Error = error::Error<OperationKind, ErrorKind>;
pub type Result<T = ()> = result::Result<T, Error>;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Display)]
pub enum OperationKind {
	#[display("prefetch chunk")]
	Prefetch,
	#[display("read chunk")]
	Read,
	#[display("seek chunk")]
	Seek,
}

impl error::OperationKind for OperationKind { }

#[derive(Copy, Clone, Debug, Eq, PartialEq, Display)]
pub enum ErrorKind {
	#[display("IO error")]
	Io,
	#[display("short read")]
	ShortRead,
	#[display("cannot seek before the start of the chunk")]
	NegativeSeek,
	#[display("{0}")]
	Other(&'static str),
}

impl error::ErrorKind for ErrorKind {
	fn other(message: &'static str) -> Self { Self::Other(message) }
}

/// Details of a positioned read returning fewer bytes than the chunk holds. The
/// chunk must never extend past the end of the file, so this means the file was
/// truncated or the chunk was built with the wrong range.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("read {read} of {expected} bytes at offset {offset}")]
pub struct ShortRead {
	pub offset: u64,
	pub expected: usize,
	pub read: usize,
}

impl Error {
	/// Creates a new IO error.
	pub fn io(op: OperationKind, error: io::Error) -> Self {
		Self::new(op, ErrorKind::Io, Some(error.into()))
	}

	/// Creates a new short read error.
	pub fn short_read(offset: u64, expected: usize, read: usize) -> Self {
		Self::new(
			OperationKind::Prefetch,
			ErrorKind::ShortRead,
			Some(ShortRead { offset, expected, read }.into())
		)
	}

	/// Creates a new "negative seek" error.
	pub fn negative_seek() -> Self {
		Self::new(OperationKind::Seek, ErrorKind::NegativeSeek, None)
	}

	/// Returns the source downcast into an IO Error, if possible.
	pub fn io_source(&self) -> Option<&io::Error> { self.source_as() }

	/// Returns the short read details, if this is a short read error.
	pub fn short_read_source(&self) -> Option<&ShortRead> { self.source_as() }
}

impl From<Error> for io::Error {
	fn from(value: Error) -> Self {
		let kind = match value.kind() {
			ErrorKind::Io =>
				return match value.into_source().map(|source| source.downcast::<io::Error>()) {
					Some(Ok(error)) => *error,
					Some(Err(source)) => io::Error::other(source),
					None => io::Error::other("unknown IO error")
				},
			ErrorKind::ShortRead    => io::ErrorKind::UnexpectedEof,
			ErrorKind::NegativeSeek => io::ErrorKind::InvalidInput,
			ErrorKind::Other(_)     => io::ErrorKind::Other,
		};
		io::Error::new(kind, value)
	}
}

/// The result of a single [`ChunkRead::read_chunk`] call.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ReadOutcome {
	/// The number of bytes copied into the target.
	pub count: usize,
	/// Whether the end of the chunk was reached. This is set on the same call that
	/// copies the last bytes, not deferred to a following empty read.
	pub eof: bool,
}

impl ReadOutcome {
	/// An empty read at the end of the chunk.
	pub const EOF: Self = Self { count: 0, eof: true };
}

/// A reader of one chunk of a file. Chunks may be read more than once, for
/// example to retry sending one, by seeking back to the start.
///
/// Reading is stateful, so a reader cannot be shared between threads. Many
/// readers can share the same file, however.
pub trait ChunkRead {
	/// Loads the whole chunk into memory ahead of reading. Does nothing if the
	/// chunk is already loaded.
	fn prefetch(&mut self) -> Result;

	/// Copies bytes from the current position into `buf`, advancing the position.
	/// The chunk is loaded first if needed, unless the position is already at the
	/// end.
	fn read_chunk(&mut self, buf: &mut [u8]) -> Result<ReadOutcome>;

	/// Seeks to `offset` relative to `origin`, returning the new position. Seeking
	/// before the start is an error; seeking past the end stops at the end.
	fn seek_chunk(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64>;

	/// Releases any loaded data. Closing is idempotent and never closes the file
	/// itself.
	fn close(&mut self) -> Result;

	/// Returns the current position.
	fn seek_pos(&mut self) -> Result<u64> {
		self.seek_chunk(0, SeekOrigin::Current)
	}

	/// Seeks to the end of the chunk then back to the current position, returning
	/// the length.
	fn seek_len(&mut self) -> Result<u64> {
		let pos = self.seek_pos()?;
		let len = self.seek_chunk(0, SeekOrigin::End)?;

		if pos != len {
			let pos = i64::try_from(pos).map_err(|_|
				Error::other(OperationKind::Seek, "position does not fit in an i64", None)
			)?;
			self.seek_chunk(pos, SeekOrigin::Start)?;
		}

		Ok(len)
	}

	/// Resets to the start of the chunk, usually to read it again.
	fn reset(&mut self) -> Result {
		self.seek_chunk(0, SeekOrigin::Start)?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use std::error::Error as _;
	use super::*;

	#[test]
	fn short_read_display() {
		let error = Error::short_read(4096, 1024, 100);
		assert_eq!(error.kind(), ErrorKind::ShortRead);
		assert_eq!(
			error.to_string(),
			"prefetch chunk failed; short read (read 100 of 1024 bytes at offset 4096)"
		);
		assert_eq!(error.short_read_source().map(|s| s.read), Some(100));
		assert!(error.source().is_some());
	}

	#[test]
	fn io_error_round_trips() {
		let error = Error::io(
			OperationKind::Prefetch,
			io::Error::new(io::ErrorKind::PermissionDenied, "denied")
		);
		assert_eq!(error.io_source().map(io::Error::kind), Some(io::ErrorKind::PermissionDenied));
		let error: io::Error = error.into();
		assert_eq!(error.kind(), io::ErrorKind::PermissionDenied);
	}

	#[test]
	fn io_error_kinds() {
		let error: io::Error = Error::negative_seek().into();
		assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
		let error: io::Error = Error::short_read(0, 2, 1).into();
		assert_eq!(error.kind(), io::ErrorKind::UnexpectedEof);
	}
}
