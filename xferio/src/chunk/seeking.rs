// SPDX-License-Identifier: Apache-2.0

use std::io::SeekFrom;

/// The position a seek offset is relative to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SeekOrigin {
	/// Seek from the start of the chunk.
	Start,
	/// Seek relative to the current position.
	Current,
	/// Seek back from the end of the chunk. The offset is *subtracted* from the
	/// length, so `0` seeks to the end and a positive offset seeks back.
	End,
}

impl SeekOrigin {
	/// Resolves `offset` into a position given a current `pos` and chunk `len`.
	/// Returns `None` if the position would be negative. Positions past the end
	/// are clamped to `len`.
	pub fn resolve(self, offset: i64, pos: u64, len: u64) -> Option<u64> {
		let offset = i128::from(offset);
		let target = match self {
			SeekOrigin::Start   => offset,
			SeekOrigin::Current => i128::from(pos) + offset,
			SeekOrigin::End     => i128::from(len) - offset,
		};

		if target < 0 {
			None
		} else {
			Some(target.min(i128::from(len)) as u64)
		}
	}

	/// Splits [`std::io`]'s [`SeekFrom`] into an offset and origin. Start offsets
	/// too large for an `i64` saturate, which lands on the end after clamping.
	pub fn split(value: SeekFrom) -> (i64, Self) {
		match value {
			SeekFrom::Start  (pos) => (i64::try_from(pos).unwrap_or(i64::MAX), Self::Start),
			SeekFrom::Current(off) => (off, Self::Current),
			SeekFrom::End    (off) => (off, Self::End),
		}
	}
}
