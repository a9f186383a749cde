// SPDX-License-Identifier: Apache-2.0

use std::fmt::{self, Debug, Formatter};
use std::mem;
use std::ops::{Deref, DerefMut};
use super::SlicePooler;

/// A slice rented from a pool, returned to it when dropped.
pub struct RentedSlice<'p, P: SlicePooler + ?Sized> {
	pool: &'p P,
	slice: Vec<u8>,
}

impl<'p, P: SlicePooler + ?Sized> RentedSlice<'p, P> {
	/// Rents a slice of length `size` from `pool`. Its prefix may hold bytes left
	/// over from previous use, as described on [`SlicePooler::rent_slice`], and must
	/// be overwritten before reading.
	pub fn rent(pool: &'p P, size: u32) -> Self {
		Self { pool, slice: pool.rent_slice(size) }
	}

	/// Detaches the slice from the pool. It can still be returned manually.
	pub fn into_inner(mut self) -> Vec<u8> {
		mem::take(&mut self.slice)
	}
}

impl<P: SlicePooler + ?Sized> Drop for RentedSlice<'_, P> {
	fn drop(&mut self) {
		let slice = mem::take(&mut self.slice);
		if slice.capacity() > 0 {
			self.pool.return_slice(slice);
		}
	}
}

impl<P: SlicePooler + ?Sized> Deref for RentedSlice<'_, P> {
	type Target = [u8];

	fn deref(&self) -> &[u8] { &self.slice }
}

impl<P: SlicePooler + ?Sized> DerefMut for RentedSlice<'_, P> {
	fn deref_mut(&mut self) -> &mut [u8] { &mut self.slice }
}

impl<P: SlicePooler + ?Sized> AsRef<[u8]> for RentedSlice<'_, P> {
	fn as_ref(&self) -> &[u8] { self }
}

impl<P: SlicePooler + ?Sized> AsMut<[u8]> for RentedSlice<'_, P> {
	fn as_mut(&mut self) -> &mut [u8] { self }
}

impl<P: SlicePooler + ?Sized> Debug for RentedSlice<'_, P> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("RentedSlice")
		 .field("len", &self.slice.len())
		 .field("capacity", &self.slice.capacity())
		 .finish()
	}
}
