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

//! ## How it works
//!
//! Bulk transfers split files into fixed *chunks*, moving many of them in parallel.
//! Two pieces keep memory under control while doing so.
//!
//! ### Chunk readers
//!
//! A [`FileChunkReader`] serves one byte range of a file. The file is opened once
//! and shared by every reader over it, including fresh readers created to retry a
//! failed chunk. Readers never move the file's cursor: chunks are loaded with a
//! single *positioned read*, which is safe to run concurrently on one handle. See
//! [`PositionedRead`].
//!
//! The whole chunk is loaded on first read, or ahead of time with `prefetch`. While
//! loaded, its length is counted by a [`ByteTracker`] shared between readers, so
//! an admission layer can hold off new work when too much is loaded. The buffer is
//! released as soon as the last byte is read, when the reader is closed, or when it
//! is dropped. Every load is matched by exactly one release.
//!
//! ### Slice pools
//!
//! A [`SlicePool`] recycles byte slices of varying sizes. Slices are kept in
//! buckets by power-of-two capacity, each a bounded queue. Renting and returning
//! never block or fail: an empty bucket allocates, a full bucket drops. Rented
//! slices are not zeroed.
//!
//! Chunk readers and slice pools are independent; neither uses the other.

pub mod error;
pub mod chunk;
pub mod pool;
mod positioned;
mod tracker;

pub use chunk::{ChunkRead, FileChunkReader, ReadOutcome, SeekOrigin};
pub use pool::{RentedSlice, SlicePool, SlicePooler, PoolOptions, slot_info, SlotInfo};
pub use positioned::{LockedReader, PositionedRead};
pub use tracker::{ByteTracker, SharedCounter};
