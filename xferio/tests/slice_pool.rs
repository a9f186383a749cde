// SPDX-License-Identifier: Apache-2.0

use std::sync::{Arc, mpsc};
use std::thread;
use std::time::{Duration, Instant};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use xferio::{slot_info, PoolOptions, SlicePool, SlicePooler, SlotInfo};

#[macro_use]
mod common;

const MAX_LEN: u32 = 1 << 20;

#[test]
fn bucket_assignment() {
	let cases = [(1, 0, 1), (2, 1, 2), (3, 2, 4), (256, 8, 256), (257, 9, 512)];
	for (len, index, capacity) in cases {
		assert_eq!(slot_info(len), Some(SlotInfo { index, capacity }), "length {len}");
	}
}

#[quickcheck]
fn rented_length_is_exact(size: u32) -> TestResult {
	let size = size % MAX_LEN + 1;
	let pool = SlicePool::new(MAX_LEN);
	let slice = pool.rent_slice(size);
	let capacity = slot_info(size).unwrap().capacity as usize;
	if slice.capacity() != capacity {
		return TestResult::error(format!("capacity {} for length {size}", slice.capacity()))
	}
	qc_assert_eq!(slice.len(), size as usize)
}

#[quickcheck]
fn returned_slices_are_reused(sizes: Vec<u16>) -> TestResult {
	let pool = SlicePool::new(MAX_LEN);
	for &size in &sizes {
		let size = size as u32 + 1;
		let slice = pool.rent_slice(size);
		let ptr = slice.as_ptr();
		pool.return_slice(slice);

		let slice = pool.rent_slice(size);
		if slice.as_ptr() != ptr {
			return TestResult::error(format!("slice of length {size} was not reused"))
		}
		pool.return_slice(slice);
	}
	TestResult::passed()
}

#[test]
fn reuse_of_capacity_128() {
	let pool = SlicePool::new(MAX_LEN);
	let slice = pool.rent_slice(100);
	assert_eq!((slice.len(), slice.capacity()), (100, 128));
	let marker = slice.as_ptr() as usize;
	pool.return_slice(slice);

	let slice = pool.rent_slice(100);
	assert_eq!(slice.as_ptr() as usize, marker);
	assert_eq!((slice.len(), slice.capacity()), (100, 128));
}

#[test]
fn concurrent_rent_and_return() {
	const WORKERS: usize = 100;
	const ROUNDS: usize = 500;
	const BUDGET: Duration = Duration::from_secs(60);

	let pool = Arc::new(SlicePool::with_options(
		PoolOptions::new()
			.with_max_slice_length(64 * 1024)
			.with_bucket_capacity(16)
	));
	let (done, finished) = mpsc::channel();
	let deadline = Instant::now() + BUDGET;

	let handles: Vec<_> = (0..WORKERS).map(|worker| {
		let (pool, done) = (pool.clone(), done.clone());
		thread::spawn(move || {
			let mut held = Vec::new();
			for round in 0..ROUNDS {
				let size = ((worker * 7919 + round * 104729) % (64 * 1024)) as u32 + 1;
				let mut slice = pool.rent_slice(size);
				assert_eq!(slice.len(), size as usize);
				slice.fill(worker as u8);
				held.push(slice);

				if round % 3 == 0 {
					for slice in held.drain(..) {
						pool.return_slice(slice);
					}
				}
			}
			for slice in held {
				pool.return_slice(slice);
			}
			done.send(worker).unwrap();
		})
	}).collect();
	drop(done);

	// Waits with a deadline, so a stuck worker fails the test rather than hanging it.
	for _ in 0..WORKERS {
		let remaining = deadline.saturating_duration_since(Instant::now());
		if let Err(err) = finished.recv_timeout(remaining) {
			panic!("pool workers did not finish within {BUDGET:?}: {err}");
		}
	}

	for handle in handles {
		handle.join().unwrap();
	}
	assert!((0..pool.bucket_count()).all(|i| pool.pooled_count(i) <= 16));
}

#[test]
fn guarded_slices_return_across_threads() {
	let pool = SlicePool::new(4096);
	thread::scope(|scope| {
		for _ in 0..8 {
			scope.spawn(|| {
				for size in 1..=4096 {
					let mut slice = pool.rent_guarded(size);
					slice.fill(0);
				}
			});
		}
	});
	assert!(pool.pooled_count(12) > 0);
}
