use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

fn assert_exact_cover(height: usize, workers: usize) {
    let ranges = partition_rows(height, workers);
    assert_eq!(ranges.len(), workers.max(1));

    let mut hits = vec![0u8; height];
    let mut next = 0usize;
    for r in &ranges {
        assert_eq!(r.start, next, "ranges must be contiguous (H={height} W={workers})");
        next = r.end;
        for y in r.clone() {
            hits[y] += 1;
        }
    }
    assert_eq!(next, height);
    assert!(hits.iter().all(|&h| h == 1), "H={height} W={workers}");

    let per = height / workers.max(1);
    for r in &ranges[..ranges.len() - 1] {
        assert_eq!(r.len(), per);
    }
    let last = ranges.last().unwrap();
    assert_eq!(last.len(), per + height % workers.max(1));
}

#[test]
fn partition_covers_rows_exactly_once() {
    let heights = [1usize, 2, 3, 7, 63, 64, 65, 100, 997, 1024, 4099, 9999, 10_000];
    for workers in 1..=64 {
        for &h in &heights {
            assert_exact_cover(h, workers);
        }
    }
}

#[test]
fn last_worker_absorbs_remainder() {
    let ranges = partition_rows(10, 3);
    assert_eq!(ranges, vec![0..3, 3..6, 6..10]);
}

#[test]
fn more_workers_than_rows_leaves_leading_ranges_empty() {
    let ranges = partition_rows(3, 5);
    assert_eq!(ranges, vec![0..0, 0..0, 0..0, 0..0, 0..3]);
}

#[test]
fn zero_workers_is_one_partition() {
    assert_eq!(partition_rows(5, 0), vec![0..5]);
}

#[test]
fn zero_worker_pool_is_rejected() {
    assert!(RowWorkers::new(Some(0)).is_err());
}

#[test]
fn default_pool_uses_hardware_concurrency() {
    let pool = RowWorkers::new(None).unwrap();
    assert_eq!(pool.workers(), default_worker_count());
    assert!(pool.workers() >= 1);
}

#[test]
fn for_each_range_hands_each_worker_its_own_rows() {
    let (width, height) = (5usize, 37usize);
    let pool = RowWorkers::new(Some(4)).unwrap();
    let mut data = vec![0u8; width * height];
    let calls = AtomicUsize::new(0);

    pool.for_each_range(&mut data, width, height, |rows, chunk| {
        calls.fetch_add(1, Ordering::Relaxed);
        assert_eq!(chunk.len(), rows.len() * width);
        for (y, row) in rows.zip(chunk.chunks_exact_mut(width)) {
            row.fill(y as u8);
        }
    });

    assert_eq!(calls.load(Ordering::Relaxed), 4);
    for (y, row) in data.chunks_exact(width).enumerate() {
        assert!(row.iter().all(|&b| b == y as u8), "row {y}");
    }
}

#[test]
fn for_each_range_skips_empty_partitions() {
    let pool = RowWorkers::new(Some(8)).unwrap();
    let mut data = vec![0u8; 3 * 2];
    let calls = AtomicUsize::new(0);
    pool.for_each_range(&mut data, 3, 2, |_, chunk| {
        calls.fetch_add(1, Ordering::Relaxed);
        chunk.fill(1);
    });
    assert_eq!(calls.load(Ordering::Relaxed), 1);
    assert!(data.iter().all(|&b| b == 1));
}
