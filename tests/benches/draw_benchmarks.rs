//! # Draw Engine Benchmarks
//!
//! | Component | Claim |
//! |-----------|-------|
//! | ld-02 Selector | Linear in cohort size (one shuffle, one flatten) |
//! | ld-01 Block search | Logarithmic provider round-trips in chain length |

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ld_01_block_locator::{find_first_block_at_or_after, InMemoryChain, RetryPolicy};
use ld_02_draw_selection::{select, select_with_trace};

const HASH: &str = "0x0000000000000000000000000000000000000000000000006902a5612b49689c";

fn bench_selector(c: &mut Criterion) {
    let mut group = c.benchmark_group("ld-02-draw-selection");
    group.measurement_time(Duration::from_secs(5));

    for size in [13u64, 1_000, 100_000, 2_000_000] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("select", size), &size, |b, &size| {
            b.iter(|| black_box(select(black_box(size), HASH)))
        });
    }

    group.bench_function("select_with_trace_forced", |b| {
        b.iter(|| black_box(select_with_trace(2_000_000, HASH)))
    });

    group.finish();
}

fn bench_block_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("ld-01-block-locator");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("tokio runtime");
    let retry = RetryPolicy::no_retry();

    for blocks in [1u64 << 10, 1 << 16, 1 << 20] {
        let chain = InMemoryChain::with_regular_blocks(blocks, 0, 12);
        let target = (blocks / 3) * 12 + 5;
        group.bench_with_input(BenchmarkId::new("first_block_at_or_after", blocks), &target, |b, &target| {
            b.iter(|| {
                runtime
                    .block_on(find_first_block_at_or_after(&chain, black_box(target), &retry))
                    .expect("block located")
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_selector, bench_block_search);
criterion_main!(benches);
