use std::fmt::Write as _;
use std::hint::black_box;

use codspeed_criterion_compat::{
    BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};
use kifu_board::BoardSize;
use kifu_parse::{ParseOptions, parse};
use kifu_patterns::{MergeOptions, PatternTree};

/// A record whose main line fills the board row by row, with a short
/// variation after every tenth move.
fn record(moves: usize) -> String {
    let mut text = String::from("(;GM[1]FF[4]SZ[19]PB[Black]PW[White]\n");
    let mut closing = 0;
    for i in 0..moves {
        let (col, row) = ((i % 19) as u8, (i / 19 % 19) as u8);
        let color = if i % 2 == 0 { 'B' } else { 'W' };
        let _ = write!(text, ";{color}[{}{}]", char::from(b'a' + col), char::from(b'a' + row));
        if i % 10 == 9 {
            let other = if color == 'B' { 'W' } else { 'B' };
            let _ = write!(text, "\n(;{other}[ss]C[tenuki])\n(");
            closing += 1;
        }
    }
    text.push_str(&")".repeat(closing + 1));
    text
}

fn benchmark_parser(c: &mut Criterion) {
    let records = [("short", record(40)), ("long", record(300))];
    let mut group = c.benchmark_group("Parser Benchmark");

    for (name, text) in &records {
        group.throughput(Throughput::Bytes(text.len() as u64));
        for (mode, play) in [("play", true), ("track", false)] {
            let options = ParseOptions { play, ..ParseOptions::default() };
            group.bench_with_input(BenchmarkId::new(mode, name), text, |b, text| {
                b.iter(|| black_box(parse(text, &options)));
            });
        }
    }

    group.finish();
}

fn benchmark_merge(c: &mut Criterion) {
    let parsed = parse(&record(120), &ParseOptions::default());
    let options = MergeOptions { move_limit: Some(60), ..MergeOptions::default() };

    c.bench_function("merge_record", |b| {
        b.iter(|| {
            let mut patterns =
                PatternTree::new(BoardSize::square(19), 0).expect("even game patterns");
            black_box(patterns.merge(&parsed.tree, &options));
        });
    });
}

criterion_group!(benches, benchmark_parser, benchmark_merge);
criterion_main!(benches);
