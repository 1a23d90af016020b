use codspeed_criterion_compat::{
    Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kifu_scanner::Scanner;

static GAME: &str = "(;GM[1]FF[4]SZ[19]PB[Honinbo Shusaku]PW[Gennan Inseki]KM[0]RE[B+2]
;B[qd];W[dc];B[pq];W[oc];B[cp];W[cf];B[ep];W[qo];B[pl];W[ld]
;B[qj];W[oo];B[ce]C[The ear-reddening move comes much later \\] in this game.]
(;W[df];B[dd];W[cc];B[bd];W[bc])
(;W[de]LB[de:A][df:B];B[dd]TR[dd][de])
)";

static COMMENTS: &str = "(;C[It was the year when they finally immanentized the Eschaton. \
     It was the year when they finally immanentized the Eschaton. \
     It was the year when they finally immanentized the Eschaton. \
     It was the year when they finally immanentized the Eschaton.]
;B[pd]C[It was the year when they finally immanentized the Eschaton.]
;W[dd]C[It was the year when they finally immanentized the Eschaton.])";

static CANDIDATES: [(&str, &str); 2] = [("moves_and_variations", GAME), ("long_comments", COMMENTS)];

fn iterate(s: &str) {
    let mut scanner = Scanner::new(s);
    loop {
        let token = scanner.next_token();
        if token.kind == kifu_scanner::TokenKind::EOF {
            break;
        }
        black_box(token);
    }
}

fn bench_iterate(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterate");

    for (name, source) in CANDIDATES {
        let source = source.repeat(32);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(name, &source, |b, s| b.iter(|| iterate(s)));
    }
}

criterion_group!(benches, bench_iterate);
criterion_main!(benches);
