use criterion::{black_box, criterion_group, criterion_main, Criterion};

use astar_solver::{
    puzzle::{breadth_first, parse_puzzle},
    solve, EightPuzzle, RouteMap, SearchConfig,
};

const SIMPLE_PUZZLE: &str = "
initial:
1,8,2
0,4,3
7,6,5
goal:
1,2,3
4,5,6
7,8,0";

// 31 moves, the longest optimal solution on a 3x3 board
const HARDER_PUZZLE: &str = "
initial:
8,6,7
2,5,4
3,0,1
goal:
1,2,3
4,5,6
7,8,0";

// odd parity: every reachable board is expanded before giving up
const UNSOLVABLE_PUZZLE: &str = "
initial:
1,2,3
4,5,6
8,7,0
goal:
1,2,3
4,5,6
7,8,0";

fn criterion_bench(c: &mut Criterion) {
    let config = SearchConfig::new();

    c.bench_function("route", |b| {
        let map = RouteMap::mindanao();
        let from = "Davao City".to_string();
        let to = "Butuan".to_string();
        b.iter(|| {
            solve(black_box(&map), black_box(&from), black_box(&to), &config);
        })
    });

    for (name, text) in [("simple", SIMPLE_PUZZLE), ("harder", HARDER_PUZZLE)] {
        let (start, goal) = parse_puzzle(text).unwrap();
        c.bench_function(name, |b| {
            b.iter(|| {
                solve(&EightPuzzle, black_box(&start), black_box(&goal), &config);
            })
        });
    }

    c.bench_function("harder-bfs", |b| {
        let (start, goal) = parse_puzzle(HARDER_PUZZLE).unwrap();
        b.iter(|| {
            breadth_first(black_box(&start), black_box(&goal));
        })
    });

    let mut group = c.benchmark_group("exhaustive");
    group.sample_size(10);
    group.bench_function("unsolvable", |b| {
        let (start, goal) = parse_puzzle(UNSOLVABLE_PUZZLE).unwrap();
        b.iter(|| {
            solve(&EightPuzzle, black_box(&start), black_box(&goal), &config);
        })
    });
    group.finish();
}

criterion_group!(benches, criterion_bench);
criterion_main!(benches);
