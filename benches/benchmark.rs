use criterion::{criterion_group, criterion_main, Criterion};

use path_score::generator::{random_grid_path, GridParams};
use path_score::pathfinding::compute_tree;
use path_score::scoring::{PathScorer, PlayerScore};
use path_score::simple_pathfinding::simple_compute_tree;
use path_score::tile::{Path, TileId};


fn make_board() -> Path {
    let params = GridParams {
        width: 16,
        height: 16,
        special_probability: 0.1,
        seed: 35334,
        ..GridParams::default()
    };
    random_grid_path(&params).unwrap()
}

fn special_ids(path: &Path) -> Vec<TileId> {
    path.tiles().iter().filter(|tile| tile.is_special()).map(|tile| tile.id).collect()
}

fn bench_cost_tree(c: &mut Criterion) {
    let path = make_board();
    let starts = special_ids(&path);
    let mut group = c.benchmark_group("cost_tree");
    group.bench_function("simple pathfinding", |b| b.iter(|| {
        for &start in &starts {
            simple_compute_tree(&path, start).unwrap();
        }
    }));
    group.bench_function("optimized pathfinding", |b| b.iter(|| {
        for &start in &starts {
            compute_tree(&path, start).unwrap();
        }
    }));
    group.finish();
}

fn bench_score_path(c: &mut Criterion) {
    let path = make_board();
    let scorer = PathScorer::default();
    c.bench_function("score_path", |b| b.iter(|| {
        let mut path = path.clone();
        let mut players = vec![PlayerScore::default(); 2];
        scorer.score_path(&mut path, &mut players).unwrap();
        players
    }));
}

criterion_group!(benches, bench_cost_tree, bench_score_path);
criterion_main!(benches);
