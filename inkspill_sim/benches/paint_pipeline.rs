use criterion::{Criterion, black_box, criterion_group, criterion_main};

use inkspill_sim::drop_pattern::RadiusClass;
use inkspill_sim::ownership::OwnershipMap;
use inkspill_sim::sim::MatchState;
use inkspill_sim::sweep::PaintedColumns;
use inkspill_sim::types::{ColumnCoord, Owner, Rgb, Team, VoxelCoord};
use inkspill_sim::world::GridWorld;

const STONE: Rgb = Rgb::new(120, 110, 100);

fn terrain() -> GridWorld {
    let mut world = GridWorld::new(128, 128, 64);
    world.fill_below(40, STONE);
    // A few walls so nudging has something to do.
    for i in 0..128 {
        for z in 30..40 {
            world.set_block(VoxelCoord::new(i, 64, z), STONE);
            world.set_block(VoxelCoord::new(64, i, z), STONE);
        }
    }
    world
}

fn bench_grenade_splat(c: &mut Criterion) {
    let mut group = c.benchmark_group("grenade_splat");
    group.bench_function("inknade_128_rays", |b| {
        let mut world = terrain();
        let mut state = MatchState::new(0xC0FFEE);
        b.iter(|| {
            let mut events = Vec::new();
            let report =
                state.grenade_exploded(&mut world, Team::A, [50.5, 50.5, 38.5], &mut events);
            black_box((report, events));
        })
    });
    group.bench_function("paint_radius_3_x64", |b| {
        let mut world = terrain();
        let mut state = MatchState::new(7);
        let impacts: Vec<VoxelCoord> = (0..64).map(|i| VoxelCoord::new(i * 2, 20, 40)).collect();
        let radius = RadiusClass::new(3).unwrap();
        b.iter(|| {
            let mut events = Vec::new();
            let report = state.paint(&mut world, Team::B, &impacts, radius, &mut events);
            black_box((report, events));
        })
    });
    group.finish();
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep");
    group.bench_function("100_columns_x64_levels", |b| {
        let world = terrain();
        let mut ownership = OwnershipMap::new();
        let mut columns = PaintedColumns::new();
        for x in 0..128 {
            for y in 0..128 {
                ownership.own(VoxelCoord::new(x, y, 40), Owner::TeamA);
                columns.register(ColumnCoord::new(x, y));
            }
        }
        b.iter(|| black_box(columns.sweep(&world, &mut ownership, 100, 64)))
    });
    group.finish();
}

criterion_group!(benches, bench_grenade_splat, bench_sweep);
criterion_main!(benches);
