use criterion::{criterion_group, criterion_main, Criterion};
use rand::Rng;
use barricade::{
    input::{
        barrier::{Barrier, BarrierDirections, BarrierManager, BarrierOwner},
        constrain::constrain,
        DeviceId, PointerMotion,
    },
    monitor::MonitorInfo,
    utils::{Logical, Point, Rectangle},
};

fn monitors() -> Vec<MonitorInfo> {
    vec![
        MonitorInfo::new(0, Rectangle::new((0, 0).into(), (2560, 1440).into())),
        MonitorInfo::new(1, Rectangle::new((2560, 0).into(), (1920, 1080).into())),
        MonitorInfo::new(2, Rectangle::new((4480, 200).into(), (1080, 1920).into())),
    ]
}

fn criterion_benchmark(c: &mut Criterion) {
    let monitors = monitors();
    let mut rand = rand::thread_rng();

    let motions = (0..4096)
        .map(|i| {
            let current: Point<f64, Logical> =
                (rand.gen_range(0.0..5560.0), rand.gen_range(0.0..2120.0)).into();
            let delta: Point<f64, Logical> =
                (rand.gen_range(-40.0..40.0), rand.gen_range(-40.0..40.0)).into();
            PointerMotion {
                device: DeviceId(2),
                time: i,
                current,
                proposed: current + delta,
            }
        })
        .collect::<Vec<_>>();

    let mut barriers = BarrierManager::new();
    c.bench_function("constrain_no_barriers", |b| {
        b.iter(|| {
            for motion in &motions {
                constrain(&mut barriers, &monitors, motion);
            }
        });
    });

    for i in 0..16 {
        let x = 200 + i * 320;
        let barrier = Barrier::new(
            (x, 0).into(),
            (x, 1440).into(),
            BarrierDirections::NEGATIVE_X,
            BarrierOwner(1),
        )
        .unwrap();
        barriers.add(barrier);
    }
    c.bench_function("constrain_16_barriers", |b| {
        b.iter(|| {
            for motion in &motions {
                constrain(&mut barriers, &monitors, motion);
            }
            barriers.take_events();
        });
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
