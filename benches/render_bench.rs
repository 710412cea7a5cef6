use criterion::{criterion_group, criterion_main, Criterion};

use easel::{Artwork, QrCodeArt, QrConfig, SceneArt, SceneConfig, SceneStyle};

// Run with:
//    cargo bench

fn bench_qr(c: &mut Criterion) {
    let art = QrCodeArt::new(QrConfig::default()).expect("encode");
    c.bench_function("qr_render_1024", |b| {
        b.iter(|| {
            let _ = art.render().unwrap();
        })
    });
}

fn bench_perspective(c: &mut Criterion) {
    let art = SceneArt::new(SceneConfig {
        sky_texture_url: None,
        ..Default::default()
    })
    .expect("config");
    c.bench_function("perspective_scene_1080p", |b| {
        b.iter(|| {
            let _ = art.render_image().unwrap();
        })
    });
}

fn bench_raytraced(c: &mut Criterion) {
    let art = SceneArt::new(SceneConfig {
        style: SceneStyle::Raytraced,
        ..Default::default()
    })
    .expect("config");
    c.bench_function("raytraced_scene_800", |b| {
        b.iter(|| {
            let _ = art.render_image().unwrap();
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_qr, bench_perspective, bench_raytraced
}
criterion_main!(benches);
