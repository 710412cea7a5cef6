mod common;

use easel::{QrConfig, SceneConfig, SceneStyle, Studio, StudioConfig};

fn studio(tag: &str) -> Studio {
    Studio::new(StudioConfig {
        qr: QrConfig {
            output: common::scratch(&format!("{}/qr.png", tag)),
            width: 256,
            ..Default::default()
        },
        scene: SceneConfig {
            style: SceneStyle::Raytraced,
            width: Some(120),
            height: Some(90),
            output: common::scratch(&format!("{}/scene.png", tag)),
            sky_texture_url: None,
            ..Default::default()
        },
    })
}

#[tokio::test]
async fn render_all_produces_both_files() {
    let studio = studio("all");
    let (qr, scene) = studio.render_all().await.expect("render_all failed");

    assert_eq!((qr.width, qr.height), (256, 256));
    assert_eq!((scene.width, scene.height), (120, 90));
    assert!(std::path::Path::new(&qr.path).exists());
    assert!(std::path::Path::new(&scene.path).exists());
    assert_ne!(qr.sha256, scene.sha256);

    std::fs::remove_file(&qr.path).ok();
    std::fs::remove_file(&scene.path).ok();
}

#[tokio::test]
async fn failing_job_fails_render_all() {
    let mut config = studio("fail").config().clone();
    config.qr.dark = "not-a-colour".to_string();
    let res = Studio::new(config).render_all().await;
    assert!(matches!(res, Err(easel::Error::ConfigError(_))));
}
