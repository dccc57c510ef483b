//! Hanabi headless runner
//!
//! Natively the effect draws into software surfaces driven by a manual clock,
//! which is handy for checking tuning without a browser. The web build is a
//! library; load it from JS and use the `Hanabi` class.
//!
//! Usage: `hanabi [config.json] [seconds]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use hanabi::platform::ManualScheduler;
    use hanabi::renderer::PixelSurface;
    use hanabi::{EffectConfig, Hanabi};

    env_logger::init();
    log::info!("Hanabi (native) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path).expect("Failed to read config");
            EffectConfig::from_json(&json).expect("Failed to parse config")
        }
        None => EffectConfig::default(),
    };
    let seconds: f64 = args
        .next()
        .map(|s| s.parse().expect("seconds must be a number"))
        .unwrap_or(5.0);

    let (width, height) = (640, 480);
    let clock = ManualScheduler::new();
    let mut fx = Hanabi::new(
        PixelSurface::new(width, height),
        PixelSurface::new(1, 1),
        Some(PixelSurface::new(width, height)),
        clock.clone(),
        config,
    );
    fx.start();

    // Host refreshes at 60 Hz; the effect steps at its own rate
    let refresh_ms = 1000.0 / 60.0;
    let frames = (seconds * 60.0) as u64;
    for frame in 0..frames {
        // A new burst every second, cycling palettes
        if frame % 60 == 0 {
            let x = width as f64 * (0.25 + 0.5 * ((frame / 60) % 3) as f64 / 2.0);
            let y = height as f64 * 0.4;
            fx.explode_random(x, y);
        }

        clock.advance(refresh_ms);
        if let Some(token) = clock.fire() {
            fx.on_frame(token);
        }

        if frame % 60 == 59 {
            let stats = fx.stats();
            let layers = fx.layers();
            println!(
                "t={:>4.1}s {} primary_px={} glow_px={} trail_px={}",
                (frame + 1) as f64 / 60.0,
                serde_json::to_string(&stats).unwrap_or_default(),
                layers.primary.lit_pixels(),
                layers.glow.lit_pixels(),
                layers.trail.as_ref().map_or(0, |t| t.lit_pixels()),
            );
        }
    }

    fx.destroy();
    log::info!("Hanabi finished");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is bindings::init, this is just to satisfy the compiler
}
