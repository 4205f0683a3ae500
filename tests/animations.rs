mod tests {
    use doorsign_engine::animation::{
        Animation, ColorDrift, ColorWheel, GammaTest, Twinkle, UniformDrift, random_below,
        random_color,
    };
    use doorsign_engine::color::{Rgb, rgb_to_hsv};
    use doorsign_engine::{Duration, Instant};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    const LEN: usize = 8;
    const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn rng(seed: u64) -> SmallRng {
        SmallRng::seed_from_u64(seed)
    }

    fn render(animation: &mut dyn Animation, ms: u64, first_frame: bool) -> [Rgb; LEN] {
        let mut frame = [BLACK; LEN];
        animation.update(at(ms), first_frame, &mut frame);
        frame
    }

    #[test]
    fn test_random_color_range() {
        let mut rng = rng(5);
        for _ in 0..500 {
            let color = random_color(&mut rng);
            assert_ne!(color, BLACK);
            let hsv = rgb_to_hsv(color);
            assert!(hsv.sat >= 98, "{color:?} {hsv:?}");
        }
        for _ in 0..500 {
            assert!(random_below(&mut rng, 7) < 7);
        }
        assert_eq!(random_below(&mut rng, 0), 0);
    }

    #[test]
    fn test_twinkle_lights_one_pixel_on_first_frame() {
        let mut twinkle = Twinkle::new(rng(1));
        assert_eq!(twinkle.name(), "twinkle");
        for ms in 0..20 {
            let frame = render(&mut twinkle, ms, true);
            assert_eq!(frame.iter().filter(|pixel| **pixel == WHITE).count(), 1);
            assert_eq!(frame.iter().filter(|pixel| **pixel == BLACK).count(), LEN - 1);
        }
    }

    #[test]
    fn test_twinkle_probability() {
        let mut twinkle = Twinkle::new(rng(2));
        render(&mut twinkle, 0, true);

        let mut lit = 0;
        for ms in 1..=1000 {
            let frame = render(&mut twinkle, ms * 40, false);
            let count = frame.iter().filter(|pixel| **pixel == WHITE).count();
            assert!(count <= 1);
            lit += count;
        }
        assert!((300..=500).contains(&lit), "{lit} frames lit");

        let mut never = Twinkle::new(rng(3)).with_probability(0.0);
        render(&mut never, 0, true);
        assert_eq!(render(&mut never, 40, false), [BLACK; LEN]);
    }

    #[test]
    fn test_color_drift_moves_every_pixel() {
        let mut drift = ColorDrift::<_, LEN>::new(rng(4)).with_blend_ms(1000);
        assert_eq!(drift.name(), "random_mixed");

        let start = render(&mut drift, 0, true);
        assert!(start.iter().all(|pixel| *pixel != BLACK));

        let middle = render(&mut drift, 500, false);
        assert!(middle.iter().all(|pixel| *pixel != BLACK));

        // Blend complete: every pixel shows its target
        let target = render(&mut drift, 1000, false);
        assert_ne!(target, start);
        assert!(target.iter().all(|pixel| *pixel != BLACK));

        // Activation starts a fresh set of colors
        let restarted = render(&mut drift, 1200, true);
        assert_ne!(restarted, target);
    }

    #[test]
    fn test_uniform_drift_paints_odd_pixels() {
        let mut drift = UniformDrift::new(rng(6));
        assert_eq!(drift.name(), "random_uniform");

        for (ms, first_frame) in [(0, true), (60_000, false), (120_000, false)] {
            let frame = render(&mut drift, ms, first_frame);
            for (index, pixel) in frame.iter().enumerate() {
                if index % 2 == 0 {
                    assert_eq!(*pixel, BLACK);
                } else {
                    assert_eq!(*pixel, frame[1]);
                    assert_ne!(*pixel, BLACK);
                }
            }
        }
    }

    #[test]
    fn test_gamma_test_disabled_and_alternating() {
        let mut gamma = GammaTest::new();
        assert!(!gamma.enabled());
        assert!(GammaTest::new().with_enabled(true).enabled());
        assert_eq!(gamma.name(), "gammatest");

        let blue = Rgb { r: 0, g: 0, b: 255 };
        let red = Rgb { r: 255, g: 0, b: 0 };

        let frame = render(&mut gamma, 0, true);
        assert_eq!(frame[0], blue);
        assert!(frame[1..].iter().all(|pixel| *pixel == BLACK));

        assert_eq!(render(&mut gamma, 3000, false)[0], red);
        let middle = render(&mut gamma, 4500, false)[0];
        assert!(middle != red && middle != blue);
        assert_eq!(render(&mut gamma, 6000, false)[0], blue);
    }

    #[test]
    fn test_color_wheel_rotates() {
        let mut wheel = ColorWheel::new()
            .with_cycle_duration(Duration::from_millis(3600))
            .with_spread(0);

        let start = render(&mut wheel, 1000, true);
        assert_eq!(rgb_to_hsv(start[0]).hue, 0);
        assert!(start.iter().all(|pixel| *pixel == start[0]));

        let quarter = render(&mut wheel, 1900, false);
        let hue = rgb_to_hsv(quarter[0]).hue;
        assert!((88..=90).contains(&hue), "hue {hue}");

        // Full turn
        assert_eq!(render(&mut wheel, 4600, false), start);
    }

    #[test]
    fn test_color_wheel_spreads_hue_over_strip() {
        let mut wheel = ColorWheel::new().with_spread(240);
        let frame = render(&mut wheel, 0, true);
        let hues: Vec<u16> = frame.iter().map(|pixel| rgb_to_hsv(*pixel).hue).collect();
        assert!(hues.windows(2).all(|pair| pair[0] < pair[1]), "{hues:?}");
        assert!(hues[LEN - 1] <= 240);
    }
}
