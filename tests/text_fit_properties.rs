mod text_fit_properties {
    use offgen::{Canvas, FitOutcome, TextMeasurer, fit};

    /// Deterministic measurer with proportional metrics: every character is
    /// `0.6 * size` wide and every line is `1.2 * size` tall.
    struct Proportional;

    impl TextMeasurer for Proportional {
        fn measure(&mut self, line: &str, size_px: u32) -> (f64, f64) {
            let chars = line.chars().count() as f64;
            let size = f64::from(size_px);
            (chars * 0.6 * size, 1.2 * size)
        }
    }

    fn canvas(width: u32, height: u32, margin: u32) -> Canvas {
        Canvas::new(width, height, margin).unwrap()
    }

    #[test]
    fn short_text_fits_on_one_centered_line() {
        let c = canvas(512, 512, 20);
        let layout = fit("Hi", c, &mut Proportional);

        assert_eq!(layout.outcome, FitOutcome::Fitted);
        assert_eq!(layout.lines.len(), 1);
        let line = &layout.lines[0];
        assert!(line.width <= c.inner_width());
        assert!((line.x - (512.0 - line.width) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn non_empty_text_yields_non_empty_layout() {
        for text in ["a", "a few words here", "line one\nline two", "   "] {
            let layout = fit(text, canvas(256, 256, 10), &mut Proportional);
            assert!(!layout.lines.is_empty(), "no lines for {text:?}");
        }
    }

    #[test]
    fn empty_text_produces_a_single_zero_width_line() {
        let layout = fit("", canvas(512, 512, 20), &mut Proportional);
        assert_eq!(layout.lines.len(), 1);
        assert_eq!(layout.lines[0].width, 0.0);
    }

    #[test]
    fn narrower_canvas_never_picks_a_larger_font() {
        let text = "the quick brown fox jumps over the lazy dog again and again";
        let wide = fit(text, canvas(512, 512, 20), &mut Proportional);
        let narrow = fit(text, canvas(256, 512, 20), &mut Proportional);
        assert!(narrow.font_size_px <= wide.font_size_px);
    }

    #[test]
    fn fit_is_deterministic() {
        let text = "repeatable layout\nacross calls";
        let c = canvas(300, 200, 15);
        let a = fit(text, c, &mut Proportional);
        let b = fit(text, c, &mut Proportional);
        assert_eq!(a.font_size_px, b.font_size_px);
        assert_eq!(a.outcome, b.outcome);
        assert_eq!(a.lines, b.lines);
    }

    #[test]
    fn unbreakable_word_overflows_on_a_single_line() {
        let word = "x".repeat(500);
        let c = canvas(64, 64, 5);
        let layout = fit(&word, c, &mut Proportional);

        assert_eq!(layout.lines.len(), 1);
        assert_eq!(layout.outcome, FitOutcome::Overflowed);
        assert!(layout.lines[0].width > c.inner_width());
        // The search still bottoms out at the font floor.
        assert_eq!(layout.font_size_px, offgen::text_fit::MIN_FONT_SIZE);
    }

    #[test]
    fn lines_stack_without_gaps() {
        let text = "one two three four five six seven eight nine ten\neleven twelve";
        let layout = fit(text, canvas(200, 400, 10), &mut Proportional);
        assert!(layout.lines.len() >= 2);
        for pair in layout.lines.windows(2) {
            assert!((pair[1].y - (pair[0].y + pair[0].height)).abs() < 1e-9);
        }
    }

    #[test]
    fn fitted_block_is_vertically_centered() {
        let layout = fit("Hi", canvas(512, 512, 20), &mut Proportional);
        let total: f64 = layout.lines.iter().map(|l| l.height).sum();
        let first = &layout.lines[0];
        assert!((first.y - (512.0 - total) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn fixed_metrics_walk_the_search_to_the_floor() {
        struct Fixed;
        impl TextMeasurer for Fixed {
            fn measure(&mut self, line: &str, _size_px: u32) -> (f64, f64) {
                (line.chars().count() as f64 * 6.0, 11.0)
            }
        }

        // A fixed-width line too wide for the canvas at any size.
        let text = "w".repeat(200);
        let layout = fit(&text, canvas(128, 128, 5), &mut Fixed);
        assert_eq!(layout.font_size_px, offgen::text_fit::MIN_FONT_SIZE);
        assert_eq!(layout.outcome, FitOutcome::Overflowed);
    }
}
