mod tests {
    use doorsign_engine::color::Rgb;
    use doorsign_engine::{OutputDriver, SmartLedsOutput};
    use smart_leds::SmartLedsWrite;

    #[derive(Default)]
    struct FakeStrip {
        written: Vec<Rgb>,
        fail: bool,
    }

    impl SmartLedsWrite for FakeStrip {
        type Error = ();
        type Color = Rgb;

        fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
        where
            T: IntoIterator<Item = I>,
            I: Into<Self::Color>,
        {
            if self.fail {
                return Err(());
            }
            self.written = iterator.into_iter().map(Into::into).collect();
            Ok(())
        }
    }

    #[test]
    fn test_writes_every_color() {
        let mut output = SmartLedsOutput::new(FakeStrip::default());
        let colors = [Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)];
        output.write(&colors);
        assert_eq!(output.failed_writes(), 0);
        assert_eq!(output.into_inner().written, colors.to_vec());
    }

    #[test]
    fn test_counts_failed_writes() {
        let mut output = SmartLedsOutput::new(FakeStrip {
            fail: true,
            ..FakeStrip::default()
        });
        output.write(&[Rgb::new(1, 1, 1)]);
        output.write(&[Rgb::new(2, 2, 2)]);
        assert_eq!(output.failed_writes(), 2);
        assert!(output.into_inner().written.is_empty());
    }
}
