use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CounterParseError {
    #[error("counter text {0:?} contains no digits")]
    NoDigits(String),
    #[error("counter text {0:?} does not fit in a u64")]
    Overflow(String),
}

/// Counter text split into its numeric target and the non-numeric remainder.
///
/// `"120+"` parses to target `120` with suffix `"+"`. All ASCII digits are
/// concatenated into the target and every other character, in order, forms
/// the suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterText {
    pub target: u64,
    pub suffix: String,
}

impl CounterText {
    pub fn parse(text: &str) -> Result<Self, CounterParseError> {
        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        let suffix: String = text.chars().filter(|c| !c.is_ascii_digit()).collect();

        if digits.is_empty() {
            return Err(CounterParseError::NoDigits(text.to_string()));
        }
        let target = digits
            .parse::<u64>()
            .map_err(|_| CounterParseError::Overflow(text.to_string()))?;

        Ok(Self { target, suffix })
    }

    pub fn render(&self, value: u64) -> String {
        format!("{value}{}", self.suffix)
    }
}

/// One displayed frame of a running ramp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RampFrame {
    pub value: u64,
    pub text: String,
    pub finished: bool,
}

/// Fixed-step ramp from 0 to a counter's target.
///
/// Each [`tick`](Self::tick) adds `target / steps` to the running value. The
/// displayed value is the floor of the running value until it reaches the
/// target, at which point the exact target is shown and the ramp finishes.
/// The ramp knows nothing about wall-clock time; the host drives it.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterRamp {
    current: f64,
    step: f64,
    text: CounterText,
    finished: bool,
}

impl CounterRamp {
    pub fn new(text: CounterText, steps: u32) -> Self {
        let step = text.target as f64 / f64::from(steps.max(1));
        Self {
            current: 0.0,
            step,
            text,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance one step. Ticking a finished ramp repeats the final frame.
    pub fn tick(&mut self) -> RampFrame {
        let target = self.text.target;
        if !self.finished {
            self.current += self.step;
            if self.current >= target as f64 {
                self.finished = true;
            }
        }

        let value = if self.finished {
            target
        } else {
            (self.current.floor() as u64).min(target)
        };

        RampFrame {
            value,
            text: self.text.render(value),
            finished: self.finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(ramp: &mut CounterRamp) -> Vec<RampFrame> {
        let mut frames = Vec::new();
        // Floating-point accumulation may need one step beyond `steps`.
        for _ in 0..1000 {
            let frame = ramp.tick();
            let done = frame.finished;
            frames.push(frame);
            if done {
                break;
            }
        }
        frames
    }

    #[test]
    fn parse_digits_and_suffix() {
        let text = CounterText::parse("50+").unwrap();
        assert_eq!(text.target, 50);
        assert_eq!(text.suffix, "+");

        let text = CounterText::parse(" 98%\n").unwrap();
        assert_eq!(text.target, 98);
        assert_eq!(text.suffix, " %\n");
        assert_eq!(text.render(98), "98 %\n");

        let text = CounterText::parse("1,200").unwrap();
        assert_eq!(text.target, 1200);
        assert_eq!(text.suffix, ",");
    }

    #[test]
    fn parse_without_digits_errors() {
        assert_eq!(
            CounterText::parse("many"),
            Err(CounterParseError::NoDigits("many".into()))
        );
        assert!(matches!(
            CounterText::parse("99999999999999999999999"),
            Err(CounterParseError::Overflow(_))
        ));
    }

    #[test]
    fn ramp_is_monotonic_and_ends_at_target() {
        let mut ramp = CounterRamp::new(CounterText::parse("120+").unwrap(), 50);
        let frames = run_to_end(&mut ramp);

        assert!(frames.len() >= 50 && frames.len() <= 51);
        for pair in frames.windows(2) {
            assert!(pair[0].value <= pair[1].value);
        }
        assert!(frames.iter().all(|f| f.value <= 120));
        assert!(frames.iter().all(|f| f.text.ends_with('+')));

        let last = frames.last().unwrap();
        assert!(last.finished);
        assert_eq!(last.text, "120+");
        assert!(ramp.is_finished());
    }

    #[test]
    fn small_target_repeats_values() {
        let mut ramp = CounterRamp::new(CounterText::parse("3").unwrap(), 50);
        let frames = run_to_end(&mut ramp);
        assert_eq!(frames[0].text, "0");
        assert_eq!(frames.last().unwrap().text, "3");
    }

    #[test]
    fn zero_target_finishes_immediately() {
        let mut ramp = CounterRamp::new(CounterText::parse("0 projects").unwrap(), 50);
        let frame = ramp.tick();
        assert!(frame.finished);
        assert_eq!(frame.text, "0 projects");
    }

    #[test]
    fn ticking_after_finish_is_stable() {
        let mut ramp = CounterRamp::new(CounterText::parse("10").unwrap(), 2);
        ramp.tick();
        let end = ramp.tick();
        assert!(end.finished);
        assert_eq!(ramp.tick(), end);
    }
}
