//! Moving Average Convergence Divergence (MACD).
//!
//! Three lines (separate Indicator instances):
//! - MACD: EMA(close, fast) - EMA(close, slow), from index slow-1
//! - Signal: EMA(signal) of the defined MACD values, from index slow+signal-2
//! - Histogram: MACD - Signal, where the signal is defined

use super::ema::{ema_of_optional, ema_of_series};
use super::{closes, Indicator};
use crate::domain::Candle;

/// Which MACD line to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Macd,
    Signal,
    Histogram,
}

/// All three MACD lines, index-aligned with the input.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdLines {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    line: MacdLine,
    name: String,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize, line: MacdLine) -> Self {
        assert!(fast >= 1 && signal >= 1, "MACD periods must be >= 1");
        assert!(slow > fast, "MACD slow period must be > fast period");
        let suffix = match line {
            MacdLine::Macd => "line",
            MacdLine::Signal => "signal",
            MacdLine::Histogram => "histogram",
        };
        Self {
            fast,
            slow,
            signal,
            line,
            name: format!("macd_{suffix}_{fast}_{slow}_{signal}"),
        }
    }

    /// The conventional MACD(12, 26, 9).
    pub fn standard(line: MacdLine) -> Self {
        Self::new(12, 26, 9, line)
    }

    pub fn lines(&self, candles: &[Candle]) -> MacdLines {
        macd_lines(&closes(candles), self.fast, self.slow, self.signal)
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.line {
            MacdLine::Macd => self.slow - 1,
            MacdLine::Signal | MacdLine::Histogram => self.slow + self.signal - 2,
        }
    }

    fn compute(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        let lines = self.lines(candles);
        match self.line {
            MacdLine::Macd => lines.macd,
            MacdLine::Signal => lines.signal,
            MacdLine::Histogram => lines.histogram,
        }
    }
}

pub fn macd_lines(values: &[f64], fast: usize, slow: usize, signal: usize) -> MacdLines {
    let fast_ema = ema_of_series(values, fast);
    let slow_ema = ema_of_series(values, slow);

    let macd: Vec<Option<f64>> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();

    let signal_line = ema_of_optional(&macd, signal);

    let histogram = macd
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| Some((*m)? - (*s)?))
        .collect();

    MacdLines {
        macd,
        signal: signal_line,
        histogram,
    }
}
