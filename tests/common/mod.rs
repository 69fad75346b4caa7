#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use marketcharts::domain::error::MarketError;
pub use marketcharts::domain::ohlcv::OhlcvBar;
use marketcharts::ports::data_port::{DataPort, FetchWindow};
use marketcharts::ports::viewer_port::ViewerPort;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
    pub requests: RefCell<Vec<(String, FetchWindow)>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        window: &FetchWindow,
    ) -> Result<Vec<OhlcvBar>, MarketError> {
        self.requests
            .borrow_mut()
            .push((symbol.to_string(), *window));
        if let Some(reason) = self.errors.get(symbol) {
            return Err(MarketError::Transport {
                url: format!("mock://{}", symbol),
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }
}

/// Records every path it is asked to open; optionally fails each launch.
pub struct RecordingViewer {
    pub opened: RefCell<Vec<PathBuf>>,
    pub fail: bool,
}

impl RecordingViewer {
    pub fn new() -> Self {
        Self {
            opened: RefCell::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            opened: RefCell::new(Vec::new()),
            fail: true,
        }
    }
}

impl ViewerPort for RecordingViewer {
    fn open(&self, path: &Path) -> Result<(), MarketError> {
        self.opened.borrow_mut().push(path.to_path_buf());
        if self.fail {
            return Err(MarketError::Viewer {
                path: path.display().to_string(),
                reason: "no display".into(),
            });
        }
        Ok(())
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn make_bar(date_str: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        date: date(date_str),
        open: close,
        high: close * 1.01,
        low: close * 0.99,
        close,
        volume: 1_000_000.0,
    }
}

/// `closes.len()` consecutive calendar days starting at `start`.
pub fn generate_bars(start: &str, closes: &[f64]) -> Vec<OhlcvBar> {
    let first = date(start);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            date: first + Duration::days(i as i64),
            open: close,
            high: close * 1.01,
            low: close * 0.99,
            close,
            volume: 1_000_000.0,
        })
        .collect()
}

/// Strictly increasing closes: 100, 101, 102, ...
pub fn rising_closes(n: usize) -> Vec<f64> {
    (0..n).map(|i| 100.0 + i as f64).collect()
}
