//! Run-time halves of the built-in functions.

use std::io::{self, BufRead, Write};
use std::rc::Rc;

use crate::value::Value;

pub fn print(value: &Value) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let _ = writeln!(out, "{}", value);
}

/// Read one line from stdin. End of stream or an I/O failure yields the
/// empty string; scripts have no way to observe the difference.
pub fn input() -> Value {
    let stdin = io::stdin();
    let mut line = String::new();
    match stdin.lock().read_line(&mut line) {
        Ok(_) => {
            while line.ends_with('\n') || line.ends_with('\r') {
                line.pop();
            }
            Value::String(Rc::from(line.as_str()))
        }
        Err(_) => Value::String(Rc::from("")),
    }
}

/// A small splitmix64 generator; statistical quality is plenty for `rnd`
/// and it keeps the runtime dependency-free.
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn from_clock() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9e3779b97f4a7c15);
        Self { state: seed }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }

    /// Uniform value in `min..=max`. A reversed range yields `min`.
    pub fn next_in_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = (max as i128 - min as i128 + 1) as u128;
        let offset = (self.next_u64() as u128) % span;
        (min as i128 + offset as i128) as i64
    }
}
