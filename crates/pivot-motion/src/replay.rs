use crate::types::MotionSample;
use crate::MotionSource;
use std::collections::VecDeque;
use std::io::BufRead;
use thiserror::Error;

/// Values per recorded line: nine attitude components plus three gravity.
const FIELDS_PER_LINE: usize = 12;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("line {line}: expected 12 values, found {found}")]
    FieldCount { line: usize, found: usize },
    #[error("line {line}: invalid number {value:?}")]
    InvalidNumber { line: usize, value: String },
    #[error("failed to read recording")]
    Io(#[from] std::io::Error),
}

/// Plays back a recorded motion session, one sample per tick.
///
/// Recording format, one sample per line:
///
/// ```text
/// # m11 m12 m13 m21 m22 m23 m31 m32 m33 gx gy gz
/// 1 0 0 0 1 0 0 0 1 0 0 -1
/// ```
///
/// The attitude is in sensor row order (see [`MotionSample::from_sensor_rows`]).
/// Blank lines and `#` comments are skipped.
pub struct ReplaySource {
    samples: VecDeque<MotionSample>,
}

impl ReplaySource {
    pub fn from_reader(reader: impl BufRead) -> Result<Self, ReplayError> {
        let mut samples = VecDeque::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if let Some(sample) = parse_line(&line, index + 1)? {
                samples.push_back(sample);
            }
        }
        tracing::debug!(samples = samples.len(), "Recording parsed");
        Ok(Self { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl MotionSource for ReplaySource {
    fn next_sample(&mut self) -> Option<MotionSample> {
        self.samples.pop_front()
    }

    fn is_exhausted(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Parse one recording line. Returns `None` for blank and comment lines.
fn parse_line(line: &str, line_number: usize) -> Result<Option<MotionSample>, ReplayError> {
    let content = line.split('#').next().unwrap_or_default().trim();
    if content.is_empty() {
        return Ok(None);
    }

    let values = content
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|field| !field.is_empty())
        .map(|field| {
            field.parse::<f32>().map_err(|_| ReplayError::InvalidNumber {
                line: line_number,
                value: field.to_string(),
            })
        })
        .collect::<Result<Vec<f32>, _>>()?;

    if values.len() != FIELDS_PER_LINE {
        return Err(ReplayError::FieldCount {
            line: line_number,
            found: values.len(),
        });
    }

    let v = |i: usize| values[i];
    Ok(Some(MotionSample::from_sensor_rows(
        [
            [v(0), v(1), v(2)],
            [v(3), v(4), v(5)],
            [v(6), v(7), v(8)],
        ],
        [v(9), v(10), v(11)],
    )))
}
