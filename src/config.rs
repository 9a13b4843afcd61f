//! Simulation configuration, passed by value into the generator and engine.

use crate::constants::{chunk, timing};
use crate::error::{Error, Result};
use rand::Rng;
use std::{fmt, str::FromStr, time::Duration};

/// Inclusive bounds on the length of a relocated chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkBounds {
    pub min: usize,
    pub max: usize,
}

impl ChunkBounds {
    pub fn new(min: usize, max: usize) -> Result<Self> {
        let bounds = Self { min, max };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min == 0 || self.min > self.max {
            return Err(Error::InvalidChunkBounds {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Uniform length in `min..=max`.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.gen_range(self.min..=self.max)
    }
}

impl FromStr for ChunkBounds {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (min, max) = s
            .split_once('-')
            .ok_or_else(|| Error::InvalidChunkSpec(s.to_string()))?;
        let min: usize = min
            .trim()
            .parse()
            .map_err(|_| Error::InvalidChunkSpec(s.to_string()))?;
        let max: usize = max
            .trim()
            .parse()
            .map_err(|_| Error::InvalidChunkSpec(s.to_string()))?;
        Self::new(min, max)
    }
}

impl fmt::Display for ChunkBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub width: usize,
    pub height: usize,
    pub base_delay: Duration,
    pub skip_scan: bool,
    pub loop_forever: bool,
    pub fragmented_chunk: ChunkBounds,
    pub full_chunk: ChunkBounds,
}

impl SimConfig {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            base_delay: Duration::from_millis(timing::DEFAULT_DELAY_MS),
            skip_scan: false,
            loop_forever: false,
            fragmented_chunk: chunk::FRAGMENTED,
            full_chunk: chunk::FULL,
        }
    }

    /// Zero delay, for driving the engine without a terminal.
    pub fn headless(width: usize, height: usize) -> Self {
        Self {
            base_delay: Duration::ZERO,
            ..Self::new(width, height)
        }
    }

    pub fn with_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_skip_scan(mut self, skip_scan: bool) -> Self {
        self.skip_scan = skip_scan;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        self.fragmented_chunk.validate()?;
        self.full_chunk.validate()
    }

    pub fn block_count(&self) -> usize {
        self.width * self.height
    }

    /// Delay for a reclaiming scan frame.
    pub fn scan_read_delay(&self) -> Duration {
        self.base_delay / 2
    }

    /// Delay for a plain scan frame.
    pub fn scan_delay(&self) -> Duration {
        self.base_delay / 2 / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chunk_bounds() {
        assert_eq!("3-15".parse::<ChunkBounds>().unwrap(), chunk::FRAGMENTED);
        assert_eq!(
            " 100 - 400 ".parse::<ChunkBounds>().unwrap(),
            chunk::FULL
        );
        assert!(matches!(
            "15".parse::<ChunkBounds>(),
            Err(Error::InvalidChunkSpec(_))
        ));
        assert!(matches!(
            "a-b".parse::<ChunkBounds>(),
            Err(Error::InvalidChunkSpec(_))
        ));
        assert!(matches!(
            "9-3".parse::<ChunkBounds>(),
            Err(Error::InvalidChunkBounds { min: 9, max: 3 })
        ));
        assert!(matches!(
            "0-3".parse::<ChunkBounds>(),
            Err(Error::InvalidChunkBounds { .. })
        ));
    }

    #[test]
    fn test_chunk_bounds_display() {
        assert_eq!(chunk::FULL.to_string(), "100-400");
    }

    #[test]
    fn test_pick_stays_in_bounds() {
        use rand::{rngs::StdRng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(7);
        let bounds = ChunkBounds::new(2, 5).unwrap();
        for _ in 0..200 {
            let n = bounds.pick(&mut rng);
            assert!((2..=5).contains(&n));
        }
    }

    #[test]
    fn test_validate_dimensions() {
        assert!(SimConfig::new(80, 22).validate().is_ok());
        assert!(matches!(
            SimConfig::new(0, 22).validate(),
            Err(Error::InvalidDimensions {
                width: 0,
                height: 22
            })
        ));
        assert!(SimConfig::new(80, 0).validate().is_err());
    }

    #[test]
    fn test_scan_delays() {
        let config = SimConfig::new(1, 1).with_delay(Duration::from_millis(100));
        assert_eq!(config.scan_read_delay(), Duration::from_millis(50));
        assert_eq!(config.scan_delay(), Duration::from_millis(25));
    }
}
