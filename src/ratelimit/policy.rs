//! Rate-limit windows and policies.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// At most `rate` calls per `per`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateWindow {
    pub rate: u32,
    pub per: Duration,
}

impl RateWindow {
    pub const fn new(rate: u32, per: Duration) -> Self {
        Self { rate, per }
    }

    pub const fn per_secs(rate: u32, secs: u64) -> Self {
        Self::new(rate, Duration::from_secs(secs))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid rate window '{0}', expected <calls>/<seconds>")]
pub struct InvalidWindow(pub String);

impl FromStr for RateWindow {
    type Err = InvalidWindow;

    /// Parse `"<calls>/<seconds>"`, e.g. `"1/3"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidWindow(s.to_string());

        let (rate, secs) = s.trim().split_once('/').ok_or_else(invalid)?;
        let rate = rate.trim().parse::<u32>().map_err(|_| invalid())?;
        let secs = secs.trim().parse::<u64>().map_err(|_| invalid())?;

        if secs == 0 {
            return Err(invalid());
        }

        Ok(Self::per_secs(rate, secs))
    }
}

/// Parse a comma-separated window list such as `"1/3,15/60"`.
pub fn parse_windows(s: &str) -> Result<Vec<RateWindow>, InvalidWindow> {
    let windows = s
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect::<Result<Vec<_>, _>>()?;

    if windows.is_empty() {
        return Err(InvalidWindow(s.to_string()));
    }
    Ok(windows)
}

/// Which window list applies to an invoker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Standard,
    Premium,
}

/// Layered limits: every window of the invoker's tier must allow a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub standard: Vec<RateWindow>,
    pub premium: Vec<RateWindow>,
}

impl Default for RateLimitPolicy {
    /// Burst of 1 call per 3 s plus 15 calls a minute; premium users get
    /// 1 per second and 30 a minute.
    fn default() -> Self {
        Self {
            standard: vec![RateWindow::per_secs(1, 3), RateWindow::per_secs(15, 60)],
            premium: vec![RateWindow::per_secs(1, 1), RateWindow::per_secs(30, 60)],
        }
    }
}

impl RateLimitPolicy {
    /// A policy applying the same windows to every tier.
    pub fn uniform(windows: Vec<RateWindow>) -> Self {
        Self {
            premium: windows.clone(),
            standard: windows,
        }
    }

    pub fn windows(&self, tier: Tier) -> &[RateWindow] {
        match tier {
            Tier::Standard => &self.standard,
            Tier::Premium => &self.premium,
        }
    }

    /// Longest window across both tiers; a bucket idle this long is spent.
    pub fn longest_window(&self) -> Duration {
        self.standard
            .iter()
            .chain(&self.premium)
            .map(|w| w.per)
            .max()
            .unwrap_or(Duration::ZERO)
            .max(Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window() {
        assert_eq!("1/3".parse::<RateWindow>(), Ok(RateWindow::per_secs(1, 3)));
        assert_eq!(" 15 / 60 ".parse::<RateWindow>(), Ok(RateWindow::per_secs(15, 60)));
        assert!("3".parse::<RateWindow>().is_err());
        assert!("a/3".parse::<RateWindow>().is_err());
        assert!("1/0".parse::<RateWindow>().is_err());
    }

    #[test]
    fn test_parse_windows() {
        assert_eq!(
            parse_windows("1/3,15/60"),
            Ok(vec![RateWindow::per_secs(1, 3), RateWindow::per_secs(15, 60)])
        );
        assert!(parse_windows("").is_err());
        assert!(parse_windows("1/3,oops").is_err());
    }

    #[test]
    fn test_longest_window() {
        let policy = RateLimitPolicy::default();
        assert_eq!(policy.longest_window(), Duration::from_secs(60));
    }
}
