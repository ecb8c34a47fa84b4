//! Command rate limiting.
//!
//! Every command carries one [`RateLimiter`] in its check chain. A limiter
//! enforces all windows of the invoker's tier at once, e.g. a short burst
//! allowance plus a sustained per-minute allowance.

mod bucket;
mod limiter;
mod policy;

pub use bucket::{Bucket, Cooldown};
pub use limiter::RateLimiter;
pub use policy::{parse_windows, InvalidWindow, RateLimitPolicy, RateWindow, Tier};
