//! Device fingerprint
//!
//! Informational only. Two devices with identical characteristics share a
//! fingerprint and nothing relies on it for access control.

use serde::{Deserialize, Serialize};

/// Characteristics the fingerprint is derived from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub user_agent: String,
    /// `WIDTHxHEIGHT`
    pub screen: String,
    pub timezone: String,
    pub language: String,
}

impl DeviceProfile {
    /// Profile of the current host process
    pub fn from_host() -> Self {
        let env_or = |var: &str, default: &str| {
            std::env::var(var).unwrap_or_else(|_| default.to_string())
        };

        Self {
            user_agent: format!(
                "ballot/{} ({}; {})",
                env!("CARGO_PKG_VERSION"),
                std::env::consts::OS,
                std::env::consts::ARCH
            ),
            screen: format!("{}x{}", env_or("COLUMNS", "80"), env_or("LINES", "24")),
            timezone: env_or("TZ", "UTC"),
            language: env_or("LANG", "en-US"),
        }
    }

    /// `fp_{base36 hash}` of `user_agent|screen|timezone|language`
    pub fn fingerprint(&self) -> String {
        let joined = format!(
            "{}|{}|{}|{}",
            self.user_agent, self.screen, self.timezone, self.language
        );
        format!("fp_{}", to_base36(rolling_hash(&joined).unsigned_abs() as u64))
    }
}

/// 32-bit `h * 31 + c` hash over UTF-16 code units, wrapping on overflow
fn rolling_hash(input: &str) -> i32 {
    input
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_shl(5).wrapping_sub(h).wrapping_add(unit as i32))
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
