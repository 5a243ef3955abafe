use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// A dotted device software version such as `15.1.0.4`.
///
/// Missing components compare as zero, so `15` == `15.0.0`.
#[derive(Debug, Clone, Eq)]
pub struct DeviceVersion {
    parts: Vec<u32>,
}

impl DeviceVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            parts: vec![major, minor, patch],
        }
    }

    pub fn major(&self) -> u32 {
        self.parts.first().copied().unwrap_or(0)
    }

    /// True when this version is at least `major.0.0`.
    pub fn at_least_major(&self, major: u32) -> bool {
        self.major() >= major
    }

    fn part(&self, idx: usize) -> u32 {
        self.parts.get(idx).copied().unwrap_or(0)
    }
}

impl PartialEq for DeviceVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for DeviceVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DeviceVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        (0..len)
            .map(|idx| self.part(idx).cmp(&other.part(idx)))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl Display for DeviceVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.parts.iter().map(u32::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

impl FromStr for DeviceVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("empty version".to_string());
        }
        let parts = trimmed
            .split('.')
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|_| format!("invalid version component '{part}' in '{trimmed}'"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { parts })
    }
}

impl<'de> Deserialize<'de> for DeviceVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::DeviceVersion;

    #[test]
    fn compares_numerically_not_lexically() {
        let nine: DeviceVersion = "9.6.1".parse().expect("version");
        let fifteen: DeviceVersion = "15.1".parse().expect("version");
        assert!(nine < fifteen);
        assert!(fifteen.at_least_major(15));
        assert!(!nine.at_least_major(15));
    }

    #[test]
    fn missing_components_are_zero() {
        let short: DeviceVersion = "15".parse().expect("version");
        assert_eq!(short, DeviceVersion::new(15, 0, 0));
    }

    #[test]
    fn rejects_garbage() {
        assert!("15.x".parse::<DeviceVersion>().is_err());
        assert!("".parse::<DeviceVersion>().is_err());
    }
}
