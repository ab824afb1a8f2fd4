use crate::error::ConfigError;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::{
    fmt,
    ops::{BitOr, BitOrAssign},
    str::FromStr,
};

///
/// Features
///
/// Opt-in behaviours of a record type, composed with `|`.
/// Parses from and renders to text such as `"EQ | ORDER"`.
///

#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Features(u16);

impl Features {
    pub const NONE: Self = Self(0);

    pub const EQ: Self = Self(1 << 0);
    pub const ORDER: Self = Self(1 << 1);
    pub const HASH: Self = Self(1 << 2);
    pub const REPR: Self = Self(1 << 3);
    pub const SLOTS: Self = Self(1 << 4);
    pub const FROZEN: Self = Self(1 << 5);
    pub const PRIVATE: Self = Self(1 << 6);
    pub const VALIDATION: Self = Self(1 << 7);
    pub const LOSSY_AUTOCAST: Self = Self(1 << 8);

    pub const DEFAULT: Self = Self::EQ.union(Self::ORDER).union(Self::REPR);
    pub const IMMUTABLE: Self = Self::DEFAULT
        .union(Self::HASH)
        .union(Self::SLOTS)
        .union(Self::FROZEN);

    // Single flags in rendering order.
    const FLAGS: [(&'static str, Self); 9] = [
        ("EQ", Self::EQ),
        ("ORDER", Self::ORDER),
        ("HASH", Self::HASH),
        ("REPR", Self::REPR),
        ("SLOTS", Self::SLOTS),
        ("FROZEN", Self::FROZEN),
        ("PRIVATE", Self::PRIVATE),
        ("VALIDATION", Self::VALIDATION),
        ("LOSSY_AUTOCAST", Self::LOSSY_AUTOCAST),
    ];

    const PRESETS: [(&'static str, Self); 3] = [
        ("NONE", Self::NONE),
        ("DEFAULT", Self::DEFAULT),
        ("IMMUTABLE", Self::IMMUTABLE),
    ];

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Every flag of `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Names of the single flags that are set, in rendering order.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::FLAGS
            .into_iter()
            .filter(move |(_, flag)| self.contains(*flag))
            .map(|(name, _)| name)
    }

    fn lookup(name: &str) -> Option<Self> {
        Self::FLAGS
            .iter()
            .chain(Self::PRESETS.iter())
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, flags)| *flags)
    }
}

impl Default for Features {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BitOr for Features {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for Features {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Debug for Features {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Features({self})")
    }
}

impl fmt::Display for Features {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }

        for (i, name) in self.names().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            f.write_str(name)?;
        }

        Ok(())
    }
}

impl FromStr for Features {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split('|').try_fold(Self::NONE, |acc, part| {
            let part = part.trim();
            Self::lookup(part)
                .map(|flags| acc | flags)
                .ok_or_else(|| ConfigError::InvalidFeature(part.to_string()))
        })
    }
}

impl Serialize for Features {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Features {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

///
/// TESTS
///
