//! Environment attributes, signatures and equipment shortfalls.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value of one environment attribute.
///
/// `Any` is a distinct value, not a wildcard: two signatures are equal only
/// when their `Any`s line up. Serialized as `null` or a plain string.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Attribute {
    #[default]
    Any,
    Specific(String),
}

impl Attribute {
    pub fn is_any(&self) -> bool {
        matches!(self, Attribute::Any)
    }

    /// Whether a batch set to `self` can host tasks from a batch set to `source`.
    pub fn admits(&self, source: &Attribute) -> bool {
        source.is_any() || self == source
    }

    fn write_canonical(&self, out: &mut String) {
        match self {
            Attribute::Any => out.push('*'),
            Attribute::Specific(v) => {
                for c in v.chars() {
                    match c {
                        '%' => out.push_str("%25"),
                        '/' => out.push_str("%2F"),
                        '*' => out.push_str("%2A"),
                        c => out.push(c),
                    }
                }
            }
        }
    }
}

impl From<Option<&str>> for Attribute {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some(v) => Attribute::Specific(v.to_string()),
            None => Attribute::Any,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Any => f.write_str("any"),
            Attribute::Specific(v) => f.write_str(v),
        }
    }
}

/// The full environment a batch runs under.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EnvironmentSignature {
    /// Primary resource; `Any` is the any-primary bucket.
    pub primary: Attribute,
    pub light: Attribute,
    pub humidity: Attribute,
    pub time: Attribute,
}

impl EnvironmentSignature {
    /// Secondary attributes in light, humidity, time order.
    pub fn secondaries(&self) -> [&Attribute; 3] {
        [&self.light, &self.humidity, &self.time]
    }

    /// 1 for the primary slot plus one per concrete secondary, in [1, 4].
    pub fn strictness(&self) -> u8 {
        1 + self.secondaries().iter().filter(|a| !a.is_any()).count() as u8
    }

    /// Whether tasks of a batch under `source` can also grow under `self`.
    ///
    /// Only the source side may be loose; the primary key is not compared.
    pub fn admits(&self, source: &EnvironmentSignature) -> bool {
        self.secondaries()
            .iter()
            .zip(source.secondaries())
            .all(|(target, source)| target.admits(source))
    }

    /// Stable batch identifier, e.g. `oak/bright/*/*`.
    ///
    /// `Any` renders as `*`; `%`, `/` and `*` inside values are percent-escaped
    /// so distinct signatures never share an id.
    pub fn canonical_id(&self) -> String {
        let mut out = String::new();
        for (i, attr) in [&self.primary, &self.light, &self.humidity, &self.time]
            .into_iter()
            .enumerate()
        {
            if i > 0 {
                out.push('/');
            }
            attr.write_canonical(&mut out);
        }
        out
    }
}

/// Equipment-gated attribute kinds. Time of day is never gated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentKind {
    Primary,
    Light,
    Humidity,
}

impl fmt::Display for EquipmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EquipmentKind::Primary => "primary",
            EquipmentKind::Light => "light",
            EquipmentKind::Humidity => "humidity",
        })
    }
}

/// An attribute value a batch needs but the user has not unlocked.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MissingEquipment {
    pub kind: EquipmentKind,
    pub value: String,
}

impl MissingEquipment {
    pub fn new(kind: EquipmentKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

impl fmt::Display for MissingEquipment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.kind, self.value)
    }
}
