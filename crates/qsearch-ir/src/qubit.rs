//! Qubit and classical bit identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a qubit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// Position of this qubit in a statevector index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// Index of a classical bit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClbitId(pub u32);

impl ClbitId {
    /// Position of this bit in an outcome register.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<u32> for ClbitId {
    fn from(id: u32) -> Self {
        ClbitId(id)
    }
}

/// A qubit, optionally belonging to a named register.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Qubit {
    /// The identifier.
    pub id: QubitId,
    /// Register name and index within it.
    pub register: Option<(String, u32)>,
}

impl Qubit {
    /// A qubit outside any register.
    pub fn new(id: QubitId) -> Self {
        Self { id, register: None }
    }

    /// A qubit at `index` of register `name`.
    pub fn in_register(id: QubitId, name: impl Into<String>, index: u32) -> Self {
        Self {
            id,
            register: Some((name.into(), index)),
        }
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.register {
            Some((reg, idx)) => write!(f, "{reg}[{idx}]"),
            None => write!(f, "{}", self.id),
        }
    }
}

/// A classical bit, optionally belonging to a named register.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clbit {
    /// The identifier.
    pub id: ClbitId,
    /// Register name and index within it.
    pub register: Option<(String, u32)>,
}

impl Clbit {
    /// A classical bit outside any register.
    pub fn new(id: ClbitId) -> Self {
        Self { id, register: None }
    }

    /// A classical bit at `index` of register `name`.
    pub fn in_register(id: ClbitId, name: impl Into<String>, index: u32) -> Self {
        Self {
            id,
            register: Some((name.into(), index)),
        }
    }
}

impl fmt::Display for Clbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.register {
            Some((reg, idx)) => write!(f, "{reg}[{idx}]"),
            None => write!(f, "{}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_display() {
        assert_eq!(Qubit::new(QubitId(0)).to_string(), "q0");
        assert_eq!(Qubit::in_register(QubitId(5), "qr", 2).to_string(), "qr[2]");
    }

    #[test]
    fn test_clbit_display() {
        assert_eq!(Clbit::new(ClbitId(2)).to_string(), "c2");
        assert_eq!(Clbit::in_register(ClbitId(3), "meas", 0).to_string(), "meas[0]");
    }
}
