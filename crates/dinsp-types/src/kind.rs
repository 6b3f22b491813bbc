use std::fmt;

use dinsp_wire::FieldKind;
use serde::{Deserialize, Serialize};

/// Whether the integral values of a file are real or complex.
///
/// Picked once per file from the arithmetic group of the calculation:
/// real arithmetic (group 1) or a spin-free Hamiltonian gives real
/// integrals, everything else complex ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Real,
    Complex,
}

impl ValueKind {
    /// Arithmetic group number that denotes real arithmetic.
    pub const REAL_GROUP: u8 = 1;

    #[must_use]
    pub fn from_arith(group_arith: u8, is_spinfree: bool) -> Self {
        if group_arith == Self::REAL_GROUP || is_spinfree {
            Self::Real
        } else {
            Self::Complex
        }
    }

    /// Layout kind of one integral value.
    #[must_use]
    pub fn field_kind(self) -> FieldKind {
        match self {
            Self::Real => FieldKind::Real8,
            Self::Complex => FieldKind::Complex8,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real => f.write_str("real"),
            Self::Complex => f.write_str("complex"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spinfree_forces_real() {
        assert_eq!(ValueKind::from_arith(1, false), ValueKind::Real);
        assert_eq!(ValueKind::from_arith(2, true), ValueKind::Real);
        assert_eq!(ValueKind::from_arith(2, false), ValueKind::Complex);
        assert_eq!(ValueKind::from_arith(4, false), ValueKind::Complex);
    }
}
