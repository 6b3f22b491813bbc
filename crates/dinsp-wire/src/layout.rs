use std::fmt;
use std::str::FromStr;

use crate::error::WireError;
use crate::field::FieldBuf;

/// The element type of one layout field.
///
/// ```text
/// ┌───────┬──────────────┬──────────────────────────────────┐
/// │ Token │ Variant      │ Bytes per element                │
/// ├───────┼──────────────┼──────────────────────────────────┤
/// │ cN    │ Text(N)      │ N (raw bytes, no terminator)     │
/// │ i4    │ Int4         │ 4 (signed, little-endian)        │
/// │ i8    │ Int8         │ 8 (signed, little-endian)        │
/// │ r4    │ Real4        │ 4 (IEEE 754 single)              │
/// │ r8    │ Real8        │ 8 (IEEE 754 double)              │
/// │ z4    │ Complex4     │ 8 (re, im as two singles)        │
/// │ z8    │ Complex8     │ 16 (re, im as two doubles)       │
/// └───────┴──────────────┴──────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text(usize),
    Int4,
    Int8,
    Real4,
    Real8,
    Complex4,
    Complex8,
}

impl FieldKind {
    /// Size in bytes of a single element of this kind.
    #[must_use]
    pub fn element_size(self) -> usize {
        match self {
            Self::Text(n) => n,
            Self::Int4 | Self::Real4 => 4,
            Self::Int8 | Self::Real8 | Self::Complex4 => 8,
            Self::Complex8 => 16,
        }
    }

    /// Human-readable family name, used in diagnostics.
    #[must_use]
    pub fn family(self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Int4 | Self::Int8 => "integer",
            Self::Real4 | Self::Real8 => "real",
            Self::Complex4 | Self::Complex8 => "complex",
        }
    }

    #[must_use]
    pub fn is_integer(self) -> bool {
        matches!(self, Self::Int4 | Self::Int8)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(n) => write!(f, "c{n}"),
            Self::Int4 => f.write_str("i4"),
            Self::Int8 => f.write_str("i8"),
            Self::Real4 => f.write_str("r4"),
            Self::Real8 => f.write_str("r8"),
            Self::Complex4 => f.write_str("z4"),
            Self::Complex8 => f.write_str("z8"),
        }
    }
}

/// How many elements a field holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Count {
    /// A scalar: exactly one element, no `[..]` suffix.
    One,
    /// `[N]`: a literal element count.
    Fixed(usize),
    /// `[#K]`: the count is the value of scalar integer field `K` of the
    /// same record, which must precede this field.
    FieldRef(usize),
}

/// One field of a record layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub kind: FieldKind,
    pub count: Count,
}

impl FieldSpec {
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.count == Count::One
    }
}

/// Upper bound on the number of fields a layout expands to.
pub const MAX_FIELDS: usize = 1 << 16;

/// A parsed record layout descriptor.
///
/// Descriptors are a compact, comma-separated mini-language describing
/// the fields of one record in the order they are packed:
///
/// ```text
///   layout := item ("," item)*
///   item   := [repeat] kind [ "[" count "]" ]
///   kind   := "c" N | "i4" | "i8" | "r4" | "r8" | "z4" | "z8"
///   count  := N | "#" K
/// ```
///
/// A leading repeat expands into separate fields, so `3i4` is three
/// scalar integers. `[#K]` refers to field `K` after expansion (0-based).
///
/// ```text
///   "3i4,c8[#2],r8[#2]"
///    │    │      └─ field 4: field-2 doubles
///    │    └──────── field 3: field-2 eight-byte chunks
///    └───────────── fields 0,1,2: scalar i4
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    fields: Vec<FieldSpec>,
}

impl Layout {
    /// Parse a descriptor string.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidLayout`] for empty items, unknown kind
    /// tokens, zero-width text, zero repeats, more than [`MAX_FIELDS`]
    /// fields, malformed brackets, and
    /// back-references that do not point at an earlier scalar integer.
    pub fn parse(descriptor: &str) -> Result<Self, WireError> {
        let mut fields: Vec<FieldSpec> = Vec::new();
        let mut position = 0;

        for item in descriptor.split(',') {
            let invalid = |reason| WireError::InvalidLayout {
                descriptor: descriptor.to_string(),
                position,
                reason,
            };

            let (repeat, kind, count) = parse_item(item.trim()).map_err(invalid)?;

            if let Count::FieldRef(target) = count {
                match fields.get(target) {
                    Some(spec) if spec.kind.is_integer() && spec.is_scalar() => {}
                    Some(_) => return Err(invalid("count must reference a scalar integer")),
                    None => return Err(invalid("count references a later field")),
                }
            }

            if repeat > MAX_FIELDS - fields.len() {
                return Err(invalid("too many fields"));
            }
            fields.extend(std::iter::repeat_n(FieldSpec { kind, count }, repeat));
            position += item.len() + 1;
        }

        Ok(Self { fields })
    }

    /// Number of fields after repeat expansion.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Allocate one output buffer per field, each of the matching variant.
    ///
    /// Scalars reserve a single element, literal arrays reserve their exact
    /// count, and back-referenced arrays reserve `capacity` elements. Reusing
    /// the returned buffers across reads avoids reallocating as long as no
    /// record exceeds `capacity`.
    #[must_use]
    pub fn buffers(&self, capacity: usize) -> Vec<FieldBuf> {
        self.fields
            .iter()
            .map(|spec| {
                let elements = match spec.count {
                    Count::One => 1,
                    Count::Fixed(n) => n,
                    Count::FieldRef(_) => capacity,
                };
                FieldBuf::for_kind(spec.kind, elements)
            })
            .collect()
    }
}

impl FromStr for Layout {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Layout {
    /// Canonical form: one token per field, repeats expanded.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, spec) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", spec.kind)?;
            match spec.count {
                Count::One => {}
                Count::Fixed(n) => write!(f, "[{n}]")?,
                Count::FieldRef(k) => write!(f, "[#{k}]")?,
            }
        }
        Ok(())
    }
}

// ── Item parsing ──────────────────────────────────────────────────────

/// Split a run of leading ASCII digits off `s`.
fn take_digits(s: &str) -> (Option<usize>, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return (None, s);
    }
    // Digit runs too long for usize are treated as absent and rejected by the caller.
    (s[..end].parse().ok(), &s[end..])
}

fn parse_item(item: &str) -> Result<(usize, FieldKind, Count), &'static str> {
    if item.is_empty() {
        return Err("empty item");
    }

    let (repeat, rest) = match take_digits(item) {
        (Some(0), _) => return Err("repeat count must be positive"),
        (Some(n), rest) => (n, rest),
        (None, rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => {
            return Err("repeat count too large");
        }
        (None, rest) => (1, rest),
    };

    let mut chars = rest.chars();
    let tag = chars.next().ok_or("missing kind")?;
    let (width, rest) = take_digits(chars.as_str());
    let width = width.ok_or("missing element width")?;

    let kind = match (tag, width) {
        ('c', 0) => return Err("text width must be positive"),
        ('c', n) => FieldKind::Text(n),
        ('i', 4) => FieldKind::Int4,
        ('i', 8) => FieldKind::Int8,
        ('r', 4) => FieldKind::Real4,
        ('r', 8) => FieldKind::Real8,
        ('z', 4) => FieldKind::Complex4,
        ('z', 8) => FieldKind::Complex8,
        ('i' | 'r' | 'z', _) => return Err("numeric width must be 4 or 8"),
        _ => return Err("unknown field kind"),
    };

    if rest.is_empty() {
        return Ok((repeat, kind, Count::One));
    }

    let inner = rest
        .strip_prefix('[')
        .and_then(|r| r.strip_suffix(']'))
        .ok_or("expected [count] suffix")?;

    let count = if let Some(reference) = inner.strip_prefix('#') {
        match take_digits(reference) {
            (Some(k), "") => Count::FieldRef(k),
            _ => return Err("malformed field reference"),
        }
    } else {
        match take_digits(inner) {
            (Some(n), "") => Count::Fixed(n),
            _ => return Err("malformed element count"),
        }
    };

    Ok((repeat, kind, count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_block_layout() {
        let layout = Layout::parse("3i4,c8[#2],r8[#2]").unwrap();
        assert_eq!(layout.len(), 5);
        assert_eq!(
            layout.fields()[0],
            FieldSpec {
                kind: FieldKind::Int4,
                count: Count::One
            }
        );
        assert_eq!(layout.fields()[3].kind, FieldKind::Text(8));
        assert_eq!(layout.fields()[3].count, Count::FieldRef(2));
        assert_eq!(layout.fields()[4].kind, FieldKind::Real8);
    }

    #[test]
    fn parse_header_layout_with_literal_count() {
        let layout = Layout::parse("c18,i8,i8[6]").unwrap();
        assert_eq!(layout.len(), 3);
        assert_eq!(layout.fields()[0].kind, FieldKind::Text(18));
        assert_eq!(layout.fields()[2].count, Count::Fixed(6));
    }

    #[test]
    fn display_is_canonical() {
        let layout = Layout::parse("3i8, c16[#2], z8[#2]").unwrap();
        assert_eq!(layout.to_string(), "i8,i8,i8,c16[#2],z8[#2]");
        let reparsed: Layout = layout.to_string().parse().unwrap();
        assert_eq!(reparsed, layout);
    }

    #[test]
    fn element_sizes() {
        assert_eq!(FieldKind::Text(18).element_size(), 18);
        assert_eq!(FieldKind::Int4.element_size(), 4);
        assert_eq!(FieldKind::Int8.element_size(), 8);
        assert_eq!(FieldKind::Complex4.element_size(), 8);
        assert_eq!(FieldKind::Complex8.element_size(), 16);
    }

    #[test]
    fn reject_forward_reference() {
        let result = Layout::parse("c8[#1],i4");
        assert!(matches!(
            result,
            Err(WireError::InvalidLayout { position: 0, .. })
        ));
    }

    #[test]
    fn reject_reference_to_array_or_real() {
        assert!(Layout::parse("i4[3],r8[#0]").is_err());
        assert!(Layout::parse("r8,r8[#0]").is_err());
    }

    #[test]
    fn reject_bad_tokens() {
        for bad in ["", "i4,,r8", "i2", "q8", "c0", "0i4", "i4[", "i4[x]", "i4[#]", "c", "4294967295i4", "65536i4,i4"] {
            assert!(
                matches!(Layout::parse(bad), Err(WireError::InvalidLayout { .. })),
                "descriptor {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn repeat_up_to_field_limit() {
        let layout = Layout::parse(&format!("{}i4", MAX_FIELDS - 1)).unwrap();
        assert_eq!(layout.len(), MAX_FIELDS - 1);
        assert!(Layout::parse(&format!("{}i4,i4", MAX_FIELDS - 1)).is_ok());
        assert!(matches!(
            Layout::parse(&format!("{}i4,i4,i4", MAX_FIELDS - 1)),
            Err(WireError::InvalidLayout { reason: "too many fields", .. })
        ));
    }

    #[test]
    fn error_position_points_at_item() {
        let err = Layout::parse("i4,i4,x9").unwrap_err();
        assert!(matches!(err, WireError::InvalidLayout { position: 6, .. }));
    }

    #[test]
    fn buffers_match_kinds() {
        let layout = Layout::parse("c18,i4,r8[#1],z8[2]").unwrap();
        let buffers = layout.buffers(10);
        assert!(matches!(buffers[0], FieldBuf::Text(_)));
        assert!(matches!(buffers[1], FieldBuf::Int(_)));
        assert!(matches!(&buffers[2], FieldBuf::Real(v) if v.capacity() >= 10));
        assert!(matches!(&buffers[3], FieldBuf::Complex(v) if v.capacity() >= 2));
    }
}
