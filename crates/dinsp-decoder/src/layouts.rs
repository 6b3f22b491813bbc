use dinsp_types::{IntegerWidth, TIMESTAMP_LEN, ValueKind};
use dinsp_wire::{Layout, WireError};

use crate::config::SessionConfig;

/// Field positions in an integral block record.
pub mod block_field {
    pub const ROW: usize = 0;
    pub const COL: usize = 1;
    pub const SIZE: usize = 2;
    pub const PAIRS: usize = 3;
    pub const VALUES: usize = 4;
    /// Fields a complete block record decodes to.
    pub const COUNT: usize = 5;
}

/// `c18,iW`: timestamp and Kramers pair count.
#[must_use]
pub fn header_descriptor(width: IntegerWidth) -> String {
    format!("c{TIMESTAMP_LEN},{}", width.field_kind())
}

/// `c18,iW,iW[2N]`: the same record, now including the flat pair table.
#[must_use]
pub fn pair_table_descriptor(width: IntegerWidth, pair_count: usize) -> String {
    let int = width.field_kind();
    format!("c{TIMESTAMP_LEN},{int},{int}[{}]", 2 * pair_count)
}

/// `3iW,c(2W)[#2],r8[#2]` or `3iW,c(2W)[#2],z8[#2]`.
///
/// Field 2 (the block size) governs the length of both arrays.
#[must_use]
pub fn block_descriptor(width: IntegerWidth, kind: ValueKind) -> String {
    format!(
        "3{},{}[#{size}],{}[#{size}]",
        width.field_kind(),
        width.pair_kind(),
        kind.field_kind(),
        size = block_field::SIZE
    )
}

/// Parsed layouts for one session.
///
/// The header and block layouts are fixed by the [`SessionConfig`]; the
/// pair-table layout depends on a count read from the file and is built
/// on demand.
#[derive(Clone, Debug)]
pub struct SessionLayouts {
    config: SessionConfig,
    pub header: Layout,
    pub block: Layout,
}

impl SessionLayouts {
    /// # Errors
    ///
    /// [`WireError::InvalidLayout`] if a generated descriptor is rejected.
    pub fn new(config: SessionConfig) -> Result<Self, WireError> {
        Ok(Self {
            config,
            header: Layout::parse(&header_descriptor(config.width))?,
            block: Layout::parse(&block_descriptor(config.width, config.kind))?,
        })
    }

    /// # Errors
    ///
    /// [`WireError::InvalidLayout`] if the generated descriptor is rejected.
    pub fn pair_table(&self, pair_count: usize) -> Result<Layout, WireError> {
        Layout::parse(&pair_table_descriptor(self.config.width, pair_count))
    }

    /// Payload length of a header record carrying `pair_count` pairs, or
    /// `None` if it overflows.
    #[must_use]
    pub fn pair_table_bytes(&self, pair_count: usize) -> Option<usize> {
        pair_count
            .checked_mul(2)?
            .checked_add(1)?
            .checked_mul(self.config.width.bytes())?
            .checked_add(TIMESTAMP_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptors_per_width_and_kind() {
        assert_eq!(header_descriptor(IntegerWidth::Narrow), "c18,i4");
        assert_eq!(pair_table_descriptor(IntegerWidth::Wide, 3), "c18,i8,i8[6]");
        assert_eq!(
            block_descriptor(IntegerWidth::Narrow, ValueKind::Real),
            "3i4,c8[#2],r8[#2]"
        );
        assert_eq!(
            block_descriptor(IntegerWidth::Wide, ValueKind::Complex),
            "3i8,c16[#2],z8[#2]"
        );
    }

    #[test]
    fn block_layout_has_five_fields() {
        for width in [IntegerWidth::Narrow, IntegerWidth::Wide] {
            for kind in [ValueKind::Real, ValueKind::Complex] {
                let layouts = SessionLayouts::new(SessionConfig::new(width, kind)).unwrap();
                assert_eq!(layouts.block.len(), block_field::COUNT);
                assert_eq!(layouts.header.len(), 2);
                assert_eq!(layouts.pair_table(0).unwrap().len(), 3);
                assert_eq!(
                    layouts.pair_table_bytes(2),
                    Some(TIMESTAMP_LEN + 5 * width.bytes())
                );
            }
        }
    }
}
