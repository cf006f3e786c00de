/// Type Name Format, the 3 bit field classifying a record's type
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, uniffi::Enum, strum::EnumIter)]
pub enum Tnf {
    Empty,
    WellKnown,
    Mime,
    AbsoluteUri,
    External,
    Unknown,
    Unchanged,
    Reserved,
}

impl Tnf {
    /// Only the low 3 bits are looked at
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Self::Empty,
            1 => Self::WellKnown,
            2 => Self::Mime,
            3 => Self::AbsoluteUri,
            4 => Self::External,
            5 => Self::Unknown,
            6 => Self::Unchanged,
            _ => Self::Reserved,
        }
    }

    pub const fn bits(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::WellKnown => 1,
            Self::Mime => 2,
            Self::AbsoluteUri => 3,
            Self::External => 4,
            Self::Unknown => 5,
            Self::Unchanged => 6,
            Self::Reserved => 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator as _;

    use super::*;

    #[test]
    fn bits_match_wire_values() {
        for (index, tnf) in Tnf::iter().enumerate() {
            assert_eq!(tnf.bits() as usize, index);
            assert_eq!(Tnf::from_bits(tnf.bits()), tnf);
        }

        // high bits belong to the other header flags
        assert_eq!(Tnf::from_bits(0xD1), Tnf::WellKnown);
    }
}
