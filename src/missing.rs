//! Missing-value sentinels as defined by the BCF encoding.

use rust_htslib::bcf::record as bcf_record;

/// Bit pattern htslib reserves for a missing float (`bcf_float_missing`).
pub const FLOAT_MISSING_BITS: u32 = 0x7F80_0001;

pub const INT8_MISSING: i8 = i8::MIN;
pub const INT16_MISSING: i16 = i16::MIN;
pub const INT32_MISSING: i32 = i32::MIN;

/// Whether a value is the "missing" sentinel for its type.
pub trait MissingValue {
    fn is_missing(&self) -> bool;
}

/// An absent flag is indistinguishable from a false one.
impl MissingValue for bool {
    fn is_missing(&self) -> bool {
        !*self
    }
}

impl MissingValue for f32 {
    fn is_missing(&self) -> bool {
        self.to_bits() == FLOAT_MISSING_BITS
    }
}

impl MissingValue for i8 {
    fn is_missing(&self) -> bool {
        *self == INT8_MISSING
    }
}

impl MissingValue for i16 {
    fn is_missing(&self) -> bool {
        *self == INT16_MISSING
    }
}

impl MissingValue for i32 {
    fn is_missing(&self) -> bool {
        bcf_record::Numeric::is_missing(self)
    }
}

impl MissingValue for str {
    fn is_missing(&self) -> bool {
        self.is_empty() || self == "."
    }
}

impl MissingValue for String {
    fn is_missing(&self) -> bool {
        self.as_str().is_missing()
    }
}

impl<T: MissingValue> MissingValue for Option<T> {
    fn is_missing(&self) -> bool {
        self.as_ref().map_or(true, MissingValue::is_missing)
    }
}
