/// Trait for converting tick-sized scalars into a `u64`.
///
/// This is used to normalize the generic tick scalar of an ID layout when
/// reporting observed tick values in errors, where a concrete integer type is
/// required.
pub trait ToU64 {
    fn to_u64(self) -> u64;
}

impl ToU64 for u8 {
    fn to_u64(self) -> u64 {
        u64::from(self)
    }
}

impl ToU64 for u16 {
    fn to_u64(self) -> u64 {
        u64::from(self)
    }
}

impl ToU64 for u32 {
    fn to_u64(self) -> u64 {
        u64::from(self)
    }
}

impl ToU64 for u64 {
    fn to_u64(self) -> u64 {
        self
    }
}
