//! Macro-based bit layouts for packed IDs.
//!
//! [`define_packed_id!`] declares a layout type from four declared bit widths
//! (reserved, tick, machine id, sequence) over a fixed-width unsigned
//! integer. All bits must be accounted for and at least one reserved bit is
//! required so the packed value always fits a signed integer of the same
//! width with its top bit zero.

/// Declares a packed-ID type with custom tick, machine-id and sequence bit
/// layouts.
///
/// The ID is packed from **MSB to LSB**:
///
/// ```text
///  Bit Index:  high bits                               low bits
///              +--------------+------------+----------+----------+
///  Field:      | reserved (R) |  tick (T)  | machine (M) | seq (S) |
///              +--------------+------------+----------+----------+
/// ```
///
/// A compile-time assertion rejects layouts whose widths do not sum to the
/// backing integer's width, and layouts with no reserved bit.
///
/// ## Example
///
/// ```
/// use glacid::define_packed_id;
///
/// define_packed_id!(
///     ShortId, u64,
///     reserved: 1,
///     tick: 47,
///     machine_id: 8,
///     sequence: 8
/// );
///
/// let id = ShortId::from(1_725_000_000, 3, 0);
/// assert_eq!(id.tick(), 1_725_000_000);
/// assert_eq!(id.machine_id(), 3);
/// ```
#[macro_export]
macro_rules! define_packed_id {
    (
        $(#[$meta:meta])*
        $name:ident, $int:ty,
        reserved: $reserved_bits:expr,
        tick: $tick_bits:expr,
        machine_id: $machine_bits:expr,
        sequence: $sequence_bits:expr
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name {
            id: $int,
        }

        const _: () = {
            // Compile-time checks: the layout must fill the backing type
            // exactly, and the top bit must stay clear so the value survives
            // a signed round trip.
            assert!(
                $reserved_bits >= 1,
                "packed id layout needs at least one reserved sign bit"
            );
            assert!(
                $reserved_bits + $tick_bits + $machine_bits + $sequence_bits == <$int>::BITS,
                "packed id layout must fill the underlying integer type"
            );
        };

        impl $name {
            pub const RESERVED_BITS: u32 = $reserved_bits;
            pub const TICK_BITS: u32 = $tick_bits;
            pub const MACHINE_ID_BITS: u32 = $machine_bits;
            pub const SEQUENCE_BITS: u32 = $sequence_bits;

            pub const SEQUENCE_SHIFT: u32 = 0;
            pub const MACHINE_ID_SHIFT: u32 = Self::SEQUENCE_SHIFT + Self::SEQUENCE_BITS;
            pub const TICK_SHIFT: u32 = Self::MACHINE_ID_SHIFT + Self::MACHINE_ID_BITS;

            pub const TICK_MASK: $int = ((1 as $int) << Self::TICK_BITS) - 1;
            pub const MACHINE_ID_MASK: $int = ((1 as $int) << Self::MACHINE_ID_BITS) - 1;
            pub const SEQUENCE_MASK: $int = ((1 as $int) << Self::SEQUENCE_BITS) - 1;

            pub const fn from(tick: $int, machine_id: $int, sequence: $int) -> Self {
                let tick = (tick & Self::TICK_MASK) << Self::TICK_SHIFT;
                let machine_id = (machine_id & Self::MACHINE_ID_MASK) << Self::MACHINE_ID_SHIFT;
                let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
                Self {
                    id: tick | machine_id | sequence,
                }
            }

            /// Extracts the elapsed tick from the packed ID.
            pub const fn tick(&self) -> $int {
                (self.id >> Self::TICK_SHIFT) & Self::TICK_MASK
            }

            /// Extracts the machine id from the packed ID.
            pub const fn machine_id(&self) -> $int {
                (self.id >> Self::MACHINE_ID_SHIFT) & Self::MACHINE_ID_MASK
            }

            /// Extracts the sequence number from the packed ID.
            pub const fn sequence(&self) -> $int {
                (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
            }

            /// Returns the maximum representable tick value.
            pub const fn max_tick() -> $int {
                Self::TICK_MASK
            }

            /// Returns the maximum representable machine id.
            pub const fn max_machine_id() -> $int {
                Self::MACHINE_ID_MASK
            }

            /// Returns the maximum representable sequence value.
            pub const fn max_sequence() -> $int {
                Self::SEQUENCE_MASK
            }

            /// Returns the raw packed integer.
            pub const fn to_raw(&self) -> $int {
                self.id
            }

            /// Reinterprets a raw integer as a packed ID.
            pub const fn from_raw(raw: $int) -> Self {
                Self { id: raw }
            }

            /// Returns true if all reserved bits are zero.
            pub const fn is_valid(&self) -> bool {
                self.id >> (Self::TICK_SHIFT + Self::TICK_BITS) == 0
            }
        }

        impl $crate::PackedId for $name {
            type Ty = $int;

            const ZERO: Self::Ty = 0;
            const ONE: Self::Ty = 1;

            fn tick(&self) -> Self::Ty {
                self.tick()
            }

            fn max_tick() -> Self::Ty {
                Self::max_tick()
            }

            fn machine_id(&self) -> Self::Ty {
                self.machine_id()
            }

            fn max_machine_id() -> Self::Ty {
                Self::max_machine_id()
            }

            fn sequence(&self) -> Self::Ty {
                self.sequence()
            }

            fn max_sequence() -> Self::Ty {
                Self::max_sequence()
            }

            fn from_components(tick: Self::Ty, machine_id: Self::Ty, sequence: Self::Ty) -> Self {
                debug_assert!(tick <= Self::TICK_MASK, "tick overflow");
                debug_assert!(machine_id <= Self::MACHINE_ID_MASK, "machine_id overflow");
                debug_assert!(sequence <= Self::SEQUENCE_MASK, "sequence overflow");
                Self::from(tick, machine_id, sequence)
            }

            fn to_raw(&self) -> Self::Ty {
                self.to_raw()
            }

            fn from_raw(raw: Self::Ty) -> Self {
                Self::from_raw(raw)
            }

            fn is_valid(&self) -> bool {
                self.is_valid()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.id)
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                let full = core::any::type_name::<Self>();
                let name = full.rsplit("::").next().unwrap_or(full);
                f.debug_struct(name)
                    .field("id", &format_args!("{} (0x{:x})", self.id, self.id))
                    .field("tick", &self.tick())
                    .field("machine_id", &self.machine_id())
                    .field("sequence", &self.sequence())
                    .finish()
            }
        }
    };
}

define_packed_id!(
    /// A 64-bit packed ID using the Sonyflake layout
    ///
    /// - 1 bit reserved (sign, always zero)
    /// - 39 bits elapsed tick (10 ms resolution ≈ 174 years of range)
    /// - 16 bits machine id
    /// - 8 bits sequence (256 IDs per tick per machine)
    ///
    /// ```text
    ///  Bit Index:  63           63 62        24 23             8 7             0
    ///              +--------------+------------+----------------+--------------+
    ///  Field:      | reserved (1) |  tick (39) | machine ID (16) | sequence (8) |
    ///              +--------------+------------+----------------+--------------+
    ///              |<----------- MSB --------- 64 bits -------- LSB ---------->|
    /// ```
    SonyflakeId, u64,
    reserved: 1,
    tick: 39,
    machine_id: 16,
    sequence: 8
);

impl SonyflakeId {
    /// Returns the ID as a non-negative signed 64-bit integer.
    ///
    /// The reserved sign bit is zero by construction, so the cast is
    /// lossless.
    pub const fn to_i64(self) -> i64 {
        self.id as i64
    }
}

impl From<SonyflakeId> for i64 {
    fn from(id: SonyflakeId) -> Self {
        id.to_i64()
    }
}

impl From<SonyflakeId> for u64 {
    fn from(id: SonyflakeId) -> Self {
        id.to_raw()
    }
}
