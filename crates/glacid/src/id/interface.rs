use crate::ToU64;
use core::fmt;
use core::hash::Hash;
use core::ops::{Add, AddAssign, Sub, SubAssign};

/// A trait representing a layout-compatible packed ID.
///
/// This trait abstracts the core behavior of a time-ordered ID with separate
/// bit fields for the elapsed tick, machine id, and per-tick sequence, packed
/// into one fixed-width integer with the top (sign) bit reserved as zero.
///
/// Types implementing this trait can define custom bit partitions via
/// [`define_packed_id!`]; the field widths are fixed at compile time and the
/// generators only manipulate IDs through the accessors and transition
/// helpers below.
///
/// # Example
///
/// ```
/// use glacid::{PackedId, SonyflakeId};
///
/// let id = SonyflakeId::from(1000, 2, 1);
/// assert_eq!(id.tick(), 1000);
/// assert_eq!(id.machine_id(), 2);
/// assert_eq!(id.sequence(), 1);
/// ```
///
/// [`define_packed_id!`]: crate::define_packed_id
pub trait PackedId:
    Sized + Copy + Clone + fmt::Display + fmt::Debug + PartialOrd + Ord + PartialEq + Eq + Hash
{
    /// Scalar type for all bit fields (typically `u64`)
    type Ty: Copy
        + Clone
        + Default
        + Add<Output = Self::Ty>
        + AddAssign
        + Sub<Output = Self::Ty>
        + SubAssign
        + Ord
        + PartialOrd
        + Eq
        + PartialEq
        + Hash
        + ToU64
        + fmt::Debug
        + fmt::Display;

    /// Zero value (used for resetting the sequence)
    const ZERO: Self::Ty;

    /// One value (used for incrementing the sequence)
    const ONE: Self::Ty;

    /// Returns the elapsed-tick portion of the ID.
    fn tick(&self) -> Self::Ty;

    /// Returns the maximum possible value for the tick field.
    fn max_tick() -> Self::Ty;

    /// Returns the machine id portion of the ID.
    fn machine_id(&self) -> Self::Ty;

    /// Returns the maximum possible value for the machine id field.
    fn max_machine_id() -> Self::Ty;

    /// Returns the sequence portion of the ID.
    fn sequence(&self) -> Self::Ty;

    /// Returns the maximum possible value for the sequence field.
    fn max_sequence() -> Self::Ty;

    /// Constructs a new ID from its components.
    fn from_components(tick: Self::Ty, machine_id: Self::Ty, sequence: Self::Ty) -> Self;

    /// Converts this type into its raw integer representation
    fn to_raw(&self) -> Self::Ty;

    /// Converts a raw integer into this type
    fn from_raw(raw: Self::Ty) -> Self;

    /// Returns true if all reserved bits are zero.
    ///
    /// A raw value with reserved bits set did not come from a well-formed
    /// pack and would not survive a signed-integer round trip.
    fn is_valid(&self) -> bool;

    /// Returns true if the current sequence value can be incremented.
    fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::max_sequence()
    }

    /// Returns the next sequence value.
    fn next_sequence(&self) -> Self::Ty {
        self.sequence() + Self::ONE
    }

    /// Returns a new ID with the sequence incremented.
    fn increment_sequence(&self) -> Self {
        Self::from_components(self.tick(), self.machine_id(), self.next_sequence())
    }

    /// Returns a new ID for a newer tick with sequence reset to zero.
    fn rollover_to_tick(&self, tick: Self::Ty) -> Self {
        Self::from_components(tick, self.machine_id(), Self::ZERO)
    }
}
