use core::fmt;
use core::num::NonZeroU32;

/// Position of one object in an in-memory object graph arena.
///
/// Stored off by one so `Option<ObjectId>` needs no extra space.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(NonZeroU32);

impl ObjectId {
    /// Id of the object stored at `slot`. Slots beyond `u32` range saturate.
    pub fn at(slot: usize) -> Self {
        let raw = u32::try_from(slot).unwrap_or(u32::MAX - 1);
        Self(NonZeroU32::MIN.saturating_add(raw))
    }

    pub fn slot(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.slot())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_round_trip() {
        for slot in [0_usize, 1, 17, 4096] {
            assert_eq!(ObjectId::at(slot).slot(), slot);
        }
        assert_eq!(format!("{:?}", ObjectId::at(3)), "#3");
    }

    #[test]
    fn optional_id_has_no_overhead() {
        assert_eq!(
            core::mem::size_of::<ObjectId>(),
            core::mem::size_of::<Option<ObjectId>>()
        );
    }
}
