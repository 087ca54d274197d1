use crate::config::PackKind;
use serde::{Deserialize, Serialize};

/// Rewards for skipping a Small or Big blind. Gained tags queue FIFO and
/// resolve at their trigger site (next shop, next boss, immediately, ...).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TagKind {
    Uncommon,
    Rare,
    Negative,
    Foil,
    Holographic,
    Polychrome,
    Investment,
    Voucher,
    Boss,
    Standard,
    Charm,
    Meteor,
    Buffoon,
    Ethereal,
    Handy,
    Garbage,
    Coupon,
    Double,
    Juggle,
    D6,
    TopUp,
    Speed,
    Orbital,
    Economy,
}

impl TagKind {
    pub const ALL: [TagKind; 24] = [
        TagKind::Uncommon,
        TagKind::Rare,
        TagKind::Negative,
        TagKind::Foil,
        TagKind::Holographic,
        TagKind::Polychrome,
        TagKind::Investment,
        TagKind::Voucher,
        TagKind::Boss,
        TagKind::Standard,
        TagKind::Charm,
        TagKind::Meteor,
        TagKind::Buffoon,
        TagKind::Ethereal,
        TagKind::Handy,
        TagKind::Garbage,
        TagKind::Coupon,
        TagKind::Double,
        TagKind::Juggle,
        TagKind::D6,
        TagKind::TopUp,
        TagKind::Speed,
        TagKind::Orbital,
        TagKind::Economy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TagKind::Uncommon => "Uncommon Tag",
            TagKind::Rare => "Rare Tag",
            TagKind::Negative => "Negative Tag",
            TagKind::Foil => "Foil Tag",
            TagKind::Holographic => "Holographic Tag",
            TagKind::Polychrome => "Polychrome Tag",
            TagKind::Investment => "Investment Tag",
            TagKind::Voucher => "Voucher Tag",
            TagKind::Boss => "Boss Tag",
            TagKind::Standard => "Standard Tag",
            TagKind::Charm => "Charm Tag",
            TagKind::Meteor => "Meteor Tag",
            TagKind::Buffoon => "Buffoon Tag",
            TagKind::Ethereal => "Ethereal Tag",
            TagKind::Handy => "Handy Tag",
            TagKind::Garbage => "Garbage Tag",
            TagKind::Coupon => "Coupon Tag",
            TagKind::Double => "Double Tag",
            TagKind::Juggle => "Juggle Tag",
            TagKind::D6 => "D6 Tag",
            TagKind::TopUp => "Top-up Tag",
            TagKind::Speed => "Speed Tag",
            TagKind::Orbital => "Orbital Tag",
            TagKind::Economy => "Economy Tag",
        }
    }

    /// Pack tags open a free Mega pack of this kind on the spot.
    pub fn free_pack(self) -> Option<PackKind> {
        match self {
            TagKind::Standard => Some(PackKind::Standard),
            TagKind::Charm => Some(PackKind::Arcana),
            TagKind::Meteor => Some(PackKind::Celestial),
            TagKind::Buffoon => Some(PackKind::Buffoon),
            TagKind::Ethereal => Some(PackKind::Spectral),
            _ => None,
        }
    }

    /// Edition tags mark the next free shop joker.
    pub fn joker_edition(self) -> Option<crate::Edition> {
        match self {
            TagKind::Negative => Some(crate::Edition::Negative),
            TagKind::Foil => Some(crate::Edition::Foil),
            TagKind::Holographic => Some(crate::Edition::Holographic),
            TagKind::Polychrome => Some(crate::Edition::Polychrome),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_tags_map_to_their_pack_kind() {
        assert_eq!(TagKind::Charm.free_pack(), Some(PackKind::Arcana));
        assert_eq!(TagKind::Ethereal.free_pack(), Some(PackKind::Spectral));
        assert_eq!(TagKind::Investment.free_pack(), None);
    }
}
