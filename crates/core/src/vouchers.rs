use serde::{Deserialize, Serialize};

/// Permanent run upgrades. Each base voucher has an upgraded tier that is
/// only offered once the base is owned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VoucherKind {
    Overstock,
    OverstockPlus,
    ClearanceSale,
    Liquidation,
    Hone,
    GlowUp,
    RerollSurplus,
    RerollGlut,
    CrystalBall,
    OmenGlobe,
    Telescope,
    Observatory,
    Grabber,
    NachoTong,
    Wasteful,
    Recyclomancy,
    TarotMerchant,
    TarotTycoon,
    PlanetMerchant,
    PlanetTycoon,
    SeedMoney,
    MoneyTree,
    Blank,
    Antimatter,
    MagicTrick,
    Illusion,
    Hieroglyph,
    Petroglyph,
    DirectorsCut,
    Retcon,
    PaintBrush,
    Palette,
}

impl VoucherKind {
    pub const ALL: [VoucherKind; 32] = [
        VoucherKind::Overstock,
        VoucherKind::OverstockPlus,
        VoucherKind::ClearanceSale,
        VoucherKind::Liquidation,
        VoucherKind::Hone,
        VoucherKind::GlowUp,
        VoucherKind::RerollSurplus,
        VoucherKind::RerollGlut,
        VoucherKind::CrystalBall,
        VoucherKind::OmenGlobe,
        VoucherKind::Telescope,
        VoucherKind::Observatory,
        VoucherKind::Grabber,
        VoucherKind::NachoTong,
        VoucherKind::Wasteful,
        VoucherKind::Recyclomancy,
        VoucherKind::TarotMerchant,
        VoucherKind::TarotTycoon,
        VoucherKind::PlanetMerchant,
        VoucherKind::PlanetTycoon,
        VoucherKind::SeedMoney,
        VoucherKind::MoneyTree,
        VoucherKind::Blank,
        VoucherKind::Antimatter,
        VoucherKind::MagicTrick,
        VoucherKind::Illusion,
        VoucherKind::Hieroglyph,
        VoucherKind::Petroglyph,
        VoucherKind::DirectorsCut,
        VoucherKind::Retcon,
        VoucherKind::PaintBrush,
        VoucherKind::Palette,
    ];

    pub fn name(self) -> &'static str {
        match self {
            VoucherKind::Overstock => "Overstock",
            VoucherKind::OverstockPlus => "Overstock Plus",
            VoucherKind::ClearanceSale => "Clearance Sale",
            VoucherKind::Liquidation => "Liquidation",
            VoucherKind::Hone => "Hone",
            VoucherKind::GlowUp => "Glow Up",
            VoucherKind::RerollSurplus => "Reroll Surplus",
            VoucherKind::RerollGlut => "Reroll Glut",
            VoucherKind::CrystalBall => "Crystal Ball",
            VoucherKind::OmenGlobe => "Omen Globe",
            VoucherKind::Telescope => "Telescope",
            VoucherKind::Observatory => "Observatory",
            VoucherKind::Grabber => "Grabber",
            VoucherKind::NachoTong => "Nacho Tong",
            VoucherKind::Wasteful => "Wasteful",
            VoucherKind::Recyclomancy => "Recyclomancy",
            VoucherKind::TarotMerchant => "Tarot Merchant",
            VoucherKind::TarotTycoon => "Tarot Tycoon",
            VoucherKind::PlanetMerchant => "Planet Merchant",
            VoucherKind::PlanetTycoon => "Planet Tycoon",
            VoucherKind::SeedMoney => "Seed Money",
            VoucherKind::MoneyTree => "Money Tree",
            VoucherKind::Blank => "Blank",
            VoucherKind::Antimatter => "Antimatter",
            VoucherKind::MagicTrick => "Magic Trick",
            VoucherKind::Illusion => "Illusion",
            VoucherKind::Hieroglyph => "Hieroglyph",
            VoucherKind::Petroglyph => "Petroglyph",
            VoucherKind::DirectorsCut => "Director's Cut",
            VoucherKind::Retcon => "Retcon",
            VoucherKind::PaintBrush => "Paint Brush",
            VoucherKind::Palette => "Palette",
        }
    }

    /// The base voucher an upgraded tier requires, if any.
    pub fn requires(self) -> Option<VoucherKind> {
        match self {
            VoucherKind::OverstockPlus => Some(VoucherKind::Overstock),
            VoucherKind::Liquidation => Some(VoucherKind::ClearanceSale),
            VoucherKind::GlowUp => Some(VoucherKind::Hone),
            VoucherKind::RerollGlut => Some(VoucherKind::RerollSurplus),
            VoucherKind::OmenGlobe => Some(VoucherKind::CrystalBall),
            VoucherKind::Observatory => Some(VoucherKind::Telescope),
            VoucherKind::NachoTong => Some(VoucherKind::Grabber),
            VoucherKind::Recyclomancy => Some(VoucherKind::Wasteful),
            VoucherKind::TarotTycoon => Some(VoucherKind::TarotMerchant),
            VoucherKind::PlanetTycoon => Some(VoucherKind::PlanetMerchant),
            VoucherKind::MoneyTree => Some(VoucherKind::SeedMoney),
            VoucherKind::Antimatter => Some(VoucherKind::Blank),
            VoucherKind::Illusion => Some(VoucherKind::MagicTrick),
            VoucherKind::Petroglyph => Some(VoucherKind::Hieroglyph),
            VoucherKind::Retcon => Some(VoucherKind::DirectorsCut),
            VoucherKind::Palette => Some(VoucherKind::PaintBrush),
            _ => None,
        }
    }
}

/// Shop price multiplier from discount vouchers.
pub fn discount_factor(owned: &[VoucherKind]) -> f64 {
    if owned.contains(&VoucherKind::Liquidation) {
        0.5
    } else if owned.contains(&VoucherKind::ClearanceSale) {
        0.75
    } else {
        1.0
    }
}

/// Multiplier on foil/holographic/polychrome shop edition weights.
pub fn edition_weight_factor(owned: &[VoucherKind]) -> u32 {
    if owned.contains(&VoucherKind::GlowUp) {
        4
    } else if owned.contains(&VoucherKind::Hone) {
        2
    } else {
        1
    }
}

pub fn reroll_discount(owned: &[VoucherKind]) -> i64 {
    let mut discount = 0;
    if owned.contains(&VoucherKind::RerollSurplus) {
        discount += 2;
    }
    if owned.contains(&VoucherKind::RerollGlut) {
        discount += 2;
    }
    discount
}

pub fn interest_cap(base: i64, owned: &[VoucherKind]) -> i64 {
    if owned.contains(&VoucherKind::MoneyTree) {
        20
    } else if owned.contains(&VoucherKind::SeedMoney) {
        10
    } else {
        base
    }
}

/// Multiplier applied to a consumable kind's shop weight.
pub fn tarot_weight_factor(owned: &[VoucherKind]) -> u32 {
    if owned.contains(&VoucherKind::TarotTycoon) {
        4
    } else if owned.contains(&VoucherKind::TarotMerchant) {
        2
    } else {
        1
    }
}

pub fn planet_weight_factor(owned: &[VoucherKind]) -> u32 {
    if owned.contains(&VoucherKind::PlanetTycoon) {
        4
    } else if owned.contains(&VoucherKind::PlanetMerchant) {
        2
    } else {
        1
    }
}

pub fn extra_shop_card_slots(owned: &[VoucherKind]) -> usize {
    let mut extra = 0;
    if owned.contains(&VoucherKind::Overstock) {
        extra += 1;
    }
    if owned.contains(&VoucherKind::OverstockPlus) {
        extra += 1;
    }
    extra
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upgrades_point_at_their_base() {
        for kind in VoucherKind::ALL {
            if let Some(base) = kind.requires() {
                assert!(base.requires().is_none(), "{:?} chains too deep", kind);
            }
        }
    }

    #[test]
    fn discount_tiers_stack_by_replacement() {
        assert_eq!(discount_factor(&[]), 1.0);
        assert_eq!(discount_factor(&[VoucherKind::ClearanceSale]), 0.75);
        assert_eq!(
            discount_factor(&[VoucherKind::ClearanceSale, VoucherKind::Liquidation]),
            0.5
        );
    }

    #[test]
    fn interest_cap_upgrades() {
        assert_eq!(interest_cap(5, &[]), 5);
        assert_eq!(interest_cap(5, &[VoucherKind::SeedMoney]), 10);
        assert_eq!(
            interest_cap(5, &[VoucherKind::SeedMoney, VoucherKind::MoneyTree]),
            20
        );
    }
}
