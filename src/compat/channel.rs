//! Legacy traffic type codes and their channel identifiers

use std::fmt;

use uuid::Uuid;

/// Legacy traffic classification as stored in older interaction documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegacyTrafficType {
    /// Never classified, has no channel
    Unclassified = 0,
    Direct = 1,
    OrganicSearch = 2,
    PaidSearch = 3,
    Referral = 4,
    Email = 5,
    Social = 6,
    Display = 7,
    Affiliate = 8,
}

impl LegacyTrafficType {
    /// Every known code, in code order
    pub const ALL: [LegacyTrafficType; 9] = [
        LegacyTrafficType::Unclassified,
        LegacyTrafficType::Direct,
        LegacyTrafficType::OrganicSearch,
        LegacyTrafficType::PaidSearch,
        LegacyTrafficType::Referral,
        LegacyTrafficType::Email,
        LegacyTrafficType::Social,
        LegacyTrafficType::Display,
        LegacyTrafficType::Affiliate,
    ];

    /// Looks up a traffic type by its stored code
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.code() == code)
    }

    /// Returns the stored code
    pub fn code(self) -> i64 {
        self as i64
    }

    /// Returns the channel this traffic type was folded into, if any
    pub fn channel_id(self) -> Option<Uuid> {
        match self {
            LegacyTrafficType::Unclassified => None,
            LegacyTrafficType::Direct => Some(channels::DIRECT),
            LegacyTrafficType::OrganicSearch => Some(channels::ORGANIC_SEARCH),
            LegacyTrafficType::PaidSearch => Some(channels::PAID_SEARCH),
            LegacyTrafficType::Referral => Some(channels::REFERRAL),
            LegacyTrafficType::Email => Some(channels::EMAIL),
            LegacyTrafficType::Social => Some(channels::SOCIAL),
            LegacyTrafficType::Display => Some(channels::DISPLAY),
            LegacyTrafficType::Affiliate => Some(channels::AFFILIATE),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LegacyTrafficType::Unclassified => "unclassified",
            LegacyTrafficType::Direct => "direct",
            LegacyTrafficType::OrganicSearch => "organic_search",
            LegacyTrafficType::PaidSearch => "paid_search",
            LegacyTrafficType::Referral => "referral",
            LegacyTrafficType::Email => "email",
            LegacyTrafficType::Social => "social",
            LegacyTrafficType::Display => "display",
            LegacyTrafficType::Affiliate => "affiliate",
        }
    }
}

impl fmt::Display for LegacyTrafficType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Channel identifiers assigned when traffic types were retired
pub mod channels {
    use uuid::Uuid;

    pub const DIRECT: Uuid = Uuid::from_u128(0x1b4e28ba_2fa1_11d2_883f_0016d3cca401);
    pub const ORGANIC_SEARCH: Uuid = Uuid::from_u128(0x1b4e28ba_2fa1_11d2_883f_0016d3cca402);
    pub const PAID_SEARCH: Uuid = Uuid::from_u128(0x1b4e28ba_2fa1_11d2_883f_0016d3cca403);
    pub const REFERRAL: Uuid = Uuid::from_u128(0x1b4e28ba_2fa1_11d2_883f_0016d3cca404);
    pub const EMAIL: Uuid = Uuid::from_u128(0x1b4e28ba_2fa1_11d2_883f_0016d3cca405);
    pub const SOCIAL: Uuid = Uuid::from_u128(0x1b4e28ba_2fa1_11d2_883f_0016d3cca406);
    pub const DISPLAY: Uuid = Uuid::from_u128(0x1b4e28ba_2fa1_11d2_883f_0016d3cca407);
    pub const AFFILIATE: Uuid = Uuid::from_u128(0x1b4e28ba_2fa1_11d2_883f_0016d3cca408);
}

/// Maps a legacy traffic type code to the channel identifier that replaced it.
///
/// Returns `None` for codes outside the enumeration and for codes that never
/// had a channel. A miss is not an error.
pub fn map_legacy_code_to_identifier(code: i64) -> Option<Uuid> {
    LegacyTrafficType::from_code(code).and_then(LegacyTrafficType::channel_id)
}
