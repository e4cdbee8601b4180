//! Bidding / contract scoring configuration (trick-taking games like spades).

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContractScoring {
    pub points_per_trick_bid: i16,
    pub overtrick_points: i16,
    pub nil_bonus: i16,
    pub nil_penalty: i16,
    pub bag_limit: u8,
    pub bag_penalty: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BiddingConfig {
    pub min_bid: u8,
    pub max_bid: u8,
    pub allow_nil: bool,
    pub contract_scoring: Option<ContractScoring>,
}
