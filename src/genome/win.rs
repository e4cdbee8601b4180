//! Win condition catalogue, evaluated in declaration order.

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum WinKind {
    EmptyHand = 0,
    HighScore = 1,
    FirstToScore = 2,
    CaptureAll = 3,
    LowScore = 4,
    AllHandsEmpty = 5,
    BestHand = 6,
    MostCaptured = 7,
}

impl From<u8> for WinKind {
    fn from(n: u8) -> Self {
        match n {
            0 => WinKind::EmptyHand,
            1 => WinKind::HighScore,
            2 => WinKind::FirstToScore,
            3 => WinKind::CaptureAll,
            4 => WinKind::LowScore,
            5 => WinKind::AllHandsEmpty,
            6 => WinKind::BestHand,
            7 => WinKind::MostCaptured,
            _ => panic!("invalid win-condition kind byte: {n}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WinCondition {
    pub kind: WinKind,
    pub threshold: i32,
}

impl WinCondition {
    /// Whether this win condition is backed by some accumulating score,
    /// used by the structural validator to require scoring infrastructure.
    pub fn is_score_based(&self) -> bool {
        matches!(
            self.kind,
            WinKind::HighScore | WinKind::LowScore | WinKind::FirstToScore | WinKind::MostCaptured
        )
    }

    pub fn is_capture_based(&self) -> bool {
        matches!(self.kind, WinKind::CaptureAll | WinKind::MostCaptured)
    }
}
