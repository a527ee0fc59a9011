/// Transaction lifecycle state.
///
/// State transitions:
/// ```text
/// Active ──commit──> Committed
///   │
///   └──close/drop──> RolledBack
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// Transaction is open and can be committed.
    Active,

    /// Transaction has been successfully committed.
    Committed,

    /// Transaction was rolled back on disposal without a commit.
    RolledBack,
}

impl TransactionState {
    /// Check if the transaction can still be committed.
    pub fn is_active(&self) -> bool {
        matches!(self, TransactionState::Active)
    }

    /// Check if the transaction reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionState::Committed | TransactionState::RolledBack
        )
    }
}

impl std::fmt::Display for TransactionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionState::Active => write!(f, "ACTIVE"),
            TransactionState::Committed => write!(f, "COMMITTED"),
            TransactionState::RolledBack => write!(f, "ROLLED BACK"),
        }
    }
}
