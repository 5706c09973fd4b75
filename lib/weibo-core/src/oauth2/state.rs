/// The outcome of probing an access token against the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TokenState {
    /// The token was accepted.
    #[display("valid")]
    Valid,
    /// The token has expired (service code `21315`).
    #[display("expired")]
    Expired,
    /// The token has already been used (service code `21314`).
    #[display("used")]
    Used,
    /// The token was revoked (service code `21316`).
    #[display("revoked")]
    Revoked,
    /// The token is not recognized (service code `21317`).
    #[display("rejected")]
    Rejected,
    /// Any other service error.
    #[display("other")]
    Other,
}

impl TokenState {
    /// Classifies a service error code.
    ///
    /// ```rust
    /// use weibo_core::oauth2::TokenState;
    ///
    /// assert_eq!(TokenState::from_service_code("21315"), TokenState::Expired);
    /// assert_eq!(TokenState::from_service_code("10006"), TokenState::Other);
    /// ```
    pub fn from_service_code(code: &str) -> Self {
        match code.trim() {
            "21314" => Self::Used,
            "21315" => Self::Expired,
            "21316" => Self::Revoked,
            "21317" => Self::Rejected,
            _ => Self::Other,
        }
    }

    /// Returns `true` for [`TokenState::Valid`].
    pub fn is_valid(self) -> bool {
        self == Self::Valid
    }
}
