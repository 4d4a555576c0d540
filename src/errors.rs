use thiserror::Error;

#[derive(Debug, Error)]
pub enum RevokeError {
    #[error("token {0} not found")]
    TokenNotFound(String),

    /// A write failed mid-batch. Rows revoked before it stay revoked.
    #[error("failed to revoke token {id}")]
    Persistence {
        id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("token store error")]
    Store(#[from] anyhow::Error),

    #[error("terminal error")]
    Terminal(#[from] std::io::Error),
}

impl RevokeError {
    /// Process exit code for this failure. Success (including a declined prompt) is 0.
    pub fn exit_code(&self) -> u8 {
        match self {
            RevokeError::TokenNotFound(_) => 2,
            RevokeError::Persistence { .. } | RevokeError::Store(_) | RevokeError::Terminal(_) => 1,
        }
    }
}

/// Exit code for whatever error reached `main`. Anything that is not a `RevokeError` is 1.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<RevokeError>()
        .map(RevokeError::exit_code)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_has_distinct_exit_code() {
        let err = RevokeError::TokenNotFound("abc".into());
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "token abc not found");
    }

    #[test]
    fn test_persistence_names_the_row() {
        let err = RevokeError::Persistence {
            id: "abc".into(),
            source: anyhow::anyhow!("connection reset"),
        };
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "failed to revoke token abc");
    }

    #[test]
    fn test_error_chain_names_each_cause_once() {
        let persistence = RevokeError::Persistence {
            id: "abc".into(),
            source: anyhow::anyhow!("connection reset"),
        };
        assert_eq!(
            format!("{:#}", anyhow::Error::from(persistence)),
            "failed to revoke token abc: connection reset"
        );

        let store = RevokeError::Store(anyhow::anyhow!("pool timed out"));
        assert_eq!(
            format!("{:#}", anyhow::Error::from(store)),
            "token store error: pool timed out"
        );

        let terminal = RevokeError::Terminal(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "broken pipe",
        ));
        assert_eq!(
            format!("{:#}", anyhow::Error::from(terminal)),
            "terminal error: broken pipe"
        );
    }

    #[test]
    fn test_exit_code_survives_anyhow_wrapping() {
        let not_found = anyhow::Error::from(RevokeError::TokenNotFound("abc".into()));
        assert_eq!(exit_code(&not_found), 2);

        let store = anyhow::Error::from(RevokeError::Store(anyhow::anyhow!("down")));
        assert_eq!(exit_code(&store), 1);

        let startup = anyhow::anyhow!("failed to connect to the token database");
        assert_eq!(exit_code(&startup), 1);
    }
}
