use clap::Parser;

use crate::command::RevokeRequest;

/// Revoke Passport access tokens
#[derive(Parser, Debug)]
#[command(name = "revoke-tokens", version, about)]
pub struct Cli {
    /// Revoke exactly this token; --user and --client are ignored
    pub token: Option<String>,

    /// Revoke the active tokens of this user
    #[arg(long, value_name = "ID")]
    pub user: Option<String>,

    /// Revoke the active tokens issued to this client
    #[arg(long, value_name = "ID")]
    pub client: Option<String>,

    /// Do not ask before revoking every active token
    #[arg(short, long)]
    pub force: bool,

    /// Report what would be revoked without changing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub fn request(&self) -> RevokeRequest {
        RevokeRequest::new(self.token.clone(), self.user.clone(), self.client.clone())
            .force(self.force)
            .dry_run(self.dry_run)
    }
}
