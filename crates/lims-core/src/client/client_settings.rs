use serde::{Deserialize, Serialize};

/// Basic client behavior settings. These settings are consumed once at
/// [`Lims::new`](crate::Lims::new) and are not mutated afterwards.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ClientSettings {
    /// Base URI of the server, excluding the `api` and version path
    /// segments. For example: `https://lims.example.com:8443`.
    pub base_url: String,
    /// The account name to authenticate as.
    pub username: String,
    /// The password for the account.
    pub password: String,
    /// The user agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ClientSettings {
    /// Settings with the default user agent.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        ClientSettings {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    concat!("lims-sdk/", env!("CARGO_PKG_VERSION")).to_owned()
}
