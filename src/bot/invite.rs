use serenity::all::Permissions;
use url::form_urlencoded;

const AUTHORIZE_URL: &str = "https://discord.com/oauth2/authorize";

/// Options for an OAuth2 invite link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteOptions {
    /// Space separated OAuth2 scopes.
    pub scope: String,
    /// Permissions requested for the bot's role.
    pub permissions: Permissions,
    pub redirect_uri: Option<String>,
    /// Guild preselected in the authorization dialog.
    pub guild_id: Option<u64>,
    pub response_type: Option<String>,
}

impl Default for InviteOptions {
    fn default() -> Self {
        Self {
            scope: "bot".to_string(),
            permissions: Permissions::empty(),
            redirect_uri: None,
            guild_id: None,
            response_type: None,
        }
    }
}

impl InviteOptions {
    pub fn with_permissions(permissions: Permissions) -> Self {
        Self {
            permissions,
            ..Self::default()
        }
    }
}

/// Builds the authorization URL used to add the bot to a guild.
///
/// # Arguments
/// - `client_id` - Application ID
/// - `options` - Scope, permissions and optional parameters
pub fn invite_link(client_id: &str, options: &InviteOptions) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());

    query
        .append_pair("client_id", client_id)
        .append_pair("scope", &options.scope)
        .append_pair("permissions", &options.permissions.bits().to_string());

    if let Some(redirect_uri) = options.redirect_uri.as_deref().filter(|uri| !uri.is_empty()) {
        query.append_pair("redirect_uri", redirect_uri);
    }
    if let Some(guild_id) = options.guild_id.filter(|id| *id != 0) {
        query.append_pair("guild_id", &guild_id.to_string());
    }
    if let Some(response_type) = options.response_type.as_deref().filter(|t| !t.is_empty()) {
        query.append_pair("response_type", response_type);
    }

    format!("{AUTHORIZE_URL}?{}", query.finish())
}
