//! Google Analytics pageviews for commands and guild membership changes.
//!
//! Each tracked event is sent as one measurement protocol `pageview` hit. The client is
//! disabled unless every field of `[google_analytics]` is set.

use serenity::all::{GuildId, UserId};

use crate::{config::GoogleAnalyticsConfig, error::AppError};

pub const COLLECT_URL: &str = "https://www.google-analytics.com/collect";

/// Session tag used for commands run outside a guild.
const PRIVATE_MESSAGE: &str = "PRIVATE_MESSAGE";

/// One tracked event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pageview {
    /// Document path, e.g. `/commands/uptime`.
    pub path: String,
    pub client_id: String,
    /// Guild ID, or `PRIVATE_MESSAGE` for direct messages.
    pub session: String,
    pub title: String,
}

impl Pageview {
    /// A command run by `author`.
    pub fn command(name: &str, author: UserId, guild_id: Option<GuildId>) -> Self {
        Self {
            path: format!("/commands/{}", name.replace(' ', "/")),
            client_id: author.to_string(),
            session: guild_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| PRIVATE_MESSAGE.to_string()),
            title: name.to_string(),
        }
    }

    pub fn guild_add(guild_id: GuildId) -> Self {
        Self::guild_event("GUILD_ADD", guild_id)
    }

    pub fn guild_remove(guild_id: GuildId) -> Self {
        Self::guild_event("GUILD_REMOVE", guild_id)
    }

    fn guild_event(event: &str, guild_id: GuildId) -> Self {
        Self {
            path: format!("/events/{event}"),
            client_id: guild_id.to_string(),
            session: guild_id.to_string(),
            title: event.to_string(),
        }
    }
}

/// Sends pageviews to the measurement protocol endpoint. Cheap to clone.
#[derive(Clone)]
pub struct GoogleAnalytics {
    config: Option<GoogleAnalyticsConfig>,
    url: String,
    http_client: reqwest::Client,
}

impl GoogleAnalytics {
    pub fn new(config: &GoogleAnalyticsConfig, http_client: reqwest::Client) -> Self {
        if !config.is_enabled() {
            tracing::debug!("Google Analytics is not configured, pageviews are disabled");
        }

        Self {
            config: config.is_enabled().then(|| config.clone()),
            url: COLLECT_URL.to_string(),
            http_client,
        }
    }

    /// Sends hits to `url` instead of the Google endpoint.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Query parameters for a pageview hit, or `None` while disabled.
    pub fn params(&self, pageview: &Pageview) -> Option<Vec<(&'static str, String)>> {
        let config = self.config.as_ref()?;

        Some(vec![
            ("v", "1".to_string()),
            ("t", "pageview".to_string()),
            ("aip", "1".to_string()),
            ("tid", config.tracking_id.clone()),
            ("an", config.app_name.clone()),
            ("dh", config.document_host.clone()),
            ("dr", "discord.com".to_string()),
            ("dp", pageview.path.clone()),
            ("cid", pageview.client_id.clone()),
            ("cs", pageview.session.clone()),
            ("dt", pageview.title.clone()),
        ])
    }

    /// Sends a pageview and waits for the response. Does nothing while disabled.
    pub async fn send(&self, pageview: &Pageview) -> Result<(), AppError> {
        let Some(params) = self.params(pageview) else {
            return Ok(());
        };

        self.http_client
            .get(&self.url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    /// Sends a pageview in a background task, logging failures.
    pub fn spawn(&self, pageview: Pageview) {
        if !self.is_enabled() {
            return;
        }

        let client = self.clone();
        tokio::spawn(async move {
            if let Err(e) = client.send(&pageview).await {
                tracing::debug!("Couldn't send pageview {}: {}", pageview.path, e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn config() -> GoogleAnalyticsConfig {
        GoogleAnalyticsConfig {
            tracking_id: "UA-1-1".to_string(),
            app_name: "mybot".to_string(),
            document_host: "mybot.example.com".to_string(),
        }
    }

    #[test]
    fn command_pageview_in_guild() {
        let pageview = Pageview::command("uptime", UserId::new(10), Some(GuildId::new(20)));

        assert_eq!(pageview.path, "/commands/uptime");
        assert_eq!(pageview.client_id, "10");
        assert_eq!(pageview.session, "20");
        assert_eq!(pageview.title, "uptime");
    }

    #[test]
    fn command_pageview_in_direct_message() {
        let pageview = Pageview::command("settings prefix", UserId::new(10), None);

        assert_eq!(pageview.path, "/commands/settings/prefix");
        assert_eq!(pageview.session, "PRIVATE_MESSAGE");
    }

    #[test]
    fn guild_pageviews_use_guild_as_client() {
        let added = Pageview::guild_add(GuildId::new(30));
        let removed = Pageview::guild_remove(GuildId::new(30));

        assert_eq!(added.path, "/events/GUILD_ADD");
        assert_eq!(added.client_id, "30");
        assert_eq!(added.session, "30");
        assert_eq!(removed.title, "GUILD_REMOVE");
    }

    #[test]
    fn unconfigured_client_has_no_params() {
        let client = GoogleAnalytics::new(&GoogleAnalyticsConfig::default(), reqwest::Client::new());
        let pageview = Pageview::guild_add(GuildId::new(1));

        assert!(!client.is_enabled());
        assert!(client.params(&pageview).is_none());
    }

    #[test]
    fn params_carry_config_and_pageview() {
        let client = GoogleAnalytics::new(&config(), reqwest::Client::new());
        let pageview = Pageview::command("invite", UserId::new(5), None);

        let params = client.params(&pageview).unwrap();

        assert_eq!(params[0], ("v", "1".to_string()));
        assert!(params.contains(&("tid", "UA-1-1".to_string())));
        assert!(params.contains(&("dp", "/commands/invite".to_string())));
        assert!(params.contains(&("cs", "PRIVATE_MESSAGE".to_string())));
    }

    #[tokio::test]
    async fn sends_pageview_as_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/collect")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("t".into(), "pageview".into()),
                Matcher::UrlEncoded("tid".into(), "UA-1-1".into()),
                Matcher::UrlEncoded("an".into(), "mybot".into()),
                Matcher::UrlEncoded("dh".into(), "mybot.example.com".into()),
                Matcher::UrlEncoded("dp".into(), "/events/GUILD_ADD".into()),
                Matcher::UrlEncoded("cid".into(), "42".into()),
                Matcher::UrlEncoded("dt".into(), "GUILD_ADD".into()),
            ]))
            .with_status(200)
            .create_async()
            .await;
        let client = GoogleAnalytics::new(&config(), reqwest::Client::new())
            .with_url(format!("{}/collect", server.url()));

        client.send(&Pageview::guild_add(GuildId::new(42))).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_is_returned() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/collect")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;
        let client = GoogleAnalytics::new(&config(), reqwest::Client::new())
            .with_url(format!("{}/collect", server.url()));

        let result = client.send(&Pageview::guild_remove(GuildId::new(1))).await;

        assert!(matches!(result, Err(AppError::ReqwestErr(_))));
    }
}
