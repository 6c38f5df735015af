//! Fire-and-forget statsd metrics.
//!
//! Metrics are written in the DogStatsD line format (`name:value|type|#tag:value,...`) over
//! UDP. Nothing here returns an error: a metric that can't be sent is logged at debug level
//! and dropped, so a missing or slow collector never affects the bot.

use std::{collections::BTreeMap, fmt::Display, sync::Arc};

use tokio::{net::UdpSocket, sync::OnceCell};

use crate::config::StatsdConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
}

impl MetricKind {
    fn symbol(self) -> &'static str {
        match self {
            Self::Counter => "c",
            Self::Gauge => "g",
        }
    }
}

/// Formats a single metric line.
///
/// # Arguments
/// - `name` - Dotted metric name, e.g. `discord.bot.commands`
/// - `value` - Counter increment or gauge value
/// - `kind` - Counter or gauge
/// - `tags` - Tag name/value pairs, written in the order given
pub fn format_metric<'t>(
    name: &str,
    value: impl Display,
    kind: MetricKind,
    tags: impl IntoIterator<Item = (&'t str, &'t str)>,
) -> String {
    let tags: Vec<String> = tags
        .into_iter()
        .map(|(key, value)| format!("{key}:{value}"))
        .collect();

    if tags.is_empty() {
        format!("{name}:{value}|{}", kind.symbol())
    } else {
        format!("{name}:{value}|{}|#{}", kind.symbol(), tags.join(","))
    }
}

/// Client for the statsd collector configured in `[statsd]`.
///
/// Cheap to clone. The UDP socket is opened on first use and shared by every clone. When
/// the configuration has no `service` constant tag the client is disabled and every call is
/// a no-op.
#[derive(Clone)]
pub struct StatsClient {
    target: Option<(String, u16)>,
    constant_tags: Arc<BTreeMap<String, String>>,
    socket: Arc<OnceCell<UdpSocket>>,
}

impl StatsClient {
    pub fn new(config: &StatsdConfig) -> Self {
        if !config.is_enabled() {
            tracing::info!("No statsd service tag configured, metrics are disabled");
            return Self::disabled();
        }

        Self {
            target: Some((config.host.clone(), config.port)),
            constant_tags: Arc::new(config.constant_tags.clone()),
            socket: Arc::new(OnceCell::new()),
        }
    }

    /// A client that drops every metric.
    pub fn disabled() -> Self {
        Self {
            target: None,
            constant_tags: Arc::new(BTreeMap::new()),
            socket: Arc::new(OnceCell::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.target.is_some()
    }

    /// Starts a session that buffers metrics until [`StatsSession::flush`].
    pub fn session(&self) -> StatsSession<'_> {
        StatsSession {
            client: self,
            lines: Vec::new(),
        }
    }

    /// Increments a counter by one in a background task.
    pub fn emit(&self, name: &str, tags: &[(&str, &str)]) {
        if !self.is_enabled() {
            return;
        }

        let mut session = self.session();
        session.increment(name, tags);
        let lines = session.take_lines();
        let client = self.clone();

        tokio::spawn(async move {
            client.send_lines(lines).await;
        });
    }

    /// Increments a counter by one and waits for it to be sent.
    pub async fn increment(&self, name: &str, tags: &[(&str, &str)]) {
        let mut session = self.session();
        session.increment(name, tags);
        session.flush().await;
    }

    /// Sets a gauge and waits for it to be sent.
    pub async fn gauge(&self, name: &str, value: f64, tags: &[(&str, &str)]) {
        let mut session = self.session();
        session.gauge(name, value, tags);
        session.flush().await;
    }

    fn line(
        &self,
        name: &str,
        value: impl Display,
        kind: MetricKind,
        tags: &[(&str, &str)],
    ) -> String {
        let constant = self
            .constant_tags
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()));

        format_metric(name, value, kind, constant.chain(tags.iter().copied()))
    }

    async fn socket(&self) -> Option<&UdpSocket> {
        let (host, port) = self.target.as_ref()?;

        let result = self
            .socket
            .get_or_try_init(|| async {
                let socket = UdpSocket::bind("0.0.0.0:0").await?;
                socket.connect((host.as_str(), *port)).await?;
                Ok::<_, std::io::Error>(socket)
            })
            .await;

        match result {
            Ok(socket) => Some(socket),
            Err(e) => {
                tracing::debug!("Couldn't open statsd socket to {}:{}: {}", host, port, e);
                None
            }
        }
    }

    async fn send_lines(&self, lines: Vec<String>) {
        if lines.is_empty() {
            return;
        }

        let Some(socket) = self.socket().await else {
            return;
        };

        for line in lines {
            if let Err(e) = socket.send(line.as_bytes()).await {
                tracing::debug!("Failed to send metric {}: {}", line, e);
            }
        }
    }
}

/// Metrics buffered for one logical operation, such as a single command invocation.
pub struct StatsSession<'a> {
    client: &'a StatsClient,
    lines: Vec<String>,
}

impl StatsSession<'_> {
    pub fn increment(&mut self, name: &str, tags: &[(&str, &str)]) -> &mut Self {
        self.count(name, 1, tags)
    }

    pub fn count(&mut self, name: &str, value: i64, tags: &[(&str, &str)]) -> &mut Self {
        if self.client.is_enabled() {
            let line = self.client.line(name, value, MetricKind::Counter, tags);
            self.lines.push(line);
        }
        self
    }

    pub fn gauge(&mut self, name: &str, value: f64, tags: &[(&str, &str)]) -> &mut Self {
        if self.client.is_enabled() {
            let line = self.client.line(name, value, MetricKind::Gauge, tags);
            self.lines.push(line);
        }
        self
    }

    /// Metrics buffered so far.
    pub fn pending(&self) -> &[String] {
        &self.lines
    }

    fn take_lines(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    /// Sends every buffered metric.
    pub async fn flush(mut self) {
        let lines = self.take_lines();
        self.client.send_lines(lines).await;
    }
}
