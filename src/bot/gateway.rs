//! Gateway traffic counters.
//!
//! Every payload received from the gateway increments `discord.gateway.receive` and every
//! payload the bot sends itself increments `discord.gateway.send`, both tagged with
//! `event_name`.

use serenity::{
    all::{Context, Event, RawEventHandler},
    async_trait,
    constants::Opcode,
};

use crate::service::stats::StatsClient;

/// Dispatch name of a received event, e.g. `MESSAGE_CREATE`.
///
/// Events serenity doesn't model keep the name Discord sent.
pub fn event_name(event: &Event) -> String {
    match event {
        Event::Unknown(unknown) => unknown.kind.clone(),
        event => event.name().unwrap_or_else(|| "UNKNOWN".to_string()),
    }
}

/// Name of a gateway opcode, e.g. `PRESENCE_UPDATE`.
pub fn opcode_name(opcode: Opcode) -> String {
    let name = match opcode {
        Opcode::Dispatch => "DISPATCH",
        Opcode::Heartbeat => "HEARTBEAT",
        Opcode::Identify => "IDENTIFY",
        Opcode::PresenceUpdate => "PRESENCE_UPDATE",
        Opcode::VoiceStateUpdate => "VOICE_STATE_UPDATE",
        Opcode::VoiceServerPing => "VOICE_SERVER_PING",
        Opcode::Resume => "RESUME",
        Opcode::Reconnect => "RECONNECT",
        Opcode::RequestGuildMembers => "REQUEST_GUILD_MEMBERS",
        Opcode::InvalidSession => "INVALID_SESSION",
        Opcode::Hello => "HELLO",
        Opcode::HeartbeatAck => "HEARTBEAT_ACK",
        other => return format!("OPCODE_{}", u8::from(other)),
    };
    name.to_string()
}

/// Counts a payload sent to the gateway.
pub fn record_send(stats: &StatsClient, opcode: Opcode) {
    let name = opcode_name(opcode);
    stats.emit("discord.gateway.send", &[("event_name", name.as_str())]);
}

/// Raw event handler that counts received payloads.
pub struct GatewayStats {
    stats: StatsClient,
}

impl GatewayStats {
    pub fn new(stats: StatsClient) -> Self {
        Self { stats }
    }
}

#[async_trait]
impl RawEventHandler for GatewayStats {
    async fn raw_event(&self, _ctx: Context, event: Event) {
        // Naming an event serializes it, so skip that work when nothing is collected.
        if !self.stats.is_enabled() {
            return;
        }

        let name = event_name(&event);
        self.stats
            .emit("discord.gateway.receive", &[("event_name", name.as_str())]);
    }
}
