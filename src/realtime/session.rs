use actix::fut::wrap_future;
use actix::{
    Actor, ActorContext, ActorFutureExt, Addr, AsyncContext, Handler, Running, StreamHandler,
};
use actix_web_actors::ws;
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::comment::service::CommentService;
use crate::content::model::ContentType;
use crate::realtime::debounce::{DEFAULT_DEBOUNCE, Debouncer};
use crate::realtime::model::{ClientMessage, ServerMessage, topic_key};
use crate::realtime::server::{Connect, Disconnect, FeedPush, FeedServer, Subscribe, Unsubscribe};
use crate::utils::helpers::parse_object_id;

/// How often heartbeat pings are sent
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
/// How long before lack of client response causes a timeout
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

/// One watched topic: where to query snapshots from, plus the coalescing
/// state for pushed changes.
struct Watch {
    content_type: ContentType,
    content_id: ObjectId,
    debouncer: Debouncer,
}

/// WebSocket feed session actor. Receives change pushes from the feed
/// server, debounces them per topic, and ships fresh ordered snapshots to
/// the client. Each session queries its own snapshots, so concurrent
/// sessions on one topic stay independent and consistent.
pub struct FeedSession {
    /// Unique session id
    pub session_id: String,
    /// User id when the client presented a valid token
    pub user_id: Option<String>,
    /// Feed server address
    pub server_addr: Addr<FeedServer>,
    /// Comment store used for snapshot queries
    comments: Arc<CommentService>,
    /// Watched topics
    subscriptions: HashMap<String, Watch>,
    /// Last heartbeat timestamp
    pub last_heartbeat: Instant,
}

impl FeedSession {
    pub fn new(
        user_id: Option<String>,
        server_addr: Addr<FeedServer>,
        comments: Arc<CommentService>,
    ) -> Self {
        FeedSession {
            session_id: Uuid::new_v4().to_string(),
            user_id,
            server_addr,
            comments,
            subscriptions: HashMap::new(),
            last_heartbeat: Instant::now(),
        }
    }

    /// Start heartbeat process
    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.last_heartbeat) > CLIENT_TIMEOUT {
                log::warn!("Feed client heartbeat timeout, disconnecting");
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }

    /// Handle incoming client message
    fn handle_message(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        match msg {
            ClientMessage::Subscribe {
                content_type,
                content_id,
            } => match self.parse_target(&content_type, &content_id) {
                Ok((content_type, content_id)) => {
                    let topic = topic_key(content_type, &content_id.to_hex());
                    self.subscriptions.insert(
                        topic.clone(),
                        Watch {
                            content_type,
                            content_id,
                            debouncer: Debouncer::new(DEFAULT_DEBOUNCE),
                        },
                    );
                    self.server_addr.do_send(Subscribe {
                        session_id: self.session_id.clone(),
                        topic: topic.clone(),
                    });
                    self.send_message(&ServerMessage::Subscribed { topic: topic.clone() }, ctx);
                    // Initial snapshot, no debounce on subscribe
                    self.send_snapshot(topic, ctx);
                }
                Err(message) => self.send_message(&ServerMessage::Error { message }, ctx),
            },
            ClientMessage::Unsubscribe {
                content_type,
                content_id,
            } => match self.parse_target(&content_type, &content_id) {
                Ok((content_type, content_id)) => {
                    let topic = topic_key(content_type, &content_id.to_hex());
                    self.subscriptions.remove(&topic);
                    self.server_addr.do_send(Unsubscribe {
                        session_id: self.session_id.clone(),
                        topic: topic.clone(),
                    });
                    self.send_message(&ServerMessage::Unsubscribed { topic }, ctx);
                }
                Err(message) => self.send_message(&ServerMessage::Error { message }, ctx),
            },
            ClientMessage::Ping => {
                self.send_message(&ServerMessage::Pong, ctx);
            }
        }
    }

    fn parse_target(
        &self,
        content_type: &str,
        content_id: &str,
    ) -> Result<(ContentType, ObjectId), String> {
        let content_type = ContentType::parse(content_type).map_err(|e| e.to_string())?;
        let content_id = parse_object_id(content_id, "content ID").map_err(|e| e.to_string())?;
        Ok((content_type, content_id))
    }

    /// Query a fresh ordered snapshot for a topic and ship it to the client.
    fn send_snapshot(&mut self, topic: String, ctx: &mut ws::WebsocketContext<Self>) {
        let Some(watch) = self.subscriptions.get(&topic) else {
            return;
        };
        let content_type = watch.content_type;
        let content_id = watch.content_id;
        let comments = Arc::clone(&self.comments);

        let fut = async move { comments.list_for_content(&content_id, content_type).await };
        ctx.spawn(wrap_future::<_, Self>(fut).map(move |result, act, ctx| {
            // The client may have unsubscribed while the query was in flight
            if !act.subscriptions.contains_key(&topic) {
                return;
            }
            match result {
                Ok(comments) => act.send_message(&ServerMessage::Snapshot { topic, comments }, ctx),
                Err(e) => {
                    log::warn!("Snapshot query failed for {}: {}", topic, e);
                    act.send_message(
                        &ServerMessage::Error {
                            message: format!("Failed to load comments: {}", e),
                        },
                        ctx,
                    )
                }
            }
        }));
    }

    /// Send message to WebSocket client
    fn send_message(&self, msg: &ServerMessage, ctx: &mut ws::WebsocketContext<Self>) {
        if let Ok(json) = serde_json::to_string(msg) {
            ctx.text(json);
        }
    }
}

impl Actor for FeedSession {
    type Context = ws::WebsocketContext<Self>;

    /// Called when actor starts
    fn started(&mut self, ctx: &mut Self::Context) {
        self.start_heartbeat(ctx);

        let addr = ctx.address();
        self.server_addr.do_send(Connect {
            session_id: self.session_id.clone(),
            user_id: self.user_id.clone(),
            addr: addr.recipient(),
        });

        self.send_message(
            &ServerMessage::Connected {
                session_id: self.session_id.clone(),
            },
            ctx,
        );
    }

    /// Called when actor is stopping; the server drops this session from
    /// every topic, so no push arrives after teardown.
    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        self.server_addr.do_send(Disconnect {
            session_id: self.session_id.clone(),
        });
        Running::Stop
    }
}

/// Handler for change pushes from the feed server
impl Handler<FeedPush> for FeedSession {
    type Result = ();

    fn handle(&mut self, msg: FeedPush, ctx: &mut Self::Context) {
        let Some(watch) = self.subscriptions.get_mut(&msg.topic) else {
            return;
        };
        if let Some(delay) = watch.debouncer.note_change() {
            let topic = msg.topic;
            ctx.run_later(delay, move |act, ctx| {
                let flushed = act
                    .subscriptions
                    .get_mut(&topic)
                    .map(|w| w.debouncer.flush())
                    .unwrap_or(0);
                if flushed > 0 {
                    log::debug!("Flushing {} coalesced change(s) on {}", flushed, topic);
                    act.send_snapshot(topic, ctx);
                }
            });
        }
    }
}

/// Handler for WebSocket messages
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for FeedSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();

                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => {
                        self.handle_message(client_msg, ctx);
                    }
                    Err(e) => {
                        log::warn!("Failed to parse WebSocket message: {}", e);
                        self.send_message(
                            &ServerMessage::Error {
                                message: format!("Invalid message format: {}", e),
                            },
                            ctx,
                        );
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                log::warn!("Binary messages not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                log::info!("WebSocket close: {:?}", reason);
                ctx.close(reason);
                ctx.stop();
            }
            _ => ctx.stop(),
        }
    }
}
