use actix::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::realtime::model::ChangeKind;

/// Message sent to the feed server to connect a session
#[derive(Message)]
#[rtype(result = "()")]
pub struct Connect {
    pub session_id: String,
    pub user_id: Option<String>,
    pub addr: Recipient<FeedPush>,
}

/// Message sent to the feed server when a session disconnects
#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub session_id: String,
}

/// Message for watching a topic
#[derive(Message)]
#[rtype(result = "()")]
pub struct Subscribe {
    pub session_id: String,
    pub topic: String,
}

/// Message for un-watching a topic
#[derive(Message)]
#[rtype(result = "()")]
pub struct Unsubscribe {
    pub session_id: String,
    pub topic: String,
}

/// Message published by controllers after a successful comment mutation
#[derive(Message)]
#[rtype(result = "()")]
pub struct PublishChange {
    pub topic: String,
    pub change: ChangeKind,
    pub comment_id: Option<String>,
}

/// Change notification pushed to a subscribed session. The session decides
/// when to turn notifications into a snapshot (debounce).
#[derive(Message, Debug, Clone, PartialEq, Eq)]
#[rtype(result = "()")]
pub struct FeedPush {
    pub topic: String,
    pub change: ChangeKind,
}

/// Session info
struct SessionInfo {
    #[allow(dead_code)]
    user_id: Option<String>,
    addr: Recipient<FeedPush>,
}

/// Feed server actor - fans comment changes out to watching sessions
pub struct FeedServer {
    /// Map of session_id -> session info
    sessions: HashMap<String, SessionInfo>,
    /// Map of topic -> set of session_ids
    topics: HashMap<String, HashSet<String>>,
}

impl FeedServer {
    pub fn new() -> Self {
        FeedServer {
            sessions: HashMap::new(),
            topics: HashMap::new(),
        }
    }
}

impl Default for FeedServer {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor for FeedServer {
    type Context = Context<Self>;
}

impl Handler<Connect> for FeedServer {
    type Result = ();

    fn handle(&mut self, msg: Connect, _: &mut Context<Self>) {
        log::info!(
            "Feed session {} connected (user: {:?})",
            msg.session_id,
            msg.user_id
        );
        self.sessions.insert(
            msg.session_id,
            SessionInfo {
                user_id: msg.user_id,
                addr: msg.addr,
            },
        );
    }
}

impl Handler<Disconnect> for FeedServer {
    type Result = ();

    fn handle(&mut self, msg: Disconnect, _: &mut Context<Self>) {
        log::info!("Feed session {} disconnected", msg.session_id);

        // Remove from every topic so nothing is delivered after teardown
        self.topics.retain(|_, sessions| {
            sessions.remove(&msg.session_id);
            !sessions.is_empty()
        });
        self.sessions.remove(&msg.session_id);
    }
}

impl Handler<Subscribe> for FeedServer {
    type Result = ();

    fn handle(&mut self, msg: Subscribe, _: &mut Context<Self>) {
        if !self.sessions.contains_key(&msg.session_id) {
            log::warn!("Subscribe from unknown session {}", msg.session_id);
            return;
        }
        log::info!("Session {} watching {}", msg.session_id, msg.topic);
        self.topics
            .entry(msg.topic)
            .or_default()
            .insert(msg.session_id);
    }
}

impl Handler<Unsubscribe> for FeedServer {
    type Result = ();

    fn handle(&mut self, msg: Unsubscribe, _: &mut Context<Self>) {
        if let Some(sessions) = self.topics.get_mut(&msg.topic) {
            sessions.remove(&msg.session_id);
            if sessions.is_empty() {
                self.topics.remove(&msg.topic);
            }
        }
    }
}

impl Handler<PublishChange> for FeedServer {
    type Result = ();

    fn handle(&mut self, msg: PublishChange, _: &mut Context<Self>) {
        log::debug!(
            "Publishing {:?} on {} (comment: {:?})",
            msg.change,
            msg.topic,
            msg.comment_id
        );
        if let Some(sessions) = self.topics.get(&msg.topic) {
            for session_id in sessions {
                if let Some(session) = self.sessions.get(session_id) {
                    session.addr.do_send(FeedPush {
                        topic: msg.topic.clone(),
                        change: msg.change,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Collects pushed changes so tests can assert on the delivered sequence.
    #[derive(Default)]
    struct Recorder {
        received: Vec<FeedPush>,
    }

    #[derive(Message)]
    #[rtype(result = "Vec<FeedPush>")]
    struct Drain;

    impl Actor for Recorder {
        type Context = Context<Self>;
    }

    impl Handler<FeedPush> for Recorder {
        type Result = ();

        fn handle(&mut self, msg: FeedPush, _: &mut Context<Self>) {
            self.received.push(msg);
        }
    }

    impl Handler<Drain> for Recorder {
        type Result = MessageResult<Drain>;

        fn handle(&mut self, _: Drain, _: &mut Context<Self>) -> Self::Result {
            MessageResult(self.received.drain(..).collect())
        }
    }

    async fn connect_and_subscribe(
        server: &Addr<FeedServer>,
        session_id: &str,
        topic: &str,
    ) -> Addr<Recorder> {
        let recorder = Recorder::default().start();
        server
            .send(Connect {
                session_id: session_id.to_string(),
                user_id: None,
                addr: recorder.clone().recipient(),
            })
            .await
            .unwrap();
        server
            .send(Subscribe {
                session_id: session_id.to_string(),
                topic: topic.to_string(),
            })
            .await
            .unwrap();
        recorder
    }

    fn publish(topic: &str, change: ChangeKind) -> PublishChange {
        PublishChange {
            topic: topic.to_string(),
            change,
            comment_id: None,
        }
    }

    #[actix::test]
    async fn two_subscribers_see_the_same_sequence() {
        let server = FeedServer::new().start();
        let rec1 = connect_and_subscribe(&server, "s1", "post:a").await;
        let rec2 = connect_and_subscribe(&server, "s2", "post:a").await;

        server.send(publish("post:a", ChangeKind::Created)).await.unwrap();
        server.send(publish("post:a", ChangeKind::Liked)).await.unwrap();
        server.send(publish("post:a", ChangeKind::Deleted)).await.unwrap();

        let got1 = rec1.send(Drain).await.unwrap();
        let got2 = rec2.send(Drain).await.unwrap();
        let changes: Vec<ChangeKind> = got1.iter().map(|p| p.change).collect();
        assert_eq!(
            changes,
            vec![ChangeKind::Created, ChangeKind::Liked, ChangeKind::Deleted]
        );
        assert_eq!(got1, got2);
    }

    #[actix::test]
    async fn other_topics_are_not_delivered() {
        let server = FeedServer::new().start();
        let rec = connect_and_subscribe(&server, "s1", "post:a").await;

        server.send(publish("story:a", ChangeKind::Created)).await.unwrap();
        server.send(publish("post:b", ChangeKind::Created)).await.unwrap();

        assert!(rec.send(Drain).await.unwrap().is_empty());
    }

    #[actix::test]
    async fn nothing_is_delivered_after_disconnect() {
        let server = FeedServer::new().start();
        let rec = connect_and_subscribe(&server, "s1", "post:a").await;

        server.send(publish("post:a", ChangeKind::Created)).await.unwrap();
        server
            .send(Disconnect {
                session_id: "s1".to_string(),
            })
            .await
            .unwrap();
        server.send(publish("post:a", ChangeKind::Updated)).await.unwrap();

        let got = rec.send(Drain).await.unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].change, ChangeKind::Created);
    }

    #[actix::test]
    async fn unsubscribe_stops_delivery_for_that_topic_only() {
        let server = FeedServer::new().start();
        let rec = connect_and_subscribe(&server, "s1", "post:a").await;
        server
            .send(Subscribe {
                session_id: "s1".to_string(),
                topic: "story:b".to_string(),
            })
            .await
            .unwrap();

        server
            .send(Unsubscribe {
                session_id: "s1".to_string(),
                topic: "post:a".to_string(),
            })
            .await
            .unwrap();
        server.send(publish("post:a", ChangeKind::Created)).await.unwrap();
        server.send(publish("story:b", ChangeKind::Created)).await.unwrap();

        let got = rec.send(Drain).await.unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].topic, "story:b");
    }
}
