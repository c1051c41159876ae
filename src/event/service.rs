use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, to_bson};
use mongodb::{Client, ClientSession, Collection};
use std::collections::HashMap;

use crate::admin::model::{Admin, AdminLog};
use crate::database::{database_name, db::collections};
use crate::event::model::{Event, Submission, WinnerPick, build_leaderboard};
use crate::event::status::{parse_event_date, parse_event_time, validate_duration_hours};
use crate::utils::error::CustomError;

pub struct EventService {
    client: Client,
    events: Collection<Event>,
    submissions: Collection<Submission>,
    admin_logs: Collection<AdminLog>,
}

impl EventService {
    pub fn new(client: &Client) -> Self {
        let db = client.database(&database_name());
        EventService {
            client: client.clone(),
            events: db.collection::<Event>(collections::EVENTS),
            submissions: db.collection::<Submission>(collections::EVENT_SUBMISSIONS),
            admin_logs: db.collection::<AdminLog>(collections::ADMIN_LOGS),
        }
    }

    pub async fn create_event(
        &self,
        title: String,
        description: Option<String>,
        date: String,
        start_time: String,
        duration_hours: Option<i64>,
        created_by: ObjectId,
    ) -> Result<Event, CustomError> {
        // Reject malformed date/time up front so status derivation on
        // every later read cannot fail
        parse_event_date(&date)?;
        parse_event_time(&start_time)?;
        validate_duration_hours(duration_hours)?;

        let event = Event {
            id: None,
            title,
            description,
            date,
            start_time,
            duration_hours,
            status: None,
            winners_declared: false,
            leaderboard: None,
            created_by,
            created_at: Utc::now(),
            results_declared_at: None,
        };

        let result = self.events.insert_one(&event).await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to create event: {}", e))
        })?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            CustomError::InternalServerError("Failed to get inserted event ID".to_string())
        })?;

        Ok(Event {
            id: Some(id),
            ..event
        })
    }

    /// Fetch an event with its status filled in (derived unless persisted)
    pub async fn get_event(&self, event_id: &ObjectId) -> Result<Event, CustomError> {
        let mut event = self
            .events
            .find_one(doc! { "_id": event_id })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to fetch event: {}", e))
            })?
            .ok_or_else(|| CustomError::NotFoundError("Event not found".to_string()))?;

        event.status = Some(event.status_at(Utc::now())?);
        Ok(event)
    }

    /// All events, newest first, statuses filled in
    pub async fn list_events(&self) -> Result<Vec<Event>, CustomError> {
        let cursor = self
            .events
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to fetch events: {}", e))
            })?;

        let mut events: Vec<Event> = cursor.try_collect().await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to collect events: {}", e))
        })?;

        let now = Utc::now();
        for event in &mut events {
            event.status = Some(event.status_at(now)?);
        }
        Ok(events)
    }

    /// Submit a video entry to an event. One entry per user per event.
    pub async fn submit_entry(
        &self,
        event_id: &ObjectId,
        user_id: ObjectId,
        user_name: String,
        video_url: String,
    ) -> Result<Submission, CustomError> {
        // Existence first, then the duplicate check
        self.events
            .find_one(doc! { "_id": event_id })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to fetch event: {}", e))
            })?
            .ok_or_else(|| CustomError::NotFoundError("Event not found".to_string()))?;

        let existing = self
            .submissions
            .find_one(doc! { "event_id": event_id, "user_id": &user_id })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to check submissions: {}", e))
            })?;
        if existing.is_some() {
            return Err(CustomError::ConflictError(
                "User already submitted to this event".to_string(),
            ));
        }

        let submission = Submission {
            id: None,
            event_id: *event_id,
            user_id,
            user_name,
            video_url,
            created_at: Utc::now(),
            rank: None,
        };

        let result = self.submissions.insert_one(&submission).await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to create submission: {}", e))
        })?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            CustomError::InternalServerError("Failed to get inserted submission ID".to_string())
        })?;

        Ok(Submission {
            id: Some(id),
            ..submission
        })
    }

    pub async fn list_submissions(
        &self,
        event_id: &ObjectId,
    ) -> Result<Vec<Submission>, CustomError> {
        let cursor = self
            .submissions
            .find(doc! { "event_id": event_id })
            .sort(doc! { "created_at": 1 })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to fetch submissions: {}", e))
            })?;

        cursor.try_collect().await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to collect submissions: {}", e))
        })
    }

    /// Declare the winners of an event: one transaction writes the event's
    /// leaderboard and completed state, each winning submission's rank, and
    /// the audit-log entry. All-or-nothing.
    pub async fn declare_winners(
        &self,
        event_id: &ObjectId,
        admin: &Admin,
        picks: Vec<WinnerPick>,
    ) -> Result<Event, CustomError> {
        let mut session = self.client.start_session().await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to start session: {}", e))
        })?;
        session.start_transaction().await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to start transaction: {}", e))
        })?;

        match self
            .declare_winners_in(&mut session, event_id, admin, &picks)
            .await
        {
            Ok(event) => {
                session.commit_transaction().await.map_err(|e| {
                    CustomError::InternalServerError(format!(
                        "Failed to commit winner declaration: {}",
                        e
                    ))
                })?;
                Ok(event)
            }
            Err(e) => {
                if let Err(abort_err) = session.abort_transaction().await {
                    log::warn!("Failed to abort winner declaration: {}", abort_err);
                }
                Err(e)
            }
        }
    }

    async fn declare_winners_in(
        &self,
        session: &mut ClientSession,
        event_id: &ObjectId,
        admin: &Admin,
        picks: &[WinnerPick],
    ) -> Result<Event, CustomError> {
        let event = self
            .events
            .find_one(doc! { "_id": event_id })
            .session(&mut *session)
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to fetch event: {}", e))
            })?
            .ok_or_else(|| CustomError::NotFoundError("Event not found".to_string()))?;

        if event.winners_declared {
            return Err(CustomError::ConflictError(
                "Winners already declared for this event".to_string(),
            ));
        }

        let mut resolved: HashMap<ObjectId, Submission> = HashMap::new();
        for pick in picks {
            let submission = self
                .submissions
                .find_one(doc! { "_id": &pick.submission_id, "event_id": event_id })
                .session(&mut *session)
                .await
                .map_err(|e| {
                    CustomError::InternalServerError(format!("Failed to fetch submission: {}", e))
                })?
                .ok_or_else(|| {
                    CustomError::NotFoundError(format!(
                        "Submission {} not found",
                        pick.submission_id.to_hex()
                    ))
                })?;
            resolved.insert(pick.submission_id, submission);
        }

        let leaderboard = build_leaderboard(picks, &resolved)?;
        let leaderboard_bson = to_bson(&leaderboard).map_err(|e| {
            CustomError::InternalServerError(format!("Failed to encode leaderboard: {}", e))
        })?;
        let declared_at = Utc::now();

        self.events
            .update_one(
                doc! { "_id": event_id },
                doc! {
                    "$set": {
                        "leaderboard": leaderboard_bson,
                        "winners_declared": true,
                        "status": "completed",
                        "results_declared_at": declared_at.to_rfc3339()
                    }
                },
            )
            .session(&mut *session)
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to update event: {}", e))
            })?;

        for pick in picks {
            self.submissions
                .update_one(
                    doc! { "_id": &pick.submission_id },
                    doc! { "$set": { "rank": pick.rank } },
                )
                .session(&mut *session)
                .await
                .map_err(|e| {
                    CustomError::InternalServerError(format!("Failed to rank submission: {}", e))
                })?;
        }

        let log_entry = AdminLog {
            id: None,
            admin_id: admin.user_id,
            action: "declare_winners".to_string(),
            event_id: Some(*event_id),
            detail: format!("Declared {} winner(s)", picks.len()),
            created_at: declared_at,
        };
        self.admin_logs
            .insert_one(&log_entry)
            .session(&mut *session)
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to write admin log: {}", e))
            })?;

        self.events
            .find_one(doc! { "_id": event_id })
            .session(session)
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to fetch event: {}", e))
            })?
            .ok_or_else(|| CustomError::NotFoundError("Event not found".to_string()))
    }
}
