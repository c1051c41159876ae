use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::utils::error::CustomError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Live,
    Completed,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub user_id: ObjectId,
    pub user_name: String,
    pub submission_id: ObjectId,
    pub video_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Event {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub description: Option<String>,
    /// Event day, "YYYY-MM-DD"
    pub date: String,
    /// Start of the event window, "HH:MM"
    pub start_time: String,
    /// Window length in hours; derived defaults apply when absent
    pub duration_hours: Option<i64>,
    /// Persisted status override; when absent status is derived on read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
    pub winners_declared: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leaderboard: Option<Vec<LeaderboardEntry>>,
    pub created_by: ObjectId,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_declared_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Submission {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub event_id: ObjectId,
    pub user_id: ObjectId,
    pub user_name: String,
    pub video_url: String,
    pub created_at: DateTime<Utc>,
    /// Set once winners are declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<i64>,
}

/// One picked winner: which submission, at which rank.
#[derive(Debug, Clone, Copy)]
pub struct WinnerPick {
    pub submission_id: ObjectId,
    pub rank: i64,
}

/// Build the ranked leaderboard from winner picks and their resolved
/// submissions. Pure so the validation rules are testable without a store.
pub fn build_leaderboard(
    picks: &[WinnerPick],
    submissions: &HashMap<ObjectId, Submission>,
) -> Result<Vec<LeaderboardEntry>, CustomError> {
    if picks.is_empty() {
        return Err(CustomError::ValidationError(
            "At least one winner is required".to_string(),
        ));
    }

    let mut entries = Vec::with_capacity(picks.len());
    for pick in picks {
        if pick.rank < 1 {
            return Err(CustomError::ValidationError(format!(
                "Invalid rank {}",
                pick.rank
            )));
        }
        if entries
            .iter()
            .any(|e: &LeaderboardEntry| e.rank == pick.rank)
        {
            return Err(CustomError::ValidationError(format!(
                "Duplicate rank {}",
                pick.rank
            )));
        }
        if entries
            .iter()
            .any(|e: &LeaderboardEntry| e.submission_id == pick.submission_id)
        {
            return Err(CustomError::ValidationError(
                "Duplicate submission in winner picks".to_string(),
            ));
        }

        let submission = submissions.get(&pick.submission_id).ok_or_else(|| {
            CustomError::NotFoundError(format!(
                "Submission {} not found",
                pick.submission_id.to_hex()
            ))
        })?;

        entries.push(LeaderboardEntry {
            rank: pick.rank,
            user_id: submission.user_id,
            user_name: submission.user_name.clone(),
            submission_id: pick.submission_id,
            video_url: Some(submission.video_url.clone()),
        });
    }

    entries.sort_by_key(|e| e.rank);
    Ok(entries)
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub date: String,
    pub start_time: String,
    pub duration_hours: Option<i64>,
}

#[derive(Deserialize)]
pub struct SubmitEntryRequest {
    pub user_name: String,
    pub video_url: String,
}

#[derive(Deserialize)]
pub struct WinnerPickRequest {
    pub submission_id: String,
    pub rank: i64,
}

#[derive(Deserialize)]
pub struct DeclareWinnersRequest {
    pub winners: Vec<WinnerPickRequest>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(event_id: ObjectId, name: &str) -> Submission {
        Submission {
            id: Some(ObjectId::new()),
            event_id,
            user_id: ObjectId::new(),
            user_name: name.to_string(),
            video_url: format!("https://cdn.example/{}.mp4", name),
            created_at: Utc::now(),
            rank: None,
        }
    }

    fn fixture(count: usize) -> (Vec<ObjectId>, HashMap<ObjectId, Submission>) {
        let event_id = ObjectId::new();
        let mut ids = Vec::new();
        let mut map = HashMap::new();
        for i in 0..count {
            let sub = submission(event_id, &format!("user{}", i));
            let id = sub.id.unwrap();
            ids.push(id);
            map.insert(id, sub);
        }
        (ids, map)
    }

    #[test]
    fn leaderboard_is_ordered_by_rank() {
        let (ids, subs) = fixture(3);
        let picks = vec![
            WinnerPick {
                submission_id: ids[0],
                rank: 3,
            },
            WinnerPick {
                submission_id: ids[1],
                rank: 1,
            },
            WinnerPick {
                submission_id: ids[2],
                rank: 2,
            },
        ];

        let board = build_leaderboard(&picks, &subs).unwrap();
        let ranks: Vec<i64> = board.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(board[0].user_name, "user1");
    }

    #[test]
    fn missing_submission_is_not_found() {
        let (ids, subs) = fixture(1);
        let picks = vec![
            WinnerPick {
                submission_id: ids[0],
                rank: 1,
            },
            WinnerPick {
                submission_id: ObjectId::new(),
                rank: 2,
            },
        ];
        assert!(matches!(
            build_leaderboard(&picks, &subs),
            Err(CustomError::NotFoundError(_))
        ));
    }

    #[test]
    fn duplicate_rank_is_rejected() {
        let (ids, subs) = fixture(2);
        let picks = vec![
            WinnerPick {
                submission_id: ids[0],
                rank: 1,
            },
            WinnerPick {
                submission_id: ids[1],
                rank: 1,
            },
        ];
        assert!(matches!(
            build_leaderboard(&picks, &subs),
            Err(CustomError::ValidationError(_))
        ));
    }

    #[test]
    fn empty_picks_are_rejected() {
        let (_, subs) = fixture(0);
        assert!(matches!(
            build_leaderboard(&[], &subs),
            Err(CustomError::ValidationError(_))
        ));
    }
}
