use crate::{
    db::DbPool,
    entities::campaign_participation::{
        self, ActiveModel as ParticipationActiveModel, Entity as ParticipationEntity,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, SqlErr};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CampaignParticipationRequest {
    #[validate(length(min = 1, message = "campaign_id is required"))]
    pub campaign_id: String,
    #[validate(length(min = 1, message = "user_email is required"))]
    pub user_email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CampaignStatusResponse {
    pub is_joined: bool,
}

/// Service for recycling-campaign participation. One row per (campaign,
/// user); the unique index makes duplicate joins a conflict rather than a
/// silent double-count.
#[derive(Clone)]
pub struct CampaignService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl CampaignService {
    /// Creates a new campaign service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    async fn emit(&self, event: Event) {
        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(event).await {
                warn!(error = %e, "Failed to send campaign event");
            }
        }
    }

    /// Joins a campaign. A second join for the same (campaign, user) pair is
    /// rejected with a conflict.
    #[instrument(skip(self, request), fields(campaign_id = %request.campaign_id, user = %request.user_email))]
    pub async fn join(&self, request: CampaignParticipationRequest) -> Result<(), ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;

        let participation = ParticipationActiveModel {
            id: Set(Uuid::new_v4()),
            campaign_id: Set(request.campaign_id.clone()),
            user_email: Set(request.user_email.clone()),
            joined_at: Set(Utc::now()),
        };

        match participation.insert(db).await {
            Ok(_) => {
                info!("Campaign joined");
                self.emit(Event::CampaignJoined {
                    campaign_id: request.campaign_id,
                    user_email: request.user_email,
                })
                .await;
                Ok(())
            }
            Err(e) => {
                if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    Err(ServiceError::Conflict(
                        "User has already joined this campaign".to_string(),
                    ))
                } else {
                    error!(error = %e, "Failed to join campaign");
                    Err(ServiceError::DatabaseError(e))
                }
            }
        }
    }

    /// Leaves a campaign. Leaving a campaign never joined is a no-op, as in
    /// the portal UI.
    #[instrument(skip(self, request), fields(campaign_id = %request.campaign_id, user = %request.user_email))]
    pub async fn leave(&self, request: CampaignParticipationRequest) -> Result<(), ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;

        ParticipationEntity::delete_many()
            .filter(campaign_participation::Column::CampaignId.eq(request.campaign_id.clone()))
            .filter(campaign_participation::Column::UserEmail.eq(request.user_email.clone()))
            .exec(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to leave campaign");
                ServiceError::DatabaseError(e)
            })?;

        info!("Campaign left");
        self.emit(Event::CampaignLeft {
            campaign_id: request.campaign_id,
            user_email: request.user_email,
        })
        .await;

        Ok(())
    }

    /// Whether the user has joined the given campaign.
    #[instrument(skip(self), fields(campaign_id = %campaign_id, user = %user_email))]
    pub async fn is_joined(
        &self,
        campaign_id: &str,
        user_email: &str,
    ) -> Result<CampaignStatusResponse, ServiceError> {
        let db = &*self.db_pool;

        let participation = ParticipationEntity::find()
            .filter(campaign_participation::Column::CampaignId.eq(campaign_id))
            .filter(campaign_participation::Column::UserEmail.eq(user_email))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(CampaignStatusResponse {
            is_joined: participation.is_some(),
        })
    }
}
