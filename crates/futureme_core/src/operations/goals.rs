//! Goal CRUD. Listing is scoped by owner; update and delete address a single
//! goal by identity.

use tracing::info;

use super::{persist, ServiceError, ServiceResult};
use crate::document::{Filter, FindOptions, Sort};
use crate::domain::{Goal, GoalChanges, GoalDraft, GoalPatch, NewGoal};
use crate::identity::{DocumentId, CREATED_AT};
use crate::ports::{Collection, DocumentStore};

fn not_found() -> ServiceError {
    ServiceError::NotFound("Goal not found".to_string())
}

/// All goals of `user_id`, newest first.
pub async fn list_goals(store: &dyn DocumentStore, user_id: &str) -> ServiceResult<Vec<Goal>> {
    let docs = store
        .find(
            Collection::Goal,
            &Filter::all().eq("user_id", user_id),
            FindOptions::sorted(Sort::descending(CREATED_AT)),
        )
        .await?;
    docs.into_iter()
        .map(|doc| Goal::try_from(doc).map_err(ServiceError::from))
        .collect()
}

pub async fn create_goal(store: &dyn DocumentStore, draft: GoalDraft) -> ServiceResult<Goal> {
    let goal = NewGoal::parse(draft)?;
    let doc = persist(store, Collection::Goal, goal.into_fields()).await?;
    let goal = Goal::try_from(doc)?;
    info!("Created goal {} for user {}", goal.id, goal.user_id);
    Ok(goal)
}

/// Applies the supplied changes to a goal, leaving every other field as it was.
pub async fn update_goal(
    store: &dyn DocumentStore,
    goal_id: &str,
    changes: GoalChanges,
) -> ServiceResult<Goal> {
    let patch = GoalPatch::parse(changes)?;
    let id = DocumentId::parse(goal_id)?;

    let doc = store
        .update(Collection::Goal, id, patch.into_fields())
        .await?
        .ok_or_else(not_found)?;
    Ok(Goal::try_from(doc)?)
}

pub async fn delete_goal(store: &dyn DocumentStore, goal_id: &str) -> ServiceResult<()> {
    let id = DocumentId::parse(goal_id)?;
    if store.delete(Collection::Goal, id).await? {
        info!("Deleted goal {}", id);
        Ok(())
    } else {
        Err(not_found())
    }
}
