//! Life vision generation and lookup.

use tracing::info;

use super::{persist, ServiceResult};
use crate::document::{Filter, FindOptions, Sort};
use crate::domain::{new_vision_fields, Vision, VisionPrompt};
use crate::identity::CREATED_AT;
use crate::ports::{Collection, DocumentStore, VisionComposer};

pub async fn create_vision(
    store: &dyn DocumentStore,
    composer: &dyn VisionComposer,
    prompt: VisionPrompt,
) -> ServiceResult<Vision> {
    let prompt = prompt.validate()?;
    let draft = composer.compose(&prompt);
    let doc = persist(store, Collection::Vision, new_vision_fields(prompt, draft)).await?;
    let vision = Vision::try_from(doc)?;
    info!("Created vision {} for user {}", vision.id, vision.user_id);
    Ok(vision)
}

/// The most recently created vision of `user_id`, if there is one.
pub async fn latest_vision(store: &dyn DocumentStore, user_id: &str) -> ServiceResult<Option<Vision>> {
    let mut docs = store
        .find(
            Collection::Vision,
            &Filter::all().eq("user_id", user_id),
            FindOptions::sorted(Sort::descending(CREATED_AT)).limit(1),
        )
        .await?;
    Ok(docs.pop().map(Vision::try_from).transpose()?)
}
