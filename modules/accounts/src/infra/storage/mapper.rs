use anyhow::Context;
use catalog::contract::model::{ImageRef, ReviewerProfile};

use crate::contract::model::Account;
use crate::infra::storage::{user, StoredAvatar};

fn avatar_to_ref(avatar: StoredAvatar) -> ImageRef {
    ImageRef {
        storage_id: avatar.storage_id,
        url: avatar.url,
    }
}

pub fn ref_to_avatar(image: &ImageRef) -> StoredAvatar {
    StoredAvatar {
        storage_id: image.storage_id.clone(),
        url: image.url.clone(),
    }
}

pub fn user_to_account(model: user::Model) -> anyhow::Result<Account> {
    let role = model
        .role
        .parse()
        .with_context(|| format!("user {} has invalid role {:?}", model.id, model.role))?;
    Ok(Account {
        id: model.id,
        name: model.name,
        email: model.email,
        role,
        avatar: model.avatar.map(avatar_to_ref),
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

pub fn user_to_profile(model: user::Model) -> ReviewerProfile {
    ReviewerProfile {
        id: model.id,
        name: model.name,
        email: model.email,
        avatar: model.avatar.map(avatar_to_ref),
    }
}
