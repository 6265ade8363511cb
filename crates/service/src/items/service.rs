//! Item operations: scope, existence, ownership, then the store call.
//!
//! Every function takes the store, the caller's [`Identity`] and the [`CrudPolicy`]
//! explicitly; nothing is looked up from ambient state.

use common::types::Message;
use configs::{Disclosure, ItemsConfig};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{Item, ItemChanges, ItemCreate, ItemUpdate, ItemsPage};
use super::repository::ItemStore;
use crate::auth::Identity;
use crate::authorization::{authorize, scope, Decision, Operation};
use crate::errors::ServiceError;
use crate::pagination::{PageLimits, PageRequest};

/// Per-deployment knobs for the item operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrudPolicy {
    pub limits: PageLimits,
    pub disclosure: Disclosure,
}

impl From<&ItemsConfig> for CrudPolicy {
    fn from(cfg: &ItemsConfig) -> Self {
        Self {
            limits: PageLimits { default_limit: cfg.default_limit, max_limit: cfg.max_limit },
            disclosure: cfg.disclosure,
        }
    }
}

impl CrudPolicy {
    fn denied(&self) -> ServiceError {
        match self.disclosure {
            Disclosure::Reveal => ServiceError::Forbidden,
            Disclosure::Conceal => ServiceError::not_found("item"),
        }
    }
}

/// Fetch then authorize. Absence is reported before ownership is looked at.
async fn fetch_authorized<S: ItemStore + ?Sized>(
    store: &S,
    identity: &Identity,
    id: Uuid,
    operation: Operation,
    policy: &CrudPolicy,
) -> Result<Item, ServiceError> {
    let item = store.fetch(id).await?.ok_or_else(|| ServiceError::not_found("item"))?;
    match authorize(identity, &item.owner_id, operation) {
        Decision::Allow => Ok(item),
        Decision::Deny => {
            debug!(item_id = %id, subject = %identity.subject_id, ?operation, "access_denied");
            Err(policy.denied())
        }
    }
}

/// List the items visible to `identity`. Privileged callers see everything, everyone
/// else only what they own; `count` covers the same scope.
///
/// # Examples
/// ```
/// use service::auth::Identity;
/// use service::items::{domain::ItemCreate, repository::mock::MockItemStore};
/// use service::items::service::{create, list, CrudPolicy};
/// use service::pagination::PageRequest;
/// let store = MockItemStore::default();
/// let policy = CrudPolicy::default();
/// let alice = Identity::user("alice");
/// let _ = tokio_test::block_on(create(&store, &alice, ItemCreate { title: "mine".into(), description: None }));
/// let _ = tokio_test::block_on(create(&store, &Identity::user("bob"), ItemCreate { title: "his".into(), description: None }));
/// let page = tokio_test::block_on(list(&store, &alice, PageRequest::default(), &policy)).unwrap();
/// assert_eq!(page.count, 1);
/// assert_eq!(page.data[0].title, "mine");
/// ```
#[instrument(skip(store, policy), fields(subject = %identity.subject_id))]
pub async fn list<S: ItemStore + ?Sized>(
    store: &S,
    identity: &Identity,
    page: PageRequest,
    policy: &CrudPolicy,
) -> Result<ItemsPage, ServiceError> {
    let window = policy.limits.normalize(page)?;
    let result = store.list(scope(identity), window).await?;
    debug!(count = result.count, returned = result.data.len(), "items_listed");
    Ok(result)
}

#[instrument(skip(store, policy), fields(subject = %identity.subject_id))]
pub async fn get<S: ItemStore + ?Sized>(
    store: &S,
    identity: &Identity,
    id: Uuid,
    policy: &CrudPolicy,
) -> Result<Item, ServiceError> {
    fetch_authorized(store, identity, id, Operation::Read, policy).await
}

/// Create an item owned by the caller.
#[instrument(skip(store, input), fields(subject = %identity.subject_id))]
pub async fn create<S: ItemStore + ?Sized>(
    store: &S,
    identity: &Identity,
    input: ItemCreate,
) -> Result<Item, ServiceError> {
    input.validate()?;
    let item = store.create(&identity.subject_id, input).await?;
    info!(item_id = %item.id, owner_id = %item.owner_id, "item_created");
    Ok(item)
}

/// Apply a partial update. Only fields present in `changes` are written; an empty
/// update returns the item as it is.
#[instrument(skip(store, changes, policy), fields(subject = %identity.subject_id))]
pub async fn update<S: ItemStore + ?Sized>(
    store: &S,
    identity: &Identity,
    id: Uuid,
    changes: ItemUpdate,
    policy: &CrudPolicy,
) -> Result<Item, ServiceError> {
    let changes = ItemChanges::try_from(changes)?;
    let current = fetch_authorized(store, identity, id, Operation::Update, policy).await?;
    if changes.is_empty() {
        return Ok(current);
    }
    // may have been deleted since the fetch
    let updated = store.apply_update(id, changes).await?.ok_or_else(|| ServiceError::not_found("item"))?;
    info!(item_id = %id, "item_updated");
    Ok(updated)
}

#[instrument(skip(store, policy), fields(subject = %identity.subject_id))]
pub async fn delete<S: ItemStore + ?Sized>(
    store: &S,
    identity: &Identity,
    id: Uuid,
    policy: &CrudPolicy,
) -> Result<Message, ServiceError> {
    fetch_authorized(store, identity, id, Operation::Delete, policy).await?;
    if !store.delete(id).await? {
        return Err(ServiceError::not_found("item"));
    }
    info!(item_id = %id, "item_deleted");
    Ok(Message::new("Item deleted successfully"))
}
